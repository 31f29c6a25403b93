use crate::{
    config::MatchPolicy,
    error::ParseError,
    rules::{
        dice::{DEFAULT_DICE, DEFAULT_ROLLS, DEFAULT_SIDES, RollSpec},
        modifier::DEFAULT_MODIFIER,
    },
};
use nom::{
    IResult, Parser,
    branch::alt,
    character::complete::{digit0, digit1, multispace0, one_of},
    combinator::{opt, recognize},
    sequence::{pair, terminated},
};

/// The text captured by each part of the notation. Empty and absent
/// captures are kept apart here and only collapsed when building the spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Captures<'a> {
    raw: &'a str,
    rolls: Option<&'a str>,
    dice: &'a str,
    sides: &'a str,
    modifier: Option<&'a str>,
}

/// Parses the first dice notation found anywhere in `input`.
///
/// Text before and after the notation is ignored. If there is no notation
/// at all the default spec is returned, with no raw text.
pub fn parse_roll(input: &str) -> RollSpec {
    match find_notation(input) {
        Some(captures) => build_spec(captures),
        None => {
            log::debug!("No dice notation in {:?}, using defaults", input);
            RollSpec::default()
        }
    }
}

pub fn parse_roll_strict(input: &str) -> Result<RollSpec, ParseError> {
    let captures = find_notation(input).ok_or_else(|| ParseError::NoMatch(input.to_string()))?;
    Ok(build_spec(captures))
}

pub fn parse_roll_with(input: &str, policy: MatchPolicy) -> Result<RollSpec, ParseError> {
    match policy {
        MatchPolicy::Lenient => Ok(parse_roll(input)),
        MatchPolicy::Strict => parse_roll_strict(input),
    }
}

fn find_notation(input: &str) -> Option<Captures<'_>> {
    input
        .char_indices()
        .find_map(|(start, _)| notation(&input[start..]).ok().map(|(_, captures)| captures))
}

// (<rolls> \s* x \s*)? <dice> d <sides> <modifier>?
fn notation(input: &str) -> IResult<&str, Captures<'_>> {
    let (rest, (rolls, dice, _, sides, modifier)) =
        (opt(rolls_prefix), digit0, one_of("dD"), digit0, opt(modifier)).parse(input)?;

    let raw = &input[..input.len() - rest.len()];

    Ok((
        rest,
        Captures {
            raw,
            rolls,
            dice,
            sides,
            modifier,
        },
    ))
}

fn rolls_prefix(input: &str) -> IResult<&str, &str> {
    terminated(digit1, (multispace0, one_of("xX"), multispace0)).parse(input)
}

fn modifier(input: &str) -> IResult<&str, &str> {
    alt((
        recognize(pair(one_of("+-*/"), digit1)),
        recognize(pair(one_of("+-"), one_of("lLhH"))),
    ))
    .parse(input)
}

fn build_spec(captures: Captures<'_>) -> RollSpec {
    let rolls = count_or_default("roll count", captures.rolls, DEFAULT_ROLLS);
    let dice = count_or_default("dice count", Some(captures.dice), DEFAULT_DICE);
    let sides = count_or_default("sides", Some(captures.sides), DEFAULT_SIDES);
    let modifier = captures.modifier.unwrap_or(DEFAULT_MODIFIER);

    let spec = RollSpec::new(rolls, dice, sides, modifier).with_raw_text(captures.raw);
    log::debug!("Parsed {:?} as {}", captures.raw, spec);
    spec
}

fn count_or_default(field: &str, text: Option<&str>, default: u32) -> u32 {
    let Some(text) = text.filter(|t| !t.is_empty()) else {
        return default;
    };
    match text.parse::<u32>() {
        Ok(0) => {
            log::warn!("{} of zero is not allowed, using {}", field, default);
            default
        }
        Ok(value) => value,
        Err(e) => {
            log::warn!("{} {:?} is not usable ({}), using {}", field, text, e, default);
            default
        }
    }
}
