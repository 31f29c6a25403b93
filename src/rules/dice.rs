use derive_more::{Deref, Display, IntoIterator};
use serde::{Deserialize, Serialize};

use crate::{
    rules::modifier::{DEFAULT_MODIFIER, ModifierKind, parse_modifier_value},
    statistics::roller::DieSource,
};

pub const DEFAULT_ROLLS: u32 = 1;
pub const DEFAULT_DICE: u32 = 1;
pub const DEFAULT_SIDES: u32 = 20;

/// A parsed roll: `rolls_count` independent groups of `dice_count` dice with
/// `sides` faces, each group adjusted once by the modifier.
///
/// Every count is at least 1. Zero counts passed to [`RollSpec::new`] are
/// replaced by their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Display)]
#[display("{rolls_count}x{dice_count}d{sides}{modifier_text}")]
pub struct RollSpec {
    rolls_count: u32,
    dice_count: u32,
    sides: u32,
    modifier_text: String,
    raw_text: Option<String>,
}

impl Default for RollSpec {
    fn default() -> Self {
        Self {
            rolls_count: DEFAULT_ROLLS,
            dice_count: DEFAULT_DICE,
            sides: DEFAULT_SIDES,
            modifier_text: DEFAULT_MODIFIER.to_string(),
            raw_text: None,
        }
    }
}

impl RollSpec {
    pub fn new(rolls_count: u32, dice_count: u32, sides: u32, modifier_text: impl Into<String>) -> Self {
        let modifier_text = modifier_text.into();
        Self {
            rolls_count: or_default(rolls_count, DEFAULT_ROLLS),
            dice_count: or_default(dice_count, DEFAULT_DICE),
            sides: or_default(sides, DEFAULT_SIDES),
            modifier_text: if modifier_text.is_empty() {
                DEFAULT_MODIFIER.to_string()
            } else {
                modifier_text
            },
            raw_text: None,
        }
    }

    pub(crate) fn with_raw_text(mut self, raw_text: &str) -> Self {
        self.raw_text = Some(raw_text.to_string());
        self
    }

    pub fn rolls_count(&self) -> u32 {
        self.rolls_count
    }

    pub fn dice_count(&self) -> u32 {
        self.dice_count
    }

    pub fn sides(&self) -> u32 {
        self.sides
    }

    pub fn modifier_text(&self) -> &str {
        &self.modifier_text
    }

    /// The substring of the input this spec was parsed from, if any notation was found.
    pub fn raw_text(&self) -> Option<&str> {
        self.raw_text.as_deref()
    }

    pub fn modifier_value(&self) -> i64 {
        parse_modifier_value(&self.modifier_text)
    }

    pub fn modifier_kind(&self) -> ModifierKind {
        ModifierKind::classify(&self.modifier_text)
    }

    pub fn total_bounds(&self) -> TotalBounds {
        let rolls = i64::from(self.rolls_count);
        let dice = i64::from(self.dice_count);
        let sides = i64::from(self.sides);
        let modifier = self.modifier_value();
        TotalBounds {
            total_lower_bound: rolls.saturating_mul(dice.saturating_add(modifier)),
            total_upper_bound: rolls.saturating_mul(dice.saturating_mul(sides).saturating_add(modifier)),
        }
    }

    pub fn die_bounds(&self) -> DieBounds {
        DieBounds {
            die_lower_bound: 1,
            die_upper_bound: self.sides,
        }
    }

    pub fn roll(&self, source: &mut impl DieSource) -> RollOutcome {
        evaluate(self, source)
    }
}

impl From<&str> for RollSpec {
    fn from(value: &str) -> Self {
        crate::roll_parser::parse_roll(value)
    }
}

fn or_default(value: u32, default: u32) -> u32 {
    if value == 0 { default } else { value }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalBounds {
    pub total_lower_bound: i64,
    pub total_upper_bound: i64,
}

impl TotalBounds {
    pub fn contains(&self, total: i64) -> bool {
        (self.total_lower_bound..=self.total_upper_bound).contains(&total)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DieBounds {
    pub die_lower_bound: u32,
    pub die_upper_bound: u32,
}

/// The dice rolled for one group, and the modifier applied to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollDetail {
    pub dice: Vec<u32>,
    #[serde(
        rename = "mod",
        default = "default_modifier",
        skip_serializing_if = "is_default_modifier"
    )]
    pub modifier: String,
}

impl RollDetail {
    pub fn dice_total(&self) -> i64 {
        self.dice.iter().map(|&d| i64::from(d)).sum()
    }
}

fn default_modifier() -> String {
    DEFAULT_MODIFIER.to_string()
}

#[allow(clippy::ptr_arg)]
fn is_default_modifier(modifier: &String) -> bool {
    modifier == DEFAULT_MODIFIER
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize, Deref, IntoIterator)]
#[serde(transparent)]
#[into_iterator(owned, ref)]
pub struct RollDetails {
    rolls: Vec<RollDetail>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollOutcome {
    #[serde(rename = "result")]
    pub final_total: i64,
    #[serde(rename = "params")]
    pub raw_text: Option<String>,
    #[serde(rename = "details")]
    pub per_roll_details: RollDetails,
    #[serde(rename = "totalBounds")]
    pub total_bounds: TotalBounds,
    #[serde(rename = "dieBounds")]
    pub die_bounds: DieBounds,
}

impl RollOutcome {
    pub fn pretty_print(&self, f: &mut impl std::fmt::Write) -> std::fmt::Result {
        write!(f, "Rolled {}:", self.raw_text.as_deref().unwrap_or("(default)"))?;
        for detail in &self.per_roll_details {
            write!(f, " [")?;
            for (i, die) in detail.dice.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", die)?;
            }
            if !is_default_modifier(&detail.modifier) {
                write!(f, " {}", detail.modifier)?;
            }
            write!(f, "]")?;
        }
        write!(
            f,
            " = {} (bounds {}..={})",
            self.final_total, self.total_bounds.total_lower_bound, self.total_bounds.total_upper_bound
        )
    }
}

/// Rolls every die in `spec` from `source` and totals the result.
pub fn evaluate(spec: &RollSpec, source: &mut impl DieSource) -> RollOutcome {
    let modifier_value = spec.modifier_value();
    let mut final_total: i64 = 0;
    let mut rolls = Vec::new();

    for _ in 0..spec.rolls_count {
        let mut dice = Vec::new();
        for _ in 0..spec.dice_count {
            let face = source.roll_die(spec.sides);
            final_total = final_total.saturating_add(i64::from(face));
            dice.push(face);
        }
        final_total = final_total.saturating_add(modifier_value);
        rolls.push(RollDetail {
            dice,
            modifier: spec.modifier_text.clone(),
        });
    }

    let outcome = RollOutcome {
        final_total,
        raw_text: spec.raw_text.clone(),
        per_roll_details: RollDetails { rolls },
        total_bounds: spec.total_bounds(),
        die_bounds: spec.die_bounds(),
    };

    if log::log_enabled!(log::Level::Debug) {
        let mut buf = String::new();
        outcome.pretty_print(&mut buf).ok();
        log::debug!("{}", buf);
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statistics::roller::{Roller, ScriptedRoller};

    #[test]
    fn test_default_spec() {
        let spec = RollSpec::default();
        assert_eq!(spec.rolls_count(), 1);
        assert_eq!(spec.dice_count(), 1);
        assert_eq!(spec.sides(), 20);
        assert_eq!(spec.modifier_text(), "+0");
        assert_eq!(spec.raw_text(), None);
        assert_eq!(spec.to_string(), "1x1d20+0");
    }

    #[test]
    fn test_new_replaces_zero_counts() {
        let spec = RollSpec::new(0, 0, 0, "");
        assert_eq!(spec, RollSpec::default());
    }

    #[test]
    fn test_bounds() {
        let spec = RollSpec::new(1, 2, 20, "+2");
        assert_eq!(
            spec.total_bounds(),
            TotalBounds {
                total_lower_bound: 4,
                total_upper_bound: 42
            }
        );

        let spec = RollSpec::new(2, 1, 20, "+2");
        assert_eq!(spec.total_bounds().total_lower_bound, 6);
        assert_eq!(spec.total_bounds().total_upper_bound, 44);

        let spec = RollSpec::new(3, 4, 6, "-5");
        assert_eq!(spec.total_bounds().total_lower_bound, -3);
        assert_eq!(spec.total_bounds().total_upper_bound, 57);
        assert_eq!(
            spec.die_bounds(),
            DieBounds {
                die_lower_bound: 1,
                die_upper_bound: 6
            }
        );
    }

    #[test]
    fn test_bounds_saturate() {
        let spec = RollSpec::new(u32::MAX, u32::MAX, u32::MAX, "+1");
        let bounds = spec.total_bounds();
        assert_eq!(bounds.total_upper_bound, i64::MAX);
        assert!(bounds.total_lower_bound <= bounds.total_upper_bound);
    }

    #[test]
    fn test_roll() {
        let spec = RollSpec::new(2, 3, 6, "+3");
        let bounds = spec.total_bounds();
        let mut rng = Roller::test_rng();
        for _ in 0..10000 {
            let outcome = spec.roll(&mut rng);
            assert!(bounds.contains(outcome.final_total));
            assert_eq!(outcome.per_roll_details.len(), 2);
            for detail in &outcome.per_roll_details {
                assert_eq!(detail.dice.len(), 3);
                assert!(detail.dice.iter().all(|d| (1..=6).contains(d)));
                assert_eq!(detail.modifier, "+3");
            }
        }
    }

    #[test]
    fn test_roll_reaches_both_bounds() {
        let spec = RollSpec::new(2, 2, 4, "-1");
        let bounds = spec.total_bounds();

        let low = evaluate(&spec, &mut ScriptedRoller::constant(1));
        assert_eq!(low.final_total, bounds.total_lower_bound);

        let high = evaluate(&spec, &mut ScriptedRoller::constant(4));
        assert_eq!(high.final_total, bounds.total_upper_bound);
    }

    #[test]
    fn test_modifier_applied_once_per_roll() {
        let spec = RollSpec::new(3, 2, 10, "+2");
        let mut roller = ScriptedRoller::new([1, 2, 3, 4, 5, 6]);
        let outcome = evaluate(&spec, &mut roller);
        assert_eq!(outcome.final_total, 21 + 3 * 2);
        let dice: Vec<Vec<u32>> = outcome.per_roll_details.iter().map(|d| d.dice.clone()).collect();
        assert_eq!(dice, vec![vec![1, 2], vec![3, 4], vec![5, 6]]);
        let sums: Vec<i64> = outcome.per_roll_details.iter().map(RollDetail::dice_total).collect();
        assert_eq!(sums, vec![3, 7, 11]);
    }

    #[test]
    fn test_letter_modifier_adds_nothing() {
        let spec = RollSpec::new(1, 2, 20, "+H");
        assert_eq!(spec.modifier_kind(), ModifierKind::HighMarker);
        let outcome = evaluate(&spec, &mut ScriptedRoller::new([7, 9]));
        assert_eq!(outcome.final_total, 16);
        assert_eq!(outcome.per_roll_details[0].modifier, "+H");
        assert_eq!(outcome.total_bounds.total_lower_bound, 2);
        assert_eq!(outcome.total_bounds.total_upper_bound, 40);
    }

    #[test]
    fn test_outcome_serialization_shape() -> anyhow::Result<()> {
        let spec = RollSpec::new(2, 1, 20, "+2").with_raw_text("2x1d20+2");
        let outcome = evaluate(&spec, &mut ScriptedRoller::new([5, 11]));
        let json = serde_json::to_value(&outcome)?;
        assert_eq!(
            json,
            serde_json::json!({
                "result": 20,
                "params": "2x1d20+2",
                "details": [
                    { "dice": [5], "mod": "+2" },
                    { "dice": [11], "mod": "+2" }
                ],
                "totalBounds": { "totalLowerBound": 6, "totalUpperBound": 44 },
                "dieBounds": { "dieLowerBound": 1, "dieUpperBound": 20 }
            })
        );

        let back: RollOutcome = serde_json::from_value(json)?;
        assert_eq!(back, outcome);
        Ok(())
    }

    #[test]
    fn test_default_modifier_not_serialized() -> anyhow::Result<()> {
        let outcome = evaluate(&RollSpec::default(), &mut ScriptedRoller::constant(12));
        let json = serde_json::to_value(&outcome)?;
        assert_eq!(json["details"], serde_json::json!([{ "dice": [12] }]));
        assert_eq!(json["params"], serde_json::Value::Null);

        let back: RollOutcome = serde_json::from_value(json)?;
        assert_eq!(back.per_roll_details[0].modifier, "+0");
        Ok(())
    }

    #[test]
    fn test_pretty_print() {
        let spec = RollSpec::new(2, 2, 6, "+1").with_raw_text("2x2d6+1");
        let outcome = evaluate(&spec, &mut ScriptedRoller::new([3, 4, 6, 1]));
        let mut buf = String::new();
        outcome.pretty_print(&mut buf).unwrap();
        assert_eq!(buf, "Rolled 2x2d6+1: [3, 4 +1] [6, 1 +1] = 16 (bounds 6..=26)");
    }
}
