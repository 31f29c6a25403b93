use serde::{Deserialize, Serialize};

pub const DEFAULT_MODIFIER: &str = "+0";

/// The shape of a modifier token, as written in the notation.
///
/// Only the sign takes part in arithmetic: `*N` and `/N` are accepted by
/// the grammar but add `N` like `+N` does, and the `L`/`H` markers are
/// carried through to the report without contributing to the total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub enum ModifierKind {
    Add,
    Subtract,
    Multiply,
    Divide,
    LowMarker,
    HighMarker,
    Unrecognized,
}

impl ModifierKind {
    pub fn classify(text: &str) -> Self {
        let mut chars = text.chars();
        let Some(op) = chars.next() else {
            return ModifierKind::Unrecognized;
        };
        let rest = chars.as_str();

        if !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()) {
            return match op {
                '+' => ModifierKind::Add,
                '-' => ModifierKind::Subtract,
                '*' => ModifierKind::Multiply,
                '/' => ModifierKind::Divide,
                _ => ModifierKind::Unrecognized,
            };
        }

        match (op, rest) {
            ('+' | '-', "L" | "l") => ModifierKind::LowMarker,
            ('+' | '-', "H" | "h") => ModifierKind::HighMarker,
            _ => ModifierKind::Unrecognized,
        }
    }

    pub fn is_marker(&self) -> bool {
        matches!(self, ModifierKind::LowMarker | ModifierKind::HighMarker)
    }
}

/// Converts a modifier token into the amount added to each roll.
///
/// A leading `-` negates the magnitude and any other leading character is
/// read as `+`. A magnitude that is not a number (the `L`/`H` markers)
/// counts as zero, as does one too large to represent.
pub fn parse_modifier_value(text: &str) -> i64 {
    let mut chars = text.chars();
    let sign = chars.next();
    let magnitude = chars.as_str();

    let magnitude = if !magnitude.is_empty() && magnitude.bytes().all(|b| b.is_ascii_digit()) {
        match magnitude.parse::<u64>().ok().and_then(|m| i64::try_from(m).ok()) {
            Some(m) => m,
            None => {
                log::warn!("Modifier {text:?} is out of range, treating it as +0");
                0
            }
        }
    } else {
        0
    };

    match sign {
        Some('-') => -magnitude,
        _ => magnitude,
    }
}
