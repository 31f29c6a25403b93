//! Parses compact dice notation such as `2x3d6+1` and rolls it.
//!
//! `2x3d6+1` means two independent rolls, each the sum of three six-sided
//! dice plus one. The roll count, dice count, sides and modifier are all
//! optional and default to `1x1d20+0`.

pub mod config;
pub mod engine;
pub mod error;
pub mod roll_parser;
pub mod rules;
pub mod statistics;

pub mod prelude {
    pub use crate::{
        config::{EngineConfig, MatchPolicy},
        engine::RollEngine,
        error::ParseError,
        roll_parser::{parse_roll, parse_roll_strict, parse_roll_with},
        rules::{
            dice::{DieBounds, RollDetail, RollDetails, RollOutcome, RollSpec, TotalBounds, evaluate},
            modifier::{ModifierKind, parse_modifier_value},
        },
        statistics::roller::{DieSource, Roller, ScriptedRoller},
    };
}
