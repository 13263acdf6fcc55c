//! Error types shared by every hexpath module.

use thiserror::Error;

use crate::config::ConfigError;

/// Errors raised by the hexagram table, state construction, and scenario generation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HexpathError {
    /// A line pattern that is not six lines of 0 (yin) or 1 (yang).
    #[error("invalid line pattern {0:?}: expected 6 lines of 0 or 1")]
    InvalidPattern(Vec<u8>),
    /// A hexagram identifier outside 1..=64.
    #[error("hexagram id {0} is out of range 1..=64")]
    InvalidHexagramId(u8),
    /// A line position outside 1..=6.
    #[error("line position {0} is out of range 1..=6")]
    InvalidLinePosition(u8),
    /// A position state with at least one field out of range.
    #[error("invalid position state (hexagram {hexagram_id}, line {line_position})")]
    InvalidState { hexagram_id: u8, line_position: u8 },
    /// A sequence label that is not three of `J`/`H`.
    #[error("invalid sequence label {0:?}: expected three of J or H")]
    InvalidSequence(String),
    /// The hexagram source table does not have one entry per hexagram.
    #[error("hexagram table has {0} entries, expected 64")]
    TableSize(usize),
    /// Two hexagrams share a line pattern, so the table is not a bijection.
    #[error("hexagram table maps pattern {pattern} to both {first} and {second}")]
    DuplicatePattern { pattern: String, first: u8, second: u8 },
    /// Narrative configuration rejected by `validate_config`.
    #[error("invalid narrative config: {}", join_errors(.0))]
    Config(Vec<ConfigError>),
}

fn join_errors(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T, E = HexpathError> = std::result::Result<T, E>;
