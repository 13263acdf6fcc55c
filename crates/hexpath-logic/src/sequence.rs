//! The eight three-choice sequences and the paths they trace.
//!
//! Sequences are enumerated in a fixed order with J < H:
//! `JJJ, JJH, JHJ, JHH, HJJ, HJH, HHJ, HHH`. Consumers index scenarios by
//! position, so this order never changes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{HexpathError, Result};
use crate::state::PositionState;
use crate::transition::Choice;

/// Number of choices in a sequence.
pub const SEQUENCE_LENGTH: usize = 3;
/// Number of distinct sequences.
pub const SEQUENCE_COUNT: usize = 8;
/// Number of states in a path: the initial state plus one per choice.
pub const PATH_LENGTH: usize = SEQUENCE_LENGTH + 1;

/// An ordered triple of choices, e.g. `JHJ`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Sequence([Choice; SEQUENCE_LENGTH]);

impl Sequence {
    pub fn new(choices: [Choice; SEQUENCE_LENGTH]) -> Self {
        Self(choices)
    }

    /// Sequence at `index` in canonical order (0 = `JJJ`, 7 = `HHH`).
    pub fn from_index(index: usize) -> Option<Self> {
        if index >= SEQUENCE_COUNT {
            return None;
        }
        let mut choices = [Choice::Advance; SEQUENCE_LENGTH];
        for (k, choice) in choices.iter_mut().enumerate() {
            // Most significant bit first; a set bit is H.
            if (index >> (SEQUENCE_LENGTH - 1 - k)) & 1 == 1 {
                *choice = Choice::Transform;
            }
        }
        Some(Self(choices))
    }

    /// Position of this sequence in canonical order.
    pub fn index(self) -> usize {
        self.0.iter().fold(0, |acc, choice| {
            (acc << 1)
                | match choice {
                    Choice::Advance => 0,
                    Choice::Transform => 1,
                }
        })
    }

    pub fn choices(self) -> [Choice; SEQUENCE_LENGTH] {
        self.0
    }

    pub fn label(self) -> String {
        self.0.iter().map(|c| c.label()).collect()
    }

    pub fn transform_count(self) -> usize {
        self.0
            .iter()
            .filter(|&&c| c == Choice::Transform)
            .count()
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for choice in self.0 {
            write!(f, "{choice}")?;
        }
        Ok(())
    }
}

impl FromStr for Sequence {
    type Err = HexpathError;

    fn from_str(s: &str) -> Result<Self> {
        let chars: Vec<char> = s.chars().collect();
        let invalid = || HexpathError::InvalidSequence(s.to_string());
        if chars.len() != SEQUENCE_LENGTH {
            return Err(invalid());
        }
        let mut choices = [Choice::Advance; SEQUENCE_LENGTH];
        for (slot, &c) in choices.iter_mut().zip(&chars) {
            *slot = Choice::from_label(c).ok_or_else(invalid)?;
        }
        Ok(Self(choices))
    }
}

impl Serialize for Sequence {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Sequence {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// All eight sequences in canonical order.
pub fn all_sequences() -> [Sequence; SEQUENCE_COUNT] {
    let mut out = [Sequence([Choice::Advance; SEQUENCE_LENGTH]); SEQUENCE_COUNT];
    for (index, slot) in out.iter_mut().enumerate() {
        if let Some(sequence) = Sequence::from_index(index) {
            *slot = sequence;
        }
    }
    out
}

/// Initial state followed by the state after each choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path([PositionState; PATH_LENGTH]);

impl Path {
    pub fn states(&self) -> &[PositionState; PATH_LENGTH] {
        &self.0
    }

    pub fn initial(&self) -> PositionState {
        self.0[0]
    }

    pub fn last(&self) -> PositionState {
        self.0[PATH_LENGTH - 1]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// States after the initial one, one per choice.
    pub fn phases(&self) -> &[PositionState] {
        &self.0[1..]
    }

    /// `(from, to)` pairs for each step.
    pub fn steps(&self) -> impl Iterator<Item = (PositionState, PositionState)> + '_ {
        self.0.windows(2).map(|w| (w[0], w[1]))
    }
}

/// Replay `sequence` from `initial`.
pub fn build_path(initial: PositionState, sequence: Sequence) -> Path {
    let mut states = [initial; PATH_LENGTH];
    for (i, choice) in sequence.choices().into_iter().enumerate() {
        states[i + 1] = choice.apply(states[i]);
    }
    Path(states)
}

/// Replay `sequence` from raw input, failing before any transition if the
/// input is out of range.
pub fn build_path_from(hexagram_id: u8, line_position: u8, sequence: Sequence) -> Result<Path> {
    let initial = PositionState::new(hexagram_id, line_position)?;
    Ok(build_path(initial, sequence))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transition::{advance, transform};

    #[test]
    fn test_canonical_order() {
        let labels: Vec<String> = all_sequences().iter().map(|s| s.label()).collect();
        assert_eq!(
            labels,
            ["JJJ", "JJH", "JHJ", "JHH", "HJJ", "HJH", "HHJ", "HHH"]
        );
    }

    #[test]
    fn test_index_round_trip() {
        for (i, seq) in all_sequences().iter().enumerate() {
            assert_eq!(seq.index(), i);
            assert_eq!(Sequence::from_index(i), Some(*seq));
        }
        assert_eq!(Sequence::from_index(8), None);
    }

    #[test]
    fn test_parse_labels() {
        let seq: Sequence = "JHJ".parse().unwrap();
        assert_eq!(
            seq.choices(),
            [Choice::Advance, Choice::Transform, Choice::Advance]
        );
        assert_eq!(seq.transform_count(), 1);
        assert!("JH".parse::<Sequence>().is_err());
        assert!("JHX".parse::<Sequence>().is_err());
        assert!("JJJJ".parse::<Sequence>().is_err());
    }

    #[test]
    fn test_sequence_serializes_as_label() {
        let seq: Sequence = "HHJ".parse().unwrap();
        assert_eq!(serde_json::to_string(&seq).unwrap(), "\"HHJ\"");
        let back: Sequence = serde_json::from_str("\"HHJ\"").unwrap();
        assert_eq!(back, seq);
    }

    #[test]
    fn test_path_has_four_states() {
        let initial = PositionState::new(1, 1).unwrap();
        for seq in all_sequences() {
            let path = build_path(initial, seq);
            assert_eq!(path.len(), PATH_LENGTH);
            assert_eq!(path.initial(), initial);
            assert_eq!(path.phases().len(), 3);
        }
    }

    #[test]
    fn test_path_replays_choices() {
        let initial = PositionState::new(1, 1).unwrap();
        let path = build_path(initial, "JHJ".parse().unwrap());
        let s = path.states();
        assert_eq!(s[1], advance(s[0]));
        assert_eq!(s[2], transform(s[1]));
        assert_eq!(s[3], advance(s[2]));
    }

    #[test]
    fn test_jjj_walks_up_the_lines() {
        let initial = PositionState::new(1, 1).unwrap();
        let path = build_path(initial, "JJJ".parse().unwrap());
        let lines: Vec<u8> = path.states().iter().map(|s| s.line_position()).collect();
        assert_eq!(lines, [1, 2, 3, 4]);
        assert!(path.states().iter().all(|s| s.hexagram_id() == 1));
    }

    #[test]
    fn test_hhh_changes_hexagram_every_step() {
        let initial = PositionState::new(1, 1).unwrap();
        let path = build_path(initial, "HHH".parse().unwrap());
        assert_eq!(path.initial(), initial);
        for (from, to) in path.steps() {
            assert_ne!(from.hexagram_id(), to.hexagram_id());
        }
    }

    #[test]
    fn test_build_path_deterministic() {
        let initial = PositionState::new(37, 4).unwrap();
        for seq in all_sequences() {
            assert_eq!(build_path(initial, seq), build_path(initial, seq));
        }
    }

    #[test]
    fn test_build_path_from_rejects_invalid_input() {
        let seq = Sequence::from_index(0).unwrap();
        assert_eq!(
            build_path_from(0, 3, seq),
            Err(HexpathError::InvalidState {
                hexagram_id: 0,
                line_position: 3
            })
        );
        assert!(build_path_from(5, 3, seq).is_ok());
    }
}
