//! The two elementary moves through the state space.
//!
//! - **Advance** (進爻, label `J`): the line pointer moves up one line,
//!   wrapping from 6 back to 1. The hexagram does not change.
//! - **Transform** (変爻, label `H`): the line under the pointer flips between
//!   yin and yang, which always lands on a different hexagram. The pointer
//!   stays on the same line.
//!
//! Both are total over valid states and have no side effects.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::hexagram::{table, LINE_COUNT};
use crate::state::PositionState;

/// One elementary choice within a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Choice {
    /// 進爻: move the pointer to the next line.
    #[serde(rename = "J")]
    Advance,
    /// 変爻: flip the pointed line.
    #[serde(rename = "H")]
    Transform,
}

impl Choice {
    /// Single-letter label used in sequence names.
    pub fn label(self) -> char {
        match self {
            Choice::Advance => 'J',
            Choice::Transform => 'H',
        }
    }

    pub fn from_label(label: char) -> Option<Self> {
        match label {
            'J' => Some(Choice::Advance),
            'H' => Some(Choice::Transform),
            _ => None,
        }
    }

    /// Classical term for the move.
    pub fn term(self) -> &'static str {
        match self {
            Choice::Advance => "進爻",
            Choice::Transform => "変爻",
        }
    }

    pub fn apply(self, state: PositionState) -> PositionState {
        match self {
            Choice::Advance => advance(state),
            Choice::Transform => transform(state),
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Move the pointer to the next line, wrapping 6 → 1.
pub fn advance(state: PositionState) -> PositionState {
    let next_line = (state.line_position() % LINE_COUNT) + 1;
    PositionState::from_parts(state.hexagram_id(), next_line)
}

/// Flip the pointed line and look up the resulting hexagram.
pub fn transform(state: PositionState) -> PositionState {
    let t = table();
    let line = state.line_position();
    let flipped = t.pattern_of(state.hexagram_id()).toggle(line);
    PositionState::from_parts(t.pattern_to_id(flipped), line)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heaven_first_line() -> PositionState {
        PositionState::new(1, 1).unwrap()
    }

    #[test]
    fn test_advance_keeps_hexagram() {
        let next = advance(heaven_first_line());
        assert_eq!(next.hexagram_id(), 1);
        assert_eq!(next.line_position(), 2);
    }

    #[test]
    fn test_advance_wraps_top_line() {
        let top = PositionState::new(11, 6).unwrap();
        let next = advance(top);
        assert_eq!(next, PositionState::new(11, 1).unwrap());
    }

    #[test]
    fn test_six_advances_return_to_start() {
        for state in PositionState::all() {
            let mut s = state;
            for _ in 0..6 {
                s = advance(s);
            }
            assert_eq!(s, state);
        }
    }

    #[test]
    fn test_transform_heaven_first_line_gives_gou() {
        let next = transform(heaven_first_line());
        assert_eq!(next.hexagram_id(), 44);
        assert_eq!(next.name(), "天風姤");
        assert_eq!(next.pattern().to_string(), "011111");
        assert_eq!(next.line_position(), 1);
    }

    #[test]
    fn test_transform_always_changes_hexagram() {
        for state in PositionState::all() {
            let next = transform(state);
            assert_ne!(next.hexagram_id(), state.hexagram_id(), "state {state}");
            assert_eq!(next.line_position(), state.line_position());
        }
    }

    #[test]
    fn test_transform_changes_exactly_one_line() {
        for state in PositionState::all() {
            let before = state.pattern().bits();
            let after = transform(state).pattern().bits();
            assert_eq!((before ^ after).count_ones(), 1);
            assert_eq!(before ^ after, 1 << (state.line_position() - 1));
        }
    }

    #[test]
    fn test_transform_is_an_involution() {
        for state in PositionState::all() {
            assert_eq!(transform(transform(state)), state);
        }
    }

    #[test]
    fn test_transform_flips_pointed_line_kind() {
        let tai_fifth = PositionState::new(11, 5).unwrap();
        assert!(!tai_fifth.is_yang());
        assert!(transform(tai_fifth).is_yang());
    }

    #[test]
    fn test_choice_labels() {
        assert_eq!(Choice::from_label('J'), Some(Choice::Advance));
        assert_eq!(Choice::from_label('H'), Some(Choice::Transform));
        assert_eq!(Choice::from_label('X'), None);
        assert_eq!(Choice::Advance.to_string(), "J");
        assert_eq!(Choice::Transform.term(), "変爻");
        assert_eq!(serde_json::to_string(&Choice::Transform).unwrap(), "\"H\"");
    }
}
