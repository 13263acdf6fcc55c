//! Position in the hexagram/line state space.
//!
//! A `PositionState` pairs a hexagram (1..=64) with a line pointer (1..=6).
//! Fields are private so that every value in circulation is in range; raw
//! input from outside the crate goes through [`PositionState::new`] or serde,
//! both of which reject out-of-range values with `InvalidState`.

use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{HexpathError, Result};
use crate::hexagram::{table, LinePattern, HEXAGRAM_COUNT, LINE_COUNT};

/// Ordinal characters for line positions 1..=6 in classical line names.
const LINE_ORDINALS: [&str; 6] = ["初", "二", "三", "四", "五", "上"];

/// A hexagram with a line pointer. Value type: equal fields mean the same state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "RawPositionState")]
pub struct PositionState {
    hexagram_id: u8,
    line_position: u8,
}

/// Unvalidated wire shape. Extra display fields are ignored.
#[derive(Debug, Clone, Copy, Deserialize)]
struct RawPositionState {
    hexagram_id: u8,
    line_position: u8,
}

impl TryFrom<RawPositionState> for PositionState {
    type Error = HexpathError;

    fn try_from(raw: RawPositionState) -> Result<Self> {
        PositionState::new(raw.hexagram_id, raw.line_position)
    }
}

impl PositionState {
    pub fn new(hexagram_id: u8, line_position: u8) -> Result<Self> {
        if !(1..=HEXAGRAM_COUNT).contains(&hexagram_id)
            || !(1..=LINE_COUNT).contains(&line_position)
        {
            return Err(HexpathError::InvalidState {
                hexagram_id,
                line_position,
            });
        }
        Ok(Self {
            hexagram_id,
            line_position,
        })
    }

    /// Constructor for values already proven in range.
    pub(crate) fn from_parts(hexagram_id: u8, line_position: u8) -> Self {
        debug_assert!((1..=HEXAGRAM_COUNT).contains(&hexagram_id));
        debug_assert!((1..=LINE_COUNT).contains(&line_position));
        Self {
            hexagram_id,
            line_position,
        }
    }

    /// All 384 states, ordered by hexagram then line.
    pub fn all() -> impl Iterator<Item = PositionState> {
        (1..=HEXAGRAM_COUNT).flat_map(|hexagram_id| {
            (1..=LINE_COUNT).map(move |line_position| Self::from_parts(hexagram_id, line_position))
        })
    }

    pub fn hexagram_id(self) -> u8 {
        self.hexagram_id
    }

    pub fn line_position(self) -> u8 {
        self.line_position
    }

    pub fn pattern(self) -> LinePattern {
        table().pattern_of(self.hexagram_id)
    }

    /// Display name of the hexagram, e.g. `乾為天`.
    pub fn name(self) -> &'static str {
        table().name_of(self.hexagram_id)
    }

    /// Whether the line under the pointer is yang.
    pub fn is_yang(self) -> bool {
        self.pattern().bits() & (1 << (self.line_position - 1)) != 0
    }

    /// Classical name of the pointed line: `初九`/`初六`, `九二`/`六二` … `上九`/`上六`.
    pub fn line_label(self) -> String {
        let ordinal = LINE_ORDINALS[self.line_position as usize - 1];
        let kind = if self.is_yang() { "九" } else { "六" };
        match self.line_position {
            1 | 6 => format!("{ordinal}{kind}"),
            _ => format!("{kind}{ordinal}"),
        }
    }
}

impl fmt::Display for PositionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name(), self.line_label())
    }
}

impl Serialize for PositionState {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("PositionState", 4)?;
        s.serialize_field("hexagram_id", &self.hexagram_id)?;
        s.serialize_field("line_position", &self.line_position)?;
        s.serialize_field("name", self.name())?;
        s.serialize_field("line_label", &self.line_label())?;
        s.end()
    }
}
