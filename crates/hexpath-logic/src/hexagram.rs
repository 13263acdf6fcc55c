//! The 64-hexagram table: line patterns, King Wen numbers, and display names.
//!
//! A hexagram is six stacked lines, each yang (1) or yin (0), read from the
//! bottom (line 1) to the top (line 6). Every one of the 2⁶ patterns belongs to
//! exactly one hexagram, so the table is a total bijection between patterns and
//! the King Wen numbers 1..=64.
//!
//! The process-wide table is built and validated once, on first use, by
//! [`table`]. A table that fails validation is a broken build, not a runtime
//! condition, so initialization panics rather than returning an error.
//!
//! ```
//! use hexpath_logic::hexagram::{table, LinePattern};
//!
//! let heaven = table().id_to_pattern(1).unwrap();
//! assert_eq!(heaven.to_string(), "111111");
//! let flipped = heaven.flip(1).unwrap();
//! assert_eq!(table().pattern_to_id(flipped), 44);
//! assert_eq!(table().id_to_name(44).unwrap(), "天風姤");
//! ```

use std::fmt;
use std::sync::OnceLock;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{HexpathError, Result};

/// Number of hexagrams in the table.
pub const HEXAGRAM_COUNT: u8 = 64;
/// Number of lines in a hexagram.
pub const LINE_COUNT: u8 = 6;

/// King Wen sequence: display name and lines bottom-to-top (1 = yang, 0 = yin).
pub const KING_WEN: [(&str, [u8; 6]); 64] = [
    ("乾為天", [1, 1, 1, 1, 1, 1]),
    ("坤為地", [0, 0, 0, 0, 0, 0]),
    ("水雷屯", [1, 0, 0, 0, 1, 0]),
    ("山水蒙", [0, 1, 0, 0, 0, 1]),
    ("水天需", [1, 1, 1, 0, 1, 0]),
    ("天水訟", [0, 1, 0, 1, 1, 1]),
    ("地水師", [0, 1, 0, 0, 0, 0]),
    ("水地比", [0, 0, 0, 0, 1, 0]),
    ("風天小畜", [1, 1, 1, 0, 1, 1]),
    ("天沢履", [1, 1, 0, 1, 1, 1]),
    ("地天泰", [1, 1, 1, 0, 0, 0]),
    ("天地否", [0, 0, 0, 1, 1, 1]),
    ("天火同人", [1, 0, 1, 1, 1, 1]),
    ("火天大有", [1, 1, 1, 1, 0, 1]),
    ("地山謙", [0, 0, 1, 0, 0, 0]),
    ("雷地豫", [0, 0, 0, 1, 0, 0]),
    ("沢雷随", [1, 0, 0, 1, 1, 0]),
    ("山風蠱", [0, 1, 1, 0, 0, 1]),
    ("地沢臨", [1, 1, 0, 0, 0, 0]),
    ("風地観", [0, 0, 0, 0, 1, 1]),
    ("火雷噬嗑", [1, 0, 0, 1, 0, 1]),
    ("山火賁", [1, 0, 1, 0, 0, 1]),
    ("山地剥", [0, 0, 0, 0, 0, 1]),
    ("地雷復", [1, 0, 0, 0, 0, 0]),
    ("天雷无妄", [1, 0, 0, 1, 1, 1]),
    ("山天大畜", [1, 1, 1, 0, 0, 1]),
    ("山雷頤", [1, 0, 0, 0, 0, 1]),
    ("沢風大過", [0, 1, 1, 1, 1, 0]),
    ("坎為水", [0, 1, 0, 0, 1, 0]),
    ("離為火", [1, 0, 1, 1, 0, 1]),
    ("沢山咸", [0, 0, 1, 1, 1, 0]),
    ("雷風恒", [0, 1, 1, 1, 0, 0]),
    ("天山遯", [0, 0, 1, 1, 1, 1]),
    ("雷天大壮", [1, 1, 1, 1, 0, 0]),
    ("火地晋", [0, 0, 0, 1, 0, 1]),
    ("地火明夷", [1, 0, 1, 0, 0, 0]),
    ("風火家人", [1, 0, 1, 0, 1, 1]),
    ("火沢睽", [1, 1, 0, 1, 0, 1]),
    ("水山蹇", [0, 0, 1, 0, 1, 0]),
    ("雷水解", [0, 1, 0, 1, 0, 0]),
    ("山沢損", [1, 1, 0, 0, 0, 1]),
    ("風雷益", [1, 0, 0, 0, 1, 1]),
    ("沢天夬", [1, 1, 1, 1, 1, 0]),
    ("天風姤", [0, 1, 1, 1, 1, 1]),
    ("沢地萃", [0, 0, 0, 1, 1, 0]),
    ("地風升", [0, 1, 1, 0, 0, 0]),
    ("沢水困", [0, 1, 0, 1, 1, 0]),
    ("水風井", [0, 1, 1, 0, 1, 0]),
    ("沢火革", [1, 0, 1, 1, 1, 0]),
    ("火風鼎", [0, 1, 1, 1, 0, 1]),
    ("震為雷", [1, 0, 0, 1, 0, 0]),
    ("艮為山", [0, 0, 1, 0, 0, 1]),
    ("風山漸", [0, 0, 1, 0, 1, 1]),
    ("雷沢帰妹", [1, 1, 0, 1, 0, 0]),
    ("雷火豊", [1, 0, 1, 1, 0, 0]),
    ("火山旅", [0, 0, 1, 1, 0, 1]),
    ("巽為風", [0, 1, 1, 0, 1, 1]),
    ("兌為沢", [1, 1, 0, 1, 1, 0]),
    ("風水渙", [0, 1, 0, 0, 1, 1]),
    ("水沢節", [1, 1, 0, 0, 1, 0]),
    ("風沢中孚", [1, 1, 0, 0, 1, 1]),
    ("雷山小過", [0, 0, 1, 1, 0, 0]),
    ("水火既済", [1, 0, 1, 0, 1, 0]),
    ("火水未済", [0, 1, 0, 1, 0, 1]),
];

/// Six yin/yang lines packed into the low six bits (bit 0 = line 1, the bottom).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct LinePattern(u8);

impl LinePattern {
    /// Build a pattern from packed bits. Anything above six bits is malformed.
    pub fn from_bits(bits: u8) -> Result<Self> {
        if bits >= 1 << LINE_COUNT {
            return Err(HexpathError::InvalidPattern(unpack(bits)));
        }
        Ok(Self(bits))
    }

    /// Build a pattern from lines listed bottom-to-top, each 0 or 1.
    pub fn from_lines(lines: &[u8]) -> Result<Self> {
        if lines.len() != LINE_COUNT as usize || lines.iter().any(|&l| l > 1) {
            return Err(HexpathError::InvalidPattern(lines.to_vec()));
        }
        let bits = lines
            .iter()
            .enumerate()
            .fold(0u8, |acc, (i, &line)| acc | (line << i));
        Ok(Self(bits))
    }

    /// Every valid pattern, ordered by packed value.
    pub fn all() -> impl Iterator<Item = LinePattern> {
        (0..1u8 << LINE_COUNT).map(LinePattern)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    /// Lines bottom-to-top.
    pub fn lines(self) -> [u8; 6] {
        let mut lines = [0u8; 6];
        for (i, line) in lines.iter_mut().enumerate() {
            *line = (self.0 >> i) & 1;
        }
        lines
    }

    /// Whether the line at `position` (1..=6) is yang.
    pub fn is_yang(self, position: u8) -> Result<bool> {
        let bit = line_bit(position)?;
        Ok(self.0 & bit != 0)
    }

    /// Flip the line at `position` (1..=6), yin to yang or yang to yin.
    pub fn flip(self, position: u8) -> Result<LinePattern> {
        let bit = line_bit(position)?;
        Ok(LinePattern(self.0 ^ bit))
    }

    /// `flip` for positions already known to be in 1..=6.
    pub(crate) fn toggle(self, position: u8) -> LinePattern {
        LinePattern(self.0 ^ (1 << (position - 1)))
    }
}

impl TryFrom<u8> for LinePattern {
    type Error = HexpathError;

    fn try_from(bits: u8) -> Result<Self> {
        LinePattern::from_bits(bits)
    }
}

impl From<LinePattern> for u8 {
    fn from(pattern: LinePattern) -> u8 {
        pattern.0
    }
}

impl fmt::Display for LinePattern {
    /// Lines bottom-to-top, e.g. `011111` for a yin first line under five yang lines.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            write!(f, "{line}")?;
        }
        Ok(())
    }
}

fn line_bit(position: u8) -> Result<u8> {
    if !(1..=LINE_COUNT).contains(&position) {
        return Err(HexpathError::InvalidLinePosition(position));
    }
    Ok(1 << (position - 1))
}

fn unpack(bits: u8) -> Vec<u8> {
    (0..8).map(|i| (bits >> i) & 1).collect()
}

/// Validated bijection between line patterns and hexagram numbers.
#[derive(Debug, Clone)]
pub struct HexagramTable {
    /// hexagram id - 1 → pattern
    patterns: [LinePattern; 64],
    /// pattern bits → hexagram id
    ids: [u8; 64],
    names: [&'static str; 64],
}

impl HexagramTable {
    /// Build a table from a source listing, rejecting anything that is not a
    /// total bijection over the 64 patterns.
    pub fn build(source: &[(&'static str, [u8; 6])]) -> Result<Self> {
        if source.len() != HEXAGRAM_COUNT as usize {
            return Err(HexpathError::TableSize(source.len()));
        }

        let mut patterns = [LinePattern(0); 64];
        let mut ids = [0u8; 64];
        let mut names = [""; 64];

        for (index, (name, lines)) in source.iter().enumerate() {
            let id = index as u8 + 1;
            let pattern = LinePattern::from_lines(lines)?;
            let owner = &mut ids[pattern.bits() as usize];
            if *owner != 0 {
                return Err(HexpathError::DuplicatePattern {
                    pattern: pattern.to_string(),
                    first: *owner,
                    second: id,
                });
            }
            *owner = id;
            patterns[index] = pattern;
            names[index] = *name;
        }

        // 64 distinct patterns out of 64 possible: every slot is filled.
        debug_assert!(ids.iter().all(|&id| id != 0));

        Ok(Self {
            patterns,
            ids,
            names,
        })
    }

    /// Hexagram number for a pattern. Total: every pattern has one.
    pub fn pattern_to_id(&self, pattern: LinePattern) -> u8 {
        self.ids[pattern.bits() as usize]
    }

    /// Hexagram number for raw bottom-to-top lines.
    pub fn lines_to_id(&self, lines: &[u8]) -> Result<u8> {
        Ok(self.pattern_to_id(LinePattern::from_lines(lines)?))
    }

    pub fn id_to_pattern(&self, id: u8) -> Result<LinePattern> {
        Ok(self.patterns[slot(id)?])
    }

    pub fn id_to_name(&self, id: u8) -> Result<&'static str> {
        Ok(self.names[slot(id)?])
    }

    /// Lookup for ids already known to be in range.
    pub(crate) fn pattern_of(&self, id: u8) -> LinePattern {
        self.patterns[id as usize - 1]
    }

    pub(crate) fn name_of(&self, id: u8) -> &'static str {
        self.names[id as usize - 1]
    }

    /// Re-check the bijection in both directions. Cheap; used by the harness.
    pub fn check_bijection(&self) -> Result<()> {
        for id in 1..=HEXAGRAM_COUNT {
            let pattern = self.id_to_pattern(id)?;
            let back = self.pattern_to_id(pattern);
            if back != id {
                return Err(HexpathError::DuplicatePattern {
                    pattern: pattern.to_string(),
                    first: back,
                    second: id,
                });
            }
        }
        for pattern in LinePattern::all() {
            let id = self.pattern_to_id(pattern);
            if self.id_to_pattern(id)? != pattern {
                return Err(HexpathError::InvalidHexagramId(id));
            }
        }
        Ok(())
    }
}

fn slot(id: u8) -> Result<usize> {
    if !(1..=HEXAGRAM_COUNT).contains(&id) {
        return Err(HexpathError::InvalidHexagramId(id));
    }
    Ok(id as usize - 1)
}

static TABLE: OnceLock<HexagramTable> = OnceLock::new();

/// The process-wide King Wen table, built and validated on first call.
pub fn table() -> &'static HexagramTable {
    TABLE.get_or_init(|| match HexagramTable::build(&KING_WEN) {
        Ok(table) => {
            debug!("hexagram table initialized with {} entries", HEXAGRAM_COUNT);
            table
        }
        Err(e) => panic!("King Wen table failed validation: {e}"),
    })
}
