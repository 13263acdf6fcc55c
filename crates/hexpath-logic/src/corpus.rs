//! Line-text corpus access.
//!
//! The annotator only needs one question answered: what keyword and theme
//! belong to line `line_position` of hexagram `hexagram_id`? [`LineCorpus`]
//! is that question. Any data source can sit behind it; this module ships an
//! in-memory table loadable from JSON and an empty corpus.
//!
//! JSON corpus format: an array of records.
//!
//! ```json
//! [
//!   { "hexagram": 1, "line": 1, "keyword": "潜在", "theme": "準備期間" }
//! ]
//! ```

use std::collections::HashMap;

use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::hexagram::{HEXAGRAM_COUNT, LINE_COUNT};
use crate::state::PositionState;

/// Text attached to one line of one hexagram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineEntry {
    pub keyword: String,
    pub theme: String,
}

/// Read-only lookup keyed by `(hexagram_id, line_position)`.
pub trait LineCorpus {
    fn lookup(&self, hexagram_id: u8, line_position: u8) -> Option<LineEntry>;
}

impl<T: LineCorpus + ?Sized> LineCorpus for &T {
    fn lookup(&self, hexagram_id: u8, line_position: u8) -> Option<LineEntry> {
        (**self).lookup(hexagram_id, line_position)
    }
}

impl<T: LineCorpus + ?Sized> LineCorpus for Box<T> {
    fn lookup(&self, hexagram_id: u8, line_position: u8) -> Option<LineEntry> {
        (**self).lookup(hexagram_id, line_position)
    }
}

impl<T: LineCorpus + ?Sized> LineCorpus for std::sync::Arc<T> {
    fn lookup(&self, hexagram_id: u8, line_position: u8) -> Option<LineEntry> {
        (**self).lookup(hexagram_id, line_position)
    }
}

/// A corpus with no entries. Every lookup is a data gap.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyCorpus;

impl LineCorpus for EmptyCorpus {
    fn lookup(&self, _hexagram_id: u8, _line_position: u8) -> Option<LineEntry> {
        None
    }
}

/// One record of the JSON corpus format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusRecord {
    pub hexagram: u8,
    pub line: u8,
    pub keyword: String,
    pub theme: String,
}

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("corpus entry for hexagram {hexagram} line {line} is out of range")]
    InvalidKey { hexagram: u8, line: u8 },
    #[error("duplicate corpus entry for hexagram {hexagram} line {line}")]
    Duplicate { hexagram: u8, line: u8 },
    #[error("corpus JSON could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Corpus held in a hash map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCorpus {
    entries: HashMap<(u8, u8), LineEntry>,
}

impl InMemoryCorpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry, rejecting out-of-range keys and duplicates.
    pub fn insert(
        &mut self,
        hexagram: u8,
        line: u8,
        entry: LineEntry,
    ) -> Result<(), CorpusError> {
        if PositionState::new(hexagram, line).is_err() {
            return Err(CorpusError::InvalidKey { hexagram, line });
        }
        if self.entries.contains_key(&(hexagram, line)) {
            return Err(CorpusError::Duplicate { hexagram, line });
        }
        self.entries.insert((hexagram, line), entry);
        Ok(())
    }

    pub fn from_records(
        records: impl IntoIterator<Item = CorpusRecord>,
    ) -> Result<Self, CorpusError> {
        let mut corpus = Self::new();
        for r in records {
            corpus.insert(
                r.hexagram,
                r.line,
                LineEntry {
                    keyword: r.keyword,
                    theme: r.theme,
                },
            )?;
        }
        Ok(corpus)
    }

    /// Parse the JSON record-array format.
    pub fn from_json(text: &str) -> Result<Self, CorpusError> {
        let records: Vec<CorpusRecord> = serde_json::from_str(text)?;
        let corpus = Self::from_records(records)?;
        info!(
            "loaded line corpus: {} of {} lines covered",
            corpus.len(),
            HEXAGRAM_COUNT as usize * LINE_COUNT as usize
        );
        Ok(corpus)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// States with no entry, in state order.
    pub fn missing(&self) -> Vec<PositionState> {
        PositionState::all()
            .filter(|s| {
                !self
                    .entries
                    .contains_key(&(s.hexagram_id(), s.line_position()))
            })
            .collect()
    }
}

impl LineCorpus for InMemoryCorpus {
    fn lookup(&self, hexagram_id: u8, line_position: u8) -> Option<LineEntry> {
        self.entries.get(&(hexagram_id, line_position)).cloned()
    }
}
