//! Pure scenario logic for hexpath.
//!
//! Given a starting position in the 64-hexagram / 6-line state space, this
//! crate enumerates the eight three-step futures reachable by the two
//! elementary moves (advance and transform) and annotates each one with text
//! from a line corpus. Nothing here touches a database, a renderer, or the
//! network; functions take plain data and return results, so the same logic
//! serves the headless harness and any display layer.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | Narrative configuration and validation |
//! | [`corpus`] | Line-text corpus trait, in-memory and empty corpora |
//! | [`error`] | Shared error type |
//! | [`hexagram`] | King Wen table: pattern ↔ id bijection, display names |
//! | [`narrative`] | Phase annotation, interpretations, titles, glossary |
//! | [`scenario`] | Eight-scenario generation, batch sweep, bounded cache |
//! | [`sequence`] | The eight J/H sequences and path replay |
//! | [`state`] | Validated hexagram/line position and line labels |
//! | [`transition`] | Advance (進爻) and transform (変爻) moves |
//!
//! ```
//! use hexpath_logic::corpus::EmptyCorpus;
//! use hexpath_logic::scenario::ScenarioSet;
//! use hexpath_logic::state::PositionState;
//!
//! let set = ScenarioSet::new(EmptyCorpus);
//! let records = set.generate(PositionState::new(1, 1).unwrap());
//! assert_eq!(records.len(), 8);
//! assert_eq!(records[7].label.to_string(), "HHH");
//! ```

pub mod config;
pub mod corpus;
pub mod error;
pub mod hexagram;
pub mod narrative;
pub mod scenario;
pub mod sequence;
pub mod state;
pub mod transition;

pub use error::{HexpathError, Result};
