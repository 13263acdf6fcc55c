//! Scenario generation: one initial state in, eight annotated futures out.
//!
//! `ScenarioSet::generate` is a pure function of the initial state (given a
//! stable corpus). Records come back in canonical sequence order, `JJJ`
//! first and `HHH` last. `CachedScenarioSet` memoizes whole result sets per
//! initial state with a bounded cache.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::{validate_config, NarrativeConfig};
use crate::corpus::LineCorpus;
use crate::error::{HexpathError, Result};
use crate::narrative::{self, GlossaryEntry, NarrativeAnnotator, Outcome, PhaseStep};
use crate::sequence::{all_sequences, build_path, Path, Sequence};
use crate::state::PositionState;

/// One fully annotated future.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioRecord {
    /// Sequence label, e.g. `JHJ`.
    pub label: Sequence,
    /// Display title with outcome suffix, e.g. `一貫深化（テーマ継続）`.
    pub title: String,
    pub outcome: Outcome,
    pub path: Path,
    pub phases: Vec<PhaseStep>,
    pub final_interpretation: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub glossary: Vec<GlossaryEntry>,
}

impl ScenarioRecord {
    /// Keyword per non-initial state, in path order.
    pub fn phase_keywords(&self) -> Vec<&str> {
        self.phases.iter().map(|p| p.keyword.as_str()).collect()
    }
}

/// Entry point tying enumeration and annotation together.
#[derive(Debug, Clone)]
pub struct ScenarioSet<C> {
    annotator: NarrativeAnnotator<C>,
}

impl<C: LineCorpus> ScenarioSet<C> {
    /// Scenario set with the default narrative configuration.
    pub fn new(corpus: C) -> Self {
        Self {
            annotator: NarrativeAnnotator::new(corpus, NarrativeConfig::default()),
        }
    }

    pub fn with_config(corpus: C, config: NarrativeConfig) -> Result<Self> {
        let errors = validate_config(&config);
        if !errors.is_empty() {
            return Err(HexpathError::Config(errors));
        }
        Ok(Self {
            annotator: NarrativeAnnotator::new(corpus, config),
        })
    }

    pub fn config(&self) -> &NarrativeConfig {
        self.annotator.config()
    }

    pub fn annotator(&self) -> &NarrativeAnnotator<C> {
        &self.annotator
    }

    /// Eight records, one per sequence, in canonical order.
    pub fn generate(&self, initial: PositionState) -> Vec<ScenarioRecord> {
        all_sequences()
            .into_iter()
            .map(|sequence| self.scenario(initial, sequence))
            .collect()
    }

    /// `generate` for raw input; out-of-range values fail before any work.
    pub fn generate_from(&self, hexagram_id: u8, line_position: u8) -> Result<Vec<ScenarioRecord>> {
        let initial = PositionState::new(hexagram_id, line_position)?;
        Ok(self.generate(initial))
    }

    /// Scenarios for every one of the 384 initial states, in state order.
    pub fn generate_all(&self) -> Vec<(PositionState, Vec<ScenarioRecord>)> {
        PositionState::all()
            .map(|initial| (initial, self.generate(initial)))
            .collect()
    }

    /// Build and annotate a single sequence.
    pub fn scenario(&self, initial: PositionState, sequence: Sequence) -> ScenarioRecord {
        let path = build_path(initial, sequence);
        let annotations = self.annotator.annotate(&path);
        let outcome = Outcome::classify(sequence, &path);
        let glossary = if self.config().include_glossary {
            narrative::glossary(sequence)
        } else {
            Vec::new()
        };
        ScenarioRecord {
            label: sequence,
            title: format!("{}{}", narrative::title(sequence), outcome.suffix()),
            outcome,
            phases: self.annotator.phase_steps(sequence, &path, &annotations),
            final_interpretation: self
                .annotator
                .compose_final_interpretation(sequence, &path, &annotations),
            path,
            glossary,
        }
    }
}

/// `ScenarioSet` with a bounded per-initial-state cache.
pub struct CachedScenarioSet<C> {
    inner: ScenarioSet<C>,
    cache: HashMap<PositionState, Vec<ScenarioRecord>>,
    cache_capacity: usize,
}

impl<C: LineCorpus> CachedScenarioSet<C> {
    /// Cache capacity comes from the scenario set's config.
    pub fn new(inner: ScenarioSet<C>) -> Self {
        let cache_capacity = inner.config().cache_capacity;
        Self {
            inner,
            cache: HashMap::new(),
            cache_capacity,
        }
    }

    pub fn generate(&mut self, initial: PositionState) -> Vec<ScenarioRecord> {
        if let Some(cached) = self.cache.get(&initial) {
            return cached.clone();
        }

        let records = self.inner.generate(initial);

        if self.cache.len() >= self.cache_capacity {
            // Evict an arbitrary entry (HashMap iteration order)
            if let Some(&evict_key) = self.cache.keys().next() {
                self.cache.remove(&evict_key);
            }
        }
        self.cache.insert(initial, records.clone());

        records
    }

    pub fn inner(&self) -> &ScenarioSet<C> {
        &self.inner
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Number of cached initial states.
    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}
