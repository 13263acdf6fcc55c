//! Integration tests for the full scenario pipeline.
//!
//! Exercises: PositionState → Sequence enumeration → Path replay
//! → corpus annotation → ScenarioRecord
//!
//! All tests are pure logic: the corpus is the sample data file the
//! harness ships with, loaded from JSON.

use hexpath_logic::corpus::{EmptyCorpus, InMemoryCorpus};
use hexpath_logic::hexagram::{table, LinePattern};
use hexpath_logic::narrative::Outcome;
use hexpath_logic::scenario::{CachedScenarioSet, ScenarioRecord, ScenarioSet};
use hexpath_logic::sequence::{all_sequences, build_path};
use hexpath_logic::state::PositionState;
use hexpath_logic::transition::{advance, transform, Choice};
use hexpath_logic::HexpathError;

const CORPUS_JSON: &str = include_str!("../../../data/line_corpus.json");

// ── Helpers ────────────────────────────────────────────────────────────

fn sample_set() -> ScenarioSet<InMemoryCorpus> {
    let corpus = InMemoryCorpus::from_json(CORPUS_JSON).expect("sample corpus parses");
    ScenarioSet::new(corpus)
}

fn heaven() -> PositionState {
    PositionState::new(1, 1).unwrap()
}

fn find<'a>(records: &'a [ScenarioRecord], label: &str) -> &'a ScenarioRecord {
    records
        .iter()
        .find(|r| r.label.to_string() == label)
        .unwrap_or_else(|| panic!("no scenario {label}"))
}

// ── Canonical scenarios ────────────────────────────────────────────────

#[test]
fn heaven_advance_moves_to_second_line() {
    let next = advance(heaven());
    assert_eq!(next.hexagram_id(), 1);
    assert_eq!(next.line_position(), 2);
}

#[test]
fn heaven_transform_resolves_to_gou() {
    let next = transform(heaven());
    assert_eq!(next.pattern(), LinePattern::from_lines(&[0, 1, 1, 1, 1, 1]).unwrap());
    assert_eq!(next.name(), "天風姤");
    assert_eq!(next.line_position(), 1);
}

#[test]
fn hhh_from_heaven_changes_hexagram_every_step() {
    let records = sample_set().generate(heaven());
    let hhh = find(&records, "HHH");
    let states = hhh.path.states();
    assert_eq!(states.len(), 4);
    assert_eq!(states[0], heaven());
    assert_eq!(states[0].name(), "乾為天");
    for pair in states.windows(2) {
        assert_ne!(pair[0].hexagram_id(), pair[1].hexagram_id());
    }
    assert!(hhh.phases.iter().all(|p| p.choice == Choice::Transform));
}

// ── Pipeline coherence ────────────────────────────────────────────────

#[test]
fn output_order_matches_sequence_order() {
    let records = sample_set().generate(PositionState::new(11, 5).unwrap());
    let expected: Vec<_> = all_sequences().to_vec();
    let actual: Vec<_> = records.iter().map(|r| r.label).collect();
    assert_eq!(actual, expected);
}

#[test]
fn deterministic_output() {
    let set = sample_set();
    for initial in [heaven(), PositionState::new(2, 6).unwrap(), PositionState::new(63, 3).unwrap()] {
        assert_eq!(set.generate(initial), set.generate(initial));
    }
}

#[test]
fn records_match_direct_path_replay() {
    let set = sample_set();
    let initial = PositionState::new(47, 2).unwrap();
    for (record, sequence) in set.generate(initial).iter().zip(all_sequences()) {
        assert_eq!(record.path, build_path(initial, sequence));
    }
}

#[test]
fn every_path_has_four_states_across_state_space() {
    let set = ScenarioSet::new(EmptyCorpus);
    for (initial, records) in set.generate_all() {
        assert_eq!(records.len(), 8);
        for r in &records {
            assert_eq!(r.path.len(), 4, "scenario {} from {initial}", r.label);
            assert_eq!(r.path.initial(), initial);
        }
    }
}

#[test]
fn invalid_input_fails_the_whole_call() {
    let set = sample_set();
    assert_eq!(
        set.generate_from(65, 1),
        Err(HexpathError::InvalidState {
            hexagram_id: 65,
            line_position: 1
        })
    );
    assert!(set.generate_from(0, 0).is_err());
}

// ── Corpus annotation ─────────────────────────────────────────────────

#[test]
fn sample_corpus_annotates_heaven_advances() {
    let records = sample_set().generate(heaven());
    let jjj = find(&records, "JJJ");
    assert_eq!(jjj.phase_keywords(), ["発現", "努力", "選択"]);
    assert!(jjj.final_interpretation.contains("発現→努力→選択"));
    assert_eq!(jjj.outcome, Outcome::ThemeContinued);
    assert!(jjj.title.ends_with("（テーマ継続）"));
}

#[test]
fn data_gaps_become_placeholders() {
    let records = sample_set().generate(heaven());
    let hjj = find(&records, "HJJ");
    assert_eq!(hjj.phase_keywords(), ["卦44・爻1", "卦44・爻2", "卦44・爻3"]);
    assert!(hjj.phases.iter().all(|p| p.placeholder));
    assert_eq!(hjj.outcome, Outcome::Restructured);
}

#[test]
fn realigned_when_transforms_cancel() {
    let records = sample_set().generate(heaven());
    let hhj = find(&records, "HHJ");
    assert_eq!(hhj.path.last(), PositionState::new(1, 2).unwrap());
    assert_eq!(hhj.outcome, Outcome::Realigned);
    // Back on 乾為天 九二, which the sample corpus covers.
    assert_eq!(hhj.phases[2].keyword, "発現");
    assert!(!hhj.phases[2].placeholder);
}

// ── Cache and serialization ───────────────────────────────────────────

#[test]
fn cached_set_matches_uncached() {
    let mut cached = CachedScenarioSet::new(sample_set());
    for initial in PositionState::all().take(20) {
        let fresh = cached.inner().generate(initial);
        assert_eq!(cached.generate(initial), fresh);
        assert_eq!(cached.generate(initial), fresh);
    }
    assert_eq!(cached.cache_size(), 20);
}

#[test]
fn json_output_round_trips() {
    let records = sample_set().generate(heaven());
    let json = serde_json::to_string_pretty(&records).unwrap();
    let back: Vec<ScenarioRecord> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, records);
}

#[test]
fn table_names_are_unique() {
    let names: std::collections::HashSet<_> =
        (1..=64).map(|id| table().id_to_name(id).unwrap()).collect();
    assert_eq!(names.len(), 64);
}
