//! hexpath Headless Self-Check Harness
//!
//! Sweeps the whole hexagram/line state space through the pure scenario
//! logic. Runs entirely in-process with no display layer or storage.
//!
//! Usage:
//!   cargo run -p hexpath-simtest
//!   cargo run -p hexpath-simtest -- --verbose
//!   cargo run -p hexpath-simtest -- --json 1 1
//!
//! Data-gap warnings are logged through `env_logger`; set `RUST_LOG=warn`
//! to see every placeholder substitution.

use std::collections::HashSet;

use hexpath_logic::config::{validate_config, NarrativeConfig};
use hexpath_logic::corpus::{InMemoryCorpus, LineCorpus};
use hexpath_logic::hexagram::{table, HexagramTable, LinePattern, KING_WEN};
use hexpath_logic::narrative::{self, Outcome};
use hexpath_logic::scenario::ScenarioSet;
use hexpath_logic::sequence::{all_sequences, build_path};
use hexpath_logic::state::PositionState;
use hexpath_logic::transition::{advance, transform};
use log::info;

// ── Sample data (same files the integration tests use) ──────────────────
const CORPUS_JSON: &str = include_str!("../../../data/line_corpus.json");
const CONFIG_JSON: &str = include_str!("../../../data/narrative_config.json");

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("error")).init();

    let args: Vec<String> = std::env::args().collect();
    let verbose = args.iter().any(|a| a == "--verbose");

    let config = match NarrativeConfig::from_json(CONFIG_JSON) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("narrative config parse error: {}", e);
            std::process::exit(2);
        }
    };
    let corpus = match InMemoryCorpus::from_json(CORPUS_JSON) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("line corpus error: {}", e);
            std::process::exit(2);
        }
    };

    if let Some(pos) = args.iter().position(|a| a == "--json") {
        std::process::exit(dump_json(&args[pos + 1..], corpus, config));
    }

    println!("=== hexpath Self-Check Harness ===\n");

    let mut results = Vec::new();

    // 1. Hexagram table bijection
    results.extend(validate_table(verbose));

    // 2. Elementary transitions over all 384 states
    results.extend(validate_transitions());

    // 3. Sequence enumeration and path shape
    results.extend(validate_enumeration(verbose));

    // 4. Canonical 乾為天 scenarios
    results.extend(validate_canonical_scenarios(&corpus, &config));

    // 5. Corpus coverage
    results.extend(validate_corpus(&corpus, verbose));

    // 6. Configuration
    results.extend(validate_configuration(&config));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

/// `--json HEX LINE`: print one scenario set for a display layer to consume.
fn dump_json(rest: &[String], corpus: InMemoryCorpus, config: NarrativeConfig) -> i32 {
    let parse = |i: usize| rest.get(i).and_then(|s| s.parse::<u8>().ok());
    let (Some(hexagram_id), Some(line_position)) = (parse(0), parse(1)) else {
        eprintln!("usage: hexpath-simtest --json <hexagram 1-64> <line 1-6>");
        return 2;
    };

    let set = match ScenarioSet::with_config(corpus, config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}", e);
            return 2;
        }
    };
    let records = match set.generate_from(hexagram_id, line_position) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("{}", e);
            return 1;
        }
    };
    match serde_json::to_string_pretty(&records) {
        Ok(json) => {
            println!("{}", json);
            0
        }
        Err(e) => {
            eprintln!("serialization error: {}", e);
            1
        }
    }
}

// ── 1. Hexagram Table ───────────────────────────────────────────────────

fn validate_table(verbose: bool) -> Vec<TestResult> {
    println!("--- Hexagram Table ---");
    let mut results = Vec::new();

    // Source listing builds into a validated table
    let built = HexagramTable::build(&KING_WEN);
    results.push(TestResult {
        name: "table_builds".into(),
        passed: built.is_ok(),
        detail: match &built {
            Ok(_) => "King Wen listing is a bijection".into(),
            Err(e) => format!("build failed: {}", e),
        },
    });

    let t = table();
    let check = t.check_bijection();
    results.push(TestResult {
        name: "table_bijection".into(),
        passed: check.is_ok(),
        detail: match &check {
            Ok(()) => "64 ids ↔ 64 patterns, both directions".into(),
            Err(e) => format!("bijection broken: {}", e),
        },
    });

    // Every pattern reaches a distinct id
    let ids: HashSet<u8> = LinePattern::all().map(|p| t.pattern_to_id(p)).collect();
    results.push(TestResult {
        name: "table_ids_distinct".into(),
        passed: ids.len() == 64 && ids.iter().all(|id| (1..=64).contains(id)),
        detail: format!("{} distinct ids from 64 patterns", ids.len()),
    });

    // Names distinct and non-empty
    let names: Vec<&str> = (1..=64).filter_map(|id| t.id_to_name(id).ok()).collect();
    let distinct_names: HashSet<&str> = names.iter().copied().collect();
    results.push(TestResult {
        name: "table_names_distinct".into(),
        passed: names.len() == 64
            && distinct_names.len() == 64
            && names.iter().all(|n| !n.is_empty()),
        detail: format!("{} names, {} distinct", names.len(), distinct_names.len()),
    });

    // Out-of-range ids rejected
    let rejects = t.id_to_pattern(0).is_err() && t.id_to_pattern(65).is_err();
    results.push(TestResult {
        name: "table_rejects_bad_ids".into(),
        passed: rejects,
        detail: "ids 0 and 65 rejected".into(),
    });

    if verbose {
        println!("  Pure hexagrams:");
        for id in [1u8, 2, 29, 30, 51, 52, 57, 58] {
            if let (Ok(name), Ok(pattern)) = (t.id_to_name(id), t.id_to_pattern(id)) {
                println!("    {:2} {:6} {}", id, name, pattern);
            }
        }
    }

    results
}

// ── 2. Transitions ──────────────────────────────────────────────────────

fn validate_transitions() -> Vec<TestResult> {
    println!("--- Transitions ---");
    let mut results = Vec::new();

    // Six advances return to the start
    let cycle_failures: Vec<PositionState> = PositionState::all()
        .filter(|&s| (0..6).fold(s, |acc, _| advance(acc)) != s)
        .collect();
    results.push(TestResult {
        name: "advance_six_cycle".into(),
        passed: cycle_failures.is_empty(),
        detail: if cycle_failures.is_empty() {
            "384/384 states return after 6 advances".into()
        } else {
            format!("{} states do not cycle", cycle_failures.len())
        },
    });

    // Advance never changes the hexagram
    let advance_moves_hex = PositionState::all()
        .filter(|&s| advance(s).hexagram_id() != s.hexagram_id())
        .count();
    results.push(TestResult {
        name: "advance_keeps_hexagram".into(),
        passed: advance_moves_hex == 0,
        detail: format!("{} states changed hexagram on advance", advance_moves_hex),
    });

    // Transform always changes the hexagram and keeps the line
    let transform_failures = PositionState::all()
        .filter(|&s| {
            let next = transform(s);
            next.hexagram_id() == s.hexagram_id() || next.line_position() != s.line_position()
        })
        .count();
    results.push(TestResult {
        name: "transform_changes_hexagram".into(),
        passed: transform_failures == 0,
        detail: format!("{} states failed transform invariants", transform_failures),
    });

    // Exactly one line differs after a transform
    let multi_line = PositionState::all()
        .filter(|&s| (s.pattern().bits() ^ transform(s).pattern().bits()).count_ones() != 1)
        .count();
    results.push(TestResult {
        name: "transform_single_line".into(),
        passed: multi_line == 0,
        detail: format!("{} transforms changed more than one line", multi_line),
    });

    results
}

// ── 3. Enumeration ──────────────────────────────────────────────────────

fn validate_enumeration(verbose: bool) -> Vec<TestResult> {
    println!("--- Sequence Enumeration ---");
    let mut results = Vec::new();

    let labels: Vec<String> = all_sequences().iter().map(|s| s.label()).collect();
    let expected = ["JJJ", "JJH", "JHJ", "JHH", "HJJ", "HJH", "HHJ", "HHH"];
    results.push(TestResult {
        name: "sequence_order".into(),
        passed: labels == expected,
        detail: labels.join(","),
    });

    // Every sequence has exactly one characterization
    let phrases: HashSet<&str> = all_sequences()
        .iter()
        .map(|&s| narrative::characterization(s))
        .collect();
    results.push(TestResult {
        name: "sequence_characterizations".into(),
        passed: phrases.len() == 8,
        detail: format!("{} distinct phrases", phrases.len()),
    });

    // Path shape and determinism over the whole state space
    let mut bad_shape = 0;
    let mut nondeterministic = 0;
    let mut outcome_counts = [0u32; 3];
    for initial in PositionState::all() {
        for seq in all_sequences() {
            let path = build_path(initial, seq);
            if path.len() != 4 || path.initial() != initial {
                bad_shape += 1;
            }
            if build_path(initial, seq) != path {
                nondeterministic += 1;
            }
            let slot = match Outcome::classify(seq, &path) {
                Outcome::ThemeContinued => 0,
                Outcome::Realigned => 1,
                Outcome::Restructured => 2,
            };
            outcome_counts[slot] += 1;
        }
    }
    results.push(TestResult {
        name: "path_shape".into(),
        passed: bad_shape == 0,
        detail: format!("{} of 3072 paths malformed", bad_shape),
    });
    results.push(TestResult {
        name: "path_determinism".into(),
        passed: nondeterministic == 0,
        detail: format!("{} of 3072 paths differed on replay", nondeterministic),
    });

    if verbose {
        println!(
            "  Outcomes over 3072 paths: continued={} realigned={} restructured={}",
            outcome_counts[0], outcome_counts[1], outcome_counts[2]
        );
    }

    results
}

// ── 4. Canonical Scenarios ──────────────────────────────────────────────

fn validate_canonical_scenarios(
    corpus: &InMemoryCorpus,
    config: &NarrativeConfig,
) -> Vec<TestResult> {
    println!("--- Canonical Scenarios (乾為天) ---");
    let mut results = Vec::new();

    let initial = match PositionState::new(1, 1) {
        Ok(s) => s,
        Err(e) => {
            results.push(TestResult {
                name: "canonical_initial".into(),
                passed: false,
                detail: e.to_string(),
            });
            return results;
        }
    };

    let next = advance(initial);
    results.push(TestResult {
        name: "canonical_advance".into(),
        passed: next.hexagram_id() == 1 && next.line_position() == 2,
        detail: format!("{} → {}", initial, next),
    });

    let next = transform(initial);
    results.push(TestResult {
        name: "canonical_transform".into(),
        passed: next.name() == "天風姤"
            && next.pattern().to_string() == "011111"
            && next.line_position() == 1,
        detail: format!("{} → {} ({})", initial, next, next.pattern()),
    });

    let set = match ScenarioSet::with_config(corpus, config.clone()) {
        Ok(s) => s,
        Err(e) => {
            results.push(TestResult {
                name: "canonical_scenario_set".into(),
                passed: false,
                detail: e.to_string(),
            });
            return results;
        }
    };
    let records = set.generate(initial);
    let again = set.generate(initial);
    results.push(TestResult {
        name: "canonical_generate".into(),
        passed: records.len() == 8 && records == again,
        detail: format!("{} records, repeat equal: {}", records.len(), records == again),
    });

    if let Some(hhh) = records.iter().find(|r| r.label.label() == "HHH") {
        let states = hhh.path.states();
        let all_change = states
            .windows(2)
            .all(|w| w[0].hexagram_id() != w[1].hexagram_id());
        results.push(TestResult {
            name: "canonical_hhh".into(),
            passed: states.len() == 4 && states[0] == initial && all_change,
            detail: states
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
                .join(" → "),
        });
    }

    for r in &records {
        info!("{} {}: {}", r.label, r.title, r.final_interpretation);
    }

    results
}

// ── 5. Corpus ───────────────────────────────────────────────────────────

fn validate_corpus(corpus: &InMemoryCorpus, verbose: bool) -> Vec<TestResult> {
    println!("--- Line Corpus ---");
    let mut results = Vec::new();

    results.push(TestResult {
        name: "corpus_not_empty".into(),
        passed: !corpus.is_empty(),
        detail: format!("{} of 384 lines covered", corpus.len()),
    });

    // Every stored entry is reachable through the lookup trait
    let reachable = PositionState::all()
        .filter(|s| corpus.lookup(s.hexagram_id(), s.line_position()).is_some())
        .count();
    results.push(TestResult {
        name: "corpus_lookup_consistent".into(),
        passed: reachable == corpus.len(),
        detail: format!("{} reachable, {} stored", reachable, corpus.len()),
    });

    // Blank text would defeat the placeholder fallback
    let blank = PositionState::all()
        .filter_map(|s| corpus.lookup(s.hexagram_id(), s.line_position()))
        .filter(|e| e.keyword.trim().is_empty() || e.theme.trim().is_empty())
        .count();
    results.push(TestResult {
        name: "corpus_entries_non_blank".into(),
        passed: blank == 0,
        detail: format!("{} entries with blank keyword or theme", blank),
    });

    if verbose {
        let missing = corpus.missing();
        let hexagrams_touched: HashSet<u8> = missing.iter().map(|s| s.hexagram_id()).collect();
        println!(
            "  {} lines missing across {} hexagrams (placeholders at runtime)",
            missing.len(),
            hexagrams_touched.len()
        );
    }

    results
}

// ── 6. Configuration ────────────────────────────────────────────────────

fn validate_configuration(config: &NarrativeConfig) -> Vec<TestResult> {
    println!("--- Configuration ---");
    let mut results = Vec::new();

    let errors = validate_config(config);
    results.push(TestResult {
        name: "config_valid".into(),
        passed: errors.is_empty(),
        detail: if errors.is_empty() {
            "narrative config valid".into()
        } else {
            errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ")
        },
    });

    // A deliberately broken config must be caught
    let broken = NarrativeConfig {
        fallback_theme: String::new(),
        cache_capacity: 0,
        ..config.clone()
    };
    let caught = validate_config(&broken).len();
    results.push(TestResult {
        name: "config_rejects_broken".into(),
        passed: caught == 2,
        detail: format!("{} errors reported for broken config", caught),
    });

    results
}
