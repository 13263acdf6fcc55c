//! Human-readable text for scenario paths.
//!
//! Every state after the initial one is looked up in the line corpus. A
//! missing entry is a data gap, not an error: the annotator substitutes a
//! placeholder keyword (`卦{id}・爻{line}`) and the configured fallback theme,
//! logs a warning, and carries on, so the display layer always receives a
//! complete annotation.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::config::NarrativeConfig;
use crate::corpus::{LineCorpus, LineEntry};
use crate::sequence::{Path, Sequence, SEQUENCE_COUNT};
use crate::state::PositionState;
use crate::transition::Choice;

/// Keyword and theme for one non-initial state of a path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseAnnotation {
    pub state: PositionState,
    pub keyword: String,
    pub theme: String,
    /// True when the corpus had no entry and placeholder text was used.
    pub placeholder: bool,
}

/// How one step relates to the step before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeShift {
    /// Same hexagram, next line.
    Continued,
    /// The hexagram changed.
    Reframed,
}

impl ThemeShift {
    pub fn for_choice(choice: Choice) -> Self {
        match choice {
            Choice::Advance => ThemeShift::Continued,
            Choice::Transform => ThemeShift::Reframed,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ThemeShift::Continued => "継続",
            ThemeShift::Reframed => "転換",
        }
    }
}

/// One step of a scenario, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseStep {
    /// 1..=3
    pub phase: u8,
    pub choice: Choice,
    pub from: PositionState,
    pub to: PositionState,
    pub keyword: String,
    pub theme: String,
    pub shift: ThemeShift,
    /// `"{from} → {to}（継続|転換）"`
    pub summary: String,
    pub placeholder: bool,
}

/// Where a scenario ends up relative to where it started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// No transform at all; the starting hexagram carries through.
    ThemeContinued,
    /// Transforms happened but cancelled out; back on the starting hexagram.
    Realigned,
    /// Ends on a different hexagram.
    Restructured,
}

impl Outcome {
    pub fn classify(sequence: Sequence, path: &Path) -> Self {
        if sequence.transform_count() == 0 {
            Outcome::ThemeContinued
        } else if path.last().hexagram_id() == path.initial().hexagram_id() {
            Outcome::Realigned
        } else {
            Outcome::Restructured
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            Outcome::ThemeContinued => "（テーマ継続）",
            Outcome::Realigned => "（再整流）",
            Outcome::Restructured => "（構造転換）",
        }
    }
}

/// A term used in a path, with a plain explanation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlossaryEntry {
    pub term: String,
    pub tip: String,
}

const CHARACTERIZATIONS: [&str; SEQUENCE_COUNT] = [
    "着実に現在の道を深めていく安定路線です。",
    "基盤を固めてから新しい挑戦に踏み出します。",
    "早めに方向転換し、新たな道を開拓します。",
    "大胆に変化を受け入れ、全く新しい境地へ。",
    "一度リセットしてから着実に再構築します。",
    "変化と安定を交互に繰り返しながら進みます。",
    "二度の大きな転換を経て新境地に到達します。",
    "完全な変革を通じて生まれ変わります。",
];

const TITLES: [&str; SEQUENCE_COUNT] = [
    "一貫深化",
    "二段深化→視点切替",
    "深化→視点切替→再深化",
    "初動深化→連続切替",
    "視点切替→二段深化",
    "視点切替→深化→再切替",
    "連続切替→深化",
    "連続視点切替",
];

/// Fixed one-line characterization of a sequence.
pub fn characterization(sequence: Sequence) -> &'static str {
    CHARACTERIZATIONS[sequence.index()]
}

/// Short display title of a sequence.
pub fn title(sequence: Sequence) -> &'static str {
    TITLES[sequence.index()]
}

/// Glossary for the operations a sequence uses, in first-use order.
pub fn glossary(sequence: Sequence) -> Vec<GlossaryEntry> {
    let mut seen: Vec<Choice> = Vec::with_capacity(2);
    for choice in sequence.choices() {
        if !seen.contains(&choice) {
            seen.push(choice);
        }
    }
    seen.into_iter()
        .map(|choice| GlossaryEntry {
            term: choice.term().to_string(),
            tip: match choice {
                Choice::Advance => "状況を一歩進める判断。同じ卦のまま次の爻へ移ります。",
                Choice::Transform => "方向を切り替える判断。今の爻の陰陽が反転し、別の卦に移ります。",
            }
            .to_string(),
        })
        .collect()
}

/// Placeholder keyword for a data gap.
pub fn placeholder_keyword(state: PositionState) -> String {
    format!("卦{}・爻{}", state.hexagram_id(), state.line_position())
}

/// Attaches corpus text to paths.
#[derive(Debug, Clone)]
pub struct NarrativeAnnotator<C> {
    corpus: C,
    config: NarrativeConfig,
}

impl<C: LineCorpus> NarrativeAnnotator<C> {
    pub fn new(corpus: C, config: NarrativeConfig) -> Self {
        Self { corpus, config }
    }

    pub fn config(&self) -> &NarrativeConfig {
        &self.config
    }

    pub fn corpus(&self) -> &C {
        &self.corpus
    }

    /// Look up one state, falling back to placeholder text on a data gap.
    pub fn annotate_state(&self, state: PositionState) -> PhaseAnnotation {
        match self
            .corpus
            .lookup(state.hexagram_id(), state.line_position())
        {
            Some(LineEntry { keyword, theme }) => PhaseAnnotation {
                state,
                keyword,
                theme,
                placeholder: false,
            },
            None => {
                warn!(
                    "no corpus entry for hexagram {} line {}; using placeholder",
                    state.hexagram_id(),
                    state.line_position()
                );
                PhaseAnnotation {
                    state,
                    keyword: placeholder_keyword(state),
                    theme: self.config.fallback_theme.clone(),
                    placeholder: true,
                }
            }
        }
    }

    /// One annotation per state after the initial one.
    pub fn annotate(&self, path: &Path) -> Vec<PhaseAnnotation> {
        path.phases()
            .iter()
            .map(|&state| self.annotate_state(state))
            .collect()
    }

    /// Chain the phase keywords behind the sequence characterization and
    /// name the final state.
    pub fn compose_final_interpretation(
        &self,
        sequence: Sequence,
        path: &Path,
        annotations: &[PhaseAnnotation],
    ) -> String {
        let chain = annotations
            .iter()
            .map(|a| a.keyword.as_str())
            .collect::<Vec<_>>()
            .join(&self.config.phase_separator);
        let last = path.last();
        let final_theme = annotations
            .last()
            .map(|a| a.theme.as_str())
            .unwrap_or(self.config.fallback_theme.as_str());
        format!(
            "{} {}を経て、{}に至ります（{}）。",
            characterization(sequence),
            chain,
            last,
            final_theme
        )
    }

    /// Per-step display records for a path and its annotations.
    pub fn phase_steps(
        &self,
        sequence: Sequence,
        path: &Path,
        annotations: &[PhaseAnnotation],
    ) -> Vec<PhaseStep> {
        path.steps()
            .zip(sequence.choices())
            .zip(annotations)
            .enumerate()
            .map(|(i, (((from, to), choice), annotation))| {
                let shift = ThemeShift::for_choice(choice);
                PhaseStep {
                    phase: i as u8 + 1,
                    choice,
                    from,
                    to,
                    keyword: annotation.keyword.clone(),
                    theme: annotation.theme.clone(),
                    shift,
                    summary: format!("{from} → {to}（{}）", shift.label()),
                    placeholder: annotation.placeholder,
                }
            })
            .collect()
    }
}
