//! Progression validation
//!
//! Drives the automaton across a full chord sequence, accumulating a
//! transition history and shaping the final verdict with its reason and
//! recovery hints.

use std::fmt::{self, Display};

use crate::automaton::{Automaton, OpeningPolicy, Rejection, State, StateSet, StepOutcome};
use crate::key::{HarmonicFunction, Key};
use crate::suggestion;

/// Split comma-separated chord text into trimmed, non-empty tokens.
pub fn tokenize(input: &str) -> Vec<&str> {
    input
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .collect()
}

/// One consumed chord and the configuration it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryStep {
    /// The chord symbol as written.
    pub chord: String,
    /// Its harmonic function in the validator's key.
    pub function: HarmonicFunction,
    /// Active states after consuming the chord.
    pub states: StateSet,
}

/// Cadence shapes recognized at the end of an accepted progression.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Cadence {
    /// Dominant function resolving to tonic function.
    Authentic,
}

impl Display for Cadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cadence::Authentic => f.write_str("Authentic Cadence: Dominant → Tonic"),
        }
    }
}

/// Final classification of a validated progression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The sequence is legal and ends on tonic function.
    Accepted {
        /// Per-step harmonic functions, for downstream annotation.
        functions: Vec<HarmonicFunction>,
        /// Closing cadence, when the trailing pair forms one.
        cadence: Option<Cadence>,
    },
    /// The sequence broke a harmony rule.
    Rejected {
        /// Index of the chord that failed.
        index: usize,
        /// Why it failed.
        reason: Rejection,
    },
    /// Legal so far, but not resolved to tonic by end of input.
    Incomplete {
        /// Chord symbols that would legally continue the progression.
        suggestions: Vec<&'static str>,
    },
}

/// Outcome of a single validation run. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    /// The verdict.
    pub verdict: Verdict,
    /// The tokenized chord sequence as consumed.
    pub chords: Vec<String>,
    /// One step per consumed chord, up to and including a rejected step.
    pub history: Vec<HistoryStep>,
    /// Active states when the run stopped.
    pub active_states: StateSet,
}

impl ValidationResult {
    /// True when the verdict is [`Verdict::Accepted`].
    pub fn is_accepted(&self) -> bool {
        matches!(self.verdict, Verdict::Accepted { .. })
    }

    /// The rejection reason, when the verdict is [`Verdict::Rejected`].
    pub fn rejection(&self) -> Option<&Rejection> {
        match &self.verdict {
            Verdict::Rejected { reason, .. } => Some(reason),
            _ => None,
        }
    }

    /// Numbered per-step breakdown naming each chord's functional role,
    /// with the closing cadence appended on accepted progressions.
    pub fn analysis(&self) -> String {
        let mut out = self
            .history
            .iter()
            .enumerate()
            .map(|(i, step)| format!("{}. {} → {}", i + 1, step.chord, step.function.description()))
            .collect::<Vec<_>>()
            .join("\n");
        if let Verdict::Accepted {
            cadence: Some(cadence),
            ..
        } = &self.verdict
        {
            out.push_str("\n\n✓ ");
            out.push_str(&cadence.to_string());
        }
        out
    }
}

/// Builder for [`Validator`].
pub struct ValidatorBuilder {
    key: Key,
    opening: OpeningPolicy,
}

impl ValidatorBuilder {
    /// Start from key C and the strict opening policy.
    pub fn new() -> Self {
        ValidatorBuilder {
            key: Key::C,
            opening: OpeningPolicy::TonicOnly,
        }
    }

    /// Set the key to validate in.
    pub fn key(mut self, key: Key) -> Self {
        self.key = key;
        self
    }

    /// Set how the opening chord is treated.
    pub fn opening(mut self, opening: OpeningPolicy) -> Self {
        self.opening = opening;
        self
    }

    /// Build the `Validator`.
    pub fn build(self) -> Validator {
        Validator {
            key: self.key,
            automaton: Automaton::new(self.opening),
        }
    }
}

impl Default for ValidatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Validates chord progressions against functional-harmony rules in a
/// fixed key.
///
/// The validator holds no mutable state; every run owns its locals and
/// recomputes from the key's tables, so two validators in different keys
/// can run concurrently and switching keys is just constructing a new
/// validator — nothing derived can desynchronize.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Validator {
    key: Key,
    automaton: Automaton,
}

impl Validator {
    /// Return a builder to customize key and opening policy.
    pub fn builder() -> ValidatorBuilder {
        ValidatorBuilder::new()
    }

    /// Validator for `key` with the default opening policy.
    pub fn new(key: Key) -> Self {
        Validator {
            key,
            automaton: Automaton::default(),
        }
    }

    /// The key in force.
    pub const fn key(&self) -> Key {
        self.key
    }

    /// The underlying automaton.
    pub const fn automaton(&self) -> &Automaton {
        &self.automaton
    }

    /// Tokenize and validate comma-separated chord text.
    ///
    /// Returns `None` when the input holds no chords — the neutral
    /// "nothing to validate" state, distinct from any verdict.
    pub fn validate_str(&self, input: &str) -> Option<ValidationResult> {
        self.validate(&tokenize(input))
    }

    /// Validate a tokenized chord sequence.
    ///
    /// `None` when `chords` is empty. Otherwise the automaton is stepped
    /// from `{START}` over the classified function of each chord in
    /// turn; the first unknown chord or illegal step stops the run with
    /// a [`Verdict::Rejected`] carrying the failing index and reason.
    pub fn validate(&self, chords: &[&str]) -> Option<ValidationResult> {
        if chords.is_empty() {
            return None;
        }
        let owned = |list: &[&str]| list.iter().map(|c| c.to_string()).collect::<Vec<_>>();

        let mut active = StateSet::START;
        let mut history = Vec::with_capacity(chords.len());
        for (index, &chord) in chords.iter().enumerate() {
            let Some(function) = self.key.classify(chord) else {
                // Hard stop: remaining chords are not processed and the
                // failing chord contributes no history step.
                return Some(ValidationResult {
                    verdict: Verdict::Rejected {
                        index,
                        reason: Rejection::unknown_chord(chord, self.key),
                    },
                    chords: owned(chords),
                    history,
                    active_states: StateSet::EMPTY,
                });
            };
            let prev = index.checked_sub(1).map(|i| chords[i]);
            match self.automaton.step(active, function, chord, prev) {
                StepOutcome::Reject(reason) => {
                    history.push(HistoryStep {
                        chord: chord.to_string(),
                        function,
                        states: StateSet::single(State::Reject),
                    });
                    return Some(ValidationResult {
                        verdict: Verdict::Rejected { index, reason },
                        chords: owned(chords),
                        history,
                        active_states: StateSet::single(State::Reject),
                    });
                }
                StepOutcome::Continue(next) => {
                    history.push(HistoryStep {
                        chord: chord.to_string(),
                        function,
                        states: next,
                    });
                    active = next;
                }
            }
        }

        let verdict = if active.contains(State::Tonic) {
            let functions: Vec<_> = history.iter().map(|step| step.function).collect();
            let cadence = closing_cadence(&functions);
            Verdict::Accepted { functions, cadence }
        } else {
            Verdict::Incomplete {
                suggestions: suggestion::next_chords(&self.automaton, active, self.key),
            }
        };
        Some(ValidationResult {
            verdict,
            chords: owned(chords),
            history,
            active_states: active,
        })
    }

    /// Active states after consuming `chords` through the transition
    /// relation alone — prefix reachability for live feedback. The empty
    /// set means the prefix is not viable (unknown chord or dead end).
    pub fn active_states(&self, chords: &[&str]) -> StateSet {
        let mut active = StateSet::START;
        for &chord in chords {
            let Some(function) = self.key.classify(chord) else {
                return StateSet::EMPTY;
            };
            active = self.automaton.advance(active, function);
            if active.is_empty() {
                return StateSet::EMPTY;
            }
        }
        active
    }

    /// Type-ahead hints for partially typed input: the chord symbols
    /// that may legally come next. Empty input hints at openings; a
    /// non-viable prefix yields no hints.
    pub fn live_suggestions(&self, input: &str) -> Vec<&'static str> {
        let chords = tokenize(input);
        let active = self.active_states(&chords);
        if active.is_empty() {
            return Vec::new();
        }
        suggestion::next_chords(&self.automaton, active, self.key)
    }
}

/// Closing cadence of an accepted function sequence: a trailing
/// dominant-function → tonic-function pair is an authentic cadence.
fn closing_cadence(functions: &[HarmonicFunction]) -> Option<Cadence> {
    use HarmonicFunction as F;
    let len = functions.len();
    if len < 2 {
        return None;
    }
    let dominant = matches!(functions[len - 2], F::Dominant | F::LeadingTone);
    let tonic = matches!(functions[len - 1], F::Tonic | F::Submediant | F::Mediant);
    (dominant && tonic).then_some(Cadence::Authentic)
}
