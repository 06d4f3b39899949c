//! Progression automaton
//!
//! The fixed NFA over harmonic-function symbols: state enum, bitset
//! configuration, transition relation, and the named illegal-transition
//! rules layered on top of it. True NFA semantics — a set of active states
//! is tracked and transition targets are unioned at every step, no subset
//! construction.

use std::fmt::{self, Display};
use thiserror::Error;

use crate::key::{HarmonicFunction, Key};

const NUM_STATES: usize = 5;

/// States of the progression automaton.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum State {
    /// No input consumed yet.
    Start,
    /// Tonic function reached; the sole accept state.
    Tonic,
    /// Predominant function active.
    Predominant,
    /// Dominant function active.
    Dominant,
    /// Absorbing failure state.
    Reject,
}

impl State {
    /// Every state, in bit order.
    pub const ALL: [State; NUM_STATES] = [
        State::Start,
        State::Tonic,
        State::Predominant,
        State::Dominant,
        State::Reject,
    ];

    /// Uppercase diagram label.
    pub const fn label(self) -> &'static str {
        match self {
            State::Start => "START",
            State::Tonic => "TONIC",
            State::Predominant => "PREDOMINANT",
            State::Dominant => "DOMINANT",
            State::Reject => "REJECT",
        }
    }
}

impl Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A set of automaton states — the NFA's current configuration.
///
/// Backed by a bitmask over the five-state enum, so unions and membership
/// tests are single integer operations and duplicate reachability through
/// different branches collapses to one membership.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct StateSet(u8);

impl StateSet {
    /// The empty set.
    pub const EMPTY: StateSet = StateSet(0);

    /// The initial configuration, `{START}`.
    pub const START: StateSet = StateSet::single(State::Start);

    /// Set containing exactly `state`.
    pub const fn single(state: State) -> StateSet {
        StateSet(1 << state as u8)
    }

    /// Whether `state` is a member.
    pub const fn contains(self, state: State) -> bool {
        self.0 & (1 << state as u8) != 0
    }

    /// Add `state` in place.
    pub fn insert(&mut self, state: State) {
        self.0 |= 1 << state as u8;
    }

    /// Union of the two sets.
    pub const fn union(self, other: StateSet) -> StateSet {
        StateSet(self.0 | other.0)
    }

    /// True when no state is active.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of member states.
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Member states, in bit order.
    pub fn iter(self) -> impl Iterator<Item = State> {
        State::ALL.into_iter().filter(move |&state| self.contains(state))
    }
}

impl FromIterator<State> for StateSet {
    fn from_iter<I: IntoIterator<Item = State>>(iter: I) -> Self {
        let mut set = StateSet::EMPTY;
        for state in iter {
            set.insert(state);
        }
        set
    }
}

impl Display for StateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("(none)");
        }
        let mut first = true;
        for state in self.iter() {
            if !first {
                f.write_str(" or ")?;
            }
            f.write_str(state.label())?;
            first = false;
        }
        Ok(())
    }
}

impl fmt::Debug for StateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Why a progression was rejected.
///
/// Each variant renders its full user-facing explanation through
/// `Display`; [`Rejection::rule`] gives the short rule name for headlines
/// and assertions. Named harmony rules are distinct from the generic
/// missing-transition failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// The token is not in the key's diatonic alphabet.
    #[error("The chord \"{chord}\" is not recognized in {key}. Supported chord symbols: {supported}")]
    UnknownChord {
        /// The offending token.
        chord: String,
        /// The key the token failed to classify under.
        key: Key,
        /// Comma-separated list of the key's supported symbols.
        supported: String,
    },

    /// Dominant function fell back to predominant function.
    #[error("Cannot move from Dominant ({prev}) to Predominant ({chord}). This creates a \"retrograde\" motion which weakens the harmonic resolution.")]
    Retrograde {
        /// The dominant-function chord that preceded the offending one.
        prev: String,
        /// The offending predominant-function chord.
        chord: String,
    },

    /// Predominant function tried to resolve straight to tonic function.
    #[error("Predominant function cannot resolve directly to Tonic. It must first move to Dominant (V or vii°).")]
    SkippedDominant,

    /// The opening chord did not carry tonic function.
    #[error("A progression must open with a tonic-function chord (I, vi, or iii); \"{chord}\" is {function}.")]
    NonTonicOpening {
        /// The offending opening chord.
        chord: String,
        /// Its harmonic function.
        function: HarmonicFunction,
    },

    /// No transition exists and no named rule matched.
    #[error("The chord \"{chord}\" ({function}) cannot follow the previous chord(s) according to functional harmony rules (active states: {states}).")]
    NoTransition {
        /// The offending chord.
        chord: String,
        /// Its harmonic function.
        function: HarmonicFunction,
        /// The configuration the chord could not advance.
        states: StateSet,
    },
}

impl Rejection {
    /// Unknown-chord rejection listing the key's supported symbols.
    pub fn unknown_chord(chord: &str, key: Key) -> Rejection {
        Rejection::UnknownChord {
            chord: chord.to_string(),
            key,
            supported: key.chord_symbols().collect::<Vec<_>>().join(", "),
        }
    }

    /// Short rule name for this rejection.
    pub const fn rule(&self) -> &'static str {
        match self {
            Rejection::UnknownChord { .. } => "Unknown Chord",
            Rejection::Retrograde { .. } => "Retrograde Prohibition",
            Rejection::SkippedDominant => "Predominant Must Resolve Through Dominant",
            Rejection::NonTonicOpening { .. } => "Must Start With Tonic",
            Rejection::NoTransition { .. } => "Invalid Transition",
        }
    }

    /// Whether this rejection came from a named harmony rule rather than
    /// a bare missing transition or an unknown token.
    pub const fn is_named_rule(&self) -> bool {
        matches!(
            self,
            Rejection::Retrograde { .. }
                | Rejection::SkippedDominant
                | Rejection::NonTonicOpening { .. }
        )
    }
}

/// How the automaton treats the opening chord of a progression.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum OpeningPolicy {
    /// Progressions must open on tonic function (I, vi, or iii);
    /// anything else is rejected under the "Must Start With Tonic" rule.
    #[default]
    TonicOnly,
    /// Any function may open; legality is enforced from the second chord
    /// onward.
    AnyFunction,
}

/// Outcome of consuming one harmonic-function symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// The configuration advanced to a new non-empty state set.
    Continue(StateSet),
    /// The step is illegal; the whole configuration is rejected.
    Reject(Rejection),
}

const TONIC: StateSet = StateSet::single(State::Tonic);
const PREDOMINANT: StateSet = StateSet::single(State::Predominant);
const DOMINANT: StateSet = StateSet::single(State::Dominant);

/// δ: the fixed transition relation, independent of key and policy.
/// Pairs with no legal continuation yield the empty set.
const fn transition_targets(state: State, function: HarmonicFunction) -> StateSet {
    use HarmonicFunction as F;
    match (state, function) {
        (State::Start, F::Tonic | F::Submediant | F::Mediant) => TONIC,
        (State::Tonic, F::Tonic | F::Submediant | F::Mediant) => TONIC,
        (State::Tonic, F::Subdominant | F::Supertonic) => PREDOMINANT,
        (State::Tonic, F::Dominant | F::LeadingTone) => DOMINANT,
        (State::Predominant, F::Dominant | F::LeadingTone) => DOMINANT,
        (State::Dominant, F::Dominant | F::LeadingTone) => DOMINANT,
        (State::Dominant, F::Tonic | F::Submediant | F::Mediant) => TONIC,
        _ => StateSet::EMPTY,
    }
}

/// The progression NFA, parameterized only by the opening policy.
///
/// Stepping is a pure function of the configuration and the input symbol;
/// the relation itself is a process-wide constant.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Automaton {
    opening: OpeningPolicy,
}

impl Automaton {
    /// Automaton with the given opening policy.
    pub const fn new(opening: OpeningPolicy) -> Automaton {
        Automaton { opening }
    }

    /// The opening policy in force.
    pub const fn opening(&self) -> OpeningPolicy {
        self.opening
    }

    /// Transition targets of one (state, function) pair under this
    /// automaton's opening policy.
    pub fn targets(&self, state: State, function: HarmonicFunction) -> StateSet {
        use HarmonicFunction as F;
        let targets = transition_targets(state, function);
        if targets.is_empty()
            && state == State::Start
            && self.opening == OpeningPolicy::AnyFunction
        {
            return match function {
                F::Subdominant | F::Supertonic => PREDOMINANT,
                F::Dominant | F::LeadingTone => DOMINANT,
                _ => StateSet::EMPTY,
            };
        }
        targets
    }

    /// Consume one harmonic-function symbol from every active state.
    ///
    /// Each active state with a table entry contributes its targets to
    /// the next configuration (the nondeterministic fan-out); a state
    /// with no entry is screened against the illegal-transition rules.
    /// One illegal branch rejects the whole configuration. An empty
    /// union likewise rejects, with the generic missing-transition
    /// reason.
    pub fn step(
        &self,
        active: StateSet,
        function: HarmonicFunction,
        chord: &str,
        prev_chord: Option<&str>,
    ) -> StepOutcome {
        let mut next = StateSet::EMPTY;
        let mut violation = None;
        for state in active.iter() {
            let targets = self.targets(state, function);
            if !targets.is_empty() {
                next = next.union(targets);
            } else if let Some(rejection) = self.violation(state, function, chord, prev_chord) {
                // When several branches violate at once, the last state
                // examined supplies the rule name.
                violation = Some(rejection);
                next.insert(State::Reject);
            }
        }
        if next.is_empty() || next.contains(State::Reject) {
            let reason = violation.unwrap_or_else(|| Rejection::NoTransition {
                chord: chord.to_string(),
                function,
                states: active,
            });
            return StepOutcome::Reject(reason);
        }
        StepOutcome::Continue(next)
    }

    /// Table-only reachability of one symbol: union of every active
    /// state's targets, with no illegal-rule screening. A dead end
    /// yields the empty set. This is what live hints consume.
    pub fn advance(&self, active: StateSet, function: HarmonicFunction) -> StateSet {
        active
            .iter()
            .fold(StateSet::EMPTY, |next, state| next.union(self.targets(state, function)))
    }

    fn violation(
        &self,
        state: State,
        function: HarmonicFunction,
        chord: &str,
        prev_chord: Option<&str>,
    ) -> Option<Rejection> {
        use HarmonicFunction as F;
        match (state, function) {
            (State::Dominant, F::Subdominant | F::Supertonic) => Some(Rejection::Retrograde {
                prev: prev_chord.unwrap_or("the previous chord").to_string(),
                chord: chord.to_string(),
            }),
            (State::Predominant, F::Tonic | F::Submediant | F::Mediant) => {
                Some(Rejection::SkippedDominant)
            }
            (State::Start, _) if self.opening == OpeningPolicy::TonicOnly => {
                Some(Rejection::NonTonicOpening {
                    chord: chord.to_string(),
                    function,
                })
            }
            _ => None,
        }
    }
}
