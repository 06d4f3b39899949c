//! # chord_validator
//!
//! Validate chord progressions against functional-harmony rules
//! (tonic → predominant → dominant → tonic) with a nondeterministic
//! finite automaton over harmonic-function symbols.
//!
//! The engine tracks a *set* of simultaneously active states rather than
//! precompiling a DFA, classifies chord symbols within a chosen major
//! key, and answers with a specific, named reason for every non-accepted
//! outcome — plus the harmonically legal continuations at any prefix.
//!
//! ## Example
//! ```rust
//! use chord_validator::{Key, Validator, Verdict};
//!
//! let validator = Validator::new(Key::C);
//!
//! // A full tonic → predominant → dominant → tonic sequence.
//! let result = validator.validate_str("C, F, G, C").expect("non-empty input");
//! assert!(result.is_accepted());
//!
//! // Retrograde motion (V back to IV) is rejected with a named rule.
//! let result = validator.validate_str("C, G, F").expect("non-empty input");
//! if let Verdict::Rejected { index, reason } = &result.verdict {
//!     assert_eq!(*index, 2);
//!     assert_eq!(reason.rule(), "Retrograde Prohibition");
//! }
//!
//! // Live hints while the user is still typing.
//! let hints = validator.live_suggestions("C, F");
//! assert_eq!(hints, ["G", "G7", "Bdim"]);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rust_2018_idioms)]
#![deny(clippy::all)]

/// Progression automaton API.
pub use automaton::{Automaton, OpeningPolicy, Rejection, State, StateSet, StepOutcome};

/// Key, scale and classification API.
pub use key::{HarmonicFunction, Key, KeyError};

/// Legal-continuation hints.
pub use suggestion::next_chords;

/// Validation driver API.
pub use validator::{
    tokenize, Cadence, HistoryStep, ValidationResult, Validator, ValidatorBuilder, Verdict,
};

/// Progression automaton module.
pub mod automaton;

/// Key and scale-table module.
pub mod key;

/// Suggestion engine module.
pub mod suggestion;

/// Validation driver module.
pub mod validator;
