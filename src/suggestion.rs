//! Legal-continuation hints
//!
//! Maps the automaton's active configuration back to the concrete chord
//! symbols that may legally come next in the chosen key.

use crate::automaton::{Automaton, StateSet};
use crate::key::{HarmonicFunction, Key};

/// Chord symbols that may legally follow the given configuration.
///
/// Every harmonic function reachable from any active state through the
/// transition relation is mapped back to its spelling(s) in `key`; the
/// dominant contributes both the triad and the seventh. Illegal-rule
/// screening is deliberately ignored — hints only ever offer
/// continuations the relation itself admits. Output order is degree
/// order, so identical configurations always hint identically.
pub fn next_chords(automaton: &Automaton, active: StateSet, key: Key) -> Vec<&'static str> {
    let mut chords = Vec::new();
    for function in HarmonicFunction::ALL {
        let reachable = active
            .iter()
            .any(|state| !automaton.targets(state, function).is_empty());
        if reachable {
            chords.extend(key.chords_for(function));
        }
    }
    chords
}
