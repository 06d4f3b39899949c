//! Engine-level properties: classification totality, determinism,
//! suggestion idempotence, and the documented rejection taxonomy.

use chord_validator::{
    next_chords, tokenize, Automaton, Cadence, HarmonicFunction, Key, Rejection, State, StateSet,
    StepOutcome, Validator, Verdict,
};
use pretty_assertions::{assert_eq, assert_ne};
use std::str::FromStr;

#[test]
fn scale_degrees_are_seven_distinct_symbols() {
    for key in Key::ALL {
        let degrees = key.scale_degrees();
        for (i, a) in degrees.iter().enumerate() {
            for b in &degrees[i + 1..] {
                assert_ne!(a, b, "duplicate degree in {key}");
            }
        }
    }
}

#[test]
fn classifier_is_total_over_the_diatonic_alphabet() {
    for key in Key::ALL {
        for (degree, chord) in key.scale_degrees().into_iter().enumerate() {
            let function = key.classify(chord).expect("diatonic chord must classify");
            assert_eq!(function.degree(), degree, "{chord} in {key}");
        }
        assert_eq!(key.classify(key.seventh()), Some(HarmonicFunction::Dominant));
        assert_eq!(key.classify("Xq"), None);
        assert_eq!(key.classify(""), None);
    }
}

#[test]
fn chords_for_inverts_classification() {
    for key in Key::ALL {
        for function in HarmonicFunction::ALL {
            let spellings = key.chords_for(function);
            let expected = if function == HarmonicFunction::Dominant { 2 } else { 1 };
            assert_eq!(spellings.len(), expected, "{function} in {key}");
            for chord in spellings {
                assert_eq!(key.classify(chord), Some(function));
            }
        }
    }
}

#[test]
fn accepts_the_full_functional_sequence() {
    let result = Validator::new(Key::C).validate_str("C, F, G, C").unwrap();
    assert_eq!(result.active_states, StateSet::single(State::Tonic));
    match &result.verdict {
        Verdict::Accepted { functions, cadence } => {
            assert_eq!(
                functions,
                &[
                    HarmonicFunction::Tonic,
                    HarmonicFunction::Subdominant,
                    HarmonicFunction::Dominant,
                    HarmonicFunction::Tonic,
                ]
            );
            assert_eq!(*cadence, Some(Cadence::Authentic));
        }
        other => panic!("expected acceptance, got {other:?}"),
    }
}

#[test]
fn single_tonic_accepts_without_a_cadence() {
    let result = Validator::new(Key::C).validate_str("C").unwrap();
    match result.verdict {
        Verdict::Accepted { cadence, .. } => assert_eq!(cadence, None),
        other => panic!("expected acceptance, got {other:?}"),
    }
}

#[test]
fn rejects_retrograde_motion_with_the_named_rule() {
    let result = Validator::new(Key::C).validate_str("C, G, F").unwrap();
    match &result.verdict {
        Verdict::Rejected { index, reason } => {
            assert_eq!(*index, 2);
            assert_eq!(reason.rule(), "Retrograde Prohibition");
            assert!(reason.is_named_rule());
            assert!(reason.to_string().contains("(G)"), "{reason}");
        }
        other => panic!("expected a rejection, got {other:?}"),
    }
    assert_eq!(result.active_states, StateSet::single(State::Reject));
    // The rejected step is recorded with the absorbing configuration.
    assert_eq!(result.history.len(), 3);
    assert_eq!(result.history[2].states, StateSet::single(State::Reject));
}

#[test]
fn skipping_the_dominant_is_rejected_by_name() {
    let result = Validator::new(Key::C).validate_str("C, Dm, Am").unwrap();
    match &result.verdict {
        Verdict::Rejected { index, reason } => {
            assert_eq!(*index, 2);
            assert_eq!(reason.rule(), "Predominant Must Resolve Through Dominant");
            assert!(reason.is_named_rule());
        }
        other => panic!("expected a rejection, got {other:?}"),
    }
}

#[test]
fn uncovered_pairs_fall_back_to_the_generic_rejection() {
    let result = Validator::new(Key::C).validate_str("C, F, Dm").unwrap();
    match &result.verdict {
        Verdict::Rejected { index, reason } => {
            assert_eq!(*index, 2);
            assert_eq!(reason.rule(), "Invalid Transition");
            assert!(!reason.is_named_rule());
            assert!(reason.to_string().contains("PREDOMINANT"), "{reason}");
        }
        other => panic!("expected a rejection, got {other:?}"),
    }
}

#[test]
fn incomplete_prefix_suggests_only_dominant_function_chords() {
    let result = Validator::new(Key::C).validate_str("C, F").unwrap();
    assert_eq!(result.active_states, StateSet::single(State::Predominant));
    match &result.verdict {
        Verdict::Incomplete { suggestions } => {
            assert_eq!(suggestions, &["G", "G7", "Bdim"]);
        }
        other => panic!("expected an incomplete verdict, got {other:?}"),
    }
}

#[test]
fn unknown_chord_is_not_a_transition_failure() {
    let result = Validator::new(Key::C).validate_str("C, Xq").unwrap();
    match &result.verdict {
        Verdict::Rejected { index, reason } => {
            assert_eq!(*index, 1);
            assert_eq!(reason.rule(), "Unknown Chord");
            assert!(!reason.is_named_rule());
            // The hint lists the current key's alphabet, seventh included.
            assert!(reason.to_string().contains("G7"), "{reason}");
        }
        other => panic!("expected a rejection, got {other:?}"),
    }
    assert_eq!(result.active_states, StateSet::EMPTY);
    // Only the steps already completed are reported.
    assert_eq!(result.history.len(), 1);
    assert_eq!(result.chords, vec!["C".to_string(), "Xq".to_string()]);
}

#[test]
fn empty_input_is_no_result() {
    let validator = Validator::new(Key::C);
    assert_eq!(validator.validate_str(""), None);
    assert_eq!(validator.validate_str("   "), None);
    assert_eq!(validator.validate_str(" , ,"), None);
    assert_eq!(validator.validate(&[]), None);
    // The neutral state still hints at openings.
    assert_eq!(validator.live_suggestions(""), ["C", "Em", "Am"]);
}

#[test]
fn validation_is_deterministic() {
    let validator = Validator::new(Key::EFlat);
    let first = validator.validate_str("Eb, Ab, Bb7, Cm");
    let second = validator.validate_str("Eb, Ab, Bb7, Cm");
    assert_eq!(first, second);
}

#[test]
fn suggestions_depend_only_on_configuration_and_key() {
    let validator = Validator::new(Key::C);
    // Two different histories landing on the same configuration.
    let short = validator.active_states(&["C"]);
    let long = validator.active_states(&["C", "G", "C", "Am"]);
    assert_eq!(short, long);
    assert_eq!(
        next_chords(validator.automaton(), short, Key::C),
        next_chords(validator.automaton(), long, Key::C),
    );
}

#[test]
fn live_hints_follow_the_prefix() {
    let validator = Validator::new(Key::C);
    assert_eq!(
        validator.live_suggestions("C, G"),
        ["C", "Em", "G", "G7", "Am", "Bdim"]
    );
    // Broken prefixes hint at nothing.
    assert_eq!(validator.live_suggestions("C, Xq"), Vec::<&str>::new());
    // A non-tonic opening is a dead end in the transition relation.
    assert_eq!(validator.live_suggestions("F"), Vec::<&str>::new());
}

#[test]
fn step_unions_targets_across_active_branches() {
    let automaton = Automaton::default();
    let both: StateSet = [State::Tonic, State::Dominant].into_iter().collect();

    // Both branches admit tonic-function input; targets collapse to one set.
    match automaton.step(both, HarmonicFunction::Tonic, "C", Some("G")) {
        StepOutcome::Continue(next) => assert_eq!(next, StateSet::single(State::Tonic)),
        other => panic!("expected a continuation, got {other:?}"),
    }

    // One illegal branch (retrograde from DOMINANT) rejects the whole
    // configuration even though TONIC admits predominant input.
    let outcome = automaton.step(both, HarmonicFunction::Subdominant, "F", Some("G"));
    assert!(matches!(
        outcome,
        StepOutcome::Reject(Rejection::Retrograde { .. })
    ));
}

#[test]
fn state_set_tracks_membership_and_displays_like_the_diagram() {
    let mut set = StateSet::EMPTY;
    assert!(set.is_empty());
    set.insert(State::Tonic);
    set.insert(State::Dominant);
    set.insert(State::Tonic);
    assert_eq!(set.len(), 2);
    assert!(set.contains(State::Tonic));
    assert!(!set.contains(State::Reject));
    assert_eq!(set.to_string(), "TONIC or DOMINANT");
    assert_eq!(
        set.iter().collect::<Vec<_>>(),
        vec![State::Tonic, State::Dominant]
    );
    let collected: StateSet = [State::Tonic, State::Dominant].into_iter().collect();
    assert_eq!(set, collected);
}

#[test]
fn key_change_resets_the_diatonic_alphabet() {
    // Dm is diatonic to C but not to G...
    assert_eq!(Key::C.classify("Dm"), Some(HarmonicFunction::Supertonic));
    assert_eq!(Key::G.classify("Dm"), None);
    let in_g = Validator::new(Key::G).validate_str("Dm").unwrap();
    assert_eq!(in_g.rejection().map(Rejection::rule), Some("Unknown Chord"));
    // ...in C it classifies, and trips the opening rule instead.
    let in_c = Validator::new(Key::C).validate_str("Dm").unwrap();
    assert_eq!(
        in_c.rejection().map(Rejection::rule),
        Some("Must Start With Tonic")
    );
    // Em is coincidentally shared: iii of C, vi of G.
    assert_eq!(Key::C.classify("Em"), Some(HarmonicFunction::Mediant));
    assert_eq!(Key::G.classify("Em"), Some(HarmonicFunction::Submediant));
}

#[test]
fn tokenizer_trims_and_drops_empty_tokens() {
    assert_eq!(tokenize(" C , F ,, G7 , "), vec!["C", "F", "G7"]);
    assert_eq!(tokenize(""), Vec::<&str>::new());
    assert_eq!(tokenize(",,,"), Vec::<&str>::new());
}

#[test]
fn chord_tones_match_equal_tempered_voicings() {
    let cases: &[(Key, &str, &[f32])] = &[
        (Key::C, "C", &[261.63, 329.63, 392.00]),
        (Key::C, "G7", &[392.00, 493.88, 587.33, 698.46]),
        (Key::C, "Bdim", &[493.88, 587.33, 698.46]),
        (Key::C, "Am", &[440.00, 523.25, 659.25]),
        (Key::G, "F#dim", &[369.99, 440.00, 523.25]),
        (Key::E, "B7", &[493.88, 622.25, 739.99, 880.00]),
        (Key::EFlat, "Ab", &[415.30, 523.25, 622.25]),
    ];
    for &(key, chord, expected) in cases {
        let tones = key.chord_tones(chord).expect("diatonic chord has tones");
        assert_eq!(tones.len(), expected.len(), "{chord} in {key}");
        for (got, want) in tones.iter().zip(expected) {
            assert!(
                (got - want).abs() < 0.01,
                "{chord} in {key}: {got} Hz vs {want} Hz"
            );
        }
    }
    assert_eq!(Key::C.chord_tones("Xq"), None);
}

#[test]
fn analysis_names_each_functional_role_and_the_cadence() {
    let result = Validator::new(Key::C).validate_str("C, Dm, G7, C").unwrap();
    let analysis = result.analysis();
    assert!(analysis.contains("1. C → Tonic (I) - Establishes key center"));
    assert!(analysis.contains("2. Dm → Predominant (ii) - Supertonic"));
    assert!(analysis.contains("3. G7 → Dominant (V) - Maximum tension"));
    assert!(analysis.contains("Authentic Cadence"));
}

#[test]
fn keys_parse_from_ui_spellings() {
    assert_eq!(Key::from_str("Bb"), Ok(Key::BFlat));
    assert_eq!(Key::from_str("B♭"), Ok(Key::BFlat));
    assert_eq!(Key::from_str(" E "), Ok(Key::E));
    assert!(Key::from_str("H").is_err());
    assert_eq!(Key::BFlat.to_string(), "B♭ Major");
}
