//! Keys and scale tables
//!
//! Derives the closed diatonic chord alphabet of a major key and classifies
//! concrete chord symbols into harmonic functions.

use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

/// Number of scale degrees in a major key
pub const DEGREES: usize = 7;

const SEMITONES: usize = 12;
const NUM_KEYS: usize = 8;

/// Reference frequency of middle C (C4) in Hz
const C4_HZ: f32 = 261.6256;

/// Semitone offsets of the major-scale degrees above the key root
const MAJOR_STEPS: [usize; DEGREES] = [0, 2, 4, 5, 7, 9, 11];

/// Diatonic triad spellings per key, in degree order, matching `Key::ALL`
const SCALES: [[&str; DEGREES]; NUM_KEYS] = [
    ["C", "Dm", "Em", "F", "G", "Am", "Bdim"],
    ["G", "Am", "Bm", "C", "D", "Em", "F#dim"],
    ["D", "Em", "F#m", "G", "A", "Bm", "C#dim"],
    ["A", "Bm", "C#m", "D", "E", "F#m", "G#dim"],
    ["E", "F#m", "G#m", "A", "B", "C#m", "D#dim"],
    ["F", "Gm", "Am", "Bb", "C", "Dm", "Edim"],
    ["Bb", "Cm", "Dm", "Eb", "F", "Gm", "Adim"],
    ["Eb", "Fm", "Gm", "Ab", "Bb", "Cm", "Ddim"],
];

/// Dominant-seventh spelling of degree 5 per key, matching `Key::ALL`
const SEVENTHS: [&str; NUM_KEYS] = ["G7", "D7", "A7", "E7", "B7", "C7", "F7", "Bb7"];

/// Pitch class of each key's root (semitones above C), matching `Key::ALL`
const KEY_ROOTS: [usize; NUM_KEYS] = [0, 7, 2, 9, 4, 5, 10, 3];

/// Interval shapes (in semitones above the chord root) for the diatonic
/// chord qualities
const MAJOR_TRIAD: &[usize] = &[0, 4, 7];
const MINOR_TRIAD: &[usize] = &[0, 3, 7];
const DIMINISHED_TRIAD: &[usize] = &[0, 3, 6];
const DOMINANT_SEVENTH: &[usize] = &[0, 4, 7, 10];

/// The supported major keys.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// C major
    C,
    /// G major
    G,
    /// D major
    D,
    /// A major
    A,
    /// E major
    E,
    /// F major
    F,
    /// B flat major
    BFlat,
    /// E flat major
    EFlat,
}

impl Key {
    /// Every supported key, in display order.
    pub const ALL: [Key; NUM_KEYS] = [
        Key::C,
        Key::G,
        Key::D,
        Key::A,
        Key::E,
        Key::F,
        Key::BFlat,
        Key::EFlat,
    ];

    /// Human-readable key name, e.g. `"B♭ Major"`.
    pub const fn name(self) -> &'static str {
        match self {
            Key::C => "C Major",
            Key::G => "G Major",
            Key::D => "D Major",
            Key::A => "A Major",
            Key::E => "E Major",
            Key::F => "F Major",
            Key::BFlat => "B♭ Major",
            Key::EFlat => "E♭ Major",
        }
    }

    /// The seven diatonic chord spellings, in degree order: tonic,
    /// supertonic, mediant, subdominant, dominant, submediant,
    /// leading-tone diminished.
    pub const fn scale_degrees(self) -> [&'static str; DEGREES] {
        SCALES[self as usize]
    }

    /// The dominant-seventh spelling of degree 5, e.g. `"G7"` in C.
    pub const fn seventh(self) -> &'static str {
        SEVENTHS[self as usize]
    }

    /// Every chord symbol the key admits: the seven diatonic triads plus
    /// the dominant seventh.
    pub fn chord_symbols(self) -> impl Iterator<Item = &'static str> {
        self.scale_degrees()
            .into_iter()
            .chain(std::iter::once(self.seventh()))
    }

    /// Map a chord symbol to its harmonic function in this key.
    ///
    /// Returns `None` when the symbol is not diatonic to the key — the
    /// "unknown chord" condition, distinct from any automaton failure.
    pub fn classify(self, chord: &str) -> Option<HarmonicFunction> {
        if chord == self.seventh() {
            return Some(HarmonicFunction::Dominant);
        }
        self.scale_degrees()
            .iter()
            .position(|&degree| degree == chord)
            .map(HarmonicFunction::from_degree)
    }

    /// Concrete spelling(s) of a harmonic function in this key.
    ///
    /// The inverse of [`Key::classify`]: exactly one spelling per
    /// function, except the dominant which yields both the triad and the
    /// seventh.
    pub fn chords_for(self, function: HarmonicFunction) -> Vec<&'static str> {
        let triad = self.scale_degrees()[function.degree()];
        match function {
            HarmonicFunction::Dominant => vec![triad, self.seventh()],
            _ => vec![triad],
        }
    }

    /// Frequencies in Hz of the chord's tones, ascending from the root,
    /// for playback collaborators. `None` for non-diatonic symbols.
    ///
    /// Tones are derived from pitch classes against a fixed C4 reference
    /// (261.6256 Hz), one equal-tempered semitone per step.
    pub fn chord_tones(self, chord: &str) -> Option<Vec<f32>> {
        let function = self.classify(chord)?;
        let degree = function.degree();
        let root = (KEY_ROOTS[self as usize] + MAJOR_STEPS[degree]) % SEMITONES;
        let intervals = if chord == self.seventh() {
            DOMINANT_SEVENTH
        } else {
            match degree {
                0 | 3 | 4 => MAJOR_TRIAD,
                1 | 2 | 5 => MINOR_TRIAD,
                _ => DIMINISHED_TRIAD,
            }
        };
        Some(
            intervals
                .iter()
                .map(|&interval| C4_HZ * 2f32.powf((root + interval) as f32 / 12.0))
                .collect(),
        )
    }
}

impl Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors when resolving a key from user input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyError {
    /// The text did not name a supported major key.
    #[error("unknown key `{0}`, expected one of C, G, D, A, E, F, Bb, Eb")]
    Unknown(String),
}

impl FromStr for Key {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "C" => Ok(Key::C),
            "G" => Ok(Key::G),
            "D" => Ok(Key::D),
            "A" => Ok(Key::A),
            "E" => Ok(Key::E),
            "F" => Ok(Key::F),
            "Bb" | "B♭" => Ok(Key::BFlat),
            "Eb" | "E♭" => Ok(Key::EFlat),
            other => Err(KeyError::Unknown(other.to_string())),
        }
    }
}

/// The seven diatonic harmonic functions, named by scale degree.
///
/// The input alphabet of the progression automaton. Classification is
/// many-to-one: the dominant triad and the dominant seventh both map to
/// [`HarmonicFunction::Dominant`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HarmonicFunction {
    /// I — the tonic
    Tonic,
    /// ii — the supertonic
    Supertonic,
    /// iii — the mediant
    Mediant,
    /// IV — the subdominant
    Subdominant,
    /// V — the dominant
    Dominant,
    /// vi — the submediant
    Submediant,
    /// vii° — the leading-tone diminished
    LeadingTone,
}

impl HarmonicFunction {
    /// All seven functions, in degree order.
    pub const ALL: [HarmonicFunction; DEGREES] = [
        HarmonicFunction::Tonic,
        HarmonicFunction::Supertonic,
        HarmonicFunction::Mediant,
        HarmonicFunction::Subdominant,
        HarmonicFunction::Dominant,
        HarmonicFunction::Submediant,
        HarmonicFunction::LeadingTone,
    ];

    fn from_degree(degree: usize) -> HarmonicFunction {
        HarmonicFunction::ALL[degree]
    }

    /// Zero-based scale degree carrying this function.
    pub const fn degree(self) -> usize {
        self as usize
    }

    /// Roman-numeral spelling, e.g. `"IV"` or `"vii°"`.
    pub const fn numeral(self) -> &'static str {
        match self {
            HarmonicFunction::Tonic => "I",
            HarmonicFunction::Supertonic => "ii",
            HarmonicFunction::Mediant => "iii",
            HarmonicFunction::Subdominant => "IV",
            HarmonicFunction::Dominant => "V",
            HarmonicFunction::Submediant => "vi",
            HarmonicFunction::LeadingTone => "vii°",
        }
    }

    /// One-line functional role, used by progression analysis.
    pub const fn description(self) -> &'static str {
        match self {
            HarmonicFunction::Tonic => "Tonic (I) - Establishes key center",
            HarmonicFunction::Supertonic => "Predominant (ii) - Supertonic",
            HarmonicFunction::Mediant => "Tonic function (iii) - Mediant",
            HarmonicFunction::Subdominant => "Predominant (IV) - Subdominant",
            HarmonicFunction::Dominant => "Dominant (V) - Maximum tension",
            HarmonicFunction::Submediant => "Tonic function (vi) - Relative minor",
            HarmonicFunction::LeadingTone => "Dominant function (vii°) - Leading tone",
        }
    }
}

impl Display for HarmonicFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.numeral())
    }
}
