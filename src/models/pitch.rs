//! Pitch spelling and semitone arithmetic
//!
//! A pitch is a spelled value: letter, accidental, octave. Two spellings
//! with the same semitone value (C# and Db) are enharmonically equivalent
//! but not interchangeable where a key signature demands a specific
//! spelling, so transposition works in two coordinates at once: diatonic
//! steps pick the letter, semitones pick the accidental.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::ArrangeError;

/// The seven letter names, in diatonic order starting at C
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Letter {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Letter {
    /// Diatonic position within the octave (C=0 .. B=6)
    pub fn diatonic_index(&self) -> i32 {
        match self {
            Letter::C => 0,
            Letter::D => 1,
            Letter::E => 2,
            Letter::F => 3,
            Letter::G => 4,
            Letter::A => 5,
            Letter::B => 6,
        }
    }

    /// Semitones above C for the natural form of this letter
    pub fn semitone_offset(&self) -> i32 {
        match self {
            Letter::C => 0,
            Letter::D => 2,
            Letter::E => 4,
            Letter::F => 5,
            Letter::G => 7,
            Letter::A => 9,
            Letter::B => 11,
        }
    }

    /// Letter at a diatonic position, wrapping around the 7-letter cycle
    pub fn from_diatonic_index(index: i32) -> Letter {
        match index.rem_euclid(7) {
            0 => Letter::C,
            1 => Letter::D,
            2 => Letter::E,
            3 => Letter::F,
            4 => Letter::G,
            5 => Letter::A,
            _ => Letter::B,
        }
    }

    /// Position on the circle of fifths relative to C (F=-1, C=0, G=1, ...)
    ///
    /// Used by key-signature derivation: each step sharpward adds one
    /// sharp, each step flatward adds one flat.
    pub fn fifths_position(&self) -> i32 {
        match self {
            Letter::F => -1,
            Letter::C => 0,
            Letter::G => 1,
            Letter::D => 2,
            Letter::A => 3,
            Letter::E => 4,
            Letter::B => 5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Letter::C => "C",
            Letter::D => "D",
            Letter::E => "E",
            Letter::F => "F",
            Letter::G => "G",
            Letter::A => "A",
            Letter::B => "B",
        }
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Chromatic alteration of a letter, double-flat through double-sharp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Accidental {
    DoubleFlat,
    Flat,
    Natural,
    Sharp,
    DoubleSharp,
}

impl Accidental {
    /// Semitone offset applied to the natural letter (-2 ..= +2)
    pub fn semitone_offset(&self) -> i32 {
        match self {
            Accidental::DoubleFlat => -2,
            Accidental::Flat => -1,
            Accidental::Natural => 0,
            Accidental::Sharp => 1,
            Accidental::DoubleSharp => 2,
        }
    }

    /// Accidental for a given semitone offset, None outside -2 ..= +2
    pub fn from_semitone_offset(offset: i32) -> Option<Accidental> {
        match offset {
            -2 => Some(Accidental::DoubleFlat),
            -1 => Some(Accidental::Flat),
            0 => Some(Accidental::Natural),
            1 => Some(Accidental::Sharp),
            2 => Some(Accidental::DoubleSharp),
            _ => None,
        }
    }

    /// Glyph used in pitch names ("" for natural)
    pub fn symbol(&self) -> &'static str {
        match self {
            Accidental::DoubleFlat => "bb",
            Accidental::Flat => "b",
            Accidental::Natural => "",
            Accidental::Sharp => "#",
            Accidental::DoubleSharp => "##",
        }
    }
}

impl Default for Accidental {
    fn default() -> Self {
        Accidental::Natural
    }
}

/// Transposition interval as a pair of coordinates
///
/// `semitones` fixes the sounding distance, `diatonic_steps` fixes the
/// letter distance. Both are needed: up a major 2nd (+2, +1) and up a
/// diminished 3rd (+2, +2) sound the same but spell differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub semitones: i8,
    pub diatonic_steps: i8,
}

impl Interval {
    pub fn new(semitones: i8, diatonic_steps: i8) -> Self {
        Interval {
            semitones,
            diatonic_steps,
        }
    }

    /// Concert pitch: no transposition
    pub fn unison() -> Self {
        Interval::new(0, 0)
    }

    /// The interval that undoes this one
    pub fn inverse(&self) -> Self {
        Interval::new(-self.semitones, -self.diatonic_steps)
    }
}

/// A spelled pitch: letter, accidental, octave (middle C = C4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pitch {
    pub letter: Letter,
    pub accidental: Accidental,
    pub octave: i8,
}

impl Pitch {
    pub fn new(letter: Letter, accidental: Accidental, octave: i8) -> Self {
        Pitch {
            letter,
            accidental,
            octave,
        }
    }

    /// Natural pitch shorthand
    pub fn natural(letter: Letter, octave: i8) -> Self {
        Pitch::new(letter, Accidental::Natural, octave)
    }

    /// Absolute chromatic position, MIDI convention (C4 = 60)
    ///
    /// Pure function of (letter, accidental, octave); total, no failure.
    pub fn semitone_value(&self) -> i32 {
        (self.octave as i32 + 1) * 12 + self.letter.semitone_offset() + self.accidental.semitone_offset()
    }

    /// Chromatic pitch class 0-11 (C=0)
    pub fn pitch_class(&self) -> i32 {
        self.semitone_value().rem_euclid(12)
    }

    /// Same semitone value, possibly different spelling
    pub fn enharmonic_eq(&self, other: &Pitch) -> bool {
        self.semitone_value() == other.semitone_value()
    }

    /// Transpose by an interval, producing a new pitch
    ///
    /// The letter moves by `diatonic_steps` around the 7-letter cycle
    /// (wrapping the octave), then the accidental is chosen so the result
    /// lands exactly `semitones` above (or below) this pitch. Fails with
    /// `UnspellablePitch` when no accidental within double-flat..double-
    /// sharp reaches the target semitone.
    pub fn transpose(&self, interval: Interval) -> Result<Pitch, ArrangeError> {
        let target = self.semitone_value() + interval.semitones as i32;

        let letter_position = self.letter.diatonic_index() + interval.diatonic_steps as i32;
        let letter = Letter::from_diatonic_index(letter_position);
        let octave = self.octave as i32 + letter_position.div_euclid(7);

        let natural = (octave + 1) * 12 + letter.semitone_offset();
        let accidental = Accidental::from_semitone_offset(target - natural).ok_or_else(|| {
            // Part and measure are filled in by the pipeline
            ArrangeError::UnspellablePitch {
                instrument: String::new(),
                measure: 0,
                pitch: *self,
                semitones: interval.semitones,
                diatonic_steps: interval.diatonic_steps,
            }
        })?;

        Ok(Pitch::new(letter, accidental, octave as i8))
    }

    /// Shift by whole octaves: same letter and accidental, octave changes
    pub fn shift_octave(&self, octaves: i8) -> Pitch {
        Pitch::new(self.letter, self.accidental, self.octave + octaves)
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.letter, self.accidental.symbol(), self.octave)
    }
}

// Ordered by sounding pitch; enharmonic spellings tie-break by letter so
// the order stays total and consistent with structural equality.
impl Ord for Pitch {
    fn cmp(&self, other: &Self) -> Ordering {
        self.semitone_value()
            .cmp(&other.semitone_value())
            .then(self.letter.diatonic_index().cmp(&other.letter.diatonic_index()))
    }
}

impl PartialOrd for Pitch {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for Pitch {
    type Err = String;

    /// Parse "C4", "F#3", "Bb2", "Abb5" style names
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || format!("invalid pitch: '{}'", s);

        let mut chars = s.chars();
        let letter = match chars.next().map(|c| c.to_ascii_uppercase()) {
            Some('C') => Letter::C,
            Some('D') => Letter::D,
            Some('E') => Letter::E,
            Some('F') => Letter::F,
            Some('G') => Letter::G,
            Some('A') => Letter::A,
            Some('B') => Letter::B,
            _ => return Err(err()),
        };

        let rest: String = chars.collect();
        let (accidental, octave_str) = if let Some(r) = rest.strip_prefix("##") {
            (Accidental::DoubleSharp, r)
        } else if let Some(r) = rest.strip_prefix("bb") {
            (Accidental::DoubleFlat, r)
        } else if let Some(r) = rest.strip_prefix('#') {
            (Accidental::Sharp, r)
        } else if let Some(r) = rest.strip_prefix('b') {
            (Accidental::Flat, r)
        } else {
            (Accidental::Natural, rest.as_str())
        };

        let octave: i8 = octave_str.parse().map_err(|_| err())?;
        Ok(Pitch::new(letter, accidental, octave))
    }
}
