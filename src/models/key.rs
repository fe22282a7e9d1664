//! Key signatures as circle-of-fifths positions
//!
//! A key signature is identified by its major-key tonic spelling. The
//! alteration set is always derived from the tonic's circle-of-fifths
//! position, never stored, so it cannot drift into a non-standard mix of
//! sharps and flats. At most one alteration per letter by construction.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::pitch::{Accidental, Interval, Letter, Pitch};

/// Sharps enter the signature in this order (F# first)
const SHARP_ORDER: [Letter; 7] = [
    Letter::F,
    Letter::C,
    Letter::G,
    Letter::D,
    Letter::A,
    Letter::E,
    Letter::B,
];

/// Flats enter in the reverse order (Bb first)
const FLAT_ORDER: [Letter; 7] = [
    Letter::B,
    Letter::E,
    Letter::A,
    Letter::D,
    Letter::G,
    Letter::C,
    Letter::F,
];

/// A major-key signature, identified by its tonic spelling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySignature {
    pub tonic_letter: Letter,
    pub tonic_accidental: Accidental,
}

impl KeySignature {
    pub fn new(tonic_letter: Letter, tonic_accidental: Accidental) -> Self {
        KeySignature {
            tonic_letter,
            tonic_accidental,
        }
    }

    /// C major: no sharps, no flats
    pub fn c_major() -> Self {
        KeySignature::new(Letter::C, Accidental::Natural)
    }

    /// Signed count of sharps (positive) or flats (negative)
    ///
    /// Circle-of-fifths arithmetic: the letter's fifths position plus
    /// seven per accidental step (G=1 sharp, D=2, Bb=-2, ...).
    pub fn sharps(&self) -> i32 {
        self.tonic_letter.fifths_position() + 7 * self.tonic_accidental.semitone_offset()
    }

    /// Equivalent signature within the standard seven-sharp/seven-flat
    /// range
    ///
    /// Tonic spellings are not restricted at construction, so Fb major
    /// (8 flats on paper) or B# major (12 sharps) are representable;
    /// queries against the alteration set go through the enharmonic
    /// respelling instead of a signature no staff can carry.
    fn standard(&self) -> KeySignature {
        if self.sharps().abs() <= 7 {
            *self
        } else {
            let tonic = Pitch::new(self.tonic_letter, self.tonic_accidental, 4);
            Self::from_pitch_class(tonic.pitch_class())
        }
    }

    /// The ordered alteration set, as written on the staff
    pub fn alterations(&self) -> Vec<(Letter, Accidental)> {
        let sharps = self.standard().sharps();
        if sharps > 0 {
            SHARP_ORDER[..sharps as usize]
                .iter()
                .map(|&letter| (letter, Accidental::Sharp))
                .collect()
        } else if sharps < 0 {
            FLAT_ORDER[..(-sharps) as usize]
                .iter()
                .map(|&letter| (letter, Accidental::Flat))
                .collect()
        } else {
            Vec::new()
        }
    }

    /// Default alteration this key applies to a letter absent a contrary
    /// accidental in the measure
    pub fn implied_accidental(&self, letter: Letter) -> Accidental {
        let sharps = self.standard().sharps();
        if sharps > 0 && SHARP_ORDER[..sharps as usize].contains(&letter) {
            Accidental::Sharp
        } else if sharps < 0 && FLAT_ORDER[..(-sharps) as usize].contains(&letter) {
            Accidental::Flat
        } else {
            Accidental::Natural
        }
    }

    /// Diatonic transposition of the key
    ///
    /// The tonic moves by the same interval used for the pitches; the new
    /// alteration set follows from the new tonic's fifths position. When
    /// the diatonic spelling would need more than seven sharps or flats
    /// (or an unspellable tonic), the tonic is respelled enharmonically,
    /// so the result is always a standard signature: C major up a major
    /// 2nd is D major, never a mixed-accidental set.
    pub fn transpose(&self, interval: Interval) -> KeySignature {
        let tonic = Pitch::new(self.tonic_letter, self.tonic_accidental, 4);

        if let Ok(shifted) = tonic.transpose(interval) {
            let key = KeySignature::new(shifted.letter, shifted.accidental);
            if key.sharps().abs() <= 7 {
                return key;
            }
        }

        let target_class = (tonic.pitch_class() + interval.semitones as i32).rem_euclid(12);
        Self::from_pitch_class(target_class)
    }

    /// Best standard spelling for a tonic pitch class
    ///
    /// Picks the spelling with the fewest signature accidentals; the one
    /// tie (F# major vs Gb major at six) resolves to the sharp side.
    fn from_pitch_class(pitch_class: i32) -> KeySignature {
        let mut best = KeySignature::c_major();
        let mut best_magnitude = i32::MAX;

        for letter in [
            Letter::C,
            Letter::D,
            Letter::E,
            Letter::F,
            Letter::G,
            Letter::A,
            Letter::B,
        ] {
            let mut offset = (pitch_class - letter.semitone_offset()).rem_euclid(12);
            if offset > 6 {
                offset -= 12;
            }
            let accidental = match Accidental::from_semitone_offset(offset) {
                Some(a) => a,
                None => continue,
            };

            let candidate = KeySignature::new(letter, accidental);
            let magnitude = candidate.sharps().abs();
            if magnitude < best_magnitude
                || (magnitude == best_magnitude && candidate.sharps() > best.sharps())
            {
                best = candidate;
                best_magnitude = magnitude;
            }
        }

        best
    }

    /// Human-readable name, e.g. "D major"
    pub fn name(&self) -> String {
        format!(
            "{}{} major",
            self.tonic_letter,
            self.tonic_accidental.symbol()
        )
    }
}

impl Default for KeySignature {
    fn default() -> Self {
        KeySignature::c_major()
    }
}

impl fmt::Display for KeySignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
