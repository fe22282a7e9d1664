//! Accidental suppression against the active key signature
//!
//! Standard notation convention: an accidental applies for the rest of
//! its measure, to the same letter at the same octave, and the key
//! signature supplies the default for every letter. This pass marks each
//! note's accidental Explicit or Implied accordingly. It is a display
//! annotation only; sounding pitches are untouched, which also makes the
//! pass idempotent.

use std::collections::HashMap;

use crate::models::key::KeySignature;
use crate::models::pitch::{Accidental, Letter};
use crate::models::score::{AccidentalDisplay, Event, Measure};

/// Annotate every note in every measure under the given (already
/// transposed) key signature
pub fn suppress_accidentals(measures: &mut [Measure], key: &KeySignature) {
    for measure in measures {
        annotate_measure(measure, key);
    }
}

fn annotate_measure(measure: &mut Measure, key: &KeySignature) {
    // Most recently printed accidental per (letter, octave), this measure
    let mut stated: HashMap<(Letter, i8), Accidental> = HashMap::new();

    for event in &mut measure.events {
        if let Event::Note {
            pitch,
            accidental_display,
            ..
        } = event
        {
            let effective = stated
                .get(&(pitch.letter, pitch.octave))
                .copied()
                .unwrap_or_else(|| key.implied_accidental(pitch.letter));

            if pitch.accidental == effective {
                *accidental_display = AccidentalDisplay::Implied;
            } else {
                *accidental_display = AccidentalDisplay::Explicit;
                stated.insert((pitch.letter, pitch.octave), pitch.accidental);
            }
        }
    }
}
