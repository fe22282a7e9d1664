//! Range folding: octave shifts into an instrument's comfortable range
//!
//! Folding moves a pitch by whole octaves only, so pitch class and
//! diatonic spelling survive; only the octave changes. Bounds are
//! inclusive: a pitch landing exactly on a bound is accepted.

use crate::error::ArrangeError;
use crate::instruments::InstrumentProfile;
use crate::models::pitch::Pitch;

/// Fold a pitch into the instrument's range, one octave at a time
///
/// A pitch already inside the range comes back unchanged. When the range
/// spans less than an octave some pitch classes fit no octave placement;
/// that is a configuration error, reported as `RangeTooNarrow` with the
/// offending pitch.
pub fn fold_into_range(pitch: Pitch, profile: &InstrumentProfile) -> Result<Pitch, ArrangeError> {
    let low = profile.range.low.semitone_value();
    let high = profile.range.high.semitone_value();

    // The measure index is attached by the pipeline
    let too_narrow = || ArrangeError::RangeTooNarrow {
        instrument: profile.name.clone(),
        measure: 0,
        low: profile.range.low,
        high: profile.range.high,
        pitch,
    };

    let mut folded = pitch;
    while folded.semitone_value() < low {
        folded = folded.shift_octave(1);
        if folded.semitone_value() > high {
            return Err(too_narrow());
        }
    }
    while folded.semitone_value() > high {
        folded = folded.shift_octave(-1);
        if folded.semitone_value() < low {
            return Err(too_narrow());
        }
    }

    if folded != pitch {
        log::debug!("folded {} to {} for {}", pitch, folded, profile.name);
    }
    Ok(folded)
}
