//! Error types for the arrangement engine
//!
//! One crate-level enum covers configuration errors (unknown instrument,
//! inconsistent range), spelling failures, and structural mismatches.
//! Every variant carries enough context (instrument name, measure index,
//! offending pitch) for the caller to act on.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::duration::Beats;
use crate::models::pitch::Pitch;

#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum ArrangeError {
    /// Instrument name has no entry in the profile registry
    #[error("unknown instrument: '{name}'")]
    UnknownInstrument { name: String },

    /// No accidental within double-flat..double-sharp reaches the target
    /// semitone for the shifted letter
    #[error("{instrument} measure {measure}: cannot spell {pitch} transposed by {semitones} semitones / {diatonic_steps} diatonic steps")]
    UnspellablePitch {
        instrument: String,
        measure: usize,
        pitch: Pitch,
        semitones: i8,
        diatonic_steps: i8,
    },

    /// Instrument range spans less than an octave, so some pitch classes
    /// have no valid octave placement
    #[error("{instrument} measure {measure}: range {low}..{high} is too narrow to place {pitch}")]
    RangeTooNarrow {
        instrument: String,
        measure: usize,
        low: Pitch,
        high: Pitch,
        pitch: Pitch,
    },

    /// Duet assembly got parts with differing measure counts
    #[error("duet assembly: {lead} has {lead_measures} measures but {bass} has {bass_measures}")]
    MeasureCountMismatch {
        lead: String,
        lead_measures: usize,
        bass: String,
        bass_measures: usize,
    },

    /// Input score violates the measure-capacity invariant
    #[error("measure {measure}: event durations sum to {actual} beats, time signature allows {expected}")]
    MalformedScore {
        measure: usize,
        expected: Beats,
        actual: Beats,
    },
}

impl ArrangeError {
    /// Attach the part and measure a per-note error was raised in
    ///
    /// The pitch-level operations know nothing about their position in
    /// a score; the pipeline fills these fields as it walks the
    /// measures. Variants that already carry their full context pass
    /// through unchanged.
    pub fn located(self, instrument: &str, measure: usize) -> ArrangeError {
        match self {
            ArrangeError::UnspellablePitch {
                pitch,
                semitones,
                diatonic_steps,
                ..
            } => ArrangeError::UnspellablePitch {
                instrument: instrument.to_string(),
                measure,
                pitch,
                semitones,
                diatonic_steps,
            },
            ArrangeError::RangeTooNarrow {
                low, high, pitch, ..
            } => ArrangeError::RangeTooNarrow {
                instrument: instrument.to_string(),
                measure,
                low,
                high,
                pitch,
            },
            other => other,
        }
    }
}
