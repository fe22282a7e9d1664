//! Score structure: events, measures, time signatures
//!
//! This is the abstract representation handed over by the reader front
//! end (MusicXML or audio transcription) and handed back, per instrument,
//! to the writer. Durations are exact rationals; the measure-capacity
//! invariant is checked at ingestion, reported but never corrected.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ArrangeError;
use crate::models::duration::Beats;
use crate::models::key::KeySignature;
use crate::models::pitch::Pitch;

/// Time signature; capacity is measured in quarter-note beats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSignature {
    pub beats: u8,
    pub beat_value: u8,
}

impl TimeSignature {
    pub fn new(beats: u8, beat_value: u8) -> Self {
        TimeSignature { beats, beat_value }
    }

    pub fn four_four() -> Self {
        TimeSignature::new(4, 4)
    }

    /// Measure capacity in quarter-note beats (6/8 holds 3 beats)
    pub fn capacity(&self) -> Beats {
        Beats::new(self.beats as i32 * 4, self.beat_value as i32)
    }
}

impl Default for TimeSignature {
    fn default() -> Self {
        TimeSignature::four_four()
    }
}

impl fmt::Display for TimeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.beats, self.beat_value)
    }
}

/// Whether a note's accidental glyph is rendered
///
/// Written by the suppression pass. Display annotation only: the sounding
/// pitch is never affected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccidentalDisplay {
    /// Glyph is printed before the note
    Explicit,
    /// Already implied by the key signature or an earlier accidental in
    /// the measure; glyph is not printed
    Implied,
}

impl Default for AccidentalDisplay {
    fn default() -> Self {
        AccidentalDisplay::Explicit
    }
}

/// A note or rest with a rational duration in beats
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    Note {
        pitch: Pitch,
        duration: Beats,
        /// Voice/stem metadata from the reader, passed through untouched
        #[serde(default)]
        voice: Option<String>,
        #[serde(default)]
        accidental_display: AccidentalDisplay,
    },
    Rest {
        duration: Beats,
    },
}

impl Event {
    /// Note with default display annotation and no voice metadata
    pub fn note(pitch: Pitch, duration: Beats) -> Self {
        Event::Note {
            pitch,
            duration,
            voice: None,
            accidental_display: AccidentalDisplay::Explicit,
        }
    }

    pub fn rest(duration: Beats) -> Self {
        Event::Rest { duration }
    }

    pub fn duration(&self) -> Beats {
        match self {
            Event::Note { duration, .. } => *duration,
            Event::Rest { duration } => *duration,
        }
    }

    pub fn is_note(&self) -> bool {
        matches!(self, Event::Note { .. })
    }
}

/// Ordered events filling one measure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measure {
    /// Zero-based position within the part
    pub index: usize,
    pub events: Vec<Event>,
}

impl Measure {
    pub fn new(index: usize, events: Vec<Event>) -> Self {
        Measure { index, events }
    }

    /// Sum of event durations in beats
    pub fn total_duration(&self) -> Beats {
        self.events
            .iter()
            .map(Event::duration)
            .fold(Beats::new(0, 1), |acc, d| acc + d)
    }
}

/// The instrument-agnostic score consumed by the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub key: KeySignature,
    pub time_signature: TimeSignature,
    pub measures: Vec<Measure>,
}

impl Score {
    pub fn new(key: KeySignature, time_signature: TimeSignature, measures: Vec<Measure>) -> Self {
        Score {
            key,
            time_signature,
            measures,
        }
    }

    /// Check the measure-capacity invariant
    ///
    /// Every measure's event durations must sum to the time signature's
    /// capacity. A mismatch means the reader front end violated its
    /// contract; it is reported, not corrected.
    pub fn validate(&self) -> Result<(), ArrangeError> {
        let expected = self.time_signature.capacity();
        for measure in &self.measures {
            let actual = measure.total_duration();
            if actual != expected {
                return Err(ArrangeError::MalformedScore {
                    measure: measure.index,
                    expected,
                    actual,
                });
            }
        }
        Ok(())
    }
}
