//! Brass Arrangement Engine
//!
//! Turns an abstract, instrument-agnostic score (measures of pitched and
//! rested events under a key signature) into per-instrument brass parts:
//! transposed, folded into the instrument's comfortable range, and cleaned
//! of accidentals already implied by the transposed key signature.
//!
//! Score reading (MusicXML, audio transcription) and writing live in
//! separate front ends; this crate exchanges plain serde-serializable
//! values with them and holds no state between calls.

pub mod arrange;
pub mod error;
pub mod instruments;
pub mod models;

// Re-export the types most callers need
pub use arrange::pipeline::{
    arrange, arrange_duet, arrange_with_profiles, Arrangement, Duet, Part, PartFailure,
};
pub use error::ArrangeError;
pub use instruments::{Clef, InstrumentProfile, PitchRange};
pub use models::key::KeySignature;
pub use models::pitch::{Accidental, Interval, Letter, Pitch};
pub use models::score::{Event, Measure, Score, TimeSignature};
