//! Data models for the arrangement engine
//!
//! Value types only: pitches, durations, key signatures, and the
//! score/event structures exchanged with the reader and writer front ends.

pub mod duration;
pub mod key;
pub mod pitch;
pub mod score;

// Re-export commonly used types
pub use duration::Beats;
pub use key::KeySignature;
pub use pitch::{Accidental, Interval, Letter, Pitch};
pub use score::{AccidentalDisplay, Event, Measure, Score, TimeSignature};
