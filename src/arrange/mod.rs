//! Arrangement rules and the pipeline that composes them
//!
//! Each rule (range folding, accidental suppression, grand-staff split)
//! is a standalone function over the model types; `pipeline` wires them
//! together per requested instrument.

pub mod accidentals;
pub mod folding;
pub mod pipeline;
pub mod split;

pub use accidentals::suppress_accidentals;
pub use folding::fold_into_range;
pub use pipeline::{arrange, arrange_duet, arrange_with_profiles, Arrangement, Duet, Part, PartFailure};
pub use split::split_grand_staff;
