//! Rational beat durations
//!
//! Durations are exact rationals in beats (quarter note = 1), so
//! measure-capacity checks never drift the way float sums do.

use num_rational::Rational32;

/// Duration in beats, exact rational arithmetic
pub type Beats = Rational32;

/// Shorthand constructor: `beats(1, 2)` is half a beat
pub fn beats(numerator: i32, denominator: i32) -> Beats {
    Rational32::new(numerator, denominator)
}
