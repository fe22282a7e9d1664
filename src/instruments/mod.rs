//! Static instrument configuration
//!
//! One registry covers both concerns the pipeline looks up by instrument
//! name: the transposition interval and the comfortable playing range, so
//! an unknown name fails identically for either. The built-in table is
//! populated once (lazy_static) and never mutated; callers who need
//! different numbers supply their own profiles, deserialized from JSON,
//! and pass them to `arrange_with_profiles`.
//!
//! Comfortable ranges are written-pitch bounds from standard orchestration
//! practice, deliberately short of each instrument's extremes.

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::ArrangeError;
use crate::models::pitch::{Accidental, Interval, Letter, Pitch};

/// Default clef for the written part; pass-through metadata for the writer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Clef {
    Treble,
    Bass,
}

/// Inclusive comfortable range in written pitch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PitchRange {
    pub low: Pitch,
    pub high: Pitch,
}

impl PitchRange {
    pub fn new(low: Pitch, high: Pitch) -> Self {
        PitchRange { low, high }
    }

    /// Both bounds inclusive: a pitch exactly on a bound is in range
    pub fn contains(&self, pitch: &Pitch) -> bool {
        let value = pitch.semitone_value();
        value >= self.low.semitone_value() && value <= self.high.semitone_value()
    }

    pub fn span_semitones(&self) -> i32 {
        self.high.semitone_value() - self.low.semitone_value()
    }
}

/// Everything the pipeline needs to know about one instrument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentProfile {
    pub name: String,
    /// Written = concert + transposition (Bb trumpet: up a major 2nd)
    pub transposition: Interval,
    pub range: PitchRange,
    pub clef: Clef,
}

lazy_static! {
    static ref REGISTRY: HashMap<String, InstrumentProfile> = builtin_profiles();
}

fn profile(
    name: &str,
    semitones: i8,
    diatonic_steps: i8,
    low: Pitch,
    high: Pitch,
    clef: Clef,
) -> (String, InstrumentProfile) {
    (
        name.to_string(),
        InstrumentProfile {
            name: name.to_string(),
            transposition: Interval::new(semitones, diatonic_steps),
            range: PitchRange::new(low, high),
            clef,
        },
    )
}

fn builtin_profiles() -> HashMap<String, InstrumentProfile> {
    let natural = Pitch::natural;
    HashMap::from([
        // Bb trumpet: written up a major 2nd, comfortable G3-C6 written
        profile(
            "trumpet",
            2,
            1,
            natural(Letter::G, 3),
            natural(Letter::C, 6),
            Clef::Treble,
        ),
        // Bb flugelhorn: trumpet transposition, slightly lower ceiling
        profile(
            "flugelhorn",
            2,
            1,
            natural(Letter::G, 3),
            Pitch::new(Letter::B, Accidental::Flat, 5),
            Clef::Treble,
        ),
        // Horn in F: written up a perfect 5th
        profile(
            "horn",
            7,
            4,
            natural(Letter::C, 3),
            natural(Letter::G, 5),
            Clef::Treble,
        ),
        // Tenor trombone: concert pitch
        profile(
            "trombone",
            0,
            0,
            natural(Letter::E, 2),
            natural(Letter::F, 5),
            Clef::Bass,
        ),
        // Euphonium: concert pitch (bass clef convention)
        profile(
            "euphonium",
            0,
            0,
            natural(Letter::E, 2),
            Pitch::new(Letter::B, Accidental::Flat, 4),
            Clef::Bass,
        ),
        // Tuba: concert pitch
        profile(
            "tuba",
            0,
            0,
            natural(Letter::D, 1),
            natural(Letter::F, 4),
            Clef::Bass,
        ),
    ])
}

/// Look up a built-in profile by case-insensitive name
pub fn lookup(name: &str) -> Result<&'static InstrumentProfile, ArrangeError> {
    REGISTRY
        .get(&name.to_ascii_lowercase())
        .ok_or_else(|| ArrangeError::UnknownInstrument {
            name: name.to_string(),
        })
}

/// Names of all built-in instruments, sorted
pub fn builtin_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = REGISTRY.keys().map(String::as_str).collect();
    names.sort_unstable();
    names
}

/// Deserialize an external profile table from JSON
///
/// The format is a map from instrument name to profile, so the tables are
/// versionable configuration rather than hard-coded constants. Keys are
/// lowercased to match the built-in lookup convention.
pub fn profiles_from_json(json: &str) -> Result<HashMap<String, InstrumentProfile>, serde_json::Error> {
    let parsed: HashMap<String, InstrumentProfile> = serde_json::from_str(json)?;
    Ok(parsed
        .into_iter()
        .map(|(name, profile)| (name.to_ascii_lowercase(), profile))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_instruments() {
        let trumpet = lookup("trumpet").unwrap();
        assert_eq!(trumpet.transposition, Interval::new(2, 1));
        assert_eq!(trumpet.range.low, Pitch::natural(Letter::G, 3));
        assert_eq!(trumpet.range.high, Pitch::natural(Letter::C, 6));
        assert_eq!(trumpet.clef, Clef::Treble);

        let trombone = lookup("trombone").unwrap();
        assert_eq!(trombone.transposition, Interval::unison());
        assert_eq!(trombone.clef, Clef::Bass);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert!(lookup("Trumpet").is_ok());
        assert!(lookup("TROMBONE").is_ok());
    }

    #[test]
    fn test_lookup_unknown_instrument() {
        match lookup("theremin") {
            Err(ArrangeError::UnknownInstrument { name }) => assert_eq!(name, "theremin"),
            other => panic!("expected UnknownInstrument, got {:?}", other),
        }
    }

    #[test]
    fn test_ranges_are_at_least_an_octave() {
        // Folding can always place any pitch class when a range spans 12+
        for name in builtin_names() {
            let profile = lookup(name).unwrap();
            assert!(
                profile.range.span_semitones() >= 12,
                "{} range narrower than an octave",
                name
            );
        }
    }

    #[test]
    fn test_range_bounds_inclusive() {
        let trumpet = lookup("trumpet").unwrap();
        assert!(trumpet.range.contains(&Pitch::natural(Letter::G, 3)));
        assert!(trumpet.range.contains(&Pitch::natural(Letter::C, 6)));
        assert!(!trumpet.range.contains(&Pitch::new(Letter::F, Accidental::Sharp, 3)));
        assert!(!trumpet.range.contains(&Pitch::new(Letter::C, Accidental::Sharp, 6)));
    }

    #[test]
    fn test_profiles_from_json() {
        let json = r#"{
            "Bugle": {
                "name": "bugle",
                "transposition": { "semitones": 0, "diatonic_steps": 0 },
                "range": {
                    "low": { "letter": "C", "accidental": "Natural", "octave": 4 },
                    "high": { "letter": "C", "accidental": "Natural", "octave": 6 }
                },
                "clef": "treble"
            }
        }"#;
        let profiles = profiles_from_json(json).unwrap();
        let bugle = profiles.get("bugle").expect("key lowercased");
        assert_eq!(bugle.transposition, Interval::unison());
        assert_eq!(bugle.range.span_semitones(), 24);
        assert_eq!(bugle.clef, Clef::Treble);
    }

    #[test]
    fn test_profile_serde_round_trip() {
        let trumpet = lookup("trumpet").unwrap();
        let json = serde_json::to_string(trumpet).unwrap();
        let back: InstrumentProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(&back, trumpet);
    }
}
