//! Arrangement pipeline: per-instrument transformation and duet assembly
//!
//! For each requested instrument: look up its profile, transpose every
//! pitch and the key signature by the same interval, fold out-of-range
//! notes by octaves, then annotate accidentals against the transposed
//! key. A failure aborts only that instrument's part; the rest of the
//! arrangement proceeds and the failure is reported alongside it.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::arrange::accidentals::suppress_accidentals;
use crate::arrange::folding::fold_into_range;
use crate::arrange::split::split_grand_staff;
use crate::error::ArrangeError;
use crate::instruments::{self, Clef, InstrumentProfile};
use crate::models::key::KeySignature;
use crate::models::score::{Event, Measure, Score, TimeSignature};

/// One instrument's finished part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub instrument: String,
    /// Transposed key the part is written in
    pub key: KeySignature,
    pub time_signature: TimeSignature,
    pub clef: Clef,
    pub measures: Vec<Measure>,
}

/// Why a requested part could not be produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartFailure {
    pub instrument: String,
    pub error: ArrangeError,
}

/// Lead and bass parts with equal measure counts, zipped index-for-index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Duet {
    pub lead: Part,
    pub bass: Part,
}

impl Duet {
    /// Measure pairs, lead and bass at the same index
    pub fn measures(&self) -> impl Iterator<Item = (&Measure, &Measure)> {
        self.lead.measures.iter().zip(self.bass.measures.iter())
    }
}

/// The engine's output: parts that succeeded, failures for those that
/// did not, and the duet if its assembly succeeded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arrangement {
    pub parts: Vec<Part>,
    pub failures: Vec<PartFailure>,
    pub duet: Option<Duet>,
    pub duet_error: Option<ArrangeError>,
}

impl Arrangement {
    pub fn part(&self, instrument: &str) -> Option<&Part> {
        self.parts.iter().find(|p| p.instrument == instrument)
    }
}

/// Arrange a score for the requested instruments, built-in profiles
///
/// The single entry point of the engine. `MalformedScore` aborts the
/// whole call; per-instrument errors only drop that part. The duet zips
/// the first two parts produced (lead, bass); with fewer than two parts
/// there is no duet and no duet error.
pub fn arrange(score: &Score, instrument_names: &[&str]) -> Result<Arrangement, ArrangeError> {
    arrange_impl(score, instrument_names, None)
}

/// Arrange with an externally supplied profile table instead of the
/// built-in registry
pub fn arrange_with_profiles(
    score: &Score,
    instrument_names: &[&str],
    profiles: &HashMap<String, InstrumentProfile>,
) -> Result<Arrangement, ArrangeError> {
    arrange_impl(score, instrument_names, Some(profiles))
}

/// The original piano workflow: split the grand staff at middle C, give
/// the treble voice to the lead instrument and the bass voice to the
/// bass instrument, then assemble the duet
pub fn arrange_duet(score: &Score, lead: &str, bass: &str) -> Result<Arrangement, ArrangeError> {
    score.validate()?;
    let (treble_score, bass_score) = split_grand_staff(score);

    let mut parts = Vec::new();
    let mut failures = Vec::new();
    for (voice, name) in [(&treble_score, lead), (&bass_score, bass)] {
        match arrange_part(voice, name, None) {
            Ok(part) => parts.push(part),
            Err(error) => {
                log::warn!("part for {} failed: {}", name, error);
                failures.push(PartFailure {
                    instrument: name.to_string(),
                    error,
                });
            }
        }
    }

    Ok(finish(parts, failures))
}

fn arrange_impl(
    score: &Score,
    instrument_names: &[&str],
    profiles: Option<&HashMap<String, InstrumentProfile>>,
) -> Result<Arrangement, ArrangeError> {
    score.validate()?;
    log::debug!(
        "arranging {} measures in {} for {:?}",
        score.measures.len(),
        score.key,
        instrument_names
    );

    let mut parts = Vec::new();
    let mut failures = Vec::new();
    for name in instrument_names {
        match arrange_part(score, name, profiles) {
            Ok(part) => parts.push(part),
            Err(error) => {
                log::warn!("part for {} failed: {}", name, error);
                failures.push(PartFailure {
                    instrument: name.to_string(),
                    error,
                });
            }
        }
    }

    Ok(finish(parts, failures))
}

fn finish(parts: Vec<Part>, failures: Vec<PartFailure>) -> Arrangement {
    let (duet, duet_error) = if parts.len() >= 2 {
        match assemble_duet(&parts[0], &parts[1]) {
            Ok(duet) => (Some(duet), None),
            Err(error) => {
                log::warn!("duet assembly failed: {}", error);
                (None, Some(error))
            }
        }
    } else {
        (None, None)
    };

    Arrangement {
        parts,
        failures,
        duet,
        duet_error,
    }
}

fn resolve_profile<'a>(
    name: &str,
    profiles: Option<&'a HashMap<String, InstrumentProfile>>,
) -> Result<&'a InstrumentProfile, ArrangeError> {
    match profiles {
        Some(table) => {
            table
                .get(&name.to_ascii_lowercase())
                .ok_or_else(|| ArrangeError::UnknownInstrument {
                    name: name.to_string(),
                })
        }
        None => instruments::lookup(name),
    }
}

/// Produce one instrument's part: transpose, fold, annotate
fn arrange_part(
    score: &Score,
    name: &str,
    profiles: Option<&HashMap<String, InstrumentProfile>>,
) -> Result<Part, ArrangeError> {
    let profile = resolve_profile(name, profiles)?;
    let interval = profile.transposition;
    let key = score.key.transpose(interval);

    let mut measures = Vec::with_capacity(score.measures.len());
    for measure in &score.measures {
        let mut events = Vec::with_capacity(measure.events.len());
        for event in &measure.events {
            match event {
                Event::Note {
                    pitch,
                    duration,
                    voice,
                    accidental_display,
                } => {
                    let transposed = pitch
                        .transpose(interval)
                        .map_err(|e| e.located(&profile.name, measure.index))?;
                    let folded = fold_into_range(transposed, profile)
                        .map_err(|e| e.located(&profile.name, measure.index))?;
                    events.push(Event::Note {
                        pitch: folded,
                        duration: *duration,
                        voice: voice.clone(),
                        accidental_display: *accidental_display,
                    });
                }
                Event::Rest { .. } => events.push(event.clone()),
            }
        }
        measures.push(Measure::new(measure.index, events));
    }

    suppress_accidentals(&mut measures, &key);

    Ok(Part {
        instrument: profile.name.clone(),
        key,
        time_signature: score.time_signature,
        clef: profile.clef,
        measures,
    })
}

/// Zip two parts into a duet; both must have the same measure count
pub fn assemble_duet(lead: &Part, bass: &Part) -> Result<Duet, ArrangeError> {
    if lead.measures.len() != bass.measures.len() {
        return Err(ArrangeError::MeasureCountMismatch {
            lead: lead.instrument.clone(),
            lead_measures: lead.measures.len(),
            bass: bass.instrument.clone(),
            bass_measures: bass.measures.len(),
        });
    }
    Ok(Duet {
        lead: lead.clone(),
        bass: bass.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::duration::beats;
    use crate::models::pitch::{Accidental, Letter, Pitch};
    use crate::models::score::AccidentalDisplay;

    fn quarter(letter: Letter, octave: i8) -> Event {
        Event::note(Pitch::natural(letter, octave), beats(1, 1))
    }

    fn one_measure_score(events: Vec<Event>) -> Score {
        Score::new(
            KeySignature::c_major(),
            TimeSignature::four_four(),
            vec![Measure::new(0, events)],
        )
    }

    fn note_pitches(part: &Part) -> Vec<Pitch> {
        part.measures
            .iter()
            .flat_map(|m| m.events.iter())
            .filter_map(|e| match e {
                Event::Note { pitch, .. } => Some(*pitch),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_trumpet_part_is_transposed_and_in_key() {
        let score = one_measure_score(vec![
            quarter(Letter::C, 4),
            Event::rest(beats(3, 1)),
        ]);
        let arrangement = arrange(&score, &["trumpet"]).unwrap();
        assert!(arrangement.failures.is_empty());

        let part = arrangement.part("trumpet").unwrap();
        assert_eq!(part.key, KeySignature::new(Letter::D, Accidental::Natural));
        assert_eq!(note_pitches(part), vec![Pitch::natural(Letter::D, 4)]);
    }

    #[test]
    fn test_trombone_part_is_concert_pitch() {
        let score = one_measure_score(vec![
            quarter(Letter::G, 2),
            Event::rest(beats(3, 1)),
        ]);
        let arrangement = arrange(&score, &["trombone"]).unwrap();
        let part = arrangement.part("trombone").unwrap();
        assert_eq!(part.key, KeySignature::c_major());
        assert_eq!(note_pitches(part), vec![Pitch::natural(Letter::G, 2)]);
    }

    #[test]
    fn test_unknown_instrument_drops_only_that_part() {
        let score = one_measure_score(vec![Event::rest(beats(4, 1))]);
        let arrangement = arrange(&score, &["kazoo", "trombone"]).unwrap();
        assert_eq!(arrangement.parts.len(), 1);
        assert_eq!(arrangement.failures.len(), 1);
        assert_eq!(arrangement.failures[0].instrument, "kazoo");
        assert!(matches!(
            arrangement.failures[0].error,
            ArrangeError::UnknownInstrument { .. }
        ));
    }

    #[test]
    fn test_malformed_score_aborts_whole_call() {
        let score = one_measure_score(vec![quarter(Letter::C, 4)]);
        assert!(matches!(
            arrange(&score, &["trumpet"]),
            Err(ArrangeError::MalformedScore { measure: 0, .. })
        ));
    }

    #[test]
    fn test_duet_from_first_two_parts() {
        let score = one_measure_score(vec![
            quarter(Letter::C, 4),
            Event::rest(beats(3, 1)),
        ]);
        let arrangement = arrange(&score, &["trumpet", "trombone"]).unwrap();
        let duet = arrangement.duet.expect("duet assembled");
        assert_eq!(duet.lead.instrument, "trumpet");
        assert_eq!(duet.bass.instrument, "trombone");
        assert_eq!(duet.measures().count(), 1);
        assert!(arrangement.duet_error.is_none());
    }

    #[test]
    fn test_single_part_has_no_duet() {
        let score = one_measure_score(vec![Event::rest(beats(4, 1))]);
        let arrangement = arrange(&score, &["trumpet"]).unwrap();
        assert!(arrangement.duet.is_none());
        assert!(arrangement.duet_error.is_none());
    }

    #[test]
    fn test_measure_count_mismatch_leaves_parts_valid() {
        let lead = Part {
            instrument: "trumpet".to_string(),
            key: KeySignature::c_major(),
            time_signature: TimeSignature::four_four(),
            clef: Clef::Treble,
            measures: vec![
                Measure::new(0, vec![Event::rest(beats(4, 1))]),
                Measure::new(1, vec![Event::rest(beats(4, 1))]),
            ],
        };
        let mut bass = lead.clone();
        bass.instrument = "trombone".to_string();
        bass.measures.pop();

        match assemble_duet(&lead, &bass) {
            Err(ArrangeError::MeasureCountMismatch {
                lead_measures,
                bass_measures,
                ..
            }) => {
                assert_eq!(lead_measures, 2);
                assert_eq!(bass_measures, 1);
            }
            other => panic!("expected MeasureCountMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_voice_metadata_passes_through() {
        let score = one_measure_score(vec![
            Event::Note {
                pitch: Pitch::natural(Letter::C, 4),
                duration: beats(1, 1),
                voice: Some("stem-up".to_string()),
                accidental_display: AccidentalDisplay::Explicit,
            },
            Event::rest(beats(3, 1)),
        ]);
        let arrangement = arrange(&score, &["trombone"]).unwrap();
        let part = arrangement.part("trombone").unwrap();
        match &part.measures[0].events[0] {
            Event::Note { voice, .. } => assert_eq!(voice.as_deref(), Some("stem-up")),
            other => panic!("expected note, got {:?}", other),
        }
    }

    #[test]
    fn test_range_failure_names_instrument_and_measure() {
        let mut profiles = HashMap::new();
        profiles.insert(
            "narrow".to_string(),
            InstrumentProfile {
                name: "narrow".to_string(),
                transposition: crate::models::pitch::Interval::unison(),
                // C4..G4 spans 7 semitones; A fits in no octave
                range: crate::instruments::PitchRange::new(
                    Pitch::natural(Letter::C, 4),
                    Pitch::natural(Letter::G, 4),
                ),
                clef: Clef::Treble,
            },
        );
        let score = Score::new(
            KeySignature::c_major(),
            TimeSignature::four_four(),
            vec![
                Measure::new(0, vec![Event::rest(beats(4, 1))]),
                Measure::new(1, vec![quarter(Letter::A, 5), Event::rest(beats(3, 1))]),
            ],
        );

        let arrangement = arrange_with_profiles(&score, &["narrow"], &profiles).unwrap();
        assert!(arrangement.parts.is_empty());
        match &arrangement.failures[0].error {
            ArrangeError::RangeTooNarrow {
                instrument,
                measure,
                pitch,
                ..
            } => {
                assert_eq!(instrument, "narrow");
                assert_eq!(*measure, 1);
                assert_eq!(*pitch, Pitch::natural(Letter::A, 5));
            }
            other => panic!("expected RangeTooNarrow, got {:?}", other),
        }
    }

    #[test]
    fn test_spelling_failure_names_instrument_and_measure() {
        let mut profiles = HashMap::new();
        profiles.insert(
            "glass harp".to_string(),
            InstrumentProfile {
                name: "glass harp".to_string(),
                // 3 semitones with no letter movement cannot be spelled
                transposition: crate::models::pitch::Interval::new(3, 0),
                range: crate::instruments::PitchRange::new(
                    Pitch::natural(Letter::C, 3),
                    Pitch::natural(Letter::C, 6),
                ),
                clef: Clef::Treble,
            },
        );
        let score = Score::new(
            KeySignature::c_major(),
            TimeSignature::four_four(),
            vec![
                Measure::new(0, vec![Event::rest(beats(4, 1))]),
                Measure::new(1, vec![Event::rest(beats(4, 1))]),
                Measure::new(2, vec![quarter(Letter::C, 4), Event::rest(beats(3, 1))]),
            ],
        );

        let arrangement = arrange_with_profiles(&score, &["glass harp"], &profiles).unwrap();
        match &arrangement.failures[0].error {
            ArrangeError::UnspellablePitch {
                instrument,
                measure,
                pitch,
                ..
            } => {
                assert_eq!(instrument, "glass harp");
                assert_eq!(*measure, 2);
                assert_eq!(*pitch, Pitch::natural(Letter::C, 4));
            }
            other => panic!("expected UnspellablePitch, got {:?}", other),
        }
    }

    #[test]
    fn test_arrange_with_external_profiles() {
        let mut profiles = HashMap::new();
        profiles.insert(
            "alto horn".to_string(),
            InstrumentProfile {
                name: "alto horn".to_string(),
                // Eb alto horn: written up a major 6th
                transposition: crate::models::pitch::Interval::new(9, 5),
                range: crate::instruments::PitchRange::new(
                    Pitch::natural(Letter::G, 3),
                    Pitch::natural(Letter::F, 5),
                ),
                clef: Clef::Treble,
            },
        );
        let score = one_measure_score(vec![
            quarter(Letter::C, 4),
            Event::rest(beats(3, 1)),
        ]);
        let arrangement = arrange_with_profiles(&score, &["Alto Horn"], &profiles).unwrap();
        let part = arrangement.part("alto horn").unwrap();
        assert_eq!(note_pitches(part), vec![Pitch::natural(Letter::A, 4)]);
    }
}
