//! Grand-staff split: one piano score into treble and bass voices
//!
//! Notes at or above middle C go to the treble score, the rest to the
//! bass score; rests are copied to both. A note routed to the other staff
//! leaves a rest of the same duration behind, so both results keep the
//! measure-capacity invariant and identical measure counts.

use crate::models::pitch::{Letter, Pitch};
use crate::models::score::{Event, Measure, Score};

/// Concert middle C, the dividing line between the two staves
fn middle_c() -> Pitch {
    Pitch::natural(Letter::C, 4)
}

/// Split a score into (treble, bass) voices at middle C
pub fn split_grand_staff(score: &Score) -> (Score, Score) {
    let split_point = middle_c().semitone_value();

    let mut treble_measures = Vec::with_capacity(score.measures.len());
    let mut bass_measures = Vec::with_capacity(score.measures.len());

    for measure in &score.measures {
        let mut treble_events = Vec::with_capacity(measure.events.len());
        let mut bass_events = Vec::with_capacity(measure.events.len());

        for event in &measure.events {
            match event {
                Event::Note { pitch, duration, .. } => {
                    if pitch.semitone_value() >= split_point {
                        treble_events.push(event.clone());
                        bass_events.push(Event::rest(*duration));
                    } else {
                        treble_events.push(Event::rest(*duration));
                        bass_events.push(event.clone());
                    }
                }
                Event::Rest { .. } => {
                    treble_events.push(event.clone());
                    bass_events.push(event.clone());
                }
            }
        }

        treble_measures.push(Measure::new(measure.index, treble_events));
        bass_measures.push(Measure::new(measure.index, bass_events));
    }

    (
        Score::new(score.key, score.time_signature, treble_measures),
        Score::new(score.key, score.time_signature, bass_measures),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::duration::beats;
    use crate::models::key::KeySignature;
    use crate::models::score::TimeSignature;

    fn quarter(letter: Letter, octave: i8) -> Event {
        Event::note(Pitch::natural(letter, octave), beats(1, 1))
    }

    fn piano_score() -> Score {
        Score::new(
            KeySignature::c_major(),
            TimeSignature::four_four(),
            vec![Measure::new(
                0,
                vec![
                    quarter(Letter::E, 4),
                    quarter(Letter::G, 2),
                    Event::rest(beats(1, 1)),
                    quarter(Letter::C, 4),
                ],
            )],
        )
    }

    #[test]
    fn test_split_routes_by_middle_c() {
        let (treble, bass) = split_grand_staff(&piano_score());

        // Treble keeps E4 and C4 (middle C itself goes up), bass keeps G2
        assert_eq!(treble.measures[0].events[0], quarter(Letter::E, 4));
        assert!(matches!(treble.measures[0].events[1], Event::Rest { .. }));
        assert_eq!(treble.measures[0].events[3], quarter(Letter::C, 4));

        assert!(matches!(bass.measures[0].events[0], Event::Rest { .. }));
        assert_eq!(bass.measures[0].events[1], quarter(Letter::G, 2));
        assert!(matches!(bass.measures[0].events[3], Event::Rest { .. }));
    }

    #[test]
    fn test_rests_go_to_both_staves() {
        let (treble, bass) = split_grand_staff(&piano_score());
        assert!(matches!(treble.measures[0].events[2], Event::Rest { .. }));
        assert!(matches!(bass.measures[0].events[2], Event::Rest { .. }));
    }

    #[test]
    fn test_split_preserves_measure_invariant() {
        let (treble, bass) = split_grand_staff(&piano_score());
        assert!(treble.validate().is_ok());
        assert!(bass.validate().is_ok());
        assert_eq!(treble.measures.len(), bass.measures.len());
    }
}
