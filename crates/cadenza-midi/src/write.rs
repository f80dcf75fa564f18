//! MIDI rendering of generated events.
//!
//! Writes a decoded event stream as an SMF Format 0 file: one track, one
//! channel, every note or chord sounding for a fixed half quarter note,
//! back to back.

use crate::error::Result;
use crate::pitch::pitch_key;
use cadenza_seq::NoteEvent;
use midly::num::{u15, u24, u28, u4, u7};
use midly::{
    Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind,
};
use std::path::Path;
use tracing::debug;

/// Ticks per quarter note in rendered output.
const TICKS_PER_QUARTER: u16 = 480;

/// Every generated event sounds for half a quarter note.
const EVENT_TICKS: u32 = TICKS_PER_QUARTER as u32 / 2;

/// Tempo meta event: 120 BPM in microseconds per quarter note.
const TEMPO_US_PER_QUARTER: u32 = 500_000;

/// Chord pitch classes land in this octave (pitch class 0 renders as C4,
/// matching how integer-named notes are placed).
const CHORD_OCTAVE: i32 = 4;

const VELOCITY: u8 = 90;

/// Render events to a MIDI file on disk.
pub fn write_midi(events: &[NoteEvent], path: impl AsRef<Path>) -> Result<()> {
    let smf = events_to_smf(events)?;
    smf.save(path.as_ref())?;
    debug!("wrote {} events to {}", events.len(), path.as_ref().display());
    Ok(())
}

/// Render events to an in-memory SMF.
pub fn events_to_smf(events: &[NoteEvent]) -> Result<Smf<'static>> {
    let mut smf = Smf::new(Header::new(
        Format::SingleTrack,
        Timing::Metrical(u15::new(TICKS_PER_QUARTER)),
    ));

    let channel = u4::new(0);
    let mut track: Track<'static> = Vec::new();
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::Tempo(u24::new(TEMPO_US_PER_QUARTER))),
    });
    // acoustic grand piano
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Midi {
            channel,
            message: MidiMessage::ProgramChange {
                program: u7::new(0),
            },
        },
    });

    for event in events {
        let keys = event_keys(event)?;

        for &key in &keys {
            track.push(TrackEvent {
                delta: u28::new(0),
                kind: TrackEventKind::Midi {
                    channel,
                    message: MidiMessage::NoteOn {
                        key: u7::new(key),
                        vel: u7::new(VELOCITY),
                    },
                },
            });
        }
        for (i, &key) in keys.iter().enumerate() {
            // first off carries the whole duration, the rest are simultaneous
            let delta = if i == 0 { EVENT_TICKS } else { 0 };
            track.push(TrackEvent {
                delta: u28::new(delta),
                kind: TrackEventKind::Midi {
                    channel,
                    message: MidiMessage::NoteOff {
                        key: u7::new(key),
                        vel: u7::new(0),
                    },
                },
            });
        }
    }

    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });
    smf.tracks.push(track);
    Ok(smf)
}

/// MIDI key numbers an event sounds together.
fn event_keys(event: &NoteEvent) -> Result<Vec<u8>> {
    match event {
        NoteEvent::Pitch(name) => Ok(vec![pitch_key(name)?]),
        NoteEvent::Chord(classes) => Ok(classes.iter().map(|&pc| chord_key(pc)).collect()),
    }
}

fn chord_key(pitch_class: u8) -> u8 {
    ((CHORD_OCTAVE + 1) * 12 + i32::from(pitch_class % 12)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note_ons(smf: &Smf) -> Vec<(u8, u32)> {
        let mut ons = Vec::new();
        for track in smf.tracks.iter() {
            let mut tick = 0u32;
            for event in track.iter() {
                tick += event.delta.as_int();
                if let TrackEventKind::Midi {
                    message: MidiMessage::NoteOn { key, .. },
                    ..
                } = event.kind
                {
                    ons.push((key.as_int(), tick));
                }
            }
        }
        ons
    }

    #[test]
    fn test_empty_event_stream() {
        let smf = events_to_smf(&[]).unwrap();
        assert_eq!(smf.tracks.len(), 1);
        assert!(note_ons(&smf).is_empty());
    }

    #[test]
    fn test_single_pitch_timing() {
        let events = vec![
            NoteEvent::Pitch("C4".to_string()),
            NoteEvent::Pitch("E4".to_string()),
        ];
        let smf = events_to_smf(&events).unwrap();
        // consecutive events are half a quarter note apart
        assert_eq!(note_ons(&smf), vec![(60, 0), (64, EVENT_TICKS)]);
    }

    #[test]
    fn test_chord_notes_are_simultaneous() {
        let events = vec![NoteEvent::Chord(vec![2, 6, 9])];
        let smf = events_to_smf(&events).unwrap();
        assert_eq!(note_ons(&smf), vec![(62, 0), (66, 0), (69, 0)]);
    }

    #[test]
    fn test_chord_key_octave() {
        assert_eq!(chord_key(0), 60);
        assert_eq!(chord_key(11), 71);
        // out-of-range classes wrap instead of overflowing the key space
        assert_eq!(chord_key(14), 62);
    }

    #[test]
    fn test_unknown_pitch_fails() {
        let events = vec![NoteEvent::Pitch("X9".to_string())];
        assert!(events_to_smf(&events).is_err());
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.mid");

        let events = vec![
            NoteEvent::Pitch("C4".to_string()),
            NoteEvent::Chord(vec![2, 6, 9]),
            NoteEvent::Pitch("G4".to_string()),
        ];
        write_midi(&events, &path).unwrap();

        let tokens = crate::read::tokens_from_file(&path).unwrap();
        let names: Vec<&str> = tokens.iter().map(|t| t.as_str()).collect();
        assert_eq!(names, vec!["C4", "2.6.9", "G4"]);
    }
}
