// MIDI input: SMF decoding into a flat note-on list.
//
// A music box only cares about *when* each note starts and *what pitch* it
// is, so the reader flattens a Standard MIDI File down to exactly that:
// all tracks merged by absolute tick, the tempo map applied to convert
// ticks to seconds, and only note-on events with non-zero velocity kept
// (velocity-zero note-ons are releases in disguise and are dropped along
// with real note-offs).
//
// Uses the `midly` crate for SMF parsing.

use crate::event::NoteEvent;
use midly::{MetaMessage, MidiMessage, Smf, Timing, TrackEventKind};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 120 BPM, the SMF default until a tempo meta event says otherwise.
const DEFAULT_TEMPO_US_PER_QUARTER: f64 = 500_000.0;

#[derive(Error, Debug)]
pub enum MidiError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: midly::Error,
    },
}

/// Read all note-on events from a MIDI file, timestamps in seconds.
pub fn read_note_events(path: &Path) -> Result<Vec<NoteEvent>, MidiError> {
    let bytes = std::fs::read(path).map_err(|source| MidiError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    note_events_from_bytes(&bytes).map_err(|source| MidiError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Decode note-on events from in-memory SMF bytes.
pub fn note_events_from_bytes(bytes: &[u8]) -> Result<Vec<NoteEvent>, midly::Error> {
    let smf = Smf::parse(bytes)?;

    // Merge all tracks into one absolute-tick timeline. The sort is stable
    // and keyed by (tick, track), so intra-track order survives and the
    // tempo track's events apply before same-tick notes on later tracks.
    let mut timed: Vec<(u64, usize, TrackEventKind)> = Vec::new();
    for (track_index, track) in smf.tracks.iter().enumerate() {
        let mut tick = 0u64;
        for event in track {
            tick += u64::from(event.delta.as_int());
            timed.push((tick, track_index, event.kind));
        }
    }
    timed.sort_by_key(|entry| (entry.0, entry.1));

    let mut seconds_per_tick = initial_seconds_per_tick(smf.header.timing);
    let mut seconds = 0.0f64;
    let mut last_tick = 0u64;
    let mut events = Vec::new();

    for (tick, _, kind) in timed {
        seconds += (tick - last_tick) as f64 * seconds_per_tick;
        last_tick = tick;
        match kind {
            TrackEventKind::Meta(MetaMessage::Tempo(us_per_quarter)) => {
                // Tempo only applies to metrical timing; timecode timing is
                // wall-clock already.
                if let Timing::Metrical(ticks_per_quarter) = smf.header.timing {
                    seconds_per_tick = f64::from(us_per_quarter.as_int())
                        / 1_000_000.0
                        / f64::from(ticks_per_quarter.as_int());
                }
            }
            TrackEventKind::Midi {
                message: MidiMessage::NoteOn { key, vel },
                ..
            } if vel.as_int() > 0 => {
                events.push(NoteEvent::new(key.as_int(), seconds));
            }
            _ => {}
        }
    }

    Ok(events)
}

fn initial_seconds_per_tick(timing: Timing) -> f64 {
    match timing {
        Timing::Metrical(ticks_per_quarter) => {
            DEFAULT_TEMPO_US_PER_QUARTER / 1_000_000.0 / f64::from(ticks_per_quarter.as_int())
        }
        Timing::Timecode(fps, subframes) => 1.0 / (f64::from(fps.as_f32()) * f64::from(subframes)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use midly::num::{u4, u7, u15, u24, u28};
    use midly::{Format, Header, TrackEvent};

    fn note_on(delta: u32, key: u8, vel: u8) -> TrackEvent<'static> {
        TrackEvent {
            delta: u28::new(delta),
            kind: TrackEventKind::Midi {
                channel: u4::new(0),
                message: MidiMessage::NoteOn {
                    key: u7::new(key),
                    vel: u7::new(vel),
                },
            },
        }
    }

    fn end_of_track() -> TrackEvent<'static> {
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
        }
    }

    #[test]
    fn test_tempo_map_converts_ticks_to_seconds() {
        // 480 ticks per quarter at the default 500000 us tempo: a 480-tick
        // delta is half a second.
        let mut smf = Smf::new(Header::new(
            Format::SingleTrack,
            Timing::Metrical(u15::new(480)),
        ));
        let track = vec![
            note_on(0, 60, 80),
            note_on(480, 62, 80),
            // Double tempo: a quarter note now lasts 0.25 s.
            TrackEvent {
                delta: u28::new(0),
                kind: TrackEventKind::Meta(MetaMessage::Tempo(u24::new(250_000))),
            },
            note_on(480, 64, 80),
            end_of_track(),
        ];
        smf.tracks.push(track);

        let mut bytes = Vec::new();
        smf.write(&mut bytes).unwrap();
        let events = note_events_from_bytes(&bytes).unwrap();

        assert_eq!(events.len(), 3);
        assert_eq!(events[0], NoteEvent::new(60, 0.0));
        assert!((events[1].timestamp - 0.5).abs() < 1e-9);
        assert_eq!(events[1].pitch, 62);
        assert!((events[2].timestamp - 0.75).abs() < 1e-9);
        assert_eq!(events[2].pitch, 64);
    }

    #[test]
    fn test_velocity_zero_note_ons_are_releases() {
        let mut smf = Smf::new(Header::new(
            Format::SingleTrack,
            Timing::Metrical(u15::new(480)),
        ));
        smf.tracks.push(vec![
            note_on(0, 60, 80),
            note_on(240, 60, 0),
            note_on(240, 72, 1),
            end_of_track(),
        ]);

        let mut bytes = Vec::new();
        smf.write(&mut bytes).unwrap();
        let events = note_events_from_bytes(&bytes).unwrap();

        let pitches: Vec<u8> = events.iter().map(|e| e.pitch).collect();
        assert_eq!(pitches, vec![60, 72]);
    }

    #[test]
    fn test_parallel_tracks_merge_in_time_order() {
        let mut smf = Smf::new(Header::new(
            Format::Parallel,
            Timing::Metrical(u15::new(480)),
        ));
        smf.tracks.push(vec![
            note_on(0, 60, 80),
            note_on(960, 64, 80),
            end_of_track(),
        ]);
        smf.tracks.push(vec![note_on(480, 62, 80), end_of_track()]);

        let mut bytes = Vec::new();
        smf.write(&mut bytes).unwrap();
        let events = note_events_from_bytes(&bytes).unwrap();

        let pitches: Vec<u8> = events.iter().map(|e| e.pitch).collect();
        assert_eq!(pitches, vec![60, 62, 64]);
        assert!(events.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }
}
