// Note events: the only MIDI data relevant to a music box.

use serde::{Deserialize, Serialize};

/// A single note-on: MIDI pitch plus elapsed time since the start of the
/// song. Immutable once constructed — pipeline stages that change pitches
/// (transposition, octave folding) produce new events rather than mutating,
/// so the raw reading can always be compared against the adapted sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoteEvent {
    /// MIDI pitch number (0-127).
    pub pitch: u8,
    /// Seconds since the start of the song.
    pub timestamp: f64,
}

impl NoteEvent {
    pub fn new(pitch: u8, timestamp: f64) -> Self {
        NoteEvent { pitch, timestamp }
    }

    /// The same moment in time, sounding a different pitch.
    pub fn with_pitch(&self, pitch: u8) -> Self {
        NoteEvent {
            pitch,
            timestamp: self.timestamp,
        }
    }
}
