// tinebox encoding core
//
// Converts a sequence of MIDI note-on events into pin placements for a
// cylindrical music box: each surviving note becomes a pin at an axial
// height (which tine it strikes) and a rotational angle (when it strikes).
// The cylinder rotates at constant speed, so one revolution spans the whole
// song.
//
// Architecture:
// - event.rs: NoteEvent (pitch + elapsed time), immutable value type
// - midi.rs: SMF decoding into a flat note-on list (tempo-map aware)
// - pitch.rs: pitch-range adaptation (global transposition search,
//   per-note octave folding with discard)
// - comb.rs: the physical comb (tine heights per pitch, round-robin
//   assignment across duplicate tines)
// - placement.rs: time-to-angle mapping and the placement output type
// - encode.rs: the orchestrator (adaptation, data-loss confirmation,
//   tine and angle assignment in event order)
//
// Everything is a deterministic transform over in-memory sequences; the only
// interactive point is the data-loss confirmation callback the orchestrator
// receives from the caller.

pub mod comb;
pub mod encode;
pub mod event;
pub mod midi;
pub mod pitch;
pub mod placement;
