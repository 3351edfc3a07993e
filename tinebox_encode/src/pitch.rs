// Pitch-range adaptation: global transposition and octave folding.
//
// A comb has far fewer pitches than MIDI's 128, so most songs need help to
// fit. Two mechanisms, applied in order:
//
// 1. One global transposition, chosen to maximize how many distinct input
//    pitches land on the comb. Applied uniformly to every note.
// 2. Per-note octave folding: a note that still misses the comb is shifted
//    by whole octaves, nearest first, until it lands on a supported pitch.
//    Notes with no supported fold within the radius are discarded.
//
// Both steps produce new event sequences; see encode.rs for how the
// orchestrator reacts to discards.

use crate::event::NoteEvent;
use rustc_hash::FxHashSet;

/// Find the transposition that maximizes the number of distinct input
/// pitches present on the comb.
///
/// Scans every shift that keeps all transposed pitches inside MIDI's 0-127
/// range (half-open on the upper bound). Scores count distinct matched
/// pitches — a pitch that occurs a hundred times still matches once. Ties
/// resolve to no transposition when it is among the optima, otherwise to
/// the first optimum in ascending scan order: the running best starts at
/// the shift-by-zero score and only a strictly greater score replaces it.
///
/// `input_pitches` must be non-empty.
pub fn find_best_transposition(input_pitches: &[u8], supported: &[u8]) -> i16 {
    debug_assert!(!input_pitches.is_empty());

    let supported: FxHashSet<i16> = supported.iter().map(|&p| i16::from(p)).collect();
    let distinct: FxHashSet<i16> = input_pitches.iter().map(|&p| i16::from(p)).collect();

    let min = input_pitches.iter().copied().min().unwrap_or(0);
    let max = input_pitches.iter().copied().max().unwrap_or(127);
    let lo = 0 - i16::from(min);
    let hi = 127 - i16::from(max);

    let mut best_shift: i16 = 0;
    let mut best_score = match_count(&distinct, &supported, 0);
    for shift in lo..hi {
        let score = match_count(&distinct, &supported, shift);
        if score > best_score {
            best_shift = shift;
            best_score = score;
        }
    }
    best_shift
}

/// How many of the distinct pitches land on the comb after `shift`.
fn match_count(distinct: &FxHashSet<i16>, supported: &FxHashSet<i16>, shift: i16) -> usize {
    distinct
        .iter()
        .filter(|&&p| supported.contains(&(p + shift)))
        .count()
}

/// Fold a pitch onto the comb by whole octaves, or discard it.
///
/// Searches in increasing radius order so the note is shifted as little as
/// possible: the pitch itself (checked exactly once), then ±1 octave, ±2,
/// up to `max_octave_radius`. At each radius the upward shift is tried
/// before the downward one. Candidates outside 0-127 are skipped. `None`
/// means the note cannot be encoded.
pub fn fold_to_supported(
    pitch: u8,
    supported: &FxHashSet<u8>,
    max_octave_radius: u8,
) -> Option<u8> {
    if supported.contains(&pitch) {
        return Some(pitch);
    }
    for radius in 1..=i16::from(max_octave_radius) {
        let up = i16::from(pitch) + 12 * radius;
        if (0..=127).contains(&up) && supported.contains(&(up as u8)) {
            return Some(up as u8);
        }
        let down = i16::from(pitch) - 12 * radius;
        if (0..=127).contains(&down) && supported.contains(&(down as u8)) {
            return Some(down as u8);
        }
    }
    None
}

/// Adapt a whole sequence: apply the global transposition (when given),
/// then fold-or-discard each note. Relative time order is preserved; the
/// result may be shorter than the input. A transposed pitch that leaves
/// the MIDI range is discarded like any other unencodable note.
pub fn adapt_sequence(
    events: &[NoteEvent],
    supported: &[u8],
    transposition: Option<i16>,
    max_octave_radius: u8,
) -> Vec<NoteEvent> {
    let supported_set: FxHashSet<u8> = supported.iter().copied().collect();
    let shift = transposition.unwrap_or(0);

    events
        .iter()
        .filter_map(|event| {
            let shifted = i16::from(event.pitch) + shift;
            if !(0..=127).contains(&shifted) {
                return None;
            }
            fold_to_supported(shifted as u8, &supported_set, max_octave_radius)
                .map(|pitch| event.with_pitch(pitch))
        })
        .collect()
}
