// The encoding orchestrator.
//
// Runs the fixed pipeline: global transposition search, per-note octave
// folding, data-loss confirmation, then tine and angle assignment in event
// order. The last surviving note's timestamp spans exactly one revolution.
//
// Terminal outcomes are typed rather than process exits so the core can be
// embedded: an unencodable song is `EncodeError::NoEncodableNotes`, a
// declined confirmation is `EncodeOutcome::Declined` (a clean abort, not a
// fault). The caller hands `Encoding::placements` to the geometry builder.

use crate::comb::{Comb, CombConfig};
use crate::event::NoteEvent;
use crate::pitch;
use crate::placement::{self, PlacementInstruction, RotationSense};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// Nothing survives pitch adaptation; the song cannot be represented
    /// on this comb. Terminal — no partial output.
    #[error("no notes can be encoded on this comb")]
    NoEncodableNotes,
    /// A post-adaptation pitch has no tine. Unreachable unless pitch
    /// adaptation and the comb disagree about the supported set.
    #[error("no tine registered for pitch {0}")]
    UnknownPitch(u8),
}

/// Encoding parameters for one run.
#[derive(Clone, Copy, Debug)]
pub struct EncodeOptions {
    /// Search for and apply the best global transposition before folding.
    pub transpose: bool,
    /// How many octaves up or down a note may fold to reach the comb.
    pub octave_search_radius: u8,
    /// Cylinder rotation direction.
    pub rotation: RotationSense,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        EncodeOptions {
            transpose: true,
            octave_search_radius: 2,
            rotation: RotationSense::Clockwise,
        }
    }
}

/// A completed encoding run.
#[derive(Clone, Debug, PartialEq)]
pub struct Encoding {
    /// One placement per surviving note, in input time order.
    pub placements: Vec<PlacementInstruction>,
    /// The global transposition that was applied (0 when disabled).
    pub transposition: i16,
    /// Input notes that could not be represented and were dropped.
    pub discarded: usize,
    /// Timestamp of the last surviving note — one full revolution.
    pub song_duration: f64,
}

/// Result of an encoding run that did not fail.
#[derive(Clone, Debug, PartialEq)]
pub enum EncodeOutcome {
    Complete(Encoding),
    /// The user declined the data-loss confirmation. Clean abort: nothing
    /// may be written.
    Declined { discarded: usize },
}

/// Encode a note sequence into pin placements.
///
/// `confirm` is only called when notes were discarded; it receives
/// `(discarded, total)` and returning `false` aborts the run cleanly.
pub fn encode(
    events: &[NoteEvent],
    comb_config: &CombConfig,
    options: &EncodeOptions,
    mut confirm: impl FnMut(usize, usize) -> bool,
) -> Result<EncodeOutcome, EncodeError> {
    let transposition = if options.transpose && !events.is_empty() {
        let input_pitches: Vec<u8> = events.iter().map(|e| e.pitch).collect();
        pitch::find_best_transposition(&input_pitches, &comb_config.notes)
    } else {
        0
    };

    let adapted = pitch::adapt_sequence(
        events,
        &comb_config.notes,
        options.transpose.then_some(transposition),
        options.octave_search_radius,
    );

    if adapted.is_empty() {
        return Err(EncodeError::NoEncodableNotes);
    }

    let discarded = events.len() - adapted.len();
    if discarded > 0 && !confirm(discarded, events.len()) {
        return Ok(EncodeOutcome::Declined { discarded });
    }

    let mut comb = Comb::new(comb_config);
    let song_duration = adapted.last().map_or(0.0, |e| e.timestamp);

    let mut placements = Vec::with_capacity(adapted.len());
    for event in &adapted {
        let z_mm = comb
            .tine_position(event.pitch)
            .ok_or(EncodeError::UnknownPitch(event.pitch))?;
        let angle_rad = placement::angle_for(event.timestamp, song_duration, options.rotation);
        placements.push(PlacementInstruction { z_mm, angle_rad });
    }

    Ok(EncodeOutcome::Complete(Encoding {
        placements,
        transposition,
        discarded,
        song_duration,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::TAU;

    fn comb_of(notes: &[u8]) -> CombConfig {
        CombConfig {
            notes: notes.to_vec(),
            start_height_mm: 2.0,
            spacing_mm: 0.9,
        }
    }

    fn no_transpose(radius: u8) -> EncodeOptions {
        EncodeOptions {
            transpose: false,
            octave_search_radius: radius,
            rotation: RotationSense::Clockwise,
        }
    }

    /// A confirm callback that must never fire.
    fn unreachable_confirm(_: usize, _: usize) -> bool {
        panic!("confirmation requested with no data loss");
    }

    #[test]
    fn test_exact_fit_end_to_end() {
        let events = [
            NoteEvent::new(60, 0.0),
            NoteEvent::new(62, 1.0),
            NoteEvent::new(60, 2.0),
        ];
        let outcome = encode(
            &events,
            &comb_of(&[60, 62, 64]),
            &no_transpose(0),
            unreachable_confirm,
        )
        .unwrap();

        let EncodeOutcome::Complete(encoding) = outcome else {
            panic!("expected a complete encoding");
        };
        assert_eq!(encoding.placements.len(), 3);
        assert_eq!(encoding.song_duration, 2.0);
        assert_eq!(encoding.discarded, 0);
        assert_eq!(encoding.transposition, 0);

        // 60 has a single tine, so its two strikes share a height.
        assert_eq!(encoding.placements[0].z_mm, encoding.placements[2].z_mm);
        // Endpoints on the reference angle, midpoint opposite it.
        assert_eq!(encoding.placements[0].angle_rad, 0.0);
        assert!((encoding.placements[1].angle_rad - TAU / 2.0).abs() < 1e-12);
        assert_eq!(encoding.placements[2].angle_rad, 0.0);
    }

    #[test]
    fn test_duplicate_tines_cycle_across_placements() {
        let events = [
            NoteEvent::new(88, 0.0),
            NoteEvent::new(88, 1.0),
            NoteEvent::new(88, 2.0),
        ];
        let outcome = encode(
            &events,
            &comb_of(&[88, 88]),
            &no_transpose(0),
            unreachable_confirm,
        )
        .unwrap();
        let EncodeOutcome::Complete(encoding) = outcome else {
            panic!("expected a complete encoding");
        };
        let z: Vec<f64> = encoding.placements.iter().map(|p| p.z_mm).collect();
        assert_eq!(z, vec![2.0, 2.9, 2.0]);
    }

    #[test]
    fn test_discard_invokes_confirmation_with_counts() {
        let events = [NoteEvent::new(60, 0.0), NoteEvent::new(61, 1.0)];
        let mut asked = None;
        let outcome = encode(
            &events,
            &comb_of(&[60]),
            &no_transpose(0),
            |discarded, total| {
                asked = Some((discarded, total));
                true
            },
        )
        .unwrap();

        assert_eq!(asked, Some((1, 2)));
        let EncodeOutcome::Complete(encoding) = outcome else {
            panic!("expected a complete encoding");
        };
        assert_eq!(encoding.placements.len(), 1);
        assert_eq!(encoding.discarded, 1);
        // The sole survivor is also the last note: zero-duration song.
        assert_eq!(encoding.song_duration, 0.0);
        assert_eq!(encoding.placements[0].angle_rad, 0.0);
    }

    #[test]
    fn test_declined_confirmation_aborts_cleanly() {
        let events = [NoteEvent::new(60, 0.0), NoteEvent::new(61, 1.0)];
        let outcome = encode(&events, &comb_of(&[60]), &no_transpose(0), |_, _| false).unwrap();
        assert_eq!(outcome, EncodeOutcome::Declined { discarded: 1 });
    }

    #[test]
    fn test_nothing_encodable_is_terminal() {
        let events = [NoteEvent::new(61, 0.0)];
        let err = encode(
            &events,
            &comb_of(&[60]),
            &no_transpose(0),
            unreachable_confirm,
        )
        .unwrap_err();
        assert_eq!(err, EncodeError::NoEncodableNotes);
    }

    #[test]
    fn test_empty_input_is_terminal() {
        let err = encode(
            &[],
            &CombConfig::default(),
            &EncodeOptions::default(),
            unreachable_confirm,
        )
        .unwrap_err();
        assert_eq!(err, EncodeError::NoEncodableNotes);
    }

    #[test]
    fn test_transposition_is_applied_and_reported() {
        // An octave below the comb's only pitch: the search lands on +12.
        let events = [NoteEvent::new(50, 0.0), NoteEvent::new(50, 1.0)];
        let options = EncodeOptions {
            transpose: true,
            octave_search_radius: 0,
            rotation: RotationSense::Clockwise,
        };
        let outcome = encode(&events, &comb_of(&[62]), &options, unreachable_confirm).unwrap();
        let EncodeOutcome::Complete(encoding) = outcome else {
            panic!("expected a complete encoding");
        };
        assert_eq!(encoding.transposition, 12);
        assert_eq!(encoding.placements.len(), 2);
        assert_eq!(encoding.placements[0].z_mm, 2.0);
    }

    #[test]
    fn test_octave_fold_rescues_out_of_range_notes() {
        // 36 is two octaves below the comb; radius 2 folds it up.
        let events = [NoteEvent::new(60, 0.0), NoteEvent::new(36, 1.0)];
        let outcome = encode(
            &events,
            &comb_of(&[60]),
            &no_transpose(2),
            unreachable_confirm,
        )
        .unwrap();
        let EncodeOutcome::Complete(encoding) = outcome else {
            panic!("expected a complete encoding");
        };
        assert_eq!(encoding.placements.len(), 2);
        assert_eq!(encoding.discarded, 0);
    }
}
