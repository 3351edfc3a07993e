// Time-to-angle mapping and the placement output type.
//
// One revolution of the cylinder spans the whole song, so a note's angle is
// its elapsed-time fraction of a full turn. Angles are measured backward
// from the start-of-rotation reference for the clockwise sense (the
// mechanism cranks clockwise when viewed from above, crank side up), so
// later notes sit at smaller angles and meet the comb in order as the
// cylinder turns.

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Rotation direction of the cylinder, viewed from above with the crank
/// side up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RotationSense {
    /// The stock mechanism.
    #[default]
    Clockwise,
    Counterclockwise,
}

/// One pin: axial height plus rotational angle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacementInstruction {
    /// Axial height of the tine this pin strikes, in millimeters.
    pub z_mm: f64,
    /// Rotational angle in radians, always in `[0, 2π)`.
    pub angle_rad: f64,
}

/// Map a timestamp to a pin angle in `[0, 2π)`.
///
/// Both the first instant (`t = 0`) and the completed revolution
/// (`t = song_duration`) land exactly on the reference angle `0`; interior
/// timestamps are strictly monotonic in between (decreasing for clockwise).
/// A zero `song_duration` — a single note, or every note simultaneous —
/// maps everything to the reference angle.
pub fn angle_for(timestamp: f64, song_duration: f64, sense: RotationSense) -> f64 {
    if song_duration == 0.0 {
        return 0.0;
    }
    let turn = (timestamp / song_duration) * TAU;
    let raw = match sense {
        RotationSense::Clockwise => TAU - turn,
        RotationSense::Counterclockwise => turn,
    };
    raw.rem_euclid(TAU)
}
