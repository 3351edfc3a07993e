// The comb: tine layout and round-robin tine assignment.
//
// A music box comb can carry several tines of the same pitch. That is a
// deliberate feature: a note struck against a tine that is still vibrating
// from its previous strike produces a buzzing sound, so repeated notes are
// spread across physically distinct tines. The `Comb` records every strike
// and always hands out the "coldest" tine — the one least recently struck —
// by cycling through a pitch's heights in layout order.
//
// Tine order in `CombConfig::notes` is bottom-to-top on the cylinder; tine
// `i` sits at `start_height_mm + i * spacing_mm`.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Physical comb description. Loaded from JSON as part of the box config,
/// never mutated at runtime.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CombConfig {
    /// Tine pitches in axial order, bottom-to-top. Duplicates are distinct
    /// physical tines.
    pub notes: Vec<u8>,
    /// Axial height of the first tine, in millimeters.
    pub start_height_mm: f64,
    /// Axial spacing between adjacent tines, in millimeters.
    pub spacing_mm: f64,
}

impl Default for CombConfig {
    fn default() -> Self {
        // The 18-tine comb of the target mechanism. The cylinder is built
        // from bottom to top, so this order matters.
        CombConfig {
            notes: vec![
                100, 98, 97, 95, 93, 93, 92, 88, 88, 86, 85, 83, 81, 78, 76, 74, 71, 69,
            ],
            start_height_mm: 2.0,
            spacing_mm: 0.9,
        }
    }
}

/// One pitch's tines: axial heights in layout order plus a strike counter.
/// The counter only ever increases; `strikes % heights.len()` picks the
/// next tine, so duplicates are exhausted in cyclic order before any tine
/// repeats.
#[derive(Debug)]
struct TineGroup {
    heights_mm: SmallVec<[f64; 2]>,
    strikes: usize,
}

/// Round-robin tine assignment state for one encoding run.
#[derive(Debug)]
pub struct Comb {
    groups: FxHashMap<u8, TineGroup>,
}

impl Comb {
    pub fn new(config: &CombConfig) -> Self {
        let mut groups: FxHashMap<u8, TineGroup> = FxHashMap::default();
        for (i, &note) in config.notes.iter().enumerate() {
            let z = config.start_height_mm + i as f64 * config.spacing_mm;
            groups
                .entry(note)
                .or_insert_with(|| TineGroup {
                    heights_mm: SmallVec::new(),
                    strikes: 0,
                })
                .heights_mm
                .push(z);
        }
        Comb { groups }
    }

    /// Axial height for the next strike of `pitch`, or `None` if the comb
    /// has no tine for it.
    pub fn tine_position(&mut self, pitch: u8) -> Option<f64> {
        let group = self.groups.get_mut(&pitch)?;
        let z = group.heights_mm[group.strikes % group.heights_mm.len()];
        group.strikes += 1;
        Some(z)
    }
}
