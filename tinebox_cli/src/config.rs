// Data-driven box configuration.
//
// Every physical parameter — comb tine pitches and geometry, cylinder and
// pin dimensions — lives in `BoxConfig`, loaded from JSON when `--config`
// is given and defaulting to the stock mechanism otherwise. Sections may
// be given individually; omitted sections keep their defaults, so a config
// file can swap just the comb.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tinebox_encode::comb::CombConfig;
use tinebox_geom::cylinder::CylinderConfig;

/// Top-level box configuration. Never mutated at runtime.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxConfig {
    pub comb: CombConfig,
    pub cylinder: CylinderConfig,
}

impl BoxConfig {
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}
