//! Versioned save file.

use ls_steam::{PersistedSteamState, SteamPowerPlant};
use serde::{Deserialize, Serialize};

use crate::migrate::SAVE_VERSION;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SaveFile {
    pub version: u32,
    /// Name of the locomotive the state was taken from; empty when unknown.
    #[serde(default)]
    pub locomotive: String,
    #[serde(default)]
    pub saved_at_tick: u64,
    pub state: PersistedSteamState,
}

impl SaveFile {
    pub fn capture(plant: &SteamPowerPlant) -> Self {
        Self {
            version: SAVE_VERSION,
            locomotive: plant.params().name.clone(),
            saved_at_tick: plant.state().ticks,
            state: plant.snapshot(),
        }
    }

    /// Restore into `plant`. A save from a differently named locomotive is
    /// still applied; the values are clamped to the target's limits.
    pub fn apply(&self, plant: &mut SteamPowerPlant) {
        if !self.locomotive.is_empty() && self.locomotive != plant.params().name {
            tracing::warn!(
                saved = %self.locomotive,
                target = %plant.params().name,
                "restoring save from a different locomotive"
            );
        }
        plant.restore(&self.state);
    }
}
