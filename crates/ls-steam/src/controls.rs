//! Driver and fireman inputs, and the environment the locomotive runs in.

use serde::{Deserialize, Serialize};

/// Who looks after the fire and the injectors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FiringMode {
    /// Firing rate and injectors follow the control inputs.
    Manual,
    /// The automatic fireman holds pressure and water level.
    #[default]
    Automatic,
}

/// Control positions for one tick. Fractions are 0..=1 except the reverser,
/// which is a signed cutoff (negative runs backwards).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerInputs {
    pub throttle: f64,
    pub reverser: f64,
    pub blower: f64,
    pub damper: f64,
    pub firing_rate: f64,
    pub injector1: f64,
    pub injector2: f64,
    pub firebox_door: f64,
    pub cylinder_cocks_open: bool,
    pub compressor_on: bool,
    pub generator_on: bool,
    /// 0 is neutral on a geared locomotive; ignored for direct drive.
    pub gear: u32,
    pub firing_mode: FiringMode,
}

fn unit(v: f64) -> f64 {
    if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 }
}

impl ControllerInputs {
    /// Inputs forced into their legal ranges.
    pub fn clamped(&self, max_cutoff: f64, gear_count: usize) -> Self {
        let reverser = if self.reverser.is_finite() {
            self.reverser.clamp(-max_cutoff, max_cutoff)
        } else {
            0.0
        };
        Self {
            throttle: unit(self.throttle),
            reverser,
            blower: unit(self.blower),
            damper: unit(self.damper),
            firing_rate: unit(self.firing_rate),
            injector1: unit(self.injector1),
            injector2: unit(self.injector2),
            firebox_door: unit(self.firebox_door),
            gear: self.gear.min(gear_count as u32),
            ..self.clone()
        }
    }

    /// Absolute cutoff.
    pub fn cutoff(&self) -> f64 {
        self.reverser.abs()
    }

    /// +1 forward, -1 backward, 0 in mid gear.
    pub fn direction(&self) -> f64 {
        if self.reverser > 0.0 {
            1.0
        } else if self.reverser < 0.0 {
            -1.0
        } else {
            0.0
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Weather {
    #[default]
    Dry,
    Wet,
    Snow,
}

impl Weather {
    /// Rail adhesion coefficient.
    pub fn adhesion(self) -> f64 {
        match self {
            Weather::Dry => 0.33,
            Weather::Wet => 0.22,
            Weather::Snow => 0.15,
        }
    }
}

/// Sanding improves adhesion by this factor.
pub const SANDING_FACTOR: f64 = 1.25;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Environment {
    /// Signed train speed along the track (m/s).
    pub speed_mps: f64,
    pub weather: Weather,
    pub sanding: bool,
}

impl Environment {
    pub fn at_speed(speed_mps: f64) -> Self {
        Self {
            speed_mps,
            ..Self::default()
        }
    }

    pub fn adhesion_coefficient(&self) -> f64 {
        let base = self.weather.adhesion();
        if self.sanding { base * SANDING_FACTOR } else { base }
    }
}
