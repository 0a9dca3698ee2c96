//! Mutable locomotive state, one slice per pipeline stage.

use serde::{Deserialize, Serialize};

use crate::boiler::BoilerState;
use crate::controls::ControllerInputs;
use crate::cylinder::CylinderState;
use crate::firebox::FireState;
use crate::injector::InjectorState;
use crate::motion::MotionState;
use crate::tender::TenderState;

/// Latest steam consumption per consumer (lb/s).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SteamUsage {
    pub cylinders: f64,
    pub cylinder_cocks: f64,
    pub blower: f64,
    /// Heat lost to radiation, expressed as equivalent steam.
    pub radiation: f64,
    pub compressor: f64,
    pub generator: f64,
    pub stoker: f64,
    pub injectors: f64,
    pub safety_valves: f64,
}

impl SteamUsage {
    pub fn total(&self) -> f64 {
        self.withdrawn() + self.radiation + self.injectors
    }

    /// Steam that physically leaves the boiler as vapour.
    pub fn withdrawn(&self) -> f64 {
        self.cylinders
            + self.cylinder_cocks
            + self.blower
            + self.compressor
            + self.generator
            + self.stoker
            + self.safety_valves
    }

    /// What the fire should make up for. Safety-valve blow-off is not
    /// demand: firing for it would keep the valves lifting.
    pub fn firing_demand(&self) -> f64 {
        self.total() - self.safety_valves
    }
}

/// Whole-plant state.
#[derive(Clone, Debug, PartialEq)]
pub struct SteamState {
    pub tender: TenderState,
    pub fire: FireState,
    pub boiler: BoilerState,
    pub cylinder: CylinderState,
    pub motion: MotionState,
    pub injectors: InjectorState,
    pub usage: SteamUsage,
    /// Consumption measured at the end of the previous tick; drives firing.
    pub previous_demand_lb_s: f64,
    /// Controls applied on the most recent tick.
    pub controls: ControllerInputs,
    pub elapsed_s: f64,
    pub ticks: u64,
}
