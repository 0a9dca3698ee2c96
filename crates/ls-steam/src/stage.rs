//! The fixed-order update pipeline.
//!
//! Every tick runs the stages below in order. A stage reads whatever earlier
//! stages wrote this tick and whatever later stages wrote last tick; firing
//! demand in particular always lags consumption by one tick.

use ls_tables::{InjectorSize, LocoTables};

use crate::auxiliary::AuxiliaryStage;
use crate::boiler::BoilerStage;
use crate::controls::{ControllerInputs, Environment};
use crate::cylinder::CylinderStage;
use crate::events::EventSink;
use crate::firebox::{FireboxStage, FiringFeedbackStage};
use crate::injector::InjectorStage;
use crate::motion::MotionStage;
use crate::params::{DerivedParams, SteamParams};
use crate::safety_valve::SafetyValveBank;
use crate::state::SteamState;
use crate::tender::TenderStage;

/// Below this the locomotive counts as stationary (m/s).
pub const MOVING_SPEED_MPS: f64 = 0.5;

/// One step of the pipeline.
pub trait Stage: Sync {
    fn name(&self) -> &'static str;

    /// Advance this stage's slice of `state` by `dt` seconds.
    fn update(&self, ctx: &StageContext<'_>, state: &mut SteamState, events: &mut EventSink, dt: f64);
}

pub static PIPELINE: [&dyn Stage; 8] = [
    &TenderStage,
    &FireboxStage,
    &BoilerStage,
    &CylinderStage,
    &MotionStage,
    &AuxiliaryStage,
    &InjectorStage,
    &FiringFeedbackStage,
];

/// Read-only view shared by all stages for one tick.
pub struct StageContext<'a> {
    pub params: &'a SteamParams,
    pub derived: &'a DerivedParams,
    pub tables: &'a LocoTables,
    pub injector: &'a InjectorSize,
    pub safety_valves: &'a SafetyValveBank,
    pub controls: &'a ControllerInputs,
    pub env: &'a Environment,
    /// Wheel-to-crank ratio; `None` when a geared locomotive is in neutral.
    pub gear_ratio: Option<f64>,
    /// Crankshaft revolutions per second.
    pub crank_rev_s: f64,
    pub piston_speed_ft_min: f64,
    pub moving: bool,
}

impl<'a> StageContext<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        params: &'a SteamParams,
        derived: &'a DerivedParams,
        tables: &'a LocoTables,
        injector: &'a InjectorSize,
        safety_valves: &'a SafetyValveBank,
        controls: &'a ControllerInputs,
        env: &'a Environment,
    ) -> Self {
        let gear_ratio = gear_ratio(params, controls.gear);
        let wheel_rev_s = env.speed_mps.abs() / derived.wheel_circumference_m;
        let crank_rev_s = wheel_rev_s * gear_ratio.unwrap_or(0.0);
        // two strokes per revolution
        let piston_speed_ft_min = 2.0 * params.cylinder_stroke_in / 12.0 * crank_rev_s * 60.0;
        Self {
            params,
            derived,
            tables,
            injector,
            safety_valves,
            controls,
            env,
            gear_ratio,
            crank_rev_s,
            piston_speed_ft_min,
            moving: env.speed_mps.abs() > MOVING_SPEED_MPS,
        }
    }

    pub fn crank_rpm(&self) -> f64 {
        self.crank_rev_s * 60.0
    }

    pub fn piston_speed_ratio(&self) -> f64 {
        self.piston_speed_ft_min / self.params.critical_piston_speed_ft_min
    }
}

/// Direct drive is always 1:1; geared engines use 1-based gear positions.
pub fn gear_ratio(params: &SteamParams, gear: u32) -> Option<f64> {
    if !params.is_geared() {
        return Some(1.0);
    }
    match gear {
        0 => None,
        g => params.gear_ratios.get(g as usize - 1).copied(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_order_is_fixed() {
        let names: Vec<_> = PIPELINE.iter().map(|s| s.name()).collect();
        assert_eq!(
            names,
            [
                "tender",
                "firebox",
                "boiler",
                "cylinder",
                "motion",
                "auxiliary",
                "injector",
                "firing_feedback"
            ]
        );
    }

    #[test]
    fn neutral_gear_has_no_ratio() {
        let p = SteamParams::geared_logger();
        assert_eq!(gear_ratio(&p, 0), None);
        assert_eq!(gear_ratio(&p, 1), Some(3.2));
        assert_eq!(gear_ratio(&p, 3), None);
        assert_eq!(gear_ratio(&SteamParams::mixed_traffic(), 0), Some(1.0));
    }
}
