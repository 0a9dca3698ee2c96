//! Per-tick outputs read by the vehicle dynamics, cab gauges and effects.

use ls_core::hp_to_watts;
use serde::{Deserialize, Serialize};

use crate::events::SteamEvent;
use crate::params::DerivedParams;
use crate::state::{SteamState, SteamUsage};

/// Exhaust particles emitted per lb of exhaust steam.
pub const PLUME_PARTICLES_PER_LB: f64 = 40.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SmokeColor {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// Chimney exhaust: how much and how dark.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExhaustPlume {
    pub particle_rate: f64,
    /// 0 clean white steam, 1 thick black smoke.
    pub darkness: f64,
    pub color: SmokeColor,
}

impl ExhaustPlume {
    /// Green coal on the fire (feed ahead of burn) makes dark smoke.
    pub fn from_state(state: &SteamState, derived: &DerivedParams) -> Self {
        let exhaust = state.usage.cylinders + state.usage.cylinder_cocks + state.usage.blower;
        let unburnt = (state.fire.feed_rate_lb_s - state.fire.burn_rate_lb_s).max(0.0);
        let darkness = (unburnt / derived.max_burn_rate_lb_s * 4.0).clamp(0.0, 1.0);
        let shade = 0.9 - 0.8 * darkness;
        Self {
            particle_rate: exhaust * PLUME_PARTICLES_PER_LB,
            darkness,
            color: SmokeColor {
                r: shade,
                g: shade,
                b: shade,
            },
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SteamOutputs {
    /// Signed force at the rail (N).
    pub motive_force_n: f64,
    pub drawbar_pull_n: f64,
    pub tractive_effort_lbf: f64,
    pub indicated_hp: f64,
    pub indicated_power_w: f64,
    pub boiler_pressure_psi: f64,
    pub water_fraction: f64,
    pub water_gauge_level: f64,
    pub evaporation_lb_s: f64,
    pub fire_mass_lb: f64,
    pub burn_rate_lb_s: f64,
    pub fuel_feed_lb_s: f64,
    pub tender_coal_lb: f64,
    pub tender_water_gal: f64,
    pub coal_exhausted: bool,
    pub water_exhausted: bool,
    pub fire_exhausted: bool,
    pub mean_effective_pressure_psi: f64,
    pub superheat_temp_f: f64,
    pub usage: SteamUsage,
    pub injector_water_lb_s: f64,
    pub safety_valve_active: bool,
    pub safety_valve_discharge_lb_s: f64,
    pub priming: bool,
    pub fusible_plug_blown: bool,
    pub wheel_slip: bool,
    pub exhaust: ExhaustPlume,
    /// Raised during the tick that produced these outputs.
    pub events: Vec<SteamEvent>,
}

impl SteamOutputs {
    pub fn collect(state: &SteamState, derived: &DerivedParams, events: Vec<SteamEvent>) -> Self {
        let b = &state.boiler;
        Self {
            motive_force_n: state.motion.motive_force_n,
            drawbar_pull_n: state.motion.drawbar_pull_n,
            tractive_effort_lbf: state.motion.tractive_effort_lbf,
            indicated_hp: state.motion.indicated_hp,
            indicated_power_w: hp_to_watts(state.motion.indicated_hp),
            boiler_pressure_psi: b.pressure_psi,
            water_fraction: b.water_fraction,
            water_gauge_level: state.injectors.water_gauge_level,
            evaporation_lb_s: b.evaporation_lb_s,
            fire_mass_lb: state.fire.fire_mass_lb,
            burn_rate_lb_s: state.fire.burn_rate_lb_s,
            fuel_feed_lb_s: state.fire.feed_rate_lb_s,
            tender_coal_lb: state.tender.coal_lb,
            tender_water_gal: state.tender.water_gal,
            coal_exhausted: state.tender.coal_exhausted,
            water_exhausted: state.tender.water_exhausted,
            fire_exhausted: state.fire.fire_exhausted,
            mean_effective_pressure_psi: state.cylinder.mean_effective_pressure_psi,
            superheat_temp_f: state.cylinder.superheat_temp_f,
            usage: state.usage,
            injector_water_lb_s: state.injectors.water_lb_s,
            safety_valve_active: b.safety_valve_active(),
            safety_valve_discharge_lb_s: b.safety_discharge_lb_s,
            priming: b.priming,
            fusible_plug_blown: b.fusible_plug_blown,
            wheel_slip: state.motion.wheel_slip,
            exhaust: ExhaustPlume::from_state(state, derived),
            events,
        }
    }
}
