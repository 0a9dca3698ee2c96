//! Injectors feeding the boiler from the tender, and the water gauge.

use ls_core::{WATER_LB_PER_GALLON, gauge_to_abs};

use crate::controls::FiringMode;
use crate::params::SteamParams;
use crate::events::EventSink;
use crate::stage::{Stage, StageContext};
use crate::state::SteamState;

/// Automatic injector 1 runs below target minus this and stops above target plus this.
pub const PRIMARY_BAND: f64 = 0.01;
/// Automatic injector 2 only starts once the level is this far below target.
pub const SECONDARY_START_BELOW: f64 = 0.05;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct InjectorState {
    /// Latches held by the automatic fireman.
    pub injector1_on: bool,
    pub injector2_on: bool,
    /// Capacity fractions applied this tick.
    pub injector1_fraction: f64,
    pub injector2_fraction: f64,
    pub water_lb_s: f64,
    pub steam_lb_s: f64,
    pub delivery_temp_f: f64,
    /// Heat spent condensing injector steam and warming feed to boiler temperature (BTU/s).
    pub heat_loss_btu_s: f64,
    /// 0 at the minimum level, 1 at the maximum.
    pub water_gauge_level: f64,
}

impl InjectorState {
    /// Automatic level control with hysteresis around `target`.
    pub fn regulate(&mut self, fraction: f64, target: f64) {
        if fraction < target - PRIMARY_BAND {
            self.injector1_on = true;
        } else if fraction > target + PRIMARY_BAND {
            self.injector1_on = false;
        }
        if fraction < target - SECONDARY_START_BELOW {
            self.injector2_on = true;
        } else if fraction > target - PRIMARY_BAND {
            self.injector2_on = false;
        }
    }
}

fn on_off(on: bool) -> f64 {
    if on { 1.0 } else { 0.0 }
}

/// Water gauge reading for a boiler water fraction: 0 at the minimum level,
/// 1 at the maximum.
pub fn gauge_level(p: &SteamParams, fraction: f64) -> f64 {
    ((fraction - p.min_water_fraction) / (p.max_water_fraction - p.min_water_fraction)).clamp(0.0, 1.0)
}

pub struct InjectorStage;

impl Stage for InjectorStage {
    fn name(&self) -> &'static str {
        "injector"
    }

    fn update(&self, ctx: &StageContext<'_>, state: &mut SteamState, _events: &mut EventSink, _dt: f64) {
        let p = ctx.params;
        let it = &ctx.tables.injector;
        let steam = &ctx.tables.steam;
        let psi = state.boiler.pressure_psi;
        let fraction = state.boiler.water_fraction;
        let inj = &mut state.injectors;

        let (f1, f2) = match ctx.controls.firing_mode {
            FiringMode::Manual => (ctx.controls.injector1, ctx.controls.injector2),
            FiringMode::Automatic => {
                inj.regulate(fraction, p.initial_water_fraction);
                (on_off(inj.injector1_on), on_off(inj.injector2_on))
            }
        };
        let (f1, f2) = if state.tender.water_exhausted { (0.0, 0.0) } else { (f1, f2) };
        inj.injector1_fraction = f1;
        inj.injector2_fraction = f2;

        let capacity_gal_s = ctx.injector.flow_gal_per_min(psi) / 60.0;
        let gal1 = capacity_gal_s * f1;
        let gal2 = capacity_gal_s * f2;
        let gal = gal1 + gal2;

        inj.water_lb_s = gal * WATER_LB_PER_GALLON;
        inj.steam_lb_s = gal * it.steam_per_gallon_lb(psi);
        inj.delivery_temp_f = if gal > 0.0 {
            (gal1 * it.delivery_temp_f(psi, f1) + gal2 * it.delivery_temp_f(psi, f2)) / gal
        } else {
            it.delivery_temp_f(psi, 0.0)
        };

        let psia = gauge_to_abs(psi);
        let delivered_enthalpy = inj.delivery_temp_f - 32.0;
        let condensing = inj.steam_lb_s * (steam.steam_enthalpy(psia) - delivered_enthalpy);
        let warming = inj.water_lb_s * (steam.water_enthalpy(psia) - delivered_enthalpy);
        inj.heat_loss_btu_s = (condensing + warming).max(0.0);
        state.usage.injectors = inj.steam_lb_s;

        inj.water_gauge_level = gauge_level(p, fraction);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_injector_has_hysteresis() {
        let mut inj = InjectorState::default();
        inj.regulate(0.785, 0.8);
        assert!(inj.injector1_on && !inj.injector2_on);
        inj.regulate(0.805, 0.8);
        assert!(inj.injector1_on);
        inj.regulate(0.815, 0.8);
        assert!(!inj.injector1_on);
    }

    #[test]
    fn secondary_injector_only_when_well_below_target() {
        let mut inj = InjectorState::default();
        inj.regulate(0.74, 0.8);
        assert!(inj.injector1_on && inj.injector2_on);
        inj.regulate(0.77, 0.8);
        assert!(inj.injector2_on);
        inj.regulate(0.795, 0.8);
        assert!(!inj.injector2_on && inj.injector1_on);
    }
}
