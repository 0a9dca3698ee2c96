//! Boiler: heat transfer from the flue, mass and heat balance, and pressure
//! from the saturation temperature of the water.
//!
//! The water temperature is the integrated quantity. Pressure is read back
//! from the saturation curve, so it never runs away from the stored heat.

use ls_core::{WATER_SPECIFIC_HEAT, abs_to_gauge, gauge_to_abs};
use ls_tables::SteamTables;
use serde::{Deserialize, Serialize};

use crate::controls::FiringMode;
use crate::events::{EventSink, SteamEvent};
use crate::params::{DerivedParams, MAX_SAFETY_VALVES, SteamParams};
use crate::stage::{Stage, StageContext};
use crate::state::SteamState;

/// Manual firing may overshoot max pressure by this much (psi).
pub const MANUAL_OVERSHOOT_PSI: f64 = 10.0;
/// Water temperature is capped at saturation this far above the overshoot limit (psi).
pub const WATER_TEMP_HEADROOM_PSI: f64 = 20.0;
pub const FLUE_CEILING_F: f64 = 2_500.0;
pub const AMBIENT_F: f64 = 60.0;
pub const RADIATION_STANDING_LB_H: f64 = 30.0;
pub const RADIATION_MOVING_LB_H: f64 = 60.0;
/// Water below the minimum level this long blows the fusible plug (s).
pub const FUSIBLE_PLUG_DELAY_S: f64 = 3.0;
/// Priming clears this far below the maximum level.
pub const PRIMING_HYSTERESIS: f64 = 0.02;
/// Cold start pressure as a fraction of max.
pub const COLD_START_PRESSURE_FRACTION: f64 = 0.66;
pub const HOT_START_FLUE_OFFSET_F: f64 = 400.0;
pub const COLD_START_FLUE_OFFSET_F: f64 = 100.0;
const MIN_WATER_MASS_LB: f64 = 1.0;

/// How the locomotive is found when the simulation starts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StartProfile {
    /// At working pressure with a bright fire.
    #[default]
    Hot,
    /// Raising steam from two thirds of working pressure.
    Cold,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BoilerState {
    pub pressure_psi: f64,
    pub water_temp_f: f64,
    pub water_fraction: f64,
    pub mass_lb: f64,
    pub heat_btu: f64,
    pub flue_temp_f: f64,
    /// Heat passing from flue gas to water (BTU/s).
    pub boiler_power_btu_s: f64,
    pub evaporation_lb_s: f64,
    pub heat_in_total_btu: f64,
    pub heat_out_total_btu: f64,
    pub safety_valves_open: [bool; MAX_SAFETY_VALVES],
    pub safety_discharge_lb_s: f64,
    pub priming: bool,
    pub fusible_plug_blown: bool,
    /// Time spent below the minimum water level.
    pub low_water_s: f64,
}

/// Mass of water plus steam filling `volume` at `fraction` water by volume.
pub fn mass_for_fraction(steam: &SteamTables, volume_ft3: f64, fraction: f64, psia: f64) -> f64 {
    let rho_w = steam.water_density(psia);
    let rho_s = steam.steam_density(psia);
    volume_ft3 * (fraction * rho_w + (1.0 - fraction) * rho_s)
}

pub fn fraction_for_mass(steam: &SteamTables, volume_ft3: f64, mass_lb: f64, psia: f64) -> f64 {
    let rho_w = steam.water_density(psia);
    let rho_s = steam.steam_density(psia);
    ((mass_lb / volume_ft3 - rho_s) / (rho_w - rho_s)).clamp(0.0, 1.0)
}

/// Enthalpy held by the boiler contents (BTU above 32 °F water).
pub fn stored_heat(steam: &SteamTables, volume_ft3: f64, fraction: f64, psia: f64) -> f64 {
    let water = volume_ft3 * fraction * steam.water_density(psia);
    let vapour = volume_ft3 * (1.0 - fraction) * steam.steam_density(psia);
    water * steam.water_enthalpy(psia) + vapour * steam.steam_enthalpy(psia)
}

/// Heat leaving the water (BTU/s): latent heat of the steam drawn off, plus
/// what the injectors take to condense their steam and warm the feed.
///
/// `heat_btu` and the water-temperature integrator both move by
/// `power - heat_out_btu_s(..)`, so stored heat and pressure stay in step.
pub fn heat_out_btu_s(steam_lb_s: f64, hfg: f64, injector_loss_btu_s: f64) -> f64 {
    steam_lb_s.max(0.0) * hfg + injector_loss_btu_s
}

/// Highest water temperature the integrator will reach.
pub fn water_temp_ceiling_f(p: &SteamParams, steam: &SteamTables) -> f64 {
    steam.saturation_temperature_f(gauge_to_abs(
        p.max_boiler_pressure_psi + MANUAL_OVERSHOOT_PSI + WATER_TEMP_HEADROOM_PSI,
    ))
}

impl BoilerState {
    pub fn new(p: &SteamParams, steam: &SteamTables, profile: StartProfile) -> Self {
        let (pressure, flue_offset) = match profile {
            StartProfile::Hot => (p.max_boiler_pressure_psi, HOT_START_FLUE_OFFSET_F),
            StartProfile::Cold => (
                p.max_boiler_pressure_psi * COLD_START_PRESSURE_FRACTION,
                COLD_START_FLUE_OFFSET_F,
            ),
        };
        let psia = gauge_to_abs(pressure);
        let water_temp_f = steam.saturation_temperature_f(psia);
        let fraction = p.initial_water_fraction;
        Self {
            pressure_psi: pressure,
            water_temp_f,
            water_fraction: fraction,
            mass_lb: mass_for_fraction(steam, p.boiler_volume_ft3, fraction, psia),
            heat_btu: stored_heat(steam, p.boiler_volume_ft3, fraction, psia),
            flue_temp_f: water_temp_f + flue_offset,
            boiler_power_btu_s: 0.0,
            evaporation_lb_s: 0.0,
            heat_in_total_btu: 0.0,
            heat_out_total_btu: 0.0,
            safety_valves_open: [false; MAX_SAFETY_VALVES],
            safety_discharge_lb_s: 0.0,
            priming: false,
            fusible_plug_blown: false,
            low_water_s: 0.0,
        }
    }

    pub fn safety_valve_active(&self) -> bool {
        self.safety_valves_open.iter().any(|o| *o)
    }

    /// Water mass below the surface (lb).
    pub fn water_mass_lb(&self, p: &SteamParams, steam: &SteamTables) -> f64 {
        self.water_fraction * p.boiler_volume_ft3 * steam.water_density(gauge_to_abs(self.pressure_psi))
    }

    /// Put the water at saturation for `psig` and bring mass and heat in line.
    pub fn set_pressure(&mut self, p: &SteamParams, steam: &SteamTables, psig: f64) {
        self.pressure_psi = psig.max(0.0);
        let psia = gauge_to_abs(self.pressure_psi);
        self.water_temp_f = steam.saturation_temperature_f(psia);
        self.mass_lb = mass_for_fraction(steam, p.boiler_volume_ft3, self.water_fraction, psia);
        self.heat_btu = stored_heat(steam, p.boiler_volume_ft3, self.water_fraction, psia);
        if self.flue_temp_f < self.water_temp_f {
            self.flue_temp_f = self.water_temp_f;
        }
    }

    pub fn set_water_fraction(&mut self, p: &SteamParams, steam: &SteamTables, fraction: f64) {
        self.water_fraction = ls_core::sanitize(fraction, 0.0, 1.0, p.initial_water_fraction);
        let psia = gauge_to_abs(self.pressure_psi);
        self.mass_lb = mass_for_fraction(steam, p.boiler_volume_ft3, self.water_fraction, psia);
        self.heat_btu = stored_heat(steam, p.boiler_volume_ft3, self.water_fraction, psia);
    }

    /// Remove heat from the water and let pressure follow.
    pub fn withdraw_heat(&mut self, p: &SteamParams, steam: &SteamTables, btu: f64) {
        let btu = btu.max(0.0);
        let water_mass = self.water_mass_lb(p, steam).max(MIN_WATER_MASS_LB);
        self.heat_btu = (self.heat_btu - btu).max(0.0);
        self.heat_out_total_btu += btu;
        self.water_temp_f = (self.water_temp_f - btu / (WATER_SPECIFIC_HEAT * water_mass)).max(32.0);
        self.pressure_psi =
            abs_to_gauge(steam.saturation_pressure_psia(self.water_temp_f)).max(0.0);
    }

    fn update_water_alarms(&mut self, p: &SteamParams, events: &mut EventSink, dt: f64) {
        if self.water_fraction < p.min_water_fraction {
            self.low_water_s += dt;
            if !self.fusible_plug_blown && self.low_water_s >= FUSIBLE_PLUG_DELAY_S {
                self.fusible_plug_blown = true;
                events.raise(SteamEvent::FusiblePlugBlown);
            }
        } else {
            self.low_water_s = 0.0;
        }

        if !self.priming && self.water_fraction > p.max_water_fraction {
            self.priming = true;
            events.raise(SteamEvent::PrimingStarted);
        } else if self.priming && self.water_fraction < p.max_water_fraction - PRIMING_HYSTERESIS {
            self.priming = false;
            events.raise(SteamEvent::PrimingCleared);
        }
    }
}

pub struct BoilerStage;

impl Stage for BoilerStage {
    fn name(&self) -> &'static str {
        "boiler"
    }

    fn update(&self, ctx: &StageContext<'_>, state: &mut SteamState, events: &mut EventSink, dt: f64) {
        let p = ctx.params;
        let d: &DerivedParams = ctx.derived;
        let steam = &ctx.tables.steam;
        let heat_in = state.fire.heat_release_btu_s;
        let injector_water = state.injectors.water_lb_s;
        let injector_loss = state.injectors.heat_loss_btu_s;
        let b = &mut state.boiler;

        // safety valves act on the pressure the tick started with
        let was_lifting = b.safety_valve_active();
        b.safety_discharge_lb_s = ctx.safety_valves.update(&mut b.safety_valves_open, b.pressure_psi);
        match (was_lifting, b.safety_valve_active()) {
            (false, true) => events.raise(SteamEvent::SafetyValveLifted),
            (true, false) => events.raise(SteamEvent::SafetyValveSeated),
            _ => {}
        }

        let psia = gauge_to_abs(b.pressure_psi);
        let usage = &mut state.usage;
        usage.safety_valves = b.safety_discharge_lb_s;
        usage.blower = ctx.controls.blower * ctx.tables.auxiliary.blower_lb_h(b.pressure_psi) / 3600.0;
        usage.radiation = if ctx.moving {
            RADIATION_MOVING_LB_H
        } else {
            RADIATION_STANDING_LB_H
        } / 3600.0;

        let power = (d.flue_conductance_btu_s_f * (b.flue_temp_f - b.water_temp_f)).max(0.0);
        b.boiler_power_btu_s = power;
        b.flue_temp_f = (b.flue_temp_f + (heat_in - power) * dt / d.flue_heat_capacity_btu_f)
            .clamp(AMBIENT_F, FLUE_CEILING_F);

        let hfg = steam.latent_heat(psia);
        b.evaporation_lb_s = power / hfg;

        let withdrawn = usage.withdrawn();
        let heat_out = heat_out_btu_s(withdrawn + usage.radiation, hfg, injector_loss);
        let net = power - heat_out;
        b.heat_in_total_btu += power * dt;
        b.heat_out_total_btu += heat_out * dt;
        b.heat_btu = (b.heat_btu + net * dt).max(0.0);

        b.mass_lb = (b.mass_lb + (injector_water - withdrawn) * dt).max(0.0);
        b.water_fraction = fraction_for_mass(steam, p.boiler_volume_ft3, b.mass_lb, psia);

        let water_mass = (b.water_fraction * p.boiler_volume_ft3 * steam.water_density(psia))
            .max(MIN_WATER_MASS_LB);
        b.water_temp_f = (b.water_temp_f + net * dt / (WATER_SPECIFIC_HEAT * water_mass))
            .clamp(32.0, water_temp_ceiling_f(p, steam));
        b.pressure_psi = abs_to_gauge(steam.saturation_pressure_psia(b.water_temp_f)).max(0.0);

        let limit = match ctx.controls.firing_mode {
            FiringMode::Automatic => p.max_boiler_pressure_psi,
            FiringMode::Manual => p.max_boiler_pressure_psi + MANUAL_OVERSHOOT_PSI,
        };
        if b.pressure_psi > limit {
            let limit_psia = gauge_to_abs(limit);
            b.pressure_psi = limit;
            b.water_temp_f = steam.saturation_temperature_f(limit_psia);
            b.heat_btu = stored_heat(steam, p.boiler_volume_ft3, b.water_fraction, limit_psia);
        }

        b.update_water_alarms(p, events, dt);
    }
}
