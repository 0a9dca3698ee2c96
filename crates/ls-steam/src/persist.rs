//! Persisted locomotive state: the fixed 21-value record and restoring from it.

use ls_core::{gauge_to_abs, sanitize};
use serde::{Deserialize, Serialize};

use crate::boiler::{AMBIENT_F, FLUE_CEILING_F, MANUAL_OVERSHOOT_PSI, mass_for_fraction, stored_heat};
use crate::controls::ControllerInputs;
use crate::cylinder::CylinderState;
use crate::firebox::{FIRE_EXHAUSTED_FRACTION, FireState};
use crate::injector::{InjectorState, gauge_level};
use crate::motion::MotionState;
use crate::outputs::SteamOutputs;
use crate::plant::SteamPowerPlant;
use crate::state::SteamUsage;

/// Values in a persisted record.
pub const FIELD_COUNT: usize = 21;
/// Restored boiler mass may differ this much from the mass implied by level
/// and pressure before it is replaced.
pub const MASS_TOLERANCE: f64 = 0.02;
/// Restored cylinder usage is capped at this multiple of max evaporation.
pub const MAX_USAGE_RATIO: f64 = 4.0;

/// Everything needed to resume a locomotive, in record order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedSteamState {
    pub heat_out_total_btu: f64,
    pub heat_in_total_btu: f64,
    pub tender_coal_lb: f64,
    pub tender_water_gal: f64,
    pub cylinder_steam_usage_lb_s: f64,
    pub boiler_heat_btu: f64,
    pub boiler_mass_lb: f64,
    pub boiler_pressure_psi: f64,
    pub water_fraction: f64,
    pub evaporation_lb_s: f64,
    pub fire_mass_lb: f64,
    pub flue_temp_f: f64,
    pub gear: f64,
    pub throttle: f64,
    pub reverser: f64,
    pub blower: f64,
    pub damper: f64,
    pub firing_rate: f64,
    pub injector1: f64,
    pub injector2: f64,
    pub firebox_door: f64,
}

impl PersistedSteamState {
    pub fn to_fields(&self) -> [f64; FIELD_COUNT] {
        [
            self.heat_out_total_btu,
            self.heat_in_total_btu,
            self.tender_coal_lb,
            self.tender_water_gal,
            self.cylinder_steam_usage_lb_s,
            self.boiler_heat_btu,
            self.boiler_mass_lb,
            self.boiler_pressure_psi,
            self.water_fraction,
            self.evaporation_lb_s,
            self.fire_mass_lb,
            self.flue_temp_f,
            self.gear,
            self.throttle,
            self.reverser,
            self.blower,
            self.damper,
            self.firing_rate,
            self.injector1,
            self.injector2,
            self.firebox_door,
        ]
    }

    pub fn from_fields(f: &[f64; FIELD_COUNT]) -> Self {
        Self {
            heat_out_total_btu: f[0],
            heat_in_total_btu: f[1],
            tender_coal_lb: f[2],
            tender_water_gal: f[3],
            cylinder_steam_usage_lb_s: f[4],
            boiler_heat_btu: f[5],
            boiler_mass_lb: f[6],
            boiler_pressure_psi: f[7],
            water_fraction: f[8],
            evaporation_lb_s: f[9],
            fire_mass_lb: f[10],
            flue_temp_f: f[11],
            gear: f[12],
            throttle: f[13],
            reverser: f[14],
            blower: f[15],
            damper: f[16],
            firing_rate: f[17],
            injector1: f[18],
            injector2: f[19],
            firebox_door: f[20],
        }
    }
}

impl SteamPowerPlant {
    pub fn snapshot(&self) -> PersistedSteamState {
        let s = &self.state;
        let c = &s.controls;
        PersistedSteamState {
            heat_out_total_btu: s.boiler.heat_out_total_btu,
            heat_in_total_btu: s.boiler.heat_in_total_btu,
            tender_coal_lb: s.tender.coal_lb,
            tender_water_gal: s.tender.water_gal,
            cylinder_steam_usage_lb_s: s.cylinder.steam_usage_lb_s,
            boiler_heat_btu: s.boiler.heat_btu,
            boiler_mass_lb: s.boiler.mass_lb,
            boiler_pressure_psi: s.boiler.pressure_psi,
            water_fraction: s.boiler.water_fraction,
            evaporation_lb_s: s.boiler.evaporation_lb_s,
            fire_mass_lb: s.fire.fire_mass_lb,
            flue_temp_f: s.boiler.flue_temp_f,
            gear: f64::from(c.gear),
            throttle: c.throttle,
            reverser: c.reverser,
            blower: c.blower,
            damper: c.damper,
            firing_rate: c.firing_rate,
            injector1: c.injector1,
            injector2: c.injector2,
            firebox_door: c.firebox_door,
        }
    }

    /// Resume from a persisted record. Out-of-range or inconsistent values
    /// are pulled back to physically possible ones rather than rejected.
    pub fn restore(&mut self, saved: &PersistedSteamState) {
        let p = &self.params;
        let d = &self.derived;
        let steam = &self.tables.steam;
        let s = &mut self.state;

        s.tender.set_coal(saved.tender_coal_lb);
        s.tender.set_water(saved.tender_water_gal);

        let b = &mut s.boiler;
        b.pressure_psi = sanitize(
            saved.boiler_pressure_psi,
            0.0,
            p.max_boiler_pressure_psi + MANUAL_OVERSHOOT_PSI,
            p.max_boiler_pressure_psi,
        );
        let psia = gauge_to_abs(b.pressure_psi);
        b.water_temp_f = steam.saturation_temperature_f(psia);
        b.water_fraction = sanitize(saved.water_fraction, 0.0, 1.0, p.initial_water_fraction);

        let expected_mass = mass_for_fraction(steam, p.boiler_volume_ft3, b.water_fraction, psia);
        let mass = sanitize(saved.boiler_mass_lb, 0.0, f64::MAX, expected_mass);
        b.mass_lb = if (mass - expected_mass).abs() > MASS_TOLERANCE * expected_mass {
            tracing::warn!(saved = mass, expected = expected_mass, "restored boiler mass inconsistent, recomputed");
            expected_mass
        } else {
            mass
        };
        let expected_heat = stored_heat(steam, p.boiler_volume_ft3, b.water_fraction, psia);
        b.heat_btu = sanitize(saved.boiler_heat_btu, 0.0, f64::MAX, expected_heat);
        b.heat_in_total_btu = sanitize(saved.heat_in_total_btu, 0.0, f64::MAX, 0.0);
        b.heat_out_total_btu = sanitize(saved.heat_out_total_btu, 0.0, f64::MAX, 0.0);
        b.evaporation_lb_s = sanitize(saved.evaporation_lb_s, 0.0, MAX_USAGE_RATIO * d.max_evaporation_lb_s, 0.0);
        b.flue_temp_f = sanitize(saved.flue_temp_f, AMBIENT_F, FLUE_CEILING_F, b.water_temp_f);
        // failure and alarm state is not saved: judge it afresh from the level
        b.safety_valves_open = Default::default();
        b.safety_discharge_lb_s = 0.0;
        b.boiler_power_btu_s = 0.0;
        b.low_water_s = 0.0;
        b.fusible_plug_blown = false;
        b.priming = b.water_fraction > p.max_water_fraction;

        let fire_mass = sanitize(saved.fire_mass_lb, 0.0, d.max_fire_mass_lb, d.ideal_fire_mass_lb);
        let fire_exhausted = fire_mass < FIRE_EXHAUSTED_FRACTION * d.ideal_fire_mass_lb;
        // a fire in balance with the saved evaporation, fed as fast as it burns
        let burn = if fire_exhausted || s.tender.coal_exhausted {
            0.0
        } else {
            (self.tables.firing.coal_for_steam_lb_h(b.evaporation_lb_s * 3600.0) / 3600.0)
                .clamp(0.0, d.max_burn_rate_lb_s)
        };
        s.fire = FireState {
            fire_mass_lb: fire_mass,
            feed_rate_lb_s: burn,
            burn_rate_lb_s: burn,
            fire_exhausted,
            ..FireState::lit(d)
        };

        let usage = sanitize(
            saved.cylinder_steam_usage_lb_s,
            0.0,
            MAX_USAGE_RATIO * d.max_evaporation_lb_s,
            0.0,
        );
        s.cylinder = CylinderState {
            steam_usage_lb_s: usage,
            ..CylinderState::default()
        };
        s.usage = SteamUsage {
            cylinders: usage,
            ..SteamUsage::default()
        };
        s.previous_demand_lb_s = usage;
        s.motion = MotionState::default();
        s.injectors = InjectorState {
            water_gauge_level: gauge_level(p, b.water_fraction),
            ..InjectorState::default()
        };

        let gear = sanitize(saved.gear.round(), 0.0, p.gear_ratios.len() as f64, 0.0) as u32;
        s.controls = ControllerInputs {
            throttle: saved.throttle,
            reverser: saved.reverser,
            blower: saved.blower,
            damper: saved.damper,
            firing_rate: saved.firing_rate,
            injector1: saved.injector1,
            injector2: saved.injector2,
            firebox_door: saved.firebox_door,
            gear,
            ..s.controls.clone()
        }
        .clamped(p.max_cutoff, p.gear_ratios.len());
        s.cylinder.chest_pressure_psi = s.boiler.pressure_psi * s.controls.throttle;

        tracing::info!(
            locomotive = %p.name,
            pressure_psi = s.boiler.pressure_psi,
            water = s.boiler.water_fraction,
            coal_lb = s.tender.coal_lb,
            "steam plant restored"
        );
        self.outputs = SteamOutputs::collect(&self.state, &self.derived, Vec::new());
    }
}
