//! Firebox: fuel feed, combustion and heat release, plus the end-of-tick
//! feedback that sets next tick's feed.

use ls_core::lag_toward;

use crate::controls::FiringMode;
use crate::events::{EventSink, SteamEvent};
use crate::params::DerivedParams;
use crate::stage::{Stage, StageContext};
use crate::state::SteamState;

/// Fire counts as out below this fraction of the ideal bed.
pub const FIRE_EXHAUSTED_FRACTION: f64 = 0.05;
/// Burn rate lag (s).
pub const BURN_TAU_S: f64 = 5.0;
/// Feed lag with a hand-firing fireman (s).
pub const FIREMAN_FEED_TAU_S: f64 = 15.0;
/// Feed lag with a mechanical stoker (s).
pub const STOKER_FEED_TAU_S: f64 = 5.0;
/// Draught at standstill with the blower shut, as a fraction of running draught.
pub const STANDING_DRAUGHT: f64 = 0.4;
/// Automatic fireman keeps at least this fraction of max burn going.
pub const AUTO_MIN_BURN_FRACTION: f64 = 0.02;
/// Extra steam demand per unit pressure deficit, relative to max evaporation.
pub const AUTO_DEFICIT_GAIN: f64 = 1.0;
/// Automatic fireman corrects fire mass error over this long (s).
pub const AUTO_BED_CORRECTION_S: f64 = 60.0;
/// Heat lost through a fully open firebox door.
pub const DOOR_HEAT_LOSS: f64 = 0.25;

#[derive(Clone, Debug, PartialEq)]
pub struct FireState {
    pub fire_mass_lb: f64,
    pub feed_rate_lb_s: f64,
    pub burn_rate_lb_s: f64,
    pub heat_release_btu_s: f64,
    /// lb/ft²/h on the grate.
    pub combustion_rate: f64,
    pub efficiency: f64,
    pub fire_exhausted: bool,
}

impl FireState {
    /// An ideal bed, burning nothing yet.
    pub fn lit(derived: &DerivedParams) -> Self {
        Self {
            fire_mass_lb: derived.ideal_fire_mass_lb,
            feed_rate_lb_s: 0.0,
            burn_rate_lb_s: 0.0,
            heat_release_btu_s: 0.0,
            combustion_rate: 0.0,
            efficiency: 0.0,
            fire_exhausted: false,
        }
    }

    pub fn is_burning(&self) -> bool {
        !self.fire_exhausted
    }
}

/// Draught multiplier from motion or the blower, and the damper.
fn draught(ctx: &StageContext<'_>) -> f64 {
    let draught = if ctx.moving {
        1.0
    } else {
        STANDING_DRAUGHT + (1.0 - STANDING_DRAUGHT) * ctx.controls.blower
    };
    draught * (0.6 + 0.4 * ctx.controls.damper)
}

/// Burn rate the fire is heading toward (lb/s).
pub fn burn_target(ctx: &StageContext<'_>, state: &SteamState) -> f64 {
    let p = ctx.params;
    let d = ctx.derived;
    if state.tender.coal_exhausted {
        return 0.0;
    }

    let mut demand_lb_h = state.previous_demand_lb_s.max(0.0) * 3600.0;
    let automatic = ctx.controls.firing_mode == FiringMode::Automatic;
    if automatic {
        let deficit = ((p.max_boiler_pressure_psi - state.boiler.pressure_psi)
            / p.max_boiler_pressure_psi)
            .clamp(0.0, 1.0);
        demand_lb_h += deficit * d.max_evaporation_lb_s * 3600.0 * AUTO_DEFICIT_GAIN;
    }

    let bed = (state.fire.fire_mass_lb / d.ideal_fire_mass_lb).clamp(0.0, 1.0);
    let coal_lb_s = ctx.tables.firing.coal_for_steam_lb_h(demand_lb_h) / 3600.0;
    let mut target = coal_lb_s * draught(ctx) * bed;
    if automatic {
        target = target.max(AUTO_MIN_BURN_FRACTION * d.max_burn_rate_lb_s * bed);
    }
    target.min(d.max_burn_rate_lb_s)
}

pub struct FireboxStage;

impl Stage for FireboxStage {
    fn name(&self) -> &'static str {
        "firebox"
    }

    fn update(&self, ctx: &StageContext<'_>, state: &mut SteamState, events: &mut EventSink, dt: f64) {
        let p = ctx.params;
        let d = ctx.derived;
        let extinguished = state.fire.fire_exhausted || state.boiler.fusible_plug_blown;
        let target = burn_target(ctx, state);
        let feed = if state.tender.coal_exhausted {
            0.0
        } else {
            state.fire.feed_rate_lb_s
        };

        let fire = &mut state.fire;
        fire.burn_rate_lb_s = if extinguished {
            0.0
        } else {
            lag_toward(fire.burn_rate_lb_s, target, dt, BURN_TAU_S).max(0.0)
        };
        fire.fire_mass_lb =
            (fire.fire_mass_lb + (feed - fire.burn_rate_lb_s) * dt).clamp(0.0, d.max_fire_mass_lb);

        fire.combustion_rate = fire.burn_rate_lb_s * 3600.0 / p.grate_area_ft2;
        fire.efficiency = ctx.tables.firing.boiler_efficiency(fire.combustion_rate);
        let door = 1.0 - DOOR_HEAT_LOSS * ctx.controls.firebox_door;
        fire.heat_release_btu_s =
            fire.burn_rate_lb_s * p.fuel_calorific_btu_per_lb * fire.efficiency * door;

        if !fire.fire_exhausted && fire.fire_mass_lb < FIRE_EXHAUSTED_FRACTION * d.ideal_fire_mass_lb {
            fire.fire_exhausted = true;
            fire.burn_rate_lb_s = 0.0;
            fire.heat_release_btu_s = 0.0;
            events.raise(SteamEvent::FireExhausted);
        }
    }
}

/// Feed the fireman or stoker is aiming for (lb/s).
pub fn feed_target(d: &DerivedParams, mode: FiringMode, firing_rate: f64, fire: &FireState) -> f64 {
    match mode {
        FiringMode::Manual => firing_rate * d.max_feed_rate_lb_s,
        FiringMode::Automatic => {
            let correction = (d.ideal_fire_mass_lb - fire.fire_mass_lb) / AUTO_BED_CORRECTION_S;
            (fire.burn_rate_lb_s + correction).clamp(0.0, d.max_feed_rate_lb_s)
        }
    }
}

/// Last stage: record this tick's consumption as next tick's firing demand
/// and move the feed toward its target.
pub struct FiringFeedbackStage;

impl Stage for FiringFeedbackStage {
    fn name(&self) -> &'static str {
        "firing_feedback"
    }

    fn update(&self, ctx: &StageContext<'_>, state: &mut SteamState, _events: &mut EventSink, dt: f64) {
        let p = ctx.params;
        state.previous_demand_lb_s = state.usage.firing_demand();

        let target = feed_target(
            ctx.derived,
            ctx.controls.firing_mode,
            ctx.controls.firing_rate,
            &state.fire,
        );
        let tau = if p.stoker_fitted {
            STOKER_FEED_TAU_S
        } else {
            FIREMAN_FEED_TAU_S
        };
        state.fire.feed_rate_lb_s = if state.tender.coal_exhausted || state.fire.fire_exhausted {
            0.0
        } else {
            lag_toward(state.fire.feed_rate_lb_s, target, dt, tau).max(0.0)
        };
    }
}
