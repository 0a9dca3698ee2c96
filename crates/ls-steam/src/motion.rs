//! Tractive effort, indicated power, drawbar pull and wheel slip.

use ls_core::lbf_to_newtons;
use ls_tables::SpeedCurve;

use crate::events::EventSink;
use crate::params::SteamParams;
use crate::stage::{Stage, StageContext};
use crate::state::SteamState;

/// Water carried over into the cylinders halves the available effort.
pub const PRIMING_FORCE_FACTOR: f64 = 0.5;
/// Slip is only checked below this speed (m/s).
pub const SLIP_CHECK_SPEED_MPS: f64 = 1.0;
/// Slipping wheels transmit this share of the static adhesion limit.
pub const SLIP_ADHESION_FACTOR: f64 = 0.8;
const FT_LB_PER_MIN_PER_HP: f64 = 33_000.0;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MotionState {
    /// Magnitude of the effort at the rail (lbf).
    pub tractive_effort_lbf: f64,
    /// Signed force at the rail (N).
    pub motive_force_n: f64,
    pub drawbar_pull_n: f64,
    pub indicated_hp: f64,
    pub speed_factor: f64,
    pub wheel_slip: bool,
}

/// Peak over mean crank torque factor for the cylinder arrangement.
pub fn crank_factor(num_cylinders: u32) -> f64 {
    match num_cylinders {
        3 => 2.0,
        4 => 2.0 * std::f64::consts::SQRT_2,
        _ => std::f64::consts::SQRT_2,
    }
}

pub fn speed_curve(p: &SteamParams) -> SpeedCurve {
    if p.is_geared() {
        SpeedCurve::Geared
    } else if p.is_superheated() {
        SpeedCurve::Superheated
    } else {
        SpeedCurve::Saturated
    }
}

pub struct MotionStage;

impl Stage for MotionStage {
    fn name(&self) -> &'static str {
        "motion"
    }

    fn update(&self, ctx: &StageContext<'_>, state: &mut SteamState, _events: &mut EventSink, _dt: f64) {
        let p = ctx.params;
        let d = ctx.derived;
        let cyl = &state.cylinder;
        let m = &mut state.motion;

        let Some(ratio) = ctx.gear_ratio else {
            // neutral: the cylinders turn nothing
            *m = MotionState {
                drawbar_pull_n: -resistance(ctx),
                ..MotionState::default()
            };
            return;
        };

        let pairs = f64::from(p.num_cylinders) / 2.0;
        let bore2 = p.cylinder_bore_in * p.cylinder_bore_in;
        let mep = cyl.mean_effective_pressure_psi;

        m.speed_factor = ctx.tables.cylinder.speed_factor(speed_curve(p), ctx.piston_speed_ratio());
        let mut te = pairs * bore2 * p.cylinder_stroke_in * mep / p.drive_wheel_diameter_in
            * p.mechanical_efficiency
            * ratio
            * m.speed_factor;
        if state.boiler.priming {
            te *= PRIMING_FORCE_FACTOR;
        }
        te = te.clamp(0.0, d.starting_tractive_effort_lbf * ratio);

        let direction = ctx.controls.direction();
        m.wheel_slip = false;
        if ctx.env.speed_mps.abs() < SLIP_CHECK_SPEED_MPS && te > 0.0 {
            let piston_force = cyl.initial_pressure_psi * d.piston_area_in2;
            let wheel_force = crank_factor(p.num_cylinders) * piston_force * p.cylinder_stroke_in
                / p.drive_wheel_diameter_in
                * ratio;
            let adhesion = p.weight_on_drivers_lb * ctx.env.adhesion_coefficient();
            if wheel_force > adhesion {
                m.wheel_slip = true;
                te = te.min(adhesion * SLIP_ADHESION_FACTOR);
            }
        }

        m.tractive_effort_lbf = te;
        m.motive_force_n = lbf_to_newtons(te) * direction;
        m.indicated_hp = f64::from(p.num_cylinders)
            * mep
            * (p.cylinder_stroke_in / 12.0)
            * d.piston_area_in2
            * 2.0
            * ctx.crank_rpm()
            / FT_LB_PER_MIN_PER_HP;
        m.drawbar_pull_n = m.motive_force_n - resistance(ctx);
    }
}

/// Davis resistance acting against the direction of travel (N).
fn resistance(ctx: &StageContext<'_>) -> f64 {
    let v = ctx.env.speed_mps;
    if v.abs() < 1e-3 {
        0.0
    } else {
        ctx.params.davis.resistance_n(v) * v.signum()
    }
}
