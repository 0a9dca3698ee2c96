//! Cylinders: steam-chest pressure, the indicator diagram and steam usage.

use ls_core::{ATMOSPHERIC_PSI, abs_to_gauge, fahrenheit_to_rankine, gauge_to_abs, lag_toward};

use crate::boiler::MANUAL_OVERSHOOT_PSI;
use crate::events::EventSink;
use crate::safety_valve::NAPIER_DIVISOR;
use crate::stage::{Stage, StageContext};
use crate::state::SteamState;

/// Steam chest follows throttle and boiler pressure with this lag (s).
pub const CHEST_TAU_S: f64 = 0.5;
/// Pressure drop between admission and cutoff at and above critical piston speed.
pub const MAX_WIREDRAW: f64 = 0.1;
/// Weight of last tick's usage in the smoothed usage.
pub const USAGE_SMOOTHING: f64 = 0.6;
/// Below this the crank counts as stopped (rev/s).
pub const STOPPED_CRANK_REV_S: f64 = 0.02;
/// Cylinder fills per second lost past valves and pistons at standstill.
pub const STANDSTILL_FILLS_PER_S: f64 = 0.05;
/// Drain cocks per cylinder.
pub const COCKS_PER_CYLINDER: f64 = 2.0;
/// Most of the chest pressure open cocks can bleed away.
pub const MAX_COCK_PRESSURE_LOSS: f64 = 0.5;

/// Valve events and pressures for one diagram, stroke fractions and psia.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DiagramInputs {
    pub initial_psia: f64,
    pub back_psia: f64,
    pub cutoff: f64,
    pub release: f64,
    pub compression: f64,
    pub preadmission: f64,
    pub clearance: f64,
    /// Fractional pressure drop from admission to cutoff.
    pub wiredraw: f64,
    /// Upper bound for any diagram pressure (psia).
    pub max_psia: f64,
}

/// Pressures at the corners of the indicator diagram (psia) and the MEP (psi).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct IndicatorDiagram {
    pub initial_psia: f64,
    pub cutoff_psia: f64,
    pub release_psia: f64,
    pub back_psia: f64,
    pub compression_psia: f64,
    pub mep_psi: f64,
}

/// ∫ dV/V over an expansion of ratio `r`, divided by the volume change.
fn log_mean(r: f64) -> f64 {
    if (r - 1.0).abs() < 1e-9 { 1.0 } else { r.ln() / (r - 1.0) }
}

/// Net work per unit swept volume over one double stroke, as a mean pressure.
///
/// Admission falls linearly from initial to cutoff pressure, expansion and
/// compression are hyperbolic (pV constant), release falls linearly to back
/// pressure, and pre-admission rises linearly from compression to initial
/// pressure. Atmospheric pressure cancels over the cycle.
pub fn indicator_diagram(inp: &DiagramInputs) -> IndicatorDiagram {
    let clamp = |v: f64| v.clamp(0.0, inp.max_psia);
    let c = inp.clearance;
    let p1 = clamp(inp.initial_psia);
    let p_back = clamp(inp.back_psia);
    let cutoff = inp.cutoff.clamp(0.0, inp.release);
    let p_cut = clamp(p1 * (1.0 - inp.wiredraw));

    let admission = 0.5 * (p1 + p_cut) * cutoff;

    let v_cut = cutoff + c;
    let v_rel = inp.release + c;
    let expansion_ratio = v_rel / v_cut;
    let expansion = p_cut * log_mean(expansion_ratio) * (inp.release - cutoff);
    let p_rel = clamp(p_cut / expansion_ratio);
    let release = 0.5 * (p_rel + p_back) * (1.0 - inp.release);

    let exhaust = p_back * (1.0 - inp.compression);
    let v_comp = inp.compression + c;
    let v_pre = inp.preadmission + c;
    let compression = p_back * v_comp * (v_comp / v_pre).ln();
    let p_comp = clamp(p_back * v_comp / v_pre);
    let preadmission = 0.5 * (p_comp + p1) * inp.preadmission;

    let mep = (admission + expansion + release - exhaust - compression - preadmission).max(0.0);
    IndicatorDiagram {
        initial_psia: p1,
        cutoff_psia: p_cut,
        release_psia: p_rel,
        back_psia: p_back,
        compression_psia: p_comp,
        mep_psi: mep.min(inp.max_psia),
    }
}

/// Steam in the cylinder at stroke fraction `at` less the cushion left by
/// compression (lb per stroke).
pub fn stroke_steam_lb(swept_ft3: f64, clearance: f64, at: f64, rho: f64, rho_comp: f64) -> f64 {
    (swept_ft3 * ((at + clearance) * rho - clearance * rho_comp)).max(0.0)
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CylinderState {
    pub chest_pressure_psi: f64,
    pub cutoff: f64,
    /// Corner pressures, gauge.
    pub initial_pressure_psi: f64,
    pub cutoff_pressure_psi: f64,
    pub release_pressure_psi: f64,
    pub back_pressure_psi: f64,
    pub compression_pressure_psi: f64,
    pub mean_effective_pressure_psi: f64,
    pub steam_usage_lb_s: f64,
    pub cock_usage_lb_s: f64,
    pub superheat_temp_f: f64,
    /// Achieved superheat over maximum superheat.
    pub superheat_ratio: f64,
    pub condensation_fraction: f64,
}

pub struct CylinderStage;

impl Stage for CylinderStage {
    fn name(&self) -> &'static str {
        "cylinder"
    }

    fn update(&self, ctx: &StageContext<'_>, state: &mut SteamState, _events: &mut EventSink, dt: f64) {
        let p = ctx.params;
        let d = ctx.derived;
        let steam = &ctx.tables.steam;
        let ct = &ctx.tables.cylinder;
        let throttle = ctx.controls.throttle;
        let boiler_psi = state.boiler.pressure_psi;
        let max_psia = p.max_boiler_pressure_psi + MANUAL_OVERSHOOT_PSI + ATMOSPHERIC_PSI;
        let cyl = &mut state.cylinder;

        cyl.cutoff = ctx.controls.cutoff().min(p.max_cutoff);
        cyl.chest_pressure_psi = lag_toward(cyl.chest_pressure_psi, boiler_psi * throttle, dt, CHEST_TAU_S)
            .clamp(0.0, max_psia - ATMOSPHERIC_PSI);

        let cock_flow = if ctx.controls.cylinder_cocks_open {
            f64::from(p.num_cylinders) * COCKS_PER_CYLINDER * d.cylinder_cock_area_in2 * cyl.chest_pressure_psi
                / NAPIER_DIVISOR
        } else {
            0.0
        };
        let cock_share = cock_flow / (cock_flow + cyl.steam_usage_lb_s + 1e-6);
        let admission_psi = cyl.chest_pressure_psi * (1.0 - MAX_COCK_PRESSURE_LOSS * cock_share);

        let flow_fraction = cyl.steam_usage_lb_s / d.max_evaporation_lb_s;
        let diagram = indicator_diagram(&DiagramInputs {
            initial_psia: gauge_to_abs(admission_psi),
            back_psia: gauge_to_abs(ct.back_pressure_psi(flow_fraction)),
            cutoff: cyl.cutoff,
            release: p.release_fraction,
            compression: p.compression_fraction,
            preadmission: p.preadmission_fraction,
            clearance: p.clearance_fraction,
            wiredraw: MAX_WIREDRAW * ctx.piston_speed_ratio().min(1.0),
            max_psia,
        });
        cyl.initial_pressure_psi = abs_to_gauge(diagram.initial_psia).max(0.0);
        cyl.cutoff_pressure_psi = abs_to_gauge(diagram.cutoff_psia).max(0.0);
        cyl.release_pressure_psi = abs_to_gauge(diagram.release_psia).max(0.0);
        cyl.back_pressure_psi = abs_to_gauge(diagram.back_psia).max(0.0);
        cyl.compression_pressure_psi = abs_to_gauge(diagram.compression_psia).max(0.0);
        // no admission pressure, no work: the diagram would otherwise report a
        // small MEP from back pressure alone
        cyl.mean_effective_pressure_psi = if admission_psi > 0.0 { diagram.mep_psi } else { 0.0 };

        if p.is_superheated() {
            cyl.superheat_temp_f = p.max_superheat_temp_f * ct.superheat_ratio(flow_fraction);
            cyl.superheat_ratio = cyl.superheat_temp_f / p.max_superheat_temp_f;
        } else {
            cyl.superheat_temp_f = 0.0;
            cyl.superheat_ratio = 0.0;
        }

        // admitted steam judged at cutoff and again at release, averaged
        let sat_f = steam.saturation_temperature_f(diagram.cutoff_psia);
        let superheat_density = fahrenheit_to_rankine(sat_f) / fahrenheit_to_rankine(sat_f + cyl.superheat_temp_f);
        let rho_cut = steam.steam_density(diagram.cutoff_psia) * superheat_density;
        let rho_rel = steam.steam_density(diagram.release_psia) * superheat_density;
        let rho_comp = steam.steam_density(diagram.compression_psia);
        let c = p.clearance_fraction;
        let at_cutoff = stroke_steam_lb(d.swept_volume_ft3, c, cyl.cutoff, rho_cut, rho_comp);
        let at_release = stroke_steam_lb(d.swept_volume_ft3, c, p.release_fraction, rho_rel, rho_comp);
        let per_stroke_lb = 0.5 * (at_cutoff + at_release);

        cyl.condensation_fraction = ct.condensation_fraction(ctx.crank_rpm(), cyl.cutoff);
        let condensation = if cyl.superheat_temp_f <= 0.0 {
            cyl.condensation_fraction
        } else {
            let limit = ct.superheat_limit_f(cyl.cutoff);
            if cyl.superheat_temp_f >= limit {
                0.0
            } else {
                cyl.condensation_fraction * (1.0 - cyl.superheat_temp_f / limit)
            }
        };

        let cylinders = f64::from(p.num_cylinders);
        let raw = if admission_psi <= 0.0 || cyl.cutoff <= 0.0 {
            0.0
        } else if ctx.crank_rev_s > STOPPED_CRANK_REV_S {
            // double acting: two admissions per cylinder per revolution
            per_stroke_lb * 2.0 * cylinders * ctx.crank_rev_s * (1.0 + condensation)
        } else {
            per_stroke_lb * cylinders * STANDSTILL_FILLS_PER_S * (1.0 + condensation)
        };
        cyl.steam_usage_lb_s = USAGE_SMOOTHING * cyl.steam_usage_lb_s + (1.0 - USAGE_SMOOTHING) * raw;
        cyl.cock_usage_lb_s = cock_flow;

        state.usage.cylinders = cyl.steam_usage_lb_s;
        state.usage.cylinder_cocks = cock_flow;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(cutoff: f64) -> DiagramInputs {
        DiagramInputs {
            initial_psia: gauge_to_abs(200.0),
            back_psia: gauge_to_abs(2.0),
            cutoff,
            release: 0.9,
            compression: 0.1,
            preadmission: 0.02,
            clearance: 0.08,
            wiredraw: 0.05,
            max_psia: 250.0,
        }
    }

    #[test]
    fn mep_rises_with_cutoff() {
        let mut last = 0.0;
        for i in 1..=15 {
            let mep = indicator_diagram(&inputs(i as f64 * 0.05)).mep_psi;
            assert!(mep >= last, "cutoff {} mep {mep} < {last}", i as f64 * 0.05);
            last = mep;
        }
    }

    #[test]
    fn full_cutoff_mep_is_plausible() {
        let mep = indicator_diagram(&inputs(0.75)).mep_psi;
        assert!(mep > 120.0 && mep < 200.0, "mep {mep}");
        let short = indicator_diagram(&inputs(0.15)).mep_psi;
        assert!(short > 30.0 && short < 100.0, "mep {short}");
    }

    #[test]
    fn expansion_ends_below_cutoff_pressure() {
        let d = indicator_diagram(&inputs(0.25));
        assert!(d.release_psia < d.cutoff_psia);
        assert!(d.cutoff_psia < d.initial_psia);
        assert!(d.compression_psia > d.back_psia);
    }

    #[test]
    fn cutoff_and_release_estimates_agree() {
        let tables = ls_tables::LocoTables::standard();
        let steam = &tables.steam;
        let inp = inputs(0.3);
        let d = indicator_diagram(&inp);
        let rho_comp = steam.steam_density(d.compression_psia);
        let at_cutoff = stroke_steam_lb(5.0, inp.clearance, inp.cutoff, steam.steam_density(d.cutoff_psia), rho_comp);
        let at_release = stroke_steam_lb(5.0, inp.clearance, inp.release, steam.steam_density(d.release_psia), rho_comp);
        assert!(at_cutoff > 0.0);
        assert!(
            (at_cutoff - at_release).abs() < 0.15 * at_cutoff,
            "cutoff {at_cutoff} release {at_release}"
        );
    }

    #[test]
    fn diagram_pressures_stay_bounded() {
        let d = indicator_diagram(&DiagramInputs {
            initial_psia: 1_000.0,
            ..inputs(0.5)
        });
        assert!(d.initial_psia <= 250.0);
        assert!(d.mep_psi <= 250.0);
    }
}
