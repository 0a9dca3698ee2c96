//! Locomotive parameter bundle and the quantities derived from it once at
//! construction.

use ls_core::{LsError, LsResult, inches_to_meters};
use serde::{Deserialize, Serialize};

/// Most safety valves a boiler may carry.
pub const MAX_SAFETY_VALVES: usize = 4;

/// Bulk density of a burning coal bed (lb/ft³).
pub const FIRE_BED_DENSITY_LB_FT3: f64 = 50.0;
/// Max fire mass relative to the ideal bed.
pub const MAX_FIRE_MASS_RATIO: f64 = 1.6;
/// Grate limit on combustion (lb coal per ft² per hour).
pub const MAX_COMBUSTION_RATE_LB_FT2_H: f64 = 180.0;
/// Fireman or stoker can feed this much more than the grate burns.
pub const MAX_FEED_RATIO: f64 = 1.25;
/// Design evaporation per unit heating surface (lb/ft²/h).
pub const EVAPORATION_LB_FT2_H: f64 = 12.0;
/// Flue-to-water heat transfer coefficient (BTU/h/ft²/°F).
pub const HEAT_TRANSFER_COEFF_BTU_H_FT2_F: f64 = 8.5;
/// Divides the conductance for tube wall and scale resistance.
pub const TUBE_WALL_FACTOR: f64 = 1.0;
/// Time constant of the flue gas temperature (s).
pub const FLUE_TIME_CONSTANT_S: f64 = 30.0;
/// Starting tractive effort uses this fraction of boiler pressure.
pub const STARTING_PRESSURE_FACTOR: f64 = 0.85;

/// Safety valve bank configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SafetyValveParams {
    /// Number of valves (1..=4).
    pub count: u32,
    /// Effective discharge area per valve (in²).
    pub discharge_area_in2: f64,
    /// First valve lifts at max pressure + this (psi).
    pub start_margin_psi: f64,
    /// First valve reseats at max pressure - this (psi).
    pub drop_margin_psi: f64,
    /// Each further valve lifts and reseats this much higher (psi).
    pub spacing_psi: f64,
}

impl Default for SafetyValveParams {
    fn default() -> Self {
        Self {
            count: 2,
            discharge_area_in2: 1.0,
            start_margin_psi: 2.0,
            drop_margin_psi: 3.0,
            spacing_psi: 0.5,
        }
    }
}

/// Davis resistance of the locomotive itself: a + b·v + c·v² (N, v in m/s).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DavisCoefficients {
    pub a_n: f64,
    pub b_n_per_mps: f64,
    pub c_n_per_mps2: f64,
}

impl Default for DavisCoefficients {
    fn default() -> Self {
        Self {
            a_n: 1_500.0,
            b_n_per_mps: 30.0,
            c_n_per_mps2: 8.0,
        }
    }
}

impl DavisCoefficients {
    pub fn resistance_n(&self, speed_mps: f64) -> f64 {
        let v = speed_mps.abs();
        self.a_n + self.b_n_per_mps * v + self.c_n_per_mps2 * v * v
    }
}

fn default_clearance() -> f64 {
    0.08
}
fn default_release() -> f64 {
    0.9
}
fn default_compression() -> f64 {
    0.1
}
fn default_preadmission() -> f64 {
    0.02
}
fn default_max_cutoff() -> f64 {
    0.75
}
fn default_mechanical_efficiency() -> f64 {
    0.9
}
fn default_calorific() -> f64 {
    13_700.0
}
fn default_fire_depth() -> f64 {
    8.0
}
fn default_initial_water_fraction() -> f64 {
    0.8
}
fn default_min_water_fraction() -> f64 {
    0.55
}
fn default_max_water_fraction() -> f64 {
    0.93
}
fn default_critical_piston_speed() -> f64 {
    1_000.0
}
fn default_cock_diameter() -> f64 {
    0.375
}

/// Pre-populated locomotive parameters, handed over at construction.
///
/// Units follow locomotive practice: inches, psi (gauge), lb, ft², BTU, °F.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SteamParams {
    pub name: String,
    pub num_cylinders: u32,
    pub cylinder_bore_in: f64,
    pub cylinder_stroke_in: f64,
    /// Clearance volume as a fraction of swept volume.
    #[serde(default = "default_clearance")]
    pub clearance_fraction: f64,
    /// Stroke fraction where the exhaust opens.
    #[serde(default = "default_release")]
    pub release_fraction: f64,
    /// Stroke fraction (from the start) where the exhaust closes on the return stroke.
    #[serde(default = "default_compression")]
    pub compression_fraction: f64,
    /// Stroke fraction before dead centre where admission opens.
    #[serde(default = "default_preadmission")]
    pub preadmission_fraction: f64,
    #[serde(default = "default_max_cutoff")]
    pub max_cutoff: f64,
    pub drive_wheel_diameter_in: f64,
    pub weight_on_drivers_lb: f64,
    #[serde(default = "default_mechanical_efficiency")]
    pub mechanical_efficiency: f64,
    pub max_boiler_pressure_psi: f64,
    /// Total water + steam space (ft³).
    pub boiler_volume_ft3: f64,
    pub evaporation_area_ft2: f64,
    pub grate_area_ft2: f64,
    #[serde(default = "default_calorific")]
    pub fuel_calorific_btu_per_lb: f64,
    #[serde(default = "default_fire_depth")]
    pub ideal_fire_depth_in: f64,
    /// Zero for a saturated locomotive.
    #[serde(default)]
    pub max_superheat_temp_f: f64,
    pub max_tender_coal_lb: f64,
    pub max_tender_water_gal: f64,
    /// Empty for direct drive.
    #[serde(default)]
    pub gear_ratios: Vec<f64>,
    #[serde(default)]
    pub stoker_fitted: bool,
    #[serde(default)]
    pub safety_valves: SafetyValveParams,
    #[serde(default = "default_initial_water_fraction")]
    pub initial_water_fraction: f64,
    #[serde(default = "default_min_water_fraction")]
    pub min_water_fraction: f64,
    #[serde(default = "default_max_water_fraction")]
    pub max_water_fraction: f64,
    #[serde(default = "default_critical_piston_speed")]
    pub critical_piston_speed_ft_min: f64,
    #[serde(default = "default_cock_diameter")]
    pub cylinder_cock_diameter_in: f64,
    #[serde(default)]
    pub davis: DavisCoefficients,
}

impl SteamParams {
    /// Two-cylinder superheated mixed-traffic 4-6-0.
    pub fn mixed_traffic() -> Self {
        Self {
            name: "Mixed traffic 4-6-0".to_string(),
            num_cylinders: 2,
            cylinder_bore_in: 18.5,
            cylinder_stroke_in: 28.0,
            clearance_fraction: default_clearance(),
            release_fraction: default_release(),
            compression_fraction: default_compression(),
            preadmission_fraction: default_preadmission(),
            max_cutoff: default_max_cutoff(),
            drive_wheel_diameter_in: 72.0,
            weight_on_drivers_lb: 130_000.0,
            mechanical_efficiency: default_mechanical_efficiency(),
            max_boiler_pressure_psi: 225.0,
            boiler_volume_ft3: 260.0,
            evaporation_area_ft2: 1_900.0,
            grate_area_ft2: 28.7,
            fuel_calorific_btu_per_lb: default_calorific(),
            ideal_fire_depth_in: default_fire_depth(),
            max_superheat_temp_f: 250.0,
            max_tender_coal_lb: 20_000.0,
            max_tender_water_gal: 4_000.0,
            gear_ratios: Vec::new(),
            stoker_fitted: false,
            safety_valves: SafetyValveParams::default(),
            initial_water_fraction: default_initial_water_fraction(),
            min_water_fraction: default_min_water_fraction(),
            max_water_fraction: default_max_water_fraction(),
            critical_piston_speed_ft_min: default_critical_piston_speed(),
            cylinder_cock_diameter_in: default_cock_diameter(),
            davis: DavisCoefficients::default(),
        }
    }

    /// Small saturated tank engine.
    pub fn saturated_tank() -> Self {
        Self {
            name: "Saturated 0-6-2T".to_string(),
            cylinder_bore_in: 17.0,
            cylinder_stroke_in: 24.0,
            drive_wheel_diameter_in: 55.0,
            weight_on_drivers_lb: 100_000.0,
            max_boiler_pressure_psi: 175.0,
            boiler_volume_ft3: 130.0,
            evaporation_area_ft2: 1_000.0,
            grate_area_ft2: 17.0,
            max_superheat_temp_f: 0.0,
            max_tender_coal_lb: 6_000.0,
            max_tender_water_gal: 1_500.0,
            safety_valves: SafetyValveParams {
                discharge_area_in2: 0.6,
                ..SafetyValveParams::default()
            },
            ..Self::mixed_traffic()
        }
    }

    /// Three-cylinder geared logging locomotive with a mechanical stoker.
    pub fn geared_logger() -> Self {
        Self {
            name: "Geared logger".to_string(),
            num_cylinders: 3,
            cylinder_bore_in: 11.0,
            cylinder_stroke_in: 12.0,
            drive_wheel_diameter_in: 36.0,
            weight_on_drivers_lb: 150_000.0,
            max_boiler_pressure_psi: 200.0,
            boiler_volume_ft3: 120.0,
            evaporation_area_ft2: 900.0,
            grate_area_ft2: 25.0,
            max_superheat_temp_f: 0.0,
            max_tender_coal_lb: 10_000.0,
            max_tender_water_gal: 3_000.0,
            gear_ratios: vec![3.2, 2.2],
            stoker_fitted: true,
            critical_piston_speed_ft_min: 700.0,
            safety_valves: SafetyValveParams {
                count: 1,
                discharge_area_in2: 1.2,
                ..SafetyValveParams::default()
            },
            ..Self::mixed_traffic()
        }
    }

    pub fn is_geared(&self) -> bool {
        !self.gear_ratios.is_empty()
    }

    pub fn is_superheated(&self) -> bool {
        self.max_superheat_temp_f > 0.0
    }

    /// Fail fast on configuration that would make the simulation meaningless.
    pub fn validate(&self) -> LsResult<()> {
        positive("cylinder_bore_in", self.cylinder_bore_in)?;
        positive("cylinder_stroke_in", self.cylinder_stroke_in)?;
        positive("drive_wheel_diameter_in", self.drive_wheel_diameter_in)?;
        positive("weight_on_drivers_lb", self.weight_on_drivers_lb)?;
        positive("max_boiler_pressure_psi", self.max_boiler_pressure_psi)?;
        positive("boiler_volume_ft3", self.boiler_volume_ft3)?;
        positive("evaporation_area_ft2", self.evaporation_area_ft2)?;
        positive("grate_area_ft2", self.grate_area_ft2)?;
        positive("fuel_calorific_btu_per_lb", self.fuel_calorific_btu_per_lb)?;
        positive("ideal_fire_depth_in", self.ideal_fire_depth_in)?;
        positive("max_tender_coal_lb", self.max_tender_coal_lb)?;
        positive("max_tender_water_gal", self.max_tender_water_gal)?;
        positive("critical_piston_speed_ft_min", self.critical_piston_speed_ft_min)?;
        non_negative("cylinder_cock_diameter_in", self.cylinder_cock_diameter_in)?;
        non_negative("max_superheat_temp_f", self.max_superheat_temp_f)?;

        if !(2..=4).contains(&self.num_cylinders) {
            return Err(LsError::config(
                "num_cylinders",
                format!("must be 2, 3 or 4 (got {})", self.num_cylinders),
            ));
        }
        if !(self.mechanical_efficiency > 0.0 && self.mechanical_efficiency <= 1.0) {
            return Err(LsError::config(
                "mechanical_efficiency",
                format!("must be in (0, 1] (got {})", self.mechanical_efficiency),
            ));
        }
        if !(self.clearance_fraction > 0.0 && self.clearance_fraction < 0.5) {
            return Err(LsError::config(
                "clearance_fraction",
                format!("must be in (0, 0.5) (got {})", self.clearance_fraction),
            ));
        }
        if !(self.max_cutoff > 0.0 && self.max_cutoff < self.release_fraction && self.release_fraction < 1.0) {
            return Err(LsError::config(
                "max_cutoff",
                format!(
                    "needs 0 < max_cutoff < release_fraction < 1 (got {} / {})",
                    self.max_cutoff, self.release_fraction
                ),
            ));
        }
        if !(self.preadmission_fraction >= 0.0 && self.preadmission_fraction < self.compression_fraction && self.compression_fraction < 1.0) {
            return Err(LsError::config(
                "compression_fraction",
                format!(
                    "needs 0 <= preadmission < compression < 1 (got {} / {})",
                    self.preadmission_fraction, self.compression_fraction
                ),
            ));
        }
        if !(0.0 < self.min_water_fraction
            && self.min_water_fraction < self.initial_water_fraction
            && self.initial_water_fraction < self.max_water_fraction
            && self.max_water_fraction < 1.0)
        {
            return Err(LsError::config(
                "initial_water_fraction",
                format!(
                    "needs 0 < min < initial < max < 1 (got {} / {} / {})",
                    self.min_water_fraction, self.initial_water_fraction, self.max_water_fraction
                ),
            ));
        }
        if let Some(bad) = self.gear_ratios.iter().find(|r| !(r.is_finite() && **r > 0.0)) {
            return Err(LsError::config(
                "gear_ratios",
                format!("every ratio must be positive (got {bad})"),
            ));
        }

        let sv = &self.safety_valves;
        if !(1..=MAX_SAFETY_VALVES as u32).contains(&sv.count) {
            return Err(LsError::config(
                "safety_valves.count",
                format!("must be 1..={MAX_SAFETY_VALVES} (got {})", sv.count),
            ));
        }
        positive("safety_valves.discharge_area_in2", sv.discharge_area_in2)?;
        non_negative("safety_valves.start_margin_psi", sv.start_margin_psi)?;
        non_negative("safety_valves.drop_margin_psi", sv.drop_margin_psi)?;
        non_negative("safety_valves.spacing_psi", sv.spacing_psi)?;
        if sv.start_margin_psi + sv.drop_margin_psi <= 0.0 {
            return Err(LsError::config(
                "safety_valves.drop_margin_psi",
                "lift and reseat thresholds must differ",
            ));
        }
        Ok(())
    }
}

fn positive(field: &'static str, v: f64) -> LsResult<()> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(LsError::config(field, format!("must be positive (got {v})")))
    }
}

fn non_negative(field: &'static str, v: f64) -> LsResult<()> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(LsError::config(field, format!("must be non-negative (got {v})")))
    }
}

/// Quantities computed once from validated parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct DerivedParams {
    pub piston_area_in2: f64,
    /// Swept volume of one cylinder, one stroke (ft³).
    pub swept_volume_ft3: f64,
    pub ideal_fire_mass_lb: f64,
    pub max_fire_mass_lb: f64,
    pub max_burn_rate_lb_s: f64,
    pub max_feed_rate_lb_s: f64,
    pub max_evaporation_lb_s: f64,
    /// Bore of an equivalent two-cylinder engine (in), used to size injectors.
    pub cylinder_equivalent_in: f64,
    pub wheel_circumference_m: f64,
    /// Starting tractive effort at 85 % boiler pressure, direct drive (lbf).
    pub starting_tractive_effort_lbf: f64,
    /// Flue-to-water conductance (BTU/s/°F).
    pub flue_conductance_btu_s_f: f64,
    /// Heat capacity of the flue gas path (BTU/°F).
    pub flue_heat_capacity_btu_f: f64,
    pub cylinder_cock_area_in2: f64,
}

impl DerivedParams {
    pub fn from_params(p: &SteamParams) -> Self {
        use std::f64::consts::PI;

        let piston_area_in2 = PI / 4.0 * p.cylinder_bore_in * p.cylinder_bore_in;
        let ideal_fire_mass_lb =
            p.grate_area_ft2 * (p.ideal_fire_depth_in / 12.0) * FIRE_BED_DENSITY_LB_FT3;
        let max_burn_rate_lb_s = p.grate_area_ft2 * MAX_COMBUSTION_RATE_LB_FT2_H / 3600.0;
        let flue_conductance_btu_s_f =
            HEAT_TRANSFER_COEFF_BTU_H_FT2_F / 3600.0 * p.evaporation_area_ft2 / TUBE_WALL_FACTOR;
        let pairs = f64::from(p.num_cylinders) / 2.0;
        Self {
            piston_area_in2,
            swept_volume_ft3: piston_area_in2 * p.cylinder_stroke_in / 1728.0,
            ideal_fire_mass_lb,
            max_fire_mass_lb: ideal_fire_mass_lb * MAX_FIRE_MASS_RATIO,
            max_burn_rate_lb_s,
            max_feed_rate_lb_s: max_burn_rate_lb_s * MAX_FEED_RATIO,
            max_evaporation_lb_s: p.evaporation_area_ft2 * EVAPORATION_LB_FT2_H / 3600.0,
            cylinder_equivalent_in: p.cylinder_bore_in * pairs.sqrt(),
            wheel_circumference_m: PI * inches_to_meters(p.drive_wheel_diameter_in),
            starting_tractive_effort_lbf: STARTING_PRESSURE_FACTOR
                * p.max_boiler_pressure_psi
                * p.cylinder_bore_in
                * p.cylinder_bore_in
                * p.cylinder_stroke_in
                / p.drive_wheel_diameter_in
                * pairs,
            flue_conductance_btu_s_f,
            flue_heat_capacity_btu_f: flue_conductance_btu_s_f * FLUE_TIME_CONSTANT_S,
            cylinder_cock_area_in2: PI / 4.0
                * p.cylinder_cock_diameter_in
                * p.cylinder_cock_diameter_in,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_validate() {
        SteamParams::mixed_traffic().validate().unwrap();
        SteamParams::saturated_tank().validate().unwrap();
        SteamParams::geared_logger().validate().unwrap();
    }

    #[test]
    fn zero_bore_is_a_config_error() {
        let p = SteamParams {
            cylinder_bore_in: 0.0,
            ..SteamParams::mixed_traffic()
        };
        let err = p.validate().unwrap_err();
        assert!(matches!(err, LsError::Config { field: "cylinder_bore_in", .. }));
    }

    #[test]
    fn cutoff_beyond_release_rejected() {
        let p = SteamParams {
            max_cutoff: 0.95,
            ..SteamParams::mixed_traffic()
        };
        assert!(matches!(
            p.validate(),
            Err(LsError::Config { field: "max_cutoff", .. })
        ));
    }

    #[test]
    fn too_many_safety_valves_rejected() {
        let mut p = SteamParams::mixed_traffic();
        p.safety_valves.count = 5;
        assert!(p.validate().is_err());
    }

    #[test]
    fn water_thresholds_must_be_ordered() {
        let p = SteamParams {
            min_water_fraction: 0.85,
            ..SteamParams::mixed_traffic()
        };
        assert!(p.validate().is_err());
    }

    #[test]
    fn derived_starting_effort_is_plausible() {
        let d = DerivedParams::from_params(&SteamParams::mixed_traffic());
        // 0.85 * 225 * 18.5² * 28 / 72
        assert!((d.starting_tractive_effort_lbf - 25_455.0).abs() < 10.0);
        assert!(d.max_fire_mass_lb > d.ideal_fire_mass_lb);
        assert!((d.cylinder_equivalent_in - 18.5).abs() < 1e-9);
    }

    #[test]
    fn yaml_fills_defaults() {
        let yaml = r#"
name: Minimal
num_cylinders: 2
cylinder_bore_in: 16
cylinder_stroke_in: 24
drive_wheel_diameter_in: 60
weight_on_drivers_lb: 90000
max_boiler_pressure_psi: 180
boiler_volume_ft3: 150
evaporation_area_ft2: 1100
grate_area_ft2: 20
max_tender_coal_lb: 8000
max_tender_water_gal: 2500
"#;
        let p: SteamParams = serde_yaml::from_str(yaml).unwrap();
        p.validate().unwrap();
        assert_eq!(p.clearance_fraction, 0.08);
        assert_eq!(p.safety_valves.count, 2);
        assert!(!p.is_superheated());
    }
}
