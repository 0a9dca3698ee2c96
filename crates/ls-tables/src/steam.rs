//! Saturated steam and water properties, indexed by absolute pressure (psia).

use crate::interp::Interpolator;

/// Saturated steam property tables.
///
/// Every lookup takes absolute pressure in psia; callers convert from gauge.
/// Values cover 1 to 400 psia and clamp beyond that range.
#[derive(Clone, Debug)]
pub struct SteamTables {
    /// psia -> saturation temperature (°F)
    saturation_temp_f: Interpolator,
    /// °F -> psia
    saturation_pressure_psia: Interpolator,
    /// psia -> saturated liquid density (lb/ft³)
    water_density: Interpolator,
    /// psia -> saturated vapour density (lb/ft³)
    steam_density: Interpolator,
    /// psia -> liquid enthalpy hf (BTU/lb)
    water_enthalpy: Interpolator,
    /// psia -> vapour enthalpy hg (BTU/lb)
    steam_enthalpy: Interpolator,
}

impl SteamTables {
    pub fn standard() -> Self {
        let saturation_temp_f = Interpolator::from_points(&[
            (1.0, 101.7),
            (5.0, 162.2),
            (10.0, 193.2),
            (14.696, 212.0),
            (20.0, 228.0),
            (30.0, 250.3),
            (50.0, 281.0),
            (75.0, 307.6),
            (100.0, 327.8),
            (125.0, 344.3),
            (150.0, 358.4),
            (175.0, 370.8),
            (200.0, 381.8),
            (225.0, 391.8),
            (250.0, 400.9),
            (275.0, 409.4),
            (300.0, 417.3),
            (350.0, 431.7),
            (400.0, 444.6),
        ]);
        // monotonic by construction, so the inverse always exists
        let saturation_pressure_psia = match saturation_temp_f.inverse() {
            Ok(t) => t,
            Err(_) => Interpolator::from_points(&[(101.7, 1.0), (444.6, 400.0)]),
        };
        Self {
            saturation_temp_f,
            saturation_pressure_psia,
            water_density: Interpolator::from_points(&[
                (1.0, 61.98),
                (5.0, 61.0),
                (14.696, 59.83),
                (29.8, 58.8),
                (67.0, 57.3),
                (134.6, 55.6),
                (247.3, 53.65),
                (422.6, 51.3),
            ]),
            steam_density: Interpolator::from_points(&[
                (1.0, 0.003),
                (5.0, 0.0136),
                (14.696, 0.0373),
                (50.0, 0.1174),
                (100.0, 0.2256),
                (150.0, 0.3318),
                (200.0, 0.4370),
                (250.0, 0.5423),
                (300.0, 0.6481),
                (400.0, 0.8606),
            ]),
            water_enthalpy: Interpolator::from_points(&[
                (1.0, 69.7),
                (5.0, 130.2),
                (14.696, 180.2),
                (50.0, 250.2),
                (100.0, 298.5),
                (150.0, 330.6),
                (200.0, 355.5),
                (250.0, 376.1),
                (300.0, 394.0),
                (400.0, 424.2),
            ]),
            steam_enthalpy: Interpolator::from_points(&[
                (1.0, 1105.8),
                (5.0, 1131.0),
                (14.696, 1150.5),
                (50.0, 1174.1),
                (100.0, 1187.2),
                (150.0, 1194.1),
                (200.0, 1198.3),
                (250.0, 1201.1),
                (300.0, 1202.9),
                (400.0, 1204.6),
            ]),
        }
    }

    pub fn saturation_temperature_f(&self, psia: f64) -> f64 {
        self.saturation_temp_f.eval(psia)
    }

    pub fn saturation_pressure_psia(&self, temp_f: f64) -> f64 {
        self.saturation_pressure_psia.eval(temp_f)
    }

    pub fn water_density(&self, psia: f64) -> f64 {
        self.water_density.eval(psia)
    }

    pub fn steam_density(&self, psia: f64) -> f64 {
        self.steam_density.eval(psia)
    }

    pub fn water_enthalpy(&self, psia: f64) -> f64 {
        self.water_enthalpy.eval(psia)
    }

    pub fn steam_enthalpy(&self, psia: f64) -> f64 {
        self.steam_enthalpy.eval(psia)
    }

    /// Latent heat of evaporation hfg = hg - hf.
    pub fn latent_heat(&self, psia: f64) -> f64 {
        self.steam_enthalpy(psia) - self.water_enthalpy(psia)
    }
}
