//! Combustion tables: coal demand for a steam demand, and boiler efficiency.

use crate::interp::Interpolator;

#[derive(Clone, Debug)]
pub struct FiringTables {
    /// steam demand (lb/h) -> coal burn rate (lb/h)
    burn_rate: Interpolator,
    /// combustion rate (lb coal / ft² grate / h) -> boiler efficiency (0..1)
    boiler_efficiency: Interpolator,
}

impl FiringTables {
    pub fn standard() -> Self {
        Self {
            // evaporation ratio falls from ~8 to ~4.4 lb steam per lb coal as demand rises
            burn_rate: Interpolator::from_points(&[
                (0.0, 0.0),
                (5_000.0, 620.0),
                (10_000.0, 1_300.0),
                (15_000.0, 2_100.0),
                (20_000.0, 3_000.0),
                (25_000.0, 4_100.0),
                (30_000.0, 5_400.0),
                (35_000.0, 7_000.0),
                (40_000.0, 9_000.0),
            ]),
            // declining efficiency models overfiring losses
            boiler_efficiency: Interpolator::from_points(&[
                (0.0, 0.82),
                (20.0, 0.80),
                (40.0, 0.76),
                (60.0, 0.72),
                (80.0, 0.67),
                (100.0, 0.62),
                (120.0, 0.57),
                (140.0, 0.52),
                (160.0, 0.47),
                (180.0, 0.42),
                (200.0, 0.37),
            ]),
        }
    }

    /// Coal burn rate (lb/h) that satisfies a steam demand (lb/h).
    pub fn coal_for_steam_lb_h(&self, steam_lb_h: f64) -> f64 {
        self.burn_rate.eval(steam_lb_h)
    }

    /// Efficiency keyed by combustion intensity (lb/ft²/h).
    pub fn boiler_efficiency(&self, combustion_lb_ft2_h: f64) -> f64 {
        self.boiler_efficiency.eval(combustion_lb_ft2_h)
    }
}
