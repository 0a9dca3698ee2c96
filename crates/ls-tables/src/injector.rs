//! Injector tables: discrete nominal sizes, delivery temperature and steam
//! consumption per gallon delivered.

use crate::interp::Interpolator;

/// One nominal injector size and its delivery curve.
#[derive(Clone, Debug)]
pub struct InjectorSize {
    /// Largest cylinder-equivalent size (inches) this injector is fitted to.
    pub max_cylinder_equivalent_in: f64,
    /// Nominal cone size (mm), for reporting.
    pub nominal_mm: u32,
    /// boiler pressure (psig) -> delivery at full capacity (gal/min)
    pub flow_gal_per_min: Interpolator,
}

impl InjectorSize {
    pub fn flow_gal_per_min(&self, psig: f64) -> f64 {
        self.flow_gal_per_min.eval(psig)
    }
}

#[derive(Clone, Debug)]
pub struct InjectorTables {
    /// Ordered by `max_cylinder_equivalent_in`; the last entry catches all.
    sizes: Vec<InjectorSize>,
    /// psig -> lb of steam used per gallon delivered
    steam_per_gallon_lb: Interpolator,
    /// psig -> delivery temperature (°F) at or below minimum capacity
    delivery_temp_min_capacity_f: Interpolator,
    /// psig -> delivery temperature (°F) at full capacity
    delivery_temp_max_capacity_f: Interpolator,
}

/// Injector fraction below which delivery temperature stays at the
/// minimum-capacity value.
pub const MIN_CAPACITY_FRACTION: f64 = 0.4;

impl InjectorTables {
    pub fn standard() -> Self {
        let size = |max_in: f64, mm: u32, points: &[(f64, f64)]| InjectorSize {
            max_cylinder_equivalent_in: max_in,
            nominal_mm: mm,
            flow_gal_per_min: Interpolator::from_points(points),
        };
        Self {
            sizes: vec![
                size(
                    19.0,
                    9,
                    &[(0.0, 0.0), (50.0, 14.0), (100.0, 20.0), (150.0, 24.0), (200.0, 27.0), (250.0, 29.0), (300.0, 30.5)],
                ),
                size(
                    24.0,
                    10,
                    &[(0.0, 0.0), (50.0, 17.0), (100.0, 24.5), (150.0, 29.5), (200.0, 33.0), (250.0, 35.5), (300.0, 37.5)],
                ),
                size(
                    26.0,
                    11,
                    &[(0.0, 0.0), (50.0, 21.0), (100.0, 30.0), (150.0, 36.0), (200.0, 40.5), (250.0, 43.5), (300.0, 45.5)],
                ),
                size(
                    28.0,
                    13,
                    &[(0.0, 0.0), (50.0, 29.0), (100.0, 41.5), (150.0, 50.0), (200.0, 56.0), (250.0, 60.5), (300.0, 63.5)],
                ),
                size(
                    30.0,
                    14,
                    &[(0.0, 0.0), (50.0, 34.0), (100.0, 48.5), (150.0, 58.0), (200.0, 65.0), (250.0, 70.0), (300.0, 74.0)],
                ),
                size(
                    f64::MAX,
                    15,
                    &[(0.0, 0.0), (50.0, 39.0), (100.0, 55.5), (150.0, 66.5), (200.0, 75.0), (250.0, 80.5), (300.0, 85.0)],
                ),
            ],
            steam_per_gallon_lb: Interpolator::from_points(&[
                (0.0, 0.5),
                (50.0, 0.6),
                (100.0, 0.7),
                (150.0, 0.8),
                (200.0, 0.9),
                (250.0, 1.0),
                (300.0, 1.1),
            ]),
            delivery_temp_min_capacity_f: Interpolator::from_points(&[
                (0.0, 100.0),
                (100.0, 180.0),
                (200.0, 210.0),
                (300.0, 230.0),
            ]),
            delivery_temp_max_capacity_f: Interpolator::from_points(&[
                (0.0, 90.0),
                (100.0, 130.0),
                (200.0, 150.0),
                (300.0, 165.0),
            ]),
        }
    }

    /// First size whose limit is at or above the cylinder-equivalent size.
    pub fn select(&self, cylinder_equivalent_in: f64) -> &InjectorSize {
        self.sizes
            .iter()
            .find(|s| cylinder_equivalent_in <= s.max_cylinder_equivalent_in)
            .unwrap_or(&self.sizes[self.sizes.len() - 1])
    }

    pub fn steam_per_gallon_lb(&self, psig: f64) -> f64 {
        self.steam_per_gallon_lb.eval(psig)
    }

    /// Delivery temperature for an injector running at `fraction` of capacity.
    pub fn delivery_temp_f(&self, psig: f64, fraction: f64) -> f64 {
        let at_min = self.delivery_temp_min_capacity_f.eval(psig);
        if fraction <= MIN_CAPACITY_FRACTION {
            return at_min;
        }
        let at_max = self.delivery_temp_max_capacity_f.eval(psig);
        let t = ((fraction - MIN_CAPACITY_FRACTION) / (1.0 - MIN_CAPACITY_FRACTION)).clamp(0.0, 1.0);
        at_min + t * (at_max - at_min)
    }
}
