//! Cylinder tables: condensation, superheat, exhaust back pressure and the
//! piston-speed force roll-off curves.

use crate::interp::{Interpolator, Interpolator2D};

/// Which speed-factor curve a locomotive uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpeedCurve {
    Saturated,
    Superheated,
    Geared,
}

#[derive(Clone, Debug)]
pub struct CylinderTables {
    /// (crank rev/min, cutoff) -> condensation fraction of admitted steam
    condensation: Interpolator2D,
    /// cylinder steam flow / max evaporation -> fraction of max superheat
    superheat_ratio: Interpolator,
    /// cutoff -> superheat (°F) needed to suppress condensation
    superheat_limit_f: Interpolator,
    /// cylinder steam flow / max evaporation -> exhaust back pressure (psig)
    back_pressure_psi: Interpolator,
    /// piston speed / critical piston speed -> force factor
    speed_factor_saturated: Interpolator,
    speed_factor_superheated: Interpolator,
    speed_factor_geared: Interpolator,
}

impl CylinderTables {
    pub fn standard() -> Self {
        let condensation_at = |scale: f64| {
            Interpolator::from_points(&[
                (0.1, 0.42 * scale),
                (0.2, 0.30 * scale),
                (0.3, 0.24 * scale),
                (0.4, 0.20 * scale),
                (0.5, 0.17 * scale),
                (0.6, 0.14 * scale),
                (0.7, 0.12 * scale),
                (0.8, 0.10 * scale),
            ])
        };
        Self {
            // less time per stroke means less condensation at speed
            condensation: Interpolator2D::from_curves(vec![
                (0.0, condensation_at(1.0)),
                (100.0, condensation_at(0.85)),
                (200.0, condensation_at(0.7)),
                (300.0, condensation_at(0.6)),
                (400.0, condensation_at(0.5)),
            ]),
            superheat_ratio: Interpolator::from_points(&[
                (0.0, 0.0),
                (0.2, 0.4),
                (0.4, 0.7),
                (0.6, 0.85),
                (0.8, 0.95),
                (1.0, 1.0),
            ]),
            superheat_limit_f: Interpolator::from_points(&[
                (0.1, 250.0),
                (0.3, 200.0),
                (0.5, 160.0),
                (0.7, 130.0),
                (0.9, 110.0),
            ]),
            back_pressure_psi: Interpolator::from_points(&[
                (0.0, 0.3),
                (0.25, 1.0),
                (0.5, 2.5),
                (0.75, 4.5),
                (1.0, 7.0),
                (1.5, 11.0),
            ]),
            speed_factor_saturated: Interpolator::from_points(&[
                (0.0, 1.0),
                (1.0, 1.0),
                (1.25, 0.94),
                (1.5, 0.85),
                (1.75, 0.76),
                (2.0, 0.68),
                (2.5, 0.55),
                (3.0, 0.45),
                (4.0, 0.32),
            ]),
            speed_factor_superheated: Interpolator::from_points(&[
                (0.0, 1.0),
                (1.0, 1.0),
                (1.25, 0.97),
                (1.5, 0.91),
                (1.75, 0.84),
                (2.0, 0.77),
                (2.5, 0.65),
                (3.0, 0.55),
                (4.0, 0.40),
            ]),
            speed_factor_geared: Interpolator::from_points(&[
                (0.0, 1.0),
                (1.0, 1.0),
                (1.5, 0.9),
                (2.0, 0.75),
                (3.0, 0.5),
                (4.0, 0.35),
            ]),
        }
    }

    pub fn condensation_fraction(&self, crank_rpm: f64, cutoff: f64) -> f64 {
        self.condensation.eval(crank_rpm, cutoff)
    }

    pub fn superheat_ratio(&self, flow_fraction: f64) -> f64 {
        self.superheat_ratio.eval(flow_fraction)
    }

    pub fn superheat_limit_f(&self, cutoff: f64) -> f64 {
        self.superheat_limit_f.eval(cutoff)
    }

    pub fn back_pressure_psi(&self, flow_fraction: f64) -> f64 {
        self.back_pressure_psi.eval(flow_fraction)
    }

    pub fn speed_factor(&self, curve: SpeedCurve, piston_speed_ratio: f64) -> f64 {
        match curve {
            SpeedCurve::Saturated => self.speed_factor_saturated.eval(piston_speed_ratio),
            SpeedCurve::Superheated => self.speed_factor_superheated.eval(piston_speed_ratio),
            SpeedCurve::Geared => self.speed_factor_geared.eval(piston_speed_ratio),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_factor_rolls_off_smoothly() {
        let t = CylinderTables::standard();
        for curve in [
            SpeedCurve::Saturated,
            SpeedCurve::Superheated,
            SpeedCurve::Geared,
        ] {
            assert_eq!(t.speed_factor(curve, 0.5), 1.0);
            let mut prev = 1.0;
            let mut ratio = 1.0;
            while ratio < 4.0 {
                ratio += 0.05;
                let f = t.speed_factor(curve, ratio);
                assert!(f <= prev);
                // no cliff: a 0.05 step never loses more than 3 % of force
                assert!(prev - f < 0.03, "{curve:?} at {ratio}");
                prev = f;
            }
        }
    }

    #[test]
    fn superheated_curve_holds_force_longer() {
        let t = CylinderTables::standard();
        assert!(
            t.speed_factor(SpeedCurve::Superheated, 2.0)
                > t.speed_factor(SpeedCurve::Saturated, 2.0)
        );
    }

    #[test]
    fn condensation_falls_with_speed_and_cutoff() {
        let t = CylinderTables::standard();
        assert!(t.condensation_fraction(0.0, 0.2) > t.condensation_fraction(300.0, 0.2));
        assert!(t.condensation_fraction(50.0, 0.1) > t.condensation_fraction(50.0, 0.7));
    }
}
