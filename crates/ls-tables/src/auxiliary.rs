//! Steam draw tables for the auxiliary consumers and the blower.

use crate::interp::Interpolator;

#[derive(Clone, Debug)]
pub struct AuxiliaryTables {
    /// psig -> air compressor steam (lb/h) when running
    compressor_lb_h: Interpolator,
    /// psig -> turbo-generator steam (lb/h) when running
    generator_lb_h: Interpolator,
    /// coal feed (lb/h) -> mechanical stoker engine steam (lb/h)
    stoker_lb_h: Interpolator,
    /// psig -> blower steam (lb/h) fully open
    blower_lb_h: Interpolator,
}

impl AuxiliaryTables {
    pub fn standard() -> Self {
        Self {
            compressor_lb_h: Interpolator::from_points(&[
                (0.0, 0.0),
                (100.0, 60.0),
                (200.0, 100.0),
                (300.0, 130.0),
            ]),
            generator_lb_h: Interpolator::from_points(&[
                (0.0, 0.0),
                (100.0, 40.0),
                (200.0, 60.0),
                (300.0, 75.0),
            ]),
            stoker_lb_h: Interpolator::from_points(&[
                (0.0, 0.0),
                (2_000.0, 100.0),
                (5_000.0, 200.0),
                (10_000.0, 350.0),
            ]),
            blower_lb_h: Interpolator::from_points(&[
                (0.0, 0.0),
                (100.0, 250.0),
                (200.0, 450.0),
                (300.0, 600.0),
            ]),
        }
    }

    pub fn compressor_lb_h(&self, psig: f64) -> f64 {
        self.compressor_lb_h.eval(psig)
    }

    pub fn generator_lb_h(&self, psig: f64) -> f64 {
        self.generator_lb_h.eval(psig)
    }

    pub fn stoker_lb_h(&self, coal_feed_lb_h: f64) -> f64 {
        self.stoker_lb_h.eval(coal_feed_lb_h)
    }

    pub fn blower_lb_h(&self, psig: f64) -> f64 {
        self.blower_lb_h.eval(psig)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_pressure_no_draw() {
        let t = AuxiliaryTables::standard();
        assert_eq!(t.compressor_lb_h(0.0), 0.0);
        assert_eq!(t.generator_lb_h(-10.0), 0.0);
        assert_eq!(t.blower_lb_h(0.0), 0.0);
        assert_eq!(t.stoker_lb_h(0.0), 0.0);
    }
}
