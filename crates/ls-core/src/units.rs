// ls-core/src/units.rs

use uom::si::f64::{
    Force as UomForce, Length as UomLength, Mass as UomMass, Power as UomPower,
    Pressure as UomPressure, ThermodynamicTemperature as UomThermodynamicTemperature,
    Time as UomTime, Velocity as UomVelocity,
};

// Public canonical unit types (SI, f64)
pub type Force = UomForce;
pub type Length = UomLength;
pub type Mass = UomMass;
pub type Power = UomPower;
pub type Pressure = UomPressure;
pub type Temperature = UomThermodynamicTemperature;
pub type Time = UomTime;
pub type Velocity = UomVelocity;

/// Standard atmosphere expressed in psi; gauge + this = absolute.
pub const ATMOSPHERIC_PSI: f64 = 14.696;

/// Mass of one imperial gallon of water.
pub const WATER_LB_PER_GALLON: f64 = 10.0;

/// Specific heat of liquid water (BTU per lb per °F).
pub const WATER_SPECIFIC_HEAT: f64 = 1.0;

#[inline]
pub fn psi(v: f64) -> Pressure {
    use uom::si::pressure::pound_force_per_square_inch;
    Pressure::new::<pound_force_per_square_inch>(v)
}

#[inline]
pub fn lbf(v: f64) -> Force {
    use uom::si::force::pound_force;
    Force::new::<pound_force>(v)
}

#[inline]
pub fn lb(v: f64) -> Mass {
    use uom::si::mass::pound;
    Mass::new::<pound>(v)
}

#[inline]
pub fn inches(v: f64) -> Length {
    use uom::si::length::inch;
    Length::new::<inch>(v)
}

#[inline]
pub fn mps(v: f64) -> Velocity {
    use uom::si::velocity::meter_per_second;
    Velocity::new::<meter_per_second>(v)
}

#[inline]
pub fn hp(v: f64) -> Power {
    use uom::si::power::horsepower;
    Power::new::<horsepower>(v)
}

#[inline]
pub fn degf(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::degree_fahrenheit;
    Temperature::new::<degree_fahrenheit>(v)
}

#[inline]
pub fn s(v: f64) -> Time {
    use uom::si::time::second;
    Time::new::<second>(v)
}

/// Pounds-force to newtons.
#[inline]
pub fn lbf_to_newtons(v: f64) -> f64 {
    use uom::si::force::newton;
    lbf(v).get::<newton>()
}

/// Newtons to pounds-force.
#[inline]
pub fn newtons_to_lbf(v: f64) -> f64 {
    use uom::si::force::{newton, pound_force};
    Force::new::<newton>(v).get::<pound_force>()
}

#[inline]
pub fn inches_to_meters(v: f64) -> f64 {
    use uom::si::length::meter;
    inches(v).get::<meter>()
}

#[inline]
pub fn mps_to_mph(v: f64) -> f64 {
    use uom::si::velocity::mile_per_hour;
    mps(v).get::<mile_per_hour>()
}

#[inline]
pub fn hp_to_watts(v: f64) -> f64 {
    use uom::si::power::watt;
    hp(v).get::<watt>()
}

/// Fahrenheit to Rankine (absolute scale used for superheated steam density).
#[inline]
pub fn fahrenheit_to_rankine(v: f64) -> f64 {
    use uom::si::thermodynamic_temperature::kelvin;
    degf(v).get::<kelvin>() * 1.8
}

/// Gauge to absolute psi.
#[inline]
pub fn gauge_to_abs(psig: f64) -> f64 {
    psig + ATMOSPHERIC_PSI
}

/// Absolute to gauge psi.
#[inline]
pub fn abs_to_gauge(psia: f64) -> f64 {
    psia - ATMOSPHERIC_PSI
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_smoke() {
        let _p = psi(225.0);
        let _f = lbf(30_000.0);
        let _m = lb(12_000.0);
        let _l = inches(69.0);
        let _v = mps(20.0);
        let _w = hp(1_200.0);
        let _t = degf(400.0);
        let _dt = s(0.1);
    }

    #[test]
    fn force_conversion_round_trip() {
        let n = lbf_to_newtons(1.0);
        assert!((n - 4.448_221_6).abs() < 1e-5);
        assert!((newtons_to_lbf(n) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn rankine_offset() {
        assert!((fahrenheit_to_rankine(32.0) - 491.67).abs() < 1e-6);
    }

    #[test]
    fn gauge_abs_inverse() {
        assert!((abs_to_gauge(gauge_to_abs(150.0)) - 150.0).abs() < 1e-12);
        assert!((psi(ATMOSPHERIC_PSI).value - 101_325.0).abs() < 5.0);
    }
}
