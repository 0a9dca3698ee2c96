use crate::LsError;

/// Floating point type used throughout system
pub type Real = f64;

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, LsError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(LsError::NonFinite { what, value: v })
    }
}

/// Fraction of the remaining gap a first-order lag closes in one step.
///
/// Dynamics: dx/dt = (target - x) / tau, integrated with explicit Euler and
/// clamped so a large step never overshoots the target.
pub fn lag_fraction(dt: Real, tau: Real) -> Real {
    if tau <= 0.0 {
        return 1.0;
    }
    (dt / tau).clamp(0.0, 1.0)
}

/// Advance `value` toward `target` by one first-order lag step.
pub fn lag_toward(value: Real, target: Real, dt: Real, tau: Real) -> Real {
    value + (target - value) * lag_fraction(dt, tau)
}

/// Replace NaN with `fallback` and clamp into `[lo, hi]`.
pub fn sanitize(v: Real, lo: Real, hi: Real, fallback: Real) -> Real {
    if v.is_nan() { fallback } else { v.clamp(lo, hi) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn lag_never_overshoots() {
        assert_eq!(lag_fraction(10.0, 2.0), 1.0);
        assert_eq!(lag_fraction(0.0, 2.0), 0.0);
        assert_eq!(lag_toward(0.0, 1.0, 5.0, 1.0), 1.0);
        assert!((lag_toward(0.0, 1.0, 0.5, 1.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn zero_step_leaves_value() {
        assert_eq!(lag_toward(3.25, 100.0, 0.0, 0.7), 3.25);
    }

    #[test]
    fn sanitize_replaces_nan() {
        assert_eq!(sanitize(Real::NAN, 0.0, 1.0, 0.5), 0.5);
        assert_eq!(sanitize(2.0, 0.0, 1.0, 0.5), 1.0);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn lag_stays_between_value_and_target(
            x in -1e3_f64..1e3,
            target in -1e3_f64..1e3,
            dt in 0.0_f64..10.0,
            tau in 0.01_f64..10.0,
        ) {
            let next = lag_toward(x, target, dt, tau);
            let (lo, hi) = if x < target { (x, target) } else { (target, x) };
            prop_assert!(next >= lo - 1e-9 && next <= hi + 1e-9);
        }
    }
}
