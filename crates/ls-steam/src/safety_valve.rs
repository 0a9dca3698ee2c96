//! Safety valve bank with per-valve hysteresis and Napier discharge.

use ls_core::gauge_to_abs;

use crate::params::{MAX_SAFETY_VALVES, SteamParams};

/// Napier: choked steam flow in lb/s = area (in²) × upstream psia / 70.
pub const NAPIER_DIVISOR: f64 = 70.0;

pub fn napier_discharge_lb_s(area_in2: f64, psia: f64) -> f64 {
    (area_in2 * psia / NAPIER_DIVISOR).max(0.0)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SafetyValve {
    pub lift_psi: f64,
    pub reseat_psi: f64,
    pub area_in2: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SafetyValveBank {
    valves: Vec<SafetyValve>,
}

impl SafetyValveBank {
    pub fn from_params(p: &SteamParams) -> Self {
        let sv = &p.safety_valves;
        let count = (sv.count as usize).clamp(1, MAX_SAFETY_VALVES);
        let valves = (0..count)
            .map(|i| {
                let offset = i as f64 * sv.spacing_psi;
                SafetyValve {
                    lift_psi: p.max_boiler_pressure_psi + sv.start_margin_psi + offset,
                    reseat_psi: p.max_boiler_pressure_psi - sv.drop_margin_psi + offset,
                    area_in2: sv.discharge_area_in2,
                }
            })
            .collect();
        Self { valves }
    }

    pub fn valves(&self) -> &[SafetyValve] {
        &self.valves
    }

    /// Update the open flags against `psig` and return the total discharge (lb/s).
    pub fn update(&self, open: &mut [bool; MAX_SAFETY_VALVES], psig: f64) -> f64 {
        let psia = gauge_to_abs(psig);
        let mut discharge = 0.0;
        for (valve, is_open) in self.valves.iter().zip(open.iter_mut()) {
            if !*is_open && psig >= valve.lift_psi {
                *is_open = true;
            } else if *is_open && psig <= valve.reseat_psi {
                *is_open = false;
            }
            if *is_open {
                discharge += napier_discharge_lb_s(valve.area_in2, psia);
            }
        }
        discharge
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bank() -> SafetyValveBank {
        let mut p = SteamParams::mixed_traffic();
        p.safety_valves.count = 3;
        SafetyValveBank::from_params(&p)
    }

    #[test]
    fn napier_reference_value() {
        // 1 in² at 200 psig
        let flow = napier_discharge_lb_s(1.0, gauge_to_abs(200.0));
        assert!((flow - 3.0671).abs() < 1e-3);
    }

    #[test]
    fn valves_lift_in_sequence() {
        let b = bank();
        let mut open = [false; MAX_SAFETY_VALVES];
        b.update(&mut open, 227.0);
        assert_eq!(open, [true, false, false, false]);
        b.update(&mut open, 228.2);
        assert_eq!(open, [true, true, true, false]);
    }

    #[test]
    fn hysteresis_holds_valve_open_between_thresholds() {
        let b = bank();
        let mut open = [false; MAX_SAFETY_VALVES];
        b.update(&mut open, 230.0);
        let mid = b.update(&mut open, 224.0);
        assert!(open[0] && mid > 0.0);
        let shut = b.update(&mut open, 221.0);
        assert_eq!(open, [false; MAX_SAFETY_VALVES]);
        assert_eq!(shut, 0.0);
    }

    #[test]
    fn all_valves_reseat_four_below_max() {
        let mut p = SteamParams::mixed_traffic();
        p.safety_valves.count = 4;
        let b = SafetyValveBank::from_params(&p);
        assert!(b.valves().iter().all(|v| v.reseat_psi > p.max_boiler_pressure_psi - 4.0));
        let mut open = [true; MAX_SAFETY_VALVES];
        b.update(&mut open, p.max_boiler_pressure_psi - 4.0);
        assert_eq!(open, [false; MAX_SAFETY_VALVES]);
    }
}
