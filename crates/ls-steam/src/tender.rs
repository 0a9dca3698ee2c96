//! Tender: coal and water stocks with sticky exhaustion flags.

use ls_core::WATER_LB_PER_GALLON;

use crate::events::{EventSink, SteamEvent};
use crate::stage::{Stage, StageContext};
use crate::state::SteamState;

/// Coal below this counts as none (lb).
pub const COAL_EXHAUSTED_LB: f64 = 0.05;
/// Water below this counts as none (gal).
pub const WATER_EXHAUSTED_GAL: f64 = 0.5;

#[derive(Clone, Debug, PartialEq)]
pub struct TenderState {
    pub coal_lb: f64,
    pub water_gal: f64,
    pub max_coal_lb: f64,
    pub max_water_gal: f64,
    pub coal_exhausted: bool,
    pub water_exhausted: bool,
}

impl TenderState {
    pub fn full(max_coal_lb: f64, max_water_gal: f64) -> Self {
        Self {
            coal_lb: max_coal_lb,
            water_gal: max_water_gal,
            max_coal_lb,
            max_water_gal,
            coal_exhausted: false,
            water_exhausted: false,
        }
    }

    /// Remove what the fire and injectors took over `dt`.
    pub fn draw(&mut self, coal_lb_s: f64, water_lb_s: f64, dt: f64, events: &mut EventSink) {
        self.coal_lb = (self.coal_lb - coal_lb_s.max(0.0) * dt).clamp(0.0, self.max_coal_lb);
        self.water_gal = (self.water_gal - water_lb_s.max(0.0) / WATER_LB_PER_GALLON * dt)
            .clamp(0.0, self.max_water_gal);

        if !self.coal_exhausted && self.coal_lb < COAL_EXHAUSTED_LB {
            self.coal_exhausted = true;
            events.raise(SteamEvent::CoalExhausted);
        }
        if !self.water_exhausted && self.water_gal < WATER_EXHAUSTED_GAL {
            self.water_exhausted = true;
            events.raise(SteamEvent::WaterExhausted);
        }
    }

    /// Add coal up to capacity; clears the exhaustion flag once above threshold.
    pub fn refill_coal(&mut self, lb: f64) {
        self.set_coal(self.coal_lb + lb.max(0.0));
    }

    pub fn refill_water(&mut self, gal: f64) {
        self.set_water(self.water_gal + gal.max(0.0));
    }

    pub fn set_coal(&mut self, lb: f64) {
        self.coal_lb = ls_core::sanitize(lb, 0.0, self.max_coal_lb, 0.0);
        self.coal_exhausted = self.coal_lb < COAL_EXHAUSTED_LB;
    }

    pub fn set_water(&mut self, gal: f64) {
        self.water_gal = ls_core::sanitize(gal, 0.0, self.max_water_gal, 0.0);
        self.water_exhausted = self.water_gal < WATER_EXHAUSTED_GAL;
    }
}

/// First stage: deplete stocks by last tick's burn rate and injector draw.
pub struct TenderStage;

impl Stage for TenderStage {
    fn name(&self) -> &'static str {
        "tender"
    }

    fn update(&self, _ctx: &StageContext<'_>, state: &mut SteamState, events: &mut EventSink, dt: f64) {
        let coal = state.fire.burn_rate_lb_s;
        let water = state.injectors.water_lb_s;
        state.tender.draw(coal, water, dt, events);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coal_exhaustion_is_sticky_and_raised_once() {
        let mut t = TenderState::full(1.0, 100.0);
        let mut sink = EventSink::default();
        t.draw(0.5, 0.0, 2.0, &mut sink);
        assert!(t.coal_exhausted);
        assert_eq!(t.coal_lb, 0.0);
        t.draw(0.5, 0.0, 2.0, &mut sink);
        assert_eq!(sink.into_vec(), vec![SteamEvent::CoalExhausted]);
    }

    #[test]
    fn water_draw_converts_pounds_to_gallons() {
        let mut t = TenderState::full(1000.0, 100.0);
        let mut sink = EventSink::default();
        t.draw(0.0, 10.0, 1.0, &mut sink);
        assert!((t.water_gal - 99.0).abs() < 1e-12);
        assert!(sink.is_empty());
    }

    #[test]
    fn refill_clears_flag_and_caps_at_capacity() {
        let mut t = TenderState::full(1000.0, 100.0);
        t.set_water(0.0);
        assert!(t.water_exhausted);
        t.refill_water(500.0);
        assert!(!t.water_exhausted);
        assert_eq!(t.water_gal, 100.0);
    }
}
