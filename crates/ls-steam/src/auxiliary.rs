//! Auxiliary steam consumers: air compressor, turbo-generator and stoker engine.

use crate::events::EventSink;
use crate::stage::{Stage, StageContext};
use crate::state::SteamState;

pub struct AuxiliaryStage;

impl Stage for AuxiliaryStage {
    fn name(&self) -> &'static str {
        "auxiliary"
    }

    fn update(&self, ctx: &StageContext<'_>, state: &mut SteamState, _events: &mut EventSink, _dt: f64) {
        let aux = &ctx.tables.auxiliary;
        let psi = state.boiler.pressure_psi;
        let usage = &mut state.usage;

        usage.compressor = if ctx.controls.compressor_on {
            aux.compressor_lb_h(psi) / 3600.0
        } else {
            0.0
        };
        usage.generator = if ctx.controls.generator_on {
            aux.generator_lb_h(psi) / 3600.0
        } else {
            0.0
        };
        usage.stoker = if ctx.params.stoker_fitted {
            aux.stoker_lb_h(state.fire.feed_rate_lb_s * 3600.0) / 3600.0
        } else {
            0.0
        };
    }
}
