//! The steam power plant: owns parameters, shared tables and state, and runs
//! the stage pipeline once per `advance`.

use std::sync::Arc;

use ls_core::LsResult;
use ls_tables::{InjectorSize, LocoTables};

use crate::boiler::{BoilerState, StartProfile};
use crate::controls::{ControllerInputs, Environment};
use crate::cylinder::CylinderState;
use crate::events::EventSink;
use crate::firebox::FireState;
use crate::injector::InjectorState;
use crate::motion::MotionState;
use crate::outputs::SteamOutputs;
use crate::params::{DerivedParams, SteamParams};
use crate::safety_valve::SafetyValveBank;
use crate::stage::{PIPELINE, StageContext};
use crate::state::{SteamState, SteamUsage};
use crate::tender::TenderState;

#[derive(Clone, Debug)]
pub struct SteamPowerPlant {
    pub(crate) params: SteamParams,
    pub(crate) derived: DerivedParams,
    pub(crate) tables: Arc<LocoTables>,
    pub(crate) injector: InjectorSize,
    pub(crate) safety_valves: SafetyValveBank,
    pub(crate) state: SteamState,
    pub(crate) outputs: SteamOutputs,
}

impl SteamPowerPlant {
    /// Build from validated parameters using the process-wide standard tables.
    pub fn new(params: SteamParams, profile: StartProfile) -> LsResult<Self> {
        Self::with_tables(params, profile, LocoTables::shared())
    }

    pub fn with_tables(params: SteamParams, profile: StartProfile, tables: Arc<LocoTables>) -> LsResult<Self> {
        params.validate()?;
        let derived = DerivedParams::from_params(&params);
        let injector = tables.injector.select(derived.cylinder_equivalent_in).clone();
        let safety_valves = SafetyValveBank::from_params(&params);

        let boiler = BoilerState::new(&params, &tables.steam, profile);
        let mut injectors = InjectorState::default();
        injectors.water_gauge_level = ((boiler.water_fraction - params.min_water_fraction)
            / (params.max_water_fraction - params.min_water_fraction))
            .clamp(0.0, 1.0);
        let state = SteamState {
            tender: TenderState::full(params.max_tender_coal_lb, params.max_tender_water_gal),
            fire: FireState::lit(&derived),
            boiler,
            cylinder: CylinderState::default(),
            motion: MotionState::default(),
            injectors,
            usage: SteamUsage::default(),
            previous_demand_lb_s: 0.0,
            controls: ControllerInputs::default(),
            elapsed_s: 0.0,
            ticks: 0,
        };

        tracing::info!(
            locomotive = %params.name,
            ?profile,
            pressure_psi = state.boiler.pressure_psi,
            injector_mm = injector.nominal_mm,
            "steam plant initialised"
        );

        let outputs = SteamOutputs::collect(&state, &derived, Vec::new());
        Ok(Self {
            params,
            derived,
            tables,
            injector,
            safety_valves,
            state,
            outputs,
        })
    }

    /// Advance by `elapsed` seconds. A non-positive or non-finite step leaves
    /// the state untouched and returns the previous outputs.
    pub fn advance(&mut self, elapsed: f64, controls: &ControllerInputs, env: &Environment) -> &SteamOutputs {
        if !(elapsed.is_finite() && elapsed > 0.0) {
            return &self.outputs;
        }
        let controls = controls.clamped(self.params.max_cutoff, self.params.gear_ratios.len());
        let env = Environment {
            speed_mps: if env.speed_mps.is_finite() { env.speed_mps } else { 0.0 },
            ..env.clone()
        };

        let ctx = StageContext::new(
            &self.params,
            &self.derived,
            &self.tables,
            &self.injector,
            &self.safety_valves,
            &controls,
            &env,
        );
        let mut events = EventSink::default();
        for stage in PIPELINE.iter() {
            stage.update(&ctx, &mut self.state, &mut events, elapsed);
        }

        self.state.controls = controls.clone();
        self.state.elapsed_s += elapsed;
        self.state.ticks += 1;

        tracing::debug!(
            tick = self.state.ticks,
            pressure_psi = self.state.boiler.pressure_psi,
            water = self.state.boiler.water_fraction,
            burn_lb_s = self.state.fire.burn_rate_lb_s,
            mep_psi = self.state.cylinder.mean_effective_pressure_psi,
            te_lbf = self.state.motion.tractive_effort_lbf,
            "steam tick"
        );

        self.outputs = SteamOutputs::collect(&self.state, &self.derived, events.into_vec());
        &self.outputs
    }

    pub fn outputs(&self) -> &SteamOutputs {
        &self.outputs
    }

    pub fn state(&self) -> &SteamState {
        &self.state
    }

    pub fn params(&self) -> &SteamParams {
        &self.params
    }

    pub fn derived(&self) -> &DerivedParams {
        &self.derived
    }

    pub fn tables(&self) -> &Arc<LocoTables> {
        &self.tables
    }

    pub fn injector_size(&self) -> &InjectorSize {
        &self.injector
    }

    fn refresh_outputs(&mut self) {
        self.outputs = SteamOutputs::collect(&self.state, &self.derived, Vec::new());
    }

    pub fn refill_coal(&mut self, lb: f64) {
        self.state.tender.refill_coal(lb);
        self.refresh_outputs();
    }

    pub fn refill_water(&mut self, gal: f64) {
        self.state.tender.refill_water(gal);
        self.refresh_outputs();
    }

    pub fn set_tender_coal(&mut self, lb: f64) {
        self.state.tender.set_coal(lb);
        self.refresh_outputs();
    }

    pub fn set_tender_water(&mut self, gal: f64) {
        self.state.tender.set_water(gal);
        self.refresh_outputs();
    }

    /// Relight with an ideal bed. Does nothing while the fusible plug is blown.
    pub fn rekindle_fire(&mut self) {
        if self.state.boiler.fusible_plug_blown {
            tracing::warn!(locomotive = %self.params.name, "cannot relight with fusible plug blown");
            return;
        }
        self.state.fire = FireState::lit(&self.derived);
        tracing::info!(locomotive = %self.params.name, "fire rekindled");
        self.refresh_outputs();
    }

    /// Clear the fusible plug and priming after the crew has dealt with them.
    pub fn reset_failures(&mut self) {
        let b = &mut self.state.boiler;
        b.fusible_plug_blown = false;
        b.priming = false;
        b.low_water_s = 0.0;
        tracing::info!(locomotive = %self.params.name, "boiler failures reset");
        self.refresh_outputs();
    }

    /// Set boiler pressure directly, bypassing the firing limits.
    pub fn force_boiler_pressure(&mut self, psi: f64) {
        let psi = if psi.is_finite() { psi } else { self.state.boiler.pressure_psi };
        self.state.boiler.set_pressure(&self.params, &self.tables.steam, psi);
        self.refresh_outputs();
    }

    pub fn force_water_fraction(&mut self, fraction: f64) {
        self.state
            .boiler
            .set_water_fraction(&self.params, &self.tables.steam, fraction);
        self.refresh_outputs();
    }

    /// Take heat out of the boiler water, as a sudden cold feed would.
    pub fn withdraw_heat(&mut self, btu: f64) {
        self.state.boiler.withdraw_heat(&self.params, &self.tables.steam, btu);
        self.refresh_outputs();
    }
}
