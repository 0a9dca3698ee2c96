//! Fixed-step runner and result recording.

use ls_core::{LsError, LsResult, ensure_finite};

use crate::controls::{ControllerInputs, Environment};
use crate::outputs::SteamOutputs;
use crate::plant::SteamPowerPlant;

/// Options for simulation runs.
#[derive(Clone, Debug)]
pub struct SimOptions {
    /// Fixed time step (seconds)
    pub dt: f64,
    /// Final simulation time (seconds)
    pub t_end: f64,
    /// Maximum number of steps (safety limit)
    pub max_steps: usize,
    /// Record every N-th step (decimation)
    pub record_every: usize,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            dt: 0.1,
            t_end: 60.0,
            max_steps: 1_000_000,
            record_every: 10,
        }
    }
}

/// Recorded outputs.
#[derive(Clone, Debug, Default)]
pub struct SimRecord {
    /// Time points (seconds)
    pub t: Vec<f64>,
    pub x: Vec<SteamOutputs>,
}

impl SimRecord {
    pub fn last(&self) -> Option<(f64, &SteamOutputs)> {
        self.t.last().copied().zip(self.x.last())
    }
}

/// Drive `plant` with inputs from `schedule`, which sees the time and the
/// previous outputs.
pub fn run_sim<F>(plant: &mut SteamPowerPlant, opts: &SimOptions, mut schedule: F) -> LsResult<SimRecord>
where
    F: FnMut(f64, &SteamOutputs) -> (ControllerInputs, Environment),
{
    ensure_finite(opts.dt, "dt")?;
    ensure_finite(opts.t_end, "t_end")?;
    if !(opts.dt > 0.0) {
        return Err(LsError::InvalidArg {
            what: "dt must be positive",
        });
    }
    if !(opts.t_end >= 0.0) {
        return Err(LsError::InvalidArg {
            what: "t_end must be non-negative",
        });
    }
    if opts.max_steps == 0 {
        return Err(LsError::InvalidArg {
            what: "max_steps must be positive",
        });
    }
    if opts.record_every == 0 {
        return Err(LsError::InvalidArg {
            what: "record_every must be positive",
        });
    }

    let mut t = 0.0;
    let mut record = SimRecord {
        t: vec![t],
        x: vec![plant.outputs().clone()],
    };

    let mut step = 0;
    while t < opts.t_end && step < opts.max_steps {
        let (controls, env) = schedule(t, plant.outputs());
        plant.advance(opts.dt, &controls, &env);
        t += opts.dt;
        step += 1;

        if step % opts.record_every == 0 {
            record.t.push(t);
            record.x.push(plant.outputs().clone());
        }
    }

    // Always record final state
    if step % opts.record_every != 0 {
        record.t.push(t);
        record.x.push(plant.outputs().clone());
    }

    tracing::info!(steps = step, t_end = t, "simulation finished");
    Ok(record)
}
