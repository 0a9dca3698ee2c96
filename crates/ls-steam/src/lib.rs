//! ls-steam: the steam locomotive power plant.
//!
//! A fixed-order pipeline advances tender, firebox, boiler, cylinders,
//! motion, auxiliaries and injectors once per tick, then feeds measured
//! consumption back into next tick's firing.
//!
//! Internal units are locomotive practice (psi gauge, lb, BTU, °F, inches);
//! forces and powers leave the crate in SI.

pub mod auxiliary;
pub mod boiler;
pub mod controls;
pub mod cylinder;
pub mod events;
pub mod firebox;
pub mod injector;
pub mod locomotive;
pub mod motion;
pub mod outputs;
pub mod params;
pub mod persist;
pub mod plant;
pub mod safety_valve;
pub mod sim;
pub mod stage;
pub mod state;
pub mod tender;

pub use boiler::StartProfile;
pub use controls::{ControllerInputs, Environment, FiringMode, Weather};
pub use events::SteamEvent;
pub use locomotive::{Locomotive, Notifier, PowerPlant, PowerPlantModel, PowerPlantOutput, TracingNotifier};
pub use outputs::{ExhaustPlume, SteamOutputs};
pub use params::{DerivedParams, SteamParams};
pub use persist::{FIELD_COUNT, PersistedSteamState};
pub use plant::SteamPowerPlant;
pub use sim::{SimOptions, SimRecord, run_sim};
pub use state::{SteamState, SteamUsage};
