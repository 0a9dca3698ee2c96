//! ls-tables: immutable lookup tables for the steam locomotive core.
//!
//! Provides:
//! - `Interpolator` / `Interpolator2D`: piecewise-linear, edge-clamped
//! - saturated steam properties (pressure ↔ temperature, densities, enthalpies)
//! - combustion, cylinder, injector and auxiliary-consumer curves
//!
//! The standard tables are built once per process and shared by reference
//! count; every locomotive built from the standard data holds the same `Arc`.

pub mod auxiliary;
pub mod cylinder;
pub mod error;
pub mod firing;
pub mod injector;
pub mod interp;
pub mod steam;

use std::sync::{Arc, LazyLock};

pub use auxiliary::AuxiliaryTables;
pub use cylinder::{CylinderTables, SpeedCurve};
pub use error::{TableError, TableResult};
pub use firing::FiringTables;
pub use injector::{InjectorSize, InjectorTables};
pub use interp::{Interpolator, Interpolator2D};
pub use steam::SteamTables;

/// All tables a steam locomotive needs.
#[derive(Clone, Debug)]
pub struct LocoTables {
    pub steam: SteamTables,
    pub firing: FiringTables,
    pub cylinder: CylinderTables,
    pub injector: InjectorTables,
    pub auxiliary: AuxiliaryTables,
}

static SHARED: LazyLock<Arc<LocoTables>> = LazyLock::new(|| Arc::new(LocoTables::standard()));

impl LocoTables {
    /// Fresh copy of the standard data.
    pub fn standard() -> Self {
        Self {
            steam: SteamTables::standard(),
            firing: FiringTables::standard(),
            cylinder: CylinderTables::standard(),
            injector: InjectorTables::standard(),
            auxiliary: AuxiliaryTables::standard(),
        }
    }

    /// Process-wide instance of the standard tables.
    pub fn shared() -> Arc<LocoTables> {
        Arc::clone(&SHARED)
    }
}
