//! ls-core: stable foundation for the locomotive simulation workspace.
//!
//! Contains:
//! - units (uom SI types + imperial/SI conversions used at crate boundaries)
//! - numeric (Real + finite checks + clamping + first-order lag)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{LsError, LsResult};
pub use numeric::*;
pub use units::*;
