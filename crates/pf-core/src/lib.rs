//! pf-core: shared foundation for the procflow crates.
//!
//! Contains:
//! - units (uom SI types, constructors and unit-text parsing)
//! - numeric (Real + finiteness checks)
//! - error (shared error type)

pub mod error;
pub mod numeric;
pub mod units;

pub use error::{CoreError, CoreResult};
pub use numeric::*;
pub use units::*;
