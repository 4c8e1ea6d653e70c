//! FunnelLens math utilities.

pub mod math;

pub use math::ols::*;
pub use math::quantile::*;
