//! FunnelLens report rendering.
//!
//! This crate provides:
//! - The assembled `Report` document the pipeline fills in
//! - Fixed-width text tables for pivots and funnel shapes
//! - Model summary blocks for OLS fits
//! - JSON rendering of the whole report

pub mod report;
pub mod summary;
pub mod table;

pub use report::{Report, ScopeCheck};
pub use summary::{CoefficientLine, ModelSummary};
pub use table::{NumberStyle, PivotRow, PivotTable};
