//! FunnelLens core pipeline.
//!
//! One pass over a session export: ingest, classify page paths into funnel
//! stages, cap the engagement-time outliers, fit the engagement models, and
//! build the pivot tables. The [`pipeline`] module strings the phases
//! together; everything below it is a pure data transformation.

pub mod classify;
pub mod cli;
pub mod dataset;
pub mod ingest;
pub mod model;
pub mod pipeline;
pub mod pivot;

pub use classify::Classifier;
pub use dataset::Dataset;
pub use ingest::SessionRecord;
pub use pipeline::run_pipeline;
