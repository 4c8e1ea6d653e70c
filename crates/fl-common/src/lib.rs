//! FunnelLens common types, errors, and input schema.
//!
//! This crate provides foundational types shared across fl-core modules:
//! - The unified error type with stable error codes
//! - The fixed 12-column input schema for session exports
//! - Funnel label sets (stage, category, user type)
//! - Output format specifications

pub mod error;
pub mod labels;
pub mod output;
pub mod schema;

pub use error::{Error, Result};
pub use labels::{Category, FunnelStage, UserType};
pub use output::OutputFormat;
pub use schema::{ColumnId, SCHEMA_COLUMNS};
