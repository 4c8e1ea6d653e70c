//! Input schema for the session export.
//!
//! The export carries a banner line, then a header row, then one data row
//! per (hour, page path, user type, source) combination. Column order is
//! fixed; the second half of the layout duplicates the metric columns under
//! a wider reporting scope, and ingest verifies the two scopes agree before
//! collapsing them.

use serde::{Deserialize, Serialize};

/// Schema version for the input layout.
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Number of columns in the raw export.
pub const COLUMN_COUNT: usize = 12;

/// Identifier for a column in the fixed export layout, in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnId {
    /// Date + hour, `YYYYMMDDHH`.
    DateHour,
    /// Page path plus query string.
    PagePath,
    /// `new` / `established` / `(not set)`.
    UserType,
    /// Session source.
    Source,
    /// Sessions, program scope.
    Sessions,
    /// Engagement rate, program scope.
    EngRate,
    /// Key events, program scope.
    KeyEvents,
    /// Engagement time in seconds, program scope.
    EngTime,
    /// Sessions, totals scope.
    SessionsTotal,
    /// Engagement rate, totals scope.
    EngRateTotal,
    /// Key events, totals scope.
    KeyEventsTotal,
    /// Engagement time in seconds, totals scope.
    EngTimeTotal,
}

impl ColumnId {
    pub fn name(&self) -> &'static str {
        match self {
            ColumnId::DateHour => "DateHour",
            ColumnId::PagePath => "PagePath",
            ColumnId::UserType => "UserType",
            ColumnId::Source => "Source",
            ColumnId::Sessions => "Sessions",
            ColumnId::EngRate => "EngRate",
            ColumnId::KeyEvents => "KeyEvents",
            ColumnId::EngTime => "EngTime",
            ColumnId::SessionsTotal => "Sessions1",
            ColumnId::EngRateTotal => "EngRate1",
            ColumnId::KeyEventsTotal => "KeyEvents1",
            ColumnId::EngTimeTotal => "EngTime1",
        }
    }

    /// File position of this column.
    pub fn index(&self) -> usize {
        SCHEMA_COLUMNS
            .iter()
            .position(|c| c == self)
            .unwrap_or(usize::MAX)
    }
}

/// All columns in file order.
pub const SCHEMA_COLUMNS: [ColumnId; COLUMN_COUNT] = [
    ColumnId::DateHour,
    ColumnId::PagePath,
    ColumnId::UserType,
    ColumnId::Source,
    ColumnId::Sessions,
    ColumnId::EngRate,
    ColumnId::KeyEvents,
    ColumnId::EngTime,
    ColumnId::SessionsTotal,
    ColumnId::EngRateTotal,
    ColumnId::KeyEventsTotal,
    ColumnId::EngTimeTotal,
];

/// Metric columns verified equal across the two reporting scopes, as
/// (program scope, totals scope) pairs.
pub const SCOPE_PAIRS: [(ColumnId, ColumnId); 4] = [
    (ColumnId::Sessions, ColumnId::SessionsTotal),
    (ColumnId::EngRate, ColumnId::EngRateTotal),
    (ColumnId::KeyEvents, ColumnId::KeyEventsTotal),
    (ColumnId::EngTime, ColumnId::EngTimeTotal),
];
