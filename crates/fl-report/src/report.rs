//! The assembled analysis report.

use crate::summary::ModelSummary;
use crate::table::PivotTable;
use fl_common::Result;
use serde::Serialize;
use std::fmt::Write as _;

/// Outcome of comparing one metric column across the two reporting scopes.
#[derive(Debug, Clone, Serialize)]
pub struct ScopeCheck {
    pub column: String,
    pub identical: bool,
}

/// Everything the pipeline produces, in print order.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub row_count: usize,
    pub active_row_count: usize,
    pub scope_checks: Vec<ScopeCheck>,
    pub cap_quantile: f64,
    pub cap_value: f64,
    pub models: Vec<ModelSummary>,
    pub rate_pivot: PivotTable,
    pub time_pivot: PivotTable,
    pub frustration: PivotTable,
    pub funnel_shape: PivotTable,
    pub clean_funnel_shape: PivotTable,
}

impl Report {
    /// Render the whole report as plain text, section by section: scope
    /// checks, model summaries, engagement pivots, frustration index, and
    /// the funnel shapes.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for check in &self.scope_checks {
            let _ = writeln!(
                out,
                "{} columns are identical: {}",
                check.column, check.identical
            );
        }
        let _ = writeln!(
            out,
            "rows: {}   active rows: {}   engagement-time cap (q={}): {:.2}s",
            self.row_count, self.active_row_count, self.cap_quantile, self.cap_value
        );
        out.push('\n');

        for model in &self.models {
            out.push_str(&model.render());
            out.push('\n');
        }

        let _ = writeln!(out, "--- QUANTIFYING THE GAP ---");
        out.push_str(&self.rate_pivot.render());
        out.push('\n');
        out.push_str(&self.time_pivot.render());
        out.push('\n');

        let _ = writeln!(out, "--- Frustration Index (New Users) ---");
        out.push_str(&self.frustration.render());
        out.push('\n');

        let _ = writeln!(out, "--- Funnel Shape (% of Traffic) ---");
        out.push_str(&self.funnel_shape.render());
        out.push('\n');
        out.push_str(&self.clean_funnel_shape.render());
        out
    }

    /// Render the whole report as one pretty-printed JSON document.
    pub fn render_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
