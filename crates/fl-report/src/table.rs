//! Fixed-width text tables for pivot output.

use serde::Serialize;
use std::fmt::Write as _;

/// How numeric cells are formatted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NumberStyle {
    /// Plain decimal with the given number of fraction digits.
    Fixed(usize),
    /// Value in `0..=1` rendered as a percentage with the given digits.
    Percent(usize),
}

/// One row of a pivot table. `None` cells render as `NaN`, matching what a
/// dataframe prints for an empty group.
#[derive(Debug, Clone, Serialize)]
pub struct PivotRow {
    pub label: String,
    pub values: Vec<Option<f64>>,
}

/// A (row label × column) table of numbers with a title banner.
#[derive(Debug, Clone, Serialize)]
pub struct PivotTable {
    pub title: String,
    pub row_header: String,
    pub columns: Vec<String>,
    pub rows: Vec<PivotRow>,
    pub style: NumberStyle,
}

impl PivotTable {
    fn format_cell(&self, v: Option<f64>) -> String {
        match v {
            None => "NaN".to_string(),
            Some(x) if x.is_nan() => "NaN".to_string(),
            Some(x) => match self.style {
                NumberStyle::Fixed(d) => format!("{x:.d$}", d = d),
                NumberStyle::Percent(d) => format!("{:.d$}%", x * 100.0, d = d),
            },
        }
    }

    /// Render the table as fixed-width text, one row per line, with the
    /// row-header column left-aligned and numeric columns right-aligned.
    pub fn render(&self) -> String {
        let cells: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|r| r.values.iter().map(|&v| self.format_cell(v)).collect())
            .collect();

        let label_width = self
            .rows
            .iter()
            .map(|r| r.label.len())
            .chain(std::iter::once(self.row_header.len()))
            .max()
            .unwrap_or(0);
        let col_widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(j, name)| {
                cells
                    .iter()
                    .map(|row| row.get(j).map_or(0, String::len))
                    .chain(std::iter::once(name.len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut out = String::new();
        if !self.title.is_empty() {
            let _ = writeln!(out, "{}", self.title);
        }
        let _ = write!(out, "{:<label_width$}", self.row_header);
        for (name, &w) in self.columns.iter().zip(&col_widths) {
            let _ = write!(out, "  {name:>w$}");
        }
        out.push('\n');
        for (row, row_cells) in self.rows.iter().zip(&cells) {
            let _ = write!(out, "{:<label_width$}", row.label);
            for (cell, &w) in row_cells.iter().zip(&col_widths) {
                let _ = write!(out, "  {cell:>w$}");
            }
            out.push('\n');
        }
        out
    }
}
