//! Grouped aggregation: (funnel stage × user type) pivots, the funnel
//! shape, and the frustration index.
//!
//! Rows are ordered by funnel position (Top, Middle, Bottom, Cross-Shopping)
//! rather than alphabetically; columns are the observed user types in label
//! order. Cells with no backing rows stay empty and render as `NaN`.

use crate::dataset::Dataset;
use fl_common::{Error, FunnelStage, Result, UserType};
use fl_report::{NumberStyle, PivotRow, PivotTable};
use std::collections::BTreeSet;

/// Cell aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Agg {
    Mean,
    Sum,
}

/// Per-row metric selector.
pub type Selector<'a> = &'a dyn Fn(&Dataset, usize) -> f64;

/// Build a (stage × user type) pivot over the given row indices.
pub fn pivot(
    dataset: &Dataset,
    indices: &[usize],
    selector: Selector<'_>,
    agg: Agg,
    title: &str,
    style: NumberStyle,
) -> PivotTable {
    let mut user_types: Vec<UserType> = indices
        .iter()
        .map(|&i| dataset.records[i].user_type.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    // Column order is the label order, as a dataframe would sort them.
    user_types.sort_by(|a, b| a.as_str().cmp(b.as_str()));
    let stages: Vec<FunnelStage> = FunnelStage::ALL
        .into_iter()
        .filter(|s| indices.iter().any(|&i| dataset.stages[i] == *s))
        .collect();

    let mut rows = Vec::with_capacity(stages.len());
    for stage in &stages {
        let mut values = Vec::with_capacity(user_types.len());
        for user in &user_types {
            let mut sum = 0.0;
            let mut count = 0usize;
            for &i in indices {
                if dataset.stages[i] == *stage && dataset.records[i].user_type == *user {
                    sum += selector(dataset, i);
                    count += 1;
                }
            }
            values.push(match (agg, count) {
                (_, 0) => None,
                (Agg::Mean, n) => Some(sum / n as f64),
                (Agg::Sum, _) => Some(sum),
            });
        }
        rows.push(PivotRow {
            label: stage.as_str().to_string(),
            values,
        });
    }

    PivotTable {
        title: title.to_string(),
        row_header: "FunnelStage".to_string(),
        columns: user_types.iter().map(|u| u.as_str().to_string()).collect(),
        rows,
        style,
    }
}

/// Normalize each column of a volume pivot by its total: the share of that
/// user type's traffic at each stage. Columns with a zero or empty total
/// stay empty.
pub fn funnel_shape(volume: &PivotTable, title: &str, style: NumberStyle) -> PivotTable {
    let column_totals: Vec<f64> = (0..volume.columns.len())
        .map(|j| {
            volume
                .rows
                .iter()
                .filter_map(|r| r.values[j])
                .sum::<f64>()
        })
        .collect();

    let rows = volume
        .rows
        .iter()
        .map(|row| PivotRow {
            label: row.label.clone(),
            values: row
                .values
                .iter()
                .enumerate()
                .map(|(j, &v)| match v {
                    Some(x) if column_totals[j] > 0.0 => Some(x / column_totals[j]),
                    _ => None,
                })
                .collect(),
        })
        .collect();

    PivotTable {
        title: title.to_string(),
        row_header: volume.row_header.clone(),
        columns: volume.columns.clone(),
        rows,
        style,
    }
}

/// Restrict a pivot to exactly the three conversion stages, in funnel order.
/// Stages absent from the pivot appear as empty rows, matching a reindex.
pub fn reindex_conversion(pivot: &PivotTable) -> PivotTable {
    let rows = FunnelStage::CONVERSION
        .iter()
        .map(|stage| {
            pivot
                .rows
                .iter()
                .find(|r| r.label == stage.as_str())
                .cloned()
                .unwrap_or_else(|| PivotRow {
                    label: stage.as_str().to_string(),
                    values: vec![None; pivot.columns.len()],
                })
        })
        .collect();
    PivotTable {
        title: pivot.title.clone(),
        row_header: pivot.row_header.clone(),
        columns: pivot.columns.clone(),
        rows,
        style: pivot.style,
    }
}

/// Frustration index for new users: mean capped engagement time divided by
/// (mean engagement rate × 1000), per stage. High effort over low success.
pub fn frustration_index(time: &PivotTable, rate: &PivotTable) -> Result<PivotTable> {
    let new_label = UserType::New.as_str();
    let time_col = column_index(time, new_label)?;
    let rate_col = column_index(rate, new_label)?;

    let rows = time
        .rows
        .iter()
        .map(|time_row| {
            let rate_value = rate
                .rows
                .iter()
                .find(|r| r.label == time_row.label)
                .and_then(|r| r.values[rate_col]);
            let value = match (time_row.values[time_col], rate_value) {
                (Some(t), Some(r)) if r != 0.0 => Some(t / (r * 1000.0)),
                _ => None,
            };
            PivotRow {
                label: time_row.label.clone(),
                values: vec![value],
            }
        })
        .collect();

    Ok(PivotTable {
        title: String::new(),
        row_header: time.row_header.clone(),
        columns: vec![new_label.to_string()],
        rows,
        style: NumberStyle::Fixed(6),
    })
}

fn column_index(pivot: &PivotTable, label: &str) -> Result<usize> {
    pivot
        .columns
        .iter()
        .position(|c| c == label)
        .ok_or_else(|| Error::EmptyGroup(format!("user type `{label}`")))
}
