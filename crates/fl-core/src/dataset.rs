//! The derived analysis table.
//!
//! Wraps the ingested records with the per-row derivations the rest of the
//! pipeline consumes: category, refined and coarse funnel stage, and the
//! winsorized engagement time. Records are never mutated after derivation.

use crate::classify::{coarse_stage, Classifier};
use crate::ingest::SessionRecord;
use fl_common::{Category, FunnelStage, Result};
use fl_math::{quantile, winsorize_upper};
use tracing::info;

/// Ingested records plus derived columns, index-aligned.
#[derive(Debug)]
pub struct Dataset {
    pub records: Vec<SessionRecord>,
    pub categories: Vec<Category>,
    pub stages: Vec<FunnelStage>,
    pub coarse_stages: Vec<FunnelStage>,
    pub eng_time_capped: Vec<f64>,
    /// The engagement-time value at the cap quantile, over the full table.
    pub cap_value: f64,
    pub cap_quantile: f64,
}

impl Dataset {
    /// Derive the analysis columns from `records`.
    ///
    /// The cap is computed over the full table before any filtering, then
    /// applied one-sidedly, so re-deriving from already-capped data is a
    /// no-op.
    pub fn derive(
        records: Vec<SessionRecord>,
        classifier: &Classifier,
        cap_quantile: f64,
    ) -> Result<Dataset> {
        let mut categories = Vec::with_capacity(records.len());
        let mut stages = Vec::with_capacity(records.len());
        let mut coarse_stages = Vec::with_capacity(records.len());
        for record in &records {
            let (category, stage) = classifier.classify(&record.page_path);
            categories.push(category);
            stages.push(stage);
            coarse_stages.push(coarse_stage(&record.page_path));
        }

        let eng_time: Vec<f64> = records.iter().map(|r| r.eng_time_secs).collect();
        let cap_value = quantile(&eng_time, cap_quantile)?;
        let eng_time_capped = winsorize_upper(&eng_time, cap_value);
        info!(cap_quantile, cap_value, "capped engagement time");

        Ok(Dataset {
            records,
            categories,
            stages,
            coarse_stages,
            eng_time_capped,
            cap_value,
            cap_quantile,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Indices of every row.
    pub fn all_indices(&self) -> Vec<usize> {
        (0..self.len()).collect()
    }

    /// Indices of rows with nonzero engagement time ("active" rows).
    pub fn active_indices(&self) -> Vec<usize> {
        (0..self.len())
            .filter(|&i| self.records[i].eng_time_secs > 0.0)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fl_common::UserType;

    fn record(path: &str, user: &str, sessions: f64, rate: f64, time: f64) -> SessionRecord {
        SessionRecord {
            date_hour_raw: "2024010109".to_string(),
            date_hour: None,
            page_path: path.to_string(),
            user_type: UserType::parse(user),
            source: "google".to_string(),
            sessions,
            eng_rate: rate,
            key_events: 0.0,
            eng_time_secs: time,
        }
    }

    fn classifier() -> Classifier {
        Classifier::new("/degrees/master-of-science-in-business-analytics-msba")
    }

    #[test]
    fn derives_aligned_columns() {
        let records = vec![
            record("/apply", "new", 1.0, 0.5, 100.0),
            record("/faculty", "established", 2.0, 0.8, 0.0),
        ];
        let ds = Dataset::derive(records, &classifier(), 0.99).unwrap();
        assert_eq!(ds.categories, vec![Category::Application, Category::Faculty]);
        assert_eq!(ds.stages, vec![FunnelStage::Bottom, FunnelStage::Middle]);
        assert_eq!(ds.coarse_stages, vec![FunnelStage::Bottom, FunnelStage::Top]);
        assert_eq!(ds.active_indices(), vec![0]);
    }

    #[test]
    fn cap_is_99th_percentile_and_idempotent() {
        let mut records: Vec<SessionRecord> = (0..100)
            .map(|i| record("/x", "new", 1.0, 0.5, i as f64))
            .collect();
        records.push(record("/x", "new", 1.0, 0.5, 10_000.0));
        let ds = Dataset::derive(records, &classifier(), 0.99).unwrap();
        // All values sit at or below the cap.
        assert!(ds.eng_time_capped.iter().all(|&v| v <= ds.cap_value));
        // The outlier was pulled down to the cap.
        assert_eq!(*ds.eng_time_capped.last().unwrap(), ds.cap_value);
        // Re-deriving from capped data leaves values unchanged.
        let recapped = fl_math::winsorize_upper(&ds.eng_time_capped, ds.cap_value);
        assert_eq!(recapped, ds.eng_time_capped);
    }
}
