//! The single-pass analysis pipeline.
//!
//! load → verify scopes → classify → cap → fit models → pivot → report.
//! Every phase is fallible and the first error aborts the run.

use crate::classify::Classifier;
use crate::dataset::Dataset;
use crate::ingest;
use crate::model::{fit_model, standard_models};
use crate::pivot::{frustration_index, funnel_shape, pivot, reindex_conversion, Agg};
use fl_common::{FunnelStage, Result, UserType};
use fl_report::{NumberStyle, Report};
use std::path::PathBuf;
use tracing::info;

/// Everything a run needs, resolved from the CLI.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub input: PathBuf,
    pub cap_quantile: f64,
    /// Page path treated as the program homepage besides `/`.
    pub home_path: String,
}

/// Run the full analysis and assemble the report.
pub fn run_pipeline(config: &PipelineConfig) -> Result<Report> {
    info!(input = %config.input.display(), "starting analysis");
    let ingest = ingest::load_sessions(&config.input)?;

    let classifier = Classifier::new(&config.home_path);
    let dataset = Dataset::derive(ingest.records, &classifier, config.cap_quantile)?;
    let active = dataset.active_indices();
    info!(
        rows = dataset.len(),
        active = active.len(),
        cap_value = dataset.cap_value,
        "derived dataset"
    );

    let mut models = Vec::new();
    for spec in standard_models() {
        models.push(fit_model(&dataset, &spec)?);
    }

    let rate_pivot = pivot(
        &dataset,
        &active,
        &|d, i| d.records[i].eng_rate,
        Agg::Mean,
        "Engagement Rate (Stickiness):",
        NumberStyle::Fixed(6),
    );
    let time_pivot = pivot(
        &dataset,
        &active,
        &|d, i| d.eng_time_capped[i],
        Agg::Mean,
        "Engagement Time (Effort):",
        NumberStyle::Fixed(6),
    );
    let frustration = frustration_index(&time_pivot, &rate_pivot)?;

    let all = dataset.all_indices();
    let volume = pivot(
        &dataset,
        &all,
        &|d, i| d.records[i].sessions,
        Agg::Sum,
        "",
        NumberStyle::Fixed(6),
    );
    let shape = funnel_shape(&volume, "", NumberStyle::Fixed(6));

    // The clean funnel: conversion stages only, documented user types only.
    let clean_indices: Vec<usize> = all
        .into_iter()
        .filter(|&i| {
            dataset.stages[i] != FunnelStage::CrossShopping
                && dataset.records[i].user_type != UserType::NotSet
        })
        .collect();
    let clean_volume = pivot(
        &dataset,
        &clean_indices,
        &|d, i| d.records[i].sessions,
        Agg::Sum,
        "Conversion funnel (Top → Middle → Bottom):",
        NumberStyle::Percent(1),
    );
    let clean_shape = reindex_conversion(&funnel_shape(
        &clean_volume,
        "Conversion funnel (Top → Middle → Bottom):",
        NumberStyle::Percent(1),
    ));

    Ok(Report {
        row_count: dataset.len(),
        active_row_count: active.len(),
        scope_checks: ingest.scope_checks,
        cap_quantile: dataset.cap_quantile,
        cap_value: dataset.cap_value,
        models,
        rate_pivot,
        time_pivot,
        frustration,
        funnel_shape: shape,
        clean_funnel_shape: clean_shape,
    })
}
