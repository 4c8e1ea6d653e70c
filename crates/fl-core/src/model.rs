//! Model specifications and design-matrix construction.
//!
//! Four model runs: two engagement-time models (raw vs. coarse stage, and
//! capped vs. refined stage on active rows) and the engagement-rate model
//! with a stage × user-type interaction and Top as the explicit stage
//! reference, fit before and after stage refinement.
//!
//! Categoricals are treatment-coded: one dummy per non-reference level,
//! reference chosen explicitly where the run calls for one and otherwise
//! the alphabetically first observed level.

use crate::dataset::Dataset;
use fl_common::{Error, FunnelStage, Result};
use fl_math::{fit_ols, OlsOptions};
use fl_report::ModelSummary;
use std::collections::BTreeSet;
use tracing::debug;

/// Which metric the model explains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    EngTime,
    EngRate,
    EngTimeCapped,
}

impl Response {
    fn value(&self, dataset: &Dataset, row: usize) -> f64 {
        match self {
            Response::EngTime => dataset.records[row].eng_time_secs,
            Response::EngRate => dataset.records[row].eng_rate,
            Response::EngTimeCapped => dataset.eng_time_capped[row],
        }
    }
}

/// Which stage derivation feeds the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageSource {
    /// First-pass heuristic (apply / career-finance-admissions / rest).
    Coarse,
    /// Category-derived stages.
    Refined,
}

/// Which rows the model sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subset {
    Full,
    Active,
}

/// One model run.
#[derive(Debug, Clone)]
pub struct ModelSpec {
    pub name: &'static str,
    pub formula: &'static str,
    pub response: Response,
    pub stage_source: StageSource,
    pub stage_reference: Option<FunnelStage>,
    pub interaction: bool,
    pub subset: Subset,
}

/// The four model runs of the analysis, in print order.
pub fn standard_models() -> Vec<ModelSpec> {
    vec![
        ModelSpec {
            name: "engagement time vs coarse funnel stage",
            formula: "EngTime ~ C(FunnelStage) + C(UserType)",
            response: Response::EngTime,
            stage_source: StageSource::Coarse,
            stage_reference: None,
            interaction: false,
            subset: Subset::Full,
        },
        ModelSpec {
            name: "engagement rate vs coarse funnel stage (interaction)",
            formula: "EngRate ~ C(FunnelStage, Treatment(reference=\"Top\")) * C(UserType)",
            response: Response::EngRate,
            stage_source: StageSource::Coarse,
            stage_reference: Some(FunnelStage::Top),
            interaction: true,
            subset: Subset::Full,
        },
        ModelSpec {
            name: "capped engagement time vs refined funnel stage (active rows)",
            formula: "EngTime_Capped ~ C(FunnelStage) + C(UserType)",
            response: Response::EngTimeCapped,
            stage_source: StageSource::Refined,
            stage_reference: None,
            interaction: false,
            subset: Subset::Active,
        },
        ModelSpec {
            name: "engagement rate vs refined funnel stage (interaction)",
            formula: "EngRate ~ C(FunnelStage, Treatment(reference=\"Top\")) * C(UserType)",
            response: Response::EngRate,
            stage_source: StageSource::Refined,
            stage_reference: Some(FunnelStage::Top),
            interaction: true,
            subset: Subset::Full,
        },
    ]
}

/// Fit one model run against the dataset.
pub fn fit_model(dataset: &Dataset, spec: &ModelSpec) -> Result<ModelSummary> {
    let indices = match spec.subset {
        Subset::Full => dataset.all_indices(),
        Subset::Active => dataset.active_indices(),
    };
    if indices.is_empty() {
        return Err(Error::EmptyGroup(format!("model `{}` subset", spec.name)));
    }

    let stage_of = |row: usize| -> FunnelStage {
        match spec.stage_source {
            StageSource::Coarse => dataset.coarse_stages[row],
            StageSource::Refined => dataset.stages[row],
        }
    };

    // Observed levels, alphabetical by label (treatment-coding default).
    let stage_levels: Vec<String> = indices
        .iter()
        .map(|&i| stage_of(i).as_str().to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let user_levels: Vec<String> = indices
        .iter()
        .map(|&i| dataset.records[i].user_type.as_str().to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let stage_reference = match spec.stage_reference {
        Some(stage) => {
            let label = stage.as_str().to_string();
            if !stage_levels.contains(&label) {
                return Err(Error::EmptyGroup(format!("reference stage {label}")));
            }
            label
        }
        None => stage_levels[0].clone(),
    };
    let user_reference = user_levels[0].clone();

    let stage_dummies: Vec<&String> =
        stage_levels.iter().filter(|l| **l != stage_reference).collect();
    let user_dummies: Vec<&String> =
        user_levels.iter().filter(|l| **l != user_reference).collect();

    let mut names: Vec<String> = vec!["Intercept".to_string()];
    let mut columns: Vec<Vec<f64>> = Vec::new();

    for level in &stage_dummies {
        names.push(format!("FunnelStage[T.{level}]"));
        columns.push(
            indices
                .iter()
                .map(|&i| f64::from(u8::from(stage_of(i).as_str() == level.as_str())))
                .collect(),
        );
    }
    for level in &user_dummies {
        names.push(format!("UserType[T.{level}]"));
        columns.push(
            indices
                .iter()
                .map(|&i| {
                    f64::from(u8::from(dataset.records[i].user_type.as_str() == level.as_str()))
                })
                .collect(),
        );
    }
    if spec.interaction {
        let stage_count = stage_dummies.len();
        for (s_idx, stage_level) in stage_dummies.iter().enumerate() {
            for (u_idx, user_level) in user_dummies.iter().enumerate() {
                names.push(format!(
                    "FunnelStage[T.{stage_level}]:UserType[T.{user_level}]"
                ));
                let product: Vec<f64> = columns[s_idx]
                    .iter()
                    .zip(&columns[stage_count + u_idx])
                    .map(|(a, b)| a * b)
                    .collect();
                columns.push(product);
            }
        }
    }

    let y: Vec<f64> = indices.iter().map(|&i| spec.response.value(dataset, i)).collect();
    debug!(
        model = spec.name,
        rows = y.len(),
        params = names.len(),
        "fitting OLS model"
    );
    let fit = fit_ols(&y, &columns, &OlsOptions::default())?;
    Ok(ModelSummary::from_fit(spec.name, spec.formula, &names, &fit))
}
