//! End-to-end pipeline tests over a synthetic session export.

use assert_cmd::Command;
use fl_core::pipeline::{run_pipeline, PipelineConfig};
use predicates::prelude::*;
use std::io::Write;
use std::path::PathBuf;

const HOME: &str = "/degrees/master-of-science-in-business-analytics-msba";

/// Write a synthetic export covering every (stage × user type) cell so all
/// four models are estimable: /apply → Bottom, /career → Middle, / → Top,
/// /mba → Cross-Shopping (Top under the coarse heuristic).
fn write_export() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "# Analytics export, sessions by hour").unwrap();
    writeln!(
        file,
        "Date + hour,Page path,User type,Source,Sessions,Eng rate,Key events,Eng time,Sessions,Eng rate,Key events,Eng time"
    )
    .unwrap();

    let paths = ["/apply", "/career", "/", "/mba"];
    let users = ["new", "established", "(not set)"];
    let mut hour = 0u32;
    for (p_idx, path) in paths.iter().enumerate() {
        for (u_idx, user) in users.iter().enumerate() {
            for k in 0..3u32 {
                let sessions = 1.0 + p_idx as f64 + k as f64;
                let rate = 0.2 + 0.1 * p_idx as f64 + 0.05 * u_idx as f64 + 0.01 * k as f64;
                let time = 30.0 + 60.0 * p_idx as f64 + 10.0 * u_idx as f64 + k as f64;
                writeln!(
                    file,
                    "20240101{:02},{},{},google,{},{},1,{},{},{},1,{}",
                    hour % 24,
                    path,
                    user,
                    sessions,
                    rate,
                    time,
                    sessions,
                    rate,
                    time
                )
                .unwrap();
                hour += 1;
            }
        }
    }
    // Bounced sessions (zero engagement time) and one extreme outlier.
    writeln!(
        file,
        "2024010223,/,new,direct,2,0.0,0,0,2,0.0,0,0"
    )
    .unwrap();
    writeln!(
        file,
        "2024010300,/apply,new,google,1,0.5,1,90000,1,0.5,1,90000"
    )
    .unwrap();
    file
}

fn config(input: PathBuf) -> PipelineConfig {
    PipelineConfig {
        input,
        cap_quantile: 0.99,
        home_path: HOME.to_string(),
    }
}

#[test]
fn pipeline_produces_full_report() {
    let file = write_export();
    let report = run_pipeline(&config(file.path().to_path_buf())).unwrap();

    assert_eq!(report.row_count, 38);
    assert_eq!(report.active_row_count, 37);
    assert_eq!(report.scope_checks.len(), 4);
    assert!(report.scope_checks.iter().all(|c| c.identical));
    assert_eq!(report.models.len(), 4);

    // The outlier was capped below its raw value.
    assert!(report.cap_value < 90_000.0);

    // Funnel-shape columns each sum to 100%.
    for j in 0..report.funnel_shape.columns.len() {
        let total: f64 = report
            .funnel_shape
            .rows
            .iter()
            .filter_map(|r| r.values[j])
            .sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    // The clean funnel drops Cross-Shopping and (not set).
    let labels: Vec<&str> = report
        .clean_funnel_shape
        .rows
        .iter()
        .map(|r| r.label.as_str())
        .collect();
    assert_eq!(labels, vec!["Top", "Middle", "Bottom"]);
    assert_eq!(
        report.clean_funnel_shape.columns,
        vec!["established", "new"]
    );
}

#[test]
fn interaction_models_reference_top() {
    let file = write_export();
    let report = run_pipeline(&config(file.path().to_path_buf())).unwrap();
    for model in [&report.models[1], &report.models[3]] {
        assert!(model.formula.contains("Treatment(reference=\"Top\")"));
        assert!(!model.terms.iter().any(|t| t.name.contains("T.Top")));
        assert!(model
            .terms
            .iter()
            .any(|t| t.name.contains(':')), "interaction terms missing");
    }
}

#[test]
fn text_report_prints_expected_sections() {
    let file = write_export();
    let report = run_pipeline(&config(file.path().to_path_buf())).unwrap();
    let text = report.render_text();
    assert!(text.contains("EngTime columns are identical: true"));
    assert!(text.contains("--- QUANTIFYING THE GAP ---"));
    assert!(text.contains("Engagement Rate (Stickiness):"));
    assert!(text.contains("Engagement Time (Effort):"));
    assert!(text.contains("--- Frustration Index (New Users) ---"));
    assert!(text.contains("--- Funnel Shape (% of Traffic) ---"));
    assert!(text.contains("Cross-Shopping"));
}

#[test]
fn binary_renders_table_report() {
    let file = write_export();
    Command::cargo_bin("funnellens")
        .unwrap()
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("--- QUANTIFYING THE GAP ---"))
        .stdout(predicate::str::contains("Funnel Shape"));
}

#[test]
fn binary_renders_json_report() {
    let file = write_export();
    let output = Command::cargo_bin("funnellens")
        .unwrap()
        .arg(file.path())
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["models"].as_array().unwrap().len(), 4);
    assert_eq!(value["scope_checks"][0]["identical"], true);
}

#[test]
fn binary_fails_on_missing_input() {
    Command::cargo_bin("funnellens")
        .unwrap()
        .arg("/no/such/export.csv")
        .assert()
        .failure();
}

#[test]
fn binary_fails_on_scope_mismatch() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "# banner").unwrap();
    writeln!(
        file,
        "Date + hour,Page path,User type,Source,Sessions,Eng rate,Key events,Eng time,Sessions,Eng rate,Key events,Eng time"
    )
    .unwrap();
    writeln!(
        file,
        "2024010109,/apply,new,google,3,0.5,1,120,4,0.5,1,120"
    )
    .unwrap();
    Command::cargo_bin("funnellens")
        .unwrap()
        .arg(file.path())
        .assert()
        .failure();
}
