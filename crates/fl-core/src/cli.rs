//! Command-line interface.

use crate::pipeline::PipelineConfig;
use clap::Parser;
use fl_common::OutputFormat;
use std::path::PathBuf;

/// Default program home path for the Homepage classification rule.
pub const DEFAULT_HOME_PATH: &str = "/degrees/master-of-science-in-business-analytics-msba";

/// Exploratory funnel analysis of a web-analytics session export.
#[derive(Debug, Parser)]
#[command(name = "funnellens", version, about)]
pub struct Cli {
    /// Session export to analyze (CSV: banner line, header row, data rows).
    pub input: PathBuf,

    /// Report rendering on stdout.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Quantile at which engagement time is capped.
    #[arg(long, default_value_t = 0.99)]
    pub cap_quantile: f64,

    /// Page path treated as the program homepage besides "/".
    #[arg(long, default_value = DEFAULT_HOME_PATH)]
    pub home_path: String,
}

impl Cli {
    pub fn into_config(self) -> (PipelineConfig, OutputFormat) {
        (
            PipelineConfig {
                input: self.input,
                cap_quantile: self.cap_quantile,
                home_path: self.home_path,
            },
            self.format,
        )
    }
}
