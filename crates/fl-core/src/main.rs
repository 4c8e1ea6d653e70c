use clap::Parser;
use fl_common::OutputFormat;
use fl_core::cli::Cli;
use fl_core::pipeline::run_pipeline;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() {
    // Logs go to stderr; stdout carries only the report.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let (config, format) = Cli::parse().into_config();
    match run_pipeline(&config) {
        Ok(report) => {
            let rendered = match format {
                OutputFormat::Table => Ok(report.render_text()),
                OutputFormat::Json => report.render_json(),
            };
            match rendered {
                Ok(text) => print!("{text}"),
                Err(err) => {
                    error!(code = err.code(), "render failed: {err}");
                    std::process::exit(1);
                }
            }
        }
        Err(err) => {
            error!(code = err.code(), "analysis failed: {err}");
            std::process::exit(1);
        }
    }
}
