//! Model summary rendering for OLS fits.

use fl_math::OlsFit;
use serde::Serialize;
use std::fmt::Write as _;

/// One line of a coefficient table.
#[derive(Debug, Clone, Serialize)]
pub struct CoefficientLine {
    pub name: String,
    pub estimate: f64,
    pub std_error: f64,
    pub t_value: f64,
    pub p_value: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
}

/// A fitted model, ready to print: the formula it came from, the fit
/// statistics, and one line per design column.
#[derive(Debug, Clone, Serialize)]
pub struct ModelSummary {
    pub name: String,
    pub formula: String,
    pub n_observations: usize,
    pub r_squared: f64,
    pub adj_r_squared: f64,
    pub f_statistic: Option<f64>,
    pub f_pvalue: Option<f64>,
    pub confidence_level: f64,
    pub terms: Vec<CoefficientLine>,
}

impl ModelSummary {
    /// Pair an [`OlsFit`] with its design column names.
    ///
    /// `term_names` must line up with the fit's coefficient order
    /// (intercept first).
    pub fn from_fit(name: &str, formula: &str, term_names: &[String], fit: &OlsFit) -> ModelSummary {
        debug_assert_eq!(term_names.len(), fit.coefficients.len());
        let terms = term_names
            .iter()
            .enumerate()
            .map(|(j, term)| CoefficientLine {
                name: term.clone(),
                estimate: fit.coefficients[j],
                std_error: fit.std_errors[j],
                t_value: fit.t_values[j],
                p_value: fit.p_values[j],
                ci_lower: fit.ci_lower[j],
                ci_upper: fit.ci_upper[j],
            })
            .collect();
        ModelSummary {
            name: name.to_string(),
            formula: formula.to_string(),
            n_observations: fit.n_observations,
            r_squared: fit.r_squared,
            adj_r_squared: fit.adj_r_squared,
            f_statistic: fit.f_statistic,
            f_pvalue: fit.f_pvalue,
            confidence_level: fit.confidence_level,
            terms,
        }
    }

    /// Render the summary block as text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "=== {} ===", self.name);
        let _ = writeln!(out, "formula: {}", self.formula);
        let _ = writeln!(
            out,
            "n = {}   R² = {:.4}   adj R² = {:.4}",
            self.n_observations, self.r_squared, self.adj_r_squared
        );
        if let (Some(f), Some(p)) = (self.f_statistic, self.f_pvalue) {
            let _ = writeln!(out, "F = {f:.3}   p(F) = {p:.4}");
        }

        let name_width = self
            .terms
            .iter()
            .map(|t| t.name.len())
            .chain(std::iter::once("term".len()))
            .max()
            .unwrap_or(4);
        let ci_pct = self.confidence_level * 100.0;
        let _ = writeln!(
            out,
            "{:<name_width$}  {:>12}  {:>12}  {:>8}  {:>8}  {:>12}  {:>12}",
            "term",
            "coef",
            "std err",
            "t",
            "P>|t|",
            format!("[{ci_pct:.1}%"),
            "]"
        );
        for t in &self.terms {
            let _ = writeln!(
                out,
                "{:<name_width$}  {:>12.4}  {:>12.4}  {:>8.3}  {:>8.4}  {:>12.4}  {:>12.4}",
                t.name, t.estimate, t.std_error, t.t_value, t.p_value, t.ci_lower, t.ci_upper
            );
        }
        out
    }
}
