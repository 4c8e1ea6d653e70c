//! Ordinary least squares with inference statistics.
//!
//! Solves the normal equations with an in-crate Cholesky factorization; the
//! design matrices produced by the model layer are small (a dozen columns at
//! most), so a dense symmetric solve is plenty. Distribution functions for
//! p-values and confidence intervals are delegated to `statrs`.

use fl_common::{Error, Result};
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, FisherSnedecor, StudentsT};

/// Options for an OLS fit.
#[derive(Debug, Clone, Copy)]
pub struct OlsOptions {
    /// Prepend an intercept column to the design.
    pub fit_intercept: bool,
    /// Confidence level for coefficient intervals (e.g. 0.95).
    pub confidence_level: f64,
}

impl Default for OlsOptions {
    fn default() -> Self {
        Self {
            fit_intercept: true,
            confidence_level: 0.95,
        }
    }
}

/// Result of an OLS fit. Coefficient vectors are ordered intercept first
/// (when fitted), then the feature columns in input order.
#[derive(Debug, Clone, Serialize)]
pub struct OlsFit {
    pub coefficients: Vec<f64>,
    pub std_errors: Vec<f64>,
    pub t_values: Vec<f64>,
    pub p_values: Vec<f64>,
    pub ci_lower: Vec<f64>,
    pub ci_upper: Vec<f64>,
    pub confidence_level: f64,
    pub r_squared: f64,
    pub adj_r_squared: f64,
    pub residual_std_error: f64,
    pub f_statistic: Option<f64>,
    pub f_pvalue: Option<f64>,
    pub n_observations: usize,
    pub n_params: usize,
    pub df_residual: usize,
}

/// Fit an OLS regression of `y` on the feature columns `x`.
///
/// Rows containing NaN or infinite values in `y` or any feature column are
/// dropped before fitting. Errors on empty input, mismatched column lengths,
/// fewer usable rows than parameters, or a singular design.
pub fn fit_ols(y: &[f64], x: &[Vec<f64>], options: &OlsOptions) -> Result<OlsFit> {
    if y.is_empty() {
        return Err(Error::EmptyInput);
    }
    let n_obs = y.len();
    for col in x {
        if col.len() != n_obs {
            return Err(Error::DimensionMismatch {
                y_len: n_obs,
                x_rows: col.len(),
            });
        }
    }

    let n_features = x.len();
    let k = n_features + usize::from(options.fit_intercept);
    if k == 0 {
        return Err(Error::InsufficientData { rows: n_obs, params: 0 });
    }

    // Drop rows with non-finite values anywhere.
    let valid: Vec<usize> = (0..n_obs)
        .filter(|&i| y[i].is_finite() && x.iter().all(|col| col[i].is_finite()))
        .collect();
    let n = valid.len();
    if n <= k {
        return Err(Error::InsufficientData { rows: n, params: k });
    }

    // Design matrix, row-major, intercept first.
    let mut design = vec![0.0f64; n * k];
    for (r, &i) in valid.iter().enumerate() {
        let row = &mut design[r * k..(r + 1) * k];
        let mut c = 0;
        if options.fit_intercept {
            row[c] = 1.0;
            c += 1;
        }
        for col in x {
            row[c] = col[i];
            c += 1;
        }
    }
    let yv: Vec<f64> = valid.iter().map(|&i| y[i]).collect();

    // Normal equations: (X'X) beta = X'y.
    let mut xtx = vec![0.0f64; k * k];
    let mut xty = vec![0.0f64; k];
    for r in 0..n {
        let row = &design[r * k..(r + 1) * k];
        for a in 0..k {
            xty[a] += row[a] * yv[r];
            for b in a..k {
                xtx[a * k + b] += row[a] * row[b];
            }
        }
    }
    for a in 0..k {
        for b in 0..a {
            xtx[a * k + b] = xtx[b * k + a];
        }
    }

    let chol = Cholesky::decompose(&xtx, k)?;
    let beta = chol.solve(&xty);

    // Residual sum of squares and total sum of squares.
    let mut sse = 0.0;
    for r in 0..n {
        let row = &design[r * k..(r + 1) * k];
        let fitted: f64 = row.iter().zip(&beta).map(|(a, b)| a * b).sum();
        let e = yv[r] - fitted;
        sse += e * e;
    }
    let sst = if options.fit_intercept {
        let mean = yv.iter().sum::<f64>() / n as f64;
        yv.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>()
    } else {
        yv.iter().map(|v| v * v).sum::<f64>()
    };

    let df_residual = n - k;
    let sigma2 = sse / df_residual as f64;
    if !sigma2.is_finite() {
        return Err(Error::NumericalInstability(
            "non-finite residual variance".to_string(),
        ));
    }

    // Diagonal of (X'X)^-1, by solving against unit vectors.
    let mut inv_diag = vec![0.0f64; k];
    let mut unit = vec![0.0f64; k];
    for j in 0..k {
        unit.fill(0.0);
        unit[j] = 1.0;
        let col = chol.solve(&unit);
        inv_diag[j] = col[j];
    }

    let students_t = StudentsT::new(0.0, 1.0, df_residual as f64)
        .map_err(|e| Error::NumericalInstability(e.to_string()))?;
    let t_crit = students_t.inverse_cdf(1.0 - (1.0 - options.confidence_level) / 2.0);

    let mut std_errors = Vec::with_capacity(k);
    let mut t_values = Vec::with_capacity(k);
    let mut p_values = Vec::with_capacity(k);
    let mut ci_lower = Vec::with_capacity(k);
    let mut ci_upper = Vec::with_capacity(k);
    for j in 0..k {
        let se = (sigma2 * inv_diag[j]).max(0.0).sqrt();
        let t = if se > 0.0 { beta[j] / se } else { f64::INFINITY };
        let p = if t.is_finite() {
            2.0 * (1.0 - students_t.cdf(t.abs()))
        } else {
            0.0
        };
        std_errors.push(se);
        t_values.push(t);
        p_values.push(p);
        ci_lower.push(beta[j] - t_crit * se);
        ci_upper.push(beta[j] + t_crit * se);
    }

    let r_squared = if sst > 0.0 { 1.0 - sse / sst } else { f64::NAN };
    let df_model = k - usize::from(options.fit_intercept);
    let adj_r_squared = if sst > 0.0 && df_residual > 0 {
        1.0 - (1.0 - r_squared) * (n as f64 - 1.0) / df_residual as f64
    } else {
        f64::NAN
    };

    // Overall F test against the intercept-only model.
    let (f_statistic, f_pvalue) = if df_model > 0 && sst > 0.0 && sse > 0.0 {
        let f = (sst - sse) / df_model as f64 / sigma2;
        let dist = FisherSnedecor::new(df_model as f64, df_residual as f64)
            .map_err(|e| Error::NumericalInstability(e.to_string()))?;
        (Some(f), Some(1.0 - dist.cdf(f)))
    } else {
        (None, None)
    };

    Ok(OlsFit {
        coefficients: beta,
        std_errors,
        t_values,
        p_values,
        ci_lower,
        ci_upper,
        confidence_level: options.confidence_level,
        r_squared,
        adj_r_squared,
        residual_std_error: sigma2.sqrt(),
        f_statistic,
        f_pvalue,
        n_observations: n,
        n_params: k,
        df_residual,
    })
}

/// Cholesky factorization of a symmetric positive-definite matrix,
/// row-major, used to solve the normal equations and recover the
/// covariance diagonal.
struct Cholesky {
    l: Vec<f64>,
    n: usize,
}

impl Cholesky {
    fn decompose(a: &[f64], n: usize) -> Result<Cholesky> {
        let mut l = vec![0.0f64; n * n];
        for i in 0..n {
            for j in 0..=i {
                let mut sum = a[i * n + j];
                for p in 0..j {
                    sum -= l[i * n + p] * l[j * n + p];
                }
                if i == j {
                    // Pivot must stay clearly positive or the design is
                    // (numerically) rank deficient.
                    if sum <= 1e-12 * a[i * n + i].abs().max(1.0) {
                        return Err(Error::SingularMatrix);
                    }
                    l[i * n + i] = sum.sqrt();
                } else {
                    l[i * n + j] = sum / l[j * n + j];
                }
            }
        }
        Ok(Cholesky { l, n })
    }

    /// Solve `A x = b` given `A = L L'`.
    fn solve(&self, b: &[f64]) -> Vec<f64> {
        let n = self.n;
        let l = &self.l;
        // Forward: L z = b
        let mut z = vec![0.0f64; n];
        for i in 0..n {
            let mut sum = b[i];
            for p in 0..i {
                sum -= l[i * n + p] * z[p];
            }
            z[i] = sum / l[i * n + i];
        }
        // Backward: L' x = z
        let mut xout = vec![0.0f64; n];
        for i in (0..n).rev() {
            let mut sum = z[i];
            for p in (i + 1)..n {
                sum -= l[p * n + i] * xout[p];
            }
            xout[i] = sum / l[i * n + i];
        }
        xout
    }
}
