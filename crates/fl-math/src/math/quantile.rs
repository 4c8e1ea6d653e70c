//! Percentile estimation and one-sided winsorization.
//!
//! The quantile uses linear interpolation between order statistics, the
//! default method of the common dataframe libraries, so caps computed here
//! agree with caps computed on the same data elsewhere.

use fl_common::{Error, Result};

/// Quantile of `values` at `q` in `0..=1`, by linear interpolation between
/// order statistics.
///
/// With n sorted values the rank is `h = (n-1)*q`; the result interpolates
/// between the values at `floor(h)` and `ceil(h)`. NaN anywhere in the input
/// is an error rather than a silent NaN result.
pub fn quantile(values: &[f64], q: f64) -> Result<f64> {
    if !(0.0..=1.0).contains(&q) {
        return Err(Error::QuantileOutOfRange(q));
    }
    if values.is_empty() {
        return Err(Error::NumericalInstability(
            "quantile of an empty slice".to_string(),
        ));
    }
    if values.iter().any(|v| v.is_nan()) {
        return Err(Error::NumericalInstability(
            "quantile input contains NaN".to_string(),
        ));
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let h = (sorted.len() - 1) as f64 * q;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    if lo == hi {
        return Ok(sorted[lo]);
    }
    Ok(sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo]))
}

/// Replace every value strictly above `cap` with `cap`.
///
/// One-sided winsorization; values at or below the cap pass through
/// unchanged, so applying it twice equals applying it once.
pub fn winsorize_upper(values: &[f64], cap: f64) -> Vec<f64> {
    values.iter().map(|&v| if v > cap { cap } else { v }).collect()
}
