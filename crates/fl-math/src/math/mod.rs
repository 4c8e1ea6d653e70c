pub mod ols;
pub mod quantile;
