//! Stats module - aggregation and trend fitting

pub mod aggregate;
pub mod regression;

pub use aggregate::Aggregator;
pub use regression::{FitError, OlsFit, Regressor};
