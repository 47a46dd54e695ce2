//! Dataset Download Module
//! Fetches the raw CSV export over HTTP, or reads a saved copy from disk.

use anyhow::{Context, Result};
use tracing::{debug, info};

/// NYC Open Data export of "NYPD Shooting Incident Data (Historic)".
pub const DATASET_URL: &str =
    "https://data.cityofnewyork.us/api/views/833y-fsy8/rows.csv?accessType=DOWNLOAD";

/// Loads the dataset from a local file path or fetches it over HTTP.
///
/// Transport and filesystem errors propagate unrecovered; there is no retry.
pub fn fetch_csv(source: &str) -> Result<Vec<u8>> {
    if source.starts_with("http") {
        info!(url = %source, "Downloading dataset");
        let response = reqwest::blocking::get(source)
            .and_then(|r| r.error_for_status())
            .with_context(|| format!("GET {source}"))?;
        let bytes = response
            .bytes()
            .with_context(|| format!("reading body of {source}"))?;
        debug!(bytes = bytes.len(), "Download complete");
        Ok(bytes.to_vec())
    } else {
        debug!(path = %source, "Reading local dataset copy");
        std::fs::read(source).with_context(|| format!("reading {source}"))
    }
}
