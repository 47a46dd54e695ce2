//! CSV Data Loader Module
//! Parses the raw dataset export into a DataFrame using Polars.

use polars::prelude::*;
use std::io::Cursor;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to read CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Dataset contains no rows")]
    NoData,
}

/// Parses CSV bytes with Polars.
pub struct DataLoader;

impl DataLoader {
    /// Parse an in-memory CSV export into a DataFrame.
    ///
    /// Schema inference runs over a generous window so late-file surprises in
    /// the portal export don't flip column types; malformed rows are skipped
    /// rather than aborting the parse.
    pub fn read_csv(raw: &[u8]) -> Result<DataFrame, LoaderError> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .into_reader_with_file_handle(Cursor::new(raw))
            .finish()?;

        if df.height() == 0 {
            return Err(LoaderError::NoData);
        }
        Ok(df)
    }

    /// Get list of column names from a DataFrame.
    pub fn column_names(df: &DataFrame) -> Vec<String> {
        df.get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }
}
