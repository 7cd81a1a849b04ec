//! Error taxonomy for the catalog pipeline.
//!
//! Library code returns [`CatalogError`] so callers can distinguish a bad
//! CSV from a failing store. The CLI layer folds these into `anyhow` for
//! display.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// The CSV document could not be parsed into usable rows.
    #[error("csv parse error: {0}")]
    Parse(String),

    /// The catalog store rejected or failed an operation.
    #[error("store error: {0}")]
    Store(String),

    /// The blob store could not persist or read the raw file.
    #[error("blob error: {0}")]
    Blob(String),

    /// A single-file ingestion exceeded its deadline.
    #[error("ingestion timed out after {0}s")]
    Timeout(u64),

    /// The request itself was malformed (empty batch, underivable slug).
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;
