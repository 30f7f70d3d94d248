use thiserror::Error;

use crate::store::StoreError;

/// Convenience result type for ingestion runs.
pub type IngestionResult<T> = Result<T, IngestionError>;

/// Run-level error returned by ingestion entry points.
///
/// Per-item problems (unresolved impacts, unmatched ingredients, undefined recipe totals) are
/// not errors; they are reported as [`crate::diagnostics::Diagnostic`]s and processing carries
/// on.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV decoding error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// The input does not have the expected shape (missing columns, invalid options, etc.).
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// A cell could not be parsed into the required type or violates a value constraint.
    #[error("failed to parse value at row {row} column '{column}': {message} (raw='{raw}')")]
    ParseError {
        row: usize,
        column: String,
        raw: String,
        message: String,
    },

    /// An in-memory recipe row carries a negative or NaN ingredient weight.
    #[error("invalid weight {weight} for ingredient '{ingredient}' of recipe {recipe_id}")]
    InvalidWeight {
        recipe_id: i64,
        ingredient: String,
        weight: f64,
    },

    /// The store rejected the bulk write; nothing from this run was committed.
    #[error("persistence failure: {0}")]
    Persistence(#[from] StoreError),

    /// The execution engine could not start its worker pool.
    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
