//! Ingestion entrypoints and implementations.
//!
//! Most callers should use [`ingest_from_paths`] (from [`orchestrator`]), which:
//!
//! - reads the food class and recipe CSV files
//! - resolves impacts, matches ingredients and aggregates recipe totals
//! - replaces the store's contents in one transaction
//! - reports per-item diagnostics and the run outcome to an [`IngestionObserver`]
//!
//! The CSV readers are also available on their own under [`csv`].

pub mod csv;
pub mod observability;
pub mod orchestrator;

pub use self::csv::CsvColumns;
pub use observability::{
    severity_for_error, CompositeObserver, IngestionObserver, IngestionSeverity, IngestionStats, LogObserver,
};
pub use orchestrator::{ingest, ingest_from_paths, IngestionOptions, IngestionReport};
