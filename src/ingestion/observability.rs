use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::diagnostics::Diagnostic;
use crate::error::IngestionError;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum IngestionSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// Error-level event (an item could not be processed, or the run failed on bad input).
    Error,
    /// Critical error (I/O or persistence failures).
    Critical,
}

/// Counters reported on a successful ingestion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestionStats {
    pub food_classes: usize,
    /// Food classes that ended without a resolved impact.
    pub unresolved_food_classes: usize,
    pub recipes: usize,
    pub ingredients: usize,
    pub unmatched_ingredients: usize,
    /// Ingredients that matched more than one food class.
    pub ambiguous_matches: usize,
    /// Recipes whose total could not be calculated.
    pub undefined_recipes: usize,
}

impl fmt::Display for IngestionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "food_classes={} unresolved={} recipes={} ingredients={} unmatched={} ambiguous={} undefined_recipes={}",
            self.food_classes,
            self.unresolved_food_classes,
            self.recipes,
            self.ingredients,
            self.unmatched_ingredients,
            self.ambiguous_matches,
            self.undefined_recipes
        )
    }
}

/// Observer interface for ingestion outcomes.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait IngestionObserver: Send + Sync {
    /// Called once per per-item diagnostic, in the order they are produced.
    fn on_diagnostic(&self, _diagnostic: &Diagnostic) {}

    /// Called when the run committed.
    fn on_success(&self, _stats: &IngestionStats) {}

    /// Called when the run failed.
    fn on_failure(&self, _severity: IngestionSeverity, _error: &IngestionError) {}

    /// Called when a run failure meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, severity: IngestionSeverity, error: &IngestionError) {
        self.on_failure(severity, error)
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn IngestionObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn IngestionObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl IngestionObserver for CompositeObserver {
    fn on_diagnostic(&self, diagnostic: &Diagnostic) {
        for o in &self.observers {
            o.on_diagnostic(diagnostic);
        }
    }

    fn on_success(&self, stats: &IngestionStats) {
        for o in &self.observers {
            o.on_success(stats);
        }
    }

    fn on_failure(&self, severity: IngestionSeverity, error: &IngestionError) {
        for o in &self.observers {
            o.on_failure(severity, error);
        }
    }

    fn on_alert(&self, severity: IngestionSeverity, error: &IngestionError) {
        for o in &self.observers {
            o.on_alert(severity, error);
        }
    }
}

/// Forwards ingestion events to the [`log`] facade.
#[derive(Debug, Default)]
pub struct LogObserver;

impl IngestionObserver for LogObserver {
    fn on_diagnostic(&self, diagnostic: &Diagnostic) {
        match diagnostic.severity() {
            IngestionSeverity::Info => log::info!("{diagnostic}"),
            IngestionSeverity::Warning => log::warn!("{diagnostic}"),
            IngestionSeverity::Error | IngestionSeverity::Critical => log::error!("{diagnostic}"),
        }
    }

    fn on_success(&self, stats: &IngestionStats) {
        log::info!("[ingest][ok] {stats}");
    }

    fn on_failure(&self, severity: IngestionSeverity, error: &IngestionError) {
        log::error!("[ingest][{severity:?}] err={error}");
    }

    fn on_alert(&self, severity: IngestionSeverity, error: &IngestionError) {
        log::error!("[ALERT][ingest][{severity:?}] err={error}");
    }
}

/// Severity of a run-level error.
pub fn severity_for_error(e: &IngestionError) -> IngestionSeverity {
    match e {
        IngestionError::Io(_) => IngestionSeverity::Critical,
        IngestionError::Csv(err) => match err.kind() {
            ::csv::ErrorKind::Io(_) => IngestionSeverity::Critical,
            _ => IngestionSeverity::Error,
        },
        IngestionError::Persistence(_) => IngestionSeverity::Critical,
        IngestionError::ThreadPool(_) => IngestionSeverity::Critical,
        IngestionError::SchemaMismatch { .. } => IngestionSeverity::Error,
        IngestionError::ParseError { .. } => IngestionSeverity::Error,
        IngestionError::InvalidWeight { .. } => IngestionSeverity::Error,
    }
}
