//! Parallel execution for the per-item stages of a run.
//!
//! Matching and aggregation only read already-resolved data, so they can be split across a
//! rayon pool. Resolution itself stays sequential. Output order always equals input order,
//! so results are identical to the sequential path.
//!
//! This module provides:
//!
//! - Chunked parallel matching and aggregation
//! - Real-time metrics + observer hooks for monitoring

mod observer;

use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use rayon::ThreadPool;
use rayon::ThreadPoolBuilder;

use crate::diagnostics::UndefinedRecipeImpact;
use crate::error::{IngestionError, IngestionResult};
use crate::processing::{aggregate_detailed, FoodClassMatcher, MatchOutcome};
use crate::types::{ImpactTable, Recipe, RecipeIngredient};

pub use observer::{
    ExecutionEvent, ExecutionMetrics, ExecutionMetricsSnapshot, ExecutionObserver, LogExecutionObserver,
    Stage,
};

/// Configuration for the [`ExecutionEngine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOptions {
    /// Number of worker threads used by the engine.
    ///
    /// If `None`, uses the platform's available parallelism.
    pub num_threads: Option<usize>,
    /// Number of items per chunk.
    pub chunk_size: usize,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        let n = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
        Self {
            num_threads: Some(n),
            chunk_size: 1_024,
        }
    }
}

/// Runs matching and aggregation across a dedicated thread pool.
pub struct ExecutionEngine {
    pool: ThreadPool,
    opts: ExecutionOptions,
    observer: Option<Arc<dyn ExecutionObserver>>,
    metrics: Arc<ExecutionMetrics>,
}

impl ExecutionEngine {
    /// Create a new engine with the given options.
    ///
    /// Returns [`IngestionError::SchemaMismatch`] if `chunk_size == 0` or
    /// `num_threads == Some(0)`.
    pub fn new(opts: ExecutionOptions) -> IngestionResult<Self> {
        if opts.chunk_size == 0 {
            return Err(IngestionError::SchemaMismatch {
                message: "chunk_size must be > 0".to_string(),
            });
        }
        if opts.num_threads == Some(0) {
            return Err(IngestionError::SchemaMismatch {
                message: "num_threads must be > 0 when set".to_string(),
            });
        }

        let n_threads = opts
            .num_threads
            .unwrap_or_else(|| std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1));

        let pool = ThreadPoolBuilder::new().num_threads(n_threads).build()?;

        Ok(Self {
            pool,
            opts,
            observer: None,
            metrics: Arc::new(ExecutionMetrics::new()),
        })
    }

    /// Attach an observer for execution events (metrics/logging).
    pub fn with_observer(mut self, observer: Arc<dyn ExecutionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Get a handle to real-time execution metrics.
    pub fn metrics(&self) -> Arc<ExecutionMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Match every ingredient's raw name. Output is in input order.
    pub fn match_ingredients(
        &self,
        matcher: &FoodClassMatcher,
        ingredients: &[RecipeIngredient],
    ) -> Vec<MatchOutcome> {
        self.run_chunked(Stage::Match, ingredients, |ingredient| {
            matcher.classify(&ingredient.raw_name)
        })
    }

    /// Aggregate every recipe. Output is in input order.
    pub fn aggregate_recipes(
        &self,
        recipes: &[Recipe],
        impacts: &ImpactTable,
    ) -> Vec<Result<f64, UndefinedRecipeImpact>> {
        self.run_chunked(Stage::Aggregate, recipes, |recipe| {
            aggregate_detailed(recipe, impacts)
        })
    }

    fn run_chunked<T, U, F>(&self, stage: Stage, items: &[T], f: F) -> Vec<U>
    where
        T: Sync,
        U: Send,
        F: Fn(&T) -> U + Sync,
    {
        let start = Instant::now();
        self.metrics.begin_run();
        self.emit(ExecutionEvent::RunStarted {
            stage,
            items: items.len(),
        });

        let chunk_size = self.opts.chunk_size;
        let per_chunk: Vec<Vec<U>> = self.pool.install(|| {
            items
                .par_chunks(chunk_size)
                .enumerate()
                .map(|(chunk_idx, chunk)| {
                    self.metrics.on_chunk_start();
                    self.emit(ExecutionEvent::ChunkStarted {
                        stage,
                        start_item: chunk_idx * chunk_size,
                        item_count: chunk.len(),
                    });

                    let out: Vec<U> = chunk
                        .iter()
                        .map(|item| {
                            self.metrics.on_item_processed();
                            f(item)
                        })
                        .collect();

                    self.emit(ExecutionEvent::ChunkFinished {
                        stage,
                        item_count: out.len(),
                    });
                    self.metrics.on_chunk_end();
                    out
                })
                .collect()
        });

        let out: Vec<U> = per_chunk.into_iter().flatten().collect();

        self.metrics.end_run(start.elapsed());
        self.emit(ExecutionEvent::RunFinished {
            stage,
            elapsed: start.elapsed(),
            metrics: self.metrics.snapshot(),
        });

        out
    }

    fn emit(&self, event: ExecutionEvent) {
        if let Some(obs) = &self.observer {
            obs.on_event(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::{ExecutionEngine, ExecutionEvent, ExecutionObserver, ExecutionOptions, Stage};
    use crate::error::IngestionError;
    use crate::processing::{aggregate_detailed, FoodClassMatcher};
    use crate::types::{ImpactTable, Recipe, RecipeIngredient};

    #[derive(Default)]
    struct Recording(Mutex<Vec<ExecutionEvent>>);

    impl ExecutionObserver for Recording {
        fn on_event(&self, event: &ExecutionEvent) {
            self.0.lock().unwrap().push(event.clone());
        }
    }

    fn engine(threads: usize, chunk_size: usize) -> ExecutionEngine {
        ExecutionEngine::new(ExecutionOptions {
            num_threads: Some(threads),
            chunk_size,
        })
        .unwrap()
    }

    fn ingredients(n: usize) -> Vec<RecipeIngredient> {
        let names = ["milk", "Whole Milk", "oats", "???", "rolled oats"];
        (0..n)
            .map(|i| RecipeIngredient::new(i as i64, names[i % names.len()], 1.0))
            .collect()
    }

    #[test]
    fn parallel_matching_equals_sequential() {
        let matcher = FoodClassMatcher::new([(1, "Milk"), (2, "Milk, whole"), (3, "Oats"), (4, "Oats rolled")]);
        let items = ingredients(1_003);
        let expected: Vec<_> = items.iter().map(|i| matcher.classify(&i.raw_name)).collect();

        let engine = engine(4, 64);
        assert_eq!(engine.match_ingredients(&matcher, &items), expected);

        let snap = engine.metrics().snapshot();
        assert_eq!(snap.items_processed, 1_003);
        assert_eq!(snap.chunks_started, 16);
        assert_eq!(snap.chunks_finished, 16);
        assert!(snap.max_active_chunks >= 1);
        assert!(snap.max_active_chunks <= 4);
    }

    #[test]
    fn parallel_aggregation_preserves_order() {
        let impacts: ImpactTable = [(1, 2.0)].into_iter().collect();
        let recipes: Vec<Recipe> = (0..50)
            .map(|i| {
                let mut ingredient = RecipeIngredient::new(i, "x", i as f64);
                if i % 7 != 0 {
                    ingredient = ingredient.matched(1);
                }
                Recipe::new(i, format!("r{i}"), vec![ingredient])
            })
            .collect();
        let expected: Vec<_> = recipes.iter().map(|r| aggregate_detailed(r, &impacts)).collect();

        let out = engine(3, 5).aggregate_recipes(&recipes, &impacts);
        assert_eq!(out, expected);
        assert!(out[0].is_err());
        assert_eq!(out[1], Ok(2.0));
    }

    #[test]
    fn observer_sees_run_boundaries() {
        let obs = Arc::new(Recording::default());
        let engine = engine(2, 10).with_observer(obs.clone());
        let matcher = FoodClassMatcher::new([(1, "Milk")]);
        let _ = engine.match_ingredients(&matcher, &ingredients(25));

        let events = obs.0.lock().unwrap();
        assert!(matches!(
            events.first(),
            Some(ExecutionEvent::RunStarted {
                stage: Stage::Match,
                items: 25
            })
        ));
        assert!(matches!(events.last(), Some(ExecutionEvent::RunFinished { .. })));
        let chunks = events
            .iter()
            .filter(|e| matches!(e, ExecutionEvent::ChunkFinished { .. }))
            .count();
        assert_eq!(chunks, 3);
    }

    #[test]
    fn empty_input_runs_no_chunks() {
        let engine = engine(1, 8);
        let out = engine.match_ingredients(&FoodClassMatcher::default(), &[]);
        assert!(out.is_empty());
        assert_eq!(engine.metrics().snapshot().chunks_started, 0);
    }

    #[test]
    fn rejects_zero_sized_options() {
        let err = ExecutionEngine::new(ExecutionOptions {
            num_threads: Some(2),
            chunk_size: 0,
        })
        .err()
        .unwrap();
        assert!(matches!(err, IngestionError::SchemaMismatch { .. }));

        let err = ExecutionEngine::new(ExecutionOptions {
            num_threads: Some(0),
            chunk_size: 8,
        })
        .err()
        .unwrap();
        assert!(err.to_string().contains("num_threads"));
    }
}
