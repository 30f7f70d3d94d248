//! Ingestion orchestrator.
//!
//! Most callers should use [`ingest_from_paths`], which reads both CSV inputs and runs
//! [`ingest`]. A run:
//!
//! 1. builds food class nodes and resolves their impacts
//! 2. matches every ingredient to a food class
//! 3. groups ingredients into recipes and aggregates their totals
//! 4. replaces the store's contents in a single transaction
//!
//! Per-item problems are reported to the configured
//! [`IngestionObserver`](super::observability::IngestionObserver) and never stop the run. Only
//! input and persistence failures are returned as errors. If an observer is configured, those
//! are reported to it too (`on_failure`, plus `on_alert` at or above
//! [`IngestionOptions::alert_at_or_above`]).

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;

use crate::diagnostics::{AmbiguousMatch, Diagnostic, NoMatch};
use crate::error::{IngestionError, IngestionResult};
use crate::execution::{ExecutionEngine, ExecutionOptions, LogExecutionObserver};
use crate::processing::{aggregate_detailed, resolve, FoodClassMatcher, MatchOutcome};
use crate::store::{ImpactStore, RecipeRecord};
use crate::types::{
    FoodClassNode, FoodClassRow, ImpactTable, Recipe, RecipeId, RecipeImpact, RecipeIngredient, RecipeRow,
};

use super::csv::{read_food_classes_from_path, read_recipe_rows_from_path, CsvColumns};
use super::observability::{
    severity_for_error, IngestionObserver, IngestionSeverity, IngestionStats, LogObserver,
};

/// Options controlling an ingestion run.
///
/// Use [`Default`] for common cases: diagnostics go to the [`log`] facade, matching and
/// aggregation run sequentially.
#[derive(Clone)]
pub struct IngestionOptions {
    /// Receives diagnostics and the run outcome. `None` silences them.
    pub observer: Option<Arc<dyn IngestionObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: IngestionSeverity,
    /// If set, matching and aggregation run on an [`ExecutionEngine`].
    pub execution: Option<ExecutionOptions>,
    /// CSV headers used by [`ingest_from_paths`].
    pub columns: CsvColumns,
}

impl fmt::Debug for IngestionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionOptions")
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .field("execution", &self.execution)
            .field("columns", &self.columns)
            .finish()
    }
}

impl Default for IngestionOptions {
    fn default() -> Self {
        Self {
            observer: Some(Arc::new(LogObserver)),
            alert_at_or_above: IngestionSeverity::Critical,
            execution: None,
            columns: CsvColumns::default(),
        }
    }
}

/// Outcome of a committed run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngestionReport {
    pub stats: IngestionStats,
    /// One entry per recipe, in order of first appearance in the input.
    pub recipe_impacts: Vec<RecipeImpact>,
}

/// Read both CSV inputs and run [`ingest`].
///
/// ```no_run
/// use recipe_impact::ingestion::{ingest_from_paths, IngestionOptions};
/// use recipe_impact::store::MemoryStore;
///
/// # fn main() -> Result<(), recipe_impact::IngestionError> {
/// let mut store = MemoryStore::new();
/// let report = ingest_from_paths(
///     &mut store,
///     "data/food_classes.csv",
///     "data/recipes.csv",
///     &IngestionOptions::default(),
/// )?;
/// println!("{}", report.stats);
/// # Ok(())
/// # }
/// ```
pub fn ingest_from_paths<S: ImpactStore>(
    store: &mut S,
    food_classes_path: impl AsRef<Path>,
    recipes_path: impl AsRef<Path>,
    options: &IngestionOptions,
) -> IngestionResult<IngestionReport> {
    let result = read_food_classes_from_path(food_classes_path, &options.columns)
        .and_then(|food_rows| {
            read_recipe_rows_from_path(recipes_path, &options.columns)
                .map(|recipe_rows| (food_rows, recipe_rows))
        })
        .and_then(|(food_rows, recipe_rows)| run(store, food_rows, recipe_rows, options));
    report_outcome(options, &result);
    result
}

/// Resolve, match, aggregate and persist already-parsed rows.
///
/// Every ingredient weight must be a non-negative number, otherwise
/// [`IngestionError::InvalidWeight`] is returned before the store is touched.
///
/// The store is cleared and refilled inside one transaction; if any write is rejected the
/// store keeps its previous contents and [`IngestionError::Persistence`] is returned.
pub fn ingest<S: ImpactStore>(
    store: &mut S,
    food_rows: Vec<FoodClassRow>,
    recipe_rows: Vec<RecipeRow>,
    options: &IngestionOptions,
) -> IngestionResult<IngestionReport> {
    let result = run(store, food_rows, recipe_rows, options);
    report_outcome(options, &result);
    result
}

fn run<S: ImpactStore>(
    store: &mut S,
    food_rows: Vec<FoodClassRow>,
    recipe_rows: Vec<RecipeRow>,
    options: &IngestionOptions,
) -> IngestionResult<IngestionReport> {
    if let Some(row) = recipe_rows.iter().find(|r| !(r.ingredient_weight_kg >= 0.0)) {
        return Err(IngestionError::InvalidWeight {
            recipe_id: row.recipe_id,
            ingredient: row.ingredient_name.clone(),
            weight: row.ingredient_weight_kg,
        });
    }

    let engine = match &options.execution {
        Some(opts) => Some(
            ExecutionEngine::new(opts.clone())?.with_observer(Arc::new(LogExecutionObserver)),
        ),
        None => None,
    };
    let mut stats = IngestionStats::default();

    let start = Instant::now();
    let nodes: Vec<FoodClassNode> = food_rows.into_iter().map(FoodClassNode::from).collect();
    let resolution = resolve(&nodes);
    for failure in &resolution.failures {
        emit(options, Diagnostic::from(failure.clone()));
    }
    stats.food_classes = resolution.nodes.len();
    stats.unresolved_food_classes = resolution.unresolved_count();
    log::info!(
        "resolved {} food classes in {:.3} seconds; failed to resolve impact for {} of these",
        stats.food_classes,
        start.elapsed().as_secs_f64(),
        stats.unresolved_food_classes
    );

    let start = Instant::now();
    let matcher = FoodClassMatcher::from_nodes(&resolution.nodes);
    let mut ingredients: Vec<RecipeIngredient> = recipe_rows
        .iter()
        .map(|row| RecipeIngredient::new(row.recipe_id, row.ingredient_name.clone(), row.ingredient_weight_kg))
        .collect();
    let outcomes = match &engine {
        Some(engine) => engine.match_ingredients(&matcher, &ingredients),
        None => ingredients
            .iter()
            .map(|i| matcher.classify(&i.raw_name))
            .collect(),
    };
    for (ingredient, outcome) in ingredients.iter_mut().zip(outcomes) {
        ingredient.matched_food_class_id = outcome.food_class_id();
        match outcome {
            MatchOutcome::Unique(_) => {}
            MatchOutcome::NoMatch => {
                stats.unmatched_ingredients += 1;
                emit(
                    options,
                    Diagnostic::from(NoMatch {
                        recipe_id: ingredient.recipe_id,
                        raw_name: ingredient.raw_name.clone(),
                    }),
                );
            }
            MatchOutcome::Ambiguous { chosen, candidates } => {
                stats.ambiguous_matches += 1;
                emit(
                    options,
                    Diagnostic::from(AmbiguousMatch {
                        recipe_id: ingredient.recipe_id,
                        raw_name: ingredient.raw_name.clone(),
                        chosen,
                        candidates,
                    }),
                );
            }
        }
    }

    let recipes = group_recipes(&recipe_rows, &ingredients);
    stats.recipes = recipes.len();
    stats.ingredients = ingredients.len();
    log::info!(
        "matched {} recipe ingredients across {} recipes in {:.3} seconds; failed to match {} ingredients",
        stats.ingredients,
        stats.recipes,
        start.elapsed().as_secs_f64(),
        stats.unmatched_ingredients
    );

    let impacts = ImpactTable::from_nodes(&resolution.nodes);
    let totals = match &engine {
        Some(engine) => engine.aggregate_recipes(&recipes, &impacts),
        None => recipes
            .iter()
            .map(|r| aggregate_detailed(r, &impacts))
            .collect(),
    };
    let mut recipe_impacts = Vec::with_capacity(recipes.len());
    for (recipe, total) in recipes.iter().zip(totals) {
        let total_impact_kg = match total {
            Ok(total) => Some(total),
            Err(undefined) => {
                stats.undefined_recipes += 1;
                emit(options, Diagnostic::from(undefined));
                None
            }
        };
        recipe_impacts.push(RecipeImpact {
            recipe_id: recipe.id,
            name: recipe.name.clone(),
            total_impact_kg,
        });
    }

    let start = Instant::now();
    let records: Vec<RecipeRecord> = recipes.iter().map(RecipeRecord::from).collect();
    store.transaction(|tx| {
        tx.clear()?;
        tx.insert_food_classes(&resolution.nodes)?;
        tx.insert_recipes(&records)?;
        tx.insert_ingredients(&ingredients)
    })?;
    log::info!(
        "stored {} food classes, {} recipes and {} ingredients in {:.3} seconds",
        stats.food_classes,
        stats.recipes,
        stats.ingredients,
        start.elapsed().as_secs_f64()
    );

    Ok(IngestionReport {
        stats,
        recipe_impacts,
    })
}

/// Group matched ingredients into recipes, in order of each recipe's first row.
///
/// The recipe name comes from its first row; ingredients keep row order.
fn group_recipes(rows: &[RecipeRow], ingredients: &[RecipeIngredient]) -> Vec<Recipe> {
    let mut position: HashMap<RecipeId, usize> = HashMap::new();
    let mut recipes: Vec<Recipe> = Vec::new();
    for (row, ingredient) in rows.iter().zip(ingredients) {
        let idx = *position.entry(row.recipe_id).or_insert_with(|| {
            recipes.push(Recipe::new(row.recipe_id, row.recipe_name.clone(), Vec::new()));
            recipes.len() - 1
        });
        recipes[idx].ingredients.push(ingredient.clone());
    }
    recipes
}

fn emit(options: &IngestionOptions, diagnostic: Diagnostic) {
    if let Some(obs) = options.observer.as_ref() {
        obs.on_diagnostic(&diagnostic);
    }
}

fn report_outcome(options: &IngestionOptions, result: &IngestionResult<IngestionReport>) {
    let Some(obs) = options.observer.as_ref() else {
        return;
    };
    match result {
        Ok(report) => obs.on_success(&report.stats),
        Err(e) => {
            let sev = severity_for_error(e);
            obs.on_failure(sev, e);
            if sev >= options.alert_at_or_above {
                obs.on_alert(sev, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::group_recipes;
    use crate::types::{RecipeIngredient, RecipeRow};

    fn row(recipe_id: i64, recipe_name: &str, ingredient: &str) -> RecipeRow {
        RecipeRow {
            recipe_id,
            recipe_name: recipe_name.to_string(),
            ingredient_name: ingredient.to_string(),
            ingredient_weight_kg: 1.0,
        }
    }

    #[test]
    fn groups_by_first_appearance_and_keeps_first_name() {
        let rows = vec![
            row(2, "Soup", "leek"),
            row(1, "Salad", "lettuce"),
            row(2, "Soup (renamed)", "potato"),
        ];
        let ingredients: Vec<RecipeIngredient> = rows
            .iter()
            .map(|r| RecipeIngredient::new(r.recipe_id, r.ingredient_name.clone(), r.ingredient_weight_kg))
            .collect();

        let recipes = group_recipes(&rows, &ingredients);
        assert_eq!(recipes.len(), 2);
        assert_eq!(recipes[0].id, 2);
        assert_eq!(recipes[0].name, "Soup");
        let names: Vec<&str> = recipes[0].ingredients.iter().map(|i| i.raw_name.as_str()).collect();
        assert_eq!(names, vec!["leek", "potato"]);
        assert_eq!(recipes[1].name, "Salad");
    }
}
