//! `recipe-impact` computes the environmental impact of recipes from two tabular inputs:
//!
//! - a hierarchy of food classes, some of which carry a known impact per kilogram
//! - recipe ingredient rows with free-text ingredient names and weights
//!
//! The primary entrypoint is [`ingestion::ingest_from_paths`], which reads both CSV files,
//! resolves every food class's impact, matches ingredients to food classes, aggregates recipe
//! totals and stores the result in an [`store::ImpactStore`] in one transaction.
//!
//! ## How impacts are resolved
//!
//! - A food class with its own impact keeps it. Every other class inherits the impact of its
//!   nearest ancestor that has one ([`processing::resolve()`]).
//! - A class whose chain ends at a root without an impact, at a missing parent id, or in a cycle
//!   stays unresolved.
//! - An ingredient matches a food class when both names have the same number of words and every
//!   ingredient word occurs in the food class name, after lowercasing and stripping punctuation
//!   ([`processing::FoodClassMatcher`]). Candidates are tried in ascending id order.
//! - A recipe's total is `Σ weight × impact`. If any ingredient is unmatched or matched to an
//!   unresolved class, the recipe has no total at all ([`processing::aggregate()`]).
//!
//! ## Quick example
//!
//! ```rust
//! use recipe_impact::ingestion::{ingest, IngestionOptions};
//! use recipe_impact::store::MemoryStore;
//! use recipe_impact::types::{FoodClassRow, RecipeRow};
//!
//! # fn main() -> Result<(), recipe_impact::IngestionError> {
//! let food_classes = vec![
//!     FoodClassRow { id: 1, name: "Dairy".into(), impact_per_kg: Some(3.0), parent_id: None },
//!     FoodClassRow { id: 2, name: "Butter".into(), impact_per_kg: None, parent_id: Some(1) },
//! ];
//! let recipes = vec![RecipeRow {
//!     recipe_id: 1,
//!     recipe_name: "Buttered toast".into(),
//!     ingredient_name: "Butter".into(),
//!     ingredient_weight_kg: 0.02,
//! }];
//!
//! let mut store = MemoryStore::new();
//! let report = ingest(&mut store, food_classes, recipes, &IngestionOptions::default())?;
//! assert_eq!(report.stats.unresolved_food_classes, 0);
//! assert!((report.recipe_impacts[0].total_impact_kg.unwrap() - 0.06).abs() < 1e-12);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`processing`]: the pure resolution engine (normalize, resolve, match, aggregate)
//! - [`ingestion`]: CSV readers, the run orchestrator and observer hooks
//! - [`execution`]: optional parallel matching/aggregation on a rayon pool
//! - [`store`]: the storage collaborator and its in-memory implementation
//! - [`report`]: recipe totals from stored state and report formatting
//! - [`types`], [`diagnostics`], [`error`]: data model, per-item failures and run-level errors

pub mod diagnostics;
pub mod error;
pub mod execution;
pub mod ingestion;
pub mod processing;
pub mod report;
pub mod store;
pub mod types;

pub use error::{IngestionError, IngestionResult};
