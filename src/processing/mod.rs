//! The resolution engine.
//!
//! All functions here are pure and operate on in-memory snapshots:
//!
//! - [`normalize()`]: text normalization shared by the matcher
//! - [`resolve()`]: impact inheritance over the food class hierarchy
//! - [`FoodClassMatcher`]: ingredient text to food class matching
//! - [`aggregate()`]: per-recipe impact totals
//!
//! ## Example: resolve → match → aggregate
//!
//! ```rust
//! use recipe_impact::processing::{aggregate, resolve, FoodClassMatcher};
//! use recipe_impact::types::{FoodClassNode, ImpactTable, Recipe, RecipeIngredient};
//!
//! let nodes = vec![
//!     FoodClassNode::new(1, "Cereals", Some(1.0), None),
//!     FoodClassNode::new(2, "Rolled oats", None, Some(1)),
//!     FoodClassNode::new(3, "Milk", Some(3.0), None),
//! ];
//! let resolution = resolve(&nodes);
//! let impacts = ImpactTable::from_nodes(&resolution.nodes);
//! let matcher = FoodClassMatcher::from_nodes(&resolution.nodes);
//!
//! let ingredients = [("Oats, rolled", 0.1), ("milk", 0.25)]
//!     .into_iter()
//!     .map(|(name, kg)| {
//!         let mut ingredient = RecipeIngredient::new(1, name, kg);
//!         ingredient.matched_food_class_id = matcher.find(name);
//!         ingredient
//!     })
//!     .collect();
//! let recipe = Recipe::new(1, "Porridge", ingredients);
//!
//! let total = aggregate(&recipe, &impacts).unwrap();
//! assert!((total - 0.85).abs() < 1e-9);
//! ```

pub mod aggregate;
pub mod matcher;
pub mod normalize;
pub mod resolve;

pub use aggregate::{aggregate, aggregate_detailed};
pub use matcher::{match_ingredient, Candidate, FoodClassMatcher, MatchOutcome};
pub use normalize::{normalize, words};
pub use resolve::{resolve, Resolution};
