//! Per-recipe impact totals.

use crate::diagnostics::{MissingContribution, UndefinedRecipeImpact};
use crate::types::{ImpactTable, Recipe};

/// Total impact of `recipe`, or `None` if any ingredient lacks a resolved impact.
///
/// This is all-or-nothing: a recipe with one unidentified ingredient has no total, never a
/// partial sum.
///
/// ```rust
/// use recipe_impact::processing::aggregate;
/// use recipe_impact::types::{ImpactTable, Recipe, RecipeIngredient};
///
/// let impacts: ImpactTable = [(1, 3.0), (2, 4.0)].into_iter().collect();
/// let recipe = Recipe::new(
///     1,
///     "Porridge",
///     vec![
///         RecipeIngredient::new(1, "oats", 2.0).matched(1),
///         RecipeIngredient::new(1, "milk", 1.0).matched(2),
///     ],
/// );
/// assert_eq!(aggregate(&recipe, &impacts), Some(10.0));
/// ```
pub fn aggregate(recipe: &Recipe, impacts: &ImpactTable) -> Option<f64> {
    aggregate_detailed(recipe, impacts).ok()
}

/// Like [`aggregate`], but lists every ingredient that made the total undefined.
pub fn aggregate_detailed(
    recipe: &Recipe,
    impacts: &ImpactTable,
) -> Result<f64, UndefinedRecipeImpact> {
    let mut total = 0.0_f64;
    let mut missing = Vec::new();

    for ingredient in &recipe.ingredients {
        let Some(food_class_id) = ingredient.matched_food_class_id else {
            missing.push(MissingContribution::Unmatched {
                raw_name: ingredient.raw_name.clone(),
            });
            continue;
        };
        match impacts.get(food_class_id) {
            Some(impact) => total += ingredient.weight * impact,
            None => missing.push(MissingContribution::Unresolved {
                raw_name: ingredient.raw_name.clone(),
                food_class_id,
            }),
        }
    }

    if missing.is_empty() {
        Ok(total)
    } else {
        Err(UndefinedRecipeImpact {
            recipe_id: recipe.id,
            name: recipe.name.clone(),
            missing,
        })
    }
}
