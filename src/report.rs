//! Recipe impact reporting.
//!
//! [`calculate_recipe_impacts`] recomputes every recipe total from what the store holds;
//! [`format_recipe_impact`] renders one line of the human-readable report. Rounding happens
//! only here.

use crate::processing::aggregate;
use crate::store::ImpactStore;
use crate::types::{ImpactTable, Recipe, RecipeImpact};

/// Recompute recipe totals from stored food classes and ingredients, ordered by recipe id.
pub fn calculate_recipe_impacts<S: ImpactStore>(store: &S) -> Vec<RecipeImpact> {
    let impacts = ImpactTable::from_nodes(&store.food_classes());
    store
        .recipes()
        .into_iter()
        .map(|record| {
            let recipe = Recipe::new(record.id, record.name, store.ingredients_of(record.id));
            RecipeImpact {
                recipe_id: recipe.id,
                total_impact_kg: aggregate(&recipe, &impacts),
                name: recipe.name,
            }
        })
        .collect()
}

/// `"{name}: {total:.2}kg"`, or `"{name}: cannot calculate"` when the total is undefined.
pub fn format_recipe_impact(impact: &RecipeImpact) -> String {
    match impact.total_impact_kg {
        Some(total) => format!("{}: {:.2}kg", impact.name, total),
        None => format!("{}: cannot calculate", impact.name),
    }
}

#[cfg(test)]
mod tests {
    use super::{calculate_recipe_impacts, format_recipe_impact};
    use crate::store::{ImpactStore, MemoryStore, RecipeRecord};
    use crate::types::{FoodClassNode, RecipeImpact, RecipeIngredient};

    #[test]
    fn formats_two_decimals_or_cannot_calculate() {
        let ok = RecipeImpact {
            recipe_id: 1,
            name: "Chilli".to_string(),
            total_impact_kg: Some(3.14159),
        };
        assert_eq!(format_recipe_impact(&ok), "Chilli: 3.14kg");

        let undefined = RecipeImpact {
            total_impact_kg: None,
            ..ok
        };
        assert_eq!(format_recipe_impact(&undefined), "Chilli: cannot calculate");
    }

    #[test]
    fn recomputes_from_stored_state() {
        let mut resolved = FoodClassNode::new(1, "Beans", Some(0.8), None);
        resolved.resolved_impact = Some(0.8);
        let unresolved = FoodClassNode::new(2, "Spice", None, None);

        let mut store = MemoryStore::new();
        store
            .transaction(|tx| {
                tx.insert_food_classes(&[resolved.clone(), unresolved.clone()])?;
                tx.insert_recipes(&[
                    RecipeRecord {
                        id: 2,
                        name: "Spiced beans".to_string(),
                    },
                    RecipeRecord {
                        id: 1,
                        name: "Beans".to_string(),
                    },
                ])?;
                tx.insert_ingredients(&[
                    RecipeIngredient::new(1, "beans", 0.5).matched(1),
                    RecipeIngredient::new(2, "beans", 0.5).matched(1),
                    RecipeIngredient::new(2, "spice", 0.01).matched(2),
                ])
            })
            .unwrap();

        let out = calculate_recipe_impacts(&store);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].name, "Beans");
        assert_eq!(out[0].total_impact_kg, Some(0.4));
        assert_eq!(out[1].total_impact_kg, None);
    }
}
