use std::collections::BTreeMap;

use super::{ImpactStore, RecipeRecord, StoreError, StoreResult, StoreWriter};
use crate::types::{FoodClassId, FoodClassNode, RecipeId, RecipeIngredient};

#[derive(Debug, Clone, Default, PartialEq)]
struct Tables {
    food_classes: BTreeMap<FoodClassId, FoodClassNode>,
    recipes: BTreeMap<RecipeId, RecipeRecord>,
    ingredients: Vec<RecipeIngredient>,
}

impl StoreWriter for Tables {
    fn clear(&mut self) -> StoreResult<()> {
        *self = Tables::default();
        Ok(())
    }

    fn insert_food_classes(&mut self, nodes: &[FoodClassNode]) -> StoreResult<()> {
        for node in nodes {
            if self.food_classes.contains_key(&node.id) {
                return Err(StoreError::DuplicateKey {
                    table: "food_classes",
                    key: node.id,
                });
            }
            // Parent ids are kept as given; dangling parents are reported by the resolver.
            self.food_classes.insert(node.id, node.clone());
        }
        Ok(())
    }

    fn insert_recipes(&mut self, recipes: &[RecipeRecord]) -> StoreResult<()> {
        for recipe in recipes {
            if self.recipes.contains_key(&recipe.id) {
                return Err(StoreError::DuplicateKey {
                    table: "recipes",
                    key: recipe.id,
                });
            }
            self.recipes.insert(recipe.id, recipe.clone());
        }
        Ok(())
    }

    fn insert_ingredients(&mut self, ingredients: &[RecipeIngredient]) -> StoreResult<()> {
        for ingredient in ingredients {
            if !self.recipes.contains_key(&ingredient.recipe_id) {
                return Err(StoreError::ForeignKey {
                    table: "recipe_ingredients",
                    column: "recipe_id",
                    key: ingredient.recipe_id,
                });
            }
            if let Some(food_class_id) = ingredient.matched_food_class_id {
                if !self.food_classes.contains_key(&food_class_id) {
                    return Err(StoreError::ForeignKey {
                        table: "recipe_ingredients",
                        column: "food_class_id",
                        key: food_class_id,
                    });
                }
            }
            self.ingredients.push(ingredient.clone());
        }
        Ok(())
    }
}

/// In-memory [`ImpactStore`].
///
/// Transactions stage writes on a copy of the tables and swap it in on success.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Tables,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ingredient_count(&self) -> usize {
        self.tables.ingredients.len()
    }
}

impl ImpactStore for MemoryStore {
    fn food_classes(&self) -> Vec<FoodClassNode> {
        self.tables.food_classes.values().cloned().collect()
    }

    fn food_class(&self, id: FoodClassId) -> Option<FoodClassNode> {
        self.tables.food_classes.get(&id).cloned()
    }

    fn children_of(&self, id: FoodClassId) -> Vec<FoodClassNode> {
        self.tables
            .food_classes
            .values()
            .filter(|n| n.parent_id == Some(id))
            .cloned()
            .collect()
    }

    fn recipes(&self) -> Vec<RecipeRecord> {
        self.tables.recipes.values().cloned().collect()
    }

    fn ingredients_of(&self, recipe_id: RecipeId) -> Vec<RecipeIngredient> {
        self.tables
            .ingredients
            .iter()
            .filter(|i| i.recipe_id == recipe_id)
            .cloned()
            .collect()
    }

    fn transaction<T, F>(&mut self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&mut dyn StoreWriter) -> StoreResult<T>,
    {
        let mut staged = self.tables.clone();
        let out = f(&mut staged)?;
        self.tables = staged;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryStore;
    use crate::store::{ImpactStore, RecipeRecord, StoreError};
    use crate::types::{FoodClassNode, RecipeIngredient};

    fn seeded() -> MemoryStore {
        let mut store = MemoryStore::new();
        store
            .transaction(|tx| {
                tx.insert_food_classes(&[
                    FoodClassNode::new(2, "Milk", None, Some(1)),
                    FoodClassNode::new(1, "Dairy", Some(3.0), None),
                    FoodClassNode::new(3, "Cheese", None, Some(1)),
                ])?;
                tx.insert_recipes(&[RecipeRecord {
                    id: 10,
                    name: "Toastie".to_string(),
                }])?;
                tx.insert_ingredients(&[RecipeIngredient::new(10, "cheddar", 0.1).matched(3)])
            })
            .unwrap();
        store
    }

    #[test]
    fn queries_are_ordered_by_id() {
        let store = seeded();
        let ids: Vec<i64> = store.food_classes().iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        let children: Vec<i64> = store.children_of(1).iter().map(|n| n.id).collect();
        assert_eq!(children, vec![2, 3]);
        assert!(store.children_of(2).is_empty());

        assert_eq!(store.food_class(2).map(|n| n.name), Some("Milk".to_string()));
        assert_eq!(store.ingredients_of(10).len(), 1);
        assert!(store.ingredients_of(11).is_empty());
    }

    #[test]
    fn failed_transaction_leaves_prior_state() {
        let mut store = seeded();
        let before = store.food_classes();

        let err = store
            .transaction(|tx| {
                tx.clear()?;
                tx.insert_food_classes(&[FoodClassNode::new(5, "Eggs", Some(4.5), None)])?;
                tx.insert_food_classes(&[FoodClassNode::new(5, "Eggs again", None, None)])
            })
            .unwrap_err();

        assert_eq!(
            err,
            StoreError::DuplicateKey {
                table: "food_classes",
                key: 5
            }
        );
        assert_eq!(store.food_classes(), before);
        assert_eq!(store.recipes().len(), 1);
        assert_eq!(store.ingredient_count(), 1);
    }

    #[test]
    fn ingredient_references_are_checked() {
        let mut store = seeded();
        let err = store
            .transaction(|tx| tx.insert_ingredients(&[RecipeIngredient::new(99, "x", 1.0)]))
            .unwrap_err();
        assert!(matches!(err, StoreError::ForeignKey { column: "recipe_id", key: 99, .. }));

        let err = store
            .transaction(|tx| tx.insert_ingredients(&[RecipeIngredient::new(10, "x", 1.0).matched(42)]))
            .unwrap_err();
        assert!(matches!(err, StoreError::ForeignKey { column: "food_class_id", key: 42, .. }));
        assert_eq!(store.ingredient_count(), 1);
    }

    #[test]
    fn dangling_parent_is_stored() {
        let mut store = MemoryStore::new();
        store
            .transaction(|tx| tx.insert_food_classes(&[FoodClassNode::new(1, "Orphan", None, Some(404))]))
            .unwrap();
        assert_eq!(store.food_class(1).and_then(|n| n.parent_id), Some(404));
    }
}
