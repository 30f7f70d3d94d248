//! Core data model types.
//!
//! Input rows ([`FoodClassRow`], [`RecipeRow`]) are turned into [`FoodClassNode`]s and
//! [`Recipe`]s by the orchestrator. Only two fields change after creation:
//! [`FoodClassNode::resolved_impact`] (written by the resolver) and
//! [`RecipeIngredient::matched_food_class_id`] (written by the matcher).

use std::collections::HashMap;

use serde::Serialize;

/// Externally assigned food class identifier.
pub type FoodClassId = i64;

/// Externally assigned recipe identifier.
pub type RecipeId = i64;

/// One parsed row of the food classes input.
#[derive(Debug, Clone, PartialEq)]
pub struct FoodClassRow {
    pub id: FoodClassId,
    pub name: String,
    /// Impact per kilogram, if the source data carries one.
    pub impact_per_kg: Option<f64>,
    pub parent_id: Option<FoodClassId>,
}

/// One parsed row of the recipes input: a single (recipe, ingredient) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeRow {
    pub recipe_id: RecipeId,
    pub recipe_name: String,
    pub ingredient_name: String,
    pub ingredient_weight_kg: f64,
}

/// A node in the food classification hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoodClassNode {
    pub id: FoodClassId,
    pub name: String,
    /// Impact given explicitly by the source data. `None` means "inherit from an ancestor".
    pub direct_impact: Option<f64>,
    /// `None` means this node is a root.
    pub parent_id: Option<FoodClassId>,
    /// Set by [`crate::processing::resolve()`]. `None` means unresolved.
    pub resolved_impact: Option<f64>,
}

impl FoodClassNode {
    /// Create an unresolved node.
    pub fn new(
        id: FoodClassId,
        name: impl Into<String>,
        direct_impact: Option<f64>,
        parent_id: Option<FoodClassId>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            direct_impact,
            parent_id,
            resolved_impact: None,
        }
    }
}

impl From<FoodClassRow> for FoodClassNode {
    fn from(row: FoodClassRow) -> Self {
        Self::new(row.id, row.name, row.impact_per_kg, row.parent_id)
    }
}

/// A single ingredient line of a recipe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeIngredient {
    pub recipe_id: RecipeId,
    /// Free-text description as supplied by the input.
    pub raw_name: String,
    /// Mass in kilograms.
    pub weight: f64,
    /// Set by the matcher. `None` means unmatched.
    pub matched_food_class_id: Option<FoodClassId>,
}

impl RecipeIngredient {
    /// Create an unmatched ingredient.
    pub fn new(recipe_id: RecipeId, raw_name: impl Into<String>, weight: f64) -> Self {
        Self {
            recipe_id,
            raw_name: raw_name.into(),
            weight,
            matched_food_class_id: None,
        }
    }

    /// Builder-style helper setting the matched food class.
    pub fn matched(mut self, food_class_id: FoodClassId) -> Self {
        self.matched_food_class_id = Some(food_class_id);
        self
    }
}

/// A recipe and its ingredients, in input order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recipe {
    pub id: RecipeId,
    pub name: String,
    pub ingredients: Vec<RecipeIngredient>,
}

impl Recipe {
    pub fn new(id: RecipeId, name: impl Into<String>, ingredients: Vec<RecipeIngredient>) -> Self {
        Self {
            id,
            name: name.into(),
            ingredients,
        }
    }
}

/// Resolved impact lookup, keyed by food class id.
///
/// Only resolved food classes have an entry; a missing key means "no usable impact".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImpactTable {
    impacts: HashMap<FoodClassId, f64>,
}

impl ImpactTable {
    /// Build a table from resolved nodes. Unresolved nodes are skipped.
    pub fn from_nodes<'a>(nodes: impl IntoIterator<Item = &'a FoodClassNode>) -> Self {
        let impacts = nodes
            .into_iter()
            .filter_map(|n| n.resolved_impact.map(|impact| (n.id, impact)))
            .collect();
        Self { impacts }
    }

    /// Resolved impact for `id`, if any.
    pub fn get(&self, id: FoodClassId) -> Option<f64> {
        self.impacts.get(&id).copied()
    }
}

impl FromIterator<(FoodClassId, f64)> for ImpactTable {
    fn from_iter<T: IntoIterator<Item = (FoodClassId, f64)>>(iter: T) -> Self {
        Self {
            impacts: iter.into_iter().collect(),
        }
    }
}

/// Per-recipe output. `total_impact_kg == None` means the total could not be calculated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeImpact {
    pub recipe_id: RecipeId,
    pub name: String,
    pub total_impact_kg: Option<f64>,
}
