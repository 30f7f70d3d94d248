//! Storage collaborator.
//!
//! The engine produces pure data; persisting it is the store's job. Writes happen only
//! inside [`ImpactStore::transaction`], which either commits every staged write or none of them.
//!
//! [`MemoryStore`] is the bundled implementation. It enforces the same key constraints a
//! relational backend would.

mod memory;

use thiserror::Error;

use crate::types::{FoodClassId, FoodClassNode, Recipe, RecipeId, RecipeIngredient};

pub use memory::MemoryStore;

/// Convenience result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// A write rejected by the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A row with this primary key already exists.
    #[error("duplicate key {key} in table '{table}'")]
    DuplicateKey { table: &'static str, key: i64 },

    /// A reference points at a row that does not exist.
    #[error("foreign key violation in table '{table}': {column}={key} does not exist")]
    ForeignKey {
        table: &'static str,
        column: &'static str,
        key: i64,
    },
}

/// Stored recipe header. Ingredients are queried separately via
/// [`ImpactStore::ingredients_of`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeRecord {
    pub id: RecipeId,
    pub name: String,
}

impl From<&Recipe> for RecipeRecord {
    fn from(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name.clone(),
        }
    }
}

/// Write operations available inside a transaction.
pub trait StoreWriter {
    /// Remove every food class, recipe and ingredient.
    fn clear(&mut self) -> StoreResult<()>;

    fn insert_food_classes(&mut self, nodes: &[FoodClassNode]) -> StoreResult<()>;

    fn insert_recipes(&mut self, recipes: &[RecipeRecord]) -> StoreResult<()>;

    fn insert_ingredients(&mut self, ingredients: &[RecipeIngredient]) -> StoreResult<()>;
}

/// Queryable store with scoped, all-or-nothing writes.
pub trait ImpactStore {
    /// All food classes, ordered by id.
    fn food_classes(&self) -> Vec<FoodClassNode>;

    fn food_class(&self, id: FoodClassId) -> Option<FoodClassNode>;

    /// Direct children of `id`, ordered by id.
    fn children_of(&self, id: FoodClassId) -> Vec<FoodClassNode>;

    /// All recipes, ordered by id.
    fn recipes(&self) -> Vec<RecipeRecord>;

    /// Ingredients of `recipe_id`, in insertion order.
    fn ingredients_of(&self, recipe_id: RecipeId) -> Vec<RecipeIngredient>;

    /// Run `f` against a staged copy of the store.
    ///
    /// If `f` returns `Ok`, the staged writes are committed. If it returns `Err`, they are
    /// discarded and the store is exactly as it was before the call.
    fn transaction<T, F>(&mut self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&mut dyn StoreWriter) -> StoreResult<T>;
}
