//! Per-item failures.
//!
//! None of these stop a run. The resolver, matcher and aggregator return them as data and the
//! orchestrator forwards them to the configured
//! [`IngestionObserver`](crate::ingestion::IngestionObserver).

use thiserror::Error;

use crate::ingestion::IngestionSeverity;
use crate::types::{FoodClassId, RecipeId};

/// Why a food class ended without an impact.
///
/// The reason is the root cause found at the end of the walk. Every node on the same chain
/// shares it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnresolvedReason {
    /// The chain reached a root that has no impact.
    #[error("root food class {root} has no impact")]
    NoParent { root: FoodClassId },

    /// A node in the chain references a parent id that does not exist.
    #[error("food class {child} references parent {parent_id}, which does not exist")]
    MissingParent {
        child: FoodClassId,
        parent_id: FoodClassId,
    },

    /// The walk revisited a node.
    #[error("parent chain loops back to food class {revisited}")]
    Cycle { revisited: FoodClassId },
}

/// A food class whose ancestor chain yields no known impact.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("could not calculate impact for '{name}' ({food_class_id}): {reason}")]
pub struct UnresolvedImpact {
    pub food_class_id: FoodClassId,
    pub name: String,
    pub reason: UnresolvedReason,
}

/// An ingredient whose text matched no food class name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("could not find matching food class for '{raw_name}' in recipe {recipe_id}")]
pub struct NoMatch {
    pub recipe_id: RecipeId,
    pub raw_name: String,
}

/// An ingredient whose text matched more than one food class.
///
/// `chosen` is the lowest matching id and is the one that was used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "'{raw_name}' in recipe {recipe_id} matches {} food classes; using {chosen}",
    .candidates.len()
)]
pub struct AmbiguousMatch {
    pub recipe_id: RecipeId,
    pub raw_name: String,
    pub chosen: FoodClassId,
    /// All matching ids in ascending order, `chosen` included.
    pub candidates: Vec<FoodClassId>,
}

/// Why an ingredient contributes no defined impact.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MissingContribution {
    #[error("'{raw_name}' is not matched to a food class")]
    Unmatched { raw_name: String },

    #[error("'{raw_name}' matched food class {food_class_id}, which has no resolved impact")]
    Unresolved {
        raw_name: String,
        food_class_id: FoodClassId,
    },
}

/// A recipe with at least one ingredient lacking a resolved impact.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "could not calculate impact for '{name}': {} ingredient(s) could not be identified",
    .missing.len()
)]
pub struct UndefinedRecipeImpact {
    pub recipe_id: RecipeId,
    pub name: String,
    pub missing: Vec<MissingContribution>,
}

/// Any per-item diagnostic produced during a run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    #[error(transparent)]
    UnresolvedImpact(#[from] UnresolvedImpact),
    #[error(transparent)]
    NoMatch(#[from] NoMatch),
    #[error(transparent)]
    AmbiguousMatch(#[from] AmbiguousMatch),
    #[error(transparent)]
    UndefinedRecipeImpact(#[from] UndefinedRecipeImpact),
}

impl Diagnostic {
    pub fn severity(&self) -> IngestionSeverity {
        match self {
            Diagnostic::UnresolvedImpact(_) => IngestionSeverity::Error,
            Diagnostic::NoMatch(_) => IngestionSeverity::Info,
            Diagnostic::AmbiguousMatch(_) => IngestionSeverity::Warning,
            Diagnostic::UndefinedRecipeImpact(_) => IngestionSeverity::Info,
        }
    }
}
