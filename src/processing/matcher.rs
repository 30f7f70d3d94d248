//! Ingredient text to food class matching.
//!
//! The heuristic is word-set containment after [`normalize`]: a food class matches an
//! ingredient when both have the same number of words and every ingredient word occurs
//! (as a substring) somewhere in the food class name. Candidates are always tried in ascending
//! id order, so the first match is reproducible.

use super::normalize::{normalize, words};
use crate::types::{FoodClassId, FoodClassNode};

/// A food class name prepared for matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub id: FoodClassId,
    /// Normalized name.
    pub name: String,
    word_count: usize,
}

impl Candidate {
    /// Normalize `name` and build a candidate.
    pub fn new(id: FoodClassId, name: &str) -> Self {
        let name = normalize(name);
        let word_count = words(&name).count();
        Self {
            id,
            name,
            word_count,
        }
    }

    fn accepts(&self, ingredient_words: &[&str]) -> bool {
        self.word_count == ingredient_words.len()
            && ingredient_words.iter().all(|w| self.name.contains(w))
    }
}

/// Outcome of matching one ingredient against every candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    /// No candidate matched.
    NoMatch,
    /// Exactly one candidate matched.
    Unique(FoodClassId),
    /// Several candidates matched. `chosen` is the lowest id; `candidates` lists all of them
    /// in ascending order.
    Ambiguous {
        chosen: FoodClassId,
        candidates: Vec<FoodClassId>,
    },
}

impl MatchOutcome {
    /// The food class id to use, if any.
    pub fn food_class_id(&self) -> Option<FoodClassId> {
        match self {
            MatchOutcome::NoMatch => None,
            MatchOutcome::Unique(id) => Some(*id),
            MatchOutcome::Ambiguous { chosen, .. } => Some(*chosen),
        }
    }
}

/// Matches free-text ingredient names against a fixed set of food class names.
#[derive(Debug, Clone, Default)]
pub struct FoodClassMatcher {
    candidates: Vec<Candidate>,
}

impl FoodClassMatcher {
    /// Build a matcher from `(id, name)` pairs. Names are normalized here.
    pub fn new<'a>(names: impl IntoIterator<Item = (FoodClassId, &'a str)>) -> Self {
        Self::from_candidates(names.into_iter().map(|(id, name)| Candidate::new(id, name)))
    }

    /// Build a matcher from food class nodes.
    pub fn from_nodes<'a>(nodes: impl IntoIterator<Item = &'a FoodClassNode>) -> Self {
        Self::new(nodes.into_iter().map(|n| (n.id, n.name.as_str())))
    }

    /// Build a matcher from already prepared candidates.
    pub fn from_candidates(candidates: impl IntoIterator<Item = Candidate>) -> Self {
        let mut candidates: Vec<Candidate> = candidates.into_iter().collect();
        // Stable, so candidates sharing an id keep input order.
        candidates.sort_by_key(|c| c.id);
        Self { candidates }
    }

    /// First matching food class id in ascending id order, or `None`.
    ///
    /// ```rust
    /// use recipe_impact::processing::FoodClassMatcher;
    ///
    /// let matcher = FoodClassMatcher::new([(1, "Dairy milk"), (2, "Milk")]);
    /// assert_eq!(matcher.find("Milk!"), Some(2));
    /// assert_eq!(matcher.find("Oat milk"), None);
    /// ```
    pub fn find(&self, raw_ingredient_name: &str) -> Option<FoodClassId> {
        let normalized = normalize(raw_ingredient_name);
        let ingredient_words: Vec<&str> = words(&normalized).collect();
        if ingredient_words.is_empty() {
            return None;
        }
        self.candidates
            .iter()
            .find(|c| c.accepts(&ingredient_words))
            .map(|c| c.id)
    }

    /// Like [`Self::find`], but reports every matching candidate.
    pub fn classify(&self, raw_ingredient_name: &str) -> MatchOutcome {
        let normalized = normalize(raw_ingredient_name);
        let ingredient_words: Vec<&str> = words(&normalized).collect();
        if ingredient_words.is_empty() {
            return MatchOutcome::NoMatch;
        }

        let mut matched: Vec<FoodClassId> = self
            .candidates
            .iter()
            .filter(|c| c.accepts(&ingredient_words))
            .map(|c| c.id)
            .collect();
        matched.dedup();

        match matched.len() {
            0 => MatchOutcome::NoMatch,
            1 => MatchOutcome::Unique(matched[0]),
            _ => MatchOutcome::Ambiguous {
                chosen: matched[0],
                candidates: matched,
            },
        }
    }
}

/// Match one ingredient name against `(id, normalized name)` candidates.
///
/// Convenience wrapper around [`FoodClassMatcher::find`] for one-off lookups.
pub fn match_ingredient<'a>(
    raw_ingredient_name: &str,
    candidates: impl IntoIterator<Item = (FoodClassId, &'a str)>,
) -> Option<FoodClassId> {
    FoodClassMatcher::new(candidates).find(raw_ingredient_name)
}

#[cfg(test)]
mod tests {
    use super::{match_ingredient, FoodClassMatcher, MatchOutcome};

    #[test]
    fn word_count_must_agree() {
        let m = FoodClassMatcher::new([(1, "dairy milk"), (2, "milk")]);
        assert_eq!(m.find("Milk!"), Some(2));
        assert_eq!(m.classify("Milk!"), MatchOutcome::Unique(2));
    }

    #[test]
    fn word_order_does_not_matter() {
        let m = FoodClassMatcher::new([(5, "Milk, whole")]);
        assert_eq!(m.find("whole milk"), Some(5));
    }

    #[test]
    fn ingredient_words_match_as_substrings() {
        // "tomato" occurs inside "tomatoes".
        let m = FoodClassMatcher::new([(3, "Tinned tomatoes")]);
        assert_eq!(m.find("tinned tomato"), Some(3));
        assert_eq!(m.find("tomato"), None);
    }

    #[test]
    fn first_match_follows_ascending_id_not_input_order() {
        let m = FoodClassMatcher::new([(9, "soft cheese"), (4, "cheese soft"), (6, "hard cheese")]);
        assert_eq!(m.find("soft cheese"), Some(4));
        assert_eq!(
            m.classify("Soft Cheese"),
            MatchOutcome::Ambiguous {
                chosen: 4,
                candidates: vec![4, 9],
            }
        );
        assert_eq!(m.classify("soft cheese").food_class_id(), Some(4));
    }

    #[test]
    fn empty_or_punctuation_only_never_matches() {
        let m = FoodClassMatcher::new([(1, "")]);
        assert_eq!(m.find(""), None);
        assert_eq!(m.find("!!"), None);
        assert_eq!(m.classify("  "), MatchOutcome::NoMatch);
    }

    #[test]
    fn unknown_ingredient_is_no_match() {
        assert_eq!(match_ingredient("unicorn steak", [(1, "beef steak"), (2, "pork")]), None);
    }

    #[test]
    fn repeated_runs_agree() {
        let names = [(20, "red onion"), (10, "onion red"), (30, "white onion")];
        let first = match_ingredient("Red Onion", names);
        for _ in 0..10 {
            assert_eq!(match_ingredient("Red Onion", names), first);
        }
        assert_eq!(first, Some(10));
    }
}
