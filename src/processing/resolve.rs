//! Impact inheritance over the food class hierarchy.

use std::collections::{HashMap, HashSet};

use crate::diagnostics::{UnresolvedImpact, UnresolvedReason};
use crate::types::{FoodClassId, FoodClassNode};

/// Result of [`resolve`]: a new node set plus the nodes that could not be resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Input nodes in input order, with `resolved_impact` filled in.
    pub nodes: Vec<FoodClassNode>,
    /// One entry per unresolved node, in input order.
    pub failures: Vec<UnresolvedImpact>,
}

impl Resolution {
    /// Number of nodes that ended without an impact.
    pub fn unresolved_count(&self) -> usize {
        self.failures.len()
    }
}

#[derive(Debug, Clone)]
enum Outcome {
    Resolved(f64),
    Unresolved(UnresolvedReason),
}

/// Compute an effective impact for every node.
///
/// A node with a direct impact keeps it (any value, including zero or negative). Any other node
/// inherits from its nearest ancestor that has one. A walk that reaches a root without an
/// impact, a parent id that does not exist, or a node it already visited leaves the node
/// unresolved.
///
/// Every node on a walked chain is memoized with the walk's outcome, so siblings sharing an
/// ancestor chain do not re-walk it. If ids are duplicated, parent lookups use the first node
/// with that id.
///
/// ```rust
/// use recipe_impact::processing::resolve;
/// use recipe_impact::types::FoodClassNode;
///
/// let nodes = vec![
///     FoodClassNode::new(1, "Dairy", Some(3.2), None),
///     FoodClassNode::new(2, "Milk", None, Some(1)),
///     FoodClassNode::new(3, "Whole milk", None, Some(2)),
/// ];
/// let out = resolve(&nodes);
/// assert_eq!(out.nodes[2].resolved_impact, Some(3.2));
/// assert_eq!(out.unresolved_count(), 0);
/// ```
pub fn resolve(nodes: &[FoodClassNode]) -> Resolution {
    let mut index: HashMap<FoodClassId, usize> = HashMap::with_capacity(nodes.len());
    for (idx, node) in nodes.iter().enumerate() {
        index.entry(node.id).or_insert(idx);
    }

    let mut memo: Vec<Option<Outcome>> = nodes
        .iter()
        .map(|n| n.direct_impact.map(Outcome::Resolved))
        .collect();

    for start in 0..nodes.len() {
        if memo[start].is_some() {
            continue;
        }

        let mut path = vec![start];
        let mut visited = HashSet::from([nodes[start].id]);
        let mut current = start;

        let outcome = loop {
            let node = &nodes[current];
            let Some(parent_id) = node.parent_id else {
                break Outcome::Unresolved(UnresolvedReason::NoParent { root: node.id });
            };
            let Some(&parent) = index.get(&parent_id) else {
                break Outcome::Unresolved(UnresolvedReason::MissingParent {
                    child: node.id,
                    parent_id,
                });
            };
            if let Some(known) = &memo[parent] {
                break known.clone();
            }
            if !visited.insert(parent_id) {
                break Outcome::Unresolved(UnresolvedReason::Cycle {
                    revisited: parent_id,
                });
            }
            path.push(parent);
            current = parent;
        };

        for idx in path {
            memo[idx] = Some(outcome.clone());
        }
    }

    let mut failures = Vec::new();
    let resolved = nodes
        .iter()
        .zip(memo)
        .map(|(node, outcome)| {
            let mut out = node.clone();
            out.resolved_impact = match outcome {
                Some(Outcome::Resolved(impact)) => Some(impact),
                Some(Outcome::Unresolved(reason)) => {
                    failures.push(UnresolvedImpact {
                        food_class_id: node.id,
                        name: node.name.clone(),
                        reason,
                    });
                    None
                }
                // Every slot is written by the loop above.
                None => None,
            };
            out
        })
        .collect();

    Resolution {
        nodes: resolved,
        failures,
    }
}

#[cfg(test)]
mod tests {
    use super::resolve;
    use crate::diagnostics::UnresolvedReason;
    use crate::types::FoodClassNode;

    fn node(id: i64, impact: Option<f64>, parent: Option<i64>) -> FoodClassNode {
        FoodClassNode::new(id, format!("class {id}"), impact, parent)
    }

    fn impacts(nodes: &[FoodClassNode]) -> Vec<Option<f64>> {
        nodes.iter().map(|n| n.resolved_impact).collect()
    }

    #[test]
    fn direct_impact_wins_over_ancestors() {
        let out = resolve(&[node(1, Some(5.0), None), node(2, Some(1.5), Some(1))]);
        assert_eq!(impacts(&out.nodes), vec![Some(5.0), Some(1.5)]);
        assert_eq!(out.unresolved_count(), 0);
    }

    #[test]
    fn inherits_from_nearest_valued_ancestor() {
        // 1 is the root; only 3 carries a value, so 3's descendants inherit it.
        let nodes = vec![
            node(4, None, Some(3)),
            node(5, None, Some(4)),
            node(3, Some(2.5), Some(1)),
            node(1, Some(9.0), None),
        ];
        let out = resolve(&nodes);
        assert_eq!(
            impacts(&out.nodes),
            vec![Some(2.5), Some(2.5), Some(2.5), Some(9.0)]
        );
    }

    #[test]
    fn chain_towards_valued_node_resolves_every_link() {
        // a -> b -> c, where c is the only valued node.
        let nodes = vec![
            node(1, None, Some(2)),
            node(2, None, Some(3)),
            node(3, Some(4.0), None),
        ];
        let out = resolve(&nodes);
        assert_eq!(impacts(&out.nodes), vec![Some(4.0), Some(4.0), Some(4.0)]);
    }

    #[test]
    fn zero_and_negative_direct_impacts_are_accepted() {
        let out = resolve(&[node(1, Some(0.0), None), node(2, None, Some(1)), node(3, Some(-1.0), None)]);
        assert_eq!(impacts(&out.nodes), vec![Some(0.0), Some(0.0), Some(-1.0)]);
        assert_eq!(out.unresolved_count(), 0);
    }

    #[test]
    fn root_without_impact_leaves_descendants_unresolved() {
        let out = resolve(&[node(1, None, None), node(2, None, Some(1))]);
        assert_eq!(impacts(&out.nodes), vec![None, None]);
        assert_eq!(out.unresolved_count(), 2);
        assert!(out
            .failures
            .iter()
            .all(|f| f.reason == UnresolvedReason::NoParent { root: 1 }));
    }

    #[test]
    fn missing_parent_counts_once_per_node() {
        let nodes = vec![node(1, None, Some(42)), node(2, Some(1.0), None), node(3, None, Some(42))];
        let out = resolve(&nodes);
        assert_eq!(out.unresolved_count(), 2);
        assert_eq!(
            out.failures[0].reason,
            UnresolvedReason::MissingParent {
                child: 1,
                parent_id: 42
            }
        );
        assert_eq!(out.failures[1].food_class_id, 3);
    }

    #[test]
    fn two_node_cycle_terminates_unresolved() {
        let out = resolve(&[node(1, None, Some(2)), node(2, None, Some(1))]);
        assert_eq!(impacts(&out.nodes), vec![None, None]);
        assert_eq!(out.unresolved_count(), 2);
        assert_eq!(
            out.failures[0].reason,
            UnresolvedReason::Cycle { revisited: 1 }
        );
    }

    #[test]
    fn self_parent_is_a_cycle() {
        let out = resolve(&[node(7, None, Some(7))]);
        assert_eq!(
            out.failures[0].reason,
            UnresolvedReason::Cycle { revisited: 7 }
        );
    }

    #[test]
    fn node_leading_into_cycle_is_unresolved() {
        let nodes = vec![
            node(10, None, Some(1)),
            node(1, None, Some(2)),
            node(2, None, Some(1)),
            node(3, Some(1.0), None),
        ];
        let out = resolve(&nodes);
        assert_eq!(out.unresolved_count(), 3);
        assert_eq!(out.nodes[3].resolved_impact, Some(1.0));
    }

    #[test]
    fn valued_node_inside_loop_breaks_it() {
        let out = resolve(&[node(1, None, Some(2)), node(2, Some(6.0), Some(1))]);
        assert_eq!(impacts(&out.nodes), vec![Some(6.0), Some(6.0)]);
    }

    #[test]
    fn input_is_left_untouched() {
        let nodes = vec![node(1, Some(2.0), None), node(2, None, Some(1))];
        let before = nodes.clone();
        let _ = resolve(&nodes);
        assert_eq!(nodes, before);
    }

    #[test]
    fn resolving_twice_is_identical() {
        let nodes = vec![
            node(1, Some(2.0), None),
            node(2, None, Some(1)),
            node(3, None, Some(99)),
            node(4, None, Some(5)),
            node(5, None, Some(4)),
        ];
        assert_eq!(resolve(&nodes), resolve(&nodes));
    }

    #[test]
    fn empty_input() {
        let out = resolve(&[]);
        assert!(out.nodes.is_empty());
        assert_eq!(out.unresolved_count(), 0);
    }
}
