//! Cycle detection for holdings graphs.
//!
//! A fund that (directly or indirectly) holds itself has no well-defined
//! weight, so every graph goes through [`validate`] before resolution.
//!
//! # Algorithm
//!
//! Iterative depth-first search with an explicit stack and a three-colour
//! marking (unvisited, in progress, done). Searches start from every fund in
//! discovery order. Reaching an in-progress fund means the current DFS path
//! loops back onto itself; that segment of the path is the reported cycle.
//!
//! Funds are marked done in post-order, children before parents, which is
//! exactly the reverse topological order the resolver consumes.

use petgraph::graph::NodeIndex;

use crate::error::{WeightError, WeightResult};
use crate::graph::HoldingsGraph;
use crate::types::FundId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Colour {
    Unvisited,
    InProgress,
    Done,
}

/// Funds of a validated graph, children before parents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopologicalOrder {
    nodes: Vec<NodeIndex>,
}

impl TopologicalOrder {
    /// Fund identifiers in order, children before parents.
    pub fn funds<'g>(&self, graph: &'g HoldingsGraph) -> Vec<&'g FundId> {
        self.nodes.iter().map(|&n| graph.fund_at(n)).collect()
    }

    /// Number of funds in the order.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the order is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn nodes(&self) -> &[NodeIndex] {
        &self.nodes
    }
}

/// A DFS frame: the fund, its children, and the next child to visit.
type Frame = (NodeIndex, Vec<NodeIndex>, usize);

/// Checks that the holdings graph is acyclic.
///
/// Returns the reverse topological order on success, or
/// [`WeightError::Cycle`] with the funds along the first cycle found. The
/// cycle path starts and ends with the same fund (`[A, B, C, A]`; a
/// self-holding is `[A, A]`).
pub fn validate(graph: &HoldingsGraph) -> WeightResult<TopologicalOrder> {
    let mut colour = vec![Colour::Unvisited; graph.fund_count()];
    let mut post_order = Vec::with_capacity(graph.fund_count());
    let mut stack: Vec<Frame> = Vec::new();

    for start in graph.node_indices() {
        if colour[start.index()] != Colour::Unvisited {
            continue;
        }
        colour[start.index()] = Colour::InProgress;
        stack.push((start, child_nodes(graph, start), 0));

        while let Some((node, children, next)) = stack.last_mut() {
            let node = *node;
            if *next >= children.len() {
                colour[node.index()] = Colour::Done;
                post_order.push(node);
                stack.pop();
                continue;
            }

            let child = children[*next];
            *next += 1;

            match colour[child.index()] {
                Colour::Unvisited => {
                    colour[child.index()] = Colour::InProgress;
                    stack.push((child, child_nodes(graph, child), 0));
                }
                Colour::InProgress => {
                    let path = cycle_path(graph, &stack, child);
                    tracing::debug!(length = path.len() - 1, "Cycle detected");
                    return Err(WeightError::cycle(path));
                }
                Colour::Done => {}
            }
        }
    }

    tracing::trace!(funds = post_order.len(), "Holdings graph is acyclic");
    Ok(TopologicalOrder { nodes: post_order })
}

fn child_nodes(graph: &HoldingsGraph, node: NodeIndex) -> Vec<NodeIndex> {
    graph.outgoing(node).into_iter().map(|(c, _)| c).collect()
}

/// The DFS path from `closing` to the top of the stack, closed by `closing` again.
fn cycle_path(graph: &HoldingsGraph, stack: &[Frame], closing: NodeIndex) -> Vec<FundId> {
    let start = stack
        .iter()
        .position(|(n, _, _)| *n == closing)
        .unwrap_or(0);
    stack[start..]
        .iter()
        .map(|(n, _, _)| graph.fund_at(*n).clone())
        .chain(std::iter::once(graph.fund_at(closing).clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Holding;

    fn graph(edges: &[(&str, &str)]) -> HoldingsGraph {
        HoldingsGraph::from_holdings(edges.iter().map(|&(p, c)| Holding::new(p, c, 1.0))).unwrap()
    }

    fn path(err: WeightError) -> Vec<String> {
        err.cycle_path()
            .expect("cycle error")
            .iter()
            .map(|f| f.to_string())
            .collect()
    }

    #[test]
    fn test_acyclic_order_puts_children_first() {
        let g = graph(&[("A", "B"), ("A", "C"), ("B", "D"), ("C", "D")]);
        let order = validate(&g).unwrap();
        let funds: Vec<&str> = order.funds(&g).into_iter().map(FundId::as_str).collect();
        assert_eq!(funds, vec!["D", "B", "C", "A"]);
        assert_eq!(order.len(), 4);
    }

    #[test]
    fn test_self_loop() {
        let g = graph(&[("A", "A")]);
        assert_eq!(path(validate(&g).unwrap_err()), vec!["A", "A"]);
    }

    #[test]
    fn test_three_node_cycle() {
        let g = graph(&[("A", "B"), ("B", "C"), ("C", "A")]);
        assert_eq!(path(validate(&g).unwrap_err()), vec!["A", "B", "C", "A"]);
    }

    #[test]
    fn test_cycle_below_root_reports_only_the_loop() {
        // B -> D -> B under root A
        let g = graph(&[("A", "B"), ("A", "C"), ("B", "D"), ("B", "E"), ("D", "B")]);
        assert_eq!(path(validate(&g).unwrap_err()), vec!["B", "D", "B"]);
    }

    #[test]
    fn test_cycle_without_roots() {
        let g = graph(&[("A", "B"), ("C", "A"), ("B", "C")]);
        assert!(g.roots().is_empty());
        assert_eq!(path(validate(&g).unwrap_err()), vec!["A", "B", "C", "A"]);
    }

    #[test]
    fn test_empty_graph() {
        let order = validate(&HoldingsGraph::new()).unwrap();
        assert!(order.is_empty());
    }

    #[test]
    fn test_deep_chain_does_not_recurse() {
        let names: Vec<String> = (0..50_000).map(|i| format!("F{i}")).collect();
        let g = HoldingsGraph::from_holdings(
            names
                .windows(2)
                .map(|w| Holding::new(w[0].as_str(), w[1].as_str(), 1.0)),
        )
        .unwrap();
        assert_eq!(validate(&g).unwrap().len(), 50_000);
    }
}
