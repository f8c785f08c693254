//! Holdings graph.
//!
//! Funds are nodes and holdings are directed edges from the holding fund to
//! the held fund. Node insertion order is the order in which funds were first
//! seen, and edge insertion order is the input order; both are preserved so
//! that every traversal of the graph is deterministic.

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use crate::error::{WeightError, WeightResult};
use crate::types::{FundId, Holding};

/// In-memory graph of funds and their holdings.
#[derive(Debug, Clone, Default)]
pub struct HoldingsGraph {
    graph: DiGraph<FundId, Holding>,
    index: HashMap<FundId, NodeIndex>,
}

impl HoldingsGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from a sequence of holdings, stopping at the first invalid one.
    pub fn from_holdings<I>(holdings: I) -> WeightResult<Self>
    where
        I: IntoIterator<Item = Holding>,
    {
        let mut graph = Self::new();
        for holding in holdings {
            graph.add_holding(holding)?;
        }
        Ok(graph)
    }

    /// Registers a fund without any holdings. Registering a known fund is a no-op.
    pub fn add_fund(&mut self, id: impl Into<FundId>) -> WeightResult<()> {
        let id = id.into();
        if id.is_blank() {
            return Err(WeightError::EmptyIdentifier);
        }
        self.ensure_node(id);
        Ok(())
    }

    /// Adds `parent` holding `book_value` of `child`.
    pub fn add_edge(
        &mut self,
        parent: impl Into<FundId>,
        child: impl Into<FundId>,
        book_value: f64,
        market_value: Option<f64>,
    ) -> WeightResult<()> {
        let mut holding = Holding::new(parent, child, book_value);
        holding.market_value = market_value;
        self.add_holding(holding)
    }

    /// Adds a holding edge.
    ///
    /// Fails on blank fund labels, non-finite values, or a second holding for
    /// the same parent/child pair. A failed insert leaves the graph unchanged.
    pub fn add_holding(&mut self, holding: Holding) -> WeightResult<()> {
        if holding.parent.is_blank() || holding.child.is_blank() {
            return Err(WeightError::EmptyIdentifier);
        }
        if !holding.book_value.is_finite() {
            return Err(WeightError::invalid_value(
                &holding.parent,
                &holding.child,
                "book_value",
                holding.book_value,
            ));
        }
        if let Some(mv) = holding.market_value.filter(|mv| !mv.is_finite()) {
            return Err(WeightError::invalid_value(
                &holding.parent,
                &holding.child,
                "market_value",
                mv,
            ));
        }
        if let (Some(&p), Some(&c)) = (
            self.index.get(&holding.parent),
            self.index.get(&holding.child),
        ) {
            if self.graph.find_edge(p, c).is_some() {
                return Err(WeightError::duplicate_edge(holding.parent, holding.child));
            }
        }

        let p = self.ensure_node(holding.parent.clone());
        let c = self.ensure_node(holding.child.clone());
        self.graph.add_edge(p, c, holding);
        Ok(())
    }

    /// Holdings of `fund` in insertion order. Empty for base or unknown funds.
    pub fn children_of(&self, fund: &FundId) -> Vec<&Holding> {
        match self.index.get(fund) {
            Some(&node) => self.outgoing(node).into_iter().map(|(_, h)| h).collect(),
            None => Vec::new(),
        }
    }

    /// Funds that no other fund holds, in discovery order.
    pub fn roots(&self) -> Vec<&FundId> {
        self.graph
            .node_indices()
            .filter(|&n| self.is_root_node(n))
            .map(|n| &self.graph[n])
            .collect()
    }

    /// Funds that hold nothing, in discovery order.
    pub fn bases(&self) -> Vec<&FundId> {
        self.graph
            .node_indices()
            .filter(|&n| self.is_base_node(n))
            .map(|n| &self.graph[n])
            .collect()
    }

    /// All funds in discovery order.
    pub fn funds(&self) -> Vec<&FundId> {
        self.graph.node_weights().collect()
    }

    /// All holdings in insertion order.
    pub fn holdings(&self) -> impl Iterator<Item = &Holding> {
        self.graph.edge_weights()
    }

    /// Looks up the holding of `child` in `parent`.
    pub fn holding(&self, parent: &FundId, child: &FundId) -> Option<&Holding> {
        let p = *self.index.get(parent)?;
        let c = *self.index.get(child)?;
        self.graph
            .find_edge(p, c)
            .and_then(|e| self.graph.edge_weight(e))
    }

    /// Sets the market value of an existing holding.
    ///
    /// Returns `Ok(false)` if no such holding exists.
    pub fn set_market_value(
        &mut self,
        parent: &FundId,
        child: &FundId,
        market_value: f64,
    ) -> WeightResult<bool> {
        if !market_value.is_finite() {
            return Err(WeightError::invalid_value(
                parent,
                child,
                "market_value",
                market_value,
            ));
        }
        let (Some(&p), Some(&c)) = (self.index.get(parent), self.index.get(child)) else {
            return Ok(false);
        };
        match self.graph.find_edge(p, c) {
            Some(edge) => {
                self.graph[edge].market_value = Some(market_value);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Returns true if the fund is known to the graph.
    pub fn contains(&self, fund: &FundId) -> bool {
        self.index.contains_key(fund)
    }

    /// Number of funds.
    pub fn fund_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of holdings.
    pub fn holding_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns true if the graph has no funds.
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Returns true if there is at least one holding and every holding has a market value.
    pub fn has_market_values(&self) -> bool {
        self.graph.edge_count() > 0
            && self.graph.edge_weights().all(|h| h.market_value.is_some())
    }

    // -------------------------------------------------------------------------
    // Index-level access for the detector and resolver
    // -------------------------------------------------------------------------

    pub(crate) fn node_indices(&self) -> impl Iterator<Item = NodeIndex> {
        self.graph.node_indices()
    }

    pub(crate) fn fund_at(&self, node: NodeIndex) -> &FundId {
        &self.graph[node]
    }

    pub(crate) fn index_of(&self, fund: &FundId) -> Option<NodeIndex> {
        self.index.get(fund).copied()
    }

    /// Outgoing holdings of `node` with their target nodes, in insertion order.
    pub(crate) fn outgoing(&self, node: NodeIndex) -> Vec<(NodeIndex, &Holding)> {
        let mut edges: Vec<_> = self
            .graph
            .edges_directed(node, Direction::Outgoing)
            .collect();
        // petgraph walks outgoing edges newest first
        edges.sort_by_key(|e| e.id());
        edges
            .into_iter()
            .map(|e| (e.target(), e.weight()))
            .collect()
    }

    pub(crate) fn is_root_node(&self, node: NodeIndex) -> bool {
        self.graph
            .neighbors_directed(node, Direction::Incoming)
            .next()
            .is_none()
    }

    pub(crate) fn is_base_node(&self, node: NodeIndex) -> bool {
        self.graph
            .neighbors_directed(node, Direction::Outgoing)
            .next()
            .is_none()
    }

    fn ensure_node(&mut self, id: FundId) -> NodeIndex {
        if let Some(&node) = self.index.get(&id) {
            return node;
        }
        let node = self.graph.add_node(id.clone());
        self.index.insert(id, node);
        node
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(funds: Vec<&FundId>) -> Vec<&str> {
        funds.into_iter().map(FundId::as_str).collect()
    }

    fn assignment_graph() -> HoldingsGraph {
        HoldingsGraph::from_holdings([
            Holding::new("A", "B", 1000.0),
            Holding::new("A", "C", 2000.0),
            Holding::new("B", "D", 500.0),
            Holding::new("B", "E", 250.0),
            Holding::new("B", "F", 250.0),
            Holding::new("C", "G", 1000.0),
            Holding::new("C", "H", 1000.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_roots_and_bases() {
        let graph = assignment_graph();
        assert_eq!(ids(graph.roots()), vec!["A"]);
        assert_eq!(ids(graph.bases()), vec!["D", "E", "F", "G", "H"]);
        assert_eq!(
            ids(graph.funds()),
            vec!["A", "B", "C", "D", "E", "F", "G", "H"]
        );
        assert_eq!(graph.fund_count(), 8);
        assert_eq!(graph.holding_count(), 7);
    }

    #[test]
    fn test_children_in_insertion_order() {
        let graph = assignment_graph();
        let children: Vec<&str> = graph
            .children_of(&"B".into())
            .iter()
            .map(|h| h.child.as_str())
            .collect();
        assert_eq!(children, vec!["D", "E", "F"]);
        assert!(graph.children_of(&"D".into()).is_empty());
        assert!(graph.children_of(&"Z".into()).is_empty());
    }

    #[test]
    fn test_duplicate_edge_rejected() {
        let mut graph = assignment_graph();
        let err = graph.add_edge("B", "E", 500.0, None).unwrap_err();
        assert_eq!(err, WeightError::duplicate_edge("B", "E"));
        assert_eq!(graph.holding_count(), 7);
        assert_eq!(graph.holding(&"B".into(), &"E".into()).unwrap().book_value, 250.0);
    }

    #[test]
    fn test_reverse_pair_is_not_duplicate() {
        let mut graph = HoldingsGraph::new();
        graph.add_edge("A", "B", 1.0, None).unwrap();
        assert!(graph.add_edge("B", "A", 1.0, None).is_ok());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut graph = HoldingsGraph::new();
        assert!(matches!(
            graph.add_edge("A", "B", f64::NAN, None),
            Err(WeightError::InvalidValue { field: "book_value", .. })
        ));
        assert!(matches!(
            graph.add_edge("A", "B", 1.0, Some(f64::INFINITY)),
            Err(WeightError::InvalidValue { field: "market_value", .. })
        ));
        assert_eq!(
            graph.add_edge("", "B", 1.0, None),
            Err(WeightError::EmptyIdentifier)
        );
        assert!(graph.is_empty());
    }

    #[test]
    fn test_isolated_fund_is_root_and_base() {
        let mut graph = HoldingsGraph::new();
        graph.add_fund("CASH").unwrap();
        graph.add_fund("CASH").unwrap();
        assert_eq!(graph.fund_count(), 1);
        assert_eq!(ids(graph.roots()), vec!["CASH"]);
        assert_eq!(ids(graph.bases()), vec!["CASH"]);
        assert_eq!(graph.add_fund(" "), Err(WeightError::EmptyIdentifier));
    }

    #[test]
    fn test_market_values() {
        let mut graph = HoldingsGraph::new();
        assert!(!graph.has_market_values());
        graph.add_edge("A", "B", 100.0, Some(110.0)).unwrap();
        assert!(graph.has_market_values());
        graph.add_edge("A", "C", 100.0, None).unwrap();
        assert!(!graph.has_market_values());

        assert!(graph.set_market_value(&"A".into(), &"C".into(), 90.0).unwrap());
        assert!(graph.has_market_values());
        assert!(!graph.set_market_value(&"C".into(), &"A".into(), 90.0).unwrap());
        assert!(!graph.set_market_value(&"X".into(), &"A".into(), 90.0).unwrap());
        assert!(graph.set_market_value(&"A".into(), &"C".into(), f64::NAN).is_err());
    }

    #[test]
    fn test_self_loop_is_neither_root_nor_base() {
        let mut graph = HoldingsGraph::new();
        graph.add_edge("A", "A", 1.0, None).unwrap();
        assert!(graph.roots().is_empty());
        assert!(graph.bases().is_empty());
    }
}
