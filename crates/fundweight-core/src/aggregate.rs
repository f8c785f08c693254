//! Deterministic ordering of resolved records.
//!
//! Records are ordered by the discovery position of their root fund, then of
//! their base fund, so the same input always produces the same output
//! sequence regardless of how the resolver visited the graph.

use crate::graph::HoldingsGraph;
use crate::types::{FundId, WeightRecord};

/// Orders `records` by root, then base, in the graph's discovery order.
///
/// Funds unknown to the graph sort last, keeping their relative order.
pub fn order_records(graph: &HoldingsGraph, mut records: Vec<WeightRecord>) -> Vec<WeightRecord> {
    let position = |fund: &FundId| {
        graph
            .index_of(fund)
            .map_or(usize::MAX, |node| node.index())
    };
    records.sort_by_key(|r| (position(&r.root), position(&r.base)));
    records
}

/// Sum of the weights of all records of `root`.
///
/// For a resolved acyclic graph this is 1.0 within floating-point tolerance.
pub fn total_weight(records: &[WeightRecord], root: &FundId) -> f64 {
    records
        .iter()
        .filter(|r| &r.root == root)
        .map(|r| r.weight)
        .sum()
}

/// Sum of the weighted returns of all records of `root`.
///
/// This is the look-through return of the root. `None` if any record lacks a
/// return or the root has no records.
pub fn total_return(records: &[WeightRecord], root: &FundId) -> Option<f64> {
    let mut iter = records.iter().filter(|r| &r.root == root).peekable();
    iter.peek()?;
    iter.map(|r| r.weighted_return).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Holding;
    use approx::assert_relative_eq;

    fn graph() -> HoldingsGraph {
        HoldingsGraph::from_holdings([
            Holding::new("A", "C", 1.0),
            Holding::new("B", "D", 1.0),
            Holding::new("A", "D", 1.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_orders_by_discovery_not_label() {
        let records = vec![
            WeightRecord::new("B", "D", 1.0, None),
            WeightRecord::new("A", "D", 0.5, None),
            WeightRecord::new("A", "C", 0.5, None),
        ];
        let ordered = order_records(&graph(), records);
        let pairs: Vec<(&str, &str)> = ordered
            .iter()
            .map(|r| (r.root.as_str(), r.base.as_str()))
            .collect();
        assert_eq!(pairs, vec![("A", "C"), ("A", "D"), ("B", "D")]);
    }

    #[test]
    fn test_unknown_funds_sort_last() {
        let records = vec![
            WeightRecord::new("Z", "Y", 1.0, None),
            WeightRecord::new("B", "D", 1.0, None),
        ];
        let ordered = order_records(&graph(), records);
        assert_eq!(ordered[0].root.as_str(), "B");
        assert_eq!(ordered[1].root.as_str(), "Z");
    }

    #[test]
    fn test_totals() {
        let records = vec![
            WeightRecord::new("A", "C", 0.25, Some(0.01)),
            WeightRecord::new("A", "D", 0.75, Some(0.02)),
            WeightRecord::new("B", "D", 1.0, None),
        ];
        assert_relative_eq!(total_weight(&records, &"A".into()), 1.0);
        assert_relative_eq!(total_return(&records, &"A".into()).unwrap(), 0.03);
        assert!(total_return(&records, &"B".into()).is_none());
        assert!(total_return(&records, &"Q".into()).is_none());
        assert_eq!(total_weight(&records, &"Q".into()), 0.0);
    }
}
