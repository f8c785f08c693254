//! Look-through weight resolution.
//!
//! For every fund `f` the resolver computes the decomposition of one unit of
//! `f` into base funds: `base -> (weight, weighted return)`. Funds are visited
//! children first, so a parent's decomposition is the local-weight blend of
//! its children's, already computed. A base fund reached through several
//! children accumulates the sum of all its path weights.
//!
//! Returns follow the same paths. The return of a path is the simple return
//! of its last edge (the holding of the base fund), scaled by the path weight.
//! A single edge without a market value anywhere on a path makes the return
//! of that root/base pair absent.

use std::collections::{BTreeMap, HashMap};

use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::aggregate::order_records;
use crate::cycle::{validate, TopologicalOrder};
use crate::error::{WeightError, WeightResult};
use crate::graph::HoldingsGraph;
use crate::types::{FundId, Holding, RootSummary, WeightRecord};

/// Share of one base fund in one unit of a holding fund.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    /// Aggregate path weight.
    pub weight: f64,
    /// Aggregate path-weighted return, if every path carries market values.
    pub weighted_return: Option<f64>,
}

impl Contribution {
    /// A base fund's decomposition of itself.
    const UNIT: Self = Self {
        weight: 1.0,
        weighted_return: Some(0.0),
    };

    fn merge(&mut self, other: Self) {
        self.weight += other.weight;
        self.weighted_return = match (self.weighted_return, other.weighted_return) {
            (Some(a), Some(b)) => Some(a + b),
            _ => None,
        };
    }
}

/// Relative size below which a fund's book value total counts as zero.
const CANCELLATION_TOLERANCE: f64 = 1e-12;

/// Base fund node -> contribution, ordered by discovery.
type Decomposition = BTreeMap<NodeIndex, Contribution>;

/// Resolved weights of a holdings graph.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "ResolutionData")]
pub struct Resolution {
    records: Vec<WeightRecord>,
    summaries: Vec<RootSummary>,
    /// (root, base) -> position in `records`.
    #[serde(skip)]
    index: HashMap<(FundId, FundId), usize>,
}

#[derive(Deserialize)]
struct ResolutionData {
    records: Vec<WeightRecord>,
    summaries: Vec<RootSummary>,
}

impl From<ResolutionData> for Resolution {
    fn from(data: ResolutionData) -> Self {
        Self::new(data.records, data.summaries)
    }
}

impl Resolution {
    fn new(records: Vec<WeightRecord>, summaries: Vec<RootSummary>) -> Self {
        let index = records
            .iter()
            .enumerate()
            .map(|(i, r)| ((r.root.clone(), r.base.clone()), i))
            .collect();
        Self {
            records,
            summaries,
            index,
        }
    }

    /// All (root, base) records, by root then base discovery order.
    pub fn records(&self) -> &[WeightRecord] {
        &self.records
    }

    /// Consumes the resolution, returning its records.
    pub fn into_records(self) -> Vec<WeightRecord> {
        self.records
    }

    /// Records of a single root.
    pub fn records_for<'a>(&'a self, root: &'a FundId) -> impl Iterator<Item = &'a WeightRecord> {
        self.records.iter().filter(move |r| &r.root == root)
    }

    /// One summary per root, in discovery order.
    pub fn summaries(&self) -> &[RootSummary] {
        &self.summaries
    }

    /// Contribution of `base` to `root`, if `base` is reachable from `root`.
    pub fn contribution(&self, root: &FundId, base: &FundId) -> Option<Contribution> {
        let &i = self.index.get(&(root.clone(), base.clone()))?;
        let r = &self.records[i];
        Some(Contribution {
            weight: r.weight,
            weighted_return: r.weighted_return,
        })
    }

    /// Returns true if there are no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Builds a graph from `holdings` and resolves it.
pub fn calculate_weights<I>(holdings: I) -> WeightResult<Resolution>
where
    I: IntoIterator<Item = Holding>,
{
    let graph = HoldingsGraph::from_holdings(holdings)?;
    resolve(&graph)
}

/// Resolves the weight of every base fund in every root fund.
///
/// The graph is validated first; a cyclic graph fails with
/// [`WeightError::Cycle`] before any weight is computed. A fund whose
/// children's book values sum to zero fails with
/// [`WeightError::UndefinedWeight`], and one whose sum leaves the range of
/// `f64` with [`WeightError::ValueOverflow`].
pub fn resolve(graph: &HoldingsGraph) -> WeightResult<Resolution> {
    let order = validate(graph)?;
    let decompositions = decompose(graph, &order)?;

    let with_returns = graph.has_market_values();
    let mut records = Vec::new();
    let mut summaries = Vec::new();

    for root in graph.node_indices().filter(|&n| graph.is_root_node(n)) {
        let root_id = graph.fund_at(root);
        let decomposition = &decompositions[root.index()];

        let mut base_count = 0;
        for (&base, contribution) in decomposition {
            if contribution.weight == 0.0 {
                continue;
            }
            // An isolated fund has no edge to take a return from
            let weighted_return = if base == root {
                with_returns.then_some(0.0)
            } else {
                contribution.weighted_return
            };
            records.push(WeightRecord::new(
                root_id,
                graph.fund_at(base),
                contribution.weight,
                weighted_return,
            ));
            base_count += 1;
        }

        summaries.push(summarize(graph, root, base_count));
    }

    if summaries.len() > 1 {
        debug!(roots = summaries.len(), "Resolved multiple roots");
    }

    Ok(Resolution::new(order_records(graph, records), summaries))
}

/// Decomposes every fund, children first.
fn decompose(graph: &HoldingsGraph, order: &TopologicalOrder) -> WeightResult<Vec<Decomposition>> {
    let mut decompositions = vec![Decomposition::new(); graph.fund_count()];

    for &node in order.nodes() {
        let fund = graph.fund_at(node);
        let holdings = graph.outgoing(node);

        if holdings.is_empty() {
            trace!(fund = %fund, "Base fund");
            decompositions[node.index()].insert(node, Contribution::UNIT);
            continue;
        }

        let total: f64 = holdings.iter().map(|(_, h)| h.book_value).sum();
        let magnitude: f64 = holdings.iter().map(|(_, h)| h.book_value.abs()).sum();
        if !total.is_finite() || !magnitude.is_finite() {
            return Err(WeightError::value_overflow(fund));
        }
        // Totals lost to cancellation are as undefined as an exact zero
        if total.abs() <= magnitude * CANCELLATION_TOLERANCE {
            return Err(WeightError::undefined_weight(fund));
        }
        debug!(fund = %fund, total, "Underlying value of fund");

        let mut merged = Decomposition::new();
        for (child, holding) in &holdings {
            let local = holding.book_value / total;
            let child_is_base = graph.is_base_node(*child);

            for (&base, inner) in &decompositions[child.index()] {
                let weighted_return = match (holding.market_value, inner.weighted_return) {
                    (Some(_), Some(_)) if child_is_base => {
                        holding.simple_return().map(|r| local * r)
                    }
                    (Some(_), Some(r)) => Some(local * r),
                    _ => None,
                };
                let contribution = Contribution {
                    weight: local * inner.weight,
                    weighted_return,
                };
                trace!(
                    fund = %fund,
                    via = %holding.child,
                    base = %graph.fund_at(base),
                    weight = contribution.weight,
                    "Merged path"
                );
                merged
                    .entry(base)
                    .and_modify(|c| c.merge(contribution))
                    .or_insert(contribution);
            }
        }
        decompositions[node.index()] = merged;
    }

    Ok(decompositions)
}

fn summarize(graph: &HoldingsGraph, root: NodeIndex, base_count: usize) -> RootSummary {
    let holdings = graph.outgoing(root);
    let total_book_value = holdings.iter().map(|(_, h)| h.book_value).sum();
    let total_market_value = if holdings.is_empty() {
        None
    } else {
        holdings.iter().map(|(_, h)| h.market_value).sum()
    };
    RootSummary {
        root: graph.fund_at(root).clone(),
        total_book_value,
        total_market_value,
        base_count,
    }
}
