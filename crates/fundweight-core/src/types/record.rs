//! Output records.

use serde::{Deserialize, Serialize};

use super::FundId;

/// Share of `base` in `root`, aggregated over every path between them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightRecord {
    /// Root (portfolio) fund.
    pub root: FundId,
    /// Base (terminal) fund.
    pub base: FundId,
    /// Aggregate weight of `base` in `root`.
    pub weight: f64,
    /// Path-weighted return, absent if any contributing edge lacks a market value.
    pub weighted_return: Option<f64>,
}

impl WeightRecord {
    /// Creates a new record.
    pub fn new(
        root: impl Into<FundId>,
        base: impl Into<FundId>,
        weight: f64,
        weighted_return: Option<f64>,
    ) -> Self {
        Self {
            root: root.into(),
            base: base.into(),
            weight,
            weighted_return,
        }
    }
}

/// Totals for one root fund.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootSummary {
    /// Root fund.
    pub root: FundId,
    /// Sum of the book values of the root's direct children.
    pub total_book_value: f64,
    /// Sum of the market values of the root's direct children, if all are known.
    pub total_market_value: Option<f64>,
    /// Number of base funds reached from the root.
    pub base_count: usize,
}

impl RootSummary {
    /// Portfolio return of the root from its direct children.
    pub fn total_return(&self) -> Option<f64> {
        if self.total_book_value == 0.0 {
            return None;
        }
        self.total_market_value
            .map(|mv| (mv - self.total_book_value) / self.total_book_value)
    }
}
