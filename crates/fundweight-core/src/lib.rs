//! # Fundweight Core
//!
//! Look-through weights for fund-of-funds portfolios.
//!
//! A portfolio fund holds other funds, which may hold further funds, down to
//! base funds that hold nothing. This crate computes, for every root fund, the
//! share of its value attributable to each base fund, summed across every
//! holding path between them. When market values are supplied the share of
//! the root's return earned through each base fund is computed as well.
//!
//! ## Design Philosophy
//!
//! - **Pure functions**: The caller supplies every holding; no I/O or caching
//! - **Fail closed**: Duplicate holdings, cycles and zero-value funds are errors,
//!   never silently defaulted
//! - **Deterministic**: Output follows the order in which funds were first seen
//!
//! ## Quick Start
//!
//! ```rust
//! use fundweight_core::prelude::*;
//!
//! let resolution = calculate_weights([
//!     Holding::new("A", "B", 1000.0),
//!     Holding::new("A", "C", 2000.0),
//!     Holding::new("B", "D", 500.0),
//!     Holding::new("B", "E", 500.0),
//! ])?;
//!
//! let d = resolution.contribution(&"A".into(), &"D".into()).unwrap();
//! assert!((d.weight - 1.0 / 6.0).abs() < 1e-12);
//! # Ok::<(), WeightError>(())
//! ```
//!
//! ## Module Overview
//!
//! - [`graph`] - Holdings graph (funds and parent -> child edges)
//! - [`cycle`] - Cycle detection, gate before resolution
//! - [`resolver`] - Aggregate weights and returns per root/base pair
//! - [`aggregate`] - Deterministic ordering and per-root totals
//! - [`types`] - Fund identifiers, holdings and output records

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod aggregate;
pub mod cycle;
pub mod error;
pub mod graph;
pub mod resolver;
pub mod types;

pub use aggregate::{order_records, total_return, total_weight};
pub use cycle::{validate, TopologicalOrder};
pub use error::{WeightError, WeightResult};
pub use graph::HoldingsGraph;
pub use resolver::{calculate_weights, resolve, Contribution, Resolution};
pub use types::{FundId, Holding, RootSummary, WeightRecord};

/// Prelude module for convenient imports.
///
/// ```rust
/// use fundweight_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::aggregate::{total_return, total_weight};
    pub use crate::error::{WeightError, WeightResult};
    pub use crate::graph::HoldingsGraph;
    pub use crate::resolver::{calculate_weights, resolve, Contribution, Resolution};
    pub use crate::types::{FundId, Holding, RootSummary, WeightRecord};
}
