//! Domain types for look-through weight resolution.
//!
//! - [`FundId`]: Opaque fund label, the node identity of the holdings graph
//! - [`Holding`]: One parent -> child edge with book and optional market value
//! - [`WeightRecord`]: One resolved (root, base, weight, return) tuple
//! - [`RootSummary`]: Totals for a root fund

mod fund;
mod holding;
mod record;

pub use fund::FundId;
pub use holding::Holding;
pub use record::{RootSummary, WeightRecord};
