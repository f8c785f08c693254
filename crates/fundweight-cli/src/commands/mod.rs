//! CLI command implementations.

pub mod config;
pub mod inspect;
pub mod weights;

pub use config::ConfigArgs;
pub use inspect::InspectArgs;
pub use weights::WeightsArgs;
