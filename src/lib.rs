pub mod cli;
pub mod domain;
pub mod infra;
pub mod logging;
pub mod providers;
pub mod services;

// Make test_support available for integration tests
pub mod test_support;

pub use domain::{Filter, LeftoversError, Logger, Noun, Resource, ResourceKind};
pub use infra::TerminalLogger;
pub use providers::Iaas;
pub use services::Leftovers;

/// Printed by `leftovers --version`
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
