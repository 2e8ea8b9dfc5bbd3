pub mod api;
pub mod cli;
pub mod config;
pub mod logging;
pub mod metrics;
pub mod stats;

pub use config::ServiceConfig;
pub use metrics::Metrics;
pub use stats::{QueryError, ReviewerSnapshot, StatsService};
