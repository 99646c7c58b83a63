//! holding-core: holding-pattern detection over aircraft trajectories.
//!
//! No async, no network. Just algorithms plus the JSON loaders for
//! trajectories and navigation catalogs. `holding-cli` is the command-line
//! front end built on this crate.

pub mod clean;
pub mod config;
pub mod engine;
pub mod filter;
pub mod fixpoint;
pub mod geodesic;
pub mod heading;
pub mod navdb;
pub mod scanner;
pub mod trajectory;
pub mod types;

#[cfg(test)]
mod fixtures;

// Re-export commonly used types at crate root
pub use engine::{DetectionEngine, FlightAnalysis};
pub use filter::{FlightFilter, TrajectoryFilter};
pub use navdb::{NavCatalog, NavDb};
pub use trajectory::{load_trajectory, read_trajectory, BoundingBox};
pub use types::*;
