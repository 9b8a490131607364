//! Simulation harness
//!
//! The cooperative tick loop for one maze instance.

mod config;
mod simulation;

pub use config::SimConfig;
pub use simulation::Simulation;
