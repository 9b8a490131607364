//! Agents and steering
//!
//! Converts resolved paths into smooth velocity and facing motion.

mod boid;
mod steering;

pub use boid::{Agent, AgentParams};
pub use steering::{Seek, SteeringBehavior};
