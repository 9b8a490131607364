//! A maze navigation sandbox built in Rust
//!
//! This crate provides:
//! - A grid graph carved into a maze by a resumable randomized generator
//! - Admission-controlled scheduling of many incremental A* searches
//! - Steering agents that follow resolved (or partial) paths
//!
//! Everything advances on a single cooperative tick; rendering, cameras,
//! and input belong to host applications.

pub mod agent;
pub mod graph;
pub mod maze;
pub mod nav;
pub mod sim;

// Re-exports for convenience
pub use glam;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::agent::{Agent, AgentParams, Seek, SteeringBehavior};
    pub use crate::graph::{GraphError, GridGraph, Node, NodeKey, NodeMetadata};
    pub use crate::maze::MazeGenerator;
    pub use crate::nav::{
        AStarClient, AStarManager, AStarSearch, ClientHandle, ClientState, CostModel,
        ManhattanCost, Path, PathNode, SearchState,
    };
    pub use crate::sim::{SimConfig, Simulation};
    pub use glam::{Vec2, Vec3};
}
