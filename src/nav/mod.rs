//! Pathfinding module
//!
//! Incremental A* searches, request handles, and the bounded scheduler
//! that advances them.

mod client;
mod cost;
mod manager;
mod open_set;
mod search;

pub use client::{AStarClient, ClientState, Path, PathNode};
pub use cost::{CostModel, ManhattanCost, ZeroHeuristic};
pub use manager::{AStarManager, ClientHandle};
pub use open_set::{OpenEntry, OpenSet};
pub use search::{AStarSearch, SearchState};
