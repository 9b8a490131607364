//! Grid graph module
//!
//! The shared vertex and edge structure that maze carving mutates and
//! searches read.

mod grid;
mod node;

pub use grid::{GraphError, GridGraph};
pub use node::{EdgeList, Node, NodeKey, NodeMetadata};
