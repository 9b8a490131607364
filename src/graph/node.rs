//! Grid nodes and their keys
//!
//! Nodes are keyed by integer cell coordinate and carry a candidate
//! neighbor list, a realized neighbor list, and render-facing metadata.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Inline edge list. Grid adjacency is 4-connected, so lists never spill.
pub type EdgeList = SmallVec<[NodeKey; 4]>;

/// Integer grid coordinate identifying a node.
///
/// A node's cell covers the unit square `[x, x+1) x [y, y+1)` in world
/// space.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct NodeKey {
    pub x: i32,
    pub y: i32,
}

impl NodeKey {
    /// Create a key from grid coordinates.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Snap a world position to the key of the cell containing it.
    #[must_use]
    pub fn at(position: Vec2) -> Self {
        Self {
            x: position.x.floor() as i32,
            y: position.y.floor() as i32,
        }
    }

    /// The four axis-aligned neighbor keys (no diagonals).
    #[must_use]
    pub const fn neighbors4(self) -> [NodeKey; 4] {
        [
            NodeKey::new(self.x - 1, self.y),
            NodeKey::new(self.x + 1, self.y),
            NodeKey::new(self.x, self.y - 1),
            NodeKey::new(self.x, self.y + 1),
        ]
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.x, self.y)
    }
}

/// Render-facing payload attached to every node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeMetadata {
    /// Cell min-corner in world space
    pub position: Vec2,
    /// Traversal weight hint for custom cost models
    pub weight: f32,
    /// Whether maze carving has visited this node
    pub visited: bool,
    /// Whether a host should render this node
    pub visible: bool,
}

impl NodeMetadata {
    /// Metadata for a visible cell at the key's world position.
    #[must_use]
    pub fn at_key(key: NodeKey) -> Self {
        Self {
            position: Vec2::new(key.x as f32, key.y as f32),
            weight: 0.0,
            visited: false,
            visible: true,
        }
    }

    /// Same as [`at_key`](Self::at_key) but hidden from rendering.
    #[must_use]
    pub fn hidden(key: NodeKey) -> Self {
        Self {
            visible: false,
            ..Self::at_key(key)
        }
    }

    /// Center of the cell in world space.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.position + Vec2::splat(0.5)
    }
}

/// A graph vertex: candidate neighbors, realized neighbors, metadata.
///
/// `edges` is always a subset of `potential_edges`; both are kept
/// symmetric by [`GridGraph`](crate::graph::GridGraph).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub potential_edges: EdgeList,
    pub edges: EdgeList,
    pub metadata: NodeMetadata,
}

impl Node {
    pub(crate) fn new(metadata: NodeMetadata) -> Self {
        Self {
            potential_edges: EdgeList::new(),
            edges: EdgeList::new(),
            metadata,
        }
    }

    /// Number of realized edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Whether `other` is a realized neighbor.
    #[must_use]
    pub fn has_edge(&self, other: NodeKey) -> bool {
        self.edges.contains(&other)
    }

    /// Whether `other` is a candidate neighbor.
    #[must_use]
    pub fn has_potential_edge(&self, other: NodeKey) -> bool {
        self.potential_edges.contains(&other)
    }
}
