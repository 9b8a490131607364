//! The shared grid graph
//!
//! A node arena built once per maze instance. The graph is mutable while
//! it is being constructed and carved; the simulation then freezes it
//! behind an `Arc` and every search reads it concurrently.

use std::fs;
use std::path::Path;

use glam::Vec2;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::graph::node::{Node, NodeKey, NodeMetadata};

/// Mapping from key to node, immutable once maze generation finishes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridGraph {
    nodes: FxHashMap<NodeKey, Node>,
}

impl GridGraph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a rectangular visible lattice keyed `(0..width, 0..height)`.
    #[must_use]
    pub fn lattice(width: u32, height: u32) -> Self {
        let mut graph = Self::new();
        for x in 0..width as i32 {
            for y in 0..height as i32 {
                let key = NodeKey::new(x, y);
                graph.add_node(key, NodeMetadata::at_key(key));
            }
        }
        graph
    }

    /// Register a node and wire candidate edges with its present
    /// 4-neighbors.
    ///
    /// Candidate wiring is symmetric: the new node and each present
    /// neighbor list each other. Keys must be unique.
    pub fn add_node(&mut self, key: NodeKey, metadata: NodeMetadata) {
        debug_assert!(!self.nodes.contains_key(&key), "duplicate node {key}");
        let mut node = Node::new(metadata);
        for neighbor in key.neighbors4() {
            if let Some(existing) = self.nodes.get_mut(&neighbor) {
                node.potential_edges.push(neighbor);
                existing.potential_edges.push(key);
            }
        }
        self.nodes.insert(key, node);
    }

    /// Add a symmetric realized edge between two candidate neighbors.
    pub fn connect(&mut self, a: NodeKey, b: NodeKey) {
        debug_assert!(self.nodes.contains_key(&a), "connect: missing node {a}");
        debug_assert!(self.nodes.contains_key(&b), "connect: missing node {b}");
        if let Some(node) = self.nodes.get_mut(&a) {
            debug_assert!(node.has_potential_edge(b), "{b} is not a candidate of {a}");
            node.edges.push(b);
        }
        if let Some(node) = self.nodes.get_mut(&b) {
            node.edges.push(a);
        }
    }

    /// Promote every candidate of `key` into a realized edge, both
    /// directions. Used for the open extension regions around the maze.
    pub fn open_all_edges(&mut self, key: NodeKey) {
        let candidates = match self.nodes.get(&key) {
            Some(node) => node.potential_edges.clone(),
            None => return,
        };
        for other in candidates {
            let already = self.nodes.get(&key).is_some_and(|n| n.has_edge(other));
            if !already {
                self.connect(key, other);
            }
        }
    }

    /// Sort and deduplicate every edge list into a canonical set.
    ///
    /// Run once when maze generation finishes; graph equality and
    /// fixed-seed comparisons rely on the canonical order.
    pub fn dedup_edges(&mut self) {
        for node in self.nodes.values_mut() {
            node.edges.sort_unstable();
            node.edges.dedup();
            node.potential_edges.sort_unstable();
            node.potential_edges.dedup();
        }
    }

    /// Look up a node by key.
    #[must_use]
    pub fn node(&self, key: NodeKey) -> Option<&Node> {
        self.nodes.get(&key)
    }

    pub(crate) fn node_mut(&mut self, key: NodeKey) -> Option<&mut Node> {
        self.nodes.get_mut(&key)
    }

    /// Whether `key` has a node.
    #[must_use]
    pub fn contains(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(&key)
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over all node keys in arbitrary order.
    pub fn keys(&self) -> impl Iterator<Item = NodeKey> + '_ {
        self.nodes.keys().copied()
    }

    /// Realized neighbors of `key`, empty if the key is unknown.
    #[must_use]
    pub fn edges_of(&self, key: NodeKey) -> &[NodeKey] {
        self.nodes.get(&key).map_or(&[], |n| n.edges.as_slice())
    }

    /// Candidate neighbors of `key`, empty if the key is unknown.
    #[must_use]
    pub fn potential_edges_of(&self, key: NodeKey) -> &[NodeKey] {
        self.nodes
            .get(&key)
            .map_or(&[], |n| n.potential_edges.as_slice())
    }

    /// World position of a node's cell min-corner.
    #[must_use]
    pub fn position_of(&self, key: NodeKey) -> Option<Vec2> {
        self.nodes.get(&key).map(|n| n.metadata.position)
    }

    fn to_file(&self) -> GraphFile {
        let mut nodes: Vec<(NodeKey, Node)> =
            self.nodes.iter().map(|(k, n)| (*k, n.clone())).collect();
        nodes.sort_unstable_by_key(|(k, _)| *k);
        GraphFile { version: 1, nodes }
    }

    fn from_file(file: GraphFile) -> Self {
        Self {
            nodes: file.nodes.into_iter().collect(),
        }
    }

    /// Save the graph to a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_ron(&self, path: impl AsRef<Path>) -> Result<(), GraphError> {
        let ron_string =
            ron::ser::to_string_pretty(&self.to_file(), ron::ser::PrettyConfig::default())
                .map_err(|e| GraphError::SerializeError(e.to_string()))?;
        fs::write(path, ron_string).map_err(|e| GraphError::IoError(e.to_string()))?;
        Ok(())
    }

    /// Load a graph from a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load_ron(path: impl AsRef<Path>) -> Result<Self, GraphError> {
        let content = fs::read_to_string(path).map_err(|e| GraphError::IoError(e.to_string()))?;
        let file: GraphFile =
            ron::from_str(&content).map_err(|e| GraphError::DeserializeError(e.to_string()))?;
        Ok(Self::from_file(file))
    }

    /// Save the graph to a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), GraphError> {
        let json_string = serde_json::to_string_pretty(&self.to_file())
            .map_err(|e| GraphError::SerializeError(e.to_string()))?;
        fs::write(path, json_string).map_err(|e| GraphError::IoError(e.to_string()))?;
        Ok(())
    }

    /// Load a graph from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, GraphError> {
        let content = fs::read_to_string(path).map_err(|e| GraphError::IoError(e.to_string()))?;
        let file: GraphFile = serde_json::from_str(&content)
            .map_err(|e| GraphError::DeserializeError(e.to_string()))?;
        Ok(Self::from_file(file))
    }
}

/// On-disk form of a graph: nodes sorted by key for stable output.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct GraphFile {
    /// File version for compatibility
    version: u32,
    /// All nodes with their keys
    nodes: Vec<(NodeKey, Node)>,
}

/// Errors that can occur during graph file operations
#[derive(Debug, Clone)]
pub enum GraphError {
    /// IO error
    IoError(String),
    /// Serialization error
    SerializeError(String),
    /// Deserialization error
    DeserializeError(String),
}

impl std::fmt::Display for GraphError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IoError(e) => write!(f, "IO error: {e}"),
            Self::SerializeError(e) => write!(f, "Serialization error: {e}"),
            Self::DeserializeError(e) => write!(f, "Deserialization error: {e}"),
        }
    }
}

impl std::error::Error for GraphError {}
