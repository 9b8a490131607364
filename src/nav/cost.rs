//! Pluggable search cost functions
//!
//! A manager owns one cost model shared by every search it spawns. Both
//! callbacks must return non-negative values; negative costs void the
//! shortest-path guarantees and are not checked at runtime.

use crate::graph::{GridGraph, NodeKey};

/// Heuristic and edge-weight pair consulted by every search.
pub trait CostModel: Send + Sync {
    /// Estimated remaining cost from `n` to `goal`.
    fn heuristic(&self, graph: &GridGraph, n: NodeKey, goal: NodeKey) -> f32;

    /// Traversal cost of the edge `a -> b`.
    fn weight(&self, graph: &GridGraph, a: NodeKey, b: NodeKey) -> f32;
}

fn manhattan(graph: &GridGraph, a: NodeKey, b: NodeKey) -> f32 {
    let (Some(pa), Some(pb)) = (graph.position_of(a), graph.position_of(b)) else {
        return 0.0;
    };
    (pb.x - pa.x).abs() + (pb.y - pa.y).abs()
}

/// Manhattan-distance costs over node positions.
///
/// A `heuristic_scale` above 1.0 weights the estimate over the
/// accumulated cost, trading path optimality for fewer expansions.
#[derive(Debug, Clone, Copy)]
pub struct ManhattanCost {
    pub heuristic_scale: f32,
}

impl ManhattanCost {
    #[must_use]
    pub fn new(heuristic_scale: f32) -> Self {
        Self { heuristic_scale }
    }
}

impl Default for ManhattanCost {
    fn default() -> Self {
        Self {
            heuristic_scale: 1.0,
        }
    }
}

impl CostModel for ManhattanCost {
    fn heuristic(&self, graph: &GridGraph, n: NodeKey, goal: NodeKey) -> f32 {
        self.heuristic_scale * manhattan(graph, n, goal)
    }

    fn weight(&self, graph: &GridGraph, a: NodeKey, b: NodeKey) -> f32 {
        manhattan(graph, a, b)
    }
}

/// Zero heuristic over another model's weights (uniform-cost search).
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroHeuristic<M>(pub M);

impl<M: CostModel> CostModel for ZeroHeuristic<M> {
    fn heuristic(&self, _graph: &GridGraph, _n: NodeKey, _goal: NodeKey) -> f32 {
        0.0
    }

    fn weight(&self, graph: &GridGraph, a: NodeKey, b: NodeKey) -> f32 {
        self.0.weight(graph, a, b)
    }
}
