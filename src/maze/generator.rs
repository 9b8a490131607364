//! Randomized maze carving
//!
//! A depth-first carve over the grid graph's candidate edges, driven as a
//! resumable task: each `step()` performs one node-visit's worth of work
//! so a host loop can budget carving across ticks. The traversal keeps an
//! explicit stack of (node, remaining-candidate-pool) frames instead of
//! recursing.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashSet;

use crate::graph::{EdgeList, GridGraph, NodeKey};

/// Minimum realized edges `randomize` tries to give well-connected nodes.
const RANDOMIZE_MIN_EDGES: usize = 3;

/// Uniform draw from a shrinking candidate pool.
///
/// The chosen entry is removed so it cannot be drawn again at this node;
/// the relative order of the remaining entries is preserved.
fn roulette_select(pool: &mut EdgeList, rng: &mut SmallRng) -> Option<NodeKey> {
    if pool.is_empty() {
        return None;
    }
    let index = rng.random_range(0..pool.len());
    Some(pool.remove(index))
}

/// One suspended branch of the depth-first carve.
#[derive(Debug)]
struct Frame {
    key: NodeKey,
    pool: EdgeList,
}

/// Resumable randomized depth-first maze carve.
///
/// The generator owns its RNG and visit bookkeeping; the graph it carves
/// is passed into every call so the host keeps ownership.
#[derive(Debug)]
pub struct MazeGenerator {
    root: NodeKey,
    visited: FxHashSet<NodeKey>,
    stack: Vec<Frame>,
    rng: SmallRng,
    started: bool,
    done: bool,
    visits: usize,
}

impl MazeGenerator {
    /// Carve starting from `root`, deterministically for a fixed seed.
    #[must_use]
    pub fn new(root: NodeKey, seed: u64) -> Self {
        Self {
            root,
            visited: FxHashSet::default(),
            stack: Vec::new(),
            rng: SmallRng::seed_from_u64(seed),
            started: false,
            done: false,
            visits: 0,
        }
    }

    /// Whether the carve has consumed every reachable branch.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Nodes visited so far.
    #[must_use]
    pub fn visits(&self) -> usize {
        self.visits
    }

    /// Perform one node-visit's worth of carving.
    ///
    /// Returns `true` while more work remains. The first call visits the
    /// root; each later call either carves into one unvisited neighbor of
    /// the deepest open branch or retires that branch.
    pub fn step(&mut self, graph: &mut GridGraph) -> bool {
        if self.done {
            return false;
        }
        if !self.started {
            self.started = true;
            self.visit(self.root, graph);
            if self.stack.is_empty() {
                // Root missing from the graph; nothing to carve.
                self.done = true;
            }
            return !self.done;
        }

        loop {
            let Some(top) = self.stack.last_mut() else {
                self.done = true;
                return false;
            };
            match roulette_select(&mut top.pool, &mut self.rng) {
                None => {
                    self.stack.pop();
                    if self.stack.is_empty() {
                        self.done = true;
                        return false;
                    }
                    return true;
                }
                Some(candidate) if self.visited.contains(&candidate) => {
                    // Already carved from elsewhere, draw again.
                    continue;
                }
                Some(candidate) => {
                    let from = top.key;
                    graph.connect(from, candidate);
                    self.visit(candidate, graph);
                    return true;
                }
            }
        }
    }

    fn visit(&mut self, key: NodeKey, graph: &mut GridGraph) {
        self.visited.insert(key);
        let Some(node) = graph.node_mut(key) else {
            debug_assert!(false, "carve visited missing node {key}");
            return;
        };
        self.visits += 1;
        node.metadata.visited = true;
        let pool = node.potential_edges.clone();
        self.stack.push(Frame { key, pool });
    }

    /// Force well-connected nodes up to at least three realized edges,
    /// opening loops in the carved tree.
    ///
    /// Nodes with fewer than three candidates are left alone, and draws
    /// stop as soon as a node's pool empties, so degenerate pools
    /// terminate. Keys are processed in sorted order to keep the result
    /// reproducible for a fixed seed.
    pub fn randomize(&mut self, graph: &mut GridGraph) {
        let mut keys: Vec<NodeKey> = graph.keys().collect();
        keys.sort_unstable();

        for key in keys {
            let candidates = graph.potential_edges_of(key);
            if candidates.len() < RANDOMIZE_MIN_EDGES {
                continue;
            }
            let mut pool: EdgeList = candidates.iter().copied().collect();
            while graph.edges_of(key).len() < RANDOMIZE_MIN_EDGES {
                let Some(candidate) = roulette_select(&mut pool, &mut self.rng) else {
                    break;
                };
                if !graph.edges_of(key).contains(&candidate) {
                    graph.connect(key, candidate);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn carve_fully(generator: &mut MazeGenerator, graph: &mut GridGraph) {
        let limit = graph.len() * 3 + 10;
        let mut steps = 0;
        while generator.step(graph) {
            steps += 1;
            assert!(steps < limit, "carve did not terminate");
        }
        assert!(generator.is_done());
    }

    /// Count nodes reachable from `root` over realized edges.
    fn reachable_count(graph: &GridGraph, root: NodeKey) -> usize {
        let mut seen = FxHashSet::default();
        let mut frontier = vec![root];
        seen.insert(root);
        while let Some(key) = frontier.pop() {
            for &next in graph.edges_of(key) {
                if seen.insert(next) {
                    frontier.push(next);
                }
            }
        }
        seen.len()
    }

    #[test]
    fn test_carve_visits_every_node() {
        let mut graph = GridGraph::lattice(8, 8);
        let mut generator = MazeGenerator::new(NodeKey::new(0, 0), 1);
        carve_fully(&mut generator, &mut graph);

        assert_eq!(generator.visits(), 64);
        assert_eq!(reachable_count(&graph, NodeKey::new(0, 0)), 64);
        for key in graph.keys() {
            let node = graph.node(key).unwrap();
            assert!(node.metadata.visited, "{key} was not carved");
            assert!(!node.edges.is_empty(), "{key} has no edges");
        }
    }

    #[test]
    fn test_carved_edges_are_symmetric_candidates() {
        let mut graph = GridGraph::lattice(6, 5);
        let mut generator = MazeGenerator::new(NodeKey::new(0, 0), 42);
        carve_fully(&mut generator, &mut graph);

        for key in graph.keys() {
            let node = graph.node(key).unwrap();
            for &other in &node.edges {
                assert!(node.has_potential_edge(other));
                assert!(graph.node(other).unwrap().has_edge(key));
            }
        }
    }

    #[test]
    fn test_carve_is_deterministic_for_fixed_seed() {
        let carve = |seed| {
            let mut graph = GridGraph::lattice(8, 8);
            let mut generator = MazeGenerator::new(NodeKey::new(0, 0), seed);
            carve_fully(&mut generator, &mut graph);
            graph.dedup_edges();
            graph
        };
        assert_eq!(carve(7), carve(7));
    }

    #[test]
    fn test_step_budget_is_one_visit() {
        let mut graph = GridGraph::lattice(8, 8);
        let mut generator = MazeGenerator::new(NodeKey::new(0, 0), 3);
        for _ in 0..3 {
            assert!(generator.step(&mut graph));
        }
        assert!(!generator.is_done());
        assert_eq!(generator.visits(), 3);
    }

    #[test]
    fn test_isolated_root_finishes_without_edges() {
        let mut graph = GridGraph::new();
        let root = NodeKey::new(0, 0);
        graph.add_node(root, crate::graph::NodeMetadata::at_key(root));

        let mut generator = MazeGenerator::new(root, 9);
        carve_fully(&mut generator, &mut graph);
        assert_eq!(generator.visits(), 1);
        assert!(graph.edges_of(root).is_empty());
    }

    #[test]
    fn test_randomize_reaches_three_edges() {
        let mut graph = GridGraph::lattice(6, 6);
        let mut generator = MazeGenerator::new(NodeKey::new(0, 0), 11);
        carve_fully(&mut generator, &mut graph);
        generator.randomize(&mut graph);
        graph.dedup_edges();

        for key in graph.keys() {
            let node = graph.node(key).unwrap();
            if node.potential_edges.len() >= 3 {
                assert!(node.edge_count() >= 3, "{key} has {} edges", node.edge_count());
            }
            for &other in &node.edges {
                assert!(graph.node(other).unwrap().has_edge(key));
            }
        }
    }

    #[test]
    fn test_randomize_skips_sparse_nodes() {
        // 2x2 lattice: every node has exactly two candidates.
        let mut graph = GridGraph::lattice(2, 2);
        let mut generator = MazeGenerator::new(NodeKey::new(0, 0), 5);
        carve_fully(&mut generator, &mut graph);
        let before = graph.clone();
        generator.randomize(&mut graph);
        assert_eq!(graph, before);
    }

    #[test]
    fn test_randomize_is_deterministic_for_fixed_seed() {
        let run = || {
            let mut graph = GridGraph::lattice(7, 4);
            let mut generator = MazeGenerator::new(NodeKey::new(0, 0), 21);
            carve_fully(&mut generator, &mut graph);
            generator.randomize(&mut graph);
            graph.dedup_edges();
            graph
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_roulette_shrinks_pool() {
        let mut rng = SmallRng::seed_from_u64(0);
        let mut pool: EdgeList = (0..4).map(|x| NodeKey::new(x, 0)).collect();
        let mut drawn = Vec::new();
        while let Some(key) = roulette_select(&mut pool, &mut rng) {
            assert!(!drawn.contains(&key), "{key} drawn twice");
            drawn.push(key);
        }
        assert_eq!(drawn.len(), 4);
    }
}
