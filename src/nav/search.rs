//! One incremental shortest-path computation
//!
//! Each search owns its private cost records and frontier and reads the
//! shared graph; the scheduler advances it one relaxation round per tick.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::graph::{GridGraph, NodeKey};
use crate::nav::cost::CostModel;
use crate::nav::open_set::OpenSet;

/// Lifecycle of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    /// Still expanding the frontier.
    Running,
    /// The goal was dequeued; a complete path exists.
    Finished,
    /// The frontier emptied before the goal was reached; no route exists.
    Failed,
}

/// Per-node cost bookkeeping, created lazily as nodes are discovered.
#[derive(Debug, Clone, Copy)]
struct SearchRecord {
    g_score: f32,
    f_score: f32,
    came_from: Option<NodeKey>,
}

impl SearchRecord {
    const UNDISCOVERED: Self = Self {
        g_score: f32::INFINITY,
        f_score: f32::INFINITY,
        came_from: None,
    };
}

/// An incremental A* search over the shared grid graph.
pub struct AStarSearch {
    graph: Arc<GridGraph>,
    start: NodeKey,
    goal: NodeKey,
    costs: Arc<dyn CostModel>,
    records: FxHashMap<NodeKey, SearchRecord>,
    open: OpenSet,
    state: SearchState,
    steps: u32,
}

impl AStarSearch {
    /// Seed a search from `start` toward `goal`.
    #[must_use]
    pub fn new(
        graph: Arc<GridGraph>,
        start: NodeKey,
        goal: NodeKey,
        costs: Arc<dyn CostModel>,
    ) -> Self {
        debug_assert!(graph.contains(start), "search start {start} not in graph");
        debug_assert!(graph.contains(goal), "search goal {goal} not in graph");

        let mut records = FxHashMap::default();
        let mut open = OpenSet::new();
        let f = costs.heuristic(&graph, start, goal);
        records.insert(
            start,
            SearchRecord {
                g_score: 0.0,
                f_score: f,
                came_from: None,
            },
        );
        open.add(start, f, 0.0);

        Self {
            graph,
            start,
            goal,
            costs,
            records,
            open,
            state: SearchState::Running,
            steps: 0,
        }
    }

    /// Advance one relaxation round.
    ///
    /// Dequeues the most promising frontier node; reaching the goal
    /// finishes the search, an exhausted frontier fails it. Neighbor
    /// records are created on first touch, so cost state stays
    /// proportional to the explored region rather than the whole graph.
    pub fn step(&mut self) {
        if self.state != SearchState::Running {
            return;
        }

        let Some(current) = self.open.dequeue() else {
            self.state = SearchState::Failed;
            return;
        };
        self.steps += 1;

        if current.key == self.goal {
            self.state = SearchState::Finished;
            return;
        }

        let current_g = self
            .records
            .get(&current.key)
            .map_or(f32::INFINITY, |r| r.g_score);

        for &neighbor in self.graph.edges_of(current.key) {
            debug_assert!(
                self.graph.contains(neighbor),
                "edge {} -> {} references a missing node",
                current.key,
                neighbor
            );

            let candidate = current_g + self.costs.weight(&self.graph, current.key, neighbor);
            let record = self
                .records
                .entry(neighbor)
                .or_insert(SearchRecord::UNDISCOVERED);
            if candidate < record.g_score {
                let f = candidate + self.costs.heuristic(&self.graph, neighbor, self.goal);
                *record = SearchRecord {
                    g_score: candidate,
                    f_score: f,
                    came_from: Some(current.key),
                };
                if !self.open.has_key(neighbor) {
                    self.open.add(neighbor, record.f_score, record.g_score);
                }
            }
        }
    }

    /// Reconstruct the best-known route, oldest node first.
    ///
    /// While running this walks back from the current frontier minimum,
    /// which makes a usable partial route. Once finished it walks back
    /// from the goal. A failed search has no frontier left and yields an
    /// empty path.
    #[must_use]
    pub fn build_path(&self) -> Vec<NodeKey> {
        let tail = match self.state {
            SearchState::Finished => Some(self.goal),
            SearchState::Running => self.open.peek().map(|entry| entry.key),
            SearchState::Failed => None,
        };
        let Some(tail) = tail else {
            return Vec::new();
        };

        let mut path = vec![tail];
        let mut cursor = tail;
        while let Some(prev) = self.records.get(&cursor).and_then(|r| r.came_from) {
            path.push(prev);
            cursor = prev;
        }
        path.reverse();
        path
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> SearchState {
        self.state
    }

    /// The goal has been dequeued; `build_path` yields the full route.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.state == SearchState::Finished
    }

    /// The frontier emptied with the goal unreached.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.state == SearchState::Failed
    }

    /// Finished or failed.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.state != SearchState::Running
    }

    /// Relaxation rounds performed so far.
    #[must_use]
    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// The key this search departs from.
    #[must_use]
    pub fn start(&self) -> NodeKey {
        self.start
    }

    /// The key this search is aimed at.
    #[must_use]
    pub fn goal(&self) -> NodeKey {
        self.goal
    }

    /// Best known cost from the start, if `key` has been discovered.
    #[must_use]
    pub fn g_score(&self, key: NodeKey) -> Option<f32> {
        self.records.get(&key).map(|r| r.g_score)
    }

    /// Number of discovered nodes holding cost records.
    #[must_use]
    pub fn discovered(&self) -> usize {
        self.records.len()
    }
}

impl fmt::Debug for AStarSearch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AStarSearch")
            .field("start", &self.start)
            .field("goal", &self.goal)
            .field("state", &self.state)
            .field("steps", &self.steps)
            .field("frontier", &self.open.len())
            .finish()
    }
}
