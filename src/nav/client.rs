//! Pathfinding request handles
//!
//! A client is one (start, end) request. The scheduler moves it through
//! `NotStarted -> Started -> Finished`, attaching a live search for the
//! middle state and caching the resolved path at the end so finished
//! requests hold no search memory.

use glam::Vec2;

use crate::graph::{GridGraph, NodeKey, NodeMetadata};
use crate::nav::search::AStarSearch;

/// Request lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
    /// Registered, waiting for a free search slot.
    NotStarted,
    /// Owns a live search being advanced by the scheduler.
    Started,
    /// Path cached (possibly empty) and search released.
    Finished,
}

/// One node of a resolved path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathNode {
    pub key: NodeKey,
    pub metadata: NodeMetadata,
}

/// An ordered route of node metadata, start first.
#[derive(Debug, Clone, Default)]
pub struct Path {
    pub nodes: Vec<PathNode>,
}

impl Path {
    /// Number of nodes on the route.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the route has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// World-space length of the polyline through the cell centers.
    #[must_use]
    pub fn length(&self) -> f32 {
        let mut length = 0.0;
        for i in 1..self.nodes.len() {
            length += self.nodes[i]
                .metadata
                .center()
                .distance(self.nodes[i - 1].metadata.center());
        }
        length
    }

    /// Cell-center waypoints in travel order.
    pub fn centers(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.nodes.iter().map(|n| n.metadata.center())
    }
}

/// A single shortest-path request.
#[derive(Debug)]
pub struct AStarClient {
    start: NodeKey,
    end: NodeKey,
    state: ClientState,
    search: Option<AStarSearch>,
    path: Option<Path>,
}

impl AStarClient {
    pub(crate) fn new(start: NodeKey, end: NodeKey) -> Self {
        Self {
            start,
            end,
            state: ClientState::NotStarted,
            search: None,
            path: None,
        }
    }

    /// The key the search departs from.
    #[must_use]
    pub fn start(&self) -> NodeKey {
        self.start
    }

    /// The key the search is aimed at.
    #[must_use]
    pub fn end(&self) -> NodeKey {
        self.end
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> ClientState {
        self.state
    }

    /// Whether a search has been attached (or already resolved).
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.state != ClientState::NotStarted
    }

    /// True once a path is cached or the owned search went terminal.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        match self.state {
            ClientState::Finished => true,
            ClientState::NotStarted => false,
            ClientState::Started => self.search.as_ref().is_some_and(|s| s.is_terminal()),
        }
    }

    /// Whether a live search is currently attached.
    #[must_use]
    pub fn has_live_search(&self) -> bool {
        self.search.is_some()
    }

    /// Re-aim the search origin; only honored before admission.
    pub fn set_start(&mut self, start: NodeKey) {
        if self.state == ClientState::NotStarted {
            self.start = start;
        }
    }

    /// Attach the live search (`NotStarted -> Started`).
    pub(crate) fn begin(&mut self, search: AStarSearch) {
        debug_assert_eq!(self.state, ClientState::NotStarted, "client started twice");
        self.search = Some(search);
        self.state = ClientState::Started;
    }

    /// Forward one relaxation round to the owned search.
    pub(crate) fn step(&mut self) {
        if let Some(search) = &mut self.search {
            search.step();
        }
    }

    /// Cache the search's path and release the search
    /// (`Started -> Finished`).
    ///
    /// Runs once; later calls are no-ops. A failed search caches an empty
    /// path so followers still observe completion.
    pub(crate) fn cache_path(&mut self, graph: &GridGraph) {
        let Some(search) = self.search.take() else {
            return;
        };
        let nodes = search
            .build_path()
            .into_iter()
            .filter_map(|key| {
                graph.node(key).map(|node| PathNode {
                    key,
                    metadata: node.metadata,
                })
            })
            .collect();
        self.path = Some(Path { nodes });
        self.state = ClientState::Finished;
    }

    /// Move the cached path out; yields once.
    pub fn take_path(&mut self) -> Option<Path> {
        self.path.take()
    }

    /// The cached path, if still held.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_ref()
    }

    /// Withdraw the request, dropping any live search immediately.
    ///
    /// The client reports finished with an empty path and is never
    /// readmitted.
    pub fn cancel(&mut self) {
        self.search = None;
        if self.path.is_none() {
            self.path = Some(Path::default());
        }
        self.state = ClientState::Finished;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::nav::cost::{CostModel, ManhattanCost, ZeroHeuristic};

    fn line_graph(n: i32) -> Arc<GridGraph> {
        let mut graph = GridGraph::new();
        for x in 0..n {
            let key = NodeKey::new(x, 0);
            graph.add_node(key, NodeMetadata::at_key(key));
        }
        for x in 1..n {
            graph.connect(NodeKey::new(x - 1, 0), NodeKey::new(x, 0));
        }
        Arc::new(graph)
    }

    fn search_on(graph: &Arc<GridGraph>, start: NodeKey, end: NodeKey) -> AStarSearch {
        let costs: Arc<dyn CostModel> = Arc::new(ZeroHeuristic(ManhattanCost::default()));
        AStarSearch::new(Arc::clone(graph), start, end, costs)
    }

    #[test]
    fn test_client_lifecycle() {
        let graph = line_graph(4);
        let start = NodeKey::new(0, 0);
        let end = NodeKey::new(3, 0);
        let mut client = AStarClient::new(start, end);

        assert_eq!(client.state(), ClientState::NotStarted);
        assert!(!client.is_started());
        assert!(!client.is_finished());

        client.begin(search_on(&graph, start, end));
        assert_eq!(client.state(), ClientState::Started);
        assert!(client.is_started());

        for _ in 0..20 {
            client.step();
        }
        assert!(client.is_finished());
        assert!(client.has_live_search());

        client.cache_path(&graph);
        assert_eq!(client.state(), ClientState::Finished);
        assert!(!client.has_live_search());

        let path = client.take_path().unwrap();
        assert_eq!(path.len(), 4);
        assert_eq!(path.nodes[0].key, start);
        assert_eq!(path.nodes[3].key, end);
        assert!(client.take_path().is_none());
    }

    #[test]
    fn test_set_start_only_before_admission() {
        let graph = line_graph(4);
        let mut client = AStarClient::new(NodeKey::new(0, 0), NodeKey::new(3, 0));

        client.set_start(NodeKey::new(1, 0));
        assert_eq!(client.start(), NodeKey::new(1, 0));

        client.begin(search_on(&graph, client.start(), client.end()));
        client.set_start(NodeKey::new(2, 0));
        assert_eq!(client.start(), NodeKey::new(1, 0));
    }

    #[test]
    fn test_cache_path_runs_once() {
        let graph = line_graph(3);
        let start = NodeKey::new(0, 0);
        let end = NodeKey::new(2, 0);
        let mut client = AStarClient::new(start, end);
        client.begin(search_on(&graph, start, end));
        for _ in 0..20 {
            client.step();
        }

        client.cache_path(&graph);
        let first = client.path().unwrap().len();
        client.cache_path(&graph);
        assert_eq!(client.path().unwrap().len(), first);
    }

    #[test]
    fn test_failed_search_caches_empty_path() {
        let mut graph = GridGraph::new();
        let start = NodeKey::new(0, 0);
        let end = NodeKey::new(5, 0);
        graph.add_node(start, NodeMetadata::at_key(start));
        graph.add_node(end, NodeMetadata::at_key(end));
        let graph = Arc::new(graph);

        let mut client = AStarClient::new(start, end);
        client.begin(search_on(&graph, start, end));
        for _ in 0..10 {
            client.step();
        }
        assert!(client.is_finished());

        client.cache_path(&graph);
        let path = client.take_path().unwrap();
        assert!(path.is_empty());
    }

    #[test]
    fn test_cancel_before_admission() {
        let mut client = AStarClient::new(NodeKey::new(0, 0), NodeKey::new(3, 0));
        client.cancel();

        assert_eq!(client.state(), ClientState::Finished);
        assert!(client.is_finished());
        assert!(client.take_path().unwrap().is_empty());
    }

    #[test]
    fn test_cancel_drops_live_search() {
        let graph = line_graph(10);
        let start = NodeKey::new(0, 0);
        let end = NodeKey::new(9, 0);
        let mut client = AStarClient::new(start, end);
        client.begin(search_on(&graph, start, end));
        client.step();
        assert!(client.has_live_search());

        client.cancel();
        assert!(!client.has_live_search());
        assert_eq!(client.state(), ClientState::Finished);
        assert!(client.take_path().unwrap().is_empty());
    }

    #[test]
    fn test_cancel_after_finish_keeps_path() {
        let graph = line_graph(3);
        let start = NodeKey::new(0, 0);
        let end = NodeKey::new(2, 0);
        let mut client = AStarClient::new(start, end);
        client.begin(search_on(&graph, start, end));
        for _ in 0..20 {
            client.step();
        }
        client.cache_path(&graph);

        client.cancel();
        assert_eq!(client.take_path().unwrap().len(), 3);
    }

    #[test]
    fn test_path_length() {
        let path = Path {
            nodes: vec![
                PathNode {
                    key: NodeKey::new(0, 0),
                    metadata: NodeMetadata::at_key(NodeKey::new(0, 0)),
                },
                PathNode {
                    key: NodeKey::new(1, 0),
                    metadata: NodeMetadata::at_key(NodeKey::new(1, 0)),
                },
                PathNode {
                    key: NodeKey::new(1, 1),
                    metadata: NodeMetadata::at_key(NodeKey::new(1, 1)),
                },
            ],
        };
        assert!((path.length() - 2.0).abs() < 1e-6);
        assert_eq!(path.centers().next(), Some(Vec2::new(0.5, 0.5)));
    }
}
