//! Bounded concurrent search scheduling
//!
//! The manager owns every registered client and advances at most
//! `max_live` searches per tick: admission in registration order up to
//! the ceiling, one relaxation round per live search, then harvesting of
//! searches that went terminal. Worst-case per-tick cost is bounded by
//! the ceiling no matter how many requests are outstanding.
//!
//! Live searches only share the frozen graph and the cost model, so a
//! host that wants to may advance them in parallel; this implementation
//! steps them sequentially.

use std::fmt;
use std::sync::Arc;

use crate::graph::{GridGraph, NodeKey};
use crate::nav::client::{AStarClient, ClientState, Path};
use crate::nav::cost::CostModel;
use crate::nav::search::AStarSearch;

/// Handle to a client owned by an [`AStarManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientHandle(usize);

/// Admission-controlled scheduler for many incremental searches.
pub struct AStarManager {
    graph: Arc<GridGraph>,
    costs: Arc<dyn CostModel>,
    clients: Vec<AStarClient>,
    live: Vec<ClientHandle>,
    max_live: usize,
}

impl AStarManager {
    /// Concurrency ceiling used when none is configured.
    pub const DEFAULT_MAX_LIVE: usize = 400;

    /// Create a scheduler over a frozen graph.
    #[must_use]
    pub fn new(graph: Arc<GridGraph>, costs: Arc<dyn CostModel>) -> Self {
        Self {
            graph,
            costs,
            clients: Vec::new(),
            live: Vec::new(),
            max_live: Self::DEFAULT_MAX_LIVE,
        }
    }

    /// Set the live-search ceiling. Clamped to at least one slot, since a
    /// zero ceiling would starve every request.
    #[must_use]
    pub fn with_max_live(mut self, max_live: usize) -> Self {
        self.max_live = max_live.max(1);
        self
    }

    /// Register a request; the handle stays valid for the manager's life.
    pub fn create_client(&mut self, start: NodeKey, end: NodeKey) -> ClientHandle {
        let handle = ClientHandle(self.clients.len());
        self.clients.push(AStarClient::new(start, end));
        handle
    }

    /// One scheduler tick: admit, advance, harvest.
    pub fn step(&mut self) {
        // Admission: registration order, while slots remain.
        for index in 0..self.clients.len() {
            if self.live.len() >= self.max_live {
                break;
            }
            let client = &mut self.clients[index];
            if client.state() == ClientState::NotStarted {
                let search = AStarSearch::new(
                    Arc::clone(&self.graph),
                    client.start(),
                    client.end(),
                    Arc::clone(&self.costs),
                );
                client.begin(search);
                self.live.push(ClientHandle(index));
            }
        }

        // Advance each live search one relaxation round and cache paths
        // for the ones that went terminal.
        for i in 0..self.live.len() {
            let ClientHandle(index) = self.live[i];
            let client = &mut self.clients[index];
            client.step();
            if client.is_finished() {
                client.cache_path(&self.graph);
            }
        }

        let clients = &self.clients;
        self.live
            .retain(|&ClientHandle(index)| !clients[index].is_finished());
    }

    /// Borrow a client by handle.
    #[must_use]
    pub fn client(&self, handle: ClientHandle) -> Option<&AStarClient> {
        self.clients.get(handle.0)
    }

    /// The shared graph searches run over.
    #[must_use]
    pub fn graph(&self) -> &GridGraph {
        &self.graph
    }

    /// Whether the request has been admitted.
    #[must_use]
    pub fn is_started(&self, handle: ClientHandle) -> bool {
        self.clients.get(handle.0).is_some_and(|c| c.is_started())
    }

    /// Whether the request's search is terminal (possibly not yet
    /// harvested this tick).
    #[must_use]
    pub fn is_finished(&self, handle: ClientHandle) -> bool {
        self.clients.get(handle.0).is_some_and(|c| c.is_finished())
    }

    /// Whether the request has its path cached and ready to take.
    #[must_use]
    pub fn is_resolved(&self, handle: ClientHandle) -> bool {
        self.clients
            .get(handle.0)
            .is_some_and(|c| c.state() == ClientState::Finished)
    }

    /// Re-aim an unadmitted request's origin.
    pub fn set_start(&mut self, handle: ClientHandle, start: NodeKey) {
        if let Some(client) = self.clients.get_mut(handle.0) {
            client.set_start(start);
        }
    }

    /// Move a finished request's path out; yields once.
    pub fn take_path(&mut self, handle: ClientHandle) -> Option<Path> {
        self.clients.get_mut(handle.0).and_then(|c| c.take_path())
    }

    /// Withdraw a request, releasing its search slot this tick.
    pub fn cancel(&mut self, handle: ClientHandle) {
        if let Some(client) = self.clients.get_mut(handle.0) {
            client.cancel();
        }
        self.live.retain(|&h| h != handle);
    }

    /// Searches currently being advanced.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Registered requests not yet admitted.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.clients
            .iter()
            .filter(|c| c.state() == ClientState::NotStarted)
            .count()
    }

    /// Requests with a cached (possibly empty) path.
    #[must_use]
    pub fn finished_count(&self) -> usize {
        self.clients
            .iter()
            .filter(|c| c.state() == ClientState::Finished)
            .count()
    }

    /// Total registered requests.
    #[must_use]
    pub fn client_count(&self) -> usize {
        self.clients.len()
    }
}

impl fmt::Debug for AStarManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AStarManager")
            .field("clients", &self.clients.len())
            .field("live", &self.live.len())
            .field("max_live", &self.max_live)
            .finish()
    }
}
