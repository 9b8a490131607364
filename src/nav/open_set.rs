//! Priority frontier for A* searches

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use rustc_hash::FxHashSet;

use crate::graph::NodeKey;

/// A pending frontier node with the scores it was inserted under.
///
/// Entries keep their insert-time priority: improving a pending node's
/// scores updates the search record but not its heap position.
#[derive(Debug, Clone, Copy)]
pub struct OpenEntry {
    pub key: NodeKey,
    pub f_score: f32,
    pub g_score: f32,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for a min-heap: lowest f score first, ties broken by
        // lowest g score.
        other
            .f_score
            .total_cmp(&self.f_score)
            .then_with(|| other.g_score.total_cmp(&self.g_score))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Discovered-but-unexpanded nodes ordered by estimated total cost.
#[derive(Debug, Default)]
pub struct OpenSet {
    heap: BinaryHeap<OpenEntry>,
    members: FxHashSet<NodeKey>,
}

impl OpenSet {
    /// Create an empty frontier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a key with its current scores.
    ///
    /// Callers check [`has_key`](Self::has_key) first; a key added twice
    /// would occupy two heap slots.
    pub fn add(&mut self, key: NodeKey, f_score: f32, g_score: f32) {
        self.heap.push(OpenEntry {
            key,
            f_score,
            g_score,
        });
        self.members.insert(key);
    }

    /// Remove and return the minimum entry under (f score, g score).
    pub fn dequeue(&mut self) -> Option<OpenEntry> {
        let entry = self.heap.pop()?;
        self.members.remove(&entry.key);
        Some(entry)
    }

    /// The minimum entry without removing it.
    #[must_use]
    pub fn peek(&self) -> Option<&OpenEntry> {
        self.heap.peek()
    }

    /// O(1) membership test for added-but-undequeued keys.
    #[must_use]
    pub fn has_key(&self, key: NodeKey) -> bool {
        self.members.contains(&key)
    }

    /// Number of pending entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether the frontier is exhausted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
