// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Mutable DAG of life events with acyclicity enforced on every mutation.
//!
//! Determinism contract
//! - Nodes and successor sets live in `BTreeMap`/`BTreeSet`, so every
//!   iteration surface (`nodes`, `successors`, `to_edge_list`) yields a
//!   stable order for a given id set.
//! - Every failing operation leaves the graph untouched: all checks run
//!   before the first mutation, and no operation partially commits.
//!
//! Edge direction encodes temporal/causal precedence: `u → v` records
//! event `u` as preceding event `v`. The cycle check is a plain iterative
//! depth-first reachability search — graphs stay small (hundreds of nodes)
//! and are grown incrementally, so no memoization is kept.
use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

use crate::ident::EventId;
use crate::node::EventNode;

/// Errors raised by [`EventGraph`] mutations.
///
/// All variants are programmer/input errors raised synchronously at the
/// point of violation; none are retried internally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// A node with the same identifier is already registered.
    #[error("duplicate identifier: {0}")]
    DuplicateIdentifier(EventId),
    /// The referenced node has not been registered.
    #[error("node not found: {0}")]
    NotFound(EventId),
    /// The referenced edge does not exist.
    #[error("edge not found: {from} -> {to}")]
    EdgeNotFound {
        /// Source endpoint of the missing edge.
        from: EventId,
        /// Target endpoint of the missing edge.
        to: EventId,
    },
    /// Rejected edge from a node to itself.
    #[error("self loop rejected on {0}")]
    SelfLoop(EventId),
    /// The edge would close a directed cycle.
    #[error("cycle violation: {to} already reaches {from}")]
    CycleViolation {
        /// Source of the rejected edge.
        from: EventId,
        /// Target of the rejected edge.
        to: EventId,
    },
}

/// Directed acyclic graph of [`EventNode`]s keyed by [`EventId`].
///
/// Owns the node records and the adjacency relation (successor sets).
/// Invariants, upheld by every mutation:
/// 1. every id appearing as a key or adjacency target is a registered node;
/// 2. the adjacency relation has no cycles, no self-loops, and set-idempotent
///    edges;
/// 3. node identifiers are unique — re-adding an existing id fails.
#[derive(Debug, Clone, Default)]
pub struct EventGraph {
    nodes: BTreeMap<EventId, EventNode>,
    succs: BTreeMap<EventId, BTreeSet<EventId>>,
}

impl EventGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a node and its empty successor set.
    ///
    /// # Errors
    /// [`GraphError::DuplicateIdentifier`] if `node.id()` is already present.
    pub fn add_node(&mut self, node: EventNode) -> Result<(), GraphError> {
        let id = node.id();
        if self.nodes.contains_key(&id) {
            return Err(GraphError::DuplicateIdentifier(id));
        }
        self.nodes.insert(id, node);
        self.succs.insert(id, BTreeSet::new());
        Ok(())
    }

    /// Deletes a node, its outbound successor set, and every inbound edge
    /// referencing it (O(V) scan over the remaining successor sets).
    ///
    /// # Errors
    /// [`GraphError::NotFound`] if `id` was never registered.
    pub fn remove_node(&mut self, id: EventId) -> Result<EventNode, GraphError> {
        let node = self.nodes.remove(&id).ok_or(GraphError::NotFound(id))?;
        self.succs.remove(&id);
        for set in self.succs.values_mut() {
            set.remove(&id);
        }
        Ok(node)
    }

    /// Inserts the directed edge `from → to`.
    ///
    /// Inserting an edge that already exists is a no-op (set membership is
    /// idempotent). All checks run before any mutation.
    ///
    /// # Errors
    /// - [`GraphError::NotFound`] if either endpoint is unregistered.
    /// - [`GraphError::SelfLoop`] if `from == to`.
    /// - [`GraphError::CycleViolation`] if `from` is already reachable from
    ///   `to`, i.e. the edge would close a directed cycle.
    pub fn add_edge(&mut self, from: EventId, to: EventId) -> Result<(), GraphError> {
        if !self.nodes.contains_key(&from) {
            return Err(GraphError::NotFound(from));
        }
        if !self.nodes.contains_key(&to) {
            return Err(GraphError::NotFound(to));
        }
        if from == to {
            return Err(GraphError::SelfLoop(from));
        }
        if self.reaches(to, from) {
            return Err(GraphError::CycleViolation { from, to });
        }
        self.succs.entry(from).or_default().insert(to);
        Ok(())
    }

    /// Removes the edge `from → to` if it exists; absent edges are ignored.
    pub fn remove_edge(&mut self, from: EventId, to: EventId) {
        if let Some(set) = self.succs.get_mut(&from) {
            set.remove(&to);
        }
    }

    /// Splits the edge `u → v` by routing it through `node`: registers the
    /// node, then replaces `u → v` with `u → node` and `node → v`.
    ///
    /// The replacement cannot itself create a cycle — the new node has no
    /// other incident edges, and any path from `v` back to it would have
    /// required a pre-existing `v → … → u` path, which the acyclicity
    /// invariant rules out.
    ///
    /// # Errors
    /// - [`GraphError::EdgeNotFound`] if the edge `u → v` does not exist.
    /// - [`GraphError::DuplicateIdentifier`] if `node.id()` is already
    ///   registered; the graph is left unchanged.
    pub fn insert_between(
        &mut self,
        u: EventId,
        v: EventId,
        node: EventNode,
    ) -> Result<(), GraphError> {
        if !self.has_edge(u, v) {
            return Err(GraphError::EdgeNotFound { from: u, to: v });
        }
        let w = node.id();
        self.add_node(node)?;
        self.add_edge(u, w)?;
        self.add_edge(w, v)?;
        self.remove_edge(u, v);
        Ok(())
    }

    /// True when `goal` is in the forward closure of `start` (including
    /// `start` itself).
    ///
    /// Iterative depth-first search with a visited set; work is bounded by
    /// O(V + E).
    #[must_use]
    pub fn reaches(&self, start: EventId, goal: EventId) -> bool {
        let mut visited: BTreeSet<EventId> = BTreeSet::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if current == goal {
                return true;
            }
            if !visited.insert(current) {
                continue;
            }
            for succ in self.successors(current) {
                if !visited.contains(&succ) {
                    stack.push(succ);
                }
            }
        }
        false
    }

    /// Direct successors of `id`, in id order; empty for unknown ids.
    pub fn successors(&self, id: EventId) -> impl Iterator<Item = EventId> + '_ {
        self.succs.get(&id).into_iter().flatten().copied()
    }

    /// True when the edge `from → to` exists.
    #[must_use]
    pub fn has_edge(&self, from: EventId, to: EventId) -> bool {
        self.succs.get(&from).is_some_and(|set| set.contains(&to))
    }

    /// Returns a shared reference to a node when it exists.
    #[must_use]
    pub fn node(&self, id: EventId) -> Option<&EventNode> {
        self.nodes.get(&id)
    }

    /// True when `id` is a registered node.
    #[must_use]
    pub fn contains(&self, id: EventId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// All registered nodes, in id order.
    pub fn nodes(&self) -> impl Iterator<Item = &EventNode> {
        self.nodes.values()
    }

    /// Number of registered nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Total number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.succs.values().map(BTreeSet::len).sum()
    }

    /// Materializes all edges as `(from, to)` pairs.
    ///
    /// With `sort`, pairs are ordered by the string representation of their
    /// endpoints — the stable order required for reproducible serialization
    /// and visualization downstream.
    #[must_use]
    pub fn to_edge_list(&self, sort: bool) -> Vec<(EventId, EventId)> {
        let mut edges: Vec<(EventId, EventId)> = self
            .succs
            .iter()
            .flat_map(|(from, set)| set.iter().map(|to| (*from, *to)))
            .collect();
        if sort {
            edges.sort_by_key(|(from, to)| (from.to_string(), to.to_string()));
        }
        edges
    }
}
