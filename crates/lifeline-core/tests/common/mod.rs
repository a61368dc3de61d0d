// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs, dead_code)]

use std::collections::BTreeMap;

use lifeline_core::{EventGraph, EventId};

/// Walks a sampled graph from its unique head along successor edges and
/// returns the node ids in chain order.
///
/// Sampled graphs are single chains by construction (every commit links
/// from the previously committed node), so this asserts the path shape as
/// it walks.
pub fn chain_order(graph: &EventGraph) -> Vec<EventId> {
    if graph.is_empty() {
        return Vec::new();
    }
    let mut indegree: BTreeMap<EventId, usize> =
        graph.nodes().map(|node| (node.id(), 0)).collect();
    for (_, to) in graph.to_edge_list(false) {
        *indegree.get_mut(&to).expect("edge target registered") += 1;
    }
    let heads: Vec<EventId> = indegree
        .iter()
        .filter(|(_, degree)| **degree == 0)
        .map(|(id, _)| *id)
        .collect();
    assert_eq!(heads.len(), 1, "a sampled graph has exactly one head");

    let mut order = Vec::with_capacity(graph.len());
    let mut current = Some(heads[0]);
    while let Some(id) = current {
        order.push(id);
        let succs: Vec<EventId> = graph.successors(id).collect();
        assert!(succs.len() <= 1, "a sampled graph is a single chain");
        current = succs.first().copied();
    }
    assert_eq!(order.len(), graph.len(), "chain covers every node");
    order
}
