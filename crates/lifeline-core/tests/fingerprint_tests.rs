// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]

use std::collections::BTreeMap;

use lifeline_core::demo::timelines::reference_timelines;
use lifeline_core::{
    attribute_features, attribute_weight, fingerprint, fingerprint_with, wl_refine, AttrValue,
    EventGraph, EventNode,
};

/// Builds a fixed three-event chain with one attribute-carrying node.
/// Every call produces fresh node ids but identical content.
fn school_chain() -> EventGraph {
    let mut graph = EventGraph::new();
    let a = EventNode::with_attributes(
        "started_school",
        BTreeMap::from([
            ("age".to_owned(), AttrValue::Int(6)),
            ("education_level".to_owned(), AttrValue::Str("primary".to_owned())),
        ]),
    );
    let b = EventNode::new("finished_school");
    let c = EventNode::new("started_work");
    let (ia, ib, ic) = (a.id(), b.id(), c.id());
    for node in [a, b, c] {
        graph.add_node(node).expect("fresh ids");
    }
    graph.add_edge(ia, ib).expect("a -> b");
    graph.add_edge(ib, ic).expect("b -> c");
    graph
}

#[test]
fn identical_content_gives_bit_identical_fingerprints() {
    // Two independent builds share no node ids, only structure and content.
    let first = fingerprint(&school_chain());
    let second = fingerprint(&school_chain());
    assert_eq!(first, second);
}

#[test]
fn reference_timelines_fingerprint_deterministically() {
    let once = reference_timelines().expect("fixtures build");
    let twice = reference_timelines().expect("fixtures build");
    for (a, b) in once.iter().zip(&twice) {
        assert_eq!(fingerprint(a), fingerprint(b));
    }
}

#[test]
fn an_added_edge_changes_the_vector() {
    let timelines = reference_timelines().expect("fixtures build");
    // g1 is g0 plus one extra edge; everything else is identical.
    let base = fingerprint(&timelines[0]);
    let variant = fingerprint(&timelines[1]);
    assert_ne!(base, variant);
}

#[test]
fn every_variant_is_distinguishable_from_the_base() {
    let timelines = reference_timelines().expect("fixtures build");
    let base = fingerprint(&timelines[0]);
    for variant in &timelines[1..] {
        assert_ne!(base, fingerprint(variant));
    }
}

#[test]
fn a_changed_attribute_value_changes_the_vector() {
    let plain = school_chain();

    let mut altered = EventGraph::new();
    let a = EventNode::with_attributes(
        "started_school",
        BTreeMap::from([
            ("age".to_owned(), AttrValue::Int(7)),
            ("education_level".to_owned(), AttrValue::Str("primary".to_owned())),
        ]),
    );
    let b = EventNode::new("finished_school");
    let c = EventNode::new("started_work");
    let (ia, ib, ic) = (a.id(), b.id(), c.id());
    for node in [a, b, c] {
        altered.add_node(node).expect("fresh ids");
    }
    altered.add_edge(ia, ib).expect("a -> b");
    altered.add_edge(ib, ic).expect("b -> c");

    assert_ne!(fingerprint(&plain), fingerprint(&altered));
}

#[test]
fn label_history_keeps_every_round() {
    let graph = school_chain();
    let history = wl_refine(&graph, 3);
    assert_eq!(history.len(), 4);
    for round in &history {
        assert_eq!(round.len(), graph.len());
    }
}

#[test]
fn round_zero_labels_ignore_topology() {
    // Same multiset of event types, different edges: round 0 must agree.
    let chain = school_chain();

    let mut star = EventGraph::new();
    let a = EventNode::new("started_school");
    let b = EventNode::new("finished_school");
    let c = EventNode::new("started_work");
    let (ia, ib, ic) = (a.id(), b.id(), c.id());
    for node in [a, b, c] {
        star.add_node(node).expect("fresh ids");
    }
    star.add_edge(ia, ib).expect("a -> b");
    star.add_edge(ia, ic).expect("a -> c");

    let labels = |graph: &EventGraph| -> Vec<u64> {
        let mut initial: Vec<u64> = wl_refine(graph, 0)[0].values().copied().collect();
        initial.sort_unstable();
        initial
    };
    // Attribute-free comparison: only event types feed round 0.
    let chain_labels = labels(&chain);
    let star_labels = labels(&star);
    assert_eq!(chain_labels, star_labels);

    // Later rounds see the differing topology.
    let deep = |graph: &EventGraph| -> Vec<u64> {
        let mut last: Vec<u64> = wl_refine(graph, 2)
            .last()
            .expect("history is non-empty")
            .values()
            .copied()
            .collect();
        last.sort_unstable();
        last
    };
    assert_ne!(deep(&chain), deep(&star));
}

#[test]
fn activations_are_presence_bits_or_attribute_weights() {
    let graph = school_chain();
    let weights: Vec<f32> = attribute_features(&graph)
        .into_iter()
        .map(|(_, weight)| weight)
        .collect();
    let vector = fingerprint_with(&graph, 256, 3);
    for value in vector.as_slice() {
        assert!(
            *value == 0.0 || *value == 1.0 || weights.contains(value),
            "unexpected activation {value}"
        );
    }
}

#[test]
fn attribute_features_pair_hashes_with_name_weights() {
    let graph = school_chain();
    let features = attribute_features(&graph);
    assert_eq!(features.len(), 2);
    assert!(features
        .iter()
        .any(|(_, weight)| *weight == attribute_weight("age")));
    assert!(features
        .iter()
        .any(|(_, weight)| *weight == attribute_weight("education_level")));
}

#[test]
fn dimension_bounds_every_bucket() {
    let graph = school_chain();
    for dims in [8_usize, 64, 1024] {
        let vector = fingerprint_with(&graph, dims, 3);
        assert_eq!(vector.dims(), dims);
    }
}

#[test]
fn node_ids_do_not_leak_into_labels() {
    // Two single-node graphs of the same type must agree on every round
    // even though their ids differ.
    let build = || {
        let mut graph = EventGraph::new();
        let node = EventNode::new("won_award");
        let id = node.id();
        graph.add_node(node).expect("fresh id");
        (graph, id)
    };
    let (graph_a, id_a) = build();
    let (graph_b, id_b) = build();
    assert_ne!(id_a, id_b);

    let rounds_a = wl_refine(&graph_a, 3);
    let rounds_b = wl_refine(&graph_b, 3);
    for (round_a, round_b) in rounds_a.iter().zip(&rounds_b) {
        assert_eq!(round_a[&id_a], round_b[&id_b]);
    }
}
