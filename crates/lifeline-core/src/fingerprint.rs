// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Weisfeiler–Lehman-style structural fingerprints.
//!
//! A finished [`EventGraph`] is reduced to a fixed-dimension activation
//! vector in two passes that scatter into the same buckets:
//!
//! 1. **Structure** — every node starts with `stable_hash64(event_type)`
//!    and is refined for a fixed number of rounds; each round hashes the
//!    canonical signature (own label, successor labels sorted ascending),
//!    so labels absorb increasingly distant neighborhood structure. Every
//!    round's full label map (0 through `rounds`) contributes, and each
//!    label sets its bucket to `1.0` — presence, not count.
//! 2. **Attributes** — every `(event type, attribute name, value)` triple
//!    hashes to a bucket that is *overwritten* with the attribute's fixed
//!    importance weight (last-write-wins on collision).
//!
//! Determinism contract
//! - All hashing is seed-free BLAKE3 over canonical little-endian bytes
//!   with 8-byte length prefixes; neighbor label lists are sorted before
//!   encoding. Identical graphs (topology, event types, attributes) yield
//!   bit-identical vectors regardless of node ids or build order.
//! - Bucket collisions are silently tolerated; the encoding is lossy by
//!   design and fingerprinting never fails on a well-formed graph.
use std::collections::BTreeMap;

use once_cell::sync::Lazy;

use crate::graph::EventGraph;
use crate::ident::{stable_hash64, EventId};

/// Default output vector dimension.
pub const DEFAULT_DIMS: usize = 1024;

/// Default number of label-refinement rounds.
pub const DEFAULT_ROUNDS: usize = 3;

/// Weight applied to attribute names missing from the table.
const DEFAULT_ATTRIBUTE_WEIGHT: f32 = 0.25;

/// Importance weights for attribute features, keyed by attribute name.
static ATTRIBUTE_WEIGHTS: Lazy<BTreeMap<&'static str, f32>> = Lazy::new(|| {
    BTreeMap::from([
        ("age", 0.5),
        ("time", 0.25),
        ("education_level", 0.75),
        ("industry", 0.75),
        ("position", 0.5),
        ("company", 0.75),
        ("city", 0.75),
        ("country", 0.75),
        ("hobby", 0.5),
        ("university", 0.75),
    ])
});

/// The importance weight used for features of the named attribute.
#[must_use]
pub fn attribute_weight(name: &str) -> f32 {
    ATTRIBUTE_WEIGHTS
        .get(name)
        .copied()
        .unwrap_or(DEFAULT_ATTRIBUTE_WEIGHT)
}

/// Fixed-length dense activation vector summarizing one graph.
///
/// Positions are hash buckets, so the vector is order-significant and only
/// comparable against vectors of the same dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct Fingerprint {
    values: Vec<f32>,
}

impl Fingerprint {
    /// Vector dimension.
    #[must_use]
    pub fn dims(&self) -> usize {
        self.values.len()
    }

    /// The activations as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    /// Consumes the fingerprint, yielding the raw vector.
    #[must_use]
    pub fn into_vec(self) -> Vec<f32> {
        self.values
    }
}

/// Iteratively refines per-node structural labels.
///
/// Returns the full label map of every round, index 0 (initial labels)
/// through index `rounds`. Neighbor labels are gathered from each node's
/// *current* successors and sorted ascending before hashing, so the result
/// is independent of enumeration order.
#[must_use]
pub fn wl_refine(graph: &EventGraph, rounds: usize) -> Vec<BTreeMap<EventId, u64>> {
    let mut labels: BTreeMap<EventId, u64> = graph
        .nodes()
        .map(|node| (node.id(), stable_hash64(node.event_type().as_bytes())))
        .collect();
    let mut history = Vec::with_capacity(rounds + 1);
    history.push(labels.clone());

    for _ in 0..rounds {
        let mut next = BTreeMap::new();
        for (id, own) in &labels {
            let mut neighbors: Vec<u64> = graph
                .successors(*id)
                .filter_map(|succ| labels.get(&succ).copied())
                .collect();
            neighbors.sort_unstable();

            let mut signature = Vec::with_capacity(16 + neighbors.len() * 8);
            signature.extend_from_slice(&own.to_le_bytes());
            signature.extend_from_slice(&(neighbors.len() as u64).to_le_bytes());
            for label in neighbors {
                signature.extend_from_slice(&label.to_le_bytes());
            }
            next.insert(*id, stable_hash64(&signature));
        }
        labels = next;
        history.push(labels.clone());
    }
    history
}

/// Hashes every `(event type, attribute name, attribute value)` triple a
/// node carries, paired with the attribute's importance weight.
#[must_use]
pub fn attribute_features(graph: &EventGraph) -> Vec<(u64, f32)> {
    let mut features = Vec::new();
    for node in graph.nodes() {
        for (name, value) in node.attributes() {
            let mut buf = Vec::new();
            write_str(&mut buf, node.event_type());
            write_str(&mut buf, name);
            value.write_canonical(&mut buf);
            features.push((stable_hash64(&buf), attribute_weight(name)));
        }
    }
    features
}

/// Reduces `graph` to a [`Fingerprint`] of [`DEFAULT_DIMS`] buckets using
/// [`DEFAULT_ROUNDS`] refinement rounds.
#[must_use]
pub fn fingerprint(graph: &EventGraph) -> Fingerprint {
    fingerprint_with(graph, DEFAULT_DIMS, DEFAULT_ROUNDS)
}

/// Reduces `graph` to a [`Fingerprint`] of `dims` buckets using `rounds`
/// refinement rounds.
#[must_use]
pub fn fingerprint_with(graph: &EventGraph, dims: usize, rounds: usize) -> Fingerprint {
    assert!(dims > 0, "fingerprint dimension must be positive");
    let mut values = vec![0.0_f32; dims];

    // Structural contribution: presence across all rounds.
    for round in wl_refine(graph, rounds) {
        for label in round.values() {
            values[(label % dims as u64) as usize] = 1.0;
        }
    }

    // Attribute contribution: weight overwrite, last write wins.
    for (feature, weight) in attribute_features(graph) {
        values[(feature % dims as u64) as usize] = weight;
    }

    Fingerprint { values }
}

fn write_str(out: &mut Vec<u8>, text: &str) {
    out.extend_from_slice(&(text.len() as u64).to_le_bytes());
    out.extend_from_slice(text.as_bytes());
}
