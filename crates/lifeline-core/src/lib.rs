// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! lifeline-core: deterministic synthesis and fingerprinting of life-event
//! timelines.
//!
//! The crate is one pipeline with three load-bearing pieces:
//!
//! 1. [`EventGraph`] — a mutable DAG of [`EventNode`]s that enforces
//!    acyclicity and identifier uniqueness on every mutation.
//! 2. [`sample_graph`] — a rule-constrained stochastic sampler that grows a
//!    graph event-by-event under age, prerequisite, and occurrence-cap
//!    constraints, driven by an explicit seeded [`prng::Prng`].
//! 3. [`fingerprint`] — an iterative neighborhood-hashing (WL-style)
//!    reduction of a finished graph to a fixed-dimension activation vector
//!    for nearest-neighbor indexing.
//!
//! # Determinism Invariant
//!
//! Identical graphs produce bit-identical fingerprints, and identical
//! (seed, rules, config) triples replay identical sampling runs. All hash
//! material goes through seed-free BLAKE3 ([`stable_hash64`]), all
//! observable iteration happens over ordered containers, and randomness is
//! only ever drawn from the caller-injected stream. Nothing in this crate
//! reads ambient entropy except [`EventId::fresh`], which by design feeds
//! node *identity*, never node *content* or hash input.
#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
#![allow(
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::unreadable_literal,
    clippy::missing_const_for_fn,
    clippy::suboptimal_flops,
    clippy::redundant_pub_crate,
    clippy::many_single_char_names,
    clippy::module_name_repetitions,
    clippy::use_self,
    clippy::cast_possible_truncation,
    clippy::cast_lossless
)]

pub mod prng;
pub mod rule;

mod catalog;
mod fingerprint;
mod graph;
mod ident;
mod node;
mod sampler;
pub mod demo;

// Re-exports for stable public API
pub use catalog::{EventCatalog, EventType};
pub use fingerprint::{
    attribute_features, attribute_weight, fingerprint, fingerprint_with, wl_refine, Fingerprint,
    DEFAULT_DIMS, DEFAULT_ROUNDS,
};
pub use graph::{EventGraph, GraphError};
pub use ident::{stable_hash64, EventId};
pub use node::{AttrValue, EventNode};
pub use rule::{AgeBand, Rule, RuleError, RuleSet, RuleSpec};
pub use sampler::{generate_noise_graphs, sample_graph, SamplerConfig};
