// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Vector-index seam for lifeline fingerprints.
//!
//! `lifeline-index` defines the [`VectorIndex`] trait — the only surface the
//! core pipeline needs from a nearest-neighbor store — and ships
//! [`MemoryIndex`], an in-memory cosine-similarity tier sufficient for tests
//! and local experimentation. Real backing stores (managed vector databases)
//! implement the same trait; their connection lifecycle is explicitly not
//! this crate's concern.
//!
//! # Absence Semantics
//!
//! Querying an empty index returns an empty ranking — this is **not** an
//! error. Error variants are reserved for contract violations, currently
//! only dimension mismatches between a stored vector and an incoming one.
//!
//! # Determinism Invariant
//!
//! Rankings are fully ordered: ties on score break by id, so equal inputs
//! always produce identical result lists.
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
    clippy::module_name_repetitions
)]

mod memory;
pub use memory::MemoryIndex;

use lifeline_core::Fingerprint;
use thiserror::Error;

/// Errors raised by index operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    /// An incoming vector's dimension does not match the index's.
    #[error("dimension mismatch: index holds {expected}, got {actual}")]
    DimensionMismatch {
        /// Dimension the index was created with.
        expected: usize,
        /// Dimension of the offending vector.
        actual: usize,
    },
}

/// One ranked query result.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    /// Identifier the vector was upserted under.
    pub id: String,
    /// Cosine similarity against the query vector.
    pub score: f32,
    /// Metadata stored alongside the vector, if any.
    pub metadata: Option<serde_json::Value>,
}

/// Nearest-neighbor store for fingerprints.
///
/// The trait is intentionally synchronous and minimal: the core pipeline
/// only ever produces a vector and asks for a ranking. Upserting an id that
/// already exists replaces its vector and metadata.
pub trait VectorIndex {
    /// Inserts or replaces one fingerprint under `id`.
    ///
    /// # Errors
    /// [`IndexError::DimensionMismatch`] when the vector's dimension does
    /// not match the index's; the index is left unchanged.
    fn upsert(
        &mut self,
        id: &str,
        fingerprint: &Fingerprint,
        metadata: Option<serde_json::Value>,
    ) -> Result<(), IndexError>;

    /// Returns up to `top_k` stored entries ranked by descending cosine
    /// similarity to `fingerprint`.
    ///
    /// # Errors
    /// [`IndexError::DimensionMismatch`] when the query vector's dimension
    /// does not match the index's.
    fn query(&self, fingerprint: &Fingerprint, top_k: usize) -> Result<Vec<Match>, IndexError>;

    /// Upserts a batch of `(id, fingerprint)` pairs sharing one metadata
    /// value, stopping at the first failure.
    ///
    /// # Errors
    /// As [`VectorIndex::upsert`].
    fn upsert_all<'a>(
        &mut self,
        entries: impl IntoIterator<Item = (&'a str, &'a Fingerprint)>,
        metadata: Option<serde_json::Value>,
    ) -> Result<(), IndexError>
    where
        Self: Sized,
    {
        for (id, fingerprint) in entries {
            self.upsert(id, fingerprint, metadata.clone())?;
        }
        Ok(())
    }
}

/// Cosine similarity of two equal-length vectors.
///
/// Returns `0.0` when either vector has (near-)zero magnitude; the caller
/// is responsible for matching dimensions.
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "dimension mismatch");
    let mut dot = 0.0_f32;
    let mut norm_a = 0.0_f32;
    let mut norm_b = 0.0_f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    let magnitude = norm_a.sqrt() * norm_b.sqrt();
    if magnitude <= f32::EPSILON {
        return 0.0;
    }
    dot / magnitude
}
