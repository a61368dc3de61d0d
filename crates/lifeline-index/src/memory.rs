// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! In-memory index tier.
use std::collections::BTreeMap;

use lifeline_core::Fingerprint;

use crate::{cosine_similarity, IndexError, Match, VectorIndex};

#[derive(Debug, Clone)]
struct Entry {
    values: Vec<f32>,
    metadata: Option<serde_json::Value>,
}

/// In-memory [`VectorIndex`] over a fixed dimension.
///
/// Storage is a `BTreeMap` keyed by id, so iteration (and therefore tie
/// breaking) is deterministic. Query cost is a linear scan — fine for the
/// corpus sizes this tier is meant for.
#[derive(Debug, Clone)]
pub struct MemoryIndex {
    dims: usize,
    entries: BTreeMap<String, Entry>,
}

impl MemoryIndex {
    /// Creates an empty index accepting vectors of `dims` buckets.
    #[must_use]
    pub fn new(dims: usize) -> Self {
        Self {
            dims,
            entries: BTreeMap::new(),
        }
    }

    /// Dimension this index accepts.
    #[must_use]
    pub fn dims(&self) -> usize {
        self.dims
    }

    /// Number of stored vectors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn check_dims(&self, fingerprint: &Fingerprint) -> Result<(), IndexError> {
        if fingerprint.dims() == self.dims {
            Ok(())
        } else {
            Err(IndexError::DimensionMismatch {
                expected: self.dims,
                actual: fingerprint.dims(),
            })
        }
    }
}

impl VectorIndex for MemoryIndex {
    fn upsert(
        &mut self,
        id: &str,
        fingerprint: &Fingerprint,
        metadata: Option<serde_json::Value>,
    ) -> Result<(), IndexError> {
        self.check_dims(fingerprint)?;
        self.entries.insert(
            id.to_owned(),
            Entry {
                values: fingerprint.as_slice().to_vec(),
                metadata,
            },
        );
        Ok(())
    }

    fn query(&self, fingerprint: &Fingerprint, top_k: usize) -> Result<Vec<Match>, IndexError> {
        self.check_dims(fingerprint)?;
        let mut ranked: Vec<Match> = self
            .entries
            .iter()
            .map(|(id, entry)| Match {
                id: id.clone(),
                score: cosine_similarity(fingerprint.as_slice(), &entry.values),
                metadata: entry.metadata.clone(),
            })
            .collect();
        // Descending score; BTreeMap order already breaks score ties by id.
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked.truncate(top_k);
        Ok(ranked)
    }
}
