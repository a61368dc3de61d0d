//! Identifier and hashing utilities.
use uuid::Uuid;

/// Opaque identifier for a single event node.
///
/// Identifiers are UUID v4 values: globally unique, never reused, and never
/// derived from node content. Deriving identity from content would make two
/// same-typed events in one timeline collide, so the content-addressed id
/// scheme used elsewhere in this workspace does not apply here.
///
/// Ordering is the lexicographic order of the underlying 16 bytes, which is
/// what keeps `BTreeMap`-backed graph iteration deterministic for a given
/// set of nodes.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct EventId(Uuid);

impl EventId {
    /// Draws a fresh, globally unique identifier.
    #[must_use]
    pub fn fresh() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID, e.g. one read back from storage.
    pub const fn from_uuid(raw: Uuid) -> Self {
        Self(raw)
    }

    /// Returns the underlying UUID.
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Truncated BLAKE3 digest of `bytes`: the first eight digest bytes,
/// little-endian.
///
/// Seed-free and stable across runs and platforms, so the same input always
/// lands in the same feature bucket. Every caller tolerates collisions —
/// feature hashing is lossy by design.
pub fn stable_hash64(bytes: &[u8]) -> u64 {
    let digest = blake3::hash(bytes);
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest.as_bytes()[..8]);
    u64::from_le_bytes(head)
}
