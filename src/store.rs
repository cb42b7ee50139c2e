//! The scanner-facing store seam.
//!
//! The codec never scans anything itself. An external scanner populates a
//! [`TypeStore`]: one entry per scanned type, keyed by fully-qualified name,
//! holding that type's raw member descriptor strings. The emitter takes a
//! stable snapshot view of the store for exactly one pass; it must not be
//! mutated during emission.

use std::collections::BTreeMap;

/// Read access to a scanned type-element index.
///
/// `keys` may return names in any order; the emitter sorts before use.
/// `get` returns raw, unclassified descriptor strings in any order.
pub trait TypeStore {
    /// All distinct fully-qualified type names in the index.
    fn keys(&self) -> Vec<String>;

    /// Raw member descriptors for one type. Empty for unknown names.
    fn get(&self, fqn: &str) -> Vec<String>;
}

/// In-memory [`TypeStore`] backed by a sorted map.
///
/// The standard store for tests and for callers that assemble scan results
/// by hand.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, Vec<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Insert one type with its raw member descriptors, replacing any
    /// previous entry for the same name.
    pub fn insert<I, S>(&mut self, fqn: impl Into<String>, members: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries
            .insert(fqn.into(), members.into_iter().map(Into::into).collect());
    }

    /// Number of types in the store.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no types.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TypeStore for MemoryStore {
    fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    fn get(&self, fqn: &str) -> Vec<String> {
        self.entries.get(fqn).cloned().unwrap_or_default()
    }
}

// ============================================================================
// Tests
// ============================================================================
