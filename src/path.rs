//! Dotted-name segmentation and navigational model paths.
//!
//! Two path flavors live here:
//!
//! - [`split_fqn`] breaks a dotted fully-qualified name into simple-name
//!   segments. Package separators and nested-class separators are not
//!   distinguished (both use `.`), a deliberate simplification that carries
//!   into the shape of the emitted tree.
//! - [`ModelPath`] is a root-first sequence of simple names navigating a
//!   previously emitted document. It is the sole input the resolver accepts.

use serde::{Deserialize, Serialize};

/// Split a dotted fully-qualified name into its simple-name segments.
///
/// No validation beyond what the caller does; an input without dots yields a
/// single segment.
pub fn split_fqn(fqn: &str) -> Vec<&str> {
    fqn.split('.').collect()
}

/// A navigational path into an emitted model document.
///
/// Segments run from the document root down to a leaf. Segments never contain
/// `.` (emission normalizes dots away), so the `Display`/`FromStr` round-trip
/// over `.` is unambiguous.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelPath(Vec<String>);

impl ModelPath {
    /// Create an empty path.
    pub fn new() -> Self {
        ModelPath(Vec::new())
    }

    /// The path segments, root first.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the path has no segments.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The leaf segment, if any.
    pub fn leaf(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Append a segment.
    pub fn push(&mut self, segment: impl Into<String>) {
        self.0.push(segment.into());
    }

    /// The path without its last `n` segments.
    pub fn ancestor(&self, n: usize) -> ModelPath {
        let keep = self.0.len().saturating_sub(n);
        ModelPath(self.0[..keep].to_vec())
    }

    /// The segment `n` levels above the leaf (0 = leaf itself).
    pub fn segment_from_leaf(&self, n: usize) -> Option<&str> {
        self.0
            .len()
            .checked_sub(n + 1)
            .map(|i| self.0[i].as_str())
    }
}

impl std::fmt::Display for ModelPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

impl std::str::FromStr for ModelPath {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(ModelPath::new());
        }
        Ok(ModelPath(s.split('.').map(str::to_string).collect()))
    }
}

impl FromIterator<String> for ModelPath {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        ModelPath(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<&'a str> for ModelPath {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        ModelPath(iter.into_iter().map(str::to_string).collect())
    }
}

// ============================================================================
// Tests
// ============================================================================
