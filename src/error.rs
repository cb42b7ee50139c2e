//! Error types for model emission and resolution.
//!
//! This module provides the unified error type (`ModelError`) covering both
//! directions of the codec:
//! - Emission: malformed descriptors, unwritable sinks
//! - Resolution: type or member lookups that fail against the registry
//!
//! ## Design
//!
//! - **Unified type**: `ModelError` is the single error type on the public API
//! - **Resolution context**: every resolution variant carries the requested
//!   model path and the reconstructed name that was attempted, so a raw lookup
//!   failure never escapes untagged
//! - **No partial output**: emission errors abort the whole run; the caller
//!   never observes a document missing some of its records

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::path::ModelPath;

// ============================================================================
// Member Kind
// ============================================================================

/// The kind of member a resolution was asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Field,
    Method,
    Annotation,
}

impl std::fmt::Display for MemberKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MemberKind::Field => write!(f, "field"),
            MemberKind::Method => write!(f, "method"),
            MemberKind::Annotation => write!(f, "annotation"),
        }
    }
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// Unified error type for the typetree codec.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A raw member descriptor matched none of the classification rules.
    ///
    /// This is a fast-fail: a well-formed scanner never produces one, and the
    /// emitter aborts the whole run rather than silently dropping the record.
    #[error("malformed member descriptor {descriptor:?} on type {fqn}")]
    MalformedDescriptor { fqn: String, descriptor: String },

    /// A record carried an empty fully-qualified name.
    #[error("empty fully-qualified name in type store")]
    EmptyName,

    /// A model path could not be resolved to a type.
    #[error("could not resolve {path} to a type (tried {attempted:?})")]
    TypeNotFound { path: ModelPath, attempted: String },

    /// A model path resolved to an owning type, but the named member is
    /// absent on that type.
    #[error("could not resolve {path} to a {kind} (tried {attempted:?})")]
    MemberNotFound {
        path: ModelPath,
        kind: MemberKind,
        attempted: String,
    },

    /// A model path does not have the shape the resolver expects, e.g. a
    /// field lookup whose leaf does not sit under a `fields` scope.
    #[error("path {path} is not a {kind} path: {reason}")]
    InvalidPath {
        path: ModelPath,
        kind: MemberKind,
        reason: String,
    },

    /// The output sink could not be written.
    #[error("failed to write model to {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ModelError {
    /// Create a malformed-descriptor error.
    pub fn malformed(fqn: impl Into<String>, descriptor: impl Into<String>) -> Self {
        ModelError::MalformedDescriptor {
            fqn: fqn.into(),
            descriptor: descriptor.into(),
        }
    }

    /// Create a type-not-found error.
    pub fn type_not_found(path: ModelPath, attempted: impl Into<String>) -> Self {
        ModelError::TypeNotFound {
            path,
            attempted: attempted.into(),
        }
    }

    /// Create a member-not-found error.
    pub fn member_not_found(path: ModelPath, kind: MemberKind, attempted: impl Into<String>) -> Self {
        ModelError::MemberNotFound {
            path,
            kind,
            attempted: attempted.into(),
        }
    }

    /// Whether this error came from the decode side.
    pub fn is_resolution_failure(&self) -> bool {
        matches!(
            self,
            ModelError::TypeNotFound { .. }
                | ModelError::MemberNotFound { .. }
                | ModelError::InvalidPath { .. }
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
