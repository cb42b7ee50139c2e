//! Path-based resolution back to the original elements.
//!
//! A [`Resolver`] takes a navigational [`ModelPath`] into a previously
//! emitted document and reconstructs the identity of the element behind it.
//! It needs a way to look types up by name; that capability is the injected
//! [`TypeRegistry`] seam, not anything built into the codec. Resolution is a
//! pure function of the path plus the registry, so concurrent lookups need no
//! synchronization.
//!
//! Every failure carries the requested path and the reconstructed name that
//! was attempted; a raw lookup miss never escapes untagged.

use crate::error::{MemberKind, ModelError};
use crate::member::{
    classify, denormalize_param_token, MemberDescriptor, DOT_SEPARATOR, DOUBLE_SEPARATOR,
    PATH_SEPARATOR, TOKEN_SEPARATOR,
};
use crate::path::ModelPath;
use crate::store::TypeStore;
use std::collections::BTreeMap;

// ============================================================================
// Registry Seam
// ============================================================================

/// One known type: its name and classified members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeEntry {
    pub fqn: String,
    pub fields: Vec<String>,
    pub methods: Vec<MethodEntry>,
    pub annotations: Vec<String>,
}

impl TypeEntry {
    /// An entry with no members, useful for registering parameter types that
    /// only need to be resolvable by name.
    pub fn named(fqn: impl Into<String>) -> Self {
        TypeEntry {
            fqn: fqn.into(),
            fields: Vec::new(),
            methods: Vec::new(),
            annotations: Vec::new(),
        }
    }
}

/// One declared method: plain name plus parameter type names in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodEntry {
    pub name: String,
    pub param_types: Vec<String>,
}

/// Lookup-by-name capability the resolver depends on.
pub trait TypeRegistry {
    fn lookup_type(&self, fqn: &str) -> Option<TypeEntry>;
}

/// In-memory [`TypeRegistry`].
///
/// Usually built from the same scanned store the document was emitted from,
/// via [`MemoryRegistry::from_store`]; parameter types that were not
/// themselves scanned can be added with [`MemoryRegistry::insert`].
#[derive(Debug, Clone, Default)]
pub struct MemoryRegistry {
    types: BTreeMap<String, TypeEntry>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        MemoryRegistry::default()
    }

    /// Register one type.
    pub fn insert(&mut self, entry: TypeEntry) {
        self.types.insert(entry.fqn.clone(), entry);
    }

    /// Build a registry by classifying every record of a scanned store.
    pub fn from_store(store: &dyn TypeStore) -> Result<Self, ModelError> {
        let mut registry = MemoryRegistry::new();
        for fqn in store.keys() {
            let mut raw = store.get(&fqn);
            raw.sort();
            let mut entry = TypeEntry::named(&fqn);
            for descriptor in &raw {
                match classify(&fqn, descriptor)? {
                    None => {}
                    Some(MemberDescriptor::Field { name }) => entry.fields.push(name),
                    Some(MemberDescriptor::Method { name, param_types }) => {
                        entry.methods.push(MethodEntry { name, param_types })
                    }
                    Some(MemberDescriptor::Annotation { name }) => entry.annotations.push(name),
                }
            }
            registry.insert(entry);
        }
        Ok(registry)
    }
}

impl TypeRegistry for MemoryRegistry {
    fn lookup_type(&self, fqn: &str) -> Option<TypeEntry> {
        self.types.get(fqn).cloned()
    }
}

// ============================================================================
// Resolved Members
// ============================================================================

/// A field resolved back to its owning type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedField {
    pub owner: TypeEntry,
    pub name: String,
}

/// A method resolved back to its owning type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMethod {
    pub owner: TypeEntry,
    pub method: MethodEntry,
}

/// An annotation resolved back to the type it is attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAnnotation {
    pub owner: TypeEntry,
    pub annotation: String,
}

// ============================================================================
// Resolver
// ============================================================================

/// Resolves model paths against a [`TypeRegistry`].
#[derive(Clone, Copy)]
pub struct Resolver<'a> {
    registry: &'a dyn TypeRegistry,
}

impl<'a> Resolver<'a> {
    pub fn new(registry: &'a dyn TypeRegistry) -> Self {
        Resolver { registry }
    }

    /// Resolve a class scope path back to its type.
    ///
    /// The document root segment is dropped, the rest is rejoined with `.`,
    /// and a literal `.$` collapses to `$` (the historical nested-class
    /// escaping; a narrow special case, deliberately not generalized).
    pub fn resolve_type(&self, path: &ModelPath) -> Result<TypeEntry, ModelError> {
        let attempted = reconstruct_fqn(path);
        self.registry
            .lookup_type(&attempted)
            .ok_or_else(|| ModelError::type_not_found(path.clone(), attempted))
    }

    /// Resolve a `fields` leaf path back to its field.
    pub fn resolve_field(&self, path: &ModelPath) -> Result<ResolvedField, ModelError> {
        let leaf = self.expect_leaf_group(path, "fields", MemberKind::Field)?;
        let owner = self.resolve_type(&path.ancestor(2))?;
        if owner.fields.iter().any(|f| f == leaf) {
            let name = leaf.to_string();
            Ok(ResolvedField { owner, name })
        } else {
            Err(ModelError::member_not_found(
                path.clone(),
                MemberKind::Field,
                leaf,
            ))
        }
    }

    /// Resolve a `methods` leaf path back to its method.
    ///
    /// A leaf containing the token separator is split into plain name and
    /// parameter blob; each parameter token is resolved to a type before the
    /// declared method is matched by name and parameter list. A bare leaf
    /// matches the zero-parameter method, or the single method of that name
    /// when it is not overloaded.
    pub fn resolve_method(&self, path: &ModelPath) -> Result<ResolvedMethod, ModelError> {
        let leaf = self.expect_leaf_group(path, "methods", MemberKind::Method)?;
        let owner = self.resolve_type(&path.ancestor(2))?;

        let (name, param_types) = match leaf.split_once(TOKEN_SEPARATOR) {
            Some((name, blob)) => {
                let mut params = Vec::new();
                for token in blob.split(DOUBLE_SEPARATOR) {
                    let param = denormalize_param_token(token);
                    if self.registry.lookup_type(&param).is_none() {
                        return Err(ModelError::type_not_found(path.clone(), param));
                    }
                    params.push(param);
                }
                (name.to_string(), Some(params))
            }
            None => (leaf.to_string(), None),
        };

        let method = match &param_types {
            Some(params) => owner
                .methods
                .iter()
                .find(|m| m.name == name && &m.param_types == params),
            None => owner
                .methods
                .iter()
                .find(|m| m.name == name && m.param_types.is_empty())
                .or_else(|| {
                    let mut named = owner.methods.iter().filter(|m| m.name == name);
                    match (named.next(), named.next()) {
                        (Some(only), None) => Some(only),
                        _ => None,
                    }
                }),
        };

        match method {
            Some(method) => {
                let method = method.clone();
                Ok(ResolvedMethod { owner, method })
            }
            None => Err(ModelError::member_not_found(
                path.clone(),
                MemberKind::Method,
                name,
            )),
        }
    }

    /// Resolve an `annotations` leaf path back to the annotation attached to
    /// its owning type.
    pub fn resolve_annotation(&self, path: &ModelPath) -> Result<ResolvedAnnotation, ModelError> {
        let leaf = self.expect_leaf_group(path, "annotations", MemberKind::Annotation)?;
        let attempted = leaf.replace(PATH_SEPARATOR, DOT_SEPARATOR);
        let owner = self.resolve_type(&path.ancestor(2))?;
        if owner.annotations.iter().any(|a| a == &attempted) {
            Ok(ResolvedAnnotation {
                owner,
                annotation: attempted,
            })
        } else {
            Err(ModelError::member_not_found(
                path.clone(),
                MemberKind::Annotation,
                attempted,
            ))
        }
    }

    /// Check that the leaf sits directly under the expected group scope.
    fn expect_leaf_group<'p>(
        &self,
        path: &'p ModelPath,
        group: &str,
        kind: MemberKind,
    ) -> Result<&'p str, ModelError> {
        let leaf = path.leaf().ok_or_else(|| ModelError::InvalidPath {
            path: path.clone(),
            kind,
            reason: "path is empty".to_string(),
        })?;
        if path.segment_from_leaf(1) != Some(group) {
            return Err(ModelError::InvalidPath {
                path: path.clone(),
                kind,
                reason: format!("leaf is not inside a `{group}` scope"),
            });
        }
        Ok(leaf)
    }
}

/// Rejoin a class scope path into a dotted name, dropping the document root
/// and collapsing `.$` into `$`.
fn reconstruct_fqn(path: &ModelPath) -> String {
    let segments = path.segments();
    let tail: &[String] = if segments.is_empty() {
        &[]
    } else {
        &segments[1..]
    };
    tail.join(DOT_SEPARATOR).replace(".$", "$")
}

// ============================================================================
// Tests
// ============================================================================
