//! One-pass, prefix-compressed model emission.
//!
//! The emitter walks the store's type names in ascending lexicographic order
//! and keeps the previous record's segment path. For each record it closes
//! the scopes the new path no longer shares, opens the scopes it adds, and
//! emits the class scope with its `fields` / `methods` / `annotations` leaf
//! groups. Because iteration order is the lexicographic order of the full
//! dotted name, any two records sharing a prefix are separated only by
//! records that also share it, so each ancestor scope is opened exactly once
//! across the whole run.
//!
//! Alongside the document the emitter builds a [`ModelIndex`], a persisted
//! bidirectional `fqn <-> path` map, so resolution does not have to depend on
//! a runtime name-lookup capability.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::ModelError;
use crate::member::{classify, normalized_method_name, MemberDescriptor};
use crate::path::{split_fqn, ModelPath};
use crate::scope::{disambiguate, ScopeWriter};
use crate::store::TypeStore;

// ============================================================================
// Document Naming
// ============================================================================

/// The package and root-interface name of an emitted document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentName {
    /// Dotted package prefix; empty for the default package.
    pub package: String,
    /// Simple name of the document's root interface.
    pub name: String,
}

impl DocumentName {
    pub fn new(package: impl Into<String>, name: impl Into<String>) -> Self {
        DocumentName {
            package: package.into(),
            name: name.into(),
        }
    }

    /// Split a destination string of the form
    /// `path/path/package.package.ClassName` into the document name.
    ///
    /// The text before the last `/` is the container directory; the remainder
    /// splits at its last `.` into package prefix and root name. Without a
    /// `.` the package is empty.
    pub fn from_destination(dest: &str) -> Self {
        let dest = dest.trim_end_matches('/');
        let start = dest.rfind('/').map(|i| i + 1).unwrap_or(0);
        match dest.rfind('.').filter(|&d| d >= start) {
            Some(dot) => DocumentName::new(&dest[start..dot], &dest[dot + 1..]),
            None => DocumentName::new("", &dest[start..]),
        }
    }
}

/// The file path a destination string maps to: within the dotted remainder
/// after the container directory, dots become path separators, and the
/// document extension is appended.
pub fn destination_file(dest: &str) -> PathBuf {
    let dest = dest.trim_end_matches('/');
    let start = dest.rfind('/').map(|i| i + 1).unwrap_or(0);
    let (container, dotted) = dest.split_at(start);
    PathBuf::from(format!("{}{}.java", container, dotted.replace('.', "/")))
}

// ============================================================================
// Model Index
// ============================================================================

/// Bidirectional `fqn <-> path` map persisted alongside the document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelIndex {
    /// Type fqn → class scope path.
    types: BTreeMap<String, ModelPath>,
    /// Joined class scope path → type fqn.
    paths: BTreeMap<String, String>,
}

impl ModelIndex {
    fn insert(&mut self, fqn: String, path: ModelPath) {
        self.paths.insert(path.to_string(), fqn.clone());
        self.types.insert(fqn, path);
    }

    /// The class scope path of a type.
    pub fn path_of(&self, fqn: &str) -> Option<&ModelPath> {
        self.types.get(fqn)
    }

    /// The type fqn behind a class scope path.
    pub fn fqn_of(&self, path: &ModelPath) -> Option<&str> {
        self.paths.get(&path.to_string()).map(String::as_str)
    }

    /// Number of types in the index.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Iterate over `(fqn, path)` pairs in fqn order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ModelPath)> {
        self.types.iter().map(|(fqn, path)| (fqn.as_str(), path))
    }
}

/// The result of one emission: the document text plus its index.
#[derive(Debug, Clone)]
pub struct EmittedModel {
    pub document: String,
    pub index: ModelIndex,
}

// ============================================================================
// Serializer
// ============================================================================

/// Emits a scanned [`TypeStore`] as a nested-interface model document.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelSerializer;

impl ModelSerializer {
    pub fn new() -> Self {
        ModelSerializer
    }

    /// Emit the full document (header included) and its index.
    pub fn emit(
        &self,
        store: &dyn TypeStore,
        name: &DocumentName,
    ) -> Result<EmittedModel, ModelError> {
        let mut keys = store.keys();
        keys.sort();
        if keys.is_empty() {
            warn!("type store is empty; emitting an empty model");
        }

        let mut writer = ScopeWriter::new();
        writer.raw_line("//generated using typetree ModelSerializer");
        if !name.package.is_empty() {
            writer.raw_line(&format!("package {};", name.package));
            writer.raw_line("");
        }
        writer.open(&name.name);
        writer.raw_line("");

        let mut index = ModelIndex::default();
        let mut prev_segments: Vec<String> = Vec::new();
        // disambiguated names of the currently open scopes, root first
        let mut open_scopes: Vec<String> = vec![name.name.clone()];

        for fqn in &keys {
            if fqn.is_empty() {
                return Err(ModelError::EmptyName);
            }
            let segments: Vec<String> =
                split_fqn(fqn).into_iter().map(str::to_string).collect();

            // longest common prefix with the previous record
            let shared = segments
                .iter()
                .zip(prev_segments.iter())
                .take_while(|(a, b)| a == b)
                .count();

            for _ in shared..prev_segments.len() {
                writer.close();
                open_scopes.pop();
            }

            // package scopes, then the terminal class scope; each segment is
            // disambiguated against the earlier segments of its own path
            for j in shared..segments.len() {
                let scope_name = disambiguate(&segments[j], &segments[..j]);
                writer.open(&scope_name);
                open_scopes.push(scope_name);
            }

            index.insert(
                fqn.clone(),
                open_scopes.iter().map(String::as_str).collect(),
            );

            self.emit_members(&mut writer, fqn, store)?;
            prev_segments = segments;
        }

        for _ in 0..prev_segments.len() {
            writer.close();
        }
        writer.close();

        let document = writer.into_string();
        debug!(
            "emitted model {}: {} types, {} bytes",
            name.name,
            keys.len(),
            document.len()
        );
        Ok(EmittedModel { document, index })
    }

    /// Emit just the document text.
    pub fn to_document(
        &self,
        store: &dyn TypeStore,
        name: &DocumentName,
    ) -> Result<String, ModelError> {
        Ok(self.emit(store, name)?.document)
    }

    /// Classify one record's members and emit its leaf groups.
    fn emit_members(
        &self,
        writer: &mut ScopeWriter,
        fqn: &str,
        store: &dyn TypeStore,
    ) -> Result<(), ModelError> {
        let mut raw = store.get(fqn);
        raw.sort();

        let mut fields: Vec<String> = Vec::new();
        let mut methods: Vec<String> = Vec::new();
        let mut annotations: Vec<String> = Vec::new();

        for descriptor in &raw {
            match classify(fqn, descriptor)? {
                None => {}
                Some(MemberDescriptor::Field { name }) => fields.push(name),
                Some(MemberDescriptor::Method { name, param_types }) => {
                    // first occurrence keeps the bare name; later collisions
                    // are emitted under the parameter-normalized name
                    if methods.iter().any(|m| *m == name) {
                        methods.push(normalized_method_name(&name, &param_types));
                    } else {
                        methods.push(name);
                    }
                }
                Some(MemberDescriptor::Annotation { name }) => annotations.push(name),
            }
        }

        emit_leaf_group(writer, "fields", &fields);
        emit_leaf_group(writer, "methods", &methods);
        emit_leaf_group(writer, "annotations", &annotations);
        Ok(())
    }

    /// Emit to a destination string of the form
    /// `path/path/package.package.ClassName`.
    ///
    /// Writes the document to `<destination with dots as separators>.java`
    /// and the index sidecar next to it, each published atomically so no
    /// reader ever observes a partial artifact. Returns the document path.
    pub fn save(&self, store: &dyn TypeStore, dest: &str) -> Result<PathBuf, ModelError> {
        let name = DocumentName::from_destination(dest);
        let file_path = destination_file(dest);

        let emitted = self.emit(store, &name)?;

        if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| ModelError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let index_path = file_path.with_extension("paths.json");
        let index_json =
            serde_json::to_string_pretty(&emitted.index).map_err(|e| ModelError::Write {
                path: index_path.clone(),
                source: io::Error::other(e),
            })?;
        write_atomic(&index_path, index_json.as_bytes())?;
        write_atomic(&file_path, emitted.document.as_bytes())?;

        debug!("saved model to {}", file_path.display());
        Ok(file_path)
    }
}

/// Emit one non-empty leaf group; an empty group emits nothing at all.
///
/// Leaf names are disambiguated against the siblings already emitted in the
/// same group, so identifiers within one scope are pairwise distinct.
fn emit_leaf_group(writer: &mut ScopeWriter, group: &str, names: &[String]) {
    if names.is_empty() {
        return;
    }
    writer.open(group);
    let mut emitted: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        let leaf = disambiguate(name, &emitted);
        writer.leaf(&leaf);
        emitted.push(leaf);
    }
    writer.close();
}

/// Write via a temp file in the target directory plus rename, so readers see
/// either the old content or the new content, never a partial write.
fn write_atomic(path: &Path, content: &[u8]) -> Result<(), ModelError> {
    let parent = path.parent().filter(|p| !p.as_os_str().is_empty());
    let mut tmp = NamedTempFile::new_in(parent.unwrap_or_else(|| Path::new(".")))
        .map_err(|source| ModelError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    tmp.write_all(content).map_err(|source| ModelError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tmp.persist(path).map_err(|e| ModelError::Write {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn emit(store: &MemoryStore) -> EmittedModel {
        ModelSerializer::new()
            .emit(store, &DocumentName::new("", "Model"))
            .unwrap()
    }

    mod destination_naming {
        use super::*;

        #[test]
        fn splits_container_package_and_name() {
            let name = DocumentName::from_destination("src/main/java/org.my.project.MyStore");
            assert_eq!(name.package, "org.my.project");
            assert_eq!(name.name, "MyStore");
        }

        #[test]
        fn no_dot_means_default_package() {
            let name = DocumentName::from_destination("out/MyStore");
            assert_eq!(name.package, "");
            assert_eq!(name.name, "MyStore");
        }

        #[test]
        fn trailing_slash_is_trimmed() {
            let name = DocumentName::from_destination("out/org.MyStore/");
            assert_eq!(name.package, "org");
            assert_eq!(name.name, "MyStore");
        }

        #[test]
        fn file_path_replaces_dots() {
            assert_eq!(
                destination_file("src/main/java/org.my.MyStore"),
                PathBuf::from("src/main/java/org/my/MyStore.java")
            );
        }
    }

    mod emission {
        use super::*;

        #[test]
        fn single_record_with_each_member_kind() {
            let mut store = MemoryStore::new();
            store.insert("org.pkg.Foo", ["f1", "m1()", "@Ann"]);
            let model = emit(&store);
            let expected = "\
//generated using typetree ModelSerializer
public interface Model {

    public interface org {
        public interface pkg {
            public interface Foo {
                public interface fields {
                    public interface f1 {}
                }
                public interface methods {
                    public interface m1 {}
                }
                public interface annotations {
                    public interface Ann {}
                }
            }
        }
    }
}
";
            assert_eq!(model.document, expected);
        }

        #[test]
        fn empty_member_list_emits_no_leaf_groups() {
            let mut store = MemoryStore::new();
            store.insert("org.Empty", Vec::<String>::new());
            let model = emit(&store);
            assert!(model.document.contains("public interface Empty {\n"));
            assert!(!model.document.contains("fields"));
            assert!(!model.document.contains("methods"));
            assert!(!model.document.contains("annotations"));
        }

        #[test]
        fn constructor_descriptors_are_dropped_silently() {
            let mut store = MemoryStore::new();
            store.insert("org.Foo", ["<init>(int)", "run()"]);
            let model = emit(&store);
            assert!(model.document.contains("public interface run {}"));
            assert!(!model.document.contains("init"));
        }

        #[test]
        fn malformed_descriptor_aborts_emission() {
            let mut store = MemoryStore::new();
            store.insert("org.Foo", ["good", ""]);
            let err = ModelSerializer::new()
                .emit(&store, &DocumentName::new("", "Model"))
                .unwrap_err();
            assert!(matches!(err, ModelError::MalformedDescriptor { .. }));
        }

        #[test]
        fn shared_prefix_scopes_open_once() {
            let mut store = MemoryStore::new();
            store.insert("org.pkg.A", ["f"]);
            store.insert("org.pkg.B", ["g"]);
            store.insert("org.other.C", ["h"]);
            let model = emit(&store);
            assert_eq!(model.document.matches("public interface org {").count(), 1);
            assert_eq!(model.document.matches("public interface pkg {").count(), 1);
        }

        #[test]
        fn overloads_keep_first_bare_then_normalized() {
            let mut store = MemoryStore::new();
            store.insert("org.Foo", ["run()", "run(java.lang.String)"]);
            let model = emit(&store);
            assert!(model.document.contains("public interface run {}"));
            assert!(model
                .document
                .contains("public interface run_java_lang_String {}"));
        }

        #[test]
        fn duplicate_sibling_leaves_stay_distinct() {
            let mut store = MemoryStore::new();
            store.insert("org.Foo", ["dup", "dup", "dup"]);
            let model = emit(&store);
            assert!(model.document.contains("public interface dup {}"));
            assert!(model.document.contains("public interface dup_ {}"));
            assert!(model.document.contains("public interface dup__ {}"));
        }

        #[test]
        fn package_header_is_emitted_when_present() {
            let store = MemoryStore::new();
            let model = ModelSerializer::new()
                .emit(&store, &DocumentName::new("org.my", "Model"))
                .unwrap();
            assert!(model.document.contains("package org.my;\n"));
        }

        #[test]
        fn emission_is_idempotent() {
            let mut store = MemoryStore::new();
            store.insert("org.pkg.Foo", ["f1", "run()", "run(int)"]);
            store.insert("org.pkg.sub.Bar", ["@org.Ann"]);
            assert_eq!(emit(&store).document, emit(&store).document);
        }
    }

    mod index {
        use super::*;

        #[test]
        fn index_maps_both_directions() {
            let mut store = MemoryStore::new();
            store.insert("org.pkg.Foo", ["f1"]);
            let model = emit(&store);
            let path = model.index.path_of("org.pkg.Foo").unwrap();
            assert_eq!(path.to_string(), "Model.org.pkg.Foo");
            assert_eq!(model.index.fqn_of(path), Some("org.pkg.Foo"));
        }

        #[test]
        fn index_records_disambiguated_scope_names() {
            let mut store = MemoryStore::new();
            store.insert("a.a.C", ["f"]);
            let model = emit(&store);
            let path = model.index.path_of("a.a.C").unwrap();
            assert_eq!(path.to_string(), "Model.a.a_.C");
        }

        #[test]
        fn index_round_trips_through_json() {
            let mut store = MemoryStore::new();
            store.insert("org.Foo", ["f1"]);
            store.insert("org.pkg.Bar", ["g"]);
            let model = emit(&store);
            let json = serde_json::to_string(&model.index).unwrap();
            let back: ModelIndex = serde_json::from_str(&json).unwrap();
            assert_eq!(back, model.index);
        }
    }

    mod saving {
        use super::*;

        #[test]
        fn save_writes_document_and_sidecar() {
            let dir = tempfile::tempdir().unwrap();
            let mut store = MemoryStore::new();
            store.insert("org.pkg.Foo", ["f1"]);

            let dest = format!("{}/org.my.Model", dir.path().display());
            let path = ModelSerializer::new().save(&store, &dest).unwrap();

            assert_eq!(path, dir.path().join("org/my/Model.java"));
            let document = fs::read_to_string(&path).unwrap();
            assert!(document.starts_with("//generated using typetree ModelSerializer"));
            assert!(document.contains("package org.my;"));

            let sidecar = path.with_extension("paths.json");
            let index: ModelIndex =
                serde_json::from_str(&fs::read_to_string(sidecar).unwrap()).unwrap();
            assert_eq!(
                index.path_of("org.pkg.Foo").unwrap().to_string(),
                "Model.org.pkg.Foo"
            );
        }

        #[test]
        fn failed_emission_publishes_nothing() {
            let dir = tempfile::tempdir().unwrap();
            let mut store = MemoryStore::new();
            store.insert("org.Foo", [""]);

            let dest = format!("{}/Model", dir.path().display());
            let err = ModelSerializer::new().save(&store, &dest).unwrap_err();
            assert!(matches!(err, ModelError::MalformedDescriptor { .. }));
            assert!(!dir.path().join("Model.java").exists());
        }
    }
}
