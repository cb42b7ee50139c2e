//! typetree: a bidirectional structural codec for scanned type metadata.
//!
//! An external scanner hands us a flat collection of fully-qualified type
//! names, each carrying raw member descriptors (fields, methods with
//! parameter signatures, annotations). The emitter turns that collection
//! into a prefix-compressed nested-interface document:
//!
//! ```text
//! public interface MyModel {
//!     public interface org {
//!         public interface pkg {
//!             public interface MyClass {
//!                 public interface fields {
//!                     public interface f1 {}
//!                 }
//!                 public interface methods {
//!                     public interface m1 {}
//!                 }
//!             }
//!         }
//!     }
//! }
//! ```
//!
//! and the resolver takes a navigational path in that document back to the
//! original type, field, method, or annotation identity.
//!
//! # Quick start
//!
//! ```
//! use typetree::{DocumentName, MemoryRegistry, MemoryStore, ModelSerializer, Resolver};
//!
//! let mut store = MemoryStore::new();
//! store.insert("org.pkg.Foo", ["f1", "m1()", "@org.Ann"]);
//!
//! let model = ModelSerializer::new()
//!     .emit(&store, &DocumentName::new("", "MyModel"))
//!     .unwrap();
//! assert!(model.document.contains("public interface Foo {"));
//!
//! let registry = MemoryRegistry::from_store(&store).unwrap();
//! let resolver = Resolver::new(&registry);
//! let path: typetree::ModelPath = "MyModel.org.pkg.Foo.fields.f1".parse().unwrap();
//! assert_eq!(resolver.resolve_field(&path).unwrap().name, "f1");
//! ```
//!
//! The scanner itself, the query engine over scan results, and any CLI
//! surface are external collaborators; the [`store::TypeStore`] and
//! [`resolve::TypeRegistry`] traits are the seams where they plug in.

pub mod emit;
pub mod error;
pub mod member;
pub mod path;
pub mod resolve;
pub mod scope;
pub mod store;

pub use emit::{DocumentName, EmittedModel, ModelIndex, ModelSerializer};
pub use error::{MemberKind, ModelError};
pub use member::MemberDescriptor;
pub use path::ModelPath;
pub use resolve::{
    MemoryRegistry, MethodEntry, ResolvedAnnotation, ResolvedField, ResolvedMethod, Resolver,
    TypeEntry, TypeRegistry,
};
pub use store::{MemoryStore, TypeStore};
