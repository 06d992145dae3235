//! # protogql Schema
//!
//! Protobuf declaration tree and descriptor loading.
//!
//! This crate provides:
//! - The declaration tree model (namespaces, messages, enums, oneofs, map entries)
//! - Field descriptors with cardinality and field behavior annotations
//! - Loading `.proto` files into a tree via `protox` and `prost-reflect`
//! - Structural validation of hand-built trees

pub mod error;
pub mod fields;
pub mod loader;
pub mod tree;
pub mod types;
pub mod validation;

pub use error::{LoadError, SchemaError};
pub use fields::{Cardinality, FieldDescriptor, FieldType};
pub use loader::{load_descriptor_set, load_files, tree_from_pool};
pub use tree::{DeclId, DeclKind, DeclarationNode, DeclarationTree};
pub use types::{EnumValue, FieldBehavior, FieldBehaviors, ScalarType};
pub use validation::validate_tree;
