//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and functions.
//!
//! ```
//! use protogql::prelude::*;
//! ```

// Declaration tree
pub use protogql_schema::{
    Cardinality, DeclId, DeclKind, DeclarationTree, EnumValue, FieldBehavior, FieldBehaviors,
    FieldDescriptor, FieldType, LoadError, ScalarType, SchemaError,
};
pub use protogql_schema::{load_descriptor_set, load_files};

// Conversion
pub use protogql_codegen::{
    ConvertError, ConvertOptions, TypeDefinition, convert, convert_files, convert_to_sdl,
    print_schema,
};
