//! # protogql
//!
//! Protobuf to GraphQL schema conversion.
//!
//! protogql reads protobuf declarations (messages, enums, oneof groups, map
//! fields and nested packages) and produces an equivalent GraphQL SDL
//! schema, optionally with an input type for every output type.
//!
//! ## Features
//!
//! - **Field behavior nullability** - `google.api.field_behavior` drives `!` markers
//! - **Forward references** - types may reference declarations visited later
//! - **Oneof unions** - groups of messages become unions, others are flattened
//! - **Map fields** - lists of synthetic `<K>_<V>_map` key/value types
//!
//! ## Quick Start
//!
//! ```no_run
//! use protogql::prelude::*;
//!
//! let options = ConvertOptions::new().generate_input_types(true);
//! let sdl = convert_files(&["api/shop.proto"], &["api"], &options)?;
//! print!("{sdl}");
//! # Ok::<(), ConvertError>(())
//! ```
//!
//! ## Crate Organization
//!
//! - [`schema`] - Declaration tree, descriptor loading and validation
//! - [`codegen`] - Type mapping, registry and SDL rendering
//! - [`cli`] - Command-line interface of the `protogql` binary

pub mod cli;
pub mod prelude;

/// Declaration tree, descriptor loading and validation.
pub mod schema {
    pub use protogql_schema::*;
}

/// Type mapping, registry and SDL rendering.
pub mod codegen {
    pub use protogql_codegen::*;
}
