//! Error types for descriptor loading and tree validation.

use thiserror::Error;

/// Error type for loading `.proto` files into a declaration tree.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Protobuf compilation error (syntax, imports, unresolved names).
    #[error("protobuf compilation error: {0}")]
    Compile(#[from] protox::Error),

    /// Encoded descriptor set that cannot be decoded.
    #[error("descriptor error: {0}")]
    Descriptor(#[from] prost_reflect::DescriptorError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Input file that is not covered by any include directory.
    #[error("input file '{path}' is not inside any include directory")]
    NotIncluded {
        /// Input path.
        path: String,
    },

    /// Descriptor shape that cannot be represented in the tree.
    #[error("invalid descriptor structure: {message}")]
    InvalidStructure {
        /// Error message.
        message: String,
    },
}

/// Error type for declaration tree validation.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Field points at a declaration of the wrong kind.
    #[error("field '{field}' references {found} '{target}', expected {expected}")]
    KindMismatch {
        /// Qualified field name.
        field: String,
        /// Referenced declaration name.
        target: String,
        /// Expected declaration kind.
        expected: &'static str,
        /// Actual declaration kind.
        found: &'static str,
    },

    /// Field points at a declaration id outside the tree.
    #[error("field '{field}' references a declaration that does not exist")]
    DanglingReference {
        /// Qualified field name.
        field: String,
    },

    /// Oneof or map entry that is not a child of the field's message.
    #[error("field '{field}' references {kind} '{target}' outside its own message")]
    ForeignGroup {
        /// Qualified field name.
        field: String,
        /// Group kind.
        kind: &'static str,
        /// Group name.
        target: String,
    },

    /// Enum without values.
    #[error("enum '{name}' has no values")]
    EmptyEnum {
        /// Enum name.
        name: String,
    },

    /// Validation error.
    #[error("validation error: {message}")]
    Validation {
        /// Error message.
        message: String,
    },
}

impl LoadError {
    /// Creates an invalid structure error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidStructure {
            message: message.into(),
        }
    }
}

impl SchemaError {
    /// Creates a kind mismatch error.
    pub fn kind_mismatch(
        field: impl Into<String>,
        target: impl Into<String>,
        expected: &'static str,
        found: &'static str,
    ) -> Self {
        Self::KindMismatch {
            field: field.into(),
            target: target.into(),
            expected,
            found,
        }
    }

    /// Creates a validation error with the given message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}
