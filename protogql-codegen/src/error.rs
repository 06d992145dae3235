//! Error types for schema conversion.

use thiserror::Error;

/// Error type for conversion operations.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Descriptor loading error.
    #[error("load error: {0}")]
    Load(#[from] protogql_schema::LoadError),

    /// Declaration tree validation error.
    #[error("schema error: {0}")]
    Schema(#[from] protogql_schema::SchemaError),

    /// A field references a type that was never registered.
    #[error("unresolved type '{target}' referenced by '{field}'")]
    UnresolvedTypeReference {
        /// Qualified name of the referencing field.
        field: String,
        /// Registry key of the missing type.
        target: String,
    },

    /// Two declarations produce the same type name.
    #[error("duplicate type name '{name}'")]
    DuplicateTypeName {
        /// Conflicting name.
        name: String,
    },

    /// Declaration tree shape the converter cannot handle.
    #[error("invalid declaration tree: {message}")]
    InvalidTree {
        /// Error message.
        message: String,
    },
}

impl ConvertError {
    /// Creates an unresolved reference error.
    pub fn unresolved(field: impl Into<String>, target: impl Into<String>) -> Self {
        Self::UnresolvedTypeReference {
            field: field.into(),
            target: target.into(),
        }
    }

    /// Creates a duplicate name error.
    pub fn duplicate(name: impl Into<String>) -> Self {
        Self::DuplicateTypeName { name: name.into() }
    }

    /// Creates an invalid tree error with the given message.
    pub fn invalid_tree(message: impl Into<String>) -> Self {
        Self::InvalidTree {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolved_display() {
        let err = ConvertError::unresolved("shop_Order.price", "shop_Price");
        assert_eq!(
            err.to_string(),
            "unresolved type 'shop_Price' referenced by 'shop_Order.price'"
        );
    }

    #[test]
    fn test_duplicate_display() {
        let err = ConvertError::duplicate("a_b_C");
        assert_eq!(err.to_string(), "duplicate type name 'a_b_C'");
    }

    #[test]
    fn test_from_schema_error() {
        let err: ConvertError = protogql_schema::SchemaError::validation("bad").into();
        assert!(matches!(err, ConvertError::Schema(_)));
    }
}
