//! Qualified and display names of declarations.

use crate::definition::Scalar;
use crate::options::ConvertOptions;
use protogql_schema::{DeclId, DeclarationTree, FieldType, ScalarType};

/// Registry key and display name of a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedName {
    /// Untransformed registry key.
    pub key: String,
    /// Name after the display transform.
    pub display: String,
}

/// Derives registry keys from tree positions and display names from keys.
#[derive(Debug, Clone, Copy)]
pub struct NameResolver<'a> {
    tree: &'a DeclarationTree,
    options: &'a ConvertOptions,
}

impl<'a> NameResolver<'a> {
    /// Creates a resolver over a tree.
    #[must_use]
    pub fn new(tree: &'a DeclarationTree, options: &'a ConvertOptions) -> Self {
        Self { tree, options }
    }

    /// Returns the tree being resolved.
    #[must_use]
    pub fn tree(&self) -> &'a DeclarationTree {
        self.tree
    }

    /// Returns the registry key of a declaration: the local names from the
    /// outermost named ancestor down, joined with `_`.
    #[must_use]
    pub fn key(&self, id: DeclId) -> String {
        self.tree.path(id).join("_")
    }

    /// Returns the display name for a registry key.
    #[must_use]
    pub fn display(&self, key: &str) -> String {
        self.options.display_name(key)
    }

    /// Returns the display name of the input variant for a registry key.
    #[must_use]
    pub fn input_display(&self, key: &str) -> String {
        let mut name = self.display(key);
        name.push_str(self.options.input_suffix());
        name
    }

    /// Returns both the key and the display name of a declaration.
    #[must_use]
    pub fn qualified(&self, id: DeclId) -> QualifiedName {
        let key = self.key(id);
        let display = self.display(&key);
        QualifiedName { key, display }
    }

    /// Returns the registry key of the synthetic type backing a map field.
    ///
    /// The key is `<K>_<V>_map`, where `K` is the GraphQL scalar of the map
    /// key and `V` is the GraphQL scalar of the value or the registry key of
    /// the value declaration.
    #[must_use]
    pub fn map_entry_key(&self, key: ScalarType, value: &FieldType) -> String {
        let value = match value {
            FieldType::Scalar(scalar) => Scalar::from(*scalar).name().to_string(),
            FieldType::Message(id) | FieldType::Enum(id) => self.key(*id),
        };
        format!("{}_{}_map", Scalar::from(key).name(), value)
    }

    /// Returns the qualified name of a field, used to locate errors.
    #[must_use]
    pub fn field_source(&self, message: DeclId, field: &str) -> String {
        format!("{}.{}", self.key(message), field)
    }
}
