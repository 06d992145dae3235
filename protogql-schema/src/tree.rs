//! Declaration tree.
//!
//! The tree is an arena of [`DeclarationNode`]s addressed by [`DeclId`].
//! Index 0 is always the unnamed root namespace. Parent links are plain ids,
//! so nodes never own each other.

use crate::fields::{Cardinality, FieldDescriptor, FieldType};
use crate::types::{EnumValue, FieldBehaviors, ScalarType};

/// Identifier of a declaration inside a [`DeclarationTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclId(pub(crate) usize);

impl DeclId {
    /// Returns the arena index of this declaration.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0
    }
}

/// Declaration kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclKind {
    /// Package or namespace; emits nothing itself.
    Namespace,
    /// Message declaration.
    Message,
    /// Enum declaration with its values in declaration order.
    Enum(Vec<EnumValue>),
    /// Oneof group; members are the parent message's fields pointing here.
    Oneof,
    /// Map field entry; the value type lives on the map field.
    MapEntry {
        /// Key scalar type.
        key: ScalarType,
    },
}

impl DeclKind {
    /// Returns a short human-readable label for the kind.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Namespace => "namespace",
            Self::Message => "message",
            Self::Enum(_) => "enum",
            Self::Oneof => "oneof",
            Self::MapEntry { .. } => "map entry",
        }
    }
}

/// A single declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationNode {
    /// Local name; empty only for the root.
    pub name: String,
    /// Declaration kind.
    pub kind: DeclKind,
    /// Enclosing declaration, `None` for the root.
    pub parent: Option<DeclId>,
    /// Child declarations in declaration order.
    pub children: Vec<DeclId>,
    /// Fields in declaration order (messages only).
    pub fields: Vec<FieldDescriptor>,
}

/// Arena holding every declaration of one conversion input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationTree {
    nodes: Vec<DeclarationNode>,
}

impl DeclarationTree {
    /// Creates a tree containing only the unnamed root namespace.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![DeclarationNode {
                name: String::new(),
                kind: DeclKind::Namespace,
                parent: None,
                children: Vec::new(),
                fields: Vec::new(),
            }],
        }
    }

    /// Returns the root namespace id.
    #[must_use]
    pub const fn root(&self) -> DeclId {
        DeclId(0)
    }

    /// Returns the node for an id.
    ///
    /// # Panics
    /// Panics if the id does not belong to this tree.
    #[must_use]
    pub fn node(&self, id: DeclId) -> &DeclarationNode {
        &self.nodes[id.0]
    }

    /// Returns the node for an id, or `None` if it is out of range.
    #[must_use]
    pub fn get(&self, id: DeclId) -> Option<&DeclarationNode> {
        self.nodes.get(id.0)
    }

    /// Returns the number of declarations, including the root.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the tree holds only the root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Returns the local names from the outermost named ancestor down to `id`.
    #[must_use]
    pub fn path(&self, id: DeclId) -> Vec<&str> {
        let mut names = Vec::new();
        let mut current = Some(id);
        while let Some(id) = current {
            let node = &self.nodes[id.0];
            if node.parent.is_none() {
                break;
            }
            names.push(node.name.as_str());
            current = node.parent;
        }
        names.reverse();
        names
    }

    /// Returns the dotted protobuf-style name of a declaration.
    #[must_use]
    pub fn full_name(&self, id: DeclId) -> String {
        self.path(id).join(".")
    }

    /// Iterates over all node ids in creation order.
    pub fn ids(&self) -> impl Iterator<Item = DeclId> {
        (0..self.nodes.len()).map(DeclId)
    }

    /// Adds a namespace under `parent`, reusing an existing one of the same name.
    pub fn add_namespace(&mut self, parent: DeclId, name: impl Into<String>) -> DeclId {
        let name = name.into();
        let existing = self.nodes[parent.0].children.iter().copied().find(|&child| {
            let node = &self.nodes[child.0];
            node.kind == DeclKind::Namespace && node.name == name
        });
        match existing {
            Some(id) => id,
            None => self.push(parent, name, DeclKind::Namespace),
        }
    }

    /// Adds a namespace path such as `acme.shop.v1` under the root.
    pub fn add_package(&mut self, package: &str) -> DeclId {
        package
            .split('.')
            .filter(|part| !part.is_empty())
            .fold(self.root(), |parent, part| self.add_namespace(parent, part))
    }

    /// Adds a message under `parent`.
    pub fn add_message(&mut self, parent: DeclId, name: impl Into<String>) -> DeclId {
        self.push(parent, name.into(), DeclKind::Message)
    }

    /// Adds an enum under `parent`.
    pub fn add_enum(
        &mut self,
        parent: DeclId,
        name: impl Into<String>,
        values: Vec<EnumValue>,
    ) -> DeclId {
        self.push(parent, name.into(), DeclKind::Enum(values))
    }

    /// Adds a oneof group to a message.
    pub fn add_oneof(&mut self, message: DeclId, name: impl Into<String>) -> DeclId {
        self.push(message, name.into(), DeclKind::Oneof)
    }

    /// Appends a field to a message.
    pub fn add_field(&mut self, message: DeclId, field: FieldDescriptor) {
        self.nodes[message.0].fields.push(field);
    }

    /// Adds a map field to a message together with its MapEntry declaration.
    ///
    /// Returns the id of the MapEntry node.
    pub fn add_map_field(
        &mut self,
        message: DeclId,
        name: impl Into<String>,
        key: ScalarType,
        value: FieldType,
        behaviors: FieldBehaviors,
    ) -> DeclId {
        let name = name.into();
        let entry = self.push(message, name.clone(), DeclKind::MapEntry { key });
        self.add_field(
            message,
            FieldDescriptor {
                name,
                ty: value,
                cardinality: Cardinality::Map(entry),
                oneof: None,
                behaviors,
            },
        );
        entry
    }

    /// Returns the fields of `message` that belong to the oneof `group`.
    pub fn oneof_members(
        &self,
        message: DeclId,
        group: DeclId,
    ) -> impl Iterator<Item = &FieldDescriptor> {
        self.nodes[message.0]
            .fields
            .iter()
            .filter(move |field| field.oneof == Some(group))
    }

    /// Returns the map field of `message` that owns the MapEntry `entry`.
    #[must_use]
    pub fn map_field(&self, message: DeclId, entry: DeclId) -> Option<&FieldDescriptor> {
        self.nodes[message.0]
            .fields
            .iter()
            .find(|field| field.cardinality == Cardinality::Map(entry))
    }

    fn push(&mut self, parent: DeclId, name: String, kind: DeclKind) -> DeclId {
        let id = DeclId(self.nodes.len());
        self.nodes.push(DeclarationNode {
            name,
            kind,
            parent: Some(parent),
            children: Vec::new(),
            fields: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }
}

impl Default for DeclarationTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldBehavior;

    #[test]
    fn test_new_tree_has_unnamed_root() {
        let tree = DeclarationTree::new();
        let root = tree.node(tree.root());
        assert!(root.name.is_empty());
        assert_eq!(root.kind, DeclKind::Namespace);
        assert_eq!(root.parent, None);
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_add_package_reuses_namespaces() {
        let mut tree = DeclarationTree::new();
        let a = tree.add_package("acme.shop");
        let b = tree.add_package("acme.shop");
        let c = tree.add_package("acme.billing");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(tree.node(a).name, "shop");
        let acme = tree.node(a).parent.expect("parent");
        assert_eq!(tree.node(acme).name, "acme");
        assert_eq!(tree.node(acme).children, vec![a, c]);
    }

    #[test]
    fn test_path_and_full_name() {
        let mut tree = DeclarationTree::new();
        let pkg = tree.add_package("acme.shop");
        let order = tree.add_message(pkg, "Order");
        let line = tree.add_message(order, "Line");

        assert_eq!(tree.path(line), vec!["acme", "shop", "Order", "Line"]);
        assert_eq!(tree.full_name(line), "acme.shop.Order.Line");
        assert!(tree.path(tree.root()).is_empty());
    }

    #[test]
    fn test_empty_package_is_root() {
        let mut tree = DeclarationTree::new();
        assert_eq!(tree.add_package(""), tree.root());
    }

    #[test]
    fn test_children_keep_declaration_order() {
        let mut tree = DeclarationTree::new();
        let root = tree.root();
        let order = tree.add_message(root, "Order");
        let status = tree.add_enum(root, "Status", vec![EnumValue::new("OPEN", 0)]);
        let line = tree.add_message(order, "Line");

        assert_eq!(tree.node(root).children, vec![order, status]);
        assert_eq!(tree.node(order).children, vec![line]);
        assert_eq!(tree.node(line).parent, Some(order));
        assert_eq!(tree.node(status).kind.label(), "enum");
    }

    #[test]
    fn test_oneof_members() {
        let mut tree = DeclarationTree::new();
        let root = tree.root();
        let msg = tree.add_message(root, "Payment");
        let method = tree.add_oneof(msg, "method");
        tree.add_field(msg, FieldDescriptor::scalar("id", ScalarType::String));
        tree.add_field(
            msg,
            FieldDescriptor::scalar("card", ScalarType::String).in_oneof(method),
        );
        tree.add_field(
            msg,
            FieldDescriptor::scalar("iban", ScalarType::String).in_oneof(method),
        );

        let names: Vec<_> = tree
            .oneof_members(msg, method)
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(names, vec!["card", "iban"]);
    }

    #[test]
    fn test_add_map_field() {
        let mut tree = DeclarationTree::new();
        let root = tree.root();
        let msg = tree.add_message(root, "Catalog");
        let entry = tree.add_map_field(
            msg,
            "prices",
            ScalarType::String,
            FieldType::Scalar(ScalarType::Double),
            FieldBehaviors::from([FieldBehavior::Required]),
        );

        assert_eq!(
            tree.node(entry).kind,
            DeclKind::MapEntry {
                key: ScalarType::String
            }
        );
        let field = tree.map_field(msg, entry).expect("map field");
        assert_eq!(field.name, "prices");
        assert!(field.is_map());
        assert!(field.has(FieldBehavior::Required));
    }
}
