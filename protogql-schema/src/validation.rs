//! Declaration tree validation utilities.
//!
//! Trees produced by the loader are valid by construction; these checks
//! guard hand-built trees before they reach the converter.

use crate::error::SchemaError;
use crate::fields::{Cardinality, FieldDescriptor, FieldType};
use crate::tree::{DeclId, DeclKind, DeclarationTree};
use std::collections::HashSet;

/// Validates a declaration tree for structural consistency.
///
/// # Arguments
/// * `tree` - The tree to validate
///
/// # Returns
/// Ok(()) if valid, or SchemaError describing the first issue found.
///
/// # Errors
/// Returns `SchemaError` if validation fails.
pub fn validate_tree(tree: &DeclarationTree) -> Result<(), SchemaError> {
    for id in tree.ids() {
        let node = tree.node(id);
        match &node.kind {
            DeclKind::Message => validate_message(tree, id)?,
            DeclKind::Enum(values) => validate_enum(tree, id, values)?,
            DeclKind::Namespace | DeclKind::Oneof | DeclKind::MapEntry { .. } => {
                if !node.fields.is_empty() {
                    return Err(SchemaError::validation(format!(
                        "{} '{}' cannot declare fields",
                        node.kind.label(),
                        tree.full_name(id)
                    )));
                }
            }
        }
    }
    Ok(())
}

/// Validates every field of a message.
fn validate_message(tree: &DeclarationTree, message: DeclId) -> Result<(), SchemaError> {
    let mut seen_names = HashSet::new();

    for field in &tree.node(message).fields {
        let qualified = format!("{}.{}", tree.full_name(message), field.name);
        if !seen_names.insert(field.name.as_str()) {
            return Err(SchemaError::validation(format!(
                "duplicate field '{}' in message '{}'",
                field.name,
                tree.full_name(message)
            )));
        }

        validate_field_type(tree, field, &qualified)?;

        if let Some(group) = field.oneof {
            validate_group(tree, message, group, &qualified, "oneof")?;
            if field.is_map() {
                return Err(SchemaError::validation(format!(
                    "map field '{qualified}' cannot be part of a oneof"
                )));
            }
        }

        if let Cardinality::Map(entry) = field.cardinality {
            validate_group(tree, message, entry, &qualified, "map entry")?;
        }
    }

    Ok(())
}

/// Validates that a field's declared type points at the right kind.
fn validate_field_type(
    tree: &DeclarationTree,
    field: &FieldDescriptor,
    qualified: &str,
) -> Result<(), SchemaError> {
    let (target, expected) = match field.ty {
        FieldType::Scalar(_) => return Ok(()),
        FieldType::Message(id) => (id, "message"),
        FieldType::Enum(id) => (id, "enum"),
    };

    let node = tree
        .get(target)
        .ok_or_else(|| SchemaError::DanglingReference {
            field: qualified.to_string(),
        })?;

    let found = node.kind.label();
    if found != expected {
        return Err(SchemaError::kind_mismatch(
            qualified,
            tree.full_name(target),
            expected,
            found,
        ));
    }
    Ok(())
}

/// Validates that a oneof or map entry reference is a child of the message.
fn validate_group(
    tree: &DeclarationTree,
    message: DeclId,
    group: DeclId,
    qualified: &str,
    expected: &'static str,
) -> Result<(), SchemaError> {
    let node = tree
        .get(group)
        .ok_or_else(|| SchemaError::DanglingReference {
            field: qualified.to_string(),
        })?;

    let found = node.kind.label();
    if found != expected {
        return Err(SchemaError::kind_mismatch(
            qualified,
            tree.full_name(group),
            expected,
            found,
        ));
    }

    if node.parent != Some(message) {
        return Err(SchemaError::ForeignGroup {
            field: qualified.to_string(),
            kind: expected,
            target: tree.full_name(group),
        });
    }
    Ok(())
}

/// Validates an enum definition.
fn validate_enum(
    tree: &DeclarationTree,
    id: DeclId,
    values: &[crate::types::EnumValue],
) -> Result<(), SchemaError> {
    if values.is_empty() {
        return Err(SchemaError::EmptyEnum {
            name: tree.full_name(id),
        });
    }

    let mut seen_names = HashSet::new();
    for value in values {
        if !seen_names.insert(&value.name) {
            return Err(SchemaError::validation(format!(
                "duplicate enum value name '{}' in enum '{}'",
                value.name,
                tree.full_name(id)
            )));
        }
    }

    Ok(())
}
