//! Declaration tree traversal.
//!
//! The walker visits the tree depth-first in declaration order and registers
//! one entry per emitted type. For a message the emission order is: output
//! object, input object, oneof group types, map entry types, then nested
//! declarations.

use crate::context::Context;
use crate::definition::{EntryKey, FieldEntry, TypeEntry};
use crate::error::ConvertError;
use crate::maps::MapFieldMaterializer;
use crate::mapper::{Side, TypeMapper};
use crate::names::NameResolver;
use crate::oneof::OneofResolver;
use crate::options::ConvertOptions;
use protogql_schema::{DeclId, DeclKind, DeclarationTree, EnumValue};

/// Walks a declaration tree and populates a [`Context`].
#[derive(Debug, Clone, Copy)]
pub struct TreeWalker<'a> {
    names: NameResolver<'a>,
    mapper: TypeMapper<'a>,
    oneofs: OneofResolver<'a>,
    maps: MapFieldMaterializer<'a>,
}

impl<'a> TreeWalker<'a> {
    /// Creates a walker over a tree.
    #[must_use]
    pub fn new(tree: &'a DeclarationTree, options: &'a ConvertOptions) -> Self {
        let names = NameResolver::new(tree, options);
        let mapper = TypeMapper::new(names);
        Self {
            names,
            mapper,
            oneofs: OneofResolver::new(names, mapper),
            maps: MapFieldMaterializer::new(names, mapper),
        }
    }

    /// Visits the whole tree.
    ///
    /// Returns the registered keys in emission order.
    ///
    /// # Errors
    /// Returns `DuplicateTypeName` if two declarations register the same
    /// key, or `InvalidTree` for a malformed map field.
    pub fn walk(&self, ctx: &mut Context<'_>) -> Result<Vec<EntryKey>, ConvertError> {
        let mut order = Vec::new();
        self.visit(ctx, self.names.tree().root(), &mut order)?;
        Ok(order)
    }

    fn visit(
        &self,
        ctx: &mut Context<'_>,
        id: DeclId,
        order: &mut Vec<EntryKey>,
    ) -> Result<(), ConvertError> {
        let node = self.names.tree().node(id);
        match &node.kind {
            DeclKind::Namespace => {
                for &child in &node.children {
                    self.visit(ctx, child, order)?;
                }
                Ok(())
            }
            DeclKind::Message => self.visit_message(ctx, id, order),
            DeclKind::Enum(values) => self.visit_enum(ctx, id, values, order),
            // Owned by the enclosing message.
            DeclKind::Oneof | DeclKind::MapEntry { .. } => Ok(()),
        }
    }

    fn visit_message(
        &self,
        ctx: &mut Context<'_>,
        id: DeclId,
        order: &mut Vec<EntryKey>,
    ) -> Result<(), ConvertError> {
        let tree = self.names.tree();
        let name = self.names.qualified(id);

        if ctx.skip_type(&name.key) {
            tracing::debug!("Skipping output type {}", name.key);
        } else {
            let fields = self.message_fields(ctx, id, Side::Output)?;
            ctx.set_output(name.key.clone(), TypeEntry::object(name.display, fields))?;
            order.push(EntryKey::Output(name.key.clone()));
        }

        if ctx.generate_input_types() {
            if ctx.skip_input(&name.key) {
                tracing::debug!("Skipping input type {}", name.key);
            } else {
                let fields = self.message_fields(ctx, id, Side::Input)?;
                let input_key = ctx.input_key(&name.key);
                ctx.set_input(
                    input_key.clone(),
                    TypeEntry::input_object(self.names.input_display(&name.key), fields),
                )?;
                order.push(EntryKey::Input(input_key));
            }
        }

        let children = &tree.node(id).children;
        for &child in children {
            if tree.node(child).kind == DeclKind::Oneof {
                order.extend(self.oneofs.resolve(ctx, id, child)?);
            }
        }
        for &child in children {
            if let DeclKind::MapEntry { .. } = tree.node(child).kind {
                let field = tree.map_field(id, child).ok_or_else(|| {
                    ConvertError::invalid_tree(format!(
                        "map entry '{}' has no map field",
                        tree.full_name(child)
                    ))
                })?;
                order.extend(self.maps.materialize(ctx, field)?);
            }
        }
        for &child in children {
            match tree.node(child).kind {
                DeclKind::Namespace | DeclKind::Message | DeclKind::Enum(_) => {
                    self.visit(ctx, child, order)?;
                }
                DeclKind::Oneof | DeclKind::MapEntry { .. } => {}
            }
        }
        Ok(())
    }

    fn visit_enum(
        &self,
        ctx: &mut Context<'_>,
        id: DeclId,
        values: &[EnumValue],
        order: &mut Vec<EntryKey>,
    ) -> Result<(), ConvertError> {
        let name = self.names.qualified(id);
        let skip_output = ctx.skip_type(&name.key);
        let skip_input = ctx.skip_input(&name.key);

        if !skip_output {
            ctx.set_output(
                name.key.clone(),
                TypeEntry::enumeration(name.display.clone(), values.to_vec()),
            )?;
            order.push(EntryKey::Output(name.key.clone()));
        }
        if !skip_input {
            ctx.set_input(
                name.key.clone(),
                TypeEntry::enumeration(name.display, values.to_vec()),
            )?;
            // Emitted once; the input copy is only printed when the output is skipped.
            if skip_output && ctx.generate_input_types() {
                order.push(EntryKey::Input(name.key));
            }
        } else if skip_output {
            tracing::debug!("Skipping enum {}", name.key);
        }
        Ok(())
    }

    /// Builds the fields of a message for one side. A oneof group becomes a
    /// single field placed at its first member.
    fn message_fields(
        &self,
        ctx: &Context<'_>,
        id: DeclId,
        side: Side,
    ) -> Result<Vec<FieldEntry>, ConvertError> {
        let node = self.names.tree().node(id);
        let mut groups = Vec::new();
        let mut fields = Vec::with_capacity(node.fields.len());

        for field in &node.fields {
            if let Some(group) = field.oneof {
                if groups.contains(&group) {
                    continue;
                }
                groups.push(group);
                if let Some(entry) = self.oneofs.group_field(ctx, id, group, side) {
                    fields.push(entry);
                }
            } else if let Some(ty) = self.mapper.field_type(ctx, field, side, false)? {
                fields.push(FieldEntry {
                    name: field.name.clone(),
                    ty,
                    source: self.names.field_source(id, &field.name),
                });
            }
        }
        Ok(fields)
    }
}
