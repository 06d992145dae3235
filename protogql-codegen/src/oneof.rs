//! Oneof group conversion.
//!
//! On the output side a group whose visible members are all singular
//! message fields becomes a union of the member types; any other group is
//! flattened into an object with one nullable field per member. The input
//! side is always flattened, since input unions do not exist.

use crate::context::Context;
use crate::definition::{EntryKey, FieldEntry, TypeEntry, TypeExpr, UnionMember};
use crate::error::ConvertError;
use crate::mapper::{Side, TypeMapper};
use crate::names::NameResolver;
use protogql_schema::{Cardinality, DeclId, FieldDescriptor, FieldType};

/// Converts oneof groups to union or flattened object types.
#[derive(Debug, Clone, Copy)]
pub struct OneofResolver<'a> {
    names: NameResolver<'a>,
    mapper: TypeMapper<'a>,
}

impl<'a> OneofResolver<'a> {
    /// Creates a resolver.
    #[must_use]
    pub fn new(names: NameResolver<'a>, mapper: TypeMapper<'a>) -> Self {
        Self { names, mapper }
    }

    /// Returns the members of `group` visible on one side, in declaration order.
    #[must_use]
    pub fn visible_members(
        &self,
        message: DeclId,
        group: DeclId,
        side: Side,
    ) -> Vec<&'a FieldDescriptor> {
        self.names
            .tree()
            .oneof_members(message, group)
            .filter(|field| side.is_visible(field.behaviors))
            .collect()
    }

    /// Returns the nullable field the containing type gets for `group`, or
    /// `None` if no member is visible on that side.
    #[must_use]
    pub fn group_field(
        &self,
        ctx: &Context<'_>,
        message: DeclId,
        group: DeclId,
        side: Side,
    ) -> Option<FieldEntry> {
        if self.visible_members(message, group, side).is_empty() {
            return None;
        }
        let key = self.names.key(group);
        let reference = match side {
            Side::Output => ctx.get_output(&key),
            Side::Input => ctx.get_input(&key),
        };
        let name = self.names.tree().node(group).name.clone();
        Some(FieldEntry {
            source: self.names.field_source(message, &name),
            name,
            ty: TypeExpr::Named(reference),
        })
    }

    /// Registers the output and input types of `group`.
    ///
    /// Returns the registered keys in emission order.
    ///
    /// # Errors
    /// Returns `DuplicateTypeName` if a group type is already registered.
    pub fn resolve(
        &self,
        ctx: &mut Context<'_>,
        message: DeclId,
        group: DeclId,
    ) -> Result<Vec<EntryKey>, ConvertError> {
        let key = self.names.key(group);
        let mut emitted = Vec::new();

        let members = self.visible_members(message, group, Side::Output);
        if !members.is_empty() {
            if ctx.skip_type(&key) {
                tracing::debug!("Skipping output type {}", key);
            } else {
                let display = self.names.display(&key);
                let entry = if Self::is_union(&members) {
                    TypeEntry::union(display, self.union_members(ctx, message, &members))
                } else {
                    TypeEntry::object(
                        display,
                        self.flattened_fields(ctx, message, &members, Side::Output)?,
                    )
                };
                ctx.set_output(key.clone(), entry)?;
                emitted.push(EntryKey::Output(key.clone()));
            }
        }

        if ctx.generate_input_types() {
            let members = self.visible_members(message, group, Side::Input);
            if members.is_empty() {
                return Ok(emitted);
            }
            if ctx.skip_input(&key) {
                tracing::debug!("Skipping input type {}", key);
            } else {
                let fields = self.flattened_fields(ctx, message, &members, Side::Input)?;
                let input_key = ctx.input_key(&key);
                ctx.set_input(
                    input_key.clone(),
                    TypeEntry::input_object(self.names.input_display(&key), fields),
                )?;
                emitted.push(EntryKey::Input(input_key));
            }
        }

        Ok(emitted)
    }

    fn is_union(members: &[&FieldDescriptor]) -> bool {
        members.iter().all(|field| {
            field.cardinality == Cardinality::Singular && matches!(field.ty, FieldType::Message(_))
        })
    }

    fn union_members(
        &self,
        ctx: &Context<'_>,
        message: DeclId,
        members: &[&FieldDescriptor],
    ) -> Vec<UnionMember> {
        let mut seen = Vec::new();
        let mut union = Vec::new();
        for field in members {
            let FieldType::Message(target) = field.ty else {
                continue;
            };
            if seen.contains(&target) {
                continue;
            }
            seen.push(target);
            union.push(UnionMember {
                ty: ctx.get_output(&self.names.key(target)),
                source: self.names.field_source(message, &field.name),
            });
        }
        union
    }

    fn flattened_fields(
        &self,
        ctx: &Context<'_>,
        message: DeclId,
        members: &[&FieldDescriptor],
        side: Side,
    ) -> Result<Vec<FieldEntry>, ConvertError> {
        let mut fields = Vec::with_capacity(members.len());
        for field in members {
            if let Some(ty) = self.mapper.field_type(ctx, field, side, true)? {
                fields.push(FieldEntry {
                    name: field.name.clone(),
                    ty,
                    source: self.names.field_source(message, &field.name),
                });
            }
        }
        Ok(fields)
    }
}
