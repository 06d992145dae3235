//! Field type mapping.
//!
//! Maps a field's declared type, cardinality and behavior set to a GraphQL
//! type expression for one side of the schema.

use crate::context::Context;
use crate::definition::{Scalar, TypeExpr, TypeRef};
use crate::error::ConvertError;
use crate::names::NameResolver;
use protogql_schema::{
    Cardinality, DeclId, DeclKind, FieldBehavior, FieldBehaviors, FieldDescriptor, FieldType,
};

/// Schema side a type is produced for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Output (object) types.
    Output,
    /// Input object types.
    Input,
}

impl Side {
    /// Returns true if a field with these behaviors is visible on this side.
    #[must_use]
    pub const fn is_visible(&self, behaviors: FieldBehaviors) -> bool {
        match self {
            Self::Output => !behaviors.contains(FieldBehavior::InputOnly),
            Self::Input => !behaviors.contains(FieldBehavior::OutputOnly),
        }
    }
}

/// Maps protobuf field declarations to GraphQL type expressions.
#[derive(Debug, Clone, Copy)]
pub struct TypeMapper<'a> {
    names: NameResolver<'a>,
}

impl<'a> TypeMapper<'a> {
    /// Creates a mapper using the given name resolver.
    #[must_use]
    pub fn new(names: NameResolver<'a>) -> Self {
        Self { names }
    }

    /// Maps a field for one side.
    ///
    /// Returns `None` if the field is hidden on that side. With
    /// `forced_nullable` set, REQUIRED is dropped and OPTIONAL added before
    /// nullability is decided.
    ///
    /// # Errors
    /// Returns `InvalidTree` if a map field does not point at a map entry.
    pub fn field_type(
        &self,
        ctx: &Context<'_>,
        field: &FieldDescriptor,
        side: Side,
        forced_nullable: bool,
    ) -> Result<Option<TypeExpr>, ConvertError> {
        if !side.is_visible(field.behaviors) {
            return Ok(None);
        }

        let behaviors = if forced_nullable {
            field
                .behaviors
                .without(FieldBehavior::Required)
                .with(FieldBehavior::Optional)
        } else {
            field.behaviors
        };

        let ty = match field.cardinality {
            Cardinality::Singular | Cardinality::Repeated => {
                let base = TypeExpr::Named(self.base_type(ctx, &field.ty, side));
                Self::wrap(base, &field.ty, field.cardinality, behaviors)
            }
            Cardinality::Map(entry) => {
                let key = self.map_entry_key(entry, &field.ty)?;
                let reference = match side {
                    Side::Output => ctx.get_output(&key),
                    Side::Input => ctx.get_input(&key),
                };
                TypeExpr::Named(reference).non_null().list().non_null()
            }
        };
        Ok(Some(ty))
    }

    /// Maps the value of a map field with default nullability. The field's
    /// behaviors describe the map itself and do not reach the value.
    #[must_use]
    pub fn value_type(&self, ctx: &Context<'_>, field: &FieldDescriptor, side: Side) -> TypeExpr {
        let base = TypeExpr::Named(self.base_type(ctx, &field.ty, side));
        Self::wrap(base, &field.ty, Cardinality::Singular, FieldBehaviors::new())
    }

    /// Returns the reference for a declared type on one side.
    #[must_use]
    pub fn base_type(&self, ctx: &Context<'_>, ty: &FieldType, side: Side) -> TypeRef {
        match ty {
            FieldType::Scalar(scalar) => TypeRef::Scalar(Scalar::from(*scalar)),
            FieldType::Message(id) | FieldType::Enum(id) => {
                let key = self.names.key(*id);
                match side {
                    Side::Output => ctx.get_output(&key),
                    Side::Input => ctx.get_input(&key),
                }
            }
        }
    }

    /// Applies list and non-null wrappers.
    ///
    /// Repeated elements are always non-null. The outer type is non-null iff
    /// the behaviors contain REQUIRED, or the declared type is a scalar or
    /// enum and OPTIONAL is absent.
    #[must_use]
    pub fn wrap(
        base: TypeExpr,
        declared: &FieldType,
        cardinality: Cardinality,
        behaviors: FieldBehaviors,
    ) -> TypeExpr {
        let ty = match cardinality {
            Cardinality::Repeated => base.non_null().list(),
            Cardinality::Singular | Cardinality::Map(_) => base,
        };
        let non_null = behaviors.contains(FieldBehavior::Required)
            || (declared.is_scalar_or_enum() && !behaviors.contains(FieldBehavior::Optional));
        if non_null { ty.non_null() } else { ty }
    }

    /// Returns the registry key of the synthetic type for a map entry.
    ///
    /// # Errors
    /// Returns `InvalidTree` if `entry` is not a map entry declaration.
    pub fn map_entry_key(&self, entry: DeclId, value: &FieldType) -> Result<String, ConvertError> {
        match self.names.tree().get(entry).map(|node| &node.kind) {
            Some(DeclKind::MapEntry { key }) => Ok(self.names.map_entry_key(*key, value)),
            Some(
                DeclKind::Namespace | DeclKind::Message | DeclKind::Enum(_) | DeclKind::Oneof,
            )
            | None => Err(ConvertError::invalid_tree(format!(
                "declaration {} is not a map entry",
                entry.index()
            ))),
        }
    }
}
