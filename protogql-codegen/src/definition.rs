//! GraphQL type definitions.
//!
//! Entries are built with [`TypeRef`] leaves, deferred references keyed by
//! registry name, and become [`TypeDefinition`]s once every reference has
//! been replaced by the display name of its target.

use protogql_schema::{EnumValue, ScalarType};
use std::fmt;

/// Built-in GraphQL scalar types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scalar {
    /// Signed 32-bit integer.
    Int,
    /// Double precision floating point.
    Float,
    /// UTF-8 string.
    String,
    /// Boolean.
    Boolean,
}

impl Scalar {
    /// Returns the GraphQL type name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Int => "Int",
            Self::Float => "Float",
            Self::String => "String",
            Self::Boolean => "Boolean",
        }
    }
}

impl From<ScalarType> for Scalar {
    fn from(scalar: ScalarType) -> Self {
        match scalar {
            ScalarType::Double | ScalarType::Float => Self::Float,
            ScalarType::Int32
            | ScalarType::Int64
            | ScalarType::Uint32
            | ScalarType::Uint64
            | ScalarType::Sint32
            | ScalarType::Sint64
            | ScalarType::Fixed32
            | ScalarType::Fixed64
            | ScalarType::Sfixed32
            | ScalarType::Sfixed64 => Self::Int,
            ScalarType::Bool => Self::Boolean,
            ScalarType::String | ScalarType::Bytes => Self::String,
        }
    }
}

/// Deferred reference to a named type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// Built-in scalar, always resolvable.
    Scalar(Scalar),
    /// Output type by registry key.
    Output(String),
    /// Input type by base registry key (without suffix).
    Input(String),
}

/// Type expression with GraphQL list and non-null wrappers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeExpr<N = TypeRef> {
    /// Named type.
    Named(N),
    /// List of the inner type.
    List(Box<TypeExpr<N>>),
    /// Non-null wrapper.
    NonNull(Box<TypeExpr<N>>),
}

impl<N> TypeExpr<N> {
    /// Wraps the expression as non-null; already non-null stays unchanged.
    #[must_use]
    pub fn non_null(self) -> Self {
        match self {
            Self::NonNull(_) => self,
            other => Self::NonNull(Box::new(other)),
        }
    }

    /// Wraps the expression in a list.
    #[must_use]
    pub fn list(self) -> Self {
        Self::List(Box::new(self))
    }

    /// Returns true if the outermost wrapper is non-null.
    #[must_use]
    pub const fn is_non_null(&self) -> bool {
        matches!(self, Self::NonNull(_))
    }

    /// Returns the innermost named type.
    #[must_use]
    pub fn named_type(&self) -> &N {
        match self {
            Self::Named(name) => name,
            Self::List(inner) | Self::NonNull(inner) => inner.named_type(),
        }
    }

    /// Rebuilds the expression with every named leaf mapped through `f`.
    ///
    /// # Errors
    /// Returns the first error produced by `f`.
    pub fn try_map<M, E, F>(self, f: &mut F) -> Result<TypeExpr<M>, E>
    where
        F: FnMut(N) -> Result<M, E>,
    {
        Ok(match self {
            Self::Named(name) => TypeExpr::Named(f(name)?),
            Self::List(inner) => TypeExpr::List(Box::new(inner.try_map(f)?)),
            Self::NonNull(inner) => TypeExpr::NonNull(Box::new(inner.try_map(f)?)),
        })
    }
}

impl fmt::Display for TypeExpr<String> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.write_str(name),
            Self::List(inner) => write!(f, "[{inner}]"),
            Self::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}

/// Field of an object or input object type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEntry<N = TypeRef> {
    /// Field name.
    pub name: String,
    /// Field type.
    pub ty: TypeExpr<N>,
    /// Qualified name of the source field, used in error messages.
    pub source: String,
}

/// Member of a union type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnionMember<N = TypeRef> {
    /// Member object type.
    pub ty: N,
    /// Qualified name of the oneof field contributing the member.
    pub source: String,
}

/// Shape of a named type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind<N = TypeRef> {
    /// Output object type.
    Object(Vec<FieldEntry<N>>),
    /// Input object type.
    InputObject(Vec<FieldEntry<N>>),
    /// Enum type, values copied verbatim.
    Enum(Vec<EnumValue>),
    /// Union of object types.
    Union(Vec<UnionMember<N>>),
}

/// Named type registered in the conversion context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeEntry<N = TypeRef> {
    /// Display name.
    pub name: String,
    /// Type shape.
    pub kind: EntryKind<N>,
}

/// Fully resolved type definition handed to the printer.
pub type TypeDefinition = TypeEntry<String>;

impl<N> TypeEntry<N> {
    /// Creates an output object type.
    #[must_use]
    pub fn object(name: impl Into<String>, fields: Vec<FieldEntry<N>>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Object(fields),
        }
    }

    /// Creates an input object type.
    #[must_use]
    pub fn input_object(name: impl Into<String>, fields: Vec<FieldEntry<N>>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::InputObject(fields),
        }
    }

    /// Creates an enum type.
    #[must_use]
    pub fn enumeration(name: impl Into<String>, values: Vec<EnumValue>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Enum(values),
        }
    }

    /// Creates a union type.
    #[must_use]
    pub fn union(name: impl Into<String>, members: Vec<UnionMember<N>>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Union(members),
        }
    }

    /// Returns the fields of an object or input object type.
    #[must_use]
    pub fn fields(&self) -> &[FieldEntry<N>] {
        match &self.kind {
            EntryKind::Object(fields) | EntryKind::InputObject(fields) => fields,
            EntryKind::Enum(_) | EntryKind::Union(_) => &[],
        }
    }

    /// Returns the field with the given name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldEntry<N>> {
        self.fields().iter().find(|field| field.name == name)
    }

    /// Rebuilds the entry with every reference mapped through `f`.
    ///
    /// `f` receives the reference and the qualified source that holds it.
    ///
    /// # Errors
    /// Returns the first error produced by `f`.
    pub fn try_map<M, E, F>(self, mut f: F) -> Result<TypeEntry<M>, E>
    where
        F: FnMut(N, &str) -> Result<M, E>,
    {
        let map_fields = |fields: Vec<FieldEntry<N>>, f: &mut F| {
            fields
                .into_iter()
                .map(|field| {
                    let source = field.source;
                    let ty = field.ty.try_map(&mut |n| f(n, &source))?;
                    Ok(FieldEntry {
                        name: field.name,
                        ty,
                        source,
                    })
                })
                .collect::<Result<Vec<_>, E>>()
        };

        let kind = match self.kind {
            EntryKind::Object(fields) => EntryKind::Object(map_fields(fields, &mut f)?),
            EntryKind::InputObject(fields) => EntryKind::InputObject(map_fields(fields, &mut f)?),
            EntryKind::Enum(values) => EntryKind::Enum(values),
            EntryKind::Union(members) => EntryKind::Union(
                members
                    .into_iter()
                    .map(|member| {
                        let ty = f(member.ty, &member.source)?;
                        Ok(UnionMember {
                            ty,
                            source: member.source,
                        })
                    })
                    .collect::<Result<Vec<_>, E>>()?,
            ),
        };

        Ok(TypeEntry {
            name: self.name,
            kind,
        })
    }
}

/// Position of an emitted type in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntryKey {
    /// Output registry key.
    Output(String),
    /// Input registry key (suffixed).
    Input(String),
}
