//! Field definitions for message declarations.
//!
//! A field records its declared type, cardinality, oneof membership and
//! behavior set. References to other declarations are [`DeclId`]s into the
//! owning [`DeclarationTree`](crate::tree::DeclarationTree).

use crate::tree::DeclId;
use crate::types::{FieldBehavior, FieldBehaviors, ScalarType};

/// Declared type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// Built-in scalar.
    Scalar(ScalarType),
    /// Reference to a message declaration.
    Message(DeclId),
    /// Reference to an enum declaration.
    Enum(DeclId),
}

impl FieldType {
    /// Returns the referenced declaration, if any.
    #[must_use]
    pub const fn declaration(&self) -> Option<DeclId> {
        match self {
            Self::Scalar(_) => None,
            Self::Message(id) | Self::Enum(id) => Some(*id),
        }
    }

    /// Returns true for scalar and enum types.
    #[must_use]
    pub const fn is_scalar_or_enum(&self) -> bool {
        matches!(self, Self::Scalar(_) | Self::Enum(_))
    }
}

/// Field cardinality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cardinality {
    /// Single value.
    #[default]
    Singular,
    /// Repeated value.
    Repeated,
    /// Map field; the id points at the field's MapEntry declaration.
    Map(DeclId),
}

/// Field definition within a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Field name.
    pub name: String,
    /// Declared type. For map fields this is the value type.
    pub ty: FieldType,
    /// Field cardinality.
    pub cardinality: Cardinality,
    /// Oneof group this field belongs to.
    pub oneof: Option<DeclId>,
    /// Behavior annotations.
    pub behaviors: FieldBehaviors,
}

impl FieldDescriptor {
    /// Creates a singular field with no behaviors.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            ty,
            cardinality: Cardinality::Singular,
            oneof: None,
            behaviors: FieldBehaviors::new(),
        }
    }

    /// Creates a singular scalar field.
    #[must_use]
    pub fn scalar(name: impl Into<String>, scalar: ScalarType) -> Self {
        Self::new(name, FieldType::Scalar(scalar))
    }

    /// Marks the field as repeated.
    #[must_use]
    pub fn repeated(mut self) -> Self {
        self.cardinality = Cardinality::Repeated;
        self
    }

    /// Adds a behavior annotation.
    #[must_use]
    pub fn behavior(mut self, behavior: FieldBehavior) -> Self {
        self.behaviors.insert(behavior);
        self
    }

    /// Replaces the behavior set.
    #[must_use]
    pub fn behaviors(mut self, behaviors: impl Into<FieldBehaviors>) -> Self {
        self.behaviors = behaviors.into();
        self
    }

    /// Places the field in a oneof group.
    #[must_use]
    pub fn in_oneof(mut self, group: DeclId) -> Self {
        self.oneof = Some(group);
        self
    }

    /// Returns true if the field is repeated.
    #[must_use]
    pub const fn is_repeated(&self) -> bool {
        matches!(self.cardinality, Cardinality::Repeated)
    }

    /// Returns true if the field is a map.
    #[must_use]
    pub const fn is_map(&self) -> bool {
        matches!(self.cardinality, Cardinality::Map(_))
    }

    /// Returns true if the behavior set contains the given behavior.
    #[must_use]
    pub const fn has(&self, behavior: FieldBehavior) -> bool {
        self.behaviors.contains(behavior)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_descriptor_builder() {
        let field = FieldDescriptor::scalar("tags", ScalarType::String)
            .repeated()
            .behavior(FieldBehavior::Optional);

        assert_eq!(field.name, "tags");
        assert!(field.is_repeated());
        assert!(!field.is_map());
        assert!(field.has(FieldBehavior::Optional));
        assert!(!field.has(FieldBehavior::Required));
        assert_eq!(field.oneof, None);
    }

    #[test]
    fn test_field_type_declaration() {
        assert_eq!(FieldType::Scalar(ScalarType::Bool).declaration(), None);
        assert_eq!(FieldType::Message(DeclId(3)).declaration(), Some(DeclId(3)));
        assert!(FieldType::Enum(DeclId(1)).is_scalar_or_enum());
        assert!(!FieldType::Message(DeclId(1)).is_scalar_or_enum());
    }

    #[test]
    fn test_cardinality_default() {
        assert_eq!(Cardinality::default(), Cardinality::Singular);
    }
}
