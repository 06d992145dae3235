//! Scalar, behavior and enum value definitions.
//!
//! This module contains the leaf data structures of the declaration tree:
//! protobuf scalar kinds, the field behavior vocabulary and enum values.

use std::fmt;

/// Protobuf scalar value types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    /// 64-bit floating point.
    Double,
    /// 32-bit floating point.
    Float,
    /// Variable-length signed 32-bit integer.
    Int32,
    /// Variable-length signed 64-bit integer.
    Int64,
    /// Variable-length unsigned 32-bit integer.
    Uint32,
    /// Variable-length unsigned 64-bit integer.
    Uint64,
    /// Zigzag-encoded signed 32-bit integer.
    Sint32,
    /// Zigzag-encoded signed 64-bit integer.
    Sint64,
    /// Fixed-width unsigned 32-bit integer.
    Fixed32,
    /// Fixed-width unsigned 64-bit integer.
    Fixed64,
    /// Fixed-width signed 32-bit integer.
    Sfixed32,
    /// Fixed-width signed 64-bit integer.
    Sfixed64,
    /// Boolean.
    Bool,
    /// UTF-8 string.
    String,
    /// Arbitrary byte sequence.
    Bytes,
}

impl ScalarType {
    /// All scalar types, in protobuf declaration order.
    pub const ALL: [ScalarType; 15] = [
        Self::Double,
        Self::Float,
        Self::Int32,
        Self::Int64,
        Self::Uint32,
        Self::Uint64,
        Self::Sint32,
        Self::Sint64,
        Self::Fixed32,
        Self::Fixed64,
        Self::Sfixed32,
        Self::Sfixed64,
        Self::Bool,
        Self::String,
        Self::Bytes,
    ];

    /// Parses a scalar type from its `.proto` keyword.
    #[must_use]
    pub fn from_proto_name(s: &str) -> Option<Self> {
        match s {
            "double" => Some(Self::Double),
            "float" => Some(Self::Float),
            "int32" => Some(Self::Int32),
            "int64" => Some(Self::Int64),
            "uint32" => Some(Self::Uint32),
            "uint64" => Some(Self::Uint64),
            "sint32" => Some(Self::Sint32),
            "sint64" => Some(Self::Sint64),
            "fixed32" => Some(Self::Fixed32),
            "fixed64" => Some(Self::Fixed64),
            "sfixed32" => Some(Self::Sfixed32),
            "sfixed64" => Some(Self::Sfixed64),
            "bool" => Some(Self::Bool),
            "string" => Some(Self::String),
            "bytes" => Some(Self::Bytes),
            _ => None,
        }
    }

    /// Returns the `.proto` keyword for this scalar type.
    #[must_use]
    pub const fn proto_name(&self) -> &'static str {
        match self {
            Self::Double => "double",
            Self::Float => "float",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Uint32 => "uint32",
            Self::Uint64 => "uint64",
            Self::Sint32 => "sint32",
            Self::Sint64 => "sint64",
            Self::Fixed32 => "fixed32",
            Self::Fixed64 => "fixed64",
            Self::Sfixed32 => "sfixed32",
            Self::Sfixed64 => "sfixed64",
            Self::Bool => "bool",
            Self::String => "string",
            Self::Bytes => "bytes",
        }
    }

    /// Returns true if this is a floating point type.
    #[must_use]
    pub const fn is_floating_point(&self) -> bool {
        matches!(self, Self::Double | Self::Float)
    }

    /// Returns true if this is an integer type of any width or signedness.
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        !self.is_floating_point() && !matches!(self, Self::Bool | Self::String | Self::Bytes)
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.proto_name())
    }
}

/// Field behavior annotation, as in `(google.api.field_behavior)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldBehavior {
    /// The field must always be set.
    Required,
    /// The field may be left unset.
    Optional,
    /// The field is only accepted in requests.
    InputOnly,
    /// The field is only returned in responses.
    OutputOnly,
}

impl FieldBehavior {
    /// Parses a behavior from its `google.api.FieldBehavior` value name.
    ///
    /// Values outside the supported vocabulary return `None`.
    #[must_use]
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "REQUIRED" => Some(Self::Required),
            "OPTIONAL" => Some(Self::Optional),
            "INPUT_ONLY" => Some(Self::InputOnly),
            "OUTPUT_ONLY" => Some(Self::OutputOnly),
            _ => None,
        }
    }

    /// Returns the `google.api.FieldBehavior` value name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Required => "REQUIRED",
            Self::Optional => "OPTIONAL",
            Self::InputOnly => "INPUT_ONLY",
            Self::OutputOnly => "OUTPUT_ONLY",
        }
    }

    const fn bit(&self) -> u8 {
        match self {
            Self::Required => 1,
            Self::Optional => 1 << 1,
            Self::InputOnly => 1 << 2,
            Self::OutputOnly => 1 << 3,
        }
    }
}

/// Set of field behaviors attached to a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FieldBehaviors(u8);

impl FieldBehaviors {
    /// Creates an empty behavior set.
    #[must_use]
    pub const fn new() -> Self {
        Self(0)
    }

    /// Returns true if the behavior is present.
    #[must_use]
    pub const fn contains(&self, behavior: FieldBehavior) -> bool {
        self.0 & behavior.bit() != 0
    }

    /// Adds a behavior.
    pub fn insert(&mut self, behavior: FieldBehavior) {
        self.0 |= behavior.bit();
    }

    /// Removes a behavior.
    pub fn remove(&mut self, behavior: FieldBehavior) {
        self.0 &= !behavior.bit();
    }

    /// Returns a copy with the behavior added.
    #[must_use]
    pub const fn with(self, behavior: FieldBehavior) -> Self {
        Self(self.0 | behavior.bit())
    }

    /// Returns a copy with the behavior removed.
    #[must_use]
    pub const fn without(self, behavior: FieldBehavior) -> Self {
        Self(self.0 & !behavior.bit())
    }

    /// Returns true if no behavior is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Iterates over the behaviors in the set.
    pub fn iter(&self) -> impl Iterator<Item = FieldBehavior> {
        let set = *self;
        [
            FieldBehavior::Required,
            FieldBehavior::Optional,
            FieldBehavior::InputOnly,
            FieldBehavior::OutputOnly,
        ]
        .into_iter()
        .filter(move |b| set.contains(*b))
    }
}

impl FromIterator<FieldBehavior> for FieldBehaviors {
    fn from_iter<I: IntoIterator<Item = FieldBehavior>>(iter: I) -> Self {
        let mut set = Self::new();
        for behavior in iter {
            set.insert(behavior);
        }
        set
    }
}

impl<const N: usize> From<[FieldBehavior; N]> for FieldBehaviors {
    fn from(behaviors: [FieldBehavior; N]) -> Self {
        behaviors.into_iter().collect()
    }
}

/// Enum value definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumValue {
    /// Value name.
    pub name: String,
    /// Numeric value.
    pub number: i32,
}

impl EnumValue {
    /// Creates a new enum value.
    #[must_use]
    pub fn new(name: impl Into<String>, number: i32) -> Self {
        Self {
            name: name.into(),
            number,
        }
    }
}
