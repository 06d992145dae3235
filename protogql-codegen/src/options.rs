//! Conversion options.

use std::fmt;

/// Function mapping a registry key to its display name.
pub type NameTransform = Box<dyn Fn(&str) -> String + Send + Sync>;

/// Predicate over registry keys.
pub type NamePredicate = Box<dyn Fn(&str) -> bool + Send + Sync>;

/// Default suffix appended to input type names.
pub const DEFAULT_INPUT_SUFFIX: &str = "Input";

/// Top-level types of `google/protobuf/descriptor.proto`. They only exist to
/// describe options and are never emitted.
const DESCRIPTOR_TYPES: [&str; 25] = [
    "FileDescriptorSet",
    "FileDescriptorProto",
    "DescriptorProto",
    "ExtensionRangeOptions",
    "FieldDescriptorProto",
    "OneofDescriptorProto",
    "EnumDescriptorProto",
    "EnumValueDescriptorProto",
    "ServiceDescriptorProto",
    "MethodDescriptorProto",
    "FileOptions",
    "MessageOptions",
    "FieldOptions",
    "OneofOptions",
    "EnumOptions",
    "EnumValueOptions",
    "ServiceOptions",
    "MethodOptions",
    "UninterpretedOption",
    "FeatureSet",
    "FeatureSetDefaults",
    "SourceCodeInfo",
    "GeneratedCodeInfo",
    "Edition",
    "SymbolVisibility",
];

/// Returns true for keys of option-definition types that are always skipped:
/// everything in `google.api` and the descriptor types of `google.protobuf`.
#[must_use]
pub fn is_internal_type(key: &str) -> bool {
    if key.starts_with("google_api_") {
        return true;
    }
    let Some(rest) = key.strip_prefix("google_protobuf_") else {
        return false;
    };
    DESCRIPTOR_TYPES.iter().any(|name| {
        rest.strip_prefix(name)
            .is_some_and(|tail| tail.is_empty() || tail.starts_with('_'))
    })
}

/// Options for one conversion run.
///
/// ```
/// use protogql_codegen::ConvertOptions;
///
/// let options = ConvertOptions::new()
///     .generate_input_types(true)
///     .input_type_name_suffix("Args")
///     .skip_type(|name| name.ends_with("Internal"));
/// assert!(options.skip_type_name("acme_Internal"));
/// ```
pub struct ConvertOptions {
    generate_input_types: bool,
    input_type_name_suffix: String,
    transform_type_name: Option<NameTransform>,
    skip_type: Option<NamePredicate>,
    skip_input: Option<NamePredicate>,
}

impl ConvertOptions {
    /// Creates options with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            generate_input_types: false,
            input_type_name_suffix: DEFAULT_INPUT_SUFFIX.to_string(),
            transform_type_name: None,
            skip_type: None,
            skip_input: None,
        }
    }

    /// Enables or disables input type generation.
    #[must_use]
    pub fn generate_input_types(mut self, enabled: bool) -> Self {
        self.generate_input_types = enabled;
        self
    }

    /// Sets the suffix appended to input type names.
    #[must_use]
    pub fn input_type_name_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.input_type_name_suffix = suffix.into();
        self
    }

    /// Sets the function applied to every qualified name before display.
    #[must_use]
    pub fn transform_type_name<F>(mut self, transform: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.transform_type_name = Some(Box::new(transform));
        self
    }

    /// Sets the predicate omitting output types by qualified name.
    #[must_use]
    pub fn skip_type<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.skip_type = Some(Box::new(predicate));
        self
    }

    /// Sets the predicate omitting input types by qualified name.
    #[must_use]
    pub fn skip_input<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.skip_input = Some(Box::new(predicate));
        self
    }

    /// Returns true if input types are generated.
    #[must_use]
    pub fn input_types_enabled(&self) -> bool {
        self.generate_input_types
    }

    /// Returns the input type name suffix.
    #[must_use]
    pub fn input_suffix(&self) -> &str {
        &self.input_type_name_suffix
    }

    /// Applies the display transform to a qualified name.
    #[must_use]
    pub fn display_name(&self, key: &str) -> String {
        match &self.transform_type_name {
            Some(transform) => transform(key),
            None => key.to_string(),
        }
    }

    /// Returns true if the output type with this qualified name is omitted.
    #[must_use]
    pub fn skip_type_name(&self, key: &str) -> bool {
        is_internal_type(key) || self.skip_type.as_ref().is_some_and(|skip| skip(key))
    }

    /// Returns true if the input type with this qualified name is omitted.
    #[must_use]
    pub fn skip_input_name(&self, key: &str) -> bool {
        is_internal_type(key) || self.skip_input.as_ref().is_some_and(|skip| skip(key))
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ConvertOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConvertOptions")
            .field("generate_input_types", &self.generate_input_types)
            .field("input_type_name_suffix", &self.input_type_name_suffix)
            .field("transform_type_name", &self.transform_type_name.is_some())
            .field("skip_type", &self.skip_type.is_some())
            .field("skip_input", &self.skip_input.is_some())
            .finish()
    }
}
