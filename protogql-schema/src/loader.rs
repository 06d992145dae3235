//! Protobuf descriptor loading.
//!
//! `.proto` files are compiled with `protox` into a `prost_reflect`
//! descriptor pool, which is then lowered into a [`DeclarationTree`].
//! Import resolution searches the include directories in order, then the
//! directory of each input file, then a bundled copy of
//! `google/api/field_behavior.proto`, then the Google well-known types.

use crate::error::LoadError;
use crate::fields::{Cardinality, FieldDescriptor, FieldType};
use crate::tree::{DeclId, DeclarationTree};
use crate::types::{EnumValue, FieldBehavior, FieldBehaviors, ScalarType};
use prost_reflect::{
    DescriptorPool, EnumDescriptor, ExtensionDescriptor, FileDescriptor, Kind, MessageDescriptor,
    Value,
};
use protox::Compiler;
use protox::file::{ChainFileResolver, File, FileResolver, GoogleFileResolver, IncludeFileResolver};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Import path of the bundled field behavior definitions.
pub const FIELD_BEHAVIOR_PROTO_PATH: &str = "google/api/field_behavior.proto";

/// Fully qualified name of the field behavior extension.
pub const FIELD_BEHAVIOR_EXTENSION: &str = "google.api.field_behavior";

const FIELD_BEHAVIOR_PROTO: &str = include_str!("../proto/google/api/field_behavior.proto");

/// Serves the bundled `google/api/field_behavior.proto`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledFileResolver;

impl FileResolver for BundledFileResolver {
    fn open_file(&self, name: &str) -> Result<File, protox::Error> {
        if name == FIELD_BEHAVIOR_PROTO_PATH {
            File::from_source(name, FIELD_BEHAVIOR_PROTO)
        } else {
            Err(protox::Error::file_not_found(name))
        }
    }
}

/// Compiles `.proto` files and loads them into a declaration tree.
///
/// # Arguments
/// * `files` - Input `.proto` files
/// * `includes` - Include directories searched for imports, in order
///
/// # Errors
/// Returns `LoadError` if a path cannot be read or compilation fails.
pub fn load_files<P, I>(files: &[P], includes: &[I]) -> Result<DeclarationTree, LoadError>
where
    P: AsRef<Path>,
    I: AsRef<Path>,
{
    let mut include_dirs: Vec<PathBuf> = Vec::with_capacity(includes.len() + 1);
    for dir in includes {
        include_dirs.push(std::fs::canonicalize(dir)?);
    }

    let mut inputs = Vec::with_capacity(files.len());
    for file in files {
        let path = std::fs::canonicalize(file)?;
        if !include_dirs.iter().any(|dir| path.starts_with(dir)) {
            let parent = path.parent().ok_or_else(|| LoadError::NotIncluded {
                path: path.display().to_string(),
            })?;
            include_dirs.push(parent.to_path_buf());
        }
        inputs.push(path);
    }

    let mut resolver = ChainFileResolver::new();
    for dir in &include_dirs {
        resolver.add(IncludeFileResolver::new(dir.clone()));
    }
    resolver.add(BundledFileResolver);
    resolver.add(GoogleFileResolver::new());

    let mut compiler = Compiler::with_file_resolver(resolver);
    compiler.include_imports(true).include_source_info(true);
    compiler.open_files(&inputs)?;

    tracing::debug!(
        "Compiled {} input file(s) with {} include dir(s)",
        inputs.len(),
        include_dirs.len()
    );

    tree_from_pool(&compiler.descriptor_pool())
}

/// Loads an encoded `FileDescriptorSet` (as written by `protoc -o`).
///
/// # Errors
/// Returns `LoadError` if the bytes are not a valid descriptor set.
pub fn load_descriptor_set(bytes: &[u8]) -> Result<DeclarationTree, LoadError> {
    let pool = DescriptorPool::decode(bytes)?;
    tree_from_pool(&pool)
}

/// Converts a descriptor pool into a declaration tree.
///
/// Every file in the pool contributes its package namespaces, messages and
/// enums. Map entry messages become MapEntry declarations owned by their
/// map field, and synthetic oneofs of proto3 `optional` fields mark the
/// field OPTIONAL instead of forming a group.
///
/// # Errors
/// Returns `LoadError` if a field references a type missing from the pool.
pub fn tree_from_pool(pool: &DescriptorPool) -> Result<DeclarationTree, LoadError> {
    let mut loader = PoolLoader {
        tree: DeclarationTree::new(),
        declarations: HashMap::new(),
        oneofs: HashMap::new(),
        messages: Vec::new(),
        behavior_extension: pool.get_extension_by_name(FIELD_BEHAVIOR_EXTENSION),
    };

    for file in pool.files() {
        loader.declare_file(&file);
    }

    let messages = std::mem::take(&mut loader.messages);
    for (descriptor, id) in &messages {
        loader.define_fields(descriptor, *id)?;
    }

    tracing::debug!(
        "Loaded {} declarations from {} file(s)",
        loader.tree.len() - 1,
        pool.files().count()
    );

    Ok(loader.tree)
}

/// Two-pass lowering state: declarations first, fields second.
struct PoolLoader {
    tree: DeclarationTree,
    declarations: HashMap<String, DeclId>,
    oneofs: HashMap<String, DeclId>,
    messages: Vec<(MessageDescriptor, DeclId)>,
    behavior_extension: Option<ExtensionDescriptor>,
}

/// A message or enum awaiting declaration.
enum Nested {
    Message(MessageDescriptor),
    Enum(EnumDescriptor),
}

impl Nested {
    fn path(&self) -> &[i32] {
        match self {
            Self::Message(m) => m.path(),
            Self::Enum(e) => e.path(),
        }
    }
}

impl PoolLoader {
    fn declare_file(&mut self, file: &FileDescriptor) {
        let order = SourceOrder::for_file(file);
        let namespace = self.tree.add_package(file.package_name());

        let nested = file
            .messages()
            .map(Nested::Message)
            .chain(file.enums().map(Nested::Enum))
            .collect();
        self.declare_nested(namespace, nested, &order);
    }

    fn declare_nested(&mut self, parent: DeclId, mut nested: Vec<Nested>, order: &SourceOrder) {
        nested.sort_by_key(|n| order.line(n.path()));

        for item in nested {
            match item {
                Nested::Message(message) => {
                    if message.is_map_entry() {
                        continue;
                    }
                    self.declare_message(parent, message, order);
                }
                Nested::Enum(enumeration) => {
                    let values = enumeration
                        .values()
                        .map(|v| EnumValue::new(v.name(), v.number()))
                        .collect();
                    let id = self.tree.add_enum(parent, enumeration.name(), values);
                    self.declarations
                        .insert(enumeration.full_name().to_string(), id);
                }
            }
        }
    }

    fn declare_message(&mut self, parent: DeclId, message: MessageDescriptor, order: &SourceOrder) {
        let id = self.tree.add_message(parent, message.name());
        self.declarations.insert(message.full_name().to_string(), id);

        for oneof in message.oneofs().filter(|o| !o.is_synthetic()) {
            let group = self.tree.add_oneof(id, to_lower_camel_case(oneof.name()));
            self.oneofs.insert(oneof.full_name().to_string(), group);
        }

        let nested = message
            .child_messages()
            .map(Nested::Message)
            .chain(message.child_enums().map(Nested::Enum))
            .collect();
        self.declare_nested(id, nested, order);

        self.messages.push((message, id));
    }

    fn define_fields(&mut self, message: &MessageDescriptor, id: DeclId) -> Result<(), LoadError> {
        for field in message.fields() {
            let mut behaviors = self.behaviors(&field);
            if field.cardinality() == prost_reflect::Cardinality::Required {
                behaviors.insert(FieldBehavior::Required);
            }

            if field.is_map() {
                let Kind::Message(entry) = field.kind() else {
                    return Err(LoadError::invalid(format!(
                        "map field '{}' has no entry message",
                        field.full_name()
                    )));
                };
                let key = match self.field_type(&entry.map_entry_key_field().kind())? {
                    FieldType::Scalar(key) => key,
                    FieldType::Message(_) | FieldType::Enum(_) => {
                        return Err(LoadError::invalid(format!(
                            "map field '{}' has a non-scalar key",
                            field.full_name()
                        )));
                    }
                };
                let value = self.field_type(&entry.map_entry_value_field().kind())?;
                self.tree
                    .add_map_field(id, field.json_name(), key, value, behaviors);
                continue;
            }

            let oneof = match field.containing_oneof() {
                Some(oneof) if oneof.is_synthetic() => {
                    behaviors.insert(FieldBehavior::Optional);
                    None
                }
                Some(oneof) => self.oneofs.get(oneof.full_name()).copied(),
                None => None,
            };

            let cardinality = if field.is_list() {
                Cardinality::Repeated
            } else {
                Cardinality::Singular
            };

            self.tree.add_field(
                id,
                FieldDescriptor {
                    name: field.json_name().to_string(),
                    ty: self.field_type(&field.kind())?,
                    cardinality,
                    oneof,
                    behaviors,
                },
            );
        }
        Ok(())
    }

    fn field_type(&self, kind: &Kind) -> Result<FieldType, LoadError> {
        let scalar = match kind {
            Kind::Double => ScalarType::Double,
            Kind::Float => ScalarType::Float,
            Kind::Int32 => ScalarType::Int32,
            Kind::Int64 => ScalarType::Int64,
            Kind::Uint32 => ScalarType::Uint32,
            Kind::Uint64 => ScalarType::Uint64,
            Kind::Sint32 => ScalarType::Sint32,
            Kind::Sint64 => ScalarType::Sint64,
            Kind::Fixed32 => ScalarType::Fixed32,
            Kind::Fixed64 => ScalarType::Fixed64,
            Kind::Sfixed32 => ScalarType::Sfixed32,
            Kind::Sfixed64 => ScalarType::Sfixed64,
            Kind::Bool => ScalarType::Bool,
            Kind::String => ScalarType::String,
            Kind::Bytes => ScalarType::Bytes,
            Kind::Message(message) => {
                return self.lookup(message.full_name()).map(FieldType::Message);
            }
            Kind::Enum(enumeration) => {
                return self.lookup(enumeration.full_name()).map(FieldType::Enum);
            }
        };
        Ok(FieldType::Scalar(scalar))
    }

    fn lookup(&self, full_name: &str) -> Result<DeclId, LoadError> {
        self.declarations
            .get(full_name)
            .copied()
            .ok_or_else(|| LoadError::invalid(format!("type '{full_name}' is not declared")))
    }

    /// Reads `(google.api.field_behavior)` values from the field options.
    fn behaviors(&self, field: &prost_reflect::FieldDescriptor) -> FieldBehaviors {
        let mut behaviors = FieldBehaviors::new();
        let Some(extension) = &self.behavior_extension else {
            return behaviors;
        };
        let Kind::Enum(values) = extension.kind() else {
            return behaviors;
        };

        let options = field.options();
        if !options.has_extension(extension) {
            return behaviors;
        }

        let value = options.get_extension(extension);
        let numbers: Vec<i32> = match value.as_ref() {
            Value::List(items) => items.iter().filter_map(Value::as_enum_number).collect(),
            Value::EnumNumber(number) => vec![*number],
            _ => Vec::new(),
        };

        for number in numbers {
            if let Some(behavior) = values
                .get_value(number)
                .and_then(|v| FieldBehavior::from_name(v.name()))
            {
                behaviors.insert(behavior);
            }
        }
        behaviors
    }
}

/// Start lines of declarations, keyed by source-info path.
struct SourceOrder {
    lines: HashMap<Vec<i32>, i32>,
}

impl SourceOrder {
    fn for_file(file: &FileDescriptor) -> Self {
        let lines = file
            .file_descriptor_proto()
            .source_code_info
            .as_ref()
            .map(|info| {
                info.location
                    .iter()
                    .filter_map(|loc| loc.span.first().map(|line| (loc.path.clone(), *line)))
                    .collect()
            })
            .unwrap_or_default();
        Self { lines }
    }

    /// Returns the start line, or `i32::MAX` when no source info exists so
    /// that a stable sort keeps descriptor order.
    fn line(&self, path: &[i32]) -> i32 {
        self.lines.get(path).copied().unwrap_or(i32::MAX)
    }
}

/// Converts a snake_case identifier to lowerCamelCase.
#[must_use]
pub fn to_lower_camel_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut capitalize_next = false;

    for c in s.chars() {
        if c == '_' {
            capitalize_next = !result.is_empty();
        } else if capitalize_next {
            result.push(c.to_ascii_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }

    result
}
