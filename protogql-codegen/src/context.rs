//! Type registry for one conversion run.
//!
//! Output and input types live in separate maps keyed by untransformed
//! qualified names. Field types refer to other entries through
//! [`TypeRef`]s, so an entry may reference a type that has not been
//! registered yet. Every reference is resolved once in [`Context::finish`].

use crate::definition::{EntryKey, EntryKind, TypeDefinition, TypeEntry, TypeRef};
use crate::error::ConvertError;
use crate::options::ConvertOptions;
use indexmap::IndexMap;
use std::collections::HashSet;

/// Output and input type registry.
#[derive(Debug)]
pub struct Context<'a> {
    options: &'a ConvertOptions,
    outputs: IndexMap<String, TypeEntry>,
    inputs: IndexMap<String, TypeEntry>,
}

impl<'a> Context<'a> {
    /// Creates an empty registry for one run.
    #[must_use]
    pub fn new(options: &'a ConvertOptions) -> Self {
        Self {
            options,
            outputs: IndexMap::new(),
            inputs: IndexMap::new(),
        }
    }

    /// Returns the run's options.
    #[must_use]
    pub fn options(&self) -> &'a ConvertOptions {
        self.options
    }

    /// Returns true if input variants are generated.
    #[must_use]
    pub fn generate_input_types(&self) -> bool {
        self.options.input_types_enabled()
    }

    /// Returns the input registry key for a base key.
    #[must_use]
    pub fn input_key(&self, key: &str) -> String {
        format!("{key}{}", self.options.input_suffix())
    }

    /// Registers an output type.
    ///
    /// # Errors
    /// Returns `DuplicateTypeName` if the key is already registered.
    pub fn set_output(&mut self, key: impl Into<String>, entry: TypeEntry) -> Result<(), ConvertError> {
        let key = key.into();
        if self.outputs.contains_key(&key) {
            return Err(ConvertError::duplicate(key));
        }
        tracing::debug!("Registered output type {}", key);
        self.outputs.insert(key, entry);
        Ok(())
    }

    /// Registers an input type.
    ///
    /// # Errors
    /// Returns `DuplicateTypeName` if the key is already registered.
    pub fn set_input(&mut self, key: impl Into<String>, entry: TypeEntry) -> Result<(), ConvertError> {
        let key = key.into();
        if self.inputs.contains_key(&key) {
            return Err(ConvertError::duplicate(key));
        }
        tracing::debug!("Registered input type {}", key);
        self.inputs.insert(key, entry);
        Ok(())
    }

    /// Returns a deferred reference to an output type.
    #[must_use]
    pub fn get_output(&self, key: &str) -> TypeRef {
        TypeRef::Output(key.to_string())
    }

    /// Returns a deferred reference to the input variant of a type.
    ///
    /// Resolution falls back to an input registered under the bare key
    /// (enums), then to the output type. With input generation on, the
    /// output fallback only accepts enums.
    #[must_use]
    pub fn get_input(&self, key: &str) -> TypeRef {
        TypeRef::Input(key.to_string())
    }

    /// Returns the registered output entry for a key.
    #[must_use]
    pub fn output(&self, key: &str) -> Option<&TypeEntry> {
        self.outputs.get(key)
    }

    /// Returns the registered input entry for a key.
    #[must_use]
    pub fn input(&self, key: &str) -> Option<&TypeEntry> {
        self.inputs.get(key)
    }

    /// Returns true if the output type for this key is omitted.
    #[must_use]
    pub fn skip_type(&self, key: &str) -> bool {
        self.options.skip_type_name(key)
    }

    /// Returns true if the input type for this key is omitted.
    #[must_use]
    pub fn skip_input(&self, key: &str) -> bool {
        self.options.skip_input_name(key)
    }

    /// Resolves a reference to the display name of its target.
    #[must_use]
    pub fn resolve(&self, reference: &TypeRef) -> Option<String> {
        match reference {
            TypeRef::Scalar(scalar) => Some(scalar.name().to_string()),
            TypeRef::Output(key) => self.outputs.get(key).map(|entry| entry.name.clone()),
            TypeRef::Input(key) => self
                .inputs
                .get(&self.input_key(key))
                .or_else(|| self.inputs.get(key))
                .or_else(|| {
                    // With input generation on, only enums may stand in for a
                    // missing input type.
                    self.outputs.get(key).filter(|entry| {
                        !self.generate_input_types() || matches!(entry.kind, EntryKind::Enum(_))
                    })
                })
                .map(|entry| entry.name.clone()),
        }
    }

    /// Resolves every reference of the emitted entries, in emission order.
    ///
    /// # Errors
    /// Returns `UnresolvedTypeReference` for a reference with no registered
    /// target, and `DuplicateTypeName` if two emitted entries share a display
    /// name.
    pub fn finish(self, order: &[EntryKey]) -> Result<Vec<TypeDefinition>, ConvertError> {
        let mut names = HashSet::new();
        let mut definitions = Vec::with_capacity(order.len());

        for key in order {
            let entry = match key {
                EntryKey::Output(key) => self.outputs.get(key),
                EntryKey::Input(key) => self.inputs.get(key),
            }
            .ok_or_else(|| ConvertError::invalid_tree(format!("{key:?} was never registered")))?;

            if !names.insert(entry.name.clone()) {
                return Err(ConvertError::duplicate(entry.name.clone()));
            }

            let definition = entry.clone().try_map(|reference, source| {
                self.resolve(&reference).ok_or_else(|| {
                    let target = match reference {
                        TypeRef::Input(key) => self.input_key(&key),
                        TypeRef::Output(key) => key,
                        TypeRef::Scalar(scalar) => scalar.name().to_string(),
                    };
                    ConvertError::unresolved(source, target)
                })
            })?;
            definitions.push(definition);
        }

        tracing::debug!(
            "Resolved {} definitions ({} outputs, {} inputs registered)",
            definitions.len(),
            self.outputs.len(),
            self.inputs.len()
        );
        Ok(definitions)
    }
}
