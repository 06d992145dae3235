//! Map field conversion.
//!
//! A map field becomes a list of synthetic `<K>_<V>_map` objects holding a
//! non-null `key` and a `value`. Map fields with the same key and value types
//! share one synthetic type.

use crate::context::Context;
use crate::definition::{EntryKey, FieldEntry, Scalar, TypeEntry, TypeExpr, TypeRef};
use crate::error::ConvertError;
use crate::mapper::{Side, TypeMapper};
use crate::names::NameResolver;
use protogql_schema::{Cardinality, DeclId, DeclKind, FieldDescriptor, ScalarType};

/// Registers the synthetic key/value types of map fields.
#[derive(Debug, Clone, Copy)]
pub struct MapFieldMaterializer<'a> {
    names: NameResolver<'a>,
    mapper: TypeMapper<'a>,
}

impl<'a> MapFieldMaterializer<'a> {
    /// Creates a materializer.
    #[must_use]
    pub fn new(names: NameResolver<'a>, mapper: TypeMapper<'a>) -> Self {
        Self { names, mapper }
    }

    /// Registers the output and input entry types for a map field.
    ///
    /// A side on which the field is hidden gets no entry type. Returns the
    /// newly registered keys in emission order; reused types are not
    /// emitted again.
    ///
    /// # Errors
    /// Returns `InvalidTree` if the field is not a map field, and
    /// `DuplicateTypeName` if a different type is already registered under
    /// the entry key.
    pub fn materialize(
        &self,
        ctx: &mut Context<'_>,
        field: &FieldDescriptor,
    ) -> Result<Vec<EntryKey>, ConvertError> {
        let Cardinality::Map(entry) = field.cardinality else {
            return Err(ConvertError::invalid_tree(format!(
                "field '{}' is not a map field",
                field.name
            )));
        };
        let key_type = self.key_type(entry)?;
        let key = self.mapper.map_entry_key(entry, &field.ty)?;
        let mut emitted = Vec::new();

        if Side::Output.is_visible(field.behaviors) {
            if ctx.skip_type(&key) {
                tracing::debug!("Skipping output type {}", key);
            } else {
                let value = self.mapper.value_type(ctx, field, Side::Output);
                let entry =
                    TypeEntry::object(self.names.display(&key), Self::fields(&key, key_type, value));
                if Self::register(ctx, Side::Output, &key, entry)? {
                    emitted.push(EntryKey::Output(key.clone()));
                }
            }
        }

        if ctx.generate_input_types() && Side::Input.is_visible(field.behaviors) {
            if ctx.skip_input(&key) {
                tracing::debug!("Skipping input type {}", key);
            } else {
                let value = self.mapper.value_type(ctx, field, Side::Input);
                let entry = TypeEntry::input_object(
                    self.names.input_display(&key),
                    Self::fields(&key, key_type, value),
                );
                let input_key = ctx.input_key(&key);
                if Self::register(ctx, Side::Input, &input_key, entry)? {
                    emitted.push(EntryKey::Input(input_key));
                }
            }
        }

        Ok(emitted)
    }

    fn key_type(&self, entry: DeclId) -> Result<ScalarType, ConvertError> {
        match self.names.tree().get(entry).map(|node| &node.kind) {
            Some(DeclKind::MapEntry { key }) => Ok(*key),
            Some(
                DeclKind::Namespace | DeclKind::Message | DeclKind::Enum(_) | DeclKind::Oneof,
            )
            | None => Err(ConvertError::invalid_tree(format!(
                "declaration {} is not a map entry",
                entry.index()
            ))),
        }
    }

    fn fields(key: &str, key_type: ScalarType, value: TypeExpr) -> Vec<FieldEntry> {
        vec![
            FieldEntry {
                name: "key".to_string(),
                ty: TypeExpr::Named(TypeRef::Scalar(Scalar::from(key_type))).non_null(),
                source: format!("{key}.key"),
            },
            FieldEntry {
                name: "value".to_string(),
                ty: value,
                source: format!("{key}.value"),
            },
        ]
    }

    /// Registers `entry` unless an identical one exists. Returns true if the
    /// entry was newly registered.
    fn register(
        ctx: &mut Context<'_>,
        side: Side,
        key: &str,
        entry: TypeEntry,
    ) -> Result<bool, ConvertError> {
        let existing = match side {
            Side::Output => ctx.output(key),
            Side::Input => ctx.input(key),
        };
        match existing {
            Some(existing) if *existing == entry => {
                tracing::debug!("Reusing map entry type {}", key);
                Ok(false)
            }
            Some(_) => Err(ConvertError::duplicate(key)),
            None => {
                match side {
                    Side::Output => ctx.set_output(key, entry)?,
                    Side::Input => ctx.set_input(key, entry)?,
                }
                Ok(true)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ConvertOptions;
    use protogql_schema::{DeclarationTree, FieldBehavior, FieldBehaviors, FieldType};

    fn catalog() -> (DeclarationTree, DeclId, DeclId) {
        let mut tree = DeclarationTree::new();
        let root = tree.root();
        let price = tree.add_message(root, "Price");
        let catalog = tree.add_message(root, "Catalog");
        (tree, price, catalog)
    }

    fn map_field(tree: &mut DeclarationTree, message: DeclId, name: &str, value: FieldType) -> FieldDescriptor {
        let entry = tree.add_map_field(
            message,
            name,
            ScalarType::String,
            value,
            FieldBehaviors::new(),
        );
        tree.map_field(message, entry).expect("map field").clone()
    }

    #[test]
    fn test_string_to_message_map() {
        let (mut tree, price, catalog) = catalog();
        let field = map_field(&mut tree, catalog, "prices", FieldType::Message(price));
        let options = ConvertOptions::new();
        let names = NameResolver::new(&tree, &options);
        let maps = MapFieldMaterializer::new(names, TypeMapper::new(names));
        let mut ctx = Context::new(&options);

        let keys = maps.materialize(&mut ctx, &field).expect("materialize");
        assert_eq!(keys, vec![EntryKey::Output("String_Price_map".to_string())]);

        ctx.set_output("Price", TypeEntry::object("Price", Vec::new()))
            .expect("price");
        let defs = ctx.finish(&keys).expect("finish");
        let entry = &defs[0];
        assert_eq!(entry.name, "String_Price_map");
        assert_eq!(entry.field("key").expect("key").ty.to_string(), "String!");
        assert_eq!(entry.field("value").expect("value").ty.to_string(), "Price");
    }

    #[test]
    fn test_identical_entries_reused() {
        let (mut tree, price, catalog) = catalog();
        let first = map_field(&mut tree, catalog, "prices", FieldType::Message(price));
        let second = map_field(&mut tree, catalog, "discounts", FieldType::Message(price));
        let options = ConvertOptions::new().generate_input_types(true);
        let names = NameResolver::new(&tree, &options);
        let maps = MapFieldMaterializer::new(names, TypeMapper::new(names));
        let mut ctx = Context::new(&options);

        let keys = maps.materialize(&mut ctx, &first).expect("first");
        assert_eq!(
            keys,
            vec![
                EntryKey::Output("String_Price_map".to_string()),
                EntryKey::Input("String_Price_mapInput".to_string()),
            ]
        );
        assert!(maps.materialize(&mut ctx, &second).expect("second").is_empty());
    }

    #[test]
    fn test_behaviors_share_one_entry() {
        let (mut tree, price, catalog) = catalog();
        let labels = map_field(
            &mut tree,
            catalog,
            "labels",
            FieldType::Scalar(ScalarType::String),
        );
        let optional_labels = FieldDescriptor {
            behaviors: FieldBehaviors::from([FieldBehavior::Optional]),
            ..map_field(
                &mut tree,
                catalog,
                "tags",
                FieldType::Scalar(ScalarType::String),
            )
        };
        let prices = map_field(&mut tree, catalog, "prices", FieldType::Message(price));
        let required_prices = FieldDescriptor {
            behaviors: FieldBehaviors::from([FieldBehavior::Required]),
            ..map_field(&mut tree, catalog, "fixed", FieldType::Message(price))
        };
        let options = ConvertOptions::new();
        let names = NameResolver::new(&tree, &options);
        let maps = MapFieldMaterializer::new(names, TypeMapper::new(names));
        let mut ctx = Context::new(&options);

        let mut keys = maps.materialize(&mut ctx, &optional_labels).expect("optional");
        assert!(maps.materialize(&mut ctx, &labels).expect("plain").is_empty());
        keys.extend(maps.materialize(&mut ctx, &prices).expect("prices"));
        assert!(maps.materialize(&mut ctx, &required_prices).expect("required").is_empty());

        ctx.set_output("Price", TypeEntry::object("Price", Vec::new()))
            .expect("price");
        let defs = ctx.finish(&keys).expect("finish");
        assert_eq!(defs[0].name, "String_String_map");
        assert_eq!(defs[0].field("value").expect("value").ty.to_string(), "String!");
        assert_eq!(defs[1].name, "String_Price_map");
        assert_eq!(defs[1].field("value").expect("value").ty.to_string(), "Price");
    }

    #[test]
    fn test_entry_key_taken_by_other_type() {
        let (mut tree, price, catalog) = catalog();
        let prices = map_field(&mut tree, catalog, "prices", FieldType::Message(price));
        let options = ConvertOptions::new();
        let names = NameResolver::new(&tree, &options);
        let maps = MapFieldMaterializer::new(names, TypeMapper::new(names));
        let mut ctx = Context::new(&options);
        ctx.set_output("String_Price_map", TypeEntry::object("String_Price_map", Vec::new()))
            .expect("message");

        let err = maps.materialize(&mut ctx, &prices).unwrap_err();
        assert!(matches!(err, ConvertError::DuplicateTypeName { name } if name == "String_Price_map"));
    }

    #[test]
    fn test_value_ignores_visibility() {
        let (mut tree, _, catalog) = catalog();
        let mut field = map_field(
            &mut tree,
            catalog,
            "labels",
            FieldType::Scalar(ScalarType::String),
        );
        field.behaviors = FieldBehaviors::from([FieldBehavior::InputOnly]);
        let options = ConvertOptions::new().generate_input_types(true);
        let names = NameResolver::new(&tree, &options);
        let maps = MapFieldMaterializer::new(names, TypeMapper::new(names));
        let mut ctx = Context::new(&options);

        let keys = maps.materialize(&mut ctx, &field).expect("materialize");
        assert_eq!(keys, vec![EntryKey::Input("String_String_mapInput".to_string())]);
        let input = ctx.input("String_String_mapInput").expect("input");
        assert_eq!(input.fields().len(), 2);
    }

    #[test]
    fn test_non_map_field_rejected() {
        let (tree, _, _) = catalog();
        let options = ConvertOptions::new();
        let names = NameResolver::new(&tree, &options);
        let maps = MapFieldMaterializer::new(names, TypeMapper::new(names));
        let mut ctx = Context::new(&options);
        let field = FieldDescriptor::scalar("id", ScalarType::String);
        assert!(matches!(
            maps.materialize(&mut ctx, &field),
            Err(ConvertError::InvalidTree { .. })
        ));
    }
}
