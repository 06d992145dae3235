//! SDL rendering.
//!
//! Output follows the layout of `graphql-js` `printSchema`: two-space
//! indentation, one field or value per line, and empty object types printed
//! without braces.

use crate::definition::{EntryKind, FieldEntry, TypeDefinition};

/// Printer for resolved type definitions.
pub struct SdlPrinter<'a> {
    definitions: &'a [TypeDefinition],
}

impl<'a> SdlPrinter<'a> {
    /// Creates a printer over definitions in emission order.
    #[must_use]
    pub fn new(definitions: &'a [TypeDefinition]) -> Self {
        Self { definitions }
    }

    /// Renders every definition, separated by blank lines, with a trailing
    /// newline. An empty schema renders as an empty string.
    #[must_use]
    pub fn print(&self) -> String {
        if self.definitions.is_empty() {
            return String::new();
        }
        let mut output = self
            .definitions
            .iter()
            .map(print_type)
            .collect::<Vec<_>>()
            .join("\n\n");
        output.push('\n');
        output
    }
}

/// Renders a single definition without a trailing newline.
#[must_use]
pub fn print_type(definition: &TypeDefinition) -> String {
    match &definition.kind {
        EntryKind::Object(fields) => print_fields("type", &definition.name, fields),
        EntryKind::InputObject(fields) => print_fields("input", &definition.name, fields),
        EntryKind::Enum(values) => {
            let mut output = format!("enum {}", definition.name);
            if !values.is_empty() {
                output.push_str(" {\n");
                for value in values {
                    output.push_str(&format!("  {}\n", value.name));
                }
                output.push('}');
            }
            output
        }
        EntryKind::Union(members) => {
            let mut output = format!("union {}", definition.name);
            if !members.is_empty() {
                let names: Vec<&str> = members.iter().map(|m| m.ty.as_str()).collect();
                output.push_str(&format!(" = {}", names.join(" | ")));
            }
            output
        }
    }
}

/// Renders a whole schema.
#[must_use]
pub fn print_schema(definitions: &[TypeDefinition]) -> String {
    SdlPrinter::new(definitions).print()
}

fn print_fields(keyword: &str, name: &str, fields: &[FieldEntry<String>]) -> String {
    let mut output = format!("{keyword} {name}");
    if fields.is_empty() {
        return output;
    }
    output.push_str(" {\n");
    for field in fields {
        output.push_str(&format!("  {}: {}\n", field.name, field.ty));
    }
    output.push('}');
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{TypeEntry, TypeExpr, UnionMember};
    use protogql_schema::EnumValue;

    fn field(name: &str, ty: TypeExpr<String>) -> FieldEntry<String> {
        FieldEntry {
            name: name.to_string(),
            ty,
            source: String::new(),
        }
    }

    fn named(name: &str) -> TypeExpr<String> {
        TypeExpr::Named(name.to_string())
    }

    #[test]
    fn test_print_object() {
        let def = TypeEntry::object(
            "Order",
            vec![
                field("id", named("String").non_null()),
                field("tags", named("String").non_null().list().non_null()),
                field("price", named("Price")),
            ],
        );
        assert_eq!(
            print_type(&def),
            "type Order {\n  id: String!\n  tags: [String!]!\n  price: Price\n}"
        );
    }

    #[test]
    fn test_print_input_enum_union() {
        let input = TypeEntry::input_object("OrderInput", vec![field("id", named("Int"))]);
        assert_eq!(print_type(&input), "input OrderInput {\n  id: Int\n}");

        let status = TypeEntry::enumeration(
            "Status",
            vec![EnumValue::new("OPEN", 0), EnumValue::new("DONE", 1)],
        );
        assert_eq!(print_type(&status), "enum Status {\n  OPEN\n  DONE\n}");

        let union = TypeEntry::union(
            "Payment_method",
            vec![
                UnionMember {
                    ty: "Card".to_string(),
                    source: String::new(),
                },
                UnionMember {
                    ty: "Bank".to_string(),
                    source: String::new(),
                },
            ],
        );
        assert_eq!(print_type(&union), "union Payment_method = Card | Bank");
    }

    #[test]
    fn test_print_empty_object() {
        let def: TypeDefinition = TypeEntry::object("Empty", Vec::new());
        assert_eq!(print_type(&def), "type Empty");
    }

    #[test]
    fn test_print_schema_layout() {
        let defs = vec![
            TypeEntry::object("A", vec![field("x", named("Int").non_null())]),
            TypeEntry::object("B", Vec::new()),
        ];
        assert_eq!(print_schema(&defs), "type A {\n  x: Int!\n}\n\ntype B\n");
        assert_eq!(print_schema(&[]), "");
    }
}
