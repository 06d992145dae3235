//! # protogql Codegen
//!
//! GraphQL schema generation from protobuf declaration trees.
//!
//! This crate provides:
//! - Type mapping with field-behavior driven nullability
//! - Oneof groups as unions or flattened objects
//! - Synthetic key/value types for map fields
//! - Optional input type variants
//! - SDL rendering
//!
//! ```
//! use protogql_codegen::{ConvertOptions, convert_to_sdl};
//! use protogql_schema::{DeclarationTree, FieldDescriptor, ScalarType};
//!
//! let mut tree = DeclarationTree::new();
//! let pkg = tree.add_package("shop");
//! let order = tree.add_message(pkg, "Order");
//! tree.add_field(order, FieldDescriptor::scalar("tags", ScalarType::String).repeated());
//!
//! let sdl = convert_to_sdl(&tree, &ConvertOptions::new()).unwrap();
//! assert_eq!(sdl, "type shop_Order {\n  tags: [String!]!\n}\n");
//! ```

pub mod context;
pub mod definition;
pub mod error;
pub mod mapper;
pub mod maps;
pub mod names;
pub mod oneof;
pub mod options;
pub mod sdl;
pub mod walker;

pub use context::Context;
pub use definition::{
    EntryKey, EntryKind, FieldEntry, Scalar, TypeDefinition, TypeEntry, TypeExpr, TypeRef,
    UnionMember,
};
pub use error::ConvertError;
pub use mapper::{Side, TypeMapper};
pub use maps::MapFieldMaterializer;
pub use names::{NameResolver, QualifiedName};
pub use oneof::OneofResolver;
pub use options::{ConvertOptions, DEFAULT_INPUT_SUFFIX};
pub use sdl::{SdlPrinter, print_schema, print_type};
pub use walker::TreeWalker;

use protogql_schema::DeclarationTree;
use std::path::Path;

/// Converts a declaration tree into ordered GraphQL type definitions.
///
/// # Arguments
/// * `tree` - Declaration tree to convert
/// * `options` - Conversion options
///
/// # Returns
/// Resolved definitions in emission order.
///
/// # Errors
/// Returns `ConvertError` if the tree is malformed, a reference cannot be
/// resolved, or two types share a name. No partial output is produced.
pub fn convert(
    tree: &DeclarationTree,
    options: &ConvertOptions,
) -> Result<Vec<TypeDefinition>, ConvertError> {
    protogql_schema::validate_tree(tree)?;

    let mut ctx = Context::new(options);
    let order = TreeWalker::new(tree, options).walk(&mut ctx)?;
    let definitions = ctx.finish(&order)?;

    tracing::info!(
        "Converted {} declarations into {} GraphQL types",
        tree.len() - 1,
        definitions.len()
    );
    Ok(definitions)
}

/// Converts a declaration tree into SDL text.
///
/// # Errors
/// Returns `ConvertError` if conversion fails.
pub fn convert_to_sdl(
    tree: &DeclarationTree,
    options: &ConvertOptions,
) -> Result<String, ConvertError> {
    let definitions = convert(tree, options)?;
    Ok(print_schema(&definitions))
}

/// Loads `.proto` files and converts them into SDL text.
///
/// # Arguments
/// * `files` - Input `.proto` files
/// * `includes` - Include directories searched for imports
/// * `options` - Conversion options
///
/// # Errors
/// Returns `ConvertError` if loading or conversion fails.
pub fn convert_files<P, I>(
    files: &[P],
    includes: &[I],
    options: &ConvertOptions,
) -> Result<String, ConvertError>
where
    P: AsRef<Path>,
    I: AsRef<Path>,
{
    let tree = protogql_schema::load_files(files, includes)?;
    convert_to_sdl(&tree, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use protogql_schema::{EnumValue, FieldBehavior, FieldDescriptor, FieldType, ScalarType};

    /// `shop.Order` with an enum, a nested message, a oneof of messages, a
    /// map field and an output-only id.
    fn shop_tree() -> DeclarationTree {
        let mut tree = DeclarationTree::new();
        let pkg = tree.add_package("shop");
        let price = tree.add_message(pkg, "Price");
        tree.add_field(price, FieldDescriptor::scalar("amount", ScalarType::Double));
        tree.add_field(
            price,
            FieldDescriptor::scalar("currency", ScalarType::String)
                .behavior(FieldBehavior::Optional),
        );

        let order = tree.add_message(pkg, "Order");
        let status = tree.add_enum(
            order,
            "Status",
            vec![EnumValue::new("OPEN", 0), EnumValue::new("SHIPPED", 3)],
        );
        let card = tree.add_message(pkg, "Card");
        let voucher = tree.add_message(pkg, "Voucher");
        let payment = tree.add_oneof(order, "payment");

        tree.add_field(
            order,
            FieldDescriptor::scalar("id", ScalarType::String).behavior(FieldBehavior::OutputOnly),
        );
        tree.add_field(order, FieldDescriptor::new("status", FieldType::Enum(status)));
        tree.add_field(
            order,
            FieldDescriptor::new("total", FieldType::Message(price)).behavior(FieldBehavior::Required),
        );
        tree.add_field(
            order,
            FieldDescriptor::new("card", FieldType::Message(card)).in_oneof(payment),
        );
        tree.add_field(
            order,
            FieldDescriptor::new("voucher", FieldType::Message(voucher)).in_oneof(payment),
        );
        tree.add_map_field(
            order,
            "prices",
            ScalarType::String,
            FieldType::Message(price),
            Default::default(),
        );
        tree
    }

    #[test]
    fn test_convert_shop_schema() {
        let tree = shop_tree();
        let sdl = convert_to_sdl(&tree, &ConvertOptions::new()).expect("convert");
        let expected = "\
type shop_Price {
  amount: Float!
  currency: String
}

type shop_Order {
  id: String!
  status: shop_Order_Status!
  total: shop_Price!
  payment: shop_Order_payment
  prices: [String_shop_Price_map!]!
}

union shop_Order_payment = shop_Card | shop_Voucher

type String_shop_Price_map {
  key: String!
  value: shop_Price
}

enum shop_Order_Status {
  OPEN
  SHIPPED
}

type shop_Card

type shop_Voucher
";
        assert_eq!(sdl, expected);
    }

    #[test]
    fn test_convert_with_inputs() {
        let tree = shop_tree();
        let options = ConvertOptions::new()
            .generate_input_types(true)
            .transform_type_name(|key| key.trim_start_matches("shop_").to_string());
        let defs = convert(&tree, &options).expect("convert");

        let names: Vec<_> = defs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Price",
                "PriceInput",
                "Order",
                "OrderInput",
                "Order_payment",
                "Order_paymentInput",
                "String_Price_map",
                "String_Price_mapInput",
                "Order_Status",
                "Card",
                "CardInput",
                "Voucher",
                "VoucherInput",
            ]
        );

        let input = defs.iter().find(|d| d.name == "OrderInput").expect("input");
        assert!(input.field("id").is_none());
        assert_eq!(input.field("status").expect("status").ty.to_string(), "Order_Status!");
        assert_eq!(input.field("total").expect("total").ty.to_string(), "PriceInput!");
        assert_eq!(
            input.field("payment").expect("payment").ty.to_string(),
            "Order_paymentInput"
        );
        assert_eq!(
            input.field("prices").expect("prices").ty.to_string(),
            "[String_Price_mapInput!]!"
        );
    }

    #[test]
    fn test_convert_is_idempotent() {
        let tree = shop_tree();
        let options = ConvertOptions::new().generate_input_types(true);
        let first = convert_to_sdl(&tree, &options).expect("first");
        let second = convert_to_sdl(&tree, &options).expect("second");
        assert_eq!(first, second);
    }

    #[test]
    fn test_skipped_reference_is_unresolved() {
        let tree = shop_tree();
        let options = ConvertOptions::new().skip_type(|key| key == "shop_Price");
        let err = convert(&tree, &options).unwrap_err();
        match err {
            ConvertError::UnresolvedTypeReference { field, target } => {
                assert_eq!(field, "shop_Order.total");
                assert_eq!(target, "shop_Price");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_skipped_input_reference_is_unresolved() {
        let mut tree = DeclarationTree::new();
        let root = tree.root();
        let secret = tree.add_message(root, "Secret");
        tree.add_field(secret, FieldDescriptor::scalar("v", ScalarType::String));
        let holder = tree.add_message(root, "Holder");
        tree.add_field(holder, FieldDescriptor::new("secret", FieldType::Message(secret)));

        let options = ConvertOptions::new()
            .generate_input_types(true)
            .skip_input(|key| key == "Secret");
        let err = convert(&tree, &options).unwrap_err();
        match err {
            ConvertError::UnresolvedTypeReference { field, target } => {
                assert_eq!(field, "Holder.secret");
                assert_eq!(target, "SecretInput");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_skip_unreferenced_type() {
        let mut tree = DeclarationTree::new();
        let root = tree.root();
        tree.add_message(root, "Keep");
        tree.add_message(root, "Drop");

        let options = ConvertOptions::new().skip_type(|key| key == "Drop");
        let sdl = convert_to_sdl(&tree, &options).expect("convert");
        assert_eq!(sdl, "type Keep\n");
    }

    #[test]
    fn test_forward_reference_across_namespaces() {
        let mut tree = DeclarationTree::new();
        let a = tree.add_package("a");
        let b = tree.add_package("b");
        let user = tree.add_message(a, "User");
        let address = tree.add_message(b, "Address");
        tree.add_field(user, FieldDescriptor::new("home", FieldType::Message(address)));

        let sdl = convert_to_sdl(&tree, &ConvertOptions::new()).expect("convert");
        assert_eq!(sdl, "type a_User {\n  home: b_Address\n}\n\ntype b_Address\n");
    }

    #[test]
    fn test_mixed_oneof_flattened() {
        let mut tree = DeclarationTree::new();
        let root = tree.root();
        let card = tree.add_message(root, "Card");
        let msg = tree.add_message(root, "Payment");
        let method = tree.add_oneof(msg, "method");
        tree.add_field(
            msg,
            FieldDescriptor::new("card", FieldType::Message(card)).in_oneof(method),
        );
        tree.add_field(
            msg,
            FieldDescriptor::scalar("code", ScalarType::Int32)
                .behavior(FieldBehavior::Required)
                .in_oneof(method),
        );

        let defs = convert(&tree, &ConvertOptions::new()).expect("convert");
        let group = defs
            .iter()
            .find(|d| d.name == "Payment_method")
            .expect("group");
        assert_eq!(
            print_type(group),
            "type Payment_method {\n  card: Card\n  code: Int\n}"
        );
    }

    #[test]
    fn test_convert_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("catalog.proto");
        std::fs::write(
            &path,
            r#"syntax = "proto3";
package catalog;

import "google/api/field_behavior.proto";

message Product {
  string sku = 1 [(google.api.field_behavior) = REQUIRED];
  optional string title = 2;
  repeated string tags = 3;
  map<string, int64> stock = 4;
}
"#,
        )
        .expect("write proto");

        let options = ConvertOptions::new()
            .transform_type_name(|key| key.trim_start_matches("catalog_").to_string());
        let sdl = convert_files(&[&path], &[dir.path()], &options).expect("convert");
        assert_eq!(
            sdl,
            "\
type Product {
  sku: String!
  title: String
  tags: [String!]!
  stock: [String_Int_map!]!
}

type String_Int_map {
  key: String!
  value: Int!
}
"
        );
    }

    #[test]
    fn test_invalid_tree_rejected() {
        let mut tree = DeclarationTree::new();
        let root = tree.root();
        let msg = tree.add_message(root, "Broken");
        let status = tree.add_enum(root, "Status", vec![EnumValue::new("A", 0)]);
        tree.add_field(msg, FieldDescriptor::new("s", FieldType::Message(status)));

        let err = convert(&tree, &ConvertOptions::new()).unwrap_err();
        assert!(matches!(err, ConvertError::Schema(_)));
    }
}
