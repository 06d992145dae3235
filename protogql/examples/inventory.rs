//! Example building a declaration tree by hand and printing its schema.
//!
//! Run with: `cargo run --example inventory`

use protogql::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut tree = DeclarationTree::new();
    let pkg = tree.add_package("inventory.v1");

    let item = tree.add_message(pkg, "Item");
    let kind = tree.add_enum(
        item,
        "Kind",
        vec![EnumValue::new("KIND_UNSPECIFIED", 0), EnumValue::new("KIND_BULK", 1)],
    );
    let location = tree.add_message(pkg, "Location");
    let source = tree.add_oneof(item, "source");

    tree.add_field(
        item,
        FieldDescriptor::scalar("sku", ScalarType::String).behavior(FieldBehavior::OutputOnly),
    );
    tree.add_field(item, FieldDescriptor::new("kind", FieldType::Enum(kind)));
    tree.add_field(
        item,
        FieldDescriptor::scalar("labels", ScalarType::String).repeated(),
    );
    tree.add_field(
        item,
        FieldDescriptor::new("warehouse", FieldType::Message(location)).in_oneof(source),
    );
    tree.add_field(
        item,
        FieldDescriptor::scalar("supplier", ScalarType::String).in_oneof(source),
    );
    tree.add_map_field(
        item,
        "stock",
        ScalarType::String,
        FieldType::Scalar(ScalarType::Uint32),
        FieldBehaviors::new(),
    );
    tree.add_field(
        location,
        FieldDescriptor::scalar("code", ScalarType::String).behavior(FieldBehavior::Required),
    );

    let options = ConvertOptions::new()
        .generate_input_types(true)
        .transform_type_name(|key| key.trim_start_matches("inventory_v1_").to_string());

    print!("{}", convert_to_sdl(&tree, &options)?);
    Ok(())
}
