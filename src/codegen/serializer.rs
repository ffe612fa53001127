//! Serializer module generation.
//!
//! The serializer maps a host value into the shape `avsc` expects before
//! encoding: absent optional properties (`undefined`) become explicit
//! `null`s, and records are rebuilt as object literals so that extra
//! properties on the input value never leak into the encoder.

use crate::error::ConvertError;
use crate::model::json::write_schema;
use crate::model::schema::{AvroSchema, RecordSchema};

use super::{import_specifier, indent_of};

/// Generate the TypeScript serializer module for one root record schema.
///
/// `import_path` is the path from the generated module to the source of the
/// type declaration, relative (`./` or `../`), with or without the `.ts`
/// extension.
pub fn generate(import_path: &str, schema: &RecordSchema) -> Result<String, ConvertError> {
    let specifier = import_specifier(import_path)?;
    Ok(format!(
        "import avro from 'avsc';\n\
         import {{ {name} }} from '{specifier}';\n\
         \n\
         const exactType = avro.Type.forSchema({json});\n\
         \n\
         export default function serialize(value: {name}): Buffer {{\n\
         \x20   return exactType.toBuffer({mapped});\n\
         }}",
        name = schema.name,
        json = write_schema(schema),
        mapped = mapped_record(schema, 1, "value"),
    ))
}

/// Emit the object literal that rebuilds `source` field by field. Fields are
/// indented one level deeper than the literal's braces.
fn mapped_record(record: &RecordSchema, indents: usize, source: &str) -> String {
    let fields = record
        .fields
        .iter()
        .map(|field| {
            let access = format!("{source}.{}", field.name);
            format!(
                "{}{}: {}",
                indent_of(indents + 1),
                field.name,
                value_expr(&field.schema, &access, indents)
            )
        })
        .collect::<Vec<_>>()
        .join(",\n");
    format!("{{\n{fields}\n{}}}", indent_of(indents))
}

/// The expression that produces the wire-shaped value for `source`.
///
/// Most types pass straight through; the encoder handles them natively. The
/// exceptions are nullable unions (absent means `undefined` on the host but
/// `null` on the wire, and the strict `=== undefined` comparison is
/// deliberate so that a host-side `null` is not silently absorbed), records
/// (rebuilt as object literals), and arrays whose items need rebuilding.
fn value_expr(schema: &AvroSchema, source: &str, indents: usize) -> String {
    match schema {
        AvroSchema::Union(union) if union.is_nullable() => {
            let present = match union.members() {
                [_null, base] => value_expr(base, source, indents),
                _ => source.to_string(),
            };
            format!("{source} === undefined ? null : {present}")
        }
        AvroSchema::Record(record) => mapped_record(record, indents + 1, source),
        AvroSchema::Array(item) if needs_mapping(item) => {
            format!("{source}.map(value => {})", item_expr(item, indents))
        }
        _ => source.to_string(),
    }
}

/// The body of a `.map` callback for one array item. The callback rebinds
/// `value`, so item access always starts from that name. A record item is
/// parenthesized so the object literal is not parsed as a block body.
fn item_expr(item: &AvroSchema, indents: usize) -> String {
    match item {
        AvroSchema::Record(record) => {
            format!("({})", mapped_record(record, indents + 1, "value"))
        }
        other => value_expr(other, "value", indents),
    }
}

/// Whether array items of this type must be rebuilt element by element.
/// Records always are; arrays inherit from their item type.
fn needs_mapping(schema: &AvroSchema) -> bool {
    match schema {
        AvroSchema::Record(_) => true,
        AvroSchema::Array(item) => needs_mapping(item),
        _ => false,
    }
}
