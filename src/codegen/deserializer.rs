//! Deserializer module generation.
//!
//! The inverse glue of the serializer, but deliberately shallower: `avsc`
//! already decodes nested records and arrays into plain objects, so the
//! generated function only rewrites top-level fields, translating a decoded
//! `null` on an optional field back to `undefined` with `??`.

use crate::error::ConvertError;
use crate::model::json::write_schema;
use crate::model::schema::{AvroSchema, RecordSchema};

use super::import_specifier;

/// Generate the TypeScript deserializer module for one root record schema.
pub fn generate(import_path: &str, schema: &RecordSchema) -> Result<String, ConvertError> {
    let specifier = import_specifier(import_path)?;
    let fields = schema
        .fields
        .iter()
        .map(|field| {
            let init = match &field.schema {
                AvroSchema::Union(union) if union.is_nullable() => {
                    format!("raw.{name} ?? undefined", name = field.name)
                }
                _ => format!("raw.{name}", name = field.name),
            };
            format!("        {}: {init}", field.name)
        })
        .collect::<Vec<_>>()
        .join(",\n");
    Ok(format!(
        "import avro from 'avsc';\n\
         import {{ {name} }} from '{specifier}';\n\
         \n\
         const exactType = avro.Type.forSchema({json});\n\
         \n\
         export default function deserialize(value: Buffer): {name} {{\n\
         \x20   const raw = exactType.fromBuffer(value);\n\
         \x20   return {{\n\
         {fields}\n\
         \x20   }};\n\
         }}",
        name = schema.name,
        json = write_schema(schema),
    ))
}
