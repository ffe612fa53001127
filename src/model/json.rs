// ==============================================================================
// Schema Writer: Canonical JSON for Avro Schemas
// ==============================================================================
//
// Serializes the `AvroSchema` domain model to `.avsc` JSON text. Two rules
// matter here:
//
// - Key order is canonical (alphabetical) at every nesting level, so that the
//   same schema always produces byte-identical text. The generated serializer
//   code embeds this text verbatim, and tests diff it, so stability matters.
//   `serde_json::Map` is backed by a BTreeMap (we do not enable the
//   `preserve_order` feature), which gives us the ordering for free; we still
//   insert keys alphabetically so the output does not silently change if a
//   future dependency flips that feature on.
// - A union with exactly one member serializes as that member directly, not
//   wrapped in an array; two or more members serialize as a JSON array. This
//   mirrors Avro's own union syntax (bare type vs. array-of-types) and is
//   applied recursively. An optional `null`-typed field relies on this: its
//   `["null", "null"]` union dedups to one member and must come out as the
//   bare string `"null"`.

use serde_json::{Map, Value, json};

use super::schema::{AvroSchema, Field, RecordSchema};

/// Serialize a record schema to canonical (compact, alphabetical-key) JSON
/// text. Byte-identical across calls for the same input.
pub fn write_schema(record: &RecordSchema) -> String {
    record_json(record).to_string()
}

/// Serialize a record schema to pretty-printed JSON (2-space indent), for the
/// CLI's `--pretty` flag. Key order matches [`write_schema`].
pub fn write_schema_pretty(record: &RecordSchema) -> String {
    serde_json::to_string_pretty(&record_json(record))
        .expect("Value serialization cannot fail")
}

/// Serialize any schema node to its JSON representation.
pub fn schema_json(schema: &AvroSchema) -> Value {
    if let Some(name) = schema.primitive_name() {
        return Value::String(name.to_string());
    }

    match schema {
        AvroSchema::Logical(logical) => json!({
            "logicalType": logical.logical_name(),
            "type": logical.base_name(),
        }),

        AvroSchema::Record(record) => record_json(record),

        AvroSchema::Enum { name, symbols } => json!({
            "name": name,
            "symbols": symbols,
            "type": "enum",
        }),

        AvroSchema::Array(items) => {
            let mut obj = Map::new();
            obj.insert("items".to_string(), schema_json(items));
            obj.insert("type".to_string(), Value::String("array".to_string()));
            Value::Object(obj)
        }

        // The union flattening rule: one member serializes bare, several
        // serialize as an array, in member order.
        AvroSchema::Union(union) => match union.members() {
            [single] => schema_json(single),
            members => Value::Array(members.iter().map(schema_json).collect()),
        },

        primitive => {
            unreachable!("primitive {primitive:?} already handled via primitive_name()")
        }
    }
}

fn record_json(record: &RecordSchema) -> Value {
    let mut obj = Map::new();
    if !record.aliases.is_empty() {
        obj.insert(
            "aliases".to_string(),
            Value::Array(
                record
                    .aliases
                    .iter()
                    .map(|a| Value::String(a.clone()))
                    .collect(),
            ),
        );
    }
    if let Some(doc) = &record.doc {
        obj.insert("doc".to_string(), Value::String(doc.clone()));
    }
    obj.insert(
        "fields".to_string(),
        Value::Array(record.fields.iter().map(field_json).collect()),
    );
    obj.insert("name".to_string(), Value::String(record.name.clone()));
    if let Some(ns) = &record.namespace {
        obj.insert("namespace".to_string(), Value::String(ns.clone()));
    }
    obj.insert("type".to_string(), Value::String("record".to_string()));
    Value::Object(obj)
}

fn field_json(field: &Field) -> Value {
    let mut obj = Map::new();
    if !field.aliases.is_empty() {
        obj.insert(
            "aliases".to_string(),
            Value::Array(
                field
                    .aliases
                    .iter()
                    .map(|a| Value::String(a.clone()))
                    .collect(),
            ),
        );
    }
    if let Some(default) = &field.default {
        obj.insert("default".to_string(), default.clone());
    }
    if let Some(doc) = &field.doc {
        obj.insert("doc".to_string(), Value::String(doc.clone()));
    }
    obj.insert("name".to_string(), Value::String(field.name.clone()));
    if let Some(order) = &field.order {
        obj.insert(
            "order".to_string(),
            Value::String(order.as_str().to_string()),
        );
    }
    obj.insert("type".to_string(), schema_json(&field.schema));
    Value::Object(obj)
}
