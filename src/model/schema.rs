use serde_json::Value;

/// Field sort order in Avro schemas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldOrder {
    Ascending,
    Descending,
    Ignore,
}

impl FieldOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldOrder::Ascending => "ascending",
            FieldOrder::Descending => "descending",
            FieldOrder::Ignore => "ignore",
        }
    }
}

/// Avro logical types that overlay a primitive base type.
///
/// The base type per logical type is fixed by the Avro specification; it is
/// not configurable here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalType {
    /// `uuid` -> string
    Uuid,
    /// `date` -> int
    Date,
    /// `time-millis` -> int
    TimeMillis,
    /// `time-micros` -> long
    TimeMicros,
    /// `timestamp-millis` -> long
    TimestampMillis,
    /// `timestamp-micros` -> long
    TimestampMicros,
    /// `local-timestamp-millis` -> long
    LocalTimestampMillis,
    /// `local-timestamp-micros` -> long
    LocalTimestampMicros,
}

impl LogicalType {
    /// The `logicalType` name as it appears in schema JSON.
    pub fn logical_name(&self) -> &'static str {
        match self {
            LogicalType::Uuid => "uuid",
            LogicalType::Date => "date",
            LogicalType::TimeMillis => "time-millis",
            LogicalType::TimeMicros => "time-micros",
            LogicalType::TimestampMillis => "timestamp-millis",
            LogicalType::TimestampMicros => "timestamp-micros",
            LogicalType::LocalTimestampMillis => "local-timestamp-millis",
            LogicalType::LocalTimestampMicros => "local-timestamp-micros",
        }
    }

    /// The primitive base type name carried in the `type` key.
    pub fn base_name(&self) -> &'static str {
        match self {
            LogicalType::Uuid => "string",
            LogicalType::Date | LogicalType::TimeMillis => "int",
            LogicalType::TimeMicros
            | LogicalType::TimestampMillis
            | LogicalType::TimestampMicros
            | LogicalType::LocalTimestampMillis
            | LogicalType::LocalTimestampMicros => "long",
        }
    }
}

/// An Avro schema.
///
/// We use our own domain model rather than depending on an Avro library
/// crate, because we need full control over JSON serialization: unions must
/// flatten to Avro's bare-type-or-array syntax, and key order must be
/// canonical so that emitted schema text is stable across runs.
#[derive(Debug, Clone, PartialEq)]
pub enum AvroSchema {
    // Primitives
    Null,
    Boolean,
    Int,
    Long,
    Float,
    Double,
    Bytes,
    String,

    /// A logical type overlaying a primitive.
    Logical(LogicalType),

    /// A named record with ordered fields.
    Record(RecordSchema),

    /// A named enum with ordered, unique symbols.
    Enum {
        name: std::string::String,
        symbols: Vec<std::string::String>,
    },

    /// An array of a single item type.
    Array(Box<AvroSchema>),

    /// A union; see [`Union`] for the construction invariants.
    Union(Union),
}

impl AvroSchema {
    /// The Avro type name for primitives, or `None` for complex types.
    pub fn primitive_name(&self) -> Option<&'static str> {
        Some(match self {
            AvroSchema::Null => "null",
            AvroSchema::Boolean => "boolean",
            AvroSchema::Int => "int",
            AvroSchema::Long => "long",
            AvroSchema::Float => "float",
            AvroSchema::Double => "double",
            AvroSchema::Bytes => "bytes",
            AvroSchema::String => "string",
            _ => return None,
        })
    }
}

/// A record schema: the only shape that can appear at the top level of an
/// emitted `.avsc` file.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSchema {
    pub name: String,
    pub fields: Vec<Field>,
    pub namespace: Option<String>,
    pub doc: Option<String>,
    pub aliases: Vec<String>,
}

impl RecordSchema {
    /// A record with just a name and fields, which is all the TypeScript
    /// front end ever produces.
    pub fn new(name: impl Into<String>, fields: Vec<Field>, doc: Option<String>) -> RecordSchema {
        RecordSchema {
            name: name.into(),
            fields,
            namespace: None,
            doc,
            aliases: Vec::new(),
        }
    }
}

/// A field in a record schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub schema: AvroSchema,
    pub doc: Option<String>,
    pub default: Option<Value>,
    pub order: Option<FieldOrder>,
    pub aliases: Vec<String>,
}

impl Field {
    pub fn new(name: impl Into<String>, schema: AvroSchema) -> Field {
        Field {
            name: name.into(),
            schema,
            doc: None,
            default: None,
            order: None,
            aliases: Vec::new(),
        }
    }
}

// ==============================================================================
// Unions
// ==============================================================================

/// An Avro union with two invariants enforced on construction:
///
/// - no member is itself a union (nested unions are flattened), and
/// - members are deduplicated by structural equality, first occurrence wins.
///
/// The member list is private so the invariants cannot be bypassed after
/// construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Union {
    members: Vec<AvroSchema>,
}

impl Union {
    /// Build a union from the given members, flattening nested unions and
    /// dropping structural duplicates.
    pub fn new(members: impl IntoIterator<Item = AvroSchema>) -> Union {
        let mut flat: Vec<AvroSchema> = Vec::new();
        for member in members {
            match member {
                AvroSchema::Union(inner) => {
                    for m in inner.members {
                        if !flat.contains(&m) {
                            flat.push(m);
                        }
                    }
                }
                other => {
                    if !flat.contains(&other) {
                        flat.push(other);
                    }
                }
            }
        }
        Union { members: flat }
    }

    /// Wrap a base type in a nullable union: `["null", base]`. If the base is
    /// already a union, its members are folded in after `null` rather than
    /// nested.
    pub fn nullable(base: AvroSchema) -> Union {
        Union::new([AvroSchema::Null, base])
    }

    pub fn members(&self) -> &[AvroSchema] {
        &self.members
    }

    /// Whether this union admits `null` as its first member, which is how
    /// optional fields are encoded.
    pub fn is_nullable(&self) -> bool {
        self.members.first() == Some(&AvroSchema::Null)
    }
}
