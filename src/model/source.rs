// ==============================================================================
// Source Type Model: TypeScript Declarations as Seen by the Converter
// ==============================================================================
//
// This is the contract between the parser (or any other front end, e.g. a
// reflection-based one) and the schema converter. Everything here is plain
// immutable data: the parser builds a `ParsedAst` once, and the converter
// walks it without mutation.
//
// Type references are stored by *name*, not by pointer. The `ParsedAst`
// carries a reference map (referenced name -> set of referencing declaration
// names) alongside the declaration list, which keeps the data model free of
// cyclic object graphs and makes cycle detection a pure graph algorithm over
// names (see `convert.rs`).

use indexmap::{IndexMap, IndexSet};

/// Referenced declaration name -> names of the declarations that reference it.
///
/// Every key must resolve to either a [`Declaration`] in the same AST or a
/// recognized built-in marker type (`AvroInt`, `AvroUuid`, ...); the converter
/// validates this. A declaration whose name never appears as a key is a
/// *root* and becomes a top-level emitted schema.
pub type ReferenceMap = IndexMap<String, IndexSet<String>>;

/// A parsed TypeScript source file: its record-like declarations in source
/// order, plus the reference graph between them.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedAst {
    pub declarations: Vec<Declaration>,
    pub references: ReferenceMap,
}

/// An `export interface` or `export type` declaration (or an anonymous inline
/// object literal type, which has the same shape).
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub name: String,
    pub fields: Vec<FieldDecl>,
    /// JSDoc text attached to the declaration, if any.
    pub doc: Option<String>,
}

/// A single property signature inside a declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub name: String,
    pub ty: SourceType,
    /// True when the property was declared with `?`. Optional properties map
    /// to a `["null", ...]` union on the Avro side.
    pub optional: bool,
    /// `// @avro ...` annotations immediately preceding the property.
    pub annotations: Vec<Annotation>,
    /// JSDoc text attached to the property, if any.
    pub doc: Option<String>,
}

/// The TypeScript-side type algebra.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceType {
    /// `number`
    Number,
    /// `string`
    String,
    /// `boolean`
    Boolean,
    /// `Buffer` or `Uint8Array`
    Bytes,
    /// A literal type: `null`, `true`, `'foo'`, `42`, ...
    Literal(LiteralValue),
    /// A reference to another declaration (or built-in marker type) by name.
    Reference(String),
    /// `T[]`
    Array(Box<SourceType>),
    /// `A | B | C`, at least one member.
    Union(Vec<SourceType>),
    /// An anonymous inline object literal type: `{ a: string; b?: number }`.
    Inline(Declaration),
}

/// The value of a TypeScript literal type.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Null,
    Boolean(bool),
    String(String),
    Number(f64),
}

impl LiteralValue {
    /// The literal's value rendered as a string, as it would appear as an
    /// Avro enum symbol. Integer-valued numbers render without a fraction.
    pub fn as_symbol(&self) -> String {
        match self {
            LiteralValue::Null => "null".to_string(),
            LiteralValue::Boolean(b) => b.to_string(),
            LiteralValue::String(s) => s.clone(),
            LiteralValue::Number(n) => {
                if n.fract() == 0.0 && n.is_finite() {
                    format!("{}", *n as i64)
                } else {
                    format!("{n}")
                }
            }
        }
    }

    /// A coarse kind tag, used to reject mixed-kind literal unions.
    pub fn kind(&self) -> &'static str {
        match self {
            LiteralValue::Null => "null",
            LiteralValue::Boolean(_) => "boolean",
            LiteralValue::String(_) => "string",
            LiteralValue::Number(_) => "number",
        }
    }
}

// ==============================================================================
// Annotations
// ==============================================================================
//
// The original `// @avro ...` comments are free-form strings. We parse them
// into a closed enumeration up front so that an unrecognized annotation is
// rejected at parse time with a source span, instead of being silently
// ignored during conversion.

/// A recognized `// @avro <name>` annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Annotation {
    Uuid,
    Int,
    Long,
    Float,
    Double,
    Date,
    TimeMillis,
    TimeMicros,
    TimestampMillis,
    TimestampMicros,
    LocalTimestampMillis,
    LocalTimestampMicros,
}

impl Annotation {
    /// Parse the payload of a `// @avro <name>` comment. Returns `None` for
    /// unrecognized names; the caller decides how to report that.
    pub fn parse(name: &str) -> Option<Annotation> {
        Some(match name {
            "uuid" => Annotation::Uuid,
            "int" => Annotation::Int,
            "long" => Annotation::Long,
            "float" => Annotation::Float,
            "double" => Annotation::Double,
            "date" => Annotation::Date,
            "time-millis" => Annotation::TimeMillis,
            "time-micros" => Annotation::TimeMicros,
            "timestamp-millis" => Annotation::TimestampMillis,
            "timestamp-micros" => Annotation::TimestampMicros,
            "local-timestamp-millis" => Annotation::LocalTimestampMillis,
            "local-timestamp-micros" => Annotation::LocalTimestampMicros,
            _ => return None,
        })
    }

    /// The annotation name as written in source.
    pub fn as_str(&self) -> &'static str {
        match self {
            Annotation::Uuid => "uuid",
            Annotation::Int => "int",
            Annotation::Long => "long",
            Annotation::Float => "float",
            Annotation::Double => "double",
            Annotation::Date => "date",
            Annotation::TimeMillis => "time-millis",
            Annotation::TimeMicros => "time-micros",
            Annotation::TimestampMillis => "timestamp-millis",
            Annotation::TimestampMicros => "timestamp-micros",
            Annotation::LocalTimestampMillis => "local-timestamp-millis",
            Annotation::LocalTimestampMicros => "local-timestamp-micros",
        }
    }

    /// Whether this annotation selects a specialization of `number`. At most
    /// one numeric-kind annotation may appear on a single property.
    pub fn is_numeric_kind(&self) -> bool {
        !matches!(self, Annotation::Uuid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annotation_parse_round_trips() {
        for name in [
            "uuid",
            "int",
            "long",
            "float",
            "double",
            "date",
            "time-millis",
            "time-micros",
            "timestamp-millis",
            "timestamp-micros",
            "local-timestamp-millis",
            "local-timestamp-micros",
        ] {
            let ann = Annotation::parse(name)
                .unwrap_or_else(|| panic!("{name} should be a recognized annotation"));
            assert_eq!(ann.as_str(), name);
        }
    }

    #[test]
    fn test_annotation_parse_rejects_unknown() {
        assert_eq!(Annotation::parse("decimal"), None);
        assert_eq!(Annotation::parse(""), None);
        assert_eq!(Annotation::parse("INT"), None);
    }

    #[test]
    fn test_literal_as_symbol() {
        assert_eq!(LiteralValue::String("foo".into()).as_symbol(), "foo");
        assert_eq!(LiteralValue::Number(34.0).as_symbol(), "34");
        assert_eq!(LiteralValue::Number(1.5).as_symbol(), "1.5");
        assert_eq!(LiteralValue::Boolean(true).as_symbol(), "true");
        assert_eq!(LiteralValue::Null.as_symbol(), "null");
    }
}
