// ==============================================================================
// Schema Converter: Source Type Model -> Avro Record Schemas
// ==============================================================================
//
// Pure, single-pass conversion of a `ParsedAst` into one Avro record schema
// per *root* declaration. A root is a declaration that no other declaration
// references; referenced declarations are inlined (structurally duplicated)
// at every use site, so the emitted `.avsc` files are each self-contained.
//
// Validation happens up front, in a fixed order:
//
//   1. the AST must contain at least one declaration;
//   2. declaration names must be unique;
//   3. every reference-map key must resolve to a declaration or a built-in
//      marker type;
//   4. the reference graph must be acyclic (inlining a cycle would never
//      terminate).
//
// Only then are the root declarations converted. Conversion itself can still
// fail on per-field problems (conflicting annotations, unions that cannot
// become enums).

use indexmap::IndexMap;

use crate::error::ConvertError;
use crate::model::schema::{AvroSchema, Field, LogicalType, RecordSchema, Union};
use crate::model::source::{
    Annotation, Declaration, FieldDecl, LiteralValue, ParsedAst, SourceType,
};

/// Convert a parsed AST into Avro record schemas, one per root declaration,
/// in declaration order.
pub fn convert(ast: &ParsedAst) -> Result<Vec<RecordSchema>, ConvertError> {
    if ast.declarations.is_empty() {
        return Err(ConvertError::NoDeclarations);
    }

    let mut decls: IndexMap<&str, &Declaration> = IndexMap::new();
    for decl in &ast.declarations {
        if decls.insert(decl.name.as_str(), decl).is_some() {
            return Err(ConvertError::DuplicateDeclaration {
                name: decl.name.clone(),
            });
        }
    }

    // Every referenced name must be either a declaration in this AST or one
    // of the built-in `Avro*` marker types.
    for (referenced, referencers) in &ast.references {
        if !decls.contains_key(referenced.as_str()) && builtin_marker(referenced).is_none() {
            return Err(ConvertError::UnresolvedReference {
                name: referenced.clone(),
                referencers: referencers.iter().cloned().collect(),
            });
        }
    }

    if let Some(path) = find_cycle(&decls, &ast.references) {
        return Err(ConvertError::CyclicReference { path });
    }

    let converter = Converter { decls, ast };

    // Roots are the declarations nobody references, in declaration order.
    ast.declarations
        .iter()
        .filter(|decl| !ast.references.contains_key(&decl.name))
        .map(|decl| converter.record(decl))
        .collect()
}

// ==============================================================================
// Cycle Detection
// ==============================================================================

/// Find a cycle in the reference graph, if any. The reference map stores
/// edges backwards (referenced -> referencers), so we first flip it into an
/// adjacency list and then run a colored depth-first search.
///
/// Returns the cycle path in root-to-leaf order, closing on the repeated
/// name: `A -> B -> A` comes back as `["A", "B", "A"]`.
fn find_cycle(
    decls: &IndexMap<&str, &Declaration>,
    references: &crate::model::source::ReferenceMap,
) -> Option<Vec<String>> {
    let mut adjacency: IndexMap<&str, Vec<&str>> = IndexMap::new();
    for (referenced, referencers) in references {
        if !decls.contains_key(referenced.as_str()) {
            // Built-in marker types cannot participate in cycles.
            continue;
        }
        for referencer in referencers {
            adjacency
                .entry(referencer.as_str())
                .or_default()
                .push(referenced.as_str());
        }
    }

    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        Unvisited,
        OnStack,
        Done,
    }

    fn visit<'a>(
        node: &'a str,
        adjacency: &IndexMap<&str, Vec<&'a str>>,
        marks: &mut IndexMap<&'a str, Mark>,
        stack: &mut Vec<&'a str>,
    ) -> Option<Vec<String>> {
        marks.insert(node, Mark::OnStack);
        stack.push(node);
        for &next in adjacency.get(node).into_iter().flatten() {
            match marks.get(next).copied().unwrap_or(Mark::Unvisited) {
                Mark::OnStack => {
                    // Found the back edge; the cycle is everything on the
                    // stack from `next` onward, closed with `next` again.
                    let start = stack
                        .iter()
                        .position(|&n| n == next)
                        .expect("OnStack nodes are on the stack");
                    let mut path: Vec<String> =
                        stack[start..].iter().map(|n| n.to_string()).collect();
                    path.push(next.to_string());
                    return Some(path);
                }
                Mark::Unvisited => {
                    if let Some(path) = visit(next, adjacency, marks, stack) {
                        return Some(path);
                    }
                }
                Mark::Done => {}
            }
        }
        stack.pop();
        marks.insert(node, Mark::Done);
        None
    }

    let mut marks: IndexMap<&str, Mark> = IndexMap::new();
    let mut stack = Vec::new();
    for &name in decls.keys() {
        if marks.get(name).copied().unwrap_or(Mark::Unvisited) == Mark::Unvisited
            && let Some(path) = visit(name, &adjacency, &mut marks, &mut stack)
        {
            return Some(path);
        }
    }
    None
}

// ==============================================================================
// Type Mapping
// ==============================================================================

struct Converter<'a> {
    decls: IndexMap<&'a str, &'a Declaration>,
    ast: &'a ParsedAst,
}

impl Converter<'_> {
    fn record(&self, decl: &Declaration) -> Result<RecordSchema, ConvertError> {
        let fields = decl
            .fields
            .iter()
            .map(|field| self.field(field, &decl.name))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RecordSchema::new(&decl.name, fields, decl.doc.clone()))
    }

    fn field(&self, field: &FieldDecl, owner: &str) -> Result<Field, ConvertError> {
        let base = self.resolve(&field.ty, &field.annotations, &field.name, owner)?;
        let schema = if field.optional {
            // Optional properties become `["null", base]`; `Union::nullable`
            // flattens union bases and dedups, so an optional union never
            // nests and an optional `null` collapses to `["null"]`.
            AvroSchema::Union(Union::nullable(base))
        } else {
            base
        };
        let mut converted = Field::new(&field.name, schema);
        converted.doc = field.doc.clone();
        Ok(converted)
    }

    fn resolve(
        &self,
        ty: &SourceType,
        annotations: &[Annotation],
        field_name: &str,
        owner: &str,
    ) -> Result<AvroSchema, ConvertError> {
        match ty {
            SourceType::String => {
                if annotations.contains(&Annotation::Uuid) {
                    Ok(AvroSchema::Logical(LogicalType::Uuid))
                } else {
                    Ok(AvroSchema::String)
                }
            }
            SourceType::Boolean => Ok(AvroSchema::Boolean),
            SourceType::Bytes => Ok(AvroSchema::Bytes),
            SourceType::Number => self.number(annotations, field_name),
            SourceType::Literal(lit) => Ok(literal_schema(lit)),
            SourceType::Reference(name) => self.reference(name, owner),
            SourceType::Array(item) => {
                // Annotations on an array property apply to the item type:
                // `// @avro date` on `number[]` yields an array of dates.
                let item = self.resolve(item, annotations, field_name, owner)?;
                Ok(AvroSchema::Array(Box::new(item)))
            }
            SourceType::Union(members) => self.union(members, field_name),
            SourceType::Inline(decl) => Ok(AvroSchema::Record(self.record(decl)?)),
        }
    }

    /// `number` defaults to `double`; exactly one numeric-kind annotation
    /// selects a narrower primitive or a logical type instead.
    fn number(
        &self,
        annotations: &[Annotation],
        field_name: &str,
    ) -> Result<AvroSchema, ConvertError> {
        let numeric: Vec<&Annotation> = annotations
            .iter()
            .filter(|a| a.is_numeric_kind())
            .collect();
        if numeric.len() > 1 {
            return Err(ConvertError::AmbiguousAnnotation {
                field: field_name.to_string(),
                annotations: numeric.iter().map(|a| a.as_str()).collect(),
            });
        }
        Ok(match numeric.first() {
            None => AvroSchema::Double,
            Some(Annotation::Int) => AvroSchema::Int,
            Some(Annotation::Long) => AvroSchema::Long,
            Some(Annotation::Float) => AvroSchema::Float,
            Some(Annotation::Double) => AvroSchema::Double,
            Some(Annotation::Date) => AvroSchema::Logical(LogicalType::Date),
            Some(Annotation::TimeMillis) => AvroSchema::Logical(LogicalType::TimeMillis),
            Some(Annotation::TimeMicros) => AvroSchema::Logical(LogicalType::TimeMicros),
            Some(Annotation::TimestampMillis) => {
                AvroSchema::Logical(LogicalType::TimestampMillis)
            }
            Some(Annotation::TimestampMicros) => {
                AvroSchema::Logical(LogicalType::TimestampMicros)
            }
            Some(Annotation::LocalTimestampMillis) => {
                AvroSchema::Logical(LogicalType::LocalTimestampMillis)
            }
            Some(Annotation::LocalTimestampMicros) => {
                AvroSchema::Logical(LogicalType::LocalTimestampMicros)
            }
            Some(Annotation::Uuid) => unreachable!("uuid is not a numeric-kind annotation"),
        })
    }

    /// Resolve a type reference: a declaration of that name is inlined as a
    /// nested record (duplicated at every use site); otherwise the name must
    /// be one of the built-in marker types.
    fn reference(&self, name: &str, owner: &str) -> Result<AvroSchema, ConvertError> {
        if let Some(decl) = self.decls.get(name) {
            return Ok(AvroSchema::Record(self.record(decl)?));
        }
        builtin_marker(name).ok_or_else(|| ConvertError::UnresolvedReference {
            name: name.to_string(),
            referencers: match self.ast.references.get(name) {
                Some(referencers) => referencers.iter().cloned().collect(),
                None => vec![owner.to_string()],
            },
        })
    }

    /// A TypeScript union is only supported when it can collapse to an Avro
    /// enum: every member a literal of the same kind, every value a valid
    /// symbol. Symbols are deduplicated order-preserving, and the enum is
    /// named by joining them with `_or_`.
    fn union(
        &self,
        members: &[SourceType],
        field_name: &str,
    ) -> Result<AvroSchema, ConvertError> {
        let unsupported = || ConvertError::UnsupportedUnion {
            field: field_name.to_string(),
        };

        let mut kind: Option<&'static str> = None;
        let mut symbols: Vec<String> = Vec::new();
        for member in members {
            let SourceType::Literal(lit) = member else {
                return Err(unsupported());
            };
            if *kind.get_or_insert(lit.kind()) != lit.kind() {
                return Err(unsupported());
            }
            let symbol = lit.as_symbol();
            if !is_enum_symbol(&symbol) {
                return Err(unsupported());
            }
            if !symbols.contains(&symbol) {
                symbols.push(symbol);
            }
        }
        if symbols.is_empty() {
            return Err(unsupported());
        }
        Ok(AvroSchema::Enum {
            name: symbols.join("_or_"),
            symbols,
        })
    }
}

/// Map a standalone literal type to its Avro schema. An identifier-shaped
/// string literal becomes a one-symbol enum; integer-valued numbers become
/// `int` and everything else `double` (a deliberate heuristic with no user
/// override).
fn literal_schema(lit: &LiteralValue) -> AvroSchema {
    match lit {
        LiteralValue::Null => AvroSchema::Null,
        LiteralValue::Boolean(_) => AvroSchema::Boolean,
        LiteralValue::Number(n) => {
            if n.fract() == 0.0 && n.is_finite() {
                AvroSchema::Int
            } else {
                AvroSchema::Double
            }
        }
        LiteralValue::String(s) => {
            if is_enum_symbol(s) {
                AvroSchema::Enum {
                    name: s.clone(),
                    symbols: vec![s.clone()],
                }
            } else {
                AvroSchema::String
            }
        }
    }
}

/// The built-in `Avro*` marker types importable from the companion decorator
/// module. These are resolved by name; they are the only type references
/// that do not need a matching declaration.
fn builtin_marker(name: &str) -> Option<AvroSchema> {
    Some(match name {
        "AvroBoolean" => AvroSchema::Boolean,
        "AvroString" => AvroSchema::String,
        "AvroBytes" => AvroSchema::Bytes,
        "AvroInt" => AvroSchema::Int,
        "AvroFloat" => AvroSchema::Float,
        "AvroDouble" => AvroSchema::Double,
        "AvroLong" => AvroSchema::Long,
        "AvroDate" => AvroSchema::Logical(LogicalType::Date),
        "AvroTimeMillis" => AvroSchema::Logical(LogicalType::TimeMillis),
        "AvroTimeMicros" => AvroSchema::Logical(LogicalType::TimeMicros),
        "AvroTimestampMillis" => AvroSchema::Logical(LogicalType::TimestampMillis),
        "AvroTimestampMicros" => AvroSchema::Logical(LogicalType::TimestampMicros),
        "AvroLocalTimeMillis" => AvroSchema::Logical(LogicalType::LocalTimestampMillis),
        "AvroLocalTimeMicros" => AvroSchema::Logical(LogicalType::LocalTimestampMicros),
        "AvroUuid" => AvroSchema::Logical(LogicalType::Uuid),
        _ => return None,
    })
}

/// Check whether a string is a valid Avro enum symbol:
/// `[A-Za-z_][A-Za-z0-9_]*`. We use `char` methods rather than the `regex`
/// crate for a pattern this small.
fn is_enum_symbol(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
