use miette::{LabeledSpan, NamedSource, SourceSpan};

/// A parse error with source location information for rich diagnostics.
#[derive(Debug)]
pub struct ParseDiagnostic {
    pub src: NamedSource<String>,
    pub span: SourceSpan,
    pub message: String,
}

impl std::fmt::Display for ParseDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseDiagnostic {}

impl miette::Diagnostic for ParseDiagnostic {
    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        Some(Box::new(std::iter::once(LabeledSpan::new_with_span(
            Some(self.message.clone()),
            self.span,
        ))))
    }
}

// ==============================================================================
// Conversion Errors
// ==============================================================================
//
// Failures while converting a `ParsedAst` to Avro schemas or while generating
// serializer code. These operate on the AST after parsing, so they carry
// names rather than source spans. All of them are deterministic input errors;
// nothing here is retried or recovered from — the first error aborts the
// whole conversion, and the CLI turns it into a non-zero exit code.

/// An error produced by the schema converter or the code generators.
#[derive(Debug, Clone, PartialEq)]
pub enum ConvertError {
    /// The AST contains no declarations at all.
    NoDeclarations,
    /// Two declarations share a name.
    DuplicateDeclaration { name: String },
    /// A referenced type name is neither a declaration nor a recognized
    /// built-in marker type.
    UnresolvedReference {
        name: String,
        referencers: Vec<String>,
    },
    /// The reference graph contains a cycle. The path is in root-to-leaf
    /// order and ends where it began, e.g. `["A", "B", "A"]`.
    CyclicReference { path: Vec<String> },
    /// More than one numeric-kind annotation on a single property.
    AmbiguousAnnotation {
        field: String,
        annotations: Vec<&'static str>,
    },
    /// A union that cannot map to an Avro enum: members that are not
    /// literals, mixed literal kinds, or values that are not valid symbols.
    UnsupportedUnion { field: String },
    /// The import path passed to a code generator is not relative.
    InvalidImportPath { path: String },
}

impl std::fmt::Display for ConvertError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConvertError::NoDeclarations => {
                write!(f, "no exported interface or type declarations to convert")
            }
            ConvertError::DuplicateDeclaration { name } => {
                write!(f, "duplicate declaration name: `{name}`")
            }
            ConvertError::UnresolvedReference { name, referencers } => {
                write!(
                    f,
                    "unresolved type reference `{name}` (referenced from: {})",
                    referencers.join(", ")
                )
            }
            ConvertError::CyclicReference { path } => {
                write!(f, "cyclic type reference: {}", path.join(" -> "))
            }
            ConvertError::AmbiguousAnnotation { field, annotations } => {
                write!(
                    f,
                    "`{field}` has multiple conflicting numeric annotations: [{}]; \
                     use only one",
                    annotations.join(", ")
                )
            }
            ConvertError::UnsupportedUnion { field } => {
                write!(
                    f,
                    "unsupported union on `{field}`: only unions of same-kind, \
                     identifier-shaped literals can map to an Avro enum"
                )
            }
            ConvertError::InvalidImportPath { path } => {
                write!(
                    f,
                    "import path `{path}` must be relative (start with './' or '../')"
                )
            }
        }
    }
}

impl std::error::Error for ConvertError {}

impl miette::Diagnostic for ConvertError {}
