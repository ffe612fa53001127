// ==============================================================================
// Library API: Compiling TypeScript Declarations to Schemas and Serializers
// ==============================================================================
//
// The public entry point for the library. A single non-consuming builder,
// [`Compiler`], covers the three outputs: `.avsc` schema text, serializer
// modules, and deserializer modules. The same builder can be reused across
// calls; no compilation state survives between them.
//
// All three methods share the same preamble (parse, then convert) and differ
// only in which back end renders the resulting record schemas. Output maps
// are keyed by target file name and preserve root declaration order.

use indexmap::IndexMap;

use crate::codegen::{deserializer, serializer};
use crate::convert::convert;
use crate::model::json::{write_schema, write_schema_pretty};
use crate::model::schema::RecordSchema;
use crate::parser::parse;

/// Compiles TypeScript type declarations into Avro artifacts.
///
/// ```no_run
/// use ts2avsc::Compiler;
///
/// let source = std::fs::read_to_string("input.ts")?;
/// for (file_name, contents) in Compiler::new().schemas(&source)? {
///     std::fs::write(file_name, contents)?;
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct Compiler {
    source_name: String,
    pretty: bool,
}

impl Default for Compiler {
    fn default() -> Self {
        Compiler::new()
    }
}

impl Compiler {
    pub fn new() -> Compiler {
        Compiler {
            source_name: "<input>".to_string(),
            pretty: false,
        }
    }

    /// Name the source in parse diagnostics (e.g. the file path). Defaults
    /// to `"<input>"`.
    pub fn source_name(&mut self, name: impl Into<String>) -> &mut Compiler {
        self.source_name = name.into();
        self
    }

    /// Pretty-print emitted schema JSON (2-space indent). Generated
    /// serializer modules always embed the compact form regardless.
    pub fn pretty(&mut self, yes: bool) -> &mut Compiler {
        self.pretty = yes;
        self
    }

    /// Compile to `.avsc` schema text, keyed `<Name>.avsc` per root
    /// declaration, in declaration order.
    pub fn schemas(&mut self, source: &str) -> miette::Result<IndexMap<String, String>> {
        let write = if self.pretty {
            write_schema_pretty
        } else {
            write_schema
        };
        Ok(self
            .roots(source)?
            .iter()
            .map(|schema| (format!("{}.avsc", schema.name), write(schema)))
            .collect())
    }

    /// Compile to serializer modules, keyed `<Name>.serializer.ts`.
    /// `import_path` is the relative path from the generated modules to the
    /// source file, and must start with `./` or `../`.
    pub fn serializers(
        &mut self,
        source: &str,
        import_path: &str,
    ) -> miette::Result<IndexMap<String, String>> {
        self.roots(source)?
            .iter()
            .map(|schema| {
                let contents = serializer::generate(import_path, schema)?;
                Ok((format!("{}.serializer.ts", schema.name), contents))
            })
            .collect::<Result<_, crate::error::ConvertError>>()
            .map_err(miette::Report::new)
    }

    /// Compile to deserializer modules, keyed `<Name>.deserializer.ts`.
    pub fn deserializers(
        &mut self,
        source: &str,
        import_path: &str,
    ) -> miette::Result<IndexMap<String, String>> {
        self.roots(source)?
            .iter()
            .map(|schema| {
                let contents = deserializer::generate(import_path, schema)?;
                Ok((format!("{}.deserializer.ts", schema.name), contents))
            })
            .collect::<Result<_, crate::error::ConvertError>>()
            .map_err(miette::Report::new)
    }

    /// Shared preamble: parse the source, then convert to root schemas.
    fn roots(&self, source: &str) -> miette::Result<Vec<RecordSchema>> {
        let ast = parse(&self.source_name, source).map_err(miette::Report::new)?;
        convert(&ast).map_err(miette::Report::new)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_schemas_keyed_by_file_name() {
        let schemas = Compiler::new()
            .schemas("export interface Foo {\n    a: string;\n}")
            .expect("compiles");
        let keys: Vec<&String> = schemas.keys().collect();
        assert_eq!(keys, vec!["Foo.avsc"]);
        assert_eq!(
            schemas["Foo.avsc"],
            r#"{"fields":[{"name":"a","type":"string"}],"name":"Foo","type":"record"}"#
        );
    }

    #[test]
    fn test_two_roots_produce_two_files_in_order() {
        let source = "export interface Interface7 {\n    a: boolean;\n}\n\nexport type Type7 = {\n    b: boolean;\n};";
        let schemas = Compiler::new().schemas(source).expect("compiles");
        let keys: Vec<&String> = schemas.keys().collect();
        assert_eq!(keys, vec!["Interface7.avsc", "Type7.avsc"]);
    }

    #[test]
    fn test_pretty_schemas_are_indented() {
        let pretty = Compiler::new()
            .pretty(true)
            .schemas("export interface Foo {\n    a: string;\n}")
            .expect("compiles");
        assert!(pretty["Foo.avsc"].contains("\n  \"fields\""));
    }

    #[test]
    fn test_serializer_and_deserializer_file_names() {
        let source = "export interface Foo {\n    a?: string;\n}";
        let serializers = Compiler::new()
            .serializers(source, "./input.ts")
            .expect("compiles");
        let deserializers = Compiler::new()
            .deserializers(source, "./input.ts")
            .expect("compiles");
        assert!(serializers.contains_key("Foo.serializer.ts"));
        assert!(deserializers.contains_key("Foo.deserializer.ts"));
        assert!(serializers["Foo.serializer.ts"].contains("function serialize"));
        assert!(deserializers["Foo.deserializer.ts"].contains("function deserialize"));
    }

    #[test]
    fn test_parse_errors_surface_as_reports() {
        let err = Compiler::new()
            .schemas("interface Foo {}")
            .expect_err("must fail");
        assert!(err.to_string().contains("missing `export` modifier"));
    }

    #[test]
    fn test_conversion_errors_surface_as_reports() {
        let err = Compiler::new()
            .schemas("export interface Foo {\n    e: 'test' | 12;\n}")
            .expect_err("must fail");
        assert!(err.to_string().contains("unsupported union"));
    }
}
