//! TypeScript-to-Avro schema compiler — walk exported `interface` and `type`
//! declarations and emit Avro schema (`.avsc`) JSON, plus optional TypeScript
//! serializer/deserializer modules that bridge the two absence conventions
//! (`undefined` in host values, `null` on the Avro wire).
//!
//! The main entry point is the [`Compiler`] builder, a non-consuming builder
//! that can be reused across calls:
//!
//! ```no_run
//! use ts2avsc::Compiler;
//!
//! let source = std::fs::read_to_string("input.ts")?;
//! for (file_name, contents) in Compiler::new().schemas(&source)? {
//!     std::fs::write(file_name, contents)?;
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! The individual stages are public too, for callers that want to inspect the
//! intermediate representations:
//!
//! - [`parser::parse`] — TypeScript subset → [`model::source::ParsedAst`]
//! - [`convert::convert`] — AST → [`model::schema::RecordSchema`] per root
//!   declaration (referenced declarations are inlined)
//! - [`model::json::write_schema`] — record schema → canonical `.avsc` text
//! - [`codegen::serializer`] / [`codegen::deserializer`] — record schema →
//!   TypeScript module text
//!
//! # Error handling
//!
//! All fallible methods on [`Compiler`] return [`miette::Result`]; parse
//! errors carry source spans and render as rich diagnostics when printed
//! with `{:?}`.

pub mod codegen;
pub mod compile;
pub mod convert;
pub mod error;
pub mod model;
pub mod parser;

pub use compile::Compiler;
