// ==============================================================================
// Code Generation: TypeScript Serializer / Deserializer Modules
// ==============================================================================
//
// Emits self-contained TypeScript source for serializing host values to Avro
// binary and back, one module per root record schema. Each module embeds its
// schema as canonical JSON and delegates the wire encoding to the `avsc`
// npm package; what we generate is the glue that reconciles the two
// absence conventions: `undefined` on the host side, `null` on the wire.
//
// The emitted text is a contract. Tests diff it byte-for-byte, so the
// templates here are exact about indentation (4 spaces per level), separator
// placement, and the absence of a trailing newline.

pub mod deserializer;
pub mod serializer;

use crate::error::ConvertError;

/// Validate the import path for a generated module and strip a trailing
/// `.ts`/`.TS` extension, since TypeScript imports are extensionless. The
/// path must be relative so the emitted module works wherever the caller
/// writes it.
fn import_specifier(path: &str) -> Result<&str, ConvertError> {
    if !path.starts_with("./") && !path.starts_with("../") {
        return Err(ConvertError::InvalidImportPath {
            path: path.to_string(),
        });
    }
    let bytes = path.as_bytes();
    let stripped = match bytes.len().checked_sub(3) {
        Some(at) if bytes[at..].eq_ignore_ascii_case(b".ts") => &path[..at],
        _ => path,
    };
    Ok(stripped)
}

fn indent_of(indents: usize) -> String {
    "    ".repeat(indents)
}
