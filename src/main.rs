// ==============================================================================
// CLI for the TypeScript-to-Avro Schema Compiler
// ==============================================================================
//
//   ts2avsc <source.ts> [target-directory] [--no-schemas] [--serializers] [--pretty]
//
// Writes one `<Name>.avsc` file per root declaration, and with
// `--serializers` also `<Name>.serializer.ts` / `<Name>.deserializer.ts`.
// Everything is compiled before anything is written, so a conversion error
// never leaves partial output behind.

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::process::ExitCode;

use indexmap::IndexMap;
use lexopt::prelude::*;
use miette::Context;

use ts2avsc::Compiler;

const USAGE: &str = "\
Convert a TypeScript file to a set of Avro schemas and/or serializers

Usage: ts2avsc [OPTIONS] <source.ts> [target-directory]

Arguments:
  <source.ts>         TypeScript file containing the type declarations
  [target-directory]  Directory for the output files (default: .)

Options:
      --no-schemas   Skip writing .avsc schema files
      --serializers  Also write serializer and deserializer modules
      --pretty       Pretty-print schema files
  -h, --help         Print help
  -V, --version      Print version";

struct Args {
    source: PathBuf,
    target_dir: PathBuf,
    schemas: bool,
    serializers: bool,
    pretty: bool,
}

fn parse_args() -> Result<Option<Args>, lexopt::Error> {
    let mut source = None;
    let mut target_dir = None;
    let mut schemas = true;
    let mut serializers = false;
    let mut pretty = false;

    let mut parser = lexopt::Parser::from_env();
    while let Some(arg) = parser.next()? {
        match arg {
            Long("no-schemas") => schemas = false,
            Long("serializers") => serializers = true,
            Long("pretty") => pretty = true,
            Short('h') | Long("help") => {
                println!("{USAGE}");
                return Ok(None);
            }
            Short('V') | Long("version") => {
                println!("ts2avsc {}", env!("CARGO_PKG_VERSION"));
                return Ok(None);
            }
            Value(value) if source.is_none() => source = Some(PathBuf::from(value)),
            Value(value) if target_dir.is_none() => target_dir = Some(PathBuf::from(value)),
            arg => return Err(arg.unexpected()),
        }
    }

    let Some(source) = source else {
        return Err("missing required argument <source.ts>".into());
    };
    Ok(Some(Args {
        source,
        target_dir: target_dir.unwrap_or_else(|| PathBuf::from(".")),
        schemas,
        serializers,
        pretty,
    }))
}

fn main() -> ExitCode {
    let args = match parse_args() {
        Ok(Some(args)) => args,
        Ok(None) => return ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ts2avsc: {e}");
            eprintln!("{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    let source_display = args.source.display().to_string();
    if !source_display.to_lowercase().ends_with(".ts") {
        eprintln!(
            "Source {source_display} is not a TypeScript file. Please use a file with the .ts suffix."
        );
        return ExitCode::FAILURE;
    }

    let contents = match fs::read_to_string(&args.source) {
        Ok(contents) => contents,
        Err(e) => {
            eprintln!("Unable to read from file at {source_display}: {e}");
            return ExitCode::from(2);
        }
    };

    match run(&args, &contents, &source_display) {
        Ok(()) => ExitCode::SUCCESS,
        Err(report) => {
            eprintln!("{report:?}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args, contents: &str, source_display: &str) -> miette::Result<()> {
    let mut compiler = Compiler::new();
    compiler.source_name(source_display).pretty(args.pretty);

    // Compile every requested artifact up front; only then touch the disk.
    let schemas = if args.schemas {
        Some(compiler.schemas(contents)?)
    } else {
        None
    };
    let serializers = if args.serializers {
        let import_path = relative_import_path(&args.target_dir, &args.source);
        Some((
            compiler.serializers(contents, &import_path)?,
            compiler.deserializers(contents, &import_path)?,
        ))
    } else {
        None
    };

    fs::create_dir_all(&args.target_dir)
        .map_err(|e| miette::miette!("{e}"))
        .with_context(|| format!("create {}", args.target_dir.display()))?;

    if let Some(schemas) = schemas {
        println!("- Writing schemas...");
        write_all(&args.target_dir, &schemas)?;
    }
    if let Some((serializers, deserializers)) = serializers {
        println!("- Writing serializers...");
        write_all(&args.target_dir, &serializers)?;
        write_all(&args.target_dir, &deserializers)?;
    }

    println!("All done!");
    Ok(())
}

fn write_all(target_dir: &Path, files: &IndexMap<String, String>) -> miette::Result<()> {
    for (file_name, contents) in files {
        println!("  + Writing {file_name}...");
        let path = target_dir.join(file_name);
        fs::write(&path, contents)
            .map_err(|e| miette::miette!("{e}"))
            .with_context(|| format!("write {}", path.display()))?;
    }
    Ok(())
}

// ==============================================================================
// Import Path Computation
// ==============================================================================

/// Compute the import path from the target directory to the source file, for
/// embedding in generated modules. Always relative (`./` or `../` prefixed)
/// and `/`-separated regardless of platform, since it lands in TypeScript
/// `import` statements. Purely lexical; neither path needs to exist.
fn relative_import_path(target_dir: &Path, source: &Path) -> String {
    let target = normalize(target_dir);
    let source = normalize(source);

    let common = target
        .iter()
        .zip(source.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = vec!["..".to_string(); target.len() - common];
    parts.extend(source[common..].iter().cloned());
    if !parts.first().is_some_and(|p| p == "..") {
        parts.insert(0, ".".to_string());
    }
    parts.join("/")
}

/// Flatten a path to its lexical components, resolving `.` and `..` where
/// possible. Relative paths are anchored at the current working directory so
/// that a relative target and a relative source share a common prefix.
fn normalize(path: &Path) -> Vec<String> {
    let anchored = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    let mut parts = Vec::new();
    for component in anchored.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                parts.pop();
            }
            other => parts.push(other.as_os_str().to_string_lossy().into_owned()),
        }
    }
    parts
}
