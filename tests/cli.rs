// ==============================================================================
// CLI Integration Tests: Exercise the `ts2avsc` Binary via Subprocess
// ==============================================================================
//
// These tests run the compiled `ts2avsc` binary as a subprocess using
// `assert_cmd`, verifying exit codes, stdout/stderr content, and output file
// creation. They complement the library-level integration tests in
// `integration.rs` by testing the full CLI surface (argument parsing, file
// I/O, error reporting).

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Helper to construct a `Command` for the `ts2avsc` binary built by this
/// crate.
#[allow(deprecated)] // cargo_bin() warns about custom build-dir; acceptable here
fn ts2avsc_cmd() -> Command {
    Command::cargo_bin("ts2avsc").expect("ts2avsc binary should be built by cargo")
}

/// Write `contents` as `input.ts` inside a fresh temp dir.
fn write_input(contents: &str) -> TempDir {
    let dir = TempDir::new().expect("create temp dir");
    fs::write(dir.path().join("input.ts"), contents).expect("write input.ts");
    dir
}

const SIMPLE_INPUT: &str = "\
export interface Foo {
    a: string;
    b?: boolean;
}";

#[test]
fn test_writes_schema_files() {
    let dir = write_input(SIMPLE_INPUT);
    let input = dir.path().join("input.ts");
    let out = dir.path().join("out");

    ts2avsc_cmd()
        .args([input.to_str().unwrap(), out.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("- Writing schemas..."))
        .stdout(predicate::str::contains("  + Writing Foo.avsc..."))
        .stdout(predicate::str::contains("All done!"));

    let schema = fs::read_to_string(out.join("Foo.avsc")).expect("Foo.avsc written");
    assert_eq!(
        schema,
        r#"{"fields":[{"name":"a","type":"string"},{"name":"b","type":["null","boolean"]}],"name":"Foo","type":"record"}"#
    );
}

#[test]
fn test_target_directory_defaults_to_current_dir() {
    let dir = write_input(SIMPLE_INPUT);

    ts2avsc_cmd()
        .current_dir(dir.path())
        .arg("input.ts")
        .assert()
        .success();

    assert!(dir.path().join("Foo.avsc").exists());
}

#[test]
fn test_pretty_schemas_are_indented() {
    let dir = write_input(SIMPLE_INPUT);
    let input = dir.path().join("input.ts");
    let out = dir.path().join("out");

    ts2avsc_cmd()
        .args([input.to_str().unwrap(), out.to_str().unwrap(), "--pretty"])
        .assert()
        .success();

    let schema = fs::read_to_string(out.join("Foo.avsc")).expect("Foo.avsc written");
    assert!(schema.contains("\n  \"fields\""));
}

#[test]
fn test_serializers_flag_writes_modules_with_relative_import() {
    let dir = write_input(SIMPLE_INPUT);
    let input = dir.path().join("input.ts");
    let out = dir.path().join("out");

    ts2avsc_cmd()
        .args([
            input.to_str().unwrap(),
            out.to_str().unwrap(),
            "--serializers",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("- Writing serializers..."))
        .stdout(predicate::str::contains("  + Writing Foo.serializer.ts..."))
        .stdout(predicate::str::contains("  + Writing Foo.deserializer.ts..."));

    let serializer =
        fs::read_to_string(out.join("Foo.serializer.ts")).expect("serializer written");
    // The generated import points from `out/` back up to the source file,
    // with the .ts extension stripped.
    assert!(serializer.contains("import { Foo } from '../input';"));
    assert!(serializer.contains("value.b === undefined ? null : value.b"));

    let deserializer =
        fs::read_to_string(out.join("Foo.deserializer.ts")).expect("deserializer written");
    assert!(deserializer.contains("raw.b ?? undefined"));
}

#[test]
fn test_no_schemas_suppresses_avsc_files() {
    let dir = write_input(SIMPLE_INPUT);
    let input = dir.path().join("input.ts");
    let out = dir.path().join("out");

    ts2avsc_cmd()
        .args([
            input.to_str().unwrap(),
            out.to_str().unwrap(),
            "--no-schemas",
            "--serializers",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("- Writing schemas...").not());

    assert!(!out.join("Foo.avsc").exists());
    assert!(out.join("Foo.serializer.ts").exists());
}

#[test]
fn test_non_ts_suffix_exits_1() {
    ts2avsc_cmd()
        .arg("input.txt")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("is not a TypeScript file"));
}

#[test]
fn test_uppercase_ts_suffix_is_accepted() {
    let dir = TempDir::new().expect("create temp dir");
    fs::write(dir.path().join("INPUT.TS"), SIMPLE_INPUT).expect("write INPUT.TS");

    ts2avsc_cmd()
        .current_dir(dir.path())
        .arg("INPUT.TS")
        .assert()
        .success();
}

#[test]
fn test_unreadable_file_exits_2() {
    ts2avsc_cmd()
        .arg("does-not-exist.ts")
        .assert()
        .code(2)
        .stderr(predicate::str::contains(
            "Unable to read from file at does-not-exist.ts",
        ));
}

#[test]
fn test_missing_source_argument_fails_with_usage() {
    ts2avsc_cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing required argument"))
        .stderr(predicate::str::contains("Usage: ts2avsc"));
}

#[test]
fn test_conversion_error_reports_and_leaves_no_partial_output() {
    // Two roots where the second has an unsupported union; nothing at all
    // may be written, including the valid first schema.
    let dir = write_input(
        "\
export interface Good {
    a: string;
}

export interface Bad {
    e: 'test' | 12;
}",
    );
    let input = dir.path().join("input.ts");
    let out = dir.path().join("out");

    ts2avsc_cmd()
        .args([input.to_str().unwrap(), out.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported union"));

    assert!(!out.join("Good.avsc").exists());
}

#[test]
fn test_parse_error_names_the_source_file() {
    let dir = write_input("interface Foo {\n}");
    let input = dir.path().join("input.ts");

    ts2avsc_cmd()
        .arg(input.to_str().unwrap())
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing `export` modifier"));
}

#[test]
fn test_help_prints_usage() {
    ts2avsc_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: ts2avsc"));
}

#[test]
fn test_version_prints_crate_version() {
    ts2avsc_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_output_files_match_between_runs() {
    let dir = write_input(SIMPLE_INPUT);
    let input = dir.path().join("input.ts");
    let out1 = dir.path().join("out1");
    let out2 = dir.path().join("out2");

    for out in [&out1, &out2] {
        ts2avsc_cmd()
            .args([input.to_str().unwrap(), out.to_str().unwrap()])
            .assert()
            .success();
    }

    let read = |dir: &Path| fs::read_to_string(dir.join("Foo.avsc")).expect("read Foo.avsc");
    assert_eq!(read(&out1), read(&out2));
}
