use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

const SCHEMA: &str = r#"{
    "args": [
        { "labels": ["-v", "--verbose"], "help": "Verbose output" },
        { "labels": ["--pair"], "arg-count": 2, "type": "int" },
        { "labels": ["-o", "--output"], "arg-count": 1, "min": 1, "help": "Output file" },
        { "name": "input", "help": "Input file" }
    ]
}"#;

fn make_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock is before UNIX_EPOCH")
        .as_nanos();
    let pid = std::process::id();
    let dir = std::env::temp_dir().join(format!("argdecl-integ-{prefix}-{pid}-{nanos}"));
    fs::create_dir_all(&dir).expect("failed to create temp dir");
    dir
}

fn write_schema(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("args.json");
    fs::write(&path, content).expect("failed to write schema");
    path
}

fn argdecl() -> Command {
    Command::new(env!("CARGO_BIN_EXE_argdecl"))
}

fn run_parse(schema: &Path, tokens: &[&str]) -> Output {
    argdecl()
        .arg("parse")
        .arg("--schema")
        .arg(schema)
        .arg("--compact")
        .arg("--")
        .args(tokens)
        .output()
        .expect("failed to run argdecl parse")
}

#[test]
fn help_works() {
    let out = argdecl()
        .arg("--help")
        .output()
        .expect("failed to run argdecl --help");
    assert!(
        out.status.success(),
        "argdecl --help failed:\nstatus: {}\nstderr:\n{}",
        out.status,
        String::from_utf8_lossy(&out.stderr),
    );
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(
        stdout.contains("argdecl") && stdout.contains("parse") && stdout.contains("usage"),
        "unexpected help output:\n{stdout}"
    );
}

#[test]
fn parse_prints_results_as_json() {
    let dir = make_temp_dir("parse-ok");
    let schema = write_schema(&dir, SCHEMA);

    let out = run_parse(&schema, &["in.txt", "--pair", "3", "4", "-o", "out.txt", "-v"]);
    assert!(
        out.status.success(),
        "argdecl parse failed:\nstatus: {}\nstderr:\n{}",
        out.status,
        String::from_utf8_lossy(&out.stderr),
    );
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert_eq!(
        stdout.trim(),
        r#"{"input":"in.txt","pair":[3,4],"output":["out.txt"],"verbose":true}"#
    );

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn parse_reports_every_error_with_exit_code_2() {
    let dir = make_temp_dir("parse-errors");
    let schema = write_schema(&dir, SCHEMA);

    let out = run_parse(&schema, &["--pair", "3", "x", "-v", "-v"]);
    assert_eq!(out.status.code(), Some(2), "unexpected status: {}", out.status);
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("unable to parse 'x'"), "stderr:\n{stderr}");
    assert!(stderr.contains("too many times"), "stderr:\n{stderr}");
    assert!(stderr.contains("'output' argument is required"), "stderr:\n{stderr}");
    assert!(stderr.contains("'input' argument is required"), "stderr:\n{stderr}");
    assert!(stderr.contains("Usage:"), "stderr:\n{stderr}");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn usage_prints_declared_arguments() {
    let dir = make_temp_dir("usage");
    let schema = write_schema(&dir, SCHEMA);

    let out = argdecl()
        .arg("usage")
        .arg("--schema")
        .arg(&schema)
        .output()
        .expect("failed to run argdecl usage");
    assert!(out.status.success(), "status: {}", out.status);
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert_eq!(
        stdout.trim(),
        "[-v | --verbose] [--pair pair_val_1 pair_val_2] <-o | --output output_val_1> input"
    );

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn types_lists_builtins() {
    let out = argdecl()
        .arg("types")
        .output()
        .expect("failed to run argdecl types");
    assert!(out.status.success(), "status: {}", out.status);
    let stdout = String::from_utf8_lossy(&out.stdout);
    let tags: Vec<&str> = stdout.lines().collect();
    assert_eq!(tags, ["string", "bool", "int", "uint", "float", "char", "path"]);
}

#[test]
fn invalid_schema_is_a_hard_failure() {
    let dir = make_temp_dir("bad-schema");
    let schema = write_schema(&dir, r#"{ "args": [ { "labels": ["--n"], "type": "int" } ] }"#);

    let out = run_parse(&schema, &[]);
    assert!(!out.status.success());
    assert_ne!(out.status.code(), Some(2), "configuration errors must not look like input errors");
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("invalid argument set"), "stderr:\n{stderr}");

    let _ = fs::remove_dir_all(&dir);
}
