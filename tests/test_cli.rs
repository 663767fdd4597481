use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::tempdir;

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_filter-query")
}

fn run(args: &[&str]) -> Output {
    Command::new(bin())
        .args(args)
        .env_remove("FILTER_QUERY_CONFIG")
        .env_remove("RUST_LOG")
        .output()
        .expect("command should run")
}

fn stdout(output: &Output) -> String {
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn write_file(path: &Path, content: &str) {
    fs::write(path, content).expect("failed to write test file");
}

#[test]
fn test_compile_prints_ordered_json() {
    let output = run(&["--compact", "compile", r#"and(eq(name, "x"), gt(count, 2))"#]);
    assert_eq!(
        stdout(&output).trim(),
        r#"{"$and":[{"name":"x"},{"count":{"$gt":2}}]}"#
    );
}

#[test]
fn test_output_is_pretty_unless_compact() {
    let pretty = stdout(&run(&["compile", "eq(a, 1)"]));
    assert_eq!(pretty.trim(), "{\n  \"a\": 1\n}");

    let compact = stdout(&run(&["-c", "compile", "eq(a, 1)"]));
    assert_eq!(compact.trim(), r#"{"a":1}"#);
}

#[test]
fn test_fields_flag_overrides_default_fan_out() {
    let output = run(&["-c", "--fields", "name,nickname", "compile", "'sith'"]);
    assert_eq!(
        stdout(&output).trim(),
        r#"{"$or":[{"name":"sith"},{"nickname":"sith"}]}"#
    );
}

#[test]
fn test_config_file_and_output_file() {
    let dir = tempdir().expect("temp dir");
    let config = dir.path().join("profile.toml");
    let out = dir.path().join("filter.json");
    write_file(
        &config,
        "profile_name = \"people\"\nliteral_comparison_fields = [\"first\", \"last\"]\n",
    );

    let output = run(&[
        "--config",
        config.to_str().expect("utf8 path"),
        "-o",
        out.to_str().expect("utf8 path"),
        "compile",
        "7",
    ]);
    let printed = stdout(&output);

    let written = fs::read_to_string(&out).expect("output file should exist");
    assert_eq!(written.trim(), printed.trim());

    let value: serde_json::Value = serde_json::from_str(&written).expect("valid JSON");
    assert_eq!(
        value,
        serde_json::json!({"$or": [{"first": 7}, {"last": 7}]})
    );
}

#[test]
fn test_strict_flag_rejects_trailing_input() {
    let lenient = run(&["compile", "eq(a, 1) 2"]);
    assert!(lenient.status.success());

    let strict = run(&["--strict", "compile", "eq(a, 1) 2"]);
    assert!(!strict.status.success());
    let stderr = String::from_utf8_lossy(&strict.stderr);
    assert!(stderr.contains("trailing input"), "stderr: {stderr}");
}

#[test]
fn test_parse_error_exits_non_zero() {
    let output = run(&["--color", "never", "compile", "le(count, 1"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("error: unexpected end of input, expected: )"),
        "stderr: {stderr}"
    );
}

#[test]
fn test_tokens_as_json() {
    let output = run(&["-c", "tokens", "--json", "eq(a, 1)"]);
    let value: serde_json::Value = serde_json::from_str(stdout(&output).trim()).expect("valid JSON");
    assert_eq!(
        value[0],
        serde_json::json!({"kind": "relational_operator", "text": "eq", "offset": 0})
    );
    assert_eq!(value.as_array().map(Vec::len), Some(6));
}

#[test]
fn test_tokens_table() {
    let output = run(&["tokens", "or(1, 2)"]);
    let text = stdout(&output);
    assert!(text.contains("LOGICAL_OPERATOR"));
    assert!(text.contains("Offset"));
}

#[test]
fn test_ast_output() {
    let output = run(&["-c", "ast", "gt(count, 2)"]);
    let value: serde_json::Value = serde_json::from_str(stdout(&output).trim()).expect("valid JSON");
    assert_eq!(
        value,
        serde_json::json!({
            "body": {"RelationalFunction": {
                "operator": "gt",
                "field": "count",
                "value": {"NumericLiteral": 2}
            }}
        })
    );
}
