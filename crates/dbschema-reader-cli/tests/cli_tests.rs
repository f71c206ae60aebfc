//! CLI integration tests for dbschema-reader.
//!
//! These tests verify command-line argument parsing, offline commands,
//! and exit codes for error conditions that need no database.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

/// Get a command for the dbschema-reader binary.
fn cmd() -> Command {
    Command::cargo_bin("dbschema-reader").unwrap()
}

fn config_file(yaml: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", yaml).unwrap();
    file
}

// =============================================================================
// Help and Version Tests
// =============================================================================

#[test]
fn test_help_shows_all_commands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("engines"))
        .stdout(predicate::str::contains("categories"))
        .stdout(predicate::str::contains("plan"))
        .stdout(predicate::str::contains("dump"));
}

#[test]
fn test_dump_subcommand_help() {
    cmd()
        .args(["dump", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--category"))
        .stdout(predicate::str::contains("--table"))
        .stdout(predicate::str::contains("--schema"))
        .stdout(predicate::str::contains("--assemble"));
}

#[test]
fn test_version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("dbschema-reader"));
}

// =============================================================================
// Global Flags Tests
// =============================================================================

#[test]
fn test_log_format_flag_exists() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--log-format"))
        .stdout(predicate::str::contains("[default: text]"));
}

#[test]
fn test_verbosity_flag_exists() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--verbosity"))
        .stdout(predicate::str::contains("[default: info]"));
}

#[test]
fn test_config_default_path() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("[default: config.yaml]"));
}

// =============================================================================
// Offline Commands
// =============================================================================

#[test]
fn test_engines_lists_builtins_and_aliases() {
    cmd()
        .arg("engines")
        .assert()
        .success()
        .stdout(predicate::str::contains("db2-iseries"))
        .stdout(predicate::str::contains("as400"))
        .stdout(predicate::str::contains("postgres"))
        .stdout(predicate::str::contains("mariadb"));
}

#[test]
fn test_engines_json() {
    cmd()
        .args(["--output-json", "engines"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"engine\": \"mssql\""));
}

#[test]
fn test_categories_show_routes() {
    cmd()
        .args(["-c", "nonexistent.yaml", "--engine", "mysql", "categories"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sequences"))
        .stdout(predicate::str::contains("unsupported"))
        .stdout(predicate::str::contains("referenced_constraint_name"));
}

#[test]
fn test_plan_prints_bound_query() {
    cmd()
        .args([
            "-c",
            "nonexistent.yaml",
            "--engine",
            "postgres@16",
            "plan",
            "primary_keys",
            "--table",
            "orders",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("pg_constraint"))
        .stdout(predicate::str::contains("(c.relname = $1::text OR $2::text IS NULL)"))
        .stdout(predicate::str::contains("-- param 1: orders"))
        .stdout(predicate::str::contains("-- param 3: NULL"));
}

#[test]
fn test_plan_uses_configured_scope() {
    let file = config_file("engine: mssql\nscope:\n  schema: dbo\n");
    cmd()
        .args([
            "-c",
            file.path().to_str().unwrap(),
            "--output-json",
            "plan",
            "identity-columns",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("@P1"))
        .stdout(predicate::str::contains("\"dbo\""));
}

#[test]
fn test_plan_unsupported_category() {
    cmd()
        .args(["-c", "nonexistent.yaml", "-e", "mariadb", "plan", "sequences"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not supported"));
}

// =============================================================================
// Exit Code Tests
// =============================================================================

#[test]
fn test_missing_config_exits_with_code_7() {
    // Missing file is an IO error (code 7), not config error (code 1)
    cmd()
        .args(["--config", "nonexistent_config_file.yaml", "categories"])
        .assert()
        .code(7); // EXIT_IO_ERROR - file not found
}

#[test]
fn test_invalid_yaml_exits_with_code_1() {
    let file = config_file("invalid: yaml: content: [\n");
    cmd()
        .args(["--config", file.path().to_str().unwrap(), "categories"])
        .assert()
        .code(1); // EXIT_CONFIG_ERROR
}

#[test]
fn test_empty_config_exits_with_code_1() {
    let file = tempfile::NamedTempFile::new().unwrap();
    cmd()
        .args(["--config", file.path().to_str().unwrap(), "categories"])
        .assert()
        .code(1); // EXIT_CONFIG_ERROR
}

#[test]
fn test_unknown_engine_exits_with_code_1() {
    cmd()
        .args(["-c", "nonexistent.yaml", "--engine", "oracle", "categories"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("oracle"));
}

#[test]
fn test_scope_policy_violation_exits_with_code_2() {
    let file = config_file("engine: db2-iseries\nscope_policy: table_requires_schema\n");
    cmd()
        .args([
            "-c",
            file.path().to_str().unwrap(),
            "plan",
            "primary_keys",
            "--table",
            "ORDERS",
        ])
        .assert()
        .code(2) // EXIT_SCOPE_ERROR
        .stderr(predicate::str::contains("requires a schema"));
}

#[test]
fn test_dump_without_connection_exits_with_code_1() {
    cmd()
        .args(["-c", "nonexistent.yaml", "--engine", "mysql", "dump"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("connection settings"));
}

#[test]
fn test_unknown_category_is_rejected() {
    cmd()
        .args(["-c", "nonexistent.yaml", "-e", "pg", "plan", "synonyms"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("synonyms"));
}

// =============================================================================
// No Subcommand Tests
// =============================================================================

#[test]
fn test_no_subcommand_shows_help() {
    cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}
