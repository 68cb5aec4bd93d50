use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

use coltc_drv::{Config, EmitType, Session};

fn temp_source(source: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("failed to create temp file");
    write!(file, "{source}").expect("failed to write temp file");
    file
}

#[test]
fn session_compiles_a_folded_declaration_in_process() {
    let file = temp_source("let x: i32 = 2 + 3 * 4;");
    let mut config = Config::default();
    config.input_files.push(file.path().to_path_buf());

    let mut session = Session::new(config);
    session.read_sources().expect("failed to read sources");
    let failures = session.compile().expect("compilation failed");

    assert_eq!(failures, 0);
}

#[test]
fn session_reports_division_by_literal_zero_as_a_failure() {
    let file = temp_source("let y: i32 = 5 / 0;");
    let mut config = Config::default();
    config.input_files.push(file.path().to_path_buf());

    let mut session = Session::new(config);
    session.read_sources().expect("failed to read sources");
    let failures = session.compile().expect("compilation failed");

    assert_eq!(failures, 1);
}

#[test]
fn session_can_emit_the_raw_token_buffer() {
    let file = temp_source("let x: i32 = 1;");
    let mut config = Config::default();
    config.emit = EmitType::Tokens;
    config.input_files.push(file.path().to_path_buf());

    let mut session = Session::new(config);
    session.read_sources().expect("failed to read sources");
    let failures = session.compile().expect("compilation failed");

    assert_eq!(failures, 0);
}

#[test]
fn cli_rejects_an_unrecognized_flag() {
    let mut cmd = Command::cargo_bin("coltc").expect("binary should build");
    cmd.arg("--not-a-real-flag").arg("whatever.colt");
    cmd.assert().failure().stderr(predicate::str::contains("unrecognized flag"));
}

#[test]
fn cli_fails_without_any_input_files() {
    let mut cmd = Command::cargo_bin("coltc").expect("binary should build");
    cmd.assert().failure().stderr(predicate::str::contains("no input files"));
}

#[test]
fn cli_compiles_a_file_end_to_end() {
    let file = temp_source("let x: i32 = 2 + 2;");
    let mut cmd = Command::cargo_bin("coltc").expect("binary should build");
    cmd.arg(file.path());
    cmd.assert().success();
}
