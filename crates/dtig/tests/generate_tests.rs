//! Integration tests for `dtig generate`

use assert_cmd::assert::OutputAssertExt;
use assert_cmd::cargo_bin;
use dtig_testkit::{temp_dir_in_workspace, write_project};
use predicates::prelude::*;
use std::fs;
use std::process::Command;

#[test]
fn test_generate_all_targets() {
    let temp = temp_dir_in_workspace();
    write_project(temp.path());

    Command::new(cargo_bin!("dtig"))
        .current_dir(temp.path())
        .arg("generate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated 2 file(s)"));

    let server = fs::read_to_string(temp.path().join("generated/server.py")).unwrap();
    assert!(server.starts_with("import dtig_utils"));
    assert!(server.contains("value = dtig_utils.MF32()"));

    let header = fs::read_to_string(temp.path().join("generated/model.hpp")).unwrap();
    assert!(header.contains("struct Engine {\n    float throttle;\n    bool brake;\n};"));
}

#[test]
fn test_generate_from_subdirectory() {
    let temp = temp_dir_in_workspace();
    write_project(temp.path());

    Command::new(cargo_bin!("dtig"))
        .current_dir(temp.path().join("templates"))
        .arg("generate")
        .assert()
        .success();

    assert!(temp.path().join("generated/server.py").exists());
}

#[test]
fn test_generate_single_target() {
    let temp = temp_dir_in_workspace();
    write_project(temp.path());

    Command::new(cargo_bin!("dtig"))
        .current_dir(temp.path())
        .args(["generate", "generated/model.hpp"])
        .assert()
        .success()
        .stdout(predicate::str::contains("model.hpp"));

    assert!(temp.path().join("generated/model.hpp").exists());
    assert!(!temp.path().join("generated/server.py").exists());
}

#[test]
fn test_generate_unknown_target() {
    let temp = temp_dir_in_workspace();
    write_project(temp.path());

    Command::new(cargo_bin!("dtig"))
        .current_dir(temp.path())
        .args(["generate", "generated/nope.py"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("PROJECT_TARGET_NOT_FOUND"));
}

#[test]
fn test_generate_requires_project() {
    let temp = temp_dir_in_workspace();

    Command::new(cargo_bin!("dtig"))
        .current_dir(temp.path())
        .arg("generate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not in a dtig project"));
}
