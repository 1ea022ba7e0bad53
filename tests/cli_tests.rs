// SPDX-License-Identifier: PMPL-1.0-or-later

//! Integration tests for the langforge command-line tool

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("lang")).unwrap();
    fs::write(
        dir.path().join("lang/en.yml"),
        "save: Save\ngreeting: Hi %1\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("lang/de.yml"),
        "save: Speichern\ngreeting: Hallo %1\n",
    )
    .unwrap();
    dir
}

fn langforge(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_langforge"))
        .args(args)
        .args([
            "--file-path",
            "lang/{LANGUAGE}.yml",
            "--cache-path",
            "cache",
        ])
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run langforge")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_get_interpolates_arguments() {
    let dir = workspace();
    let output = langforge(dir.path(), &["get", "greeting", "David", "--forced", "de"]);
    assert!(output.status.success(), "{output:?}");
    assert_eq!(stdout(&output), "Hallo David\n");
}

#[test]
fn test_get_unknown_key_fails() {
    let dir = workspace();
    let output = langforge(dir.path(), &["get", "missing"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("missing"));
}

#[test]
fn test_candidates_lists_priority_order() {
    let dir = workspace();
    let output = langforge(
        dir.path(),
        &["candidates", "--lang", "fr", "--accept-language", "de-DE,en;q=0.5"],
    );
    assert!(output.status.success(), "{output:?}");
    let langs: Vec<String> = stdout(&output)
        .lines()
        .filter_map(|line| line.split_once(". ").map(|(_, lang)| lang.to_string()))
        .collect();
    assert_eq!(langs, vec!["fr", "de", "en"]);
}

#[test]
fn test_compile_then_inspect_artifact() {
    let dir = workspace();
    let output = langforge(dir.path(), &["compile", "--accept-language", "de"]);
    assert!(output.status.success(), "{output:?}");
    assert!(stdout(&output).contains("Entries:    2"));

    let artifact = fs::read_dir(dir.path().join("cache"))
        .unwrap()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .find(|path| path.extension().is_some_and(|ext| ext == "cache"))
        .expect("artifact written");

    let output = Command::new(env!("CARGO_BIN_EXE_langforge"))
        .arg("inspect")
        .arg(&artifact)
        .env("NO_COLOR", "1")
        .output()
        .expect("failed to run langforge");
    assert!(output.status.success(), "{output:?}");
    let text = stdout(&output);
    assert!(text.contains("Language:  de"));
    assert!(text.contains("Speichern"));
}

#[test]
fn test_doctor_reports_missing_fallback() {
    let dir = workspace();
    let output = langforge(dir.path(), &["doctor", "--fallback", "pt"]);
    assert!(!output.status.success());
    assert!(stdout(&output).contains("lang/pt.yml missing"));
}
