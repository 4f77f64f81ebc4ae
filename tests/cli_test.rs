use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn sample_tree() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "src/pkg/strings/strings.go", "package strings\n");
    write(temp_dir.path(), "src/cmd/hello/hello.go", "package main\nimport \"strings\"\n");
    temp_dir
}

#[test]
fn test_generate_writes_descriptors() {
    let temp_dir = sample_tree();

    Command::cargo_bin("genmake")
        .unwrap()
        .arg("-C")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 6 files"));

    let hello = fs::read_to_string(temp_dir.path().join("src/cmd/hello/Makefile")).unwrap();
    assert!(hello.contains("$(MAKE) -C ../../pkg/strings install"));
}

#[test]
fn test_dry_run_writes_nothing() {
    let temp_dir = sample_tree();

    Command::cargo_bin("genmake")
        .unwrap()
        .args(["--dry-run", "-q", "-C"])
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Make.deps"))
        .stdout(predicate::str::contains(".gitignore"));

    assert!(!temp_dir.path().join("src/pkg/strings/Makefile").exists());
}

#[test]
fn test_check_json() {
    let temp_dir = sample_tree();

    let output = Command::cargo_bin("genmake")
        .unwrap()
        .args(["check", "--json", "-q", "-C"])
        .arg(temp_dir.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["packages"][0]["target"]["name"], "strings");
    assert_eq!(report["commands"][0]["deps"]["internal"][0], "strings");
}

#[test]
fn test_scan_error_exits_non_zero() {
    let temp_dir = sample_tree();
    write(temp_dir.path(), "src/pkg/bad/bad.go", "import \"fmt\"\n");

    Command::cargo_bin("genmake")
        .unwrap()
        .arg("-C")
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("bad.go"))
        .stderr(predicate::str::contains("expected 'package'"));
}

#[test]
fn test_platforms_uses_config() {
    let temp_dir = TempDir::new().unwrap();
    write(
        temp_dir.path(),
        "genmake.toml",
        "[platforms]\nos = [\"linux\", \"freebsd\"]\narch = [\"arm\"]\n",
    );

    Command::cargo_bin("genmake")
        .unwrap()
        .args(["platforms", "-C"])
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("freebsd, linux"))
        .stdout(predicate::str::contains("arm"));
}

#[test]
fn test_invalid_config_is_reported() {
    let temp_dir = sample_tree();
    write(temp_dir.path(), "genmake.toml", "[platforms]\nos = [\"Linux\"]\n");

    Command::cargo_bin("genmake")
        .unwrap()
        .arg("-C")
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}
