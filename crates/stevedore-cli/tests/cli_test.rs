//! Binary-level tests for the stevedore CLI.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

struct Fixture {
    root: PathBuf,
    site: PathBuf,
    snapshot: PathBuf,
}

fn create_fixture(base: &Path) -> Fixture {
    let root = base.join("proj");
    fs::create_dir_all(root.join("pkg")).unwrap();
    fs::write(root.join("__init__.py"), b"").unwrap();
    fs::write(root.join("pkg").join("__init__.py"), b"").unwrap();
    fs::write(
        root.join("pkg").join("task.py"),
        b"def task():\n    return 42\n",
    )
    .unwrap();

    let site = base.join("site-packages");
    fs::create_dir_all(&site).unwrap();
    fs::write(site.join("libmod.py"), b"VERSION = '1.0'\n").unwrap();

    let snapshot = base.join("modules.json");
    let entries = serde_json::json!([
        {"name": "proj.pkg", "file": root.join("pkg").join("__init__.py")},
        {"name": "proj.pkg.task", "file": root.join("pkg").join("task.py")},
        {"name": "libmod", "file": site.join("libmod.py")},
        {"name": "builtins"},
    ]);
    fs::write(&snapshot, serde_json::to_vec(&entries).unwrap()).unwrap();

    Fixture { root, site, snapshot }
}

fn run_package(fixture: &Fixture, dest: &Path) -> serde_json::Value {
    let mut cmd = Command::cargo_bin("stevedore").unwrap();
    let assert = cmd
        .arg("package")
        .arg("--source")
        .arg(&fixture.root)
        .arg("--dest")
        .arg(dest)
        .arg("--module-name")
        .arg("proj.pkg.task")
        .arg("--modules")
        .arg(&fixture.snapshot)
        .arg("--library-root")
        .arg(&fixture.site)
        .assert()
        .success();
    serde_json::from_slice(&assert.get_output().stdout).unwrap()
}

#[test]
fn package_emits_a_stable_version_key() {
    let tmp = tempfile::tempdir().unwrap();
    let base = tmp.path().canonicalize().unwrap();
    let fixture = create_fixture(&base);

    let summary1 = run_package(&fixture, &base.join("one.tar.gz"));
    let summary2 = run_package(&fixture, &base.join("two.tar.gz"));

    assert_eq!(summary1["digest"], summary2["digest"]);
    assert_eq!(summary1["bytes"], summary2["bytes"]);
    assert_eq!(summary1["digest"].as_str().unwrap().len(), 64);
}

#[test]
fn package_archive_holds_only_user_code() {
    let tmp = tempfile::tempdir().unwrap();
    let base = tmp.path().canonicalize().unwrap();
    let fixture = create_fixture(&base);
    let dest = base.join("code.tar.gz");
    run_package(&fixture, &dest);

    let decoder = flate2::read::GzDecoder::new(File::open(&dest).unwrap());
    let mut archive = tar::Archive::new(decoder);
    let names: Vec<String> = archive
        .entries()
        .unwrap()
        .map(|e| e.unwrap().path().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["pkg/__init__.py", "pkg/task.py"]);
}

#[test]
fn hash_reports_the_content_digest() {
    let tmp = tempfile::tempdir().unwrap();
    let file = tmp.path().join("empty.bin");
    fs::write(&file, b"").unwrap();

    Command::cargo_bin("stevedore")
        .unwrap()
        .arg("hash")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
        ))
        .stdout(predicate::str::contains("\"bytes\":0"));
}

#[test]
fn missing_snapshot_file_fails() {
    let tmp = tempfile::tempdir().unwrap();
    Command::cargo_bin("stevedore")
        .unwrap()
        .arg("package")
        .arg("--source")
        .arg(tmp.path())
        .arg("--dest")
        .arg(tmp.path().join("out.tar.gz"))
        .arg("--module-name")
        .arg("proj")
        .arg("--modules")
        .arg(tmp.path().join("nope.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn malformed_snapshot_maps_to_the_input_exit_code() {
    let tmp = tempfile::tempdir().unwrap();
    let snapshot = tmp.path().join("modules.json");
    fs::write(&snapshot, b"{not json").unwrap();

    Command::cargo_bin("stevedore")
        .unwrap()
        .arg("package")
        .arg("--source")
        .arg(tmp.path())
        .arg("--dest")
        .arg(tmp.path().join("out.tar.gz"))
        .arg("--module-name")
        .arg("proj")
        .arg("--modules")
        .arg(&snapshot)
        .assert()
        .failure()
        .code(1);
}
