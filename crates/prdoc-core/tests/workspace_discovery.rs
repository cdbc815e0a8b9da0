//! Workspace discovery against real on-disk manifest trees.

use std::fs;
use std::path::Path;

use prdoc_core::{affected_packages, discover_packages};

fn write_manifest(dir: &Path, contents: &str) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join("Cargo.toml"), contents).unwrap();
}

fn package(name: &str) -> String {
    format!("[package]\nname = \"{name}\"\nversion = \"0.1.0\"\nedition = \"2021\"\n")
}

#[test]
fn direct_and_glob_members_are_all_discovered() {
    let root = tempfile::tempdir().unwrap();
    write_manifest(
        root.path(),
        "[workspace]\nresolver = \"2\"\nmembers = [\"tools/runner\", \"crates/*\"]\n",
    );
    // Two direct-by-glob members and one explicit member.
    write_manifest(&root.path().join("crates/core"), &package("demo-core"));
    write_manifest(&root.path().join("crates/cli"), &package("demo-cli"));
    write_manifest(&root.path().join("tools/runner"), &package("demo-runner"));

    let packages = discover_packages(root.path());
    assert_eq!(packages.len(), 3);
    assert_eq!(packages["demo-core"], "crates/core");
    assert_eq!(packages["demo-cli"], "crates/cli");
    assert_eq!(packages["demo-runner"], "tools/runner");
}

#[test]
fn aggregator_manifest_without_package_name_contributes_members_only() {
    let root = tempfile::tempdir().unwrap();
    write_manifest(root.path(), "[workspace]\nmembers = [\"member\"]\n");
    write_manifest(&root.path().join("member"), &package("member"));

    let packages = discover_packages(root.path());
    assert_eq!(packages.len(), 1);
    assert!(packages.contains_key("member"));
}

#[test]
fn self_referencing_member_terminates() {
    let root = tempfile::tempdir().unwrap();
    // "." points the workspace at itself; the visited set must stop the walk.
    write_manifest(
        root.path(),
        "[package]\nname = \"looped\"\nversion = \"0.1.0\"\n\n[workspace]\nmembers = [\".\", \"sub\"]\n",
    );
    write_manifest(&root.path().join("sub"), &package("sub"));

    let packages = discover_packages(root.path());
    assert_eq!(packages.len(), 2);
    assert_eq!(packages["looped"], "");
    assert_eq!(packages["sub"], "sub");
}

#[test]
fn discovery_feeds_path_attribution_end_to_end() {
    let root = tempfile::tempdir().unwrap();
    write_manifest(
        root.path(),
        "[workspace]\nmembers = [\"crates/*\"]\n",
    );
    write_manifest(&root.path().join("crates/store"), &package("store"));
    write_manifest(&root.path().join("crates/store-api"), &package("store-api"));

    let packages = discover_packages(root.path());
    // `crates/store-api/...` must not leak into `crates/store`.
    let affected = affected_packages(
        &["crates/store-api/src/lib.rs".to_string()],
        &packages,
    );
    assert_eq!(affected, vec!["store-api".to_string()]);

    let affected = affected_packages(
        &[
            "crates/store/src/lib.rs".to_string(),
            "docs/guide.md".to_string(),
        ],
        &packages,
    );
    assert_eq!(affected, vec!["store".to_string()]);
}
