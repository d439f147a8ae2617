//! End-to-end runs of the `mind` binary against temporary repositories.

use std::path::Path;
use std::process::{Command, Output};

const SCHEMA: &str = "\
type: object
required:
  - title
  - tags
";

fn write_repo(schema: Option<&str>, entries: &[(&str, &str)]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    if let Some(schema) = schema {
        let schema_dir = dir.path().join("MIND_CI_Validation/schema");
        std::fs::create_dir_all(&schema_dir).expect("schema dir");
        std::fs::write(schema_dir.join("thought_entry.schema.yml"), schema).expect("schema");
    }
    let entries_dir = dir.path().join("thoughts/entries");
    std::fs::create_dir_all(&entries_dir).expect("entries dir");
    for (name, content) in entries {
        std::fs::write(entries_dir.join(name), content).expect("entry");
    }
    dir
}

fn mind(root: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_mind"))
        .arg("--root")
        .arg(root)
        .args(args)
        .output()
        .expect("run mind")
}

#[test]
fn one_invalid_entry_fails_the_run() {
    let repo = write_repo(
        Some(SCHEMA),
        &[
            ("a.md", "---\ntitle: A\ntags: [x, y]\n---\n# A\n"),
            ("b.md", "---\ntitle: B\n---\n# B\n"),
        ],
    );

    let output = mind(repo.path(), &["validate", "--naive-yaml", "--required-only"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(1), "stdout: {stdout}\nstderr: {stderr}");
    assert!(stdout.contains("✅ a.md valid."), "{stdout}");
    assert!(stdout.contains("❌ b.md invalid: missing: tags"), "{stdout}");
    assert!(stderr.contains("1 invalid thought files"), "{stderr}");
}

#[test]
fn no_subcommand_validates_default_entries() {
    let repo = write_repo(Some(SCHEMA), &[("a.md", "---\ntitle: A\ntags:\n  - x\n---\n")]);

    let output = mind(repo.path(), &[]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "{stdout}");
    assert!(stdout.contains("✅ a.md valid."), "{stdout}");
}

#[test]
fn empty_entries_dir_exits_zero_without_entry_lines() {
    let repo = write_repo(Some(SCHEMA), &[("README.txt", "not an entry")]);

    let output = mind(repo.path(), &["validate"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "{stdout}");
    assert!(!stdout.contains('✅') && !stdout.contains('❌'), "{stdout}");
    assert!(!stdout.contains("README.txt"), "{stdout}");
}

#[test]
fn missing_entries_dir_is_an_operational_error() {
    let dir = tempfile::tempdir().expect("tempdir");

    let output = mind(dir.path(), &["validate"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(2), "{stderr}");
    assert!(stderr.contains("cannot read entries directory"), "{stderr}");
}

#[test]
fn missing_schema_warns_on_stdout() {
    let repo = write_repo(None, &[("a.md", "no front matter\n")]);

    let output = mind(repo.path(), &["validate"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "{stdout}");
    assert!(stdout.contains("not found; skipping validation."), "{stdout}");
    assert!(stdout.contains("✅ a.md valid."), "{stdout}");
}
