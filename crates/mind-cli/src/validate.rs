//! # Validate Subcommand
//!
//! Checks the front matter of every thought entry against the schema.
//!
//! The schema is loaded once; the loader/validator pair is selected once
//! and reused for every entry. Each `.md` file in the entries directory
//! (non-recursive, directory listing order) is read, its front matter
//! extracted, parsed and validated, and one result line is printed.
//! Invalid entries are counted and reported, never fatal; anything else
//! that goes wrong (unreadable directory or file, unparseable YAML under
//! the full parser, a malformed schema) aborts the run.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use mind_schema::capability::select_loader;
use mind_schema::{
    read_front_matter, Capabilities, SchemaDocument, Toolchain, ValidationFailure,
    SCHEMA_RELATIVE_PATH,
};

use crate::ENTRIES_RELATIVE_DIR;

/// Arguments for the `mind validate` subcommand.
#[derive(Args, Debug, Default, Clone)]
pub struct ValidateArgs {
    /// Schema file (default: MIND_CI_Validation/schema/thought_entry.schema.yml).
    #[arg(long, value_name = "FILE")]
    pub schema: Option<PathBuf>,

    /// Entries directory (default: thoughts/entries).
    #[arg(long, value_name = "DIR")]
    pub entries: Option<PathBuf>,

    /// Parse YAML with the naive subset parser even if the full parser is available.
    #[arg(long)]
    pub naive_yaml: bool,

    /// Only check that required keys are present.
    #[arg(long)]
    pub required_only: bool,

    /// Validate a single entry file, or every entry in another directory.
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,
}

impl ValidateArgs {
    /// Capabilities of this build, narrowed by the fallback flags.
    pub fn capabilities(&self) -> Capabilities {
        let mut caps = Capabilities::detect();
        if self.naive_yaml {
            caps = caps.without_full_yaml();
        }
        if self.required_only {
            caps = caps.without_full_validation();
        }
        caps
    }
}

/// A single entry that failed validation.
#[derive(Debug, Clone)]
pub struct EntryFailure {
    /// File name of the entry.
    pub file_name: String,
    /// Why the entry failed.
    pub failure: ValidationFailure,
}

/// Outcome of validating a set of entries.
#[derive(Debug, Default, Clone)]
pub struct EntryReport {
    /// Entries checked.
    pub total: usize,
    /// Entries that conformed to the schema.
    pub passed: usize,
    /// Entries that did not.
    pub failures: Vec<EntryFailure>,
}

impl EntryReport {
    /// Number of invalid entries.
    pub fn invalid(&self) -> usize {
        self.failures.len()
    }

    fn record(&mut self, file_name: String, outcome: Result<(), ValidationFailure>) {
        self.total += 1;
        match outcome {
            Ok(()) => self.passed += 1,
            Err(failure) => self.failures.push(EntryFailure { file_name, failure }),
        }
    }
}

/// Execute the validate subcommand, printing to standard output.
///
/// Returns the exit code: 0 when every entry is valid, 1 otherwise.
pub fn run_validate(args: &ValidateArgs, repo_root: &Path) -> Result<u8> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_validate_to(args, repo_root, &mut out)
}

/// Execute the validate subcommand, writing result lines to `out`.
pub fn run_validate_to(args: &ValidateArgs, repo_root: &Path, out: &mut impl Write) -> Result<u8> {
    let caps = args.capabilities();
    let (loader, loader_degradation) = select_loader(caps);

    let schema_path = match &args.schema {
        Some(path) => crate::resolve_path(path, repo_root),
        None => repo_root.join(SCHEMA_RELATIVE_PATH),
    };
    let loaded = SchemaDocument::load(&schema_path, loader.as_ref())
        .with_context(|| format!("failed to load schema {}", schema_path.display()))?;
    let schema_missing = loaded.is_none();
    let schema = loaded.unwrap_or_default();

    let toolchain = Toolchain::assemble(caps, loader, loader_degradation, schema.as_value());

    for degradation in toolchain.degradations() {
        writeln!(out, "Warning: {degradation}")?;
    }
    if schema_missing {
        writeln!(
            out,
            "Warning: schema file '{}' not found; skipping validation.",
            schema_path.display()
        )?;
    }

    let report = match &args.path {
        Some(path) => {
            let target = crate::resolve_path(path, repo_root);
            if target.is_dir() {
                validate_entries(&target, &toolchain, out)?
            } else {
                validate_single_entry(&target, &toolchain, out)?
            }
        }
        None => {
            let entries_dir = match &args.entries {
                Some(dir) => crate::resolve_path(dir, repo_root),
                None => repo_root.join(ENTRIES_RELATIVE_DIR),
            };
            validate_entries(&entries_dir, &toolchain, out)?
        }
    };

    tracing::info!(
        total = report.total,
        passed = report.passed,
        invalid = report.invalid(),
        "validated thought entries"
    );

    if report.invalid() > 0 {
        eprintln!("{} invalid thought files", report.invalid());
        Ok(1)
    } else {
        Ok(0)
    }
}

/// Validate every `.md` file directly inside `dir`.
///
/// Files are visited in directory listing order. Other files are never
/// opened.
pub fn validate_entries(
    dir: &Path,
    toolchain: &Toolchain,
    out: &mut impl Write,
) -> Result<EntryReport> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("cannot read entries directory {}", dir.display()))?;

    let mut report = EntryReport::default();
    for entry in entries {
        let entry = entry.with_context(|| format!("cannot list {}", dir.display()))?;
        let file_name = entry.file_name().to_string_lossy().into_owned();
        if !file_name.ends_with(".md") {
            tracing::trace!(file = %file_name, "skipping non-markdown file");
            continue;
        }

        let outcome = check_entry(&entry.path(), toolchain)?;
        print_outcome(out, &file_name, &outcome)?;
        report.record(file_name, outcome);
    }

    Ok(report)
}

/// Validate one entry file regardless of its extension.
pub fn validate_single_entry(
    path: &Path,
    toolchain: &Toolchain,
    out: &mut impl Write,
) -> Result<EntryReport> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let outcome = check_entry(path, toolchain)?;
    print_outcome(out, &file_name, &outcome)?;

    let mut report = EntryReport::default();
    report.record(file_name, outcome);
    Ok(report)
}

/// Extract, parse and validate the front matter of one entry.
///
/// The outer `Result` carries operational errors; the inner one the
/// validation outcome.
pub fn check_entry(path: &Path, toolchain: &Toolchain) -> Result<Result<(), ValidationFailure>> {
    let front_matter = read_front_matter(path)?;
    let instance = toolchain
        .loader()
        .load(&front_matter)
        .with_context(|| format!("cannot parse front matter of {}", path.display()))?;

    let outcome = toolchain.validator().validate(&instance);
    if let Err(failure) = &outcome {
        tracing::debug!(
            path = %path.display(),
            violations = failure.violations().len(),
            "entry failed validation"
        );
    }
    Ok(outcome)
}

fn print_outcome(
    out: &mut impl Write,
    file_name: &str,
    outcome: &Result<(), ValidationFailure>,
) -> std::io::Result<()> {
    match outcome {
        Ok(()) => writeln!(out, "✅ {file_name} valid."),
        Err(failure) => writeln!(out, "❌ {file_name} invalid: {failure}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_repo(schema: Option<&str>, entries: &[(&str, &str)]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        if let Some(schema) = schema {
            let schema_path = dir.path().join(SCHEMA_RELATIVE_PATH);
            std::fs::create_dir_all(schema_path.parent().unwrap()).unwrap();
            std::fs::write(schema_path, schema).unwrap();
        }
        let entries_dir = dir.path().join(ENTRIES_RELATIVE_DIR);
        std::fs::create_dir_all(&entries_dir).unwrap();
        for (name, content) in entries {
            std::fs::write(entries_dir.join(name), content).unwrap();
        }
        dir
    }

    fn fallback_args() -> ValidateArgs {
        ValidateArgs {
            naive_yaml: true,
            required_only: true,
            ..ValidateArgs::default()
        }
    }

    fn run(args: &ValidateArgs, root: &Path) -> (u8, String) {
        let mut out = Vec::new();
        let code = run_validate_to(args, root, &mut out).unwrap();
        (code, String::from_utf8(out).unwrap())
    }

    const SCHEMA: &str = "type: object\nrequired:\n  - title\n  - tags\n";

    #[test]
    fn capabilities_follow_flags() {
        let caps = fallback_args().capabilities();
        assert_eq!(caps, Capabilities::minimal());
        assert_eq!(ValidateArgs::default().capabilities(), Capabilities::detect());
    }

    #[test]
    fn reports_valid_and_invalid_entries() {
        let repo = write_repo(
            Some(SCHEMA),
            &[
                ("a.md", "---\ntitle: A\ntags: [x]\n---\nbody\n"),
                ("b.md", "---\ntitle: B\n---\nbody\n"),
            ],
        );
        let (code, out) = run(&fallback_args(), repo.path());
        assert_eq!(code, 1);
        assert!(out.contains("✅ a.md valid.\n"), "{out}");
        assert!(out.contains("❌ b.md invalid: missing: tags\n"), "{out}");
    }

    #[test]
    fn fallback_warnings_precede_entry_lines() {
        let repo = write_repo(Some(SCHEMA), &[("a.md", "---\ntitle: A\ntags: [x]\n---\n")]);
        let (code, out) = run(&fallback_args(), repo.path());
        assert_eq!(code, 0);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Warning: full YAML parser unavailable; using naive parser.",
                "Warning: JSON Schema validator unavailable; falling back to required check.",
                "✅ a.md valid.",
            ]
        );
    }

    #[test]
    fn empty_entries_dir_succeeds_without_entry_lines() {
        let repo = write_repo(Some(SCHEMA), &[]);
        let (code, out) = run(&fallback_args(), repo.path());
        assert_eq!(code, 0);
        assert!(!out.contains('✅') && !out.contains('❌'), "{out}");
    }

    #[test]
    fn non_markdown_files_are_ignored() {
        let repo = write_repo(
            Some(SCHEMA),
            &[("notes.txt", "---\n---\n"), ("draft.md.bak", ""), ("ok.md", "---\ntitle: t\ntags:\n  - a\n---\n")],
        );
        let (code, out) = run(&fallback_args(), repo.path());
        assert_eq!(code, 0);
        assert!(!out.contains("notes.txt"));
        assert!(!out.contains("draft.md.bak"));
        assert!(out.contains("✅ ok.md valid."));
    }

    #[test]
    fn missing_schema_warns_and_accepts_everything() {
        let repo = write_repo(None, &[("bare.md", "no front matter at all\n")]);
        let (code, out) = run(&fallback_args(), repo.path());
        assert_eq!(code, 0);
        let expected_path = repo.path().join(SCHEMA_RELATIVE_PATH);
        assert!(
            out.contains(&format!(
                "Warning: schema file '{}' not found; skipping validation.",
                expected_path.display()
            )),
            "{out}"
        );
        assert!(out.contains("✅ bare.md valid."));
    }

    #[test]
    fn entry_without_front_matter_fails_required_keys() {
        let repo = write_repo(Some(SCHEMA), &[("bare.md", "# Heading\n")]);
        let (code, out) = run(&fallback_args(), repo.path());
        assert_eq!(code, 1);
        assert!(out.contains("❌ bare.md invalid: missing: title, tags"), "{out}");
    }

    #[test]
    fn missing_entries_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut out = Vec::new();
        let err = run_validate_to(&fallback_args(), dir.path(), &mut out).unwrap_err();
        assert!(format!("{err:#}").contains("cannot read entries directory"), "{err:#}");
    }

    #[test]
    fn single_path_validates_one_entry() {
        let repo = write_repo(
            Some(SCHEMA),
            &[("a.md", "---\ntitle: A\ntags: [x]\n---\n"), ("b.md", "---\ntitle: B\n---\n")],
        );
        let args = ValidateArgs {
            path: Some(PathBuf::from("thoughts/entries/b.md")),
            ..fallback_args()
        };
        let (code, out) = run(&args, repo.path());
        assert_eq!(code, 1);
        assert!(out.contains("❌ b.md invalid: missing: tags"));
        assert!(!out.contains("a.md"));
    }

    #[test]
    fn custom_schema_and_entries_locations() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("schema.yml"), "required: [mood]\n").unwrap();
        std::fs::create_dir(dir.path().join("drafts")).unwrap();
        std::fs::write(dir.path().join("drafts/x.md"), "---\nmood: calm\n---\n").unwrap();

        let args = ValidateArgs {
            schema: Some(PathBuf::from("schema.yml")),
            entries: Some(PathBuf::from("drafts")),
            ..fallback_args()
        };
        let (code, out) = run(&args, dir.path());
        assert_eq!(code, 0);
        assert!(out.contains("✅ x.md valid."), "{out}");
    }

    #[test]
    fn report_counts() {
        let mut report = EntryReport::default();
        report.record("a.md".into(), Ok(()));
        report.record("b.md".into(), Err(ValidationFailure::new("missing: x")));
        assert_eq!(report.total, 2);
        assert_eq!(report.passed, 1);
        assert_eq!(report.invalid(), 1);
        assert_eq!(report.failures[0].file_name, "b.md");
    }

    #[cfg(all(feature = "full-yaml", feature = "full-validation"))]
    mod full {
        use super::*;

        const FULL_SCHEMA: &str = r#"
type: object
required: [title, tags]
properties:
  title:
    type: string
  tags:
    type: array
    items:
      type: string
  mood:
    enum: [calm, curious]
"#;

        #[test]
        fn full_backends_enforce_types_and_enums() {
            let repo = write_repo(
                Some(FULL_SCHEMA),
                &[
                    ("good.md", "---\ntitle: Good\ntags:\n  - a\nmood: calm\n---\n"),
                    ("bad.md", "---\ntitle: Bad\ntags: a\nmood: furious\n---\n"),
                ],
            );
            let (code, out) = run(&ValidateArgs::default(), repo.path());
            assert_eq!(code, 1);
            assert!(!out.contains("Warning:"), "{out}");
            assert!(out.contains("✅ good.md valid."), "{out}");
            assert!(out.contains("❌ bad.md invalid: "), "{out}");
        }

        #[test]
        fn malformed_front_matter_aborts_run() {
            let repo = write_repo(Some(FULL_SCHEMA), &[("broken.md", "---\ntitle: [open\n---\n")]);
            let mut out = Vec::new();
            let err = run_validate_to(&ValidateArgs::default(), repo.path(), &mut out).unwrap_err();
            assert!(format!("{err:#}").contains("cannot parse front matter"), "{err:#}");
        }

        #[test]
        fn malformed_schema_fails_each_entry() {
            let repo = write_repo(
                Some("type: 42\n"),
                &[
                    ("a.md", "---\ntitle: x\n---\n"),
                    ("b.md", "no front matter\n"),
                ],
            );
            let (code, out) = run(&ValidateArgs::default(), repo.path());
            assert_eq!(code, 1);
            assert_eq!(out.matches("❌").count(), 2, "{out}");
            assert!(out.contains("❌ a.md invalid: "), "{out}");
            assert!(out.contains("❌ b.md invalid: "), "{out}");
        }

        #[test]
        fn malformed_schema_with_no_entries_passes() {
            let repo = write_repo(Some("type: 42\n"), &[]);
            let (code, out) = run(&ValidateArgs::default(), repo.path());
            assert_eq!(code, 0);
            assert!(!out.contains('❌'), "{out}");
        }

        #[test]
        fn falsy_front_matter_is_an_empty_record() {
            let repo = write_repo(
                Some("type: object\n"),
                &[
                    ("list.md", "---\n[]\n---\n"),
                    ("string.md", "---\n''\n---\n"),
                    ("zero.md", "---\n0\n---\n"),
                ],
            );
            let (code, out) = run(&ValidateArgs::default(), repo.path());
            assert_eq!(code, 0, "{out}");
            assert!(out.contains("✅ list.md valid."), "{out}");
            assert!(out.contains("✅ string.md valid."), "{out}");
            assert!(out.contains("✅ zero.md valid."), "{out}");
        }
    }
}
