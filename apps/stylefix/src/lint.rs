//! Check runner: detection across many files.
//!
//! Produces a `CheckReport` with one row per issue and a severity summary.
//! Files are processed in parallel; rows come back sorted by file, then line.

use rayon::prelude::*;
use std::path::{Path, PathBuf};

use crate::checks;
use crate::config::Effective;
use crate::engine::read_source;
use crate::error::{Result, StyleError};
use crate::models::{CheckReport, Issue, IssueRow, Language, Location, Summary};
use crate::shape::LineIndex;
use crate::tokenizer::Tokenizer;
use crate::utils::display_path;

/// 1-based line an issue points at.
pub fn issue_line(issue: &Issue, line_of_token: impl Fn(usize) -> usize) -> usize {
    match issue.location {
        Location::Line(line) => line,
        Location::Token(i) => line_of_token(i),
    }
}

/// Run detection for one file.
pub fn check_file(eff: &Effective, path: &Path) -> Result<(Language, Vec<IssueRow>)> {
    let language = eff.language.resolve(path);
    let rules = eff.rules_for(language);
    let tokenizer = Tokenizer::new(language)?;
    let text = read_source(path)?;
    let tokens = tokenizer.tokenize(&text);
    let issues = checks::detect(&tokens, &text, language, &rules);

    let index = LineIndex::new(&text);
    let file = display_path(&eff.repo_root, path);
    let rows = issues
        .into_iter()
        .map(|issue| {
            let line = issue_line(&issue, |i| {
                tokens.get(i).map(|t| index.line_of(t.start) + 1).unwrap_or(1)
            });
            IssueRow {
                file: file.clone(),
                line,
                issue,
            }
        })
        .collect();
    Ok((language, rows))
}

/// Check every file in `targets`.
///
/// A file that cannot be read is reported in the error list and left out
/// of the summary; the other files are still checked.
pub fn run_check(eff: &Effective, targets: &[PathBuf]) -> (CheckReport, Vec<StyleError>) {
    let per_file: Vec<Result<(Language, Vec<IssueRow>)>> =
        targets.par_iter().map(|path| check_file(eff, path)).collect();

    let mut rows: Vec<IssueRow> = Vec::new();
    let mut errors: Vec<StyleError> = Vec::new();
    let mut summary = Summary::default();
    for res in per_file {
        match res {
            Ok((_, mut file_rows)) => {
                summary.files += 1;
                rows.append(&mut file_rows);
            }
            Err(e) => errors.push(e),
        }
    }
    // Deterministic ordering of issues by file then line
    rows.sort_by(|a, b| a.file.cmp(&b.file).then(a.line.cmp(&b.line)));
    for row in &rows {
        summary.count(row.issue.severity);
    }
    tracing::debug!(files = summary.files, issues = rows.len(), "check finished");
    (CheckReport { issues: rows, summary }, errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::resolve_effective;
    use crate::models::{IssueKind, Severity};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_run_check_reports_rows_with_lines() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir(root.join(".git")).unwrap();
        fs::write(root.join("bad_name.py"), "class foo:\n    pass\n\nx=1\n").unwrap();
        fs::write(root.join("Good.java"), "public class Good {\n}\n").unwrap();
        let eff = resolve_effective(root.to_str(), None, None, &[], None, None, None).unwrap();
        let targets = vec![root.join("bad_name.py"), root.join("Good.java")];

        let (report, errors) = run_check(&eff, &targets);
        assert!(errors.is_empty());
        assert_eq!(report.summary.files, 2);
        assert!(report.issues.iter().all(|r| r.file == "bad_name.py"));

        let class = report
            .issues
            .iter()
            .find(|r| r.issue.kind == IssueKind::ClassNaming)
            .unwrap();
        assert_eq!(class.line, 1);
        assert_eq!(class.issue.severity, Severity::High);
        let op = report
            .issues
            .iter()
            .find(|r| r.issue.kind == IssueKind::MissingSpacesAroundOperator)
            .unwrap();
        assert_eq!(op.line, 4);
        assert!(report.summary.high >= 1);
    }

    #[test]
    fn test_unreadable_file_is_collected_as_error() {
        let dir = tempdir().unwrap();
        let eff = resolve_effective(dir.path().to_str(), None, None, &[], None, None, None).unwrap();
        let (report, errors) = run_check(&eff, &[dir.path().join("missing.cpp")]);
        assert_eq!(errors.len(), 1);
        assert_eq!(report.summary.files, 0);
    }
}
