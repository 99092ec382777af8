//! Format runner: the full pipeline across many files.
//!
//! Each target is detected, fixed and cleaned up with the rules of its
//! language. With `write` the result replaces the file when it differs;
//! otherwise callers can request the original text be kept for previews
//! and diffs.

use rayon::prelude::*;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Effective;
use crate::engine::Formatter;
use crate::error::{Result, StyleError};
use crate::models::Language;
use crate::utils::display_path;

#[derive(Debug, Clone)]
pub struct FormatResult {
    pub file: String,
    pub language: Language,
    pub score: f64,
    pub issues: usize,
    pub fixes_applied: usize,
    pub changed: bool,
    pub wrote: bool,
    pub preview: Option<String>,
    pub original: Option<String>,
}

/// Build one `Formatter` per language that occurs in `targets`.
fn formatters_for(eff: &Effective, targets: &[PathBuf]) -> Result<HashMap<Language, Formatter>> {
    let mut formatters = HashMap::new();
    for path in targets {
        let language = eff.language.resolve(path);
        if !formatters.contains_key(&language) {
            formatters.insert(language, Formatter::new(language, eff.rules_for(language))?);
        }
    }
    Ok(formatters)
}

fn format_one(
    eff: &Effective,
    formatter: &Formatter,
    path: &Path,
    write: bool,
    capture_old: bool,
) -> Result<FormatResult> {
    let outcome = formatter.format_file(path)?;
    let changed = outcome.changed();
    let wrote = write && changed;
    if wrote {
        fs::write(path, &outcome.fixed_text).map_err(|e| StyleError::io(path, e))?;
        tracing::info!(path = %path.display(), "wrote fixes");
    }
    let keep = capture_old && changed;
    Ok(FormatResult {
        file: display_path(&eff.repo_root, path),
        language: outcome.language,
        score: outcome.score,
        issues: outcome.issues.len(),
        fixes_applied: outcome.fixes_applied,
        changed,
        wrote,
        preview: keep.then(|| outcome.fixed_text.clone()),
        original: keep.then_some(outcome.original_text),
    })
}

/// Format every file in `targets`.
///
/// Returns one `FormatResult` per readable file, sorted by path, plus the
/// per-file errors. A rule table that fails to build is fatal for the run.
pub fn run_format(
    eff: &Effective,
    targets: &[PathBuf],
    write: bool,
    capture_old: bool,
) -> Result<(Vec<FormatResult>, Vec<StyleError>)> {
    let formatters = formatters_for(eff, targets)?;
    let per_file: Vec<Result<FormatResult>> = targets
        .par_iter()
        .map(|path| {
            let language = eff.language.resolve(path);
            match formatters.get(&language) {
                Some(f) => format_one(eff, f, path, write, capture_old),
                None => Err(StyleError::UnknownLanguage(language.to_string())),
            }
        })
        .collect();

    let mut results = Vec::new();
    let mut errors = Vec::new();
    for res in per_file {
        match res {
            Ok(r) => results.push(r),
            Err(e) => errors.push(e),
        }
    }
    results.sort_by(|a, b| a.file.cmp(&b.file));
    tracing::debug!(
        files = results.len(),
        changed = results.iter().filter(|r| r.changed).count(),
        "format finished"
    );
    Ok((results, errors))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::resolve_effective;
    use tempfile::tempdir;

    #[test]
    fn test_preview_without_write() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir(root.join(".git")).unwrap();
        let path = root.join("a.py");
        fs::write(&path, "def hello():pass\n").unwrap();
        let eff = resolve_effective(root.to_str(), None, None, &[], None, None, None).unwrap();

        let (results, errors) = run_format(&eff, &[path.clone()], false, true).unwrap();
        assert!(errors.is_empty());
        let r = &results[0];
        assert!(r.changed && !r.wrote);
        assert_eq!(r.file, "a.py");
        assert_eq!(r.language, Language::Python);
        assert_eq!(r.preview.as_deref(), Some("def hello():\n    pass\n"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "def hello():pass\n");
    }

    #[test]
    fn test_write_replaces_changed_files_only() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir(root.join(".git")).unwrap();
        let dirty = root.join("A.java");
        let clean = root.join("B.java");
        fs::write(&dirty, "int x=1;\n").unwrap();
        fs::write(&clean, "int y = 2;\n").unwrap();
        let eff = resolve_effective(root.to_str(), None, None, &[], None, None, None).unwrap();

        let (results, _) = run_format(&eff, &[clean.clone(), dirty.clone()], true, false).unwrap();
        assert_eq!(results.iter().map(|r| r.file.as_str()).collect::<Vec<_>>(), ["A.java", "B.java"]);
        assert!(results[0].wrote && results[0].preview.is_none());
        assert!(!results[1].changed);
        assert_eq!(results[1].score, 100.0);
        assert_eq!(fs::read_to_string(&dirty).unwrap(), "int x = 1;\n");
    }

    #[test]
    fn test_language_override_applies_to_all_targets() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir(root.join(".git")).unwrap();
        let path = root.join("script.txt");
        fs::write(&path, "x=1\n").unwrap();
        let eff = resolve_effective(root.to_str(), Some("python"), None, &[], None, None, None).unwrap();
        let (results, _) = run_format(&eff, &[path], false, true).unwrap();
        assert_eq!(results[0].language, Language::Python);
        assert_eq!(results[0].preview.as_deref(), Some("x = 1\n"));
    }
}
