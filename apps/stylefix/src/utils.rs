//! Supporting helpers: colored message prefixes, input discovery, paths.

use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};

use crate::error::{Result, StyleError};
use crate::models::Language;

pub fn use_colors() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

fn prefix(label: &str, paint: fn(&str) -> String) -> String {
    if use_colors() {
        paint(label)
    } else {
        label.to_string()
    }
}

pub fn error_prefix() -> String {
    prefix("error:", |s| s.red().bold().to_string())
}

pub fn note_prefix() -> String {
    prefix("note:", |s| s.yellow().bold().to_string())
}

pub fn info_prefix() -> String {
    prefix("info:", |s| s.blue().bold().to_string())
}

/// Expand `patterns` (plain paths or globs) relative to `root`.
///
/// With no patterns every file with a known extension under `root` is
/// taken. The result is sorted and free of duplicates.
pub fn collect_targets(root: &Path, patterns: &[String]) -> Result<Vec<PathBuf>> {
    let defaults: Vec<String>;
    let patterns = if patterns.is_empty() {
        defaults = Language::ALL
            .iter()
            .flat_map(|l| l.extensions())
            .map(|ext| format!("**/*.{}", ext))
            .collect();
        &defaults
    } else {
        patterns
    };

    let mut targets: Vec<PathBuf> = Vec::new();
    for pat in patterns {
        let abs = if Path::new(pat).is_absolute() {
            PathBuf::from(pat)
        } else {
            root.join(pat)
        };
        let pattern = abs.to_string_lossy().to_string();
        let entries = glob::glob(&pattern).map_err(|e| StyleError::Glob {
            pattern: pat.clone(),
            message: e.to_string(),
        })?;
        let before = targets.len();
        for entry in entries {
            match entry {
                Ok(p) if p.is_file() => targets.push(p),
                Ok(_) => {}
                Err(e) => tracing::warn!(error = %e, "skipping unreadable path"),
            }
        }
        if targets.len() == before {
            tracing::info!(pattern = %pat, "pattern matched no files");
        }
    }
    targets.sort();
    targets.dedup();
    Ok(targets)
}

/// `path` relative to `root` when possible, for display.
pub fn display_path(root: &Path, path: &Path) -> String {
    pathdiff::diff_paths(path, root)
        .filter(|p| !p.as_os_str().is_empty() && !p.starts_with(".."))
        .unwrap_or_else(|| path.to_path_buf())
        .to_string_lossy()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_collect_targets_globs_and_defaults() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(root.join("src/A.java"), "class A {}\n").unwrap();
        fs::write(root.join("src/b.py"), "x = 1\n").unwrap();
        fs::write(root.join("notes.txt"), "hi\n").unwrap();

        let java = collect_targets(root, &["src/*.java".to_string()]).unwrap();
        assert_eq!(java, vec![root.join("src/A.java")]);

        let all = collect_targets(root, &[]).unwrap();
        assert_eq!(all, vec![root.join("src/A.java"), root.join("src/b.py")]);
    }

    #[test]
    fn test_bad_glob_is_an_error() {
        let dir = tempdir().unwrap();
        let err = collect_targets(dir.path(), &["src/[".to_string()]).unwrap_err();
        assert!(matches!(err, StyleError::Glob { .. }));
    }

    #[test]
    fn test_display_path_is_relative_under_root() {
        let root = Path::new("/repo");
        assert_eq!(display_path(root, Path::new("/repo/src/a.py")), "src/a.py");
        assert_eq!(display_path(root, Path::new("/other/b.py")), "/other/b.py");
    }
}
