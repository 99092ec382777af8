//! Per-file pipeline: tokenize, detect, fix, score.

use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::checks::{self, compile};
use crate::error::{Result, StyleError};
use crate::fix::Fixer;
use crate::models::{Issue, Language, RuleSet};
use crate::tokenizer::Tokenizer;

/// Result of running the whole pipeline over one source text.
#[derive(Debug, Clone, Serialize)]
pub struct FormatOutcome {
    pub language: Language,
    pub original_text: String,
    pub fixed_text: String,
    pub issues: Vec<Issue>,
    pub fixes_applied: usize,
    pub score: f64,
}

impl FormatOutcome {
    pub fn changed(&self) -> bool {
        self.original_text != self.fixed_text
    }
}

/// Percentage of detected issues that received a fix.
pub fn score(issues_found: usize, fixes_applied: usize) -> f64 {
    if issues_found == 0 {
        return 100.0;
    }
    (fixes_applied as f64 / issues_found as f64 * 100.0).clamp(0.0, 100.0)
}

/// Tokenizer and rule table for one language, reused across files.
#[derive(Debug)]
pub struct Formatter {
    tokenizer: Tokenizer,
    rules: RuleSet,
}

impl Formatter {
    /// Fails when a naming pattern in `rules` is not a valid regex.
    pub fn new(language: Language, rules: RuleSet) -> Result<Formatter> {
        let naming = &rules.naming;
        let patterns = [
            Some(&naming.class),
            naming.function.as_ref(),
            naming.method.as_ref(),
            naming.package.as_ref(),
        ];
        for pattern in patterns.into_iter().flatten() {
            compile(pattern)?;
        }
        Ok(Formatter {
            tokenizer: Tokenizer::new(language)?,
            rules,
        })
    }

    /// Default rules for `language`.
    pub fn for_language(language: Language) -> Result<Formatter> {
        Formatter::new(language, RuleSet::for_language(language))
    }

    pub fn language(&self) -> Language {
        self.tokenizer.language()
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Detection only.
    pub fn check_source(&self, text: &str) -> Vec<Issue> {
        let tokens = self.tokenizer.tokenize(text);
        checks::detect(&tokens, text, self.language(), &self.rules)
    }

    pub fn format_source(&self, text: &str) -> FormatOutcome {
        let issues = self.check_source(text);
        let mut fixer = Fixer::new(&self.tokenizer, &self.rules);
        let fixed_text = fixer.apply(text, &issues);
        let fixes_applied = fixer.applied().len();
        let score = score(issues.len(), fixes_applied);
        tracing::debug!(
            language = %self.language(),
            issues = issues.len(),
            fixes_applied,
            score,
            "formatted source"
        );
        FormatOutcome {
            language: self.language(),
            original_text: text.to_string(),
            fixed_text,
            issues,
            fixes_applied,
            score,
        }
    }

    pub fn format_file(&self, path: &Path) -> Result<FormatOutcome> {
        let text = read_source(path)?;
        Ok(self.format_source(&text))
    }
}

pub fn read_source(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| StyleError::io(path, e))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_rule() {
        assert_eq!(score(0, 0), 100.0);
        assert_eq!(score(4, 1), 25.0);
        assert_eq!(score(2, 5), 100.0);
    }

    #[test]
    fn test_clean_source_is_untouched() {
        let f = Formatter::for_language(Language::Java).unwrap();
        let text = "public class A {\n    int x = 1;\n}\n";
        let out = f.format_source(text);
        assert!(out.issues.is_empty());
        assert_eq!(out.fixed_text, text);
        assert_eq!(out.score, 100.0);
        assert!(!out.changed());
    }

    #[test]
    fn test_dirty_source_is_fixed_and_scored() {
        let f = Formatter::for_language(Language::Java).unwrap();
        let out = f.format_source("int x=1;");
        assert!(!out.issues.is_empty());
        assert_eq!(out.fixed_text, "int x = 1;");
        assert!(out.fixes_applied >= 1);
        assert!(out.score > 0.0 && out.score <= 100.0);
    }

    #[test]
    fn test_invalid_naming_pattern_is_rejected() {
        let mut rules = RuleSet::for_language(Language::Python);
        rules.naming.class = "([A-Z".into();
        let err = Formatter::new(Language::Python, rules).unwrap_err();
        assert!(matches!(err, StyleError::InvalidPattern { .. }));
    }

    #[test]
    fn test_format_file_reports_missing_path() {
        let f = Formatter::for_language(Language::Cpp).unwrap();
        let err = f.format_file(Path::new("/nonexistent/dir/a.cpp")).unwrap_err();
        assert!(matches!(err, StyleError::Io { .. }));
    }
}
