//! Configuration discovery and effective settings resolution.
//!
//! Stylefix reads `stylefix.toml|yaml|yml` from the repository root (or
//! closest ancestor) and merges it with CLI flags to produce an `Effective`
//! config. Defaults:
//! - `language`: `auto`
//! - `output`: `human`
//! - `patterns`: none (inputs must come from the CLI or the config)
//! - `format.write|diff|check`: false
//! - `rules.<language>`: built-in rule tables
//!
//! Overrides precedence: CLI > config file > defaults.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, StyleError};
use crate::models::rules::RuleOverride;
use crate::models::{Language, LanguageChoice, RuleSet};

const CONFIG_FILES: &[&str] = &["stylefix.toml", "stylefix.yaml", "stylefix.yml"];

#[derive(Debug, Default, Deserialize, Clone)]
/// Formatting-related configuration section under `[format]`.
pub struct FormatCfg {
    pub write: Option<bool>,
    pub diff: Option<bool>,
    pub check: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Per-language rule overrides under `[rules.<language>]`.
pub struct RulesCfg {
    pub java: Option<RuleOverride>,
    pub python: Option<RuleOverride>,
    pub cpp: Option<RuleOverride>,
}

impl RulesCfg {
    pub fn for_language(&self, language: Language) -> Option<&RuleOverride> {
        match language {
            Language::Java => self.java.as_ref(),
            Language::Python => self.python.as_ref(),
            Language::Cpp => self.cpp.as_ref(),
        }
    }
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `stylefix.toml|yaml`.
pub struct StylefixConfig {
    pub language: Option<String>,
    pub output: Option<String>,
    #[serde(default)]
    pub patterns: Option<Vec<String>>,
    pub format: Option<FormatCfg>,
    #[serde(default)]
    pub rules: Option<RulesCfg>,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by commands after applying precedence.
pub struct Effective {
    pub repo_root: PathBuf,
    pub config_found: bool,
    pub language: LanguageChoice,
    pub output: String,
    pub patterns: Vec<String>,
    pub write: bool,
    pub diff: bool,
    pub check: bool,
    pub rules: RulesCfg,
}

impl Effective {
    /// Rule table for `language` with the configured overrides applied.
    pub fn rules_for(&self, language: Language) -> RuleSet {
        RuleSet::with_override(language, self.rules.for_language(language))
    }
}

/// Walk upward from `start` to detect the repository root.
///
/// Stops when a `stylefix.toml|yaml|yml` or a `.git` directory is found.
pub fn detect_repo_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if CONFIG_FILES.iter().any(|f| cur.join(f).exists()) || cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Load `StylefixConfig` from `stylefix.toml` or `stylefix.yaml|yml` if present.
pub fn load_config(root: &Path) -> Result<Option<StylefixConfig>> {
    for name in CONFIG_FILES {
        let path = root.join(name);
        if !path.exists() {
            continue;
        }
        let s = fs::read_to_string(&path).map_err(|e| StyleError::io(&path, e))?;
        let parsed = if name.ends_with(".toml") {
            toml::from_str::<StylefixConfig>(&s).map_err(|e| e.to_string())
        } else {
            serde_yaml::from_str::<StylefixConfig>(&s).map_err(|e| e.to_string())
        };
        return parsed
            .map(Some)
            .map_err(|message| StyleError::Config { path, message });
    }
    Ok(None)
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
pub fn resolve_effective(
    cli_repo_root: Option<&str>,
    cli_language: Option<&str>,
    cli_output: Option<&str>,
    cli_patterns: &[String],
    cli_write: Option<bool>,
    cli_diff: Option<bool>,
    cli_check: Option<bool>,
) -> Result<Effective> {
    let start = PathBuf::from(cli_repo_root.unwrap_or("."));
    let repo_root = detect_repo_root(&start);
    let loaded = load_config(&repo_root)?;
    let config_found = loaded.is_some();
    let cfg = loaded.unwrap_or_default();

    let language = match cli_language.map(str::to_string).or(cfg.language) {
        Some(s) => LanguageChoice::parse(&s)?,
        None => LanguageChoice::Auto,
    };

    let output = cli_output
        .map(|s| s.to_string())
        .or(cfg.output)
        .unwrap_or_else(|| "human".to_string());

    let patterns = if cli_patterns.is_empty() {
        cfg.patterns.unwrap_or_default()
    } else {
        cli_patterns.to_vec()
    };

    let write = cli_write
        .or_else(|| cfg.format.as_ref().and_then(|f| f.write))
        .unwrap_or(false);
    let diff = cli_diff
        .or_else(|| cfg.format.as_ref().and_then(|f| f.diff))
        .unwrap_or(false);
    let check = cli_check
        .or_else(|| cfg.format.as_ref().and_then(|f| f.check))
        .unwrap_or(false);

    Ok(Effective {
        repo_root,
        config_found,
        language,
        output,
        patterns,
        write,
        diff,
        check,
        rules: cfg.rules.unwrap_or_default(),
    })
}
