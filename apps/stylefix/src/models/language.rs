//! Supported languages and the extension lookup table.

use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::StyleError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Java,
    Python,
    Cpp,
}

/// Extension (without dot) to language.
pub const EXTENSIONS: &[(&str, Language)] = &[
    ("java", Language::Java),
    ("py", Language::Python),
    ("pyw", Language::Python),
    ("cpp", Language::Cpp),
    ("cc", Language::Cpp),
    ("cxx", Language::Cpp),
    ("c", Language::Cpp),
    ("h", Language::Cpp),
    ("hpp", Language::Cpp),
];

impl Language {
    pub const ALL: [Language; 3] = [Language::Java, Language::Python, Language::Cpp];

    pub fn name(self) -> &'static str {
        match self {
            Language::Java => "java",
            Language::Python => "python",
            Language::Cpp => "cpp",
        }
    }

    /// Indentation-significant languages get the block re-indentation cleanup.
    pub fn is_indent_significant(self) -> bool {
        matches!(self, Language::Python)
    }

    pub fn from_path(path: &Path) -> Option<Language> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        EXTENSIONS
            .iter()
            .find(|(e, _)| *e == ext)
            .map(|(_, lang)| *lang)
    }

    pub fn extensions(self) -> impl Iterator<Item = &'static str> {
        EXTENSIONS
            .iter()
            .filter(move |(_, l)| *l == self)
            .map(|(e, _)| *e)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "java" => Ok(Language::Java),
            "python" | "py" => Ok(Language::Python),
            "cpp" | "c++" | "cxx" => Ok(Language::Cpp),
            other => Err(StyleError::UnknownLanguage(other.to_string())),
        }
    }
}

/// `auto` or an explicit language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LanguageChoice {
    #[default]
    Auto,
    Fixed(Language),
}

impl LanguageChoice {
    pub fn parse(s: &str) -> Result<Self, StyleError> {
        if s.trim().eq_ignore_ascii_case("auto") {
            Ok(LanguageChoice::Auto)
        } else {
            s.parse().map(LanguageChoice::Fixed)
        }
    }

    /// Resolve for a file. Unknown extensions fall back to Java.
    pub fn resolve(self, path: &Path) -> Language {
        match self {
            LanguageChoice::Fixed(lang) => lang,
            LanguageChoice::Auto => Language::from_path(path).unwrap_or_else(|| {
                tracing::warn!(path = %path.display(), "unknown extension, assuming java");
                Language::Java
            }),
        }
    }
}
