//! Error types surfaced by the library.

use std::path::PathBuf;
use thiserror::Error;

/// Every fallible library operation returns this error.
#[derive(Debug, Error)]
pub enum StyleError {
    #[error("IO error for path '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error in '{path}': {message}")]
    Config { path: PathBuf, message: String },

    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Unknown language: {0} (expected java, python or cpp)")]
    UnknownLanguage(String),

    #[error("Invalid glob '{pattern}': {message}")]
    Glob { pattern: String, message: String },
}

impl StyleError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn invalid_pattern(pattern: &str, source: regex::Error) -> Self {
        Self::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, StyleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offending_input() {
        let err = StyleError::UnknownLanguage("cobol".into());
        assert!(err.to_string().contains("cobol"));

        let bad = regex::Regex::new("(").unwrap_err();
        let err = StyleError::invalid_pattern("(", bad);
        assert!(err.to_string().starts_with("Invalid pattern '('"));
    }
}
