//! Stylefix core library.
//!
//! This crate exposes programmatic APIs for detecting and fixing style
//! issues in Java, Python and C++ sources.
//!
//! High-level modules:
//! - `tokenizer`: Typed, span-carrying tokens per language.
//! - `shape`: Token-shape analysis shared by checks and cleanup.
//! - `checks`: Issue detection (generic, line, and per-language checks).
//! - `fix`: Ordered pattern fixes with explicit skip reasons.
//! - `cleanup`: Whole-file respacing and Python block re-indentation.
//! - `engine`: The per-file pipeline and score.
//! - `lint` / `format`: Multi-file runners used by the binary.
//! - `cli`, `config`, `output`, `logging`, `utils`: Binary support.
//! - `models`: Issues, languages, rule tables and report structs.
//! - `error`: The library error type.
pub mod checks;
pub mod cleanup;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod fix;
pub mod format;
pub mod lint;
pub mod logging;
pub mod models;
pub mod output;
pub mod shape;
pub mod tokenizer;
pub mod utils;

pub use engine::{FormatOutcome, Formatter};
pub use error::{Result, StyleError};
pub use models::{Issue, IssueKind, Language, Severity};
