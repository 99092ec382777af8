//! CLI argument parsing via `clap`.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "stylefix",
    version,
    about = "Rule-based style checker and auto-fixer for Java, Python and C++",
    long_about = "Stylefix: detect style violations in Java, Python and C++ sources and rewrite them mechanically.\n\nConfiguration precedence: CLI > stylefix.toml > defaults.",
    after_help = "Examples:\n  stylefix check 'src/**/*.java'\n  stylefix format app.py --diff\n  stylefix format 'lib/**/*.cpp' --write\n  stylefix languages --output json",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[arg(short, long, global = true, action = clap::ArgAction::Count, help = "Increase log verbosity (-v info, -vv debug, -vvv trace)")]
    pub verbose: u8,
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
/// Supported subcommands for checking, formatting, and listing languages.
pub enum Commands {
    /// Show version
    #[command(
        about = "Show version",
        long_about = "Print the current stylefix version."
    )]
    Version,
    /// Report style issues without changing files
    #[command(
        about = "Run style checks",
        long_about = "Detect style issues in the matched files. High-severity issues contribute to CI exits.",
        after_help = "Examples:\n  stylefix check 'src/**/*.java'\n  stylefix check app.py --output json"
    )]
    Check {
        #[arg(help = "Files or glob patterns, relative to the repo root (default: config patterns)")]
        paths: Vec<String>,
        #[arg(long, help = "Repository root (default: current dir)")]
        repo_root: Option<String>,
        #[arg(long, help = "Source language: auto|java|python|cpp (default: auto)")]
        language: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
    },
    /// Detect and fix style issues
    #[command(
        about = "Apply style fixes",
        long_about = "Detect issues, apply mechanical fixes and the language cleanup pass. When --diff or --check is set, write is disabled.",
        after_help = "Examples:\n  stylefix format app.py --diff\n  stylefix format 'src/**/*.cpp' --write\n  stylefix format --check"
    )]
    Format {
        #[arg(help = "Files or glob patterns, relative to the repo root (default: config patterns)")]
        paths: Vec<String>,
        #[arg(long, help = "Repository root (default: current dir)")]
        repo_root: Option<String>,
        #[arg(long, help = "Source language: auto|java|python|cpp (default: auto)")]
        language: Option<String>,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Write changes to files")]
        write: bool,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Show diffs for changed files (implies write=false)")]
        diff: bool,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Exit non-zero if changes would occur (implies write=false)")]
        check: bool,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
    },
    /// List supported languages and their file extensions
    #[command(
        about = "List languages",
        long_about = "Print the languages stylefix understands and the extensions mapped to each."
    )]
    Languages {
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
    },
}
