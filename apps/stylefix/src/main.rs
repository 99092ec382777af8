//! Stylefix CLI binary entry point.
//! Delegates to library modules for check/format and prints results.

use clap::Parser;
use stylefix::cli::{Cli, Commands};
use stylefix::config::{self, Effective};
use stylefix::error::StyleError;
use stylefix::models::Severity;
use stylefix::{format, lint, logging, output, utils};

fn fail(err: StyleError) -> ! {
    eprintln!("{} {}", utils::error_prefix(), err);
    std::process::exit(2);
}

/// Resolve inputs for a command, exiting with a friendly message when none match.
fn targets(eff: &Effective) -> Vec<std::path::PathBuf> {
    if !eff.config_found && eff.output != "json" {
        eprintln!(
            "{} {}",
            utils::note_prefix(),
            "No stylefix.toml found; using defaults."
        );
    }
    if eff.patterns.is_empty() && eff.output != "json" {
        eprintln!(
            "{} {}",
            utils::info_prefix(),
            "No paths given; scanning every supported source file under the repo root."
        );
    }
    let found = utils::collect_targets(&eff.repo_root, &eff.patterns).unwrap_or_else(|e| fail(e));
    if found.is_empty() {
        eprintln!(
            "{} {}",
            utils::error_prefix(),
            format!("No files matched under {}", eff.repo_root.to_string_lossy())
        );
        std::process::exit(2);
    }
    found
}

fn main() {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Languages { output } => {
            output::print_languages(output.as_deref().unwrap_or("human"));
        }
        Commands::Check {
            paths,
            repo_root,
            language,
            output,
        } => {
            let eff = config::resolve_effective(
                repo_root.as_deref(),
                language.as_deref(),
                output.as_deref(),
                &paths,
                None,
                None,
                None,
            )
            .unwrap_or_else(|e| fail(e));
            let files = targets(&eff);
            let (report, errors) = lint::run_check(&eff, &files);
            output::print_check(&report, &eff.output, &errors);
            if !errors.is_empty() {
                std::process::exit(2);
            }
            if report.issues.iter().any(|r| r.issue.severity == Severity::High) {
                std::process::exit(1);
            }
        }
        Commands::Format {
            paths,
            repo_root,
            language,
            write,
            diff,
            check,
            output,
        } => {
            let eff = config::resolve_effective(
                repo_root.as_deref(),
                language.as_deref(),
                output.as_deref(),
                &paths,
                if write { Some(true) } else { None },
                if diff { Some(true) } else { None },
                if check { Some(true) } else { None },
            )
            .unwrap_or_else(|e| fail(e));
            // CLI/config precedence at runtime:
            // - If diff or check is enabled, force write=false for this run.
            // - Otherwise respect write.
            let eff_write = if eff.diff || eff.check { false } else { eff.write };
            let files = targets(&eff);
            let (results, errors) =
                format::run_format(&eff, &files, eff_write, !eff_write).unwrap_or_else(|e| fail(e));
            output::print_format(&results, &eff.output, eff_write, eff.diff, &errors);
            if !errors.is_empty() {
                std::process::exit(2);
            }
            if eff.check && results.iter().any(|r| r.changed) {
                std::process::exit(1);
            }
        }
    }
}
