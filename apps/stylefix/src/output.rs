//! Output rendering for check, format, and languages commands.
//!
//! Supports `human` (default) and `json` outputs. The JSON form includes
//! per-item fields and a top-level summary.

use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;

use crate::error::StyleError;
use crate::format::FormatResult;
use crate::models::{CheckReport, Language, Severity};
use crate::utils::error_prefix;

fn use_colors(output: &str) -> bool {
    output != "json" && crate::utils::use_colors()
}

fn pretty(v: &JsonVal) -> String {
    serde_json::to_string_pretty(v).unwrap_or_else(|_| v.to_string())
}

fn print_errors(errors: &[StyleError]) {
    for e in errors {
        eprintln!("{} {}", error_prefix(), e);
    }
}

/// Print check results in the requested format.
pub fn print_check(res: &CheckReport, output: &str, errors: &[StyleError]) {
    match output {
        "json" => println!("{}", pretty(&compose_check_json(res, errors))),
        _ => {
            let color = use_colors(output);
            for row in &res.issues {
                let severity = row.issue.severity;
                let label = format!("⟦{}⟧", severity.label());
                let icon = severity_icon(severity);
                let (icon, sev) = if color {
                    match severity {
                        Severity::High => (icon.red().to_string(), label.red().bold().to_string()),
                        Severity::Medium => (icon.yellow().to_string(), label.yellow().bold().to_string()),
                        Severity::Low => (icon.blue().to_string(), label.blue().bold().to_string()),
                    }
                } else {
                    (icon.to_string(), label)
                };
                let place = format!("{}:{}", row.file, row.line);
                let place = if color { place.bold().to_string() } else { place };
                println!(
                    "{} {} {} ❲{}❳ {}",
                    icon, sev, place, row.issue.kind, row.issue.description
                );
            }
            print_errors(errors);
            let summary = format!(
                "Summary: high={} medium={} low={} files={}",
                res.summary.high, res.summary.medium, res.summary.low, res.summary.files
            );
            if color {
                println!("{}", summary.bold());
            } else {
                println!("{}", summary);
            }
        }
    }
}

fn severity_icon(severity: Severity) -> &'static str {
    match severity {
        Severity::High => "✖",
        Severity::Medium => "▲",
        Severity::Low => "◆",
    }
}

/// Print formatting results. When `write` is false, previews and diffs
/// can be emitted; otherwise only file statuses are shown.
pub fn print_format(
    results: &[FormatResult],
    output: &str,
    write: bool,
    diff: bool,
    errors: &[StyleError],
) {
    match output {
        "json" => println!("{}", pretty(&compose_format_json(results, write, diff, errors))),
        _ => {
            let color = use_colors(output);
            for r in results {
                let stats = format!(
                    "({}, issues={}, fixes={}, score={:.1})",
                    r.language, r.issues, r.fixes_applied, r.score
                );
                if write {
                    if r.wrote {
                        if color {
                            println!("{} {} {}", "formatted:".green().bold(), r.file.bold(), stats);
                        } else {
                            println!("formatted: {} {}", r.file, stats);
                        }
                    }
                } else if r.changed {
                    let body = if diff {
                        build_naive_diff(r.original.as_deref(), r.preview.as_deref())
                    } else {
                        None
                    }
                    .or_else(|| r.preview.clone());
                    let header = if color {
                        format!("{} {} {}", "---".cyan().bold(), r.file.bold(), stats)
                    } else {
                        format!("--- {} {}", r.file, stats)
                    };
                    match body {
                        Some(b) => println!("{}\n{}", header, b),
                        None => println!("{}", header),
                    }
                } else if color {
                    println!("{} {}", "no changes:".bright_black(), r.file);
                } else {
                    println!("no changes: {}", r.file);
                }
            }
            print_errors(errors);
        }
    }
}

/// Print the language table.
pub fn print_languages(output: &str) {
    match output {
        "json" => println!("{}", pretty(&compose_languages_json())),
        _ => {
            let color = use_colors(output);
            for lang in Language::ALL {
                let exts = lang.extensions().map(|e| format!(".{}", e)).collect::<Vec<_>>().join(" ");
                if color {
                    println!("{:<8} {}", lang.name().bold(), exts);
                } else {
                    println!("{:<8} {}", lang.name(), exts);
                }
            }
        }
    }
}

/// Line-level diff: common prefix and suffix are skipped.
pub fn build_naive_diff(old: Option<&str>, new: Option<&str>) -> Option<String> {
    let old = old?;
    let new = new?;
    let a: Vec<&str> = old.lines().collect();
    let b: Vec<&str> = new.lines().collect();
    let head = a.iter().zip(&b).take_while(|(x, y)| x == y).count();
    let tail = a[head..]
        .iter()
        .rev()
        .zip(b[head..].iter().rev())
        .take_while(|(x, y)| x == y)
        .count();
    let mut out = format!("@@ -{} +{} @@\n", head + 1, head + 1);
    for line in &a[head..a.len() - tail] {
        out.push('-');
        out.push_str(line);
        out.push('\n');
    }
    for line in &b[head..b.len() - tail] {
        out.push('+');
        out.push_str(line);
        out.push('\n');
    }
    Some(out)
}

fn errors_json(errors: &[StyleError]) -> Vec<String> {
    errors.iter().map(|e| e.to_string()).collect()
}

/// Compose check JSON object (pure) for testing/snapshot purposes.
pub fn compose_check_json(res: &CheckReport, errors: &[StyleError]) -> JsonVal {
    let mut v = serde_json::to_value(res).unwrap_or_else(|_| json!({}));
    if let Some(obj) = v.as_object_mut() {
        obj.insert("errors".into(), json!(errors_json(errors)));
    }
    v
}

/// Compose format JSON object (pure) for testing/snapshot purposes.
pub fn compose_format_json(
    results: &[FormatResult],
    write: bool,
    diff: bool,
    errors: &[StyleError],
) -> JsonVal {
    let items: Vec<_> = results
        .iter()
        .map(|r| {
            json!({
                "file": r.file,
                "language": r.language,
                "changed": r.changed,
                "wrote": r.wrote,
                "issues": r.issues,
                "fixes_applied": r.fixes_applied,
                "score": r.score,
                "preview": if !write { r.preview.as_ref() } else { None },
                "diff": if diff && !write { build_naive_diff(r.original.as_deref(), r.preview.as_deref()) } else { None }
            })
        })
        .collect();
    let summary = json!({
        "changed": results.iter().filter(|r| r.changed).count(),
        "total": results.len(),
        "wrote": results.iter().filter(|r| r.wrote).count(),
        "issues": results.iter().map(|r| r.issues).sum::<usize>(),
        "fixes_applied": results.iter().map(|r| r.fixes_applied).sum::<usize>(),
    });
    json!({"results": items, "summary": summary, "errors": errors_json(errors)})
}

/// Compose the language table as JSON.
pub fn compose_languages_json() -> JsonVal {
    let items: Vec<_> = Language::ALL
        .iter()
        .map(|l| json!({"language": l, "extensions": l.extensions().collect::<Vec<_>>()}))
        .collect();
    json!({ "languages": items })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Issue, IssueKind, IssueRow, Location, Summary};

    fn result(file: &str, changed: bool) -> FormatResult {
        FormatResult {
            file: file.into(),
            language: Language::Java,
            score: if changed { 50.0 } else { 100.0 },
            issues: if changed { 2 } else { 0 },
            fixes_applied: if changed { 1 } else { 0 },
            changed,
            wrote: false,
            preview: changed.then(|| "int x = 1;\n".to_string()),
            original: changed.then(|| "int x=1;\n".to_string()),
        }
    }

    #[test]
    fn test_compose_format_json_write_and_preview_diff() {
        let results = vec![result("A.java", true), result("B.java", false)];
        // Case: write=false, diff=true ⇒ previews and diffs present for changed item
        let out = compose_format_json(&results, false, true, &[]);
        assert_eq!(out["summary"]["changed"], 1);
        assert_eq!(out["summary"]["wrote"], 0);
        assert_eq!(out["summary"]["issues"], 2);
        assert_eq!(out["results"][0]["language"], "java");
        assert_eq!(out["results"][0]["score"], 50.0);
        assert!(out["results"][0]["preview"].is_string());
        assert!(out["results"][0]["diff"].is_string());
        assert!(out["results"][1]["preview"].is_null());
        // Case: write=true ⇒ no preview/diff
        let mut written = results.clone();
        written[0].wrote = true;
        let out2 = compose_format_json(&written, true, false, &[]);
        assert_eq!(out2["summary"]["wrote"], 1);
        assert!(out2["results"][0]["preview"].is_null());
        assert!(out2["results"][0]["diff"].is_null());
    }

    #[test]
    fn test_compose_check_json_shape() {
        let issue = Issue::note(IssueKind::ClassNaming, Location::Token(1), "bad", Severity::High);
        let mut summary = Summary { files: 1, ..Summary::default() };
        summary.count(Severity::High);
        let res = CheckReport {
            issues: vec![IssueRow { file: "a.py".into(), line: 3, issue }],
            summary,
        };
        let errs = vec![StyleError::UnknownLanguage("cobol".into())];
        let out = compose_check_json(&res, &errs);
        assert_eq!(out["summary"]["high"], 1);
        assert_eq!(out["issues"][0]["file"], "a.py");
        assert_eq!(out["issues"][0]["line"], 3);
        assert_eq!(out["issues"][0]["kind"], "class_naming");
        assert!(out["errors"][0].as_str().unwrap().contains("cobol"));
    }

    #[test]
    fn test_naive_diff_shows_changed_lines_only() {
        let d = build_naive_diff(Some("a\nb=1\nc\n"), Some("a\nb = 1\nc\n")).unwrap();
        assert_eq!(d, "@@ -2 +2 @@\n-b=1\n+b = 1\n");
        assert!(build_naive_diff(None, Some("x")).is_none());
    }

    #[test]
    fn test_languages_json_lists_extensions() {
        let out = compose_languages_json();
        assert_eq!(out["languages"][0]["language"], "java");
        assert_eq!(out["languages"][1]["extensions"][0], "py");
        assert_eq!(out["languages"][2]["extensions"].as_array().unwrap().len(), 6);
    }
}
