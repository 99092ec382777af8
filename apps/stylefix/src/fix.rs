//! Pattern-substitution fixes.
//!
//! Issues carrying an `old_pattern`/`new_pattern` pair are rewritten into the
//! text in a fixed phase order, after which the language cleanup pass
//! re-derives spacing and indentation for the whole file. A fix that cannot
//! find its pattern any more is skipped, never raised: earlier fixes rewrite
//! overlapping text all the time.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::cleanup;
use crate::models::{Issue, IssueKind, Language, RuleSet};
use crate::tokenizer::Tokenizer;

/// Chars inspected on each side of an existing `new_pattern`.
const CONTEXT_WINDOW: usize = 20;

/// Fix phases with the phases each one relies on having run first.
const FIX_PHASES: &[(IssueKind, &[IssueKind])] = {
    use IssueKind::*;
    &[
        // pattern is the header as written, before any other phase edits it
        (InlineBlockBody, &[]),
        (MissingSpaceAfterKeyword, &[]),
        (MissingSpaceAfterElse, &[MissingSpaceAfterKeyword]),
        (MissingSpaceBeforeBraceAfterElse, &[MissingSpaceAfterElse]),
        (ExtraSpaceAfterOpeningBrace, &[]),
        (MissingSpacesAroundOperator, &[MissingSpaceAfterKeyword]),
        (ArrayDeclaration, &[MissingSpacesAroundOperator]),
        (
            MissingSpaceBeforeClassBrace,
            &[MissingSpaceBeforeBraceAfterElse, ExtraSpaceAfterOpeningBrace],
        ),
        (MissingSpaceAfterOpeningBrace, &[MissingSpaceBeforeClassBrace]),
        (MissingSpaceBeforeMethodBrace, &[MissingSpaceAfterOpeningBrace]),
        (MissingSpaceAfterComma, &[MissingSpacesAroundOperator]),
        (MissingSpaceAfterSemicolon, &[MissingSpaceAfterComma]),
        (ExtraSpaceBeforeComma, &[MissingSpaceAfterComma]),
        (ExtraSpaceBeforeSemicolon, &[MissingSpaceAfterSemicolon]),
        (ExtraSpaceBeforeParen, &[MissingSpaceAfterKeyword]),
        (MissingSpaceAfterColon, &[]),
        (AnnotationSpacing, &[]),
    ]
};

const COMPOUND_OPERATORS: &[&str] = &["+=", "-=", "*=", "/=", "%=", "==", "!=", "&&", "||"];

/// Phase order: prerequisites first, declaration order between independent phases.
pub fn apply_order() -> Vec<IssueKind> {
    let mut done: HashSet<IssueKind> = HashSet::new();
    let mut order = Vec::with_capacity(FIX_PHASES.len());
    while order.len() < FIX_PHASES.len() {
        let next = FIX_PHASES
            .iter()
            .find(|(kind, deps)| !done.contains(kind) && deps.iter().all(|d| done.contains(d)));
        match next {
            Some((kind, _)) => {
                done.insert(*kind);
                order.push(*kind);
            }
            None => {
                // cycle: keep the remaining phases in declaration order
                for (kind, _) in FIX_PHASES {
                    if done.insert(*kind) {
                        order.push(*kind);
                    }
                }
            }
        }
    }
    order
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("pattern not found")]
    PatternNotFound,
    #[error("already fixed")]
    AlreadyFixed,
    #[error("ambiguous brace pattern")]
    AmbiguousBrace,
    #[error("missing pattern")]
    MissingPattern,
    #[error("fix failed: {0}")]
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixOutcome {
    Applied(String),
    Skipped(SkipReason),
}

/// One fix that changed the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedFix {
    pub kind: IssueKind,
    pub old_pattern: String,
    pub new_pattern: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strategy {
    Keyword,
    Brace,
    Operator,
    ArrayDeclaration,
    Semicolon,
    Generic,
}

fn strategy(kind: IssueKind) -> Strategy {
    use IssueKind::*;
    match kind {
        MissingSpaceAfterKeyword | MissingSpaceAfterElse | MissingSpaceBeforeBraceAfterElse => {
            Strategy::Keyword
        }
        MissingSpaceBeforeClassBrace | MissingSpaceAfterOpeningBrace | MissingSpaceBeforeMethodBrace => {
            Strategy::Brace
        }
        MissingSpacesAroundOperator => Strategy::Operator,
        ArrayDeclaration => Strategy::ArrayDeclaration,
        MissingSpaceAfterSemicolon => Strategy::Semicolon,
        _ => Strategy::Generic,
    }
}

pub struct Fixer<'a> {
    tokenizer: &'a Tokenizer,
    rules: &'a RuleSet,
    applied: Vec<AppliedFix>,
}

impl<'a> Fixer<'a> {
    pub fn new(tokenizer: &'a Tokenizer, rules: &'a RuleSet) -> Self {
        Fixer {
            tokenizer,
            rules,
            applied: Vec::new(),
        }
    }

    pub fn language(&self) -> Language {
        self.tokenizer.language()
    }

    /// Fixes applied by the last `apply` call.
    pub fn applied(&self) -> &[AppliedFix] {
        &self.applied
    }

    /// Pattern fixes followed by the language cleanup pass.
    ///
    /// Text without issues is returned untouched.
    pub fn apply(&mut self, text: &str, issues: &[Issue]) -> String {
        if issues.is_empty() {
            self.applied.clear();
            return text.to_string();
        }
        let patched = self.apply_patterns(text, issues);
        cleanup::run(self.tokenizer, self.rules, &patched)
    }

    /// The ordered pattern phase alone.
    pub fn apply_patterns(&mut self, text: &str, issues: &[Issue]) -> String {
        self.applied.clear();
        let language = self.language();
        let candidates = unique_patterns(
            issues
                .iter()
                .filter(|is| language != Language::Python || !is_colon_operator_fix(is)),
        );

        let mut by_kind: HashMap<IssueKind, Vec<&Issue>> = HashMap::new();
        for issue in candidates {
            by_kind.entry(issue.kind).or_default().push(issue);
        }

        let mut current = text.to_string();
        for kind in apply_order() {
            let Some(bucket) = by_kind.get(&kind) else {
                continue;
            };
            for issue in bucket {
                match attempt(&current, issue) {
                    FixOutcome::Applied(next) => {
                        tracing::trace!(kind = %issue.kind, old = ?issue.old_pattern, "fix applied");
                        current = next;
                        self.applied.push(AppliedFix {
                            kind: issue.kind,
                            old_pattern: issue.old_pattern.clone().unwrap_or_default(),
                            new_pattern: issue.new_pattern.clone().unwrap_or_default(),
                        });
                    }
                    FixOutcome::Skipped(reason) => {
                        tracing::trace!(kind = %issue.kind, old = ?issue.old_pattern, %reason, "fix skipped");
                    }
                }
            }
        }
        tracing::debug!(%language, issues = issues.len(), applied = self.applied.len(), "pattern fixes done");
        current
    }
}

/// Colons are spaced by the Python cleanup pass only.
fn is_colon_operator_fix(issue: &Issue) -> bool {
    issue.kind == IssueKind::MissingSpacesAroundOperator
        && (issue.tokens.get(1).is_some_and(|t| t == ":")
            || issue.new_pattern.as_deref().is_some_and(|n| n.contains(" : ")))
}

/// First issue per (old, new) pair, empty patterns dropped.
fn unique_patterns<'i>(issues: impl Iterator<Item = &'i Issue>) -> Vec<&'i Issue> {
    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    issues
        .filter(|is| is.is_fixable())
        .filter(|is| {
            let old = is.old_pattern.as_deref().unwrap_or("");
            let new = is.new_pattern.as_deref().unwrap_or("");
            !new.is_empty() && seen.insert((old, new))
        })
        .collect()
}

/// Try one issue against the current text.
pub fn attempt(text: &str, issue: &Issue) -> FixOutcome {
    let (Some(old), Some(new)) = (issue.old_pattern.as_deref(), issue.new_pattern.as_deref()) else {
        return FixOutcome::Skipped(SkipReason::MissingPattern);
    };
    if old.is_empty() || new.is_empty() {
        return FixOutcome::Skipped(SkipReason::MissingPattern);
    }
    if already_fixed(text, old, new) {
        return FixOutcome::Skipped(SkipReason::AlreadyFixed);
    }
    match strategy(issue.kind) {
        Strategy::Keyword => replace_first(text, old, new),
        Strategy::Brace => brace_fix(text, old, new),
        Strategy::Operator => operator_fix(text, old, new),
        Strategy::ArrayDeclaration => array_fix(text, issue),
        Strategy::Semicolon => semicolon_fix(text, old, new),
        Strategy::Generic => generic_fix(text, old, new),
    }
}

fn floor_boundary(text: &str, mut at: usize) -> usize {
    while at > 0 && !text.is_char_boundary(at) {
        at -= 1;
    }
    at
}

fn ceil_boundary(text: &str, mut at: usize) -> usize {
    at = at.min(text.len());
    while at < text.len() && !text.is_char_boundary(at) {
        at += 1;
    }
    at
}

/// `new` is present and the text around its first occurrence has no `old` left.
fn already_fixed(text: &str, old: &str, new: &str) -> bool {
    let Some(at) = text.find(new) else {
        return false;
    };
    let start = floor_boundary(text, at.saturating_sub(CONTEXT_WINDOW));
    let end = ceil_boundary(text, at + new.len() + CONTEXT_WINDOW);
    !text[start..end].contains(old)
}

fn replace_first(text: &str, old: &str, new: &str) -> FixOutcome {
    if text.contains(old) {
        FixOutcome::Applied(text.replacen(old, new, 1))
    } else {
        FixOutcome::Skipped(SkipReason::PatternNotFound)
    }
}

fn brace_fix(text: &str, old: &str, new: &str) -> FixOutcome {
    match text.matches(old).count() {
        0 => FixOutcome::Skipped(SkipReason::PatternNotFound),
        1 => FixOutcome::Applied(text.replacen(old, new, 1)),
        _ => {
            let mut lines: Vec<String> = text.split('\n').map(str::to_string).collect();
            match lines.iter().position(|l| l.contains(old) && !l.contains(new)) {
                Some(n) => {
                    lines[n] = lines[n].replacen(old, new, 1);
                    FixOutcome::Applied(lines.join("\n"))
                }
                None => FixOutcome::Skipped(SkipReason::AmbiguousBrace),
            }
        }
    }
}

fn operator_fix(text: &str, old: &str, new: &str) -> FixOutcome {
    let mut repaired = text.to_string();
    for op in COMPOUND_OPERATORS {
        if old.contains(op) && new.contains(op) {
            let mut chars = op.chars();
            let (Some(a), Some(b)) = (chars.next(), chars.next()) else {
                continue;
            };
            repaired = repaired.replace(&format!("{a} {b}"), op);
            break;
        }
    }
    match replace_first(&repaired, old, new) {
        FixOutcome::Skipped(_) => generic_fix(&repaired, old, new),
        applied => applied,
    }
}

fn array_fix(text: &str, issue: &Issue) -> FixOutcome {
    let [ty, name, ..] = issue.tokens.as_slice() else {
        return FixOutcome::Skipped(SkipReason::Failed(format!(
            "array fix needs type and name tokens, got {}",
            issue.tokens.len()
        )));
    };
    let target = format!("{ty}[] {name}");
    for candidate in [format!("{ty} {name}[]"), format!("{ty} {name} []")] {
        if text.contains(&candidate) {
            return FixOutcome::Applied(text.replacen(&candidate, &target, 1));
        }
    }
    FixOutcome::Skipped(SkipReason::PatternNotFound)
}

fn semicolon_fix(text: &str, old: &str, new: &str) -> FixOutcome {
    if text.contains(old) {
        return FixOutcome::Applied(text.replace(old, new));
    }
    if let Some((before, after)) = old.split_once(';').filter(|(_, a)| !a.contains(';')) {
        for alt in [
            format!("{before} ;{after}"),
            format!("{before} ; {after}"),
        ] {
            if text.contains(&alt) {
                return FixOutcome::Applied(text.replace(&alt, new));
            }
        }
    }
    FixOutcome::Skipped(SkipReason::PatternNotFound)
}

fn alternatives(old: &str) -> Vec<String> {
    let mut alts = Vec::new();
    if let Some(base) = old.strip_suffix('{') {
        alts.push(format!("{base} {{"));
        alts.push(format!("{base}{{ "));
    }
    if old.contains('=') && !old.contains(" = ") {
        if let Some((left, right)) = old.split_once('=').filter(|(_, r)| !r.contains('=')) {
            alts.push(format!("{left}= {right}"));
            alts.push(format!("{left} ={right}"));
        }
    }
    alts
}

fn generic_fix(text: &str, old: &str, new: &str) -> FixOutcome {
    if text.contains(old) {
        return FixOutcome::Applied(text.replacen(old, new, 1));
    }
    for alt in alternatives(old) {
        if text.contains(&alt) {
            return FixOutcome::Applied(text.replacen(&alt, new, 1));
        }
    }
    FixOutcome::Skipped(SkipReason::PatternNotFound)
}
