//! Shared data models: issues, rule tables, languages and report structs.

pub mod language;
pub mod rules;

pub use language::{Language, LanguageChoice};
pub use rules::RuleSet;

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn label(self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    MissingSpacesAroundOperator,
    ExtraSpaceBeforeColon,
    MissingSpaceAfterColon,
    MissingSpaceAfterComma,
    ExtraSpaceBeforeComma,
    ExtraSpaceAfterOpeningParen,
    ExtraSpaceBeforeClosingParen,
    ExtraSpaceAfterOpeningBrace,
    MissingSpaceAfterSemicolon,
    ExtraSpaceBeforeSemicolon,
    ExtraSpaceBeforeParen,
    MissingSpaceAfterKeyword,
    MissingSpaceAfterElse,
    MissingSpaceBeforeBraceAfterElse,
    MissingSpaceBeforeClassBrace,
    MissingSpaceBeforeMethodBrace,
    MissingSpaceAfterOpeningBrace,
    ConsecutiveBlankLines,
    TrailingWhitespace,
    LineTooLong,
    IndentationNotMultiple,
    TabIndentation,
    ClassNaming,
    FunctionNaming,
    MethodNaming,
    ImportOrder,
    WildcardImport,
    PackageNaming,
    IncludeOrder,
    IncludeGuard,
    ModifierOrder,
    ArrayDeclaration,
    PointerSpacing,
    PreferSingleQuotes,
    InlineBlockBody,
    ImportSpacing,
    AnnotationSpacing,
    NamespaceBrace,
}

impl IssueKind {
    /// Stable rule id, identical to the serialized form.
    pub fn code(self) -> &'static str {
        use IssueKind::*;
        match self {
            MissingSpacesAroundOperator => "missing_spaces_around_operator",
            ExtraSpaceBeforeColon => "extra_space_before_colon",
            MissingSpaceAfterColon => "missing_space_after_colon",
            MissingSpaceAfterComma => "missing_space_after_comma",
            ExtraSpaceBeforeComma => "extra_space_before_comma",
            ExtraSpaceAfterOpeningParen => "extra_space_after_opening_paren",
            ExtraSpaceBeforeClosingParen => "extra_space_before_closing_paren",
            ExtraSpaceAfterOpeningBrace => "extra_space_after_opening_brace",
            MissingSpaceAfterSemicolon => "missing_space_after_semicolon",
            ExtraSpaceBeforeSemicolon => "extra_space_before_semicolon",
            ExtraSpaceBeforeParen => "extra_space_before_paren",
            MissingSpaceAfterKeyword => "missing_space_after_keyword",
            MissingSpaceAfterElse => "missing_space_after_else",
            MissingSpaceBeforeBraceAfterElse => "missing_space_before_brace_after_else",
            MissingSpaceBeforeClassBrace => "missing_space_before_class_brace",
            MissingSpaceBeforeMethodBrace => "missing_space_before_method_brace",
            MissingSpaceAfterOpeningBrace => "missing_space_after_opening_brace",
            ConsecutiveBlankLines => "consecutive_blank_lines",
            TrailingWhitespace => "trailing_whitespace",
            LineTooLong => "line_too_long",
            IndentationNotMultiple => "indentation_not_multiple",
            TabIndentation => "tab_indentation",
            ClassNaming => "class_naming",
            FunctionNaming => "function_naming",
            MethodNaming => "method_naming",
            ImportOrder => "import_order",
            WildcardImport => "wildcard_import",
            PackageNaming => "package_naming",
            IncludeOrder => "include_order",
            IncludeGuard => "include_guard",
            ModifierOrder => "modifier_order",
            ArrayDeclaration => "array_declaration",
            PointerSpacing => "pointer_spacing",
            PreferSingleQuotes => "prefer_single_quotes",
            InlineBlockBody => "inline_block_body",
            ImportSpacing => "import_spacing",
            AnnotationSpacing => "annotation_spacing",
            NamespaceBrace => "namespace_brace",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Where an issue was found: a token index or a 1-based line, never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    Token(usize),
    Line(usize),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    pub kind: IssueKind,
    pub location: Location,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_pattern: Option<String>,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
    /// Lexemes the issue was built from, in source order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tokens: Vec<String>,
}

impl Issue {
    /// Token-anchored issue carrying a mechanical fix.
    pub fn fixable(
        kind: IssueKind,
        position: usize,
        description: impl Into<String>,
        old: impl Into<String>,
        new: impl Into<String>,
        severity: Severity,
    ) -> Issue {
        Issue {
            kind,
            location: Location::Token(position),
            description: description.into(),
            old_pattern: Some(old.into()),
            new_pattern: Some(new.into()),
            severity,
            language: None,
            tokens: Vec::new(),
        }
    }

    /// Informational issue without a fix pattern.
    pub fn note(
        kind: IssueKind,
        location: Location,
        description: impl Into<String>,
        severity: Severity,
    ) -> Issue {
        Issue {
            kind,
            location,
            description: description.into(),
            old_pattern: None,
            new_pattern: None,
            severity,
            language: None,
            tokens: Vec::new(),
        }
    }

    pub fn with_tokens<'a>(mut self, tokens: impl IntoIterator<Item = &'a str>) -> Issue {
        self.tokens = tokens.into_iter().map(str::to_string).collect();
        self
    }

    pub fn in_language(mut self, language: Language) -> Issue {
        self.language = Some(language);
        self
    }

    pub fn is_fixable(&self) -> bool {
        matches!(
            (&self.old_pattern, &self.new_pattern),
            (Some(old), Some(_)) if !old.is_empty()
        )
    }
}

#[derive(Debug, Clone, Serialize)]
/// One issue as reported for a file, with its resolved line.
pub struct IssueRow {
    pub file: String,
    pub line: usize,
    #[serde(flatten)]
    pub issue: Issue,
}

#[derive(Debug, Default, Clone, Serialize)]
/// Aggregated check summary used by printers.
pub struct Summary {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub files: usize,
}

impl Summary {
    pub fn count(&mut self, severity: Severity) {
        match severity {
            Severity::High => self.high += 1,
            Severity::Medium => self.medium += 1,
            Severity::Low => self.low += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.high + self.medium + self.low
    }
}

#[derive(Debug, Default, Clone, Serialize)]
/// Check results container.
pub struct CheckReport {
    pub issues: Vec<IssueRow>,
    pub summary: Summary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_serializes_snake_case_kind_and_location() {
        let issue = Issue::fixable(
            IssueKind::MissingSpaceAfterComma,
            3,
            "Missing space after comma",
            "a,b",
            "a, b",
            Severity::Low,
        )
        .in_language(Language::Java);
        let v = serde_json::to_value(&issue).unwrap();
        assert_eq!(v["kind"], "missing_space_after_comma");
        assert_eq!(v["location"]["token"], 3);
        assert_eq!(v["severity"], "low");
        assert_eq!(v["language"], "java");
        assert!(v.get("tokens").is_none());
        assert_eq!(IssueKind::MissingSpaceAfterComma.code(), "missing_space_after_comma");
    }

    #[test]
    fn test_note_is_not_fixable() {
        let note = Issue::note(
            IssueKind::LineTooLong,
            Location::Line(4),
            "Line too long",
            Severity::Low,
        );
        assert!(!note.is_fixable());
        assert!(Severity::High > Severity::Medium && Severity::Medium > Severity::Low);
    }

    #[test]
    fn test_summary_counts() {
        let mut s = Summary::default();
        s.count(Severity::High);
        s.count(Severity::Low);
        s.count(Severity::Low);
        assert_eq!((s.high, s.medium, s.low, s.total()), (1, 0, 2, 3));
    }
}
