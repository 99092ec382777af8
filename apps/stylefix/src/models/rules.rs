//! Per-language rule tables.
//!
//! A `RuleSet` is built once per language (defaults plus optional config
//! overrides) and shared read-only by every file processed in a run.

use serde::{Deserialize, Serialize};

use super::language::Language;

#[derive(Debug, Clone, Serialize)]
pub struct RuleSet {
    pub language: Language,
    pub indentation: IndentRules,
    pub braces: BraceRules,
    pub spacing: SpacingRules,
    pub naming: NamingRules,
    pub imports: ImportRules,
    pub line_length: usize,
    pub prefer_single_quotes: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndentRules {
    pub size: usize,
    pub use_tabs: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BracePlacement {
    SameLine,
    NextLine,
}

#[derive(Debug, Clone, Serialize)]
pub struct BraceRules {
    pub class: BracePlacement,
    pub method: BracePlacement,
    pub control: BracePlacement,
    /// C++ `namespace` blocks.
    pub namespace: BracePlacement,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpacingRules {
    /// Keywords that take one space before `(`.
    pub after_keywords: Vec<String>,
    /// Binary operators that take one space on each side.
    pub around_operators: Vec<String>,
    pub after_commas: bool,
    /// `int* p` rather than `int *p`.
    pub pointer_left: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct NamingRules {
    pub class: String,
    pub function: Option<String>,
    pub method: Option<String>,
    pub package: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportMatch {
    /// `java.util.List` belongs to group `java.`
    Prefix,
    /// `os.path` belongs to group member `os`
    RootModule,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportGroup {
    pub name: String,
    pub members: Vec<String>,
}

/// Ordered import groups. Anything unmatched lands in `fallback`, ranked last.
#[derive(Debug, Clone, Serialize)]
pub struct ImportRules {
    pub groups: Vec<ImportGroup>,
    pub fallback: String,
    pub matcher: ImportMatch,
}

impl ImportRules {
    pub fn rank(&self, module: &str) -> usize {
        let hit = |member: &String| match self.matcher {
            ImportMatch::Prefix => module.starts_with(member.as_str()),
            ImportMatch::RootModule => module.split('.').next() == Some(member.as_str()),
        };
        self.groups
            .iter()
            .position(|g| g.members.iter().any(hit))
            .unwrap_or(self.groups.len())
    }

    pub fn group_name(&self, rank: usize) -> &str {
        self.groups
            .get(rank)
            .map(|g| g.name.as_str())
            .unwrap_or(self.fallback.as_str())
    }
}

/// User-facing overrides loaded from `[rules.<language>]`.
#[derive(Debug, Default, Deserialize, Clone)]
pub struct RuleOverride {
    pub indent_size: Option<usize>,
    pub use_tabs: Option<bool>,
    pub line_length: Option<usize>,
    pub naming: Option<NamingOverride>,
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct NamingOverride {
    pub class: Option<String>,
    pub function: Option<String>,
    pub method: Option<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

const C_OPERATORS: &[&str] = &[
    "=", "==", "!=", "<", ">", "<=", ">=", "+", "-", "*", "/", "%", "&&", "||", "?", "+=", "-=",
    "*=", "/=", "%=",
];

const PY_OPERATORS: &[&str] = &[
    "=", "==", "!=", "<", ">", "<=", ">=", "+", "-", "*", "/", "%", "//", "+=", "-=", "*=", "/=",
    "%=", "//=", "->", ":=",
];

const PY_STDLIB: &[&str] = &[
    "sys", "os", "math", "json", "re", "abc", "argparse", "asyncio", "base64", "bisect",
    "collections", "contextlib", "copy", "csv", "dataclasses", "datetime", "decimal", "enum",
    "functools", "glob", "hashlib", "heapq", "http", "inspect", "io", "itertools", "logging",
    "operator", "pathlib", "pickle", "platform", "pprint", "queue", "random", "shutil", "signal",
    "socket", "sqlite3", "statistics", "string", "struct", "subprocess", "tempfile", "textwrap",
    "threading", "time", "traceback", "types", "typing", "unittest", "urllib", "uuid",
    "warnings", "weakref", "xml", "zipfile",
];

const PY_THIRD_PARTY: &[&str] = &[
    "numpy", "pandas", "django", "flask", "requests", "scipy", "matplotlib", "pytest", "sklearn",
    "torch", "yaml", "pydantic", "sqlalchemy", "click",
];

impl RuleSet {
    pub fn for_language(language: Language) -> RuleSet {
        match language {
            Language::Java => RuleSet {
                language,
                indentation: IndentRules { size: 4, use_tabs: false },
                braces: BraceRules {
                    class: BracePlacement::SameLine,
                    method: BracePlacement::SameLine,
                    control: BracePlacement::SameLine,
                    namespace: BracePlacement::SameLine,
                },
                spacing: SpacingRules {
                    after_keywords: strings(&[
                        "if", "for", "while", "switch", "catch", "synchronized", "try", "do",
                    ]),
                    around_operators: strings(C_OPERATORS),
                    after_commas: true,
                    pointer_left: false,
                },
                naming: NamingRules {
                    class: "^[A-Z][a-zA-Z0-9]*$".into(),
                    function: None,
                    method: Some("^[a-z][a-zA-Z0-9]*$".into()),
                    package: Some(r"^[a-z][a-z0-9]*(\.[a-z][a-z0-9]*)*$".into()),
                },
                imports: ImportRules {
                    groups: vec![
                        ImportGroup { name: "java".into(), members: strings(&["java."]) },
                        ImportGroup { name: "javax".into(), members: strings(&["javax."]) },
                    ],
                    fallback: "third-party".into(),
                    matcher: ImportMatch::Prefix,
                },
                line_length: 100,
                prefer_single_quotes: false,
            },
            Language::Python => RuleSet {
                language,
                indentation: IndentRules { size: 4, use_tabs: false },
                braces: BraceRules {
                    class: BracePlacement::SameLine,
                    method: BracePlacement::SameLine,
                    control: BracePlacement::SameLine,
                    namespace: BracePlacement::SameLine,
                },
                spacing: SpacingRules {
                    after_keywords: strings(&[
                        "if", "elif", "while", "for", "in", "not", "and", "or", "is", "return",
                        "with", "assert", "yield", "del", "except", "raise", "await", "lambda",
                        "else", "from", "import",
                    ]),
                    around_operators: strings(PY_OPERATORS),
                    after_commas: true,
                    pointer_left: false,
                },
                naming: NamingRules {
                    class: "^[A-Z][a-zA-Z0-9]*$".into(),
                    function: Some("^[a-z_][a-z0-9_]*$".into()),
                    method: None,
                    package: None,
                },
                imports: ImportRules {
                    groups: vec![
                        ImportGroup { name: "stdlib".into(), members: strings(PY_STDLIB) },
                        ImportGroup {
                            name: "third_party".into(),
                            members: strings(PY_THIRD_PARTY),
                        },
                    ],
                    fallback: "first_party".into(),
                    matcher: ImportMatch::RootModule,
                },
                line_length: 79,
                prefer_single_quotes: true,
            },
            Language::Cpp => RuleSet {
                language,
                indentation: IndentRules { size: 2, use_tabs: false },
                braces: BraceRules {
                    class: BracePlacement::SameLine,
                    method: BracePlacement::SameLine,
                    control: BracePlacement::SameLine,
                    namespace: BracePlacement::SameLine,
                },
                spacing: SpacingRules {
                    after_keywords: strings(&["if", "for", "while", "switch", "catch", "try", "do"]),
                    around_operators: strings(C_OPERATORS),
                    after_commas: true,
                    pointer_left: true,
                },
                naming: NamingRules {
                    class: "^[A-Z][a-zA-Z0-9_]*$".into(),
                    function: Some("^[a-z][a-zA-Z0-9_]*$".into()),
                    method: None,
                    package: None,
                },
                imports: ImportRules {
                    groups: vec![ImportGroup { name: "system".into(), members: strings(&["<"]) }],
                    fallback: "user".into(),
                    matcher: ImportMatch::Prefix,
                },
                line_length: 80,
                prefer_single_quotes: false,
            },
        }
    }

    /// Defaults with `ov` layered on top.
    pub fn with_override(language: Language, ov: Option<&RuleOverride>) -> RuleSet {
        let mut rules = RuleSet::for_language(language);
        let Some(ov) = ov else {
            return rules;
        };
        if let Some(size) = ov.indent_size.filter(|s| *s > 0) {
            rules.indentation.size = size;
        }
        if let Some(tabs) = ov.use_tabs {
            rules.indentation.use_tabs = tabs;
        }
        if let Some(len) = ov.line_length.filter(|l| *l > 0) {
            rules.line_length = len;
        }
        if let Some(naming) = &ov.naming {
            if let Some(class) = &naming.class {
                rules.naming.class = class.clone();
            }
            if naming.function.is_some() {
                rules.naming.function = naming.function.clone();
            }
            if naming.method.is_some() {
                rules.naming.method = naming.method.clone();
            }
        }
        rules
    }

    /// One indentation unit as emitted by the cleanup pass.
    pub fn indent_unit(&self) -> String {
        if self.indentation.use_tabs {
            "\t".to_string()
        } else {
            " ".repeat(self.indentation.size)
        }
    }

    pub fn spaces_after_keyword(&self, word: &str) -> bool {
        self.spacing.after_keywords.iter().any(|k| k == word)
    }

    pub fn spaced_operator(&self, op: &str) -> bool {
        self.spacing.around_operators.iter().any(|o| o == op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_per_language() {
        assert_eq!(RuleSet::for_language(Language::Java).line_length, 100);
        assert_eq!(RuleSet::for_language(Language::Python).line_length, 79);
        let cpp = RuleSet::for_language(Language::Cpp);
        assert_eq!(cpp.indentation.size, 2);
        assert_eq!(cpp.indent_unit(), "  ");
    }

    #[test]
    fn test_import_rank_matchers() {
        let java = RuleSet::for_language(Language::Java).imports;
        assert_eq!(java.rank("java.util.List"), 0);
        assert_eq!(java.rank("javax.swing.JFrame"), 1);
        assert_eq!(java.rank("org.junit.Test"), 2);
        assert_eq!(java.group_name(2), "third-party");

        let py = RuleSet::for_language(Language::Python).imports;
        assert_eq!(py.rank("os.path"), 0);
        assert_eq!(py.rank("requests"), 1);
        // prefix of a stdlib name is not a match
        assert_eq!(py.rank("operatorx"), 2);
    }

    #[test]
    fn test_override_layers_on_defaults() {
        let ov = RuleOverride {
            indent_size: Some(2),
            use_tabs: None,
            line_length: Some(120),
            naming: Some(NamingOverride {
                class: Some("^[A-Z]".into()),
                function: None,
                method: None,
            }),
        };
        let rules = RuleSet::with_override(Language::Python, Some(&ov));
        assert_eq!(rules.indentation.size, 2);
        assert_eq!(rules.line_length, 120);
        assert_eq!(rules.naming.class, "^[A-Z]");
        assert_eq!(rules.naming.function.as_deref(), Some("^[a-z_][a-z0-9_]*$"));
    }
}
