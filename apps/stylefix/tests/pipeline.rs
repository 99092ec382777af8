use stylefix::{Formatter, IssueKind, Language};

fn fix(language: Language, text: &str) -> String {
    Formatter::for_language(language)
        .unwrap()
        .format_source(text)
        .fixed_text
}

fn count(language: Language, text: &str, kind: IssueKind) -> usize {
    Formatter::for_language(language)
        .unwrap()
        .check_source(text)
        .iter()
        .filter(|i| i.kind == kind)
        .count()
}

const CLEAN_JAVA: &str = "public class Hello {\n    public static void main(String[] args) {\n        int x = -1;\n        if (x > 0) {\n            System.out.println(\"pos\");\n        }\n    }\n}\n";

const CLEAN_PYTHON: &str = "import os\n\n\ndef main(argv, flag=True):\n    data = {'a': 1, 'b': [1, 2]}\n    return data['a'] + len(argv[1:])\n";

const CLEAN_CPP: &str = "#pragma once\n#include <vector>\n\nint add(int a, int b) {\n  return a + b;\n}\n";

#[test]
fn test_clean_input_is_a_fixed_point() {
    for (language, text) in [
        (Language::Java, CLEAN_JAVA),
        (Language::Python, CLEAN_PYTHON),
        (Language::Cpp, CLEAN_CPP),
    ] {
        let once = fix(language, text);
        assert_eq!(once, text, "{} changed clean input", language);
        assert_eq!(fix(language, &once), once);
    }
}

#[test]
fn test_control_flow_scenarios() {
    assert_eq!(fix(Language::Java, "if(x>0){}else{}"), "if (x > 0) {} else {}");
    assert_eq!(fix(Language::Cpp, "if(x>0){}else{}"), "if (x > 0) {} else {}");
    assert_eq!(
        fix(Language::Java, "for(int i=0;i<10;i++){}"),
        "for (int i = 0; i < 10; i++) {}"
    );
}

#[test]
fn test_binary_operators_get_single_spaces() {
    assert_eq!(fix(Language::Java, "int a=b+c*d-e/f%g;"), "int a = b + c * d - e / f % g;");
    assert_eq!(
        fix(Language::Java, "boolean t=a==b&&c!=d||e>=f;"),
        "boolean t = a == b && c != d || e >= f;"
    );
    assert_eq!(fix(Language::Java, "x+=1;y-=2;"), "x += 1; y -= 2;");
}

#[test]
fn test_unary_minus_is_not_spaced() {
    let text = "int a = -1;\nf(-x, -y);\nint[] b = {-1, 2};\n";
    assert_eq!(count(Language::Java, text, IssueKind::MissingSpacesAroundOperator), 0);
    assert_eq!(fix(Language::Java, "int a=-1;"), "int a = -1;");
}

#[test]
fn test_comma_and_semicolon_spacing() {
    assert_eq!(fix(Language::Java, "f(a,b);"), "f(a, b);");
    assert_eq!(fix(Language::Java, "int a=1;int b=2;"), "int a = 1; int b = 2;");
    assert_eq!(fix(Language::Java, "for(int i=0;i<10;){}"), "for (int i = 0; i < 10;) {}");
}

#[test]
fn test_python_inline_bodies_are_unrolled() {
    assert_eq!(fix(Language::Python, "def hello():pass"), "def hello():\n    pass");
    assert_eq!(
        fix(Language::Python, "if x>0:print('P')\nelse:print('N')"),
        "if x > 0:\n    print('P')\nelse:\n    print('N')"
    );
}

#[test]
fn test_python_inline_body_is_the_only_defect() {
    assert_eq!(
        fix(Language::Python, "class Foo:\n    def bar(self):return 1\n"),
        "class Foo:\n    def bar(self):\n        return 1\n"
    );
    assert_eq!(
        fix(Language::Python, "for i in range(3):print(i)\n"),
        "for i in range(3):\n    print(i)\n"
    );
    let out = Formatter::for_language(Language::Python)
        .unwrap()
        .format_source("def hello():pass\n");
    assert_eq!(out.fixed_text, "def hello():\n    pass\n");
    assert_eq!(out.score, 100.0);
}

#[test]
fn test_python_dict_literal_spacing() {
    assert_eq!(fix(Language::Python, "{'a':1,'b':2}"), "{'a': 1, 'b': 2}");
    assert_eq!(fix(Language::Python, "{'a':1, 'b':2}\n"), "{'a': 1, 'b': 2}\n");
}

#[test]
fn test_space_before_separators_and_call_parens() {
    assert_eq!(fix(Language::Java, "int x = 1 ;\n"), "int x = 1;\n");
    assert_eq!(fix(Language::Cpp, "f(a , b);\n"), "f(a, b);\n");
    assert_eq!(fix(Language::Python, "print (x)\n"), "print(x)\n");
}

#[test]
fn test_one_naming_issue_per_bad_class() {
    assert_eq!(count(Language::Java, "class foo {}\n", IssueKind::ClassNaming), 1);
    assert_eq!(count(Language::Cpp, "class widget {};\n", IssueKind::ClassNaming), 1);
    assert_eq!(
        count(Language::Python, "class my_thing:\n    pass\n", IssueKind::ClassNaming),
        1
    );
    assert_eq!(count(Language::Java, "class Foo {}\n", IssueKind::ClassNaming), 0);
}

#[test]
fn test_score_stays_in_range() {
    let samples = [
        (Language::Java, "class foo{int x=1;}"),
        (Language::Python, "class bad:\n  x=1\n"),
        (Language::Cpp, "#include \"b.h\"\n#include <a>\nint *f(){return 0;}\n"),
        (Language::Java, CLEAN_JAVA),
    ];
    for (language, text) in samples {
        let out = Formatter::for_language(language).unwrap().format_source(text);
        assert!((0.0..=100.0).contains(&out.score));
        if out.issues.is_empty() {
            assert_eq!(out.score, 100.0);
            assert_eq!(out.fixed_text, text);
        }
    }
}
