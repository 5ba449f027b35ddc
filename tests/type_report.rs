//! Type report tests: real Java source through the tree-sitter parser and the reporter.

use pretty_assertions::assert_eq;
use typescope::domain::error::ReportError;
use typescope::domain::report::{ReportLine, TypeReporter};
use typescope::infrastructure::TreeSitterJavaParser;
use typescope::ports::SourceParser;

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/MyClass.java");
const EXPECTED: &str = include_str!("fixtures/MyClass.expected");

fn report(src: &str) -> Vec<String> {
    let tree = TreeSitterJavaParser::new().parse(src).expect("source should parse");
    TypeReporter::report(&tree)
        .expect("tree should be well formed")
        .iter()
        .map(ToString::to_string)
        .collect()
}

#[test]
fn test_fixture_report_matches_expected() {
    let tree = TreeSitterJavaParser::new()
        .parse_file(std::path::Path::new(FIXTURE))
        .unwrap();
    let lines: Vec<String> = TypeReporter::report(&tree)
        .unwrap()
        .iter()
        .map(ToString::to_string)
        .collect();
    let expected: Vec<&str> = EXPECTED.lines().collect();
    assert_eq!(lines, expected);
}

#[test]
fn test_report_is_deterministic() {
    let src = std::fs::read_to_string(FIXTURE).unwrap();
    assert_eq!(report(&src), report(&src));
}

#[test]
fn test_field_and_local_lines_precede_class_line() {
    let lines = report(
        r#"
class Holder {
    int x;
    void f() {
        String s = "";
    }
}
"#,
    );

    let field = lines.iter().position(|l| l == "type int (field decl)").unwrap();
    let var = lines.iter().position(|l| l == "type String (var decl)").unwrap();
    let class = lines
        .iter()
        .position(|l| l == "type Holder (class/int decl)")
        .unwrap();
    assert!(field < class, "{:?}", lines);
    assert!(var < class, "{:?}", lines);
    assert_eq!(class, lines.len() - 1);
}

#[test]
fn test_method_with_n_params() {
    let lines = report("interface Shape { double area(double w, double h, int sides); }");
    assert_eq!(
        lines,
        vec![
            "type double (method decl, param type)",
            "type double (method decl, param type)",
            "type int (method decl, param type)",
            "return type: double (method decl, return type)",
            "type Shape (class/int decl)",
        ]
    );
}

#[test]
fn test_absent_kinds_are_silent() {
    let lines = report("class Empty { }");
    assert_eq!(lines, vec!["type Empty (class/int decl)"]);
    assert!(!lines.iter().any(|l| l.ends_with("(import)")));
    assert!(!lines.iter().any(|l| l.ends_with("(package decl)")));
}

#[test]
fn test_imports() {
    let lines = report("import java.util.List;\nimport java.util.*;\n");
    assert_eq!(
        lines,
        vec![
            "type List package: java.util (import)",
            "package java.util (import)",
        ]
    );
}

#[test]
fn test_nested_object_creation_reports_first() {
    let lines = report(
        r#"
class Registry {
    java.util.Map<String, java.util.List<Integer>> index = new java.util.HashMap<>();
}
"#,
    );
    assert_eq!(
        lines,
        vec![
            "type java.util.HashMap<> (obj creation decl)",
            "type java.util.Map<String, java.util.List<Integer>> (var decl)",
            "type java.util.Map<String, java.util.List<Integer>> (field decl)",
            "type Registry (class/int decl)",
        ]
    );
}

#[test]
fn test_enum_and_constructor_are_not_reported() {
    let lines = report(
        r#"
enum Color { RED }
class Point {
    Point(int x) { }
}
"#,
    );
    assert_eq!(lines, vec!["type Point (class/int decl)"]);
}

#[test]
fn test_import_without_package_is_malformed() {
    let tree = TreeSitterJavaParser::new().parse("import Foo;").unwrap();
    let mut sink: Vec<ReportLine> = Vec::new();
    let err = TypeReporter::walk(&tree, &mut sink).unwrap_err();
    assert!(matches!(err, ReportError::MalformedNode { .. }));
    assert!(sink.is_empty());
}

#[test]
fn test_type_text_is_canonical() {
    let lines = report(
        r#"
class Table {
    java.util.Map<String,Integer> tight;
    java.util.Map<String, /* count */ Integer> commented;
}
"#,
    );
    assert_eq!(
        lines,
        vec![
            "type java.util.Map<String, Integer> (var decl)",
            "type java.util.Map<String, Integer> (field decl)",
            "type java.util.Map<String, Integer> (var decl)",
            "type java.util.Map<String, Integer> (field decl)",
            "type Table (class/int decl)",
        ]
    );
}

#[test]
fn test_qualified_creation_reports_created_type() {
    let lines = report(
        r#"
class Outer {
    void f(Outer o) {
        o.new Inner();
    }
}
"#,
    );
    assert_eq!(
        lines,
        vec![
            "type Inner (obj creation decl)",
            "type Outer (method decl, param type)",
            "return type: void (method decl, return type)",
            "type Outer (class/int decl)",
        ]
    );
}

#[test]
fn test_casts_and_static_calls_are_silent() {
    let lines = report("class A { void f(Object o) { Helper.util((Widget) o); } }");
    assert_eq!(
        lines,
        vec![
            "type Object (method decl, param type)",
            "return type: void (method decl, return type)",
            "type A (class/int decl)",
        ]
    );
}
