//! Unit tests for literal evaluation and occurrence extraction.

use rstest::rstest;

use super::{Extractor, literal_eval};
use crate::{Dict, HpmanError, Priority, Value};

#[rstest]
#[case("None", Value::None)]
#[case("True", Value::Bool(true))]
#[case(" False ", Value::Bool(false))]
#[case("42", Value::Int(42))]
#[case("-7", Value::Int(-7))]
#[case("- 7", Value::Int(-7))]
#[case("1_000", Value::Int(1000))]
#[case("0x1F", Value::Int(31))]
#[case("-0b101", Value::Int(-5))]
#[case("0o17", Value::Int(15))]
#[case("-9223372036854775808", Value::Int(i64::MIN))]
#[case("1.5", Value::Float(1.5))]
#[case("-.5", Value::Float(-0.5))]
#[case("1e3", Value::Float(1000.0))]
#[case("2.", Value::Float(2.0))]
#[case("'a'", Value::from("a"))]
#[case("\"it's\"", Value::from("it's"))]
#[case("'a' \"b\"", Value::from("ab"))]
#[case("'tab\\tend'", Value::from("tab\tend"))]
#[case("r'raw\\n'", Value::from("raw\\n"))]
#[case("'\\x41\\u00e9'", Value::from("A\u{e9}"))]
#[case("'''tri\nple'''", Value::from("tri\nple"))]
#[case("b'ab\\x00'", Value::Bytes(b"ab\x00".to_vec()))]
#[case("[]", Value::List(Vec::new()))]
#[case("[1, 'b',]", Value::List(vec![Value::Int(1), Value::from("b")]))]
#[case("()", Value::Tuple(Vec::new()))]
#[case("(1)", Value::Int(1))]
#[case("(1,)", Value::Tuple(vec![Value::Int(1)]))]
#[case("{1, 2, 1}", Value::Set(vec![Value::Int(1), Value::Int(2)]))]
#[case("{}", Value::Dict(Dict::new()))]
#[case("[1, # one\n 2]", Value::List(vec![Value::Int(1), Value::Int(2)]))]
fn evaluates_literals(#[case] text: &str, #[case] expected: Value) {
    assert_eq!(literal_eval(text), Some(expected));
}

#[test]
fn evaluates_nested_dict() {
    let value = literal_eval("{'a': [1, (2, 3)], 'b': {'c': None}}").expect("dict literal");
    let mut inner = Dict::new();
    inner.insert("c", Value::None);
    let mut expected = Dict::new();
    expected.insert(
        "a",
        Value::List(vec![
            Value::Int(1),
            Value::Tuple(vec![Value::Int(2), Value::Int(3)]),
        ]),
    );
    expected.insert("b", inner);
    assert_eq!(value, Value::Dict(expected));
}

#[rstest]
#[case("x")]
#[case("os.getcwd()")]
#[case("1 + 2")]
#[case("--1")]
#[case("1j")]
#[case("f'x'")]
#[case("'a' b'b'")]
#[case("[1 2]")]
#[case("[,]")]
#[case("{**a}")]
#[case("lambda: 1")]
#[case("9223372036854775808")]
#[case("")]
fn rejects_non_literals(#[case] text: &str) {
    assert_eq!(literal_eval(text), None);
}

fn extract(source: &str) -> Result<Vec<crate::Occurrence>, HpmanError> {
    Extractor::new("_").extract(source, "<unknown>")
}

#[test]
fn extracts_parsed_occurrences() {
    let occurrences = extract("_('a', 1)\nx = _('b')\n").expect("extract");
    let summary: Vec<(&str, Option<&Value>, usize)> = occurrences
        .iter()
        .map(|occ| {
            (
                occ.name(),
                occ.value(),
                occ.provenance().map_or(0, |p| p.line()),
            )
        })
        .collect();
    assert_eq!(
        summary,
        [("a", Some(&Value::Int(1)), 1), ("b", None, 2)]
    );
    assert!(
        occurrences
            .iter()
            .all(|occ| occ.priority() == Priority::Parsed)
    );
}

#[test]
fn non_literal_default_is_marked() {
    let occurrences = extract("_('a', os.getcwd())").expect("extract");
    let value = occurrences.first().and_then(|occ| occ.value());
    assert_eq!(value, Some(&Value::NotLiteral("os.getcwd()".into())));
}

#[test]
fn parses_hints() {
    let occurrences = extract("_('lr', 0.1, range=[0.01, 1], help='learning rate')")
        .expect("extract");
    let hints = occurrences.first().map(|occ| occ.hints().clone()).unwrap_or_default();
    assert_eq!(
        hints.get("range"),
        Some(&Value::List(vec![Value::Float(0.01), Value::Int(1)]))
    );
    assert_eq!(hints.get("help"), Some(&Value::from("learning rate")));
}

#[test]
fn keeps_literal_unpacked_mapping_as_one_hint() {
    let occurrences = extract("_('a', 1, **{'k': 1}, help='x')").expect("extract");
    let hints = occurrences.first().map(crate::Occurrence::hints);
    let unpacked: Dict = [(Value::from("k"), Value::Int(1))].into_iter().collect();
    assert_eq!(
        hints.and_then(|found| found.get("**")),
        Some(&Value::Dict(unpacked))
    );
    assert_eq!(
        hints.and_then(|found| found.get("help")),
        Some(&Value::from("x"))
    );
}

#[rstest]
#[case("_()", 0)]
#[case("_('a', 1, 2)", 3)]
fn rejects_wrong_arity(#[case] source: &str, #[case] expected: usize) {
    match extract(source) {
        Err(HpmanError::Arity { count, line, .. }) => {
            assert_eq!((count, line), (expected, 1));
        }
        other => panic!("expected arity error, got {other:?}"),
    }
}

#[rstest]
#[case("_(name, 1)")]
#[case("_(1, 1)")]
#[case("_(f'a', 1)")]
fn rejects_non_literal_names(#[case] source: &str) {
    assert!(matches!(
        extract(source),
        Err(HpmanError::NotLiteralName { line: 1, .. })
    ));
}

#[rstest]
#[case("_('a', 1, kind=int)", "kind")]
#[case("_('a', 1, **extra)", "**")]
fn rejects_non_literal_hints(#[case] source: &str, #[case] expected: &str) {
    match extract(source) {
        Err(HpmanError::NotLiteralEvaluable { hint, context }) => {
            assert_eq!(hint, expected);
            assert!(context.starts_with("<unknown>:1\n==> 1: "));
        }
        other => panic!("expected hint error, got {other:?}"),
    }
}

#[test]
fn reports_syntax_errors_with_filename() {
    let err = Extractor::new("_")
        .extract("_('a'", "train.py")
        .expect_err("unterminated call");
    assert!(matches!(
        err,
        HpmanError::Syntax { ref filename, line: 1, .. } if filename == "train.py"
    ));
}

#[test]
fn respects_placeholder_name() {
    let occurrences = Extractor::new("hp")
        .extract("hp('a', 1)\n_('b', 2)", "<unknown>")
        .expect("extract");
    let names: Vec<&str> = occurrences.iter().map(crate::Occurrence::name).collect();
    assert_eq!(names, ["a"]);
}
