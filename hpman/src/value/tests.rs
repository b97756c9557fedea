//! Unit tests for value rendering, equality and conversions.

use rstest::rstest;
use serde_json::json;

use super::{Dict, Value};

fn dict(entries: &[(&str, Value)]) -> Dict {
    entries
        .iter()
        .map(|(key, value)| (Value::from(*key), value.clone()))
        .collect()
}

#[rstest]
#[case(Value::None, "None")]
#[case(Value::Bool(true), "True")]
#[case(Value::Int(-3), "-3")]
#[case(Value::Float(1.0), "1.0")]
#[case(Value::Float(0.1), "0.1")]
#[case(Value::Float(-3.25), "-3.25")]
#[case(Value::Float(100.0), "100.0")]
#[case(Value::Float(0.0001), "0.0001")]
#[case(Value::Float(1e-5), "1e-05")]
#[case(Value::Float(-2.5e-7), "-2.5e-07")]
#[case(Value::Float(1e15), "1000000000000000.0")]
#[case(Value::Float(1e16), "1e+16")]
#[case(Value::Float(1.5e300), "1.5e+300")]
#[case(Value::Float(-0.0), "-0.0")]
#[case(Value::Float(f64::INFINITY), "inf")]
#[case(Value::Float(f64::NAN), "nan")]
#[case(Value::Str("it's".into()), "\"it's\"")]
#[case(Value::Str("a\nb".into()), "'a\\nb'")]
#[case(Value::Bytes(b"ab\x00".to_vec()), "b'ab\\x00'")]
#[case(Value::Tuple(vec![Value::Int(1)]), "(1,)")]
#[case(Value::Set(Vec::new()), "set()")]
#[case(Value::List(vec![Value::Int(1), Value::from("a")]), "[1, 'a']")]
#[case(Value::NotLiteral("print".into()), "<not literal: print>")]
fn renders_python_repr(#[case] value: Value, #[case] expected: &str) {
    assert_eq!(value.to_string(), expected);
}

#[test]
fn dict_equality_ignores_order() {
    let left = dict(&[("a", Value::Int(1)), ("b", Value::Int(2))]);
    let right = dict(&[("b", Value::Int(2)), ("a", Value::Int(1))]);
    assert_eq!(left, right);
    assert_ne!(left, dict(&[("a", Value::Int(1))]));
}

#[test]
fn dict_insert_replaces_in_place() {
    let mut mapping = dict(&[("a", Value::Int(1)), ("b", Value::Int(2))]);
    let previous = mapping.insert("a", 3);
    assert_eq!(previous, Some(Value::Int(1)));
    let keys: Vec<String> = mapping.iter().map(|(key, _)| key.key_string()).collect();
    assert_eq!(keys, ["a", "b"]);
    assert_eq!(mapping.get_str("a"), Some(&Value::Int(3)));
}

#[test]
fn set_equality_ignores_order() {
    let left = Value::Set(vec![Value::Int(1), Value::Int(2)]);
    let right = Value::Set(vec![Value::Int(2), Value::Int(1)]);
    assert_eq!(left, right);
    assert_ne!(
        Value::List(vec![Value::Int(1), Value::Int(2)]),
        Value::List(vec![Value::Int(2), Value::Int(1)])
    );
}

#[test]
fn converts_from_json() {
    let value = Value::from(json!({"a": [1, 2.5, null], "b": {"c": "x"}}));
    let expected = Value::Dict(dict(&[
        (
            "a",
            Value::List(vec![Value::Int(1), Value::Float(2.5), Value::None]),
        ),
        ("b", Value::Dict(dict(&[("c", Value::from("x"))]))),
    ]));
    assert_eq!(value, expected);
}

#[test]
fn serialises_non_string_keys_as_repr() {
    let mut mapping = Dict::new();
    mapping.insert(Value::Int(1), "a");
    mapping.insert("k", Value::Tuple(vec![Value::Bool(false)]));
    let json = serde_json::to_value(Value::Dict(mapping)).expect("serialise dict");
    assert_eq!(json, json!({"1": "a", "k": [false]}));
}

#[rstest]
#[case(Value::None, false)]
#[case(Value::Int(0), false)]
#[case(Value::Bool(true), true)]
#[case(Value::from(""), false)]
#[case(Value::from("x"), true)]
fn truthiness_follows_python(#[case] value: Value, #[case] expected: bool) {
    assert_eq!(value.is_truthy(), expected);
}
