//! Unit tests for error rendering.

use rstest::rstest;

use super::HpmanError;

#[rstest]
#[case(HpmanError::not_found("a.b"), "`a.b` not found")]
#[case(
    HpmanError::impossible_tree("a", "has children"),
    "impossible tree at `a`: has children"
)]
#[case(HpmanError::syntax("t.py", 3, "unterminated string"), "t.py:3: invalid syntax: unterminated string")]
#[case(
    HpmanError::Arity { filename: "t.py".into(), line: 1, count: 3 },
    "t.py:1: placeholder calls take a name and an optional default, got 3 positional argument(s)"
)]
fn renders_messages(#[case] err: HpmanError, #[case] expected: &str) {
    assert_eq!(err.to_string(), expected);
}

#[test]
fn double_assignment_lists_both_locations() {
    let err = HpmanError::DoubleAssignment {
        name: "hp".into(),
        first: "a.py:1\n==> 1: _('hp', 1)".into(),
        second: "a.py:2\n==> 2: _('hp', 2)".into(),
    };
    assert_eq!(
        err.to_string(),
        "Duplicated default values:\nFirst occurrence:\na.py:1\n==> 1: _('hp', 1)\n\
         Second occurrence:\na.py:2\n==> 2: _('hp', 2)\n"
    );
}

#[test]
fn classifies_not_found() {
    assert!(HpmanError::not_found("x").is_not_found());
    assert!(!HpmanError::impossible_tree("x", "y").is_not_found());
}
