//! Unit tests for manager lookups and tree setters.

use rstest::{fixture, rstest};

use super::{Manager, UNKNOWN_FILENAME};
use crate::{DICT_ANNOTATION, Dict, HpmanError, Value};

#[fixture]
fn hpm() -> Manager {
    let mut hpm = Manager::new("_");
    hpm.parse_source(
        "_('optim.lr', 0.1)\n_('optim.name', 'sgd')\n_('steps', 10)\n_('unset')\n",
        UNKNOWN_FILENAME,
    )
    .expect("parse fixture");
    hpm
}

#[rstest]
fn branch_lookup_returns_mapping(hpm: Manager) {
    let optim = hpm.get_value("optim").expect("branch value");
    let mapping = optim.as_dict().cloned().unwrap_or_default();
    assert_eq!(mapping.get_str("lr"), Some(&Value::Float(0.1)));
    assert_eq!(mapping.get_str("name"), Some(&Value::from("sgd")));
}

#[rstest]
#[case("unset")]
#[case("missing")]
#[case("optim.lr.deeper")]
fn missing_or_empty_is_not_found(hpm: Manager, #[case] name: &str) {
    let err = hpm.get_value(name).expect_err("no value");
    assert_eq!(err.to_string(), format!("`{name}` not found"));
    assert!(!hpm.exists(name));
    assert_eq!(hpm.try_value(name).ok().flatten(), None);
}

#[rstest]
fn occurrence_lookup_is_leaf_only(hpm: Manager) {
    assert!(hpm.get_occurrence("optim").is_none());
    assert!(hpm.get_occurrence("unset").is_none());
    let occurrence = hpm.get_occurrence("steps").expect("leaf occurrence");
    assert_eq!(occurrence.provenance().map(|p| p.line()), Some(3));
    assert_eq!(hpm.occurrences("unset").len(), 1);
    assert!(hpm.occurrences("missing").is_empty());
}

#[rstest]
fn values_are_flat_and_skip_empty(hpm: Manager) {
    let names: Vec<String> = hpm.get_values().into_keys().collect();
    assert_eq!(names, ["optim.lr", "optim.name", "steps"]);
    assert_eq!(hpm.count(), 4);
}

#[rstest]
fn tree_prefix_and_leaf(hpm: Manager) {
    let optim = hpm.get_tree("optim", false).expect("subtree");
    assert_eq!(optim.len(), 2);
    assert!(hpm.get_tree("steps", false).expect("leaf").is_empty());
    assert!(hpm.get_tree("absent", false).expect("absent").is_empty());
}

#[rstest]
fn set_tree_splits_nested_mappings(mut hpm: Manager) {
    let mut inner = Dict::new();
    inner.insert("lr", 0.5);
    let mut outer = Dict::new();
    outer.insert("optim", inner);
    hpm.set_tree(&outer, "").expect("set tree");
    assert_eq!(hpm.get_value("optim.lr").expect("lr"), Value::Float(0.5));
}

#[rstest]
fn set_tree_keeps_annotated_dicts_whole(mut hpm: Manager) {
    let mut opaque = Dict::new();
    opaque.insert("kind", "cosine");
    opaque.insert(DICT_ANNOTATION, true);
    let mut outer = Dict::new();
    outer.insert("schedule", opaque);
    hpm.set_tree(&outer, "").expect("set tree");
    let mut expected = Dict::new();
    expected.insert("kind", "cosine");
    assert_eq!(
        hpm.get_value("schedule").expect("schedule"),
        Value::Dict(expected)
    );
}

#[rstest]
fn set_tree_rejects_non_string_keys(mut hpm: Manager) {
    let mut inner = Dict::new();
    inner.insert(Value::Int(1), "x");
    let mut outer = Dict::new();
    outer.insert("bad", inner);
    let err = hpm.set_tree(&outer, "").expect_err("int key");
    assert!(matches!(err, HpmanError::ImpossibleTree { ref key, .. } if key == "bad"));
}

#[rstest]
fn set_tree_applies_prefix(mut hpm: Manager) {
    let mut values = Dict::new();
    values.insert("lr", 0.2);
    hpm.set_tree(&values, "optim").expect("prefixed set");
    assert_eq!(hpm.get_value("optim.lr").expect("lr"), Value::Float(0.2));
}

#[test]
fn custom_separator_nests_names() {
    let mut hpm = Manager::with_separator("hp", '/');
    hpm.parse_source("hp('a/b', 1)", UNKNOWN_FILENAME)
        .expect("parse");
    assert_eq!(hpm.separator(), '/');
    assert_eq!(hpm.placeholder(), "hp");
    assert!(hpm.get_value("a").is_ok_and(|value| value.as_dict().is_some()));
}
