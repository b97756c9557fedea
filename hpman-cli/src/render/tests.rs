//! Tests for the output formats.

use anyhow::{Result, ensure};
use hpman::Manager;
use rstest::{fixture, rstest};
use serde_json::json;

use super::render;
use crate::cli::OutputFormat;

const SOURCE: &str = "\
steps = _('steps', 10)
lr = _('optim.lr', 0.1, range=[0, 1])
opts = _('opts', {'k': 1})
";

#[fixture]
fn manager() -> Manager {
    let mut manager = Manager::new("_");
    manager
        .parse_source(SOURCE, "train.py")
        .expect("fixture source parses");
    manager
}

#[rstest]
fn values_are_sorted_reprs(manager: Manager) -> Result<()> {
    let text = render(&manager, OutputFormat::Values, false)?;
    ensure!(
        text == "optim.lr = 0.1\nopts = {'k': 1}\nsteps = 10\n",
        "got {text}"
    );
    Ok(())
}

#[rstest]
fn json_is_flat(manager: Manager) -> Result<()> {
    let text = render(&manager, OutputFormat::Json, false)?;
    let parsed: serde_json::Value = serde_json::from_str(&text)?;
    ensure!(parsed.get("optim.lr") == Some(&json!(0.1)));
    ensure!(parsed.get("steps") == Some(&json!(10)));
    Ok(())
}

#[rstest]
#[case(false, false)]
#[case(true, true)]
fn tree_is_nested(manager: Manager, #[case] annotate: bool, #[case] marked: bool) -> Result<()> {
    let text = render(&manager, OutputFormat::Tree, annotate)?;
    let parsed: serde_json::Value = serde_json::from_str(&text)?;
    ensure!(parsed.pointer("/optim/lr") == Some(&json!(0.1)));
    ensure!(parsed.pointer("/opts/k") == Some(&json!(1)));
    let annotation = format!("/opts/{}", hpman::DICT_ANNOTATION);
    ensure!(parsed.pointer(&annotation).is_some() == marked);
    Ok(())
}

#[rstest]
fn occurrences_list_priority_location_and_hints(mut manager: Manager) -> Result<()> {
    manager.set_value("steps", 20)?;
    let text = render(&manager, OutputFormat::Occurrences, false)?;
    ensure!(
        text.contains("optim.lr\n  parsed   train.py:2 = 0.1  [range=[0, 1]]\n"),
        "got {text}"
    );
    ensure!(
        text.contains("steps\n  setter   - = 20\n  parsed   train.py:1 = 10\n"),
        "got {text}"
    );
    Ok(())
}
