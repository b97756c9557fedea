//! Tests for override parsing and application.

use anyhow::{Result, ensure};
use camino::Utf8PathBuf;
use hpman::{Manager, Value};
use rstest::{fixture, rstest};
use tempfile::TempDir;

use super::{apply, load_overrides, parse_assignment};
use crate::error::CliError;

#[fixture]
fn manager() -> Manager {
    let mut manager = Manager::new("_");
    manager
        .parse_source(
            "lr = _('optim.lr', 0.1)\nsteps = _('steps', 10)\nname = _('name', 'run')",
            "train.py",
        )
        .expect("fixture source parses");
    manager
}

fn write(dir: &TempDir, name: &str, contents: &str) -> Result<Utf8PathBuf> {
    let path = Utf8PathBuf::try_from(dir.path().join(name))?;
    std::fs::write(&path, contents)?;
    Ok(path)
}

#[rstest]
#[case("steps=20", "steps", Value::Int(20))]
#[case("optim.lr=1e-3", "optim.lr", Value::Float(0.001))]
#[case("flag=True", "flag", Value::Bool(true))]
#[case("name=baseline", "name", Value::from("baseline"))]
#[case("name='quoted'", "name", Value::from("quoted"))]
#[case("sizes=[1, 2]", "sizes", Value::List(vec![Value::Int(1), Value::Int(2)]))]
#[case("eq=a=b", "eq", Value::from("a=b"))]
fn parses_assignments(
    #[case] input: &str,
    #[case] name: &str,
    #[case] expected: Value,
) -> Result<()> {
    let (parsed_name, value) = parse_assignment(input)?;
    ensure!(parsed_name == name);
    ensure!(value == expected, "got {value}");
    Ok(())
}

#[rstest]
#[case("steps")]
#[case("=3")]
fn rejects_malformed_assignments(#[case] input: &str) {
    assert!(matches!(
        parse_assignment(input),
        Err(CliError::InvalidAssignment(_))
    ));
}

#[rstest]
fn toml_overrides_apply_as_tree(mut manager: Manager) -> Result<()> {
    let dir = TempDir::new()?;
    let path = write(&dir, "over.toml", "steps = 50\n[optim]\nlr = 0.5\n")?;
    apply(&mut manager, &[path], &[] as &[&str])?;
    ensure!(manager.get_value("steps")? == Value::Int(50));
    ensure!(manager.get_value("optim.lr")? == Value::Float(0.5));
    Ok(())
}

#[rstest]
fn json_overrides_apply_as_tree(mut manager: Manager) -> Result<()> {
    let dir = TempDir::new()?;
    let path = write(&dir, "over.json", r#"{"optim": {"lr": 0.25}}"#)?;
    apply(&mut manager, &[path], &[] as &[&str])?;
    ensure!(manager.get_value("optim.lr")? == Value::Float(0.25));
    Ok(())
}

#[rstest]
fn annotated_tables_stay_whole(mut manager: Manager) -> Result<()> {
    let dir = TempDir::new()?;
    let path = write(
        &dir,
        "over.toml",
        "[opts]\n__hpman_dict__ = true\nk = 1\n",
    )?;
    apply(&mut manager, &[path], &[] as &[&str])?;
    let opts = manager.get_value("opts")?;
    let table = opts.as_dict().map(|dict| dict.len());
    ensure!(table == Some(1), "got {opts}");
    ensure!(manager.get_occurrence("opts.k").is_none());
    Ok(())
}

#[rstest]
fn assignments_follow_files(mut manager: Manager) -> Result<()> {
    let dir = TempDir::new()?;
    let path = write(&dir, "over.toml", "steps = 50\n")?;
    apply(&mut manager, &[path], &["steps=70"])?;
    ensure!(manager.get_value("steps")? == Value::Int(70));
    Ok(())
}

#[rstest]
fn malformed_file_names_its_path() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write(&dir, "broken.toml", "steps = = 1\n")?;
    let err = load_overrides(&path).err().map(|err| err.to_string());
    ensure!(
        err.as_deref().is_some_and(|message| message.contains("broken.toml")),
        "unexpected: {err:?}"
    );
    Ok(())
}
