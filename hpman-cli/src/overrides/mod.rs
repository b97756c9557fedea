//! Runtime overrides applied after parsing: nested tables from files and
//! single `NAME=VALUE` assignments.

use camino::Utf8Path;
use figment::{
    Figment,
    providers::{Format, Json, Toml},
};
use hpman::{Manager, Value, literal_eval};
use tracing::debug;

use crate::{error::CliError, fs_helpers::read_text};

/// Splits `NAME=VALUE`. The value is read as a Python literal and kept as a
/// plain string when it is not one.
///
/// # Errors
///
/// Returns [`CliError::InvalidAssignment`] when `=` is missing or the name is
/// empty.
pub fn parse_assignment(assignment: &str) -> Result<(String, Value), CliError> {
    let (name, raw) = assignment
        .split_once('=')
        .filter(|(name, _)| !name.trim().is_empty())
        .ok_or_else(|| CliError::InvalidAssignment(assignment.to_owned()))?;
    let value = literal_eval(raw).unwrap_or_else(|| Value::from(raw));
    Ok((name.trim().to_owned(), value))
}

/// Loads an overrides file as a nested mapping. Files ending in `.json` are
/// JSON; anything else is TOML.
///
/// # Errors
///
/// Returns [`CliError::Io`] when the file cannot be read and
/// [`CliError::Overrides`] when it is not a table.
pub fn load_overrides(path: &Utf8Path) -> Result<Value, CliError> {
    let contents = read_text(path)?;
    let figment = if path.extension() == Some("json") {
        Figment::from(Json::string(&contents))
    } else {
        Figment::from(Toml::string(&contents))
    };
    let table: serde_json::Value = figment.extract().map_err(|err| CliError::Overrides {
        path: path.to_path_buf(),
        source: Box::new(err),
    })?;
    if !table.is_object() {
        return Err(CliError::Overrides {
            path: path.to_path_buf(),
            source: Box::new(figment::Error::from(
                "top level must be a table".to_owned(),
            )),
        });
    }
    Ok(Value::from(table))
}

/// Applies every overrides file, then every assignment, in argument order.
///
/// # Errors
///
/// Propagates load failures and rejected assignments.
pub fn apply<P, A>(manager: &mut Manager, files: &[P], assignments: &[A]) -> Result<(), CliError>
where
    P: AsRef<Utf8Path>,
    A: AsRef<str>,
{
    for file in files {
        let path = file.as_ref();
        if let Value::Dict(table) = load_overrides(path)? {
            debug!(path = %path, entries = table.len(), "applying overrides file");
            manager.set_tree(&table, "")?;
        }
    }
    for assignment in assignments {
        let (name, value) = parse_assignment(assignment.as_ref())?;
        debug!(name = name.as_str(), %value, "applying assignment");
        manager.set_value(&name, value)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests;
