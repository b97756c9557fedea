//! Text renderings of a manager's state.

use hpman::{Manager, Node, Occurrence};
use serde::Serialize;

use crate::{cli::OutputFormat, error::CliError};

const EMPTY: &str = "<empty>";

/// Renders `manager` in `format`. `annotate_dicts` only affects
/// [`OutputFormat::Tree`].
///
/// # Errors
///
/// Returns [`CliError::Hpman`] when the tree cannot be projected and
/// [`CliError::Render`] when JSON serialisation fails.
pub fn render(
    manager: &Manager,
    format: OutputFormat,
    annotate_dicts: bool,
) -> Result<String, CliError> {
    match format {
        OutputFormat::Values => Ok(values(manager)),
        OutputFormat::Json => json(&manager.get_values()),
        OutputFormat::Tree => json(&manager.get_tree("", annotate_dicts)?),
        OutputFormat::Occurrences => Ok(occurrences(manager)),
    }
}

fn json<T: Serialize + ?Sized>(value: &T) -> Result<String, CliError> {
    let mut text = serde_json::to_string_pretty(value)?;
    text.push('\n');
    Ok(text)
}

fn values(manager: &Manager) -> String {
    manager
        .get_values()
        .iter()
        .map(|(name, value)| format!("{name} = {value}\n"))
        .collect()
}

fn occurrence_line(occurrence: &Occurrence) -> String {
    let location = occurrence
        .provenance()
        .map_or_else(|| "-".to_owned(), ToString::to_string);
    let value = occurrence
        .value()
        .map_or_else(|| EMPTY.to_owned(), ToString::to_string);
    let priority = occurrence.priority().to_string();
    let mut line = format!("  {priority:<8} {location} = {value}");
    if !occurrence.hints().is_empty() {
        let hints: Vec<String> = occurrence
            .hints()
            .iter()
            .map(|(key, hint)| format!("{key}={hint}"))
            .collect();
        line.push_str(&format!("  [{}]", hints.join(", ")));
    }
    line.push('\n');
    line
}

fn occurrences(manager: &Manager) -> String {
    let mut text = String::new();
    for node in manager.tree().nodes() {
        text.push_str(Node::name(node));
        text.push('\n');
        for occurrence in node.occurrences() {
            text.push_str(&occurrence_line(occurrence));
        }
    }
    text
}

#[cfg(test)]
mod tests;
