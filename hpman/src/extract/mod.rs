//! Extraction of placeholder occurrences from source text.
//!
//! [`Extractor`] scans source for `placeholder("name", default, **hints)`
//! calls and turns each into a [`Priority::Parsed`](crate::Priority::Parsed)
//! occurrence. Names and hints must be literal; a default that is not
//! literal is recorded as [`Value::NotLiteral`].

mod literal;
mod scan;

use std::sync::Arc;

use tracing::debug;

pub use literal::literal_eval;

use crate::{
    HpmanError, HpmanResult, Value,
    occurrence::{Hints, Occurrence, Provenance},
    source::SourceText,
};
use scan::{Argument, CallSite};

/// Hint name recording a `**mapping` argument. The mapping is kept whole
/// under this name, like Python keeps it under the `None` keyword.
const UNPACKED_HINT: &str = "**";

/// Extracts occurrences of one placeholder identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Extractor {
    placeholder: String,
}

impl Extractor {
    /// Creates an extractor for calls of `placeholder`.
    #[must_use]
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            placeholder: placeholder.into(),
        }
    }

    /// The identifier marking call sites.
    #[must_use]
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Extracts one parsed occurrence per call site, in source order.
    ///
    /// # Errors
    ///
    /// Returns [`HpmanError::Syntax`] when the source cannot be scanned,
    /// [`HpmanError::Arity`] for calls without exactly one or two positional
    /// arguments, [`HpmanError::NotLiteralName`] when the name is not a string
    /// literal and [`HpmanError::NotLiteralEvaluable`] for non-literal hints.
    pub fn extract(&self, source: &str, filename: &str) -> HpmanResult<Vec<Occurrence>> {
        let calls = scan::scan(source, &self.placeholder)
            .map_err(|err| HpmanError::syntax(filename, err.line, err.message))?;
        let text = Arc::new(SourceText::new(source));
        calls
            .into_iter()
            .map(|call| build_occurrence(call, filename, &text))
            .collect()
    }
}

fn build_occurrence(
    call: CallSite<'_>,
    filename: &str,
    text: &Arc<SourceText>,
) -> HpmanResult<Occurrence> {
    let mut positional = Vec::new();
    let mut keywords = Vec::new();
    for argument in call.arguments {
        match argument {
            Argument::Positional(expr) => positional.push(expr),
            Argument::Keyword { name, value } => keywords.push((name, value)),
            Argument::Unpacked(value) => keywords.push((UNPACKED_HINT, value)),
        }
    }

    let (name_expr, default_expr) = match positional.as_slice() {
        [name] => (*name, None),
        [name, default] => (*name, Some(*default)),
        other => {
            return Err(HpmanError::Arity {
                filename: filename.to_owned(),
                line: call.line,
                count: other.len(),
            });
        }
    };

    let Some(Value::Str(name)) = literal_eval(name_expr) else {
        return Err(HpmanError::NotLiteralName {
            filename: filename.to_owned(),
            line: call.line,
        });
    };

    let value = default_expr.map(|expr| {
        literal_eval(expr).unwrap_or_else(|| {
            debug!(%name, filename, line = call.line, "default is not literal");
            Value::NotLiteral(expr.to_owned())
        })
    });

    let provenance = Provenance::new(filename, call.line, Arc::clone(text));
    let mut hints = Hints::new();
    for (hint, expr) in keywords {
        let Some(evaluated) = literal_eval(expr) else {
            return Err(HpmanError::NotLiteralEvaluable {
                hint: hint.to_owned(),
                context: provenance.describe(),
            });
        };
        hints.insert(hint.to_owned(), evaluated);
    }

    Ok(Occurrence::parsed(name, value, provenance, hints))
}

#[cfg(test)]
mod tests;
