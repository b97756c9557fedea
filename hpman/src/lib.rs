//! Hyperparameter bookkeeping for experiment scripts.
//!
//! Scripts mark their hyperparameters with calls such as
//! `_('optim.lr', 0.1)`. A [`Manager`] finds those calls by scanning source
//! text, records every occurrence with its default and location, and resolves
//! the authoritative value of each name at runtime. Values come from three
//! priority classes, lowest first: parsed defaults, defaults passed to the
//! callable form, and explicit assignments.
//!
//! Dotted names form a tree; `get_tree` and `set_tree` work on nested
//! mappings of it. A name that is both a value and the prefix of other names
//! is an impossible tree and is rejected.

mod error;
mod extract;
mod manager;
mod node;
mod occurrence;
mod source;
mod tree;
mod value;

pub use error::{HpmanError, HpmanResult};
pub use extract::{Extractor, literal_eval};
pub use manager::{Manager, UNKNOWN_FILENAME};
pub use node::Node;
pub use occurrence::{Hints, Occurrence, Priority, Provenance};
pub use source::{CONTEXT_LINES, SourceText};
pub use tree::{DEFAULT_SEPARATOR, DICT_ANNOTATION, Strictness, Tree};
pub use value::{Dict, Value};
