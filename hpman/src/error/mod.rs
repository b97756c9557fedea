//! Error types produced while scanning sources and resolving hyperparameters.

mod constructors;
mod types;

pub use types::{HpmanError, HpmanResult};

#[cfg(test)]
mod tests;
