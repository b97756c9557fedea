//! Test helpers shared across crates.
//!
//! This crate provides temporary source trees, a working-directory guard and
//! a `figment::Jail` wrapper for settings tests.

pub mod cwd;
pub mod jail;
pub mod sources;
