//! `figment::Jail` wrapper for settings tests.
//!
//! A jail gives the closure a fresh working directory and restores every
//! environment variable it touched once the closure returns.

use anyhow::{Result, anyhow};

/// Runs `f` inside a [`figment::Jail`] after writing `files` into the jail
/// directory and exporting `vars`.
///
/// # Errors
///
/// Returns an error if the jail cannot be set up, a file cannot be written,
/// or the closure fails.
pub fn with_jail<F, T>(files: &[(&str, &str)], vars: &[(&str, &str)], f: F) -> Result<T>
where
    F: FnOnce(&mut figment::Jail) -> figment::error::Result<T>,
{
    let mut output = None;
    figment::Jail::try_with(|jail| {
        for (name, contents) in files {
            jail.create_file(name, contents)?;
        }
        for (key, value) in vars {
            jail.set_env(key, value);
        }
        output = Some(f(jail)?);
        Ok(())
    })
    .map_err(|err| anyhow!(err.to_string()))?;
    output.ok_or_else(|| anyhow!("jail closure did not return a value"))
}
