//! Helpers for running tests inside `figment::Jail`.
//!
//! A jail gives each test a scratch working directory and restores any
//! environment variables it set. Tests that write override files and load
//! them through relative layer tokens run inside one.

use anyhow::{Result, anyhow};

/// Executes `f` inside a [`figment::Jail`], returning the closure's output.
///
/// Jail failures and closure errors both surface as `anyhow::Error`, so
/// callers can use `?` directly.
///
/// # Errors
///
/// Returns an error if the jail cannot be set up or `f` fails.
pub fn with_jail<F, T>(f: F) -> Result<T>
where
    F: FnOnce(&mut figment::Jail) -> figment::error::Result<T>,
{
    let mut output = None;
    figment::Jail::try_with(|jail| {
        output = Some(f(jail)?);
        Ok(())
    })
    .map_err(|err| anyhow!(err.to_string()))?;
    output.ok_or_else(|| anyhow!("jail closure did not return a value"))
}

/// Writes each `(name, contents)` pair into the jail's working directory.
///
/// # Errors
///
/// Returns the first I/O failure reported by the jail.
pub fn write_files(jail: &figment::Jail, files: &[(&str, &str)]) -> figment::error::Result<()> {
    for (name, contents) in files {
        jail.create_file(name, contents)?;
    }
    Ok(())
}
