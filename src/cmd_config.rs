//! `check-config` subcommand.

use std::path::Path;

use anyhow::bail;

use autoslide_config::{ConfigLoader, ConfigValidator, ValidationResult};

/// Handle `autoslide check-config`.
pub(crate) fn handle_check_config(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        println!("{} not found, checking built-in defaults", path.display());
    }
    let config = ConfigLoader::load_or_default(path)?;
    let result = ConfigValidator::validate(&config)?;
    print_result(&result);

    if !result.is_valid() {
        bail!("{} configuration error(s)", result.errors.len());
    }
    println!("Configuration OK");
    Ok(())
}

fn print_result(result: &ValidationResult) {
    for error in &result.errors {
        println!("error   {}: {}", error.path, error.message);
    }
    for warning in &result.warnings {
        println!("warning {}: {}", warning.path, warning.message);
    }
}
