// src/config/validate.rs

use crate::config::model::{ConfigFile, DialectConfig, RawConfigFile};
use crate::errors::{ModtrackError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = ModtrackError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.session, raw.dialect))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    for (name, dialect) in cfg.dialect.iter() {
        validate_dialect_name(name)?;
        validate_boundary(name, dialect)?;
        validate_entries(name, "languages", &dialect.languages)?;
        validate_entries(name, "boundary_kinds", &dialect.boundary_kinds)?;
    }
    Ok(())
}

fn validate_dialect_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(ModtrackError::ConfigError(
            "dialect names must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_boundary(name: &str, dialect: &DialectConfig) -> Result<()> {
    match (dialect.all_out_of_block, dialect.boundary_kinds.is_empty()) {
        (true, false) => Err(ModtrackError::ConfigError(format!(
            "dialect '{}' sets both `all_out_of_block` and `boundary_kinds`",
            name
        ))),
        (false, true) => Err(ModtrackError::ConfigError(format!(
            "dialect '{}' needs `boundary_kinds` (or `all_out_of_block = true`)",
            name
        ))),
        _ => Ok(()),
    }
}

fn validate_entries(name: &str, field: &str, values: &[String]) -> Result<()> {
    if values.iter().any(|v| v.trim().is_empty()) {
        return Err(ModtrackError::ConfigError(format!(
            "dialect '{}' has an empty entry in `{}`",
            name, field
        )));
    }
    Ok(())
}
