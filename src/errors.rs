// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

use crate::engine::{PreprocessorFailure, PreprocessorId};

#[derive(Error, Debug)]
pub enum ModtrackError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// `register` / `unregister` was called while a dispatch was in flight.
    #[error("cannot change registrations while a dispatch is running (preprocessor '{name}')")]
    RegistrationDuringDispatch { name: String },

    #[error("Preprocessor not registered: {0}")]
    UnknownPreprocessor(PreprocessorId),

    #[error("{} preprocessor(s) failed during dispatch: {}", .0.len(), summarize(.0))]
    PreprocessorsFailed(Vec<PreprocessorFailure>),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn summarize(failures: &[PreprocessorFailure]) -> String {
    failures
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, ModtrackError>;
