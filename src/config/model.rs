// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::preprocess::{Boundary, KindPreprocessor};
use crate::types::LogLevel;

/// Configuration exactly as read from a TOML file.
///
/// ```toml
/// [session]
/// log_level = "debug"
///
/// [dialect.rust]
/// languages = ["rust"]
/// boundary_kinds = ["fn_item", "impl_item"]
///
/// [dialect.plain]
/// all_out_of_block = true
/// ```
///
/// All sections are optional. Convert into a [`ConfigFile`] with
/// `ConfigFile::try_from` to validate it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub session: SessionSection,

    /// Dialects from `[dialect.<name>]`, keyed by name.
    #[serde(default)]
    pub dialect: BTreeMap<String, DialectConfig>,
}

/// Validated configuration.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub session: SessionSection,
    pub dialect: BTreeMap<String, DialectConfig>,
}

impl ConfigFile {
    /// Build without validation. Use `ConfigFile::try_from(raw)` instead.
    pub(crate) fn new_unchecked(
        session: SessionSection,
        dialect: BTreeMap<String, DialectConfig>,
    ) -> Self {
        Self { session, dialect }
    }

    /// One preprocessor per dialect, in name order.
    pub fn preprocessors(&self) -> Vec<KindPreprocessor> {
        self.dialect
            .iter()
            .map(|(name, dialect)| dialect.to_preprocessor(name))
            .collect()
    }
}

/// `[session]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionSection {
    /// If `None`, `MODTRACK_LOG` or `info` is used.
    #[serde(default)]
    pub log_level: Option<LogLevel>,
}

/// `[dialect.<name>]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct DialectConfig {
    /// Languages this dialect handles. Empty means "every event".
    #[serde(default)]
    pub languages: Vec<String>,

    /// Node kinds that are cache-unit boundaries.
    #[serde(default)]
    pub boundary_kinds: Vec<String>,

    /// Treat every node as a boundary (no finer-grained caching).
    #[serde(default)]
    pub all_out_of_block: bool,

    /// Verdict for file-level nodes.
    #[serde(default = "default_files_out_of_block")]
    pub files_out_of_block: bool,
}

fn default_files_out_of_block() -> bool {
    true
}

impl Default for DialectConfig {
    fn default() -> Self {
        Self {
            languages: Vec::new(),
            boundary_kinds: Vec::new(),
            all_out_of_block: false,
            files_out_of_block: default_files_out_of_block(),
        }
    }
}

impl DialectConfig {
    pub fn boundary(&self) -> Boundary {
        if self.all_out_of_block {
            Boundary::Everything
        } else {
            Boundary::Kinds(self.boundary_kinds.iter().cloned().collect())
        }
    }

    pub fn to_preprocessor(&self, name: &str) -> KindPreprocessor {
        KindPreprocessor::new(name, self.boundary())
            .languages(self.languages.iter().cloned())
            .files_out_of_block(self.files_out_of_block)
    }
}
