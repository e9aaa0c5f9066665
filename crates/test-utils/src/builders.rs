#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};

use modtrack::config::{ConfigFile, DialectConfig, RawConfigFile, SessionSection};
use modtrack::{MemoryTree, NodeId};

/// A `MemoryTree` whose nodes can be looked up by a test-chosen label.
///
/// ```ignore
/// let fx = TreeFixture::new("rust")
///     .file("main")
///     .element("main", "f", "function-boundary")
///     .element("f", "s", "statement");
/// let id = fx.id("s");
/// ```
pub struct TreeFixture {
    tree: MemoryTree,
    language: String,
    labels: HashMap<String, NodeId>,
}

impl TreeFixture {
    pub fn new(language: &str) -> Self {
        Self {
            tree: MemoryTree::new(),
            language: language.to_string(),
            labels: HashMap::new(),
        }
    }

    pub fn directory(mut self, label: &str) -> Self {
        let id = self.tree.add_directory(None, label);
        self.labels.insert(label.to_string(), id);
        self
    }

    /// Add a file of kind `"file"` at the root.
    pub fn file(self, label: &str) -> Self {
        self.file_in(None, label)
    }

    pub fn file_in(mut self, dir: Option<&str>, label: &str) -> Self {
        let parent = dir.map(|d| self.id(d));
        let id = self.tree.add_file(parent, "file", &self.language);
        self.labels.insert(label.to_string(), id);
        self
    }

    pub fn element(mut self, parent: &str, label: &str, kind: &str) -> Self {
        let parent = self.id(parent);
        let id = self.tree.add_element(parent, kind);
        self.labels.insert(label.to_string(), id);
        self
    }

    pub fn id(&self, label: &str) -> NodeId {
        *self
            .labels
            .get(label)
            .unwrap_or_else(|| panic!("no node labelled '{label}' in fixture"))
    }

    pub fn detach(&self, label: &str) {
        self.tree.detach(self.id(label));
    }

    pub fn tree(&self) -> &MemoryTree {
        &self.tree
    }
}

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                session: SessionSection::default(),
                dialect: BTreeMap::new(),
            },
        }
    }

    pub fn with_dialect(mut self, name: &str, dialect: DialectConfig) -> Self {
        self.config.dialect.insert(name.to_string(), dialect);
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `DialectConfig`.
pub struct DialectConfigBuilder {
    dialect: DialectConfig,
}

impl DialectConfigBuilder {
    pub fn new() -> Self {
        Self {
            dialect: DialectConfig::default(),
        }
    }

    pub fn language(mut self, language: &str) -> Self {
        self.dialect.languages.push(language.to_string());
        self
    }

    pub fn boundary_kind(mut self, kind: &str) -> Self {
        self.dialect.boundary_kinds.push(kind.to_string());
        self
    }

    pub fn all_out_of_block(mut self, val: bool) -> Self {
        self.dialect.all_out_of_block = val;
        self
    }

    pub fn files_out_of_block(mut self, val: bool) -> Self {
        self.dialect.files_out_of_block = val;
        self
    }

    pub fn build(self) -> DialectConfig {
        self.dialect
    }
}

impl Default for DialectConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
