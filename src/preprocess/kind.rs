// src/preprocess/kind.rs

use std::collections::BTreeSet;

use tracing::trace;

use super::{Preprocessor, TreeContext};
use crate::event::ChangeEvent;
use crate::tree::Node;

/// Which element nodes a [`KindPreprocessor`] treats as boundaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Boundary {
    /// Nodes whose kind is in the set.
    Kinds(BTreeSet<String>),
    /// Every node; for dialects without finer-grained cache units.
    Everything,
}

/// Dialect described purely by node kinds and languages.
///
/// - `languages` gates events: an event is accepted when one of its live
///   nodes belongs to one of these languages. An empty set accepts all.
/// - `boundary` is the node predicate.
/// - `files_out_of_block` is the verdict for file-level nodes.
#[derive(Debug, Clone)]
pub struct KindPreprocessor {
    name: String,
    languages: BTreeSet<String>,
    boundary: Boundary,
    files_out_of_block: bool,
}

impl KindPreprocessor {
    pub fn new(name: impl Into<String>, boundary: Boundary) -> Self {
        Self {
            name: name.into(),
            languages: BTreeSet::new(),
            boundary,
            files_out_of_block: true,
        }
    }

    /// Convenience: boundary = the given node kinds.
    pub fn with_kinds<I, S>(name: impl Into<String>, kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(name, Boundary::Kinds(kinds.into_iter().map(Into::into).collect()))
    }

    pub fn languages<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.languages = languages.into_iter().map(Into::into).collect();
        self
    }

    pub fn files_out_of_block(mut self, value: bool) -> Self {
        self.files_out_of_block = value;
        self
    }
}

impl Preprocessor for KindPreprocessor {
    fn name(&self) -> &str {
        &self.name
    }

    fn accepts(&self, event: &ChangeEvent, cx: &TreeContext<'_>) -> bool {
        if self.languages.is_empty() {
            return true;
        }
        // Project-wide property changes name no element.
        if matches!(event, ChangeEvent::PropertyChanged { element: None, .. }) {
            return true;
        }

        let tree = cx.tree();
        let languages: Vec<_> = event
            .nodes()
            .into_iter()
            .filter_map(|id| tree.live_node(id).and_then(|info| info.language))
            .collect();
        let accepted = languages.iter().any(|lang| self.languages.contains(&**lang))
            // Unknown kinds that name no language stay fail-safe.
            || (languages.is_empty() && matches!(event, ChangeEvent::Unrecognized { .. }));
        trace!(dialect = %self.name, code = %event.code(), accepted, "language gate");
        accepted
    }

    fn is_out_of_block(&self, node: Node<'_>) -> bool {
        match &self.boundary {
            Boundary::Kinds(kinds) => kinds.contains(node.kind()),
            Boundary::Everything => true,
        }
    }

    fn is_file_out_of_block(&self, _file: Node<'_>) -> bool {
        self.files_out_of_block
    }
}
