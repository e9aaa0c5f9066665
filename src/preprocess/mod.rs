// src/preprocess/mod.rs

//! Pluggable, dialect-specific classifiers.
//!
//! A [`Preprocessor`] decides which events concern its dialect, which nodes
//! are cache-unit boundaries, and what to do when an out-of-block change is
//! detected. The default reaction (see [`Preprocessor::on_tree_changed`])
//! runs the shared classifier with the dialect's node predicate and bumps
//! the session counters on a positive verdict.
//!
//! - [`kind`] contains [`KindPreprocessor`], a dialect driven entirely by
//!   node kinds and languages (what `[dialect.<name>]` config sections
//!   build).

use std::fmt::Debug;

use anyhow::Result;

use crate::classify;
use crate::counter::ModificationCounter;
use crate::event::ChangeEvent;
use crate::tree::{Node, TreeView};
use crate::types::NodeClass;

pub mod kind;

pub use kind::{Boundary, KindPreprocessor};

/// Everything a preprocessor hook may consult during one dispatch.
#[derive(Debug, Clone, Copy)]
pub struct TreeContext<'a> {
    tree: &'a dyn TreeView,
    counter: &'a ModificationCounter,
}

impl<'a> TreeContext<'a> {
    pub fn new(tree: &'a dyn TreeView, counter: &'a ModificationCounter) -> Self {
        Self { tree, counter }
    }

    pub fn tree(&self) -> &'a dyn TreeView {
        self.tree
    }

    pub fn counter(&self) -> &'a ModificationCounter {
        self.counter
    }
}

/// Capability interface implemented by each dialect.
///
/// Only [`name`](Self::name), [`accepts`](Self::accepts) and
/// [`is_out_of_block`](Self::is_out_of_block) are required. Hooks must not
/// block: they run on the synchronous critical path of every tree edit.
pub trait Preprocessor: Send + Sync + Debug {
    /// Human readable name used in logs and failure reports.
    fn name(&self) -> &str;

    /// Dialect relevance gate.
    fn accepts(&self, event: &ChangeEvent, cx: &TreeContext<'_>) -> bool;

    /// Whether an element node is a cache-unit boundary.
    ///
    /// Must depend only on the node's kind and position.
    fn is_out_of_block(&self, node: Node<'_>) -> bool;

    /// Same question for file-level nodes.
    fn is_file_out_of_block(&self, _file: Node<'_>) -> bool {
        true
    }

    /// Route a live, non-directory node to the matching predicate.
    fn classify_node(&self, node: Node<'_>) -> bool {
        match node.class() {
            NodeClass::File => self.is_file_out_of_block(node),
            NodeClass::Element => self.is_out_of_block(node),
            NodeClass::Directory => false,
        }
    }

    /// Run the shared classifier with this dialect's predicates.
    fn is_out_of_block_change(&self, event: &ChangeEvent, cx: &TreeContext<'_>) -> bool {
        classify::is_out_of_block(event, cx.tree(), |node| self.classify_node(node))
    }

    /// Reaction to an accepted event.
    ///
    /// Override to handle some events entirely by custom means (and skip the
    /// counter bump for them).
    fn on_tree_changed(&self, event: &ChangeEvent, cx: &TreeContext<'_>) -> Result<()> {
        if self.is_out_of_block_change(event, cx) {
            self.on_out_of_block_modification(event, cx)?;
            self.increment_counter(cx);
        }
        Ok(())
    }

    /// Dialect bookkeeping for a detected out-of-block change.
    fn on_out_of_block_modification(
        &self,
        _event: &ChangeEvent,
        _cx: &TreeContext<'_>,
    ) -> Result<()> {
        Ok(())
    }

    fn increment_counter(&self, cx: &TreeContext<'_>) {
        cx.counter().increment_out_of_block();
    }
}
