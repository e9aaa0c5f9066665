// src/tree/mod.rs

//! Read-only view of the externally owned document tree.
//!
//! The tree itself (storage, editing, node lifetimes) belongs to the editing
//! engine. This crate only ever holds [`NodeId`] handles and asks the engine,
//! through [`TreeView`], whether a handle is still attached and what kind of
//! node it names.

use std::fmt::Debug;
use std::sync::Arc;

use crate::types::{NodeClass, NodeId};

pub mod memory;

pub use memory::MemoryTree;

/// What the classifier needs to know about a live node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeInfo {
    pub class: NodeClass,
    /// Dialect-specific node kind, e.g. `"fn_item"` or `"statement"`.
    pub kind: Arc<str>,
    /// Dialect (language) the node belongs to, if the tree knows it.
    pub language: Option<Arc<str>>,
}

impl NodeInfo {
    pub fn new(class: NodeClass, kind: impl Into<Arc<str>>) -> Self {
        Self {
            class,
            kind: kind.into(),
            language: None,
        }
    }

    pub fn with_language(mut self, language: impl Into<Arc<str>>) -> Self {
        self.language = Some(language.into());
        self
    }
}

/// Abstract tree interface implemented by the editing engine.
pub trait TreeView: Send + Sync + Debug {
    /// Whether `node` is still attached to a live tree.
    fn is_live(&self, node: NodeId) -> bool;

    /// Describe `node`, or `None` if the tree does not know it.
    fn node(&self, node: NodeId) -> Option<NodeInfo>;

    /// Describe `node` only if it is live.
    fn live_node(&self, node: NodeId) -> Option<NodeInfo> {
        if self.is_live(node) {
            self.node(node)
        } else {
            None
        }
    }
}

/// A live node as seen by node predicates.
#[derive(Debug, Clone, Copy)]
pub struct Node<'a> {
    pub id: NodeId,
    pub info: &'a NodeInfo,
}

impl<'a> Node<'a> {
    pub fn kind(&self) -> &'a str {
        &self.info.kind
    }

    pub fn class(&self) -> NodeClass {
        self.info.class
    }

    pub fn language(&self) -> Option<&'a str> {
        self.info.language.as_deref()
    }
}
