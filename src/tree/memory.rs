// src/tree/memory.rs

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{NodeInfo, TreeView};
use crate::types::{NodeClass, NodeId};

#[derive(Debug, Clone)]
struct MemoryEntry {
    info: NodeInfo,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    live: bool,
}

#[derive(Debug, Default)]
struct MemoryState {
    next_id: u64,
    nodes: HashMap<NodeId, MemoryEntry>,
}

/// In-memory tree used by tests and by embedders without a tree of their own.
///
/// Cloning shares the underlying state, so a test can keep a handle while a
/// `Session` reads the same tree.
#[derive(Debug, Clone, Default)]
pub struct MemoryTree {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryTree {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert a node under `parent` (or as a root) and return its handle.
    pub fn insert(&self, parent: Option<NodeId>, info: NodeInfo) -> NodeId {
        let mut state = self.lock();
        state.next_id += 1;
        let id = NodeId(state.next_id);

        let live = match parent {
            Some(p) => state.nodes.get(&p).is_some_and(|e| e.live),
            None => true,
        };
        if let Some(p) = parent {
            if let Some(entry) = state.nodes.get_mut(&p) {
                entry.children.push(id);
            }
        }

        state.nodes.insert(
            id,
            MemoryEntry {
                info,
                parent,
                children: Vec::new(),
                live,
            },
        );
        id
    }

    pub fn add_directory(&self, parent: Option<NodeId>, name: &str) -> NodeId {
        self.insert(parent, NodeInfo::new(NodeClass::Directory, name))
    }

    pub fn add_file(&self, parent: Option<NodeId>, kind: &str, language: &str) -> NodeId {
        self.insert(
            parent,
            NodeInfo::new(NodeClass::File, kind).with_language(language),
        )
    }

    /// Add an element that inherits the language of its nearest ancestor.
    pub fn add_element(&self, parent: NodeId, kind: &str) -> NodeId {
        let language = self.language_of(parent);
        let mut info = NodeInfo::new(NodeClass::Element, kind);
        info.language = language;
        self.insert(Some(parent), info)
    }

    fn language_of(&self, node: NodeId) -> Option<Arc<str>> {
        let state = self.lock();
        let mut cursor = Some(node);
        while let Some(id) = cursor {
            let entry = state.nodes.get(&id)?;
            if entry.info.language.is_some() {
                return entry.info.language.clone();
            }
            cursor = entry.parent;
        }
        None
    }

    /// Detach `node` and its whole subtree. Handles stay known to the tree
    /// but report `is_live == false` from now on.
    pub fn detach(&self, node: NodeId) {
        let mut state = self.lock();

        let parent = state.nodes.get(&node).and_then(|e| e.parent);
        if let Some(p) = parent {
            if let Some(entry) = state.nodes.get_mut(&p) {
                entry.children.retain(|c| *c != node);
            }
        }

        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            if let Some(entry) = state.nodes.get_mut(&id) {
                entry.live = false;
                stack.extend(entry.children.iter().copied());
            }
        }
    }

    /// Move `node` under `new_parent`, keeping it live.
    pub fn reparent(&self, node: NodeId, new_parent: NodeId) {
        let mut state = self.lock();

        let old_parent = state.nodes.get(&node).and_then(|e| e.parent);
        if let Some(p) = old_parent {
            if let Some(entry) = state.nodes.get_mut(&p) {
                entry.children.retain(|c| *c != node);
            }
        }
        if let Some(entry) = state.nodes.get_mut(&new_parent) {
            entry.children.push(node);
        }
        if let Some(entry) = state.nodes.get_mut(&node) {
            entry.parent = Some(new_parent);
        }
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.lock().nodes.get(&node).and_then(|e| e.parent)
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.lock()
            .nodes
            .get(&node)
            .map(|e| e.children.clone())
            .unwrap_or_default()
    }
}

impl TreeView for MemoryTree {
    fn is_live(&self, node: NodeId) -> bool {
        self.lock().nodes.get(&node).is_some_and(|e| e.live)
    }

    fn node(&self, node: NodeId) -> Option<NodeInfo> {
        self.lock().nodes.get(&node).map(|e| e.info.clone())
    }

    fn live_node(&self, node: NodeId) -> Option<NodeInfo> {
        self.lock()
            .nodes
            .get(&node)
            .filter(|e| e.live)
            .map(|e| e.info.clone())
    }
}
