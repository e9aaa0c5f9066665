// src/classify.rs

//! Out-of-block classification of a single change event.
//!
//! The classifier is a pure function of the event, the tree's answers about
//! the nodes it names, and a node predicate supplied by a dialect. It never
//! mutates anything; counters and reactions are the caller's business.

use crate::event::ChangeEvent;
use crate::tree::{Node, TreeView};
use crate::types::{NodeClass, NodeId};

/// Decide whether `event` is an out-of-block change.
///
/// `predicate` answers "is this node a cache-unit boundary" and is only
/// called for populated, live, non-directory slots. Everything else
/// contributes `false`. Unknown kinds and property changes are out-of-block.
pub fn is_out_of_block<F>(event: &ChangeEvent, tree: &dyn TreeView, predicate: F) -> bool
where
    F: Fn(Node<'_>) -> bool,
{
    let check = |slot: Option<NodeId>| slot_is_out_of_block(tree, slot, &predicate);

    match event {
        ChangeEvent::BeforePropertyChange { .. }
        | ChangeEvent::BeforeChildMovement { .. }
        | ChangeEvent::BeforeChildAddition { .. }
        | ChangeEvent::BeforeChildRemoval { .. }
        | ChangeEvent::BeforeChildReplacement { .. } => false,

        ChangeEvent::BeforeChildrenChange { parent, generic }
        | ChangeEvent::ChildrenChanged { parent, generic } => !*generic && check(Some(*parent)),

        ChangeEvent::ChildAdded { .. }
        | ChangeEvent::ChildRemoved { .. }
        | ChangeEvent::ChildReplaced { .. } => {
            check(event.parent())
                || check(event.child())
                || check(event.old_child())
                || check(event.new_child())
        }

        ChangeEvent::PropertyChanged { .. } => true,

        ChangeEvent::ChildMoved {
            old_parent,
            new_parent,
            child,
        } => check(Some(*old_parent)) || check(Some(*new_parent)) || check(Some(*child)),

        ChangeEvent::Unrecognized { .. } => true,
    }
}

/// Apply `predicate` to one event slot, treating missing, detached and
/// directory nodes as in-block.
pub fn slot_is_out_of_block<F>(tree: &dyn TreeView, slot: Option<NodeId>, predicate: &F) -> bool
where
    F: Fn(Node<'_>) -> bool,
{
    let Some(id) = slot else {
        return false;
    };
    let Some(info) = tree.live_node(id) else {
        return false;
    };
    if info.class == NodeClass::Directory {
        return false;
    }
    predicate(Node { id, info: &info })
}
