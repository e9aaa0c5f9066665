// src/event.rs

//! Change notifications emitted by the editing engine.
//!
//! Most mutations produce a "before" notification, the mutation itself, and
//! an "after" notification. Each notification is one [`ChangeEvent`] variant
//! carrying only the node slots that make sense for that kind.
//!
//! Events are borrowed for the duration of a single
//! [`Dispatcher::notify`](crate::engine::Dispatcher::notify) call and are
//! deliberately not `Clone`: the nodes they name may be invalidated by the
//! very mutation they describe.

use std::fmt;

use crate::types::{NodeId, PropertyName};

#[derive(Debug, PartialEq, Eq)]
pub enum ChangeEvent {
    BeforePropertyChange {
        element: Option<NodeId>,
        property: PropertyName,
    },
    PropertyChanged {
        element: Option<NodeId>,
        property: PropertyName,
        old_value: Option<String>,
        new_value: Option<String>,
    },
    BeforeChildAddition {
        parent: NodeId,
    },
    BeforeChildRemoval {
        parent: NodeId,
        child: NodeId,
    },
    BeforeChildReplacement {
        parent: NodeId,
        old_child: NodeId,
    },
    BeforeChildMovement {
        old_parent: NodeId,
        new_parent: NodeId,
        child: NodeId,
    },
    /// Bulk change of `parent`'s children is about to happen.
    ///
    /// `generic` marks a coarse summary that is followed by more precise
    /// notifications.
    BeforeChildrenChange {
        parent: NodeId,
        generic: bool,
    },
    ChildAdded {
        parent: NodeId,
        child: NodeId,
    },
    ChildRemoved {
        parent: NodeId,
        child: NodeId,
    },
    /// `new_child` took the place of `old_child`. The new child also fills
    /// the `child` slot.
    ChildReplaced {
        parent: NodeId,
        old_child: NodeId,
        new_child: NodeId,
    },
    ChildMoved {
        old_parent: NodeId,
        new_parent: NodeId,
        child: NodeId,
    },
    ChildrenChanged {
        parent: NodeId,
        generic: bool,
    },
    /// A kind this crate does not know, e.g. from a newer editing engine.
    Unrecognized {
        code: String,
        nodes: Vec<NodeId>,
    },
}

/// Fieldless discriminant of [`ChangeEvent`], handy for logging and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventCode {
    BeforePropertyChange,
    PropertyChanged,
    BeforeChildAddition,
    BeforeChildRemoval,
    BeforeChildReplacement,
    BeforeChildMovement,
    BeforeChildrenChange,
    ChildAdded,
    ChildRemoved,
    ChildReplaced,
    ChildMoved,
    ChildrenChanged,
    Unrecognized,
}

impl EventCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventCode::BeforePropertyChange => "before-property-change",
            EventCode::PropertyChanged => "property-changed",
            EventCode::BeforeChildAddition => "before-child-addition",
            EventCode::BeforeChildRemoval => "before-child-removal",
            EventCode::BeforeChildReplacement => "before-child-replacement",
            EventCode::BeforeChildMovement => "before-child-movement",
            EventCode::BeforeChildrenChange => "before-children-change",
            EventCode::ChildAdded => "child-added",
            EventCode::ChildRemoved => "child-removed",
            EventCode::ChildReplaced => "child-replaced",
            EventCode::ChildMoved => "child-moved",
            EventCode::ChildrenChanged => "children-changed",
            EventCode::Unrecognized => "unrecognized",
        }
    }
}

impl fmt::Display for EventCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ChangeEvent {
    pub fn code(&self) -> EventCode {
        match self {
            ChangeEvent::BeforePropertyChange { .. } => EventCode::BeforePropertyChange,
            ChangeEvent::PropertyChanged { .. } => EventCode::PropertyChanged,
            ChangeEvent::BeforeChildAddition { .. } => EventCode::BeforeChildAddition,
            ChangeEvent::BeforeChildRemoval { .. } => EventCode::BeforeChildRemoval,
            ChangeEvent::BeforeChildReplacement { .. } => EventCode::BeforeChildReplacement,
            ChangeEvent::BeforeChildMovement { .. } => EventCode::BeforeChildMovement,
            ChangeEvent::BeforeChildrenChange { .. } => EventCode::BeforeChildrenChange,
            ChangeEvent::ChildAdded { .. } => EventCode::ChildAdded,
            ChangeEvent::ChildRemoved { .. } => EventCode::ChildRemoved,
            ChangeEvent::ChildReplaced { .. } => EventCode::ChildReplaced,
            ChangeEvent::ChildMoved { .. } => EventCode::ChildMoved,
            ChangeEvent::ChildrenChanged { .. } => EventCode::ChildrenChanged,
            ChangeEvent::Unrecognized { .. } => EventCode::Unrecognized,
        }
    }

    /// True for pre-mutation notifications.
    pub fn is_before(&self) -> bool {
        matches!(
            self,
            ChangeEvent::BeforePropertyChange { .. }
                | ChangeEvent::BeforeChildAddition { .. }
                | ChangeEvent::BeforeChildRemoval { .. }
                | ChangeEvent::BeforeChildReplacement { .. }
                | ChangeEvent::BeforeChildMovement { .. }
                | ChangeEvent::BeforeChildrenChange { .. }
        )
    }

    /// Only meaningful for the bulk children-change kinds; `false` otherwise.
    pub fn is_generic_change(&self) -> bool {
        match self {
            ChangeEvent::BeforeChildrenChange { generic, .. }
            | ChangeEvent::ChildrenChanged { generic, .. } => *generic,
            _ => false,
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        match self {
            ChangeEvent::BeforeChildAddition { parent }
            | ChangeEvent::BeforeChildRemoval { parent, .. }
            | ChangeEvent::BeforeChildReplacement { parent, .. }
            | ChangeEvent::BeforeChildrenChange { parent, .. }
            | ChangeEvent::ChildAdded { parent, .. }
            | ChangeEvent::ChildRemoved { parent, .. }
            | ChangeEvent::ChildReplaced { parent, .. }
            | ChangeEvent::ChildrenChanged { parent, .. } => Some(*parent),
            _ => None,
        }
    }

    pub fn child(&self) -> Option<NodeId> {
        match self {
            ChangeEvent::BeforeChildRemoval { child, .. }
            | ChangeEvent::BeforeChildMovement { child, .. }
            | ChangeEvent::ChildAdded { child, .. }
            | ChangeEvent::ChildRemoved { child, .. }
            | ChangeEvent::ChildMoved { child, .. } => Some(*child),
            ChangeEvent::ChildReplaced { new_child, .. } => Some(*new_child),
            _ => None,
        }
    }

    pub fn old_child(&self) -> Option<NodeId> {
        match self {
            ChangeEvent::BeforeChildReplacement { old_child, .. }
            | ChangeEvent::ChildReplaced { old_child, .. } => Some(*old_child),
            _ => None,
        }
    }

    pub fn new_child(&self) -> Option<NodeId> {
        match self {
            ChangeEvent::ChildReplaced { new_child, .. } => Some(*new_child),
            _ => None,
        }
    }

    pub fn old_parent(&self) -> Option<NodeId> {
        match self {
            ChangeEvent::BeforeChildMovement { old_parent, .. }
            | ChangeEvent::ChildMoved { old_parent, .. } => Some(*old_parent),
            _ => None,
        }
    }

    pub fn new_parent(&self) -> Option<NodeId> {
        match self {
            ChangeEvent::BeforeChildMovement { new_parent, .. }
            | ChangeEvent::ChildMoved { new_parent, .. } => Some(*new_parent),
            _ => None,
        }
    }

    /// The element a property event is about.
    pub fn element(&self) -> Option<NodeId> {
        match self {
            ChangeEvent::BeforePropertyChange { element, .. }
            | ChangeEvent::PropertyChanged { element, .. } => *element,
            _ => None,
        }
    }

    pub fn property(&self) -> Option<&PropertyName> {
        match self {
            ChangeEvent::BeforePropertyChange { property, .. }
            | ChangeEvent::PropertyChanged { property, .. } => Some(property),
            _ => None,
        }
    }

    /// Every populated node slot, without duplicates, in slot order.
    pub fn nodes(&self) -> Vec<NodeId> {
        let slots: Vec<NodeId> = match self {
            ChangeEvent::Unrecognized { nodes, .. } => nodes.clone(),
            _ => [
                self.element(),
                self.parent(),
                self.old_parent(),
                self.new_parent(),
                self.child(),
                self.old_child(),
                self.new_child(),
            ]
            .into_iter()
            .flatten()
            .collect(),
        };

        let mut out: Vec<NodeId> = Vec::with_capacity(slots.len());
        for id in slots {
            if !out.contains(&id) {
                out.push(id);
            }
        }
        out
    }
}
