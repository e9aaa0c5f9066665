use modtrack::classify::is_out_of_block;
use modtrack::{ChangeEvent, Node, NodeId, PropertyName};
use modtrack_test_utils::builders::TreeFixture;

fn fixture() -> TreeFixture {
    TreeFixture::new("lang")
        .directory("dir")
        .file_in(Some("dir"), "file")
        .element("file", "boundary", "function-boundary")
        .element("boundary", "stmt", "statement")
        .element("boundary", "stmt2", "statement")
        .element("file", "other", "function-boundary")
}

fn boundary_only(node: Node<'_>) -> bool {
    node.kind() == "function-boundary"
}

fn always(_node: Node<'_>) -> bool {
    true
}

fn never(_node: Node<'_>) -> bool {
    false
}

#[test]
fn before_events_are_never_out_of_block() {
    let fx = fixture();
    let (parent, child) = (fx.id("boundary"), fx.id("stmt"));

    let events = vec![
        ChangeEvent::BeforePropertyChange {
            element: Some(parent),
            property: PropertyName::FileName,
        },
        ChangeEvent::BeforeChildAddition { parent },
        ChangeEvent::BeforeChildRemoval { parent, child },
        ChangeEvent::BeforeChildReplacement {
            parent,
            old_child: child,
        },
        ChangeEvent::BeforeChildMovement {
            old_parent: parent,
            new_parent: fx.id("other"),
            child,
        },
    ];

    for event in &events {
        assert!(
            !is_out_of_block(event, fx.tree(), always),
            "{} must not be out-of-block",
            event.code()
        );
    }
}

#[test]
fn generic_bulk_changes_ignore_the_predicate() {
    let fx = fixture();
    let parent = fx.id("boundary");

    for event in [
        ChangeEvent::BeforeChildrenChange {
            parent,
            generic: true,
        },
        ChangeEvent::ChildrenChanged {
            parent,
            generic: true,
        },
    ] {
        assert!(!is_out_of_block(&event, fx.tree(), always));
    }
}

#[test]
fn specific_bulk_changes_use_the_parent_predicate() {
    let fx = fixture();

    let on_boundary = ChangeEvent::ChildrenChanged {
        parent: fx.id("boundary"),
        generic: false,
    };
    let on_statement = ChangeEvent::BeforeChildrenChange {
        parent: fx.id("stmt"),
        generic: false,
    };

    assert!(is_out_of_block(&on_boundary, fx.tree(), boundary_only));
    assert!(!is_out_of_block(&on_statement, fx.tree(), boundary_only));
}

#[test]
fn child_replaced_matches_on_new_child_alone() {
    let fx = fixture();
    let event = ChangeEvent::ChildReplaced {
        parent: fx.id("stmt"),
        old_child: fx.id("stmt2"),
        new_child: fx.id("other"),
    };

    let new_child = fx.id("other");
    assert!(is_out_of_block(&event, fx.tree(), |node: Node<'_>| node.id == new_child));
    assert!(!is_out_of_block(&event, fx.tree(), never));
}

#[test]
fn child_replaced_matches_on_old_child_alone() {
    let fx = fixture();
    let old_child = fx.id("stmt2");
    let event = ChangeEvent::ChildReplaced {
        parent: fx.id("stmt"),
        old_child,
        new_child: fx.id("other"),
    };

    assert!(is_out_of_block(&event, fx.tree(), |node: Node<'_>| node.id == old_child));
}

#[test]
fn added_and_removed_check_parent_and_child() {
    let fx = fixture();

    let into_boundary = ChangeEvent::ChildAdded {
        parent: fx.id("boundary"),
        child: fx.id("stmt"),
    };
    let boundary_removed = ChangeEvent::ChildRemoved {
        parent: fx.id("stmt"),
        child: fx.id("other"),
    };
    let statement_only = ChangeEvent::ChildAdded {
        parent: fx.id("stmt"),
        child: fx.id("stmt2"),
    };

    assert!(is_out_of_block(&into_boundary, fx.tree(), boundary_only));
    assert!(is_out_of_block(&boundary_removed, fx.tree(), boundary_only));
    assert!(!is_out_of_block(&statement_only, fx.tree(), boundary_only));
}

#[test]
fn property_changes_are_always_out_of_block() {
    let fx = fixture();

    let with_element = ChangeEvent::PropertyChanged {
        element: Some(fx.id("stmt")),
        property: PropertyName::FileName,
        old_value: Some("a.rs".to_string()),
        new_value: Some("b.rs".to_string()),
    };
    let project_wide = ChangeEvent::PropertyChanged {
        element: None,
        property: PropertyName::Roots,
        old_value: None,
        new_value: None,
    };

    assert!(is_out_of_block(&with_element, fx.tree(), never));
    assert!(is_out_of_block(&project_wide, fx.tree(), never));
}

#[test]
fn child_moved_checks_both_parents_and_the_child() {
    let fx = fixture();
    let (old_parent, new_parent, child) = (fx.id("stmt"), fx.id("stmt2"), fx.id("other"));
    let event = ChangeEvent::ChildMoved {
        old_parent,
        new_parent,
        child,
    };

    for target in [old_parent, new_parent, child] {
        assert!(is_out_of_block(&event, fx.tree(), |node: Node<'_>| node.id == target));
    }
    assert!(!is_out_of_block(&event, fx.tree(), never));
}

#[test]
fn unrecognized_kinds_fail_safe_to_out_of_block() {
    let fx = fixture();
    let event = ChangeEvent::Unrecognized {
        code: "children-reordered".to_string(),
        nodes: vec![fx.id("stmt")],
    };

    assert!(is_out_of_block(&event, fx.tree(), never));
}

#[test]
fn detached_nodes_never_contribute() {
    let fx = fixture();
    let event = ChangeEvent::ChildRemoved {
        parent: fx.id("stmt"),
        child: fx.id("other"),
    };
    fx.detach("other");

    // "other" is still a function-boundary by kind, but it is no longer live.
    assert!(!is_out_of_block(&event, fx.tree(), boundary_only));
}

#[test]
fn unknown_handles_never_contribute() {
    let fx = fixture();
    let event = ChangeEvent::ChildAdded {
        parent: NodeId(9_999),
        child: NodeId(10_000),
    };

    assert!(!is_out_of_block(&event, fx.tree(), always));
}

#[test]
fn directories_never_contribute() {
    let fx = fixture();
    let event = ChangeEvent::ChildAdded {
        parent: fx.id("dir"),
        child: fx.id("stmt"),
    };

    assert!(!is_out_of_block(&event, fx.tree(), |node: Node<'_>| {
        node.kind() == "dir"
    }));
}

#[test]
fn predicate_is_not_called_for_dead_slots() {
    let fx = fixture();
    fx.detach("boundary");
    let event = ChangeEvent::ChildAdded {
        parent: fx.id("boundary"),
        child: fx.id("stmt"),
    };

    let calls = std::cell::Cell::new(0);
    let verdict = is_out_of_block(&event, fx.tree(), |_node: Node<'_>| {
        calls.set(calls.get() + 1);
        true
    });

    assert!(!verdict);
    assert_eq!(calls.get(), 0);
}

#[test]
fn event_slots_are_reported_once_in_slot_order() {
    let (p, old, new) = (NodeId(1), NodeId(2), NodeId(3));
    let replaced = ChangeEvent::ChildReplaced {
        parent: p,
        old_child: old,
        new_child: new,
    };
    assert_eq!(replaced.child(), Some(new));
    assert_eq!(replaced.nodes(), vec![p, new, old]);
    assert!(!replaced.is_before());

    let before = ChangeEvent::BeforeChildrenChange {
        parent: p,
        generic: true,
    };
    assert!(before.is_before());
    assert!(before.is_generic_change());
    assert_eq!(before.nodes(), vec![p]);

    let project_wide = ChangeEvent::PropertyChanged {
        element: None,
        property: PropertyName::Roots,
        old_value: None,
        new_value: None,
    };
    assert!(project_wide.nodes().is_empty());
    assert!(!project_wide.is_generic_change());
}
