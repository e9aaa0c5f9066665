use std::sync::Arc;
use std::sync::atomic::Ordering;

use modtrack::engine::{can_affect_tree, FailurePhase};
use modtrack::{ChangeEvent, Dispatcher, EventCode, ModificationCounter, ModtrackError, PropertyName};
use modtrack_test_utils::builders::TreeFixture;
use modtrack_test_utils::fakes::{
    FailingPreprocessor, PanicIn, PanickingPreprocessor, RecordingPreprocessor, SilentPreprocessor,
};
use modtrack_test_utils::init_tracing;

fn fixture() -> TreeFixture {
    TreeFixture::new("lang")
        .file("file")
        .element("file", "func", "function-boundary")
        .element("func", "stmt", "statement")
        .element("func", "stmt2", "statement")
}

fn dispatcher() -> Dispatcher {
    Dispatcher::new(Arc::new(ModificationCounter::new()))
}

#[test]
fn out_of_block_verdict_bumps_both_counters_by_one() {
    init_tracing();
    let fx = fixture();
    let dispatcher = dispatcher();
    dispatcher
        .register(Arc::new(RecordingPreprocessor::new("rec", &["function-boundary"])))
        .unwrap();

    let report = dispatcher.notify(
        fx.tree(),
        &ChangeEvent::ChildAdded {
            parent: fx.id("file"),
            child: fx.id("func"),
        },
    );

    assert!(report.is_ok());
    assert_eq!(report.accepted, 1);
    assert_eq!(report.out_of_block_delta, 1);
    assert_eq!(report.all_changes_delta, 1);
    assert_eq!(dispatcher.counter().out_of_block_count(), 1);
    assert_eq!(dispatcher.counter().all_changes_count(), 1);
}

#[test]
fn in_block_verdict_leaves_counters_alone() {
    init_tracing();
    let fx = fixture();
    let dispatcher = dispatcher();
    let rec = RecordingPreprocessor::new("rec", &["function-boundary"]);
    let reactions = rec.reactions();
    dispatcher.register(Arc::new(rec)).unwrap();

    let report = dispatcher.notify(
        fx.tree(),
        &ChangeEvent::ChildAdded {
            parent: fx.id("stmt"),
            child: fx.id("stmt2"),
        },
    );

    assert!(!report.is_out_of_block());
    assert_eq!(reactions.load(Ordering::SeqCst), 0);
    assert_eq!(dispatcher.counter().out_of_block_count(), 0);
    assert_eq!(dispatcher.counter().all_changes_count(), 0);
}

#[test]
fn every_positive_verdict_counts_separately() {
    init_tracing();
    let fx = fixture();
    let dispatcher = dispatcher();
    let rec = RecordingPreprocessor::new("rec", &["function-boundary"]);
    let reactions = rec.reactions();
    dispatcher.register(Arc::new(rec)).unwrap();

    for _ in 0..3 {
        dispatcher.notify(
            fx.tree(),
            &ChangeEvent::ChildrenChanged {
                parent: fx.id("func"),
                generic: false,
            },
        );
    }

    assert_eq!(reactions.load(Ordering::SeqCst), 3);
    assert_eq!(dispatcher.counter().out_of_block_count(), 3);
}

#[test]
fn rejected_events_are_not_classified() {
    init_tracing();
    let fx = fixture();
    let dispatcher = dispatcher();
    let rec = RecordingPreprocessor::new("rec", &["function-boundary"]).rejecting();
    let seen = rec.seen();
    dispatcher.register(Arc::new(rec)).unwrap();

    let report = dispatcher.notify(
        fx.tree(),
        &ChangeEvent::ChildAdded {
            parent: fx.id("file"),
            child: fx.id("func"),
        },
    );

    assert_eq!(report.accepted, 0);
    assert!(seen.lock().unwrap().is_empty());
    assert_eq!(dispatcher.counter().out_of_block_count(), 0);
}

#[test]
fn failing_reaction_does_not_stop_the_others() {
    init_tracing();
    let fx = fixture();
    let dispatcher = dispatcher();
    let failing_id = dispatcher
        .register(Arc::new(FailingPreprocessor::new("broken")))
        .unwrap();
    let rec = RecordingPreprocessor::new("rec", &["function-boundary"]);
    let reactions = rec.reactions();
    dispatcher.register(Arc::new(rec)).unwrap();

    let report = dispatcher.notify(
        fx.tree(),
        &ChangeEvent::ChildAdded {
            parent: fx.id("file"),
            child: fx.id("func"),
        },
    );

    assert_eq!(reactions.load(Ordering::SeqCst), 1);
    assert_eq!(dispatcher.counter().out_of_block_count(), 1);

    assert_eq!(report.failures.len(), 1);
    let failure = &report.failures[0];
    assert_eq!(failure.id, failing_id);
    assert_eq!(failure.name, "broken");
    assert_eq!(failure.phase, FailurePhase::Reaction);
    assert!(failure.message.contains("dialect bookkeeping broke"));
}

#[test]
fn panics_are_isolated_and_reported() {
    init_tracing();
    let fx = fixture();
    let dispatcher = dispatcher();
    dispatcher
        .register(Arc::new(PanickingPreprocessor::new("gate", PanicIn::Accepts)))
        .unwrap();
    dispatcher
        .register(Arc::new(PanickingPreprocessor::new("pred", PanicIn::Predicate)))
        .unwrap();
    let rec = RecordingPreprocessor::new("rec", &["function-boundary"]);
    let reactions = rec.reactions();
    dispatcher.register(Arc::new(rec)).unwrap();

    // Element parent, so the panicking predicate is actually consulted.
    let report = dispatcher.notify(
        fx.tree(),
        &ChangeEvent::ChildAdded {
            parent: fx.id("func"),
            child: fx.id("stmt"),
        },
    );

    assert_eq!(reactions.load(Ordering::SeqCst), 1);
    assert_eq!(dispatcher.counter().out_of_block_count(), 1);

    let phases: Vec<(String, FailurePhase)> = report
        .failures
        .iter()
        .map(|f| (f.name.clone(), f.phase))
        .collect();
    assert_eq!(
        phases,
        vec![
            ("gate".to_string(), FailurePhase::Accepts),
            ("pred".to_string(), FailurePhase::Reaction),
        ]
    );
    assert!(report.failures[0].message.contains("gate exploded"));
    assert!(report.failures[1].message.contains("predicate exploded"));
}

#[test]
fn failures_aggregate_into_an_error() {
    init_tracing();
    let fx = fixture();
    let dispatcher = dispatcher();
    dispatcher
        .register(Arc::new(FailingPreprocessor::new("one")))
        .unwrap();
    dispatcher
        .register(Arc::new(FailingPreprocessor::new("two")))
        .unwrap();

    let err = dispatcher
        .notify(
            fx.tree(),
            &ChangeEvent::ChildRemoved {
                parent: fx.id("func"),
                child: fx.id("stmt"),
            },
        )
        .into_result()
        .unwrap_err();

    match err {
        ModtrackError::PreprocessorsFailed(failures) => {
            let names: Vec<&str> = failures.iter().map(|f| f.name.as_str()).collect();
            assert_eq!(names, vec!["one", "two"]);
        }
        other => panic!("expected PreprocessorsFailed, got {other:?}"),
    }
}

#[test]
fn silent_preprocessor_opts_out_of_the_counter_bump() {
    init_tracing();
    let fx = fixture();
    let dispatcher = dispatcher();
    let silent = SilentPreprocessor::new();
    let handled = silent.handled();
    dispatcher.register(Arc::new(silent)).unwrap();

    let report = dispatcher.notify(
        fx.tree(),
        &ChangeEvent::ChildAdded {
            parent: fx.id("file"),
            child: fx.id("func"),
        },
    );

    assert!(report.is_ok());
    assert_eq!(handled.load(Ordering::SeqCst), 1);
    assert_eq!(dispatcher.counter().out_of_block_count(), 0);
}

#[test]
fn preprocessors_run_in_registration_order() {
    init_tracing();
    let fx = fixture();
    let dispatcher = dispatcher();
    let first = RecordingPreprocessor::new("first", &[]);
    let second = RecordingPreprocessor::new("second", &[]);
    let (seen_first, seen_second) = (first.seen(), second.seen());
    dispatcher.register(Arc::new(first)).unwrap();
    dispatcher.register(Arc::new(second)).unwrap();

    assert_eq!(dispatcher.names(), vec!["first", "second"]);

    dispatcher.notify(fx.tree(), &ChangeEvent::BeforeChildAddition { parent: fx.id("func") });
    dispatcher.notify(
        fx.tree(),
        &ChangeEvent::ChildAdded {
            parent: fx.id("func"),
            child: fx.id("stmt"),
        },
    );

    let expected = vec![EventCode::BeforeChildAddition, EventCode::ChildAdded];
    assert_eq!(*seen_first.lock().unwrap(), expected);
    assert_eq!(*seen_second.lock().unwrap(), expected);
}

#[test]
fn two_positive_preprocessors_bump_twice() {
    init_tracing();
    let fx = fixture();
    let dispatcher = dispatcher();
    dispatcher
        .register(Arc::new(RecordingPreprocessor::new("a", &["function-boundary"])))
        .unwrap();
    dispatcher
        .register(Arc::new(RecordingPreprocessor::new("b", &["function-boundary"])))
        .unwrap();

    let report = dispatcher.notify(
        fx.tree(),
        &ChangeEvent::ChildAdded {
            parent: fx.id("file"),
            child: fx.id("func"),
        },
    );

    assert_eq!(report.out_of_block_delta, 2);
}

#[test]
fn relevance_gate_drops_before_property_and_writable_changes() {
    init_tracing();
    let fx = fixture();
    let dispatcher = dispatcher();
    let rec = RecordingPreprocessor::new("rec", &[]);
    let seen = rec.seen();
    dispatcher.register(Arc::new(rec)).unwrap();

    let before = ChangeEvent::BeforePropertyChange {
        element: Some(fx.id("file")),
        property: PropertyName::FileName,
    };
    let writable = ChangeEvent::PropertyChanged {
        element: Some(fx.id("file")),
        property: PropertyName::Writable,
        old_value: Some("false".to_string()),
        new_value: Some("true".to_string()),
    };
    assert!(!can_affect_tree(&before));
    assert!(!can_affect_tree(&writable));

    assert!(dispatcher.notify(fx.tree(), &before).dropped);
    assert!(dispatcher.notify(fx.tree(), &writable).dropped);
    assert!(seen.lock().unwrap().is_empty());

    let renamed = ChangeEvent::PropertyChanged {
        element: Some(fx.id("file")),
        property: PropertyName::FileName,
        old_value: Some("a".to_string()),
        new_value: Some("b".to_string()),
    };
    let report = dispatcher.notify(fx.tree(), &renamed);
    assert!(!report.dropped);
    assert_eq!(report.out_of_block_delta, 1);
}

#[test]
fn empty_dispatcher_is_a_no_op() {
    let fx = fixture();
    let dispatcher = dispatcher();

    let report = dispatcher.notify(
        fx.tree(),
        &ChangeEvent::Unrecognized {
            code: "mystery".to_string(),
            nodes: vec![],
        },
    );

    assert!(report.is_ok());
    assert_eq!(report.accepted, 0);
    assert_eq!(dispatcher.counter().all_changes_count(), 0);
}
