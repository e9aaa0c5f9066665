// src/engine/dispatcher.rs

//! Fan-out of change events to registered preprocessors.
//!
//! `notify` is called by the editing engine while it holds the tree's write
//! exclusion, once per before/after notification. It:
//! 1. drops events that cannot affect any cached interpretation,
//! 2. asks each preprocessor, in registration order, whether it accepts the
//!    event and, if so, lets it react,
//! 3. isolates each preprocessor behind its own failure boundary so one
//!    broken dialect cannot starve the others,
//! 4. returns a [`DispatchReport`] with any failures instead of raising them
//!    into the editing engine.
//!
//! The dispatcher never touches the counters itself; the default
//! preprocessor reaction does.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tracing::{debug, error, trace};

use crate::counter::ModificationCounter;
use crate::engine::registry::{PreprocessorId, Registry};
use crate::engine::report::{DispatchReport, FailurePhase, PreprocessorFailure};
use crate::errors::Result;
use crate::event::ChangeEvent;
use crate::preprocess::{Preprocessor, TreeContext};
use crate::tree::TreeView;
use crate::types::PropertyName;

/// Relevance gate applied once per event, before any preprocessor runs.
///
/// Property changes are only observed in their "after" form, and flipping
/// the writable flag of a file never changes how its contents are read.
pub fn can_affect_tree(event: &ChangeEvent) -> bool {
    match event {
        ChangeEvent::BeforePropertyChange { .. } => false,
        ChangeEvent::PropertyChanged { property, .. } => *property != PropertyName::Writable,
        _ => true,
    }
}

#[derive(Debug)]
pub struct Dispatcher {
    registry: Registry,
    counter: Arc<ModificationCounter>,
}

impl Dispatcher {
    pub fn new(counter: Arc<ModificationCounter>) -> Self {
        Self {
            registry: Registry::new(),
            counter,
        }
    }

    pub fn counter(&self) -> &Arc<ModificationCounter> {
        &self.counter
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn register(&self, preprocessor: Arc<dyn Preprocessor>) -> Result<PreprocessorId> {
        self.registry.register(preprocessor)
    }

    pub fn unregister(&self, id: PreprocessorId) -> Result<Arc<dyn Preprocessor>> {
        self.registry.unregister(id)
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.registry.names()
    }

    /// Route one event to every registered preprocessor.
    pub fn notify(&self, tree: &dyn TreeView, event: &ChangeEvent) -> DispatchReport {
        let mut report = DispatchReport::new(event.code());

        if !can_affect_tree(event) {
            debug!(code = %event.code(), "event cannot affect the tree; skipping dispatch");
            report.dropped = true;
            return report;
        }

        let out_of_block_before = self.counter.out_of_block_count();
        let all_changes_before = self.counter.all_changes_count();

        {
            let _dispatching = self.registry.enter_dispatch();
            let registrations = self.registry.read();
            let cx = TreeContext::new(tree, &self.counter);

            for registration in registrations.iter() {
                let preprocessor = registration.preprocessor.as_ref();

                let accepted = match isolate(|| Ok(preprocessor.accepts(event, &cx))) {
                    Ok(accepted) => accepted,
                    Err(message) => {
                        report.failures.push(failure(
                            registration.id,
                            preprocessor,
                            FailurePhase::Accepts,
                            message,
                        ));
                        continue;
                    }
                };
                trace!(
                    preprocessor = preprocessor.name(),
                    code = %event.code(),
                    accepted,
                    "preprocessor gate"
                );
                if !accepted {
                    continue;
                }
                report.accepted += 1;

                if let Err(message) = isolate(|| preprocessor.on_tree_changed(event, &cx)) {
                    report.failures.push(failure(
                        registration.id,
                        preprocessor,
                        FailurePhase::Reaction,
                        message,
                    ));
                }
            }
        }

        report.out_of_block_delta = self
            .counter
            .out_of_block_count()
            .saturating_sub(out_of_block_before);
        report.all_changes_delta = self
            .counter
            .all_changes_count()
            .saturating_sub(all_changes_before);

        trace!(
            code = %event.code(),
            accepted = report.accepted,
            out_of_block = report.out_of_block_delta,
            failures = report.failures.len(),
            "dispatch finished"
        );
        report
    }
}

fn failure(
    id: PreprocessorId,
    preprocessor: &dyn Preprocessor,
    phase: FailurePhase,
    message: String,
) -> PreprocessorFailure {
    let failure = PreprocessorFailure {
        id,
        name: preprocessor.name().to_string(),
        phase,
        message,
    };
    error!(
        preprocessor = %failure.name,
        %id,
        %phase,
        error = %failure.message,
        "preprocessor failed; continuing with the others"
    );
    failure
}

/// Run `f`, turning both an `Err` and a panic into a message.
fn isolate<T>(f: impl FnOnce() -> anyhow::Result<T>) -> std::result::Result<T, String> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(format!("{err:#}")),
        Err(payload) => Err(panic_message(payload.as_ref())),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {s}")
    } else {
        "panicked with a non-string payload".to_string()
    }
}
