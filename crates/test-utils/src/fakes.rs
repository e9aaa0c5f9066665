use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use modtrack::preprocess::{Preprocessor, TreeContext};
use modtrack::{ChangeEvent, EventCode, Node};

/// A preprocessor that:
/// - accepts every event (unless told otherwise)
/// - treats nodes of the given kinds as boundaries
/// - keeps the default reaction (so it bumps the counters)
/// - records every event it reacted to and every out-of-block reaction.
#[derive(Debug)]
pub struct RecordingPreprocessor {
    name: String,
    kinds: BTreeSet<String>,
    accept: bool,
    seen: Arc<Mutex<Vec<EventCode>>>,
    reactions: Arc<AtomicUsize>,
}

impl RecordingPreprocessor {
    pub fn new(name: &str, kinds: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            kinds: kinds.iter().map(|k| k.to_string()).collect(),
            accept: true,
            seen: Arc::new(Mutex::new(Vec::new())),
            reactions: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn rejecting(mut self) -> Self {
        self.accept = false;
        self
    }

    /// Shared handle to the list of event codes this preprocessor reacted to.
    pub fn seen(&self) -> Arc<Mutex<Vec<EventCode>>> {
        Arc::clone(&self.seen)
    }

    /// Shared handle to the number of out-of-block reactions.
    pub fn reactions(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.reactions)
    }
}

impl Preprocessor for RecordingPreprocessor {
    fn name(&self) -> &str {
        &self.name
    }

    fn accepts(&self, _event: &ChangeEvent, _cx: &TreeContext<'_>) -> bool {
        self.accept
    }

    fn is_out_of_block(&self, node: Node<'_>) -> bool {
        self.kinds.contains(node.kind())
    }

    fn on_tree_changed(&self, event: &ChangeEvent, cx: &TreeContext<'_>) -> Result<()> {
        self.seen.lock().unwrap().push(event.code());
        if self.is_out_of_block_change(event, cx) {
            self.on_out_of_block_modification(event, cx)?;
            self.increment_counter(cx);
        }
        Ok(())
    }

    fn on_out_of_block_modification(
        &self,
        _event: &ChangeEvent,
        _cx: &TreeContext<'_>,
    ) -> Result<()> {
        self.reactions.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// A preprocessor whose reaction always returns an error.
#[derive(Debug)]
pub struct FailingPreprocessor {
    name: String,
}

impl FailingPreprocessor {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

impl Preprocessor for FailingPreprocessor {
    fn name(&self) -> &str {
        &self.name
    }

    fn accepts(&self, _event: &ChangeEvent, _cx: &TreeContext<'_>) -> bool {
        true
    }

    fn is_out_of_block(&self, _node: Node<'_>) -> bool {
        true
    }

    fn on_tree_changed(&self, event: &ChangeEvent, _cx: &TreeContext<'_>) -> Result<()> {
        Err(anyhow!("dialect bookkeeping broke on {}", event.code()))
    }
}

/// Where a [`PanickingPreprocessor`] panics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanicIn {
    Accepts,
    Predicate,
}

/// A preprocessor that panics, either in its gate or in its node predicate.
#[derive(Debug)]
pub struct PanickingPreprocessor {
    name: String,
    panic_in: PanicIn,
}

impl PanickingPreprocessor {
    pub fn new(name: &str, panic_in: PanicIn) -> Self {
        Self {
            name: name.to_string(),
            panic_in,
        }
    }
}

impl Preprocessor for PanickingPreprocessor {
    fn name(&self) -> &str {
        &self.name
    }

    fn accepts(&self, _event: &ChangeEvent, _cx: &TreeContext<'_>) -> bool {
        if self.panic_in == PanicIn::Accepts {
            panic!("gate exploded");
        }
        true
    }

    fn is_out_of_block(&self, _node: Node<'_>) -> bool {
        if self.panic_in == PanicIn::Predicate {
            panic!("predicate exploded");
        }
        false
    }
}

/// A preprocessor that handles out-of-block changes by custom means and
/// therefore never bumps the shared counters.
#[derive(Debug, Default)]
pub struct SilentPreprocessor {
    handled: Arc<AtomicUsize>,
}

impl SilentPreprocessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handled(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.handled)
    }
}

impl Preprocessor for SilentPreprocessor {
    fn name(&self) -> &str {
        "silent"
    }

    fn accepts(&self, _event: &ChangeEvent, _cx: &TreeContext<'_>) -> bool {
        true
    }

    fn is_out_of_block(&self, _node: Node<'_>) -> bool {
        true
    }

    fn on_tree_changed(&self, event: &ChangeEvent, cx: &TreeContext<'_>) -> Result<()> {
        if self.is_out_of_block_change(event, cx) {
            self.handled.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}
