// src/engine/report.rs

//! Outcome of a single dispatch.

use std::fmt;

use thiserror::Error;

use crate::engine::registry::PreprocessorId;
use crate::errors::{ModtrackError, Result};
use crate::event::EventCode;

/// Where inside a preprocessor a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePhase {
    /// The `accepts` gate.
    Accepts,
    /// `on_tree_changed` (classification, reaction hook, counter bump).
    Reaction,
}

impl fmt::Display for FailurePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePhase::Accepts => f.write_str("accepts"),
            FailurePhase::Reaction => f.write_str("on_tree_changed"),
        }
    }
}

/// A preprocessor that returned an error or panicked during dispatch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("preprocessor '{name}' ({id}) failed in {phase}: {message}")]
pub struct PreprocessorFailure {
    pub id: PreprocessorId,
    pub name: String,
    pub phase: FailurePhase,
    pub message: String,
}

/// What happened while routing one event to every registered preprocessor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    pub code: EventCode,
    /// The relevance gate dropped the event before fan-out.
    pub dropped: bool,
    /// Number of preprocessors whose gate accepted the event.
    pub accepted: usize,
    /// How much the out-of-block counter moved during this dispatch.
    pub out_of_block_delta: u64,
    /// How much the all-changes counter moved during this dispatch.
    pub all_changes_delta: u64,
    pub failures: Vec<PreprocessorFailure>,
}

impl DispatchReport {
    pub(crate) fn new(code: EventCode) -> Self {
        Self {
            code,
            dropped: false,
            accepted: 0,
            out_of_block_delta: 0,
            all_changes_delta: 0,
            failures: Vec::new(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn is_out_of_block(&self) -> bool {
        self.out_of_block_delta > 0
    }

    /// Turn collected failures into a single aggregated error.
    pub fn into_result(self) -> Result<DispatchReport> {
        if self.failures.is_empty() {
            Ok(self)
        } else {
            Err(ModtrackError::PreprocessorsFailed(self.failures))
        }
    }
}
