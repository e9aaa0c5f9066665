// src/engine/mod.rs

//! Dispatch engine for modtrack.
//!
//! This module ties together:
//! - the ordered preprocessor registry ([`registry`])
//! - the per-event relevance gate and fan-out ([`dispatcher`])
//! - the per-dispatch outcome and failure types ([`report`])
//!
//! Everything here is synchronous: dispatch runs inside the editing
//! engine's write-exclusive section and never suspends.

pub mod dispatcher;
pub mod registry;
pub mod report;

pub use dispatcher::{can_affect_tree, Dispatcher};
pub use registry::{PreprocessorId, Registry};
pub use report::{DispatchReport, FailurePhase, PreprocessorFailure};
