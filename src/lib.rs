// src/lib.rs

//! Out-of-block change classification and modification tracking for a
//! shared document tree.
//!
//! The editing engine reports every mutation as a [`ChangeEvent`]. A
//! [`Dispatcher`] hands it to each registered [`Preprocessor`] (one per
//! dialect); the default reaction classifies the event and, when it crosses a
//! cache-unit boundary, bumps the session's [`ModificationCounter`]. Caches
//! take a [`Stamp`] when they compute a value and treat it as stale once the
//! counter has moved past it.
//!
//! ```no_run
//! use modtrack::{ChangeEvent, KindPreprocessor, MemoryTree, Session};
//! use std::sync::Arc;
//!
//! let tree = MemoryTree::new();
//! let file = tree.add_file(None, "file", "rust");
//! let func = tree.add_element(file, "fn_item");
//!
//! let mut session = Session::new();
//! session
//!     .register(Arc::new(KindPreprocessor::with_kinds("rust", ["fn_item"])))
//!     .expect("not dispatching");
//!
//! let report = session.notify(&tree, &ChangeEvent::ChildAdded { parent: file, child: func });
//! assert!(report.is_out_of_block());
//! ```

pub mod classify;
pub mod config;
pub mod counter;
pub mod engine;
pub mod errors;
pub mod event;
pub mod logging;
pub mod preprocess;
pub mod session;
pub mod tree;
pub mod types;

pub use classify::is_out_of_block;
pub use counter::{CounterKind, ModificationCounter, Stamp};
pub use engine::{DispatchReport, Dispatcher, PreprocessorFailure, PreprocessorId};
pub use errors::{ModtrackError, Result};
pub use event::{ChangeEvent, EventCode};
pub use preprocess::{Boundary, KindPreprocessor, Preprocessor, TreeContext};
pub use session::Session;
pub use tree::{MemoryTree, Node, NodeInfo, TreeView};
pub use types::{NodeClass, NodeId, PropertyName};
