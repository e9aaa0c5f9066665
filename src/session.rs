// src/session.rs

//! One tree-owning session: a counter, a dispatcher, and the registrations
//! the session made.
//!
//! The session is created when the tree environment is set up and torn down
//! with it. The counter it owns is never reset; callers that cache derived
//! data hold an `Arc` to it (see [`Session::counter`]).

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::{default_config_path, load_and_validate, ConfigFile};
use crate::counter::ModificationCounter;
use crate::engine::{DispatchReport, Dispatcher, PreprocessorId};
use crate::errors::Result;
use crate::event::ChangeEvent;
use crate::logging::init_logging;
use crate::preprocess::Preprocessor;
use crate::tree::TreeView;

#[derive(Debug)]
pub struct Session {
    dispatcher: Dispatcher,
    registered: Vec<PreprocessorId>,
}

impl Session {
    /// Empty session with a fresh counter and no preprocessors.
    pub fn new() -> Self {
        Self {
            dispatcher: Dispatcher::new(Arc::new(ModificationCounter::new())),
            registered: Vec::new(),
        }
    }

    /// Session with one [`KindPreprocessor`](crate::preprocess::KindPreprocessor)
    /// per configured dialect, registered in dialect-name order.
    pub fn from_config(cfg: &ConfigFile) -> Result<Self> {
        let mut session = Self::new();
        if cfg.dialect.is_empty() {
            warn!("no [dialect.<name>] sections configured; nothing will be classified");
        }
        for preprocessor in cfg.preprocessors() {
            session.register(Arc::new(preprocessor))?;
        }
        info!(dialects = ?session.dispatcher.names(), "session ready");
        Ok(session)
    }

    /// Load + validate a config file, set up logging, and build the session.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let cfg = load_and_validate(path)?;
        init_logging(cfg.session.log_level)?;
        Self::from_config(&cfg)
    }

    /// [`Session::open`] on `MODTRACK_CONFIG` or `./Modtrack.toml`.
    pub fn open_default() -> Result<Self> {
        Self::open(default_config_path())
    }

    pub fn counter(&self) -> Arc<ModificationCounter> {
        Arc::clone(self.dispatcher.counter())
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn register(&mut self, preprocessor: Arc<dyn Preprocessor>) -> Result<PreprocessorId> {
        let id = self.dispatcher.register(preprocessor)?;
        self.registered.push(id);
        Ok(id)
    }

    pub fn unregister(&mut self, id: PreprocessorId) -> Result<Arc<dyn Preprocessor>> {
        let removed = self.dispatcher.unregister(id)?;
        self.registered.retain(|r| *r != id);
        Ok(removed)
    }

    pub fn notify(&self, tree: &dyn TreeView, event: &ChangeEvent) -> DispatchReport {
        self.dispatcher.notify(tree, event)
    }

    /// Unregister everything this session registered. Idempotent.
    pub fn teardown(&mut self) -> Result<()> {
        while let Some(id) = self.registered.pop() {
            self.dispatcher.unregister(id)?;
        }
        debug!("session torn down");
        Ok(())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Err(err) = self.teardown() {
            warn!(error = %err, "failed to tear down session cleanly");
        }
    }
}
