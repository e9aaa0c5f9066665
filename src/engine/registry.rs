// src/engine/registry.rs

//! Ordered registration list of preprocessors.
//!
//! Registrations only change at session setup and teardown. While a
//! dispatch is in flight any attempt to register or unregister fails fast
//! with [`ModtrackError::RegistrationDuringDispatch`] instead of waiting on
//! (or corrupting) the list.

use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use tracing::debug;

use crate::errors::{ModtrackError, Result};
use crate::preprocess::Preprocessor;

/// Identity of one registration; never reused within a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PreprocessorId(u64);

impl fmt::Display for PreprocessorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "preprocessor-{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Registration {
    pub(crate) id: PreprocessorId,
    pub(crate) preprocessor: Arc<dyn Preprocessor>,
}

#[derive(Debug, Default)]
pub struct Registry {
    entries: RwLock<Vec<Registration>>,
    next_id: AtomicU64,
    active_dispatches: AtomicUsize,
}

/// Marks a dispatch as in flight until dropped (also on unwind).
pub(crate) struct DispatchGuard<'a> {
    registry: &'a Registry,
}

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        self.registry.active_dispatches.fetch_sub(1, Ordering::AcqRel);
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_not_dispatching(&self, name: &str) -> Result<()> {
        if self.active_dispatches.load(Ordering::Acquire) > 0 {
            return Err(ModtrackError::RegistrationDuringDispatch {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    /// Append a preprocessor to the end of the list.
    pub fn register(&self, preprocessor: Arc<dyn Preprocessor>) -> Result<PreprocessorId> {
        self.ensure_not_dispatching(preprocessor.name())?;

        let id = PreprocessorId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        debug!(%id, name = preprocessor.name(), position = entries.len(), "registered preprocessor");
        entries.push(Registration { id, preprocessor });
        Ok(id)
    }

    /// Remove a registration, preserving the order of the others.
    pub fn unregister(&self, id: PreprocessorId) -> Result<Arc<dyn Preprocessor>> {
        self.ensure_not_dispatching(&id.to_string())?;

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let index = entries
            .iter()
            .position(|r| r.id == id)
            .ok_or(ModtrackError::UnknownPreprocessor(id))?;
        let removed = entries.remove(index);
        debug!(%id, name = removed.preprocessor.name(), "unregistered preprocessor");
        Ok(removed.preprocessor)
    }

    pub fn find(&self, id: PreprocessorId) -> Option<Arc<dyn Preprocessor>> {
        self.read()
            .iter()
            .find(|r| r.id == id)
            .map(|r| Arc::clone(&r.preprocessor))
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Registered ids in dispatch order.
    pub fn ids(&self) -> Vec<PreprocessorId> {
        self.read().iter().map(|r| r.id).collect()
    }

    /// Registered names in dispatch order.
    pub fn names(&self) -> Vec<String> {
        self.read()
            .iter()
            .map(|r| r.preprocessor.name().to_string())
            .collect()
    }

    pub fn is_dispatching(&self) -> bool {
        self.active_dispatches.load(Ordering::Acquire) > 0
    }

    pub(crate) fn enter_dispatch(&self) -> DispatchGuard<'_> {
        self.active_dispatches.fetch_add(1, Ordering::AcqRel);
        DispatchGuard { registry: self }
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, Vec<Registration>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }
}
