//! History adapter
//!
//! The address bar is a best-effort mirror of the view state. Writes that the
//! host refuses are logged and dropped; the in-memory state stays the source
//! of truth.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, warn};

use super::path::location_path;
use crate::utils::errors::{MeditripError, Result};

/// Host session-history primitives
pub trait HistoryBackend {
    /// Append an entry, discarding any forward entries
    fn push_state(&mut self, path: &str) -> Result<()>;
    /// Move one entry back, returning the path that is now current
    fn back(&mut self) -> Result<Option<String>>;
    /// Move one entry forward, returning the path that is now current
    fn forward(&mut self) -> Result<Option<String>>;
    fn has_previous(&self) -> bool;
    fn current_path(&self) -> String;
}

#[derive(Debug)]
struct HistoryEntries {
    entries: Vec<String>,
    index: usize,
    sandboxed: bool,
}

/// In-process history stack
///
/// Clones share the same stack so a host (or a test) can keep a handle to
/// observe what the adapter wrote.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    inner: Rc<RefCell<HistoryEntries>>,
}

impl MemoryHistory {
    pub fn new(initial_path: &str) -> Self {
        Self {
            inner: Rc::new(RefCell::new(HistoryEntries {
                entries: vec![initial_path.to_string()],
                index: 0,
                sandboxed: false,
            })),
        }
    }

    /// Start from a full location such as `https://host/hospitals/x?ref=ad`
    pub fn from_location(location: &str) -> Result<Self> {
        Ok(Self::new(&location_path(location)?))
    }

    /// History that rejects every write, like a restricted iframe
    pub fn sandboxed(initial_path: &str) -> Self {
        let history = Self::new(initial_path);
        history.set_sandboxed(true);
        history
    }

    pub fn set_sandboxed(&self, sandboxed: bool) {
        self.inner.borrow_mut().sandboxed = sandboxed;
    }

    pub fn entries(&self) -> Vec<String> {
        self.inner.borrow().entries.clone()
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl HistoryBackend for MemoryHistory {
    fn push_state(&mut self, path: &str) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        if inner.sandboxed {
            return Err(MeditripError::HistoryWriteRejected(format!(
                "history is read-only in this environment (path {})",
                path
            )));
        }

        let keep = inner.index + 1;
        inner.entries.truncate(keep);
        inner.entries.push(path.to_string());
        inner.index = inner.entries.len() - 1;
        Ok(())
    }

    fn back(&mut self) -> Result<Option<String>> {
        let mut inner = self.inner.borrow_mut();
        if inner.index == 0 {
            return Ok(None);
        }
        inner.index -= 1;
        Ok(Some(inner.entries[inner.index].clone()))
    }

    fn forward(&mut self) -> Result<Option<String>> {
        let mut inner = self.inner.borrow_mut();
        if inner.index + 1 >= inner.entries.len() {
            return Ok(None);
        }
        inner.index += 1;
        Ok(Some(inner.entries[inner.index].clone()))
    }

    fn has_previous(&self) -> bool {
        self.inner.borrow().index > 0
    }

    fn current_path(&self) -> String {
        let inner = self.inner.borrow();
        inner.entries[inner.index].clone()
    }
}

/// Outcome of a back request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackOutcome {
    /// The host moved back; the popped path must be fed to the forward synchronizer
    Popped(String),
    /// No earlier entry exists; the caller applies its own fallback
    NoPrevious,
}

/// Fault-tolerant wrapper over a history backend
pub struct HistoryAdapter {
    backend: Box<dyn HistoryBackend>,
    rejected_writes: u64,
}

impl HistoryAdapter {
    pub fn new(backend: Box<dyn HistoryBackend>) -> Self {
        Self {
            backend,
            rejected_writes: 0,
        }
    }

    /// Mirror `path` into history; returns whether an entry was written
    pub fn push_path(&mut self, path: &str) -> bool {
        if self.backend.current_path() == path {
            debug!(path = path, "Path already current, skipping history write");
            return false;
        }

        match self.backend.push_state(path) {
            Ok(()) => {
                debug!(path = path, "History entry pushed");
                true
            }
            Err(e) => {
                self.rejected_writes += 1;
                warn!(path = path, error = %e, "Could not update address bar, keeping in-memory state");
                false
            }
        }
    }

    /// Ask the host to go back one entry
    pub fn go_back(&mut self) -> BackOutcome {
        if !self.backend.has_previous() {
            return BackOutcome::NoPrevious;
        }

        match self.backend.back() {
            Ok(Some(path)) => BackOutcome::Popped(path),
            Ok(None) => BackOutcome::NoPrevious,
            Err(e) => {
                warn!(error = %e, "Native back navigation failed");
                BackOutcome::NoPrevious
            }
        }
    }

    /// Ask the host to go forward one entry, returning the popped path
    pub fn go_forward(&mut self) -> Option<String> {
        match self.backend.forward() {
            Ok(path) => path,
            Err(e) => {
                warn!(error = %e, "Native forward navigation failed");
                None
            }
        }
    }

    pub fn current_path(&self) -> String {
        self.backend.current_path()
    }

    /// Number of writes the host refused since startup
    pub fn rejected_writes(&self) -> u64 {
        self.rejected_writes
    }
}

impl std::fmt::Debug for HistoryAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryAdapter")
            .field("current_path", &self.backend.current_path())
            .field("rejected_writes", &self.rejected_writes)
            .finish_non_exhaustive()
    }
}
