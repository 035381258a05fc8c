// Durable storage for the session snapshot

use crate::session::migration::decode_snapshot;
use crate::session::types::SessionState;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::{debug, info, warn};

/// Default snapshot file name inside the data directory
pub const SNAPSHOT_FILE_NAME: &str = "voting_data.json";

/// Storage error types
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed snapshot: {0}")]
    Malformed(String),

    #[error("Invalid storage path: {0}")]
    InvalidPath(String),
}

/// A single named key/value slot holding the serialized snapshot
pub trait StateStore {
    /// Read the stored snapshot, `None` when nothing has been stored yet
    fn read(&self) -> Result<Option<String>, StoreError>;

    /// Replace the stored snapshot
    fn write(&mut self, snapshot: &str) -> Result<(), StoreError>;
}

/// Snapshot stored as a JSON file on disk
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> Result<PathBuf, StoreError> {
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| StoreError::InvalidPath(self.path.display().to_string()))?;
        let mut temp_name = std::ffi::OsString::from(".");
        temp_name.push(file_name);
        temp_name.push(".tmp");
        Ok(self.path.with_file_name(temp_name))
    }
}

impl StateStore for FileStore {
    fn read(&self) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    fn write(&mut self, snapshot: &str) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        // Write the whole snapshot aside, then swap it in
        let temp_path = self.temp_path()?;
        std::fs::write(&temp_path, snapshot)?;
        std::fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

/// In-memory slot. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Rc<RefCell<Option<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds a snapshot
    pub fn with_snapshot<S: Into<String>>(snapshot: S) -> Self {
        Self {
            slot: Rc::new(RefCell::new(Some(snapshot.into()))),
        }
    }

    /// Current raw contents of the slot
    pub fn snapshot(&self) -> Option<String> {
        self.slot.borrow().clone()
    }
}

impl StateStore for MemoryStore {
    fn read(&self) -> Result<Option<String>, StoreError> {
        Ok(self.slot.borrow().clone())
    }

    fn write(&mut self, snapshot: &str) -> Result<(), StoreError> {
        *self.slot.borrow_mut() = Some(snapshot.to_string());
        Ok(())
    }
}

/// How the stored snapshot was turned into the starting state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Nothing was stored
    Empty,
    Loaded,
    /// A counts-only snapshot was upgraded; its history is empty
    Migrated,
    /// The snapshot could not be read or decoded and was ignored
    Discarded,
}

/// Load the session state from a store.
///
/// Never fails: a missing, unreadable or malformed snapshot yields the empty
/// state.
pub fn load_state<S: StateStore + ?Sized>(store: &S) -> SessionState {
    load_state_with_outcome(store).0
}

/// Like [`load_state`], also reporting what happened to the stored snapshot
pub fn load_state_with_outcome<S: StateStore + ?Sized>(
    store: &S,
) -> (SessionState, LoadOutcome) {
    let raw = match store.read() {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!("No stored snapshot, starting empty");
            return (SessionState::default(), LoadOutcome::Empty);
        }
        Err(e) => {
            warn!("Failed to read stored snapshot, starting empty: {}", e);
            return (SessionState::default(), LoadOutcome::Discarded);
        }
    };

    match decode_snapshot(&raw) {
        Ok(result) => {
            if result.migrated {
                info!("Migrated counts-only snapshot (no event log)");
            }
            info!(
                "Loaded snapshot: {} events, total {}",
                result.state.log.len(),
                result.state.counts.total()
            );
            let outcome = if result.migrated {
                LoadOutcome::Migrated
            } else {
                LoadOutcome::Loaded
            };
            (result.state, outcome)
        }
        Err(e) => {
            warn!("Discarding malformed snapshot: {}", e);
            (SessionState::default(), LoadOutcome::Discarded)
        }
    }
}

/// Serialize the whole session state and replace the stored snapshot
pub fn persist_state<S: StateStore + ?Sized>(
    store: &mut S,
    state: &SessionState,
) -> Result<(), StoreError> {
    let snapshot = serde_json::to_string(state)?;
    store.write(&snapshot)
}
