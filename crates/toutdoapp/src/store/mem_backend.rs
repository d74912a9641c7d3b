use super::backend::StorageBackend;
use crate::error::{Result, ToutdoError};
use crate::model::NoteCollection;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// In-memory storage backend for testing.
///
/// Uses a `Mutex` because `NoteStore` is shared across threads.
pub struct MemBackend {
    stored: Mutex<Option<NoteCollection>>,
    simulate_write_error: AtomicBool,
    corrupt: AtomicBool,
    saves: AtomicUsize,
}

impl Default for MemBackend {
    fn default() -> Self {
        Self {
            stored: Mutex::new(None),
            simulate_write_error: AtomicBool::new(false),
            corrupt: AtomicBool::new(false),
            saves: AtomicUsize::new(0),
        }
    }
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend that already holds `collection`, as if saved by an earlier run.
    pub fn with_collection(collection: NoteCollection) -> Self {
        let backend = Self::default();
        *backend.lock() = Some(collection);
        backend
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.store(simulate, Ordering::SeqCst);
    }

    /// Make the next loads fail as if the stored bytes were garbage.
    pub fn set_corrupt(&self, corrupt: bool) {
        self.corrupt.store(corrupt, Ordering::SeqCst);
    }

    /// What the last successful save stored.
    pub fn stored(&self) -> Option<NoteCollection> {
        self.lock().clone()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<NoteCollection>> {
        self.stored
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl StorageBackend for MemBackend {
    fn load(&self) -> Result<NoteCollection> {
        if self.corrupt.load(Ordering::SeqCst) {
            return Err(ToutdoError::CorruptStore {
                path: self.location(),
                reason: "simulated corruption".to_string(),
            });
        }
        Ok(self.lock().clone().unwrap_or_default())
    }

    fn save(&self, collection: &NoteCollection) -> Result<()> {
        if self.simulate_write_error.load(Ordering::SeqCst) {
            return Err(ToutdoError::Io(std::io::Error::other(
                "Simulated write error",
            )));
        }
        *self.lock() = Some(collection.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn location(&self) -> PathBuf {
        PathBuf::from("memory://notes.json")
    }
}
