//! # API Facade
//!
//! The API layer is a **thin facade** over [`NoteStore`]. It is the single
//! entry point for UI clients (desktop webview commands, the CLI, tests).
//!
//! ## Role and Responsibilities
//!
//! The facade:
//! - **Dispatches** each command to the store
//! - **Translates errors** into [`CommandError`], the serializable
//!   caller-facing contract (`{"kind": "not_found", "message": "..."}`)
//! - **Exposes the push channel**: [`NotesApi::subscribe`] is the
//!   `notes_updated` event
//!
//! It holds no state of its own and adds no logic.
//!
//! ## Reconciling Clients
//!
//! A client that applies an edit optimistically (say, a drag reorder) must
//! treat it as provisional. On `Validation` or `Io`, it throws the local
//! edit away and adopts [`NotesApi::list_notes`] or the next pushed
//! snapshot. The store is the only source of truth.
//!
//! ## Sharing
//!
//! `NotesApi` is `Clone`; clones share one store, so every window or thread
//! can hold its own handle.

use crate::broadcast::{Subscription, SubscriptionId};
use crate::config::ToutdoConfig;
use crate::error::{ErrorKind, Result, ToutdoError};
use crate::model::{Note, NoteId};
use crate::store::{FsBackend, NoteStore, StorageBackend};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Error returned across the command boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandError {
    pub kind: ErrorKind,
    pub message: String,
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CommandError {}

impl From<ToutdoError> for CommandError {
    fn from(err: ToutdoError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

pub type CmdResult<T> = std::result::Result<T, CommandError>;

pub struct NotesApi<B: StorageBackend> {
    store: Arc<NoteStore<B>>,
}

impl<B: StorageBackend> Clone for NotesApi<B> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl NotesApi<FsBackend> {
    /// Opens the notes file named by `config`.
    pub fn open(config: &ToutdoConfig) -> Result<Self> {
        let path = config.notes_path()?;
        Self::with_backend(FsBackend::new(path))
    }
}

impl<B: StorageBackend> NotesApi<B> {
    pub fn with_backend(backend: B) -> Result<Self> {
        Ok(Self::new(NoteStore::open(backend)?))
    }

    pub fn new(store: NoteStore<B>) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    pub fn list_notes(&self) -> Vec<Note> {
        log::debug!("list_notes");
        self.store.list()
    }

    pub fn add_note(&self, content: &str) -> CmdResult<Note> {
        log::debug!("add_note ({} bytes)", content.len());
        Ok(self.store.add(content)?)
    }

    pub fn edit_note(&self, id: NoteId, content: &str) -> CmdResult<Note> {
        log::debug!("edit_note {}", id);
        Ok(self.store.edit(id, content)?)
    }

    pub fn delete_note(&self, id: NoteId) -> CmdResult<()> {
        log::debug!("delete_note {}", id);
        Ok(self.store.delete(id)?)
    }

    pub fn toggle_pin(&self, id: NoteId) -> CmdResult<Note> {
        log::debug!("toggle_pin {}", id);
        Ok(self.store.toggle_pin(id)?)
    }

    pub fn reorder_notes(&self, ordered_ids: &[NoteId]) -> CmdResult<()> {
        log::debug!("reorder_notes ({} ids)", ordered_ids.len());
        Ok(self.store.reorder(ordered_ids)?)
    }

    /// The `notes_updated` push channel.
    pub fn subscribe(&self) -> Subscription {
        self.store.subscribe()
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.store.unsubscribe(id)
    }

    pub fn notes_location(&self) -> PathBuf {
        self.store.location()
    }

    pub fn store(&self) -> &NoteStore<B> {
        &self.store
    }
}
