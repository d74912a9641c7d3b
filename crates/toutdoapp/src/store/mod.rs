//! # Storage Layer
//!
//! This module owns the note list and its durable copy.
//!
//! ## Split Responsibilities
//!
//! 1. **[`backend::StorageBackend`]**: raw load/save of a whole
//!    [`NoteCollection`](crate::model::NoteCollection). Knows nothing about
//!    pins or ordering.
//! 2. **[`note_store::NoteStore`]**: the authoritative in-memory list. Owns
//!    ordering, validation, id assignment and change notification, and calls
//!    the backend after every mutation.
//!
//! ## Write Path
//!
//! ```text
//! command ─▶ validate ─▶ apply in memory ─▶ backend.save ─▶ broadcast
//!            (reject:     (revision + 1)    (tmp + rename)   (snapshot)
//!             no change)
//! ```
//!
//! The whole path runs under a single writer lock. There is no rollback: if
//! the save fails, the change stays in memory, observers still get the
//! snapshot, and the caller gets `Io` back to retry or report. Rolling back
//! could drop an edit the user already saw succeed.
//!
//! ## Corruption
//!
//! A missing file means "no notes yet". A file that exists but cannot be
//! parsed is `CorruptStore`, and the store refuses to open. Starting empty
//! there would overwrite the user's notes on the first save. Parseable files
//! are still corrupt if they break a model rule: duplicate ids, an id with no
//! successor, or a note whose content is blank.
//!
//! ## Implementations
//!
//! - [`fs_backend::FsBackend`]: one JSON file, atomic replace.
//! - [`mem_backend::MemBackend`]: for testing logic without filesystem I/O.
//!
//! ## Storage Layout
//!
//! ```text
//! <data dir>/
//! ├── notes.json             # {"version", "next_id", "notes": [...]}
//! └── .notes-{uuid}.tmp      # only while a save is in flight
//! ```

pub mod backend;
pub mod fs_backend;
pub mod mem_backend;
pub mod note_store;

pub use backend::StorageBackend;
pub use fs_backend::FsBackend;
pub use mem_backend::MemBackend;
pub use note_store::NoteStore;
