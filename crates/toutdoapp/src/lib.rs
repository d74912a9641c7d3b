//! # Tout-Do Architecture
//!
//! Tout-Do is a **UI-agnostic note list library**. A desktop window, a CLI
//! or a test harness are all just clients of the same store.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  UI clients (desktop webview, crates/toutdo CLI)            │
//! │  - Render snapshots, send commands, listen for pushes       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade: list/add/edit/delete/toggle_pin/reorder     │
//! │  - Serializable CommandError contract                       │
//! │  - notes_updated push channel (subscribe/unsubscribe)       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Note Store (store/note_store.rs + order.rs + broadcast.rs) │
//! │  - Pinned tier, then unpinned tier, each in manual order    │
//! │  - Single writer, consistent concurrent reads               │
//! │  - Persist, then broadcast, on every mutation               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Backends (store/)                                  │
//! │  - FsBackend (production JSON file), MemBackend (testing)   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! Nothing in this crate writes to stdout/stderr or exits the process.
//! Diagnostics go through the `log` facade; the binary decides where they
//! end up.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`store`]: Note store and storage backends
//! - [`order`]: Pinned/unpinned tier ordering
//! - [`broadcast`]: Snapshot fan-out to observers
//! - [`model`]: Core data types (`Note`, `NoteId`, `NoteCollection`)
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod api;
pub mod broadcast;
pub mod config;
pub mod error;
pub mod model;
pub mod order;
pub mod store;

#[cfg(feature = "test_utils")]
pub mod test_utils;

pub use api::{CmdResult, CommandError, NotesApi};
pub use broadcast::{Snapshot, Subscription, SubscriptionId};
pub use error::{ErrorKind, Result, ToutdoError};
pub use model::{Note, NoteId};
