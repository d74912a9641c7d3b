use crate::error::Result;
use crate::model::NoteCollection;
use std::path::PathBuf;

/// Abstract interface for durable storage of the note collection.
/// This trait handles the "how" of storage (file vs memory),
/// while `NoteStore` handles the "what" (ordering, validation, notification).
pub trait StorageBackend: Send + Sync {
    /// Read the stored collection.
    /// Returns an empty collection if nothing has been stored yet.
    /// Returns `CorruptStore` if something is stored but cannot be parsed;
    /// that must never be mistaken for "no notes yet".
    fn load(&self) -> Result<NoteCollection>;

    /// Replace the stored collection.
    /// MUST be atomic (e.g. write to tmp then rename): after a crash the old
    /// or the new collection is readable, never a mix.
    fn save(&self, collection: &NoteCollection) -> Result<()>;

    /// Where the collection lives. For `MemBackend`, a virtual path.
    fn location(&self) -> PathBuf;
}
