use super::backend::StorageBackend;
use crate::broadcast::{Broadcaster, Snapshot, Subscription, SubscriptionId};
use crate::error::{Result, ToutdoError};
use crate::model::{normalize_content, Note, NoteCollection, NoteId};
use crate::order::Tiers;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

struct State {
    tiers: Tiers,
    next_id: NoteId,
    revision: u64,
}

impl State {
    fn collection(&self) -> NoteCollection {
        NoteCollection {
            next_id: self.next_id,
            notes: self.tiers.to_sequence(),
        }
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            revision: self.revision,
            notes: self.tiers.to_sequence(),
        }
    }
}

/// The authoritative note list.
///
/// Mutations run one at a time: each holds the writer lock across
/// apply → persist → broadcast. Readers only take the state lock, which a
/// mutation holds just long enough to swap in its change, so `list()` sees
/// the state before or after a mutation, never in between, and never waits
/// on disk.
pub struct NoteStore<B: StorageBackend> {
    backend: B,
    state: RwLock<State>,
    writer: Mutex<()>,
    broadcaster: Broadcaster,
}

impl<B: StorageBackend> NoteStore<B> {
    /// Loads the stored collection. A corrupt store is an error here, never
    /// an empty list.
    pub fn open(backend: B) -> Result<Self> {
        let collection = backend.load()?;
        let tiers = Tiers::from_sequence(collection.notes);
        log::info!(
            "opened {} with {} notes ({} pinned)",
            backend.location().display(),
            tiers.len(),
            tiers.pinned().len()
        );

        Ok(Self {
            backend,
            state: RwLock::new(State {
                tiers,
                next_id: collection.next_id,
                revision: 0,
            }),
            writer: Mutex::new(()),
            broadcaster: Broadcaster::new(),
        })
    }

    /// Notes in display order: pinned tier, then unpinned tier.
    pub fn list(&self) -> Vec<Note> {
        self.read().tiers.to_sequence()
    }

    /// Current list together with its revision.
    pub fn snapshot(&self) -> Snapshot {
        self.read().snapshot()
    }

    pub fn revision(&self) -> u64 {
        self.read().revision
    }

    pub fn get(&self, id: NoteId) -> Result<Note> {
        self.read()
            .tiers
            .get(id)
            .cloned()
            .ok_or(ToutdoError::NoteNotFound(id))
    }

    pub fn add(&self, content: &str) -> Result<Note> {
        let content = normalize_content(content)?;
        self.mutate("add", |state| {
            let id = state.next_id;
            state.next_id = id.next().ok_or_else(|| {
                ToutdoError::Validation("No note ids left to assign".to_string())
            })?;
            let note = Note::new(id, content);
            state.tiers.push_unpinned(note.clone());
            Ok(note)
        })
    }

    /// Replaces a note's content in place; tier and position are kept.
    pub fn edit(&self, id: NoteId, content: &str) -> Result<Note> {
        let content = normalize_content(content)?;
        self.mutate("edit", |state| {
            let note = state
                .tiers
                .get_mut(id)
                .ok_or(ToutdoError::NoteNotFound(id))?;
            note.content = content;
            note.touch();
            Ok(note.clone())
        })
    }

    pub fn delete(&self, id: NoteId) -> Result<()> {
        self.mutate("delete", |state| {
            state
                .tiers
                .remove(id)
                .map(|_| ())
                .ok_or(ToutdoError::NoteNotFound(id))
        })
    }

    /// Flips the pin flag and moves the note to the end of its new tier.
    pub fn toggle_pin(&self, id: NoteId) -> Result<Note> {
        self.mutate("toggle_pin", |state| state.tiers.toggle_pin(id).cloned())
    }

    /// Applies a drag-and-drop result. `ordered_ids` must name every note
    /// exactly once; each tier keeps its members in the order given.
    pub fn reorder(&self, ordered_ids: &[NoteId]) -> Result<()> {
        self.mutate("reorder", |state| state.tiers.reorder(ordered_ids))
    }

    pub fn subscribe(&self) -> Subscription {
        self.broadcaster.subscribe()
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.broadcaster.unsubscribe(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.broadcaster.subscriber_count()
    }

    pub fn location(&self) -> PathBuf {
        self.backend.location()
    }

    /// Runs one mutation under the writer lock.
    ///
    /// `apply` must either succeed or leave the state untouched. On success
    /// the revision advances, the new collection is saved and the snapshot
    /// is published. A failed save is returned to the caller, but the
    /// in-memory change stands and is still published, so observers agree
    /// with `list()`.
    fn mutate<T>(&self, op: &str, apply: impl FnOnce(&mut State) -> Result<T>) -> Result<T> {
        let _writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);

        let (value, collection, snapshot) = {
            let mut state = self.write();
            let value = apply(&mut *state)?;
            state.revision += 1;
            (value, state.collection(), state.snapshot())
        };

        let saved = self.backend.save(&collection);
        if let Err(e) = &saved {
            log::error!(
                "{} applied in memory but not saved to {}: {}",
                op,
                self.backend.location().display(),
                e
            );
        }

        let revision = snapshot.revision;
        let delivered = self.broadcaster.publish(snapshot);
        log::debug!(
            "{} -> revision {} ({} notes, {} observers)",
            op,
            revision,
            collection.notes.len(),
            delivered
        );

        saved.map(|()| value)
    }

    fn read(&self) -> RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
