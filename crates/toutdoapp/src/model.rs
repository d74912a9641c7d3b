//! # Domain Model
//!
//! This module defines [`Note`], its identifier [`NoteId`], and
//! [`NoteCollection`], the unit the storage layer loads and saves.
//!
//! ## Content Normalization
//!
//! Notes are short one-liners typed into a list. Content is trimmed on the
//! way in; anything that trims to nothing is rejected by
//! [`normalize_content`]. Interior whitespace and newlines are kept as typed.
//!
//! ## Identity
//!
//! Ids are small integers handed out from a monotonically increasing counter
//! (`next_id`). The counter is persisted alongside the notes, so an id is
//! never handed out twice, even after the newest note is deleted and the
//! store is reopened.
//!
//! ## Legacy Records
//!
//! Notes written by the first desktop release only carry `id`, `content`
//! and `pinned`. Missing timestamps are filled with the load time.

use crate::error::{Result, ToutdoError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(u64);

impl NoteId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    /// The id after this one, or `None` once the id space is used up.
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for NoteId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Note {
    pub id: NoteId,
    pub content: String,
    pub pinned: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Builds an unpinned note. `content` is expected to be normalized already.
    pub fn new(id: NoteId, content: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            content,
            pinned: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

// Accepts records from the first release, which had no timestamps.
impl<'de> Deserialize<'de> for Note {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let helper = NoteHelper::deserialize(deserializer)?;
        let loaded_at = Utc::now();
        let created_at = helper.created_at.unwrap_or(loaded_at);

        Ok(Note {
            id: helper.id,
            content: helper.content,
            pinned: helper.pinned,
            created_at,
            updated_at: helper.updated_at.unwrap_or(created_at),
        })
    }
}

#[derive(Deserialize)]
struct NoteHelper {
    id: NoteId,
    content: String,
    #[serde(default)]
    pinned: bool,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

/// Everything the storage layer persists: the notes in display order plus
/// the id high-water mark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteCollection {
    pub next_id: NoteId,
    pub notes: Vec<Note>,
}

impl NoteCollection {
    pub fn empty() -> Self {
        Self {
            next_id: NoteId::new(1),
            notes: Vec::new(),
        }
    }

    /// Builds a collection, raising `next_id` above every id in `notes`.
    /// The floor saturates at `u64::MAX`; the store refuses to hand out an
    /// id that has no successor, so saturation never leads to reuse.
    pub fn new(next_id: NoteId, notes: Vec<Note>) -> Self {
        let floor = notes
            .iter()
            .map(|n| n.id.get().saturating_add(1))
            .max()
            .unwrap_or(1);
        Self {
            next_id: NoteId::new(next_id.get().max(floor)),
            notes,
        }
    }
}

impl Default for NoteCollection {
    fn default() -> Self {
        Self::empty()
    }
}

/// Trims `raw` and rejects it if nothing is left.
pub fn normalize_content(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ToutdoError::Validation(
            "Note content cannot be empty".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}
