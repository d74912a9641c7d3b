//! # Display Order: Pinned Tier, Then Unpinned Tier
//!
//! The list a user sees is two lists glued together: every pinned note, then
//! every unpinned note. Inside each tier the order is manual, set by
//! drag-reordering or by appending.
//!
//! [`Tiers`] keeps the two tiers as separate vectors, so the display order is
//! a concatenation and never needs sorting.
//!
//! ## Ordering Rules
//!
//! - **Add**: new notes go to the end of the unpinned tier.
//! - **Toggle pin**: the note leaves its tier and goes to the *end* of the
//!   other one. Its old position in the tier it re-enters is not remembered,
//!   so pinning and unpinning twice can change where a note sits.
//! - **Delete**: the gap closes; later notes in the tier move up one.
//! - **Reorder**: the caller sends the full flat list as it dragged it. Tier
//!   membership comes from the notes' own `pinned` flags, never from where
//!   an id landed in the flat list. Each tier takes the caller's order
//!   filtered down to its own members.
//!
//! ```text
//! tiers:    pinned=[milk]   unpinned=[eggs, bread]
//! reorder:  [bread, eggs, milk]
//! result:   pinned=[milk]   unpinned=[bread, eggs]
//! display:  milk, bread, eggs
//! ```
//!
//! Every method validates before touching anything; a rejected call leaves
//! the tiers exactly as they were.

use crate::error::{Result, ToutdoError};
use crate::model::{Note, NoteId};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tiers {
    pinned: Vec<Note>,
    unpinned: Vec<Note>,
}

impl Tiers {
    /// Splits a display-ordered sequence into tiers. The split is stable, so
    /// a sequence whose pinned notes are interleaved (as the first release
    /// could write) still keeps each tier's relative order.
    pub fn from_sequence(notes: Vec<Note>) -> Self {
        let (pinned, unpinned) = notes.into_iter().partition(|n| n.pinned);
        Self { pinned, unpinned }
    }

    /// Notes in display order.
    pub fn to_sequence(&self) -> Vec<Note> {
        self.iter().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Note> {
        self.pinned.iter().chain(self.unpinned.iter())
    }

    pub fn len(&self) -> usize {
        self.pinned.len() + self.unpinned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn pinned(&self) -> &[Note] {
        &self.pinned
    }

    pub fn unpinned(&self) -> &[Note] {
        &self.unpinned
    }

    pub fn get(&self, id: NoteId) -> Option<&Note> {
        self.iter().find(|n| n.id == id)
    }

    pub fn get_mut(&mut self, id: NoteId) -> Option<&mut Note> {
        self.pinned
            .iter_mut()
            .chain(self.unpinned.iter_mut())
            .find(|n| n.id == id)
    }

    pub fn push_unpinned(&mut self, note: Note) {
        debug_assert!(!note.pinned);
        self.unpinned.push(note);
    }

    pub fn remove(&mut self, id: NoteId) -> Option<Note> {
        if let Some(pos) = self.pinned.iter().position(|n| n.id == id) {
            return Some(self.pinned.remove(pos));
        }
        let pos = self.unpinned.iter().position(|n| n.id == id)?;
        Some(self.unpinned.remove(pos))
    }

    /// Flips the pin flag and appends the note to the end of its new tier.
    pub fn toggle_pin(&mut self, id: NoteId) -> Result<&Note> {
        let mut note = self.remove(id).ok_or(ToutdoError::NoteNotFound(id))?;
        note.pinned = !note.pinned;
        note.touch();

        let tier = if note.pinned {
            &mut self.pinned
        } else {
            &mut self.unpinned
        };
        tier.push(note);
        Ok(&tier[tier.len() - 1])
    }

    /// Re-derives both tiers' manual order from a flat list of every id.
    pub fn reorder(&mut self, ordered_ids: &[NoteId]) -> Result<()> {
        self.check_permutation(ordered_ids)?;

        let rank: HashMap<NoteId, usize> = ordered_ids
            .iter()
            .enumerate()
            .map(|(pos, id)| (*id, pos))
            .collect();
        // Every id has a rank once the permutation check passed.
        let key = |n: &Note| rank.get(&n.id).copied().unwrap_or(usize::MAX);
        self.pinned.sort_by_key(key);
        self.unpinned.sort_by_key(key);
        Ok(())
    }

    fn check_permutation(&self, ordered_ids: &[NoteId]) -> Result<()> {
        let mut seen = HashSet::with_capacity(ordered_ids.len());
        for id in ordered_ids {
            if !seen.insert(*id) {
                return Err(ToutdoError::Validation(format!(
                    "Note {} appears more than once in the new order",
                    id
                )));
            }
            if self.get(*id).is_none() {
                return Err(ToutdoError::Validation(format!(
                    "Note {} is not in the list",
                    id
                )));
            }
        }

        if seen.len() != self.len() {
            let missing: Vec<String> = self
                .iter()
                .filter(|n| !seen.contains(&n.id))
                .map(|n| n.id.to_string())
                .collect();
            return Err(ToutdoError::Validation(format!(
                "New order is missing notes: {}",
                missing.join(", ")
            )));
        }
        Ok(())
    }
}
