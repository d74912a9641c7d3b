use super::backend::StorageBackend;
use crate::error::{Result, ToutdoError};
use crate::model::{Note, NoteCollection, NoteId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Version written into new files. Files with a higher version are still
/// read; fields this build does not know are ignored.
pub const FORMAT_VERSION: u32 = 1;

pub const DEFAULT_FILE_NAME: &str = "notes.json";

#[derive(Serialize)]
struct NotesFileOut<'a> {
    version: u32,
    next_id: NoteId,
    notes: &'a [Note],
}

#[derive(Deserialize)]
struct NotesFileIn {
    #[serde(default)]
    version: u32,
    #[serde(default)]
    next_id: Option<NoteId>,
    notes: Vec<Note>,
}

/// Stores the whole collection as one JSON file.
pub struct FsBackend {
    path: PathBuf,
}

impl FsBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backend for `notes.json` inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(DEFAULT_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn corrupt(&self, reason: impl Into<String>) -> ToutdoError {
        ToutdoError::CorruptStore {
            path: self.path.clone(),
            reason: reason.into(),
        }
    }

    fn parse(&self, bytes: &[u8]) -> Result<NoteCollection> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(self.corrupt("file is empty"));
        }

        let value: Value = serde_json::from_slice(bytes).map_err(|e| self.corrupt(e.to_string()))?;
        let (next_id, notes) = match value {
            // First release: a bare array of {id, content, pinned}.
            Value::Array(_) => {
                let notes: Vec<Note> =
                    serde_json::from_value(value).map_err(|e| self.corrupt(e.to_string()))?;
                (NoteId::new(1), notes)
            }
            Value::Object(_) => {
                let file: NotesFileIn =
                    serde_json::from_value(value).map_err(|e| self.corrupt(e.to_string()))?;
                if file.version > FORMAT_VERSION {
                    log::warn!(
                        "{} was written by a newer version (format {}); unknown fields are ignored",
                        self.path.display(),
                        file.version
                    );
                }
                (file.next_id.unwrap_or(NoteId::new(1)), file.notes)
            }
            _ => return Err(self.corrupt("expected a JSON object or array")),
        };

        let mut seen = HashSet::with_capacity(notes.len());
        for note in &notes {
            if !seen.insert(note.id) {
                return Err(self.corrupt(format!("note id {} appears twice", note.id)));
            }
            if note.id.next().is_none() {
                return Err(self.corrupt(format!("note id {} is out of range", note.id)));
            }
            if note.content.trim().is_empty() {
                return Err(self.corrupt(format!("note {} has empty content", note.id)));
            }
        }

        Ok(NoteCollection::new(next_id, notes))
    }

    fn write_atomic(&self, dir: &Path, content: &[u8]) -> std::io::Result<()> {
        let tmp_path = dir.join(format!(".notes-{}.tmp", Uuid::new_v4()));

        let written = (|| {
            let mut file = File::create(&tmp_path)?;
            file.write_all(content)?;
            file.sync_all()?;
            fs::rename(&tmp_path, &self.path)
        })();

        if written.is_err() {
            let _ = fs::remove_file(&tmp_path);
        }
        written?;

        // Make the rename itself durable.
        #[cfg(unix)]
        File::open(dir)?.sync_all()?;

        Ok(())
    }
}

impl StorageBackend for FsBackend {
    fn load(&self) -> Result<NoteCollection> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(NoteCollection::empty());
            }
            Err(e) => return Err(ToutdoError::Io(e)),
        };
        self.parse(&bytes)
    }

    fn save(&self, collection: &NoteCollection) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }

        let file = NotesFileOut {
            version: FORMAT_VERSION,
            next_id: collection.next_id,
            notes: &collection.notes,
        };
        let content = serde_json::to_vec_pretty(&file).map_err(std::io::Error::from)?;
        self.write_atomic(&dir, &content)?;
        Ok(())
    }

    fn location(&self) -> PathBuf {
        self.path.clone()
    }
}
