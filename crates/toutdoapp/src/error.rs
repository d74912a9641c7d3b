use crate::model::NoteId;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToutdoError {
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Note not found: {0}")]
    NoteNotFound(NoteId),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The notes file exists but could not be read back. Never treated as
    /// "no notes yet".
    #[error("Notes file {} is corrupt: {reason}", path.display())]
    CorruptStore { path: PathBuf, reason: String },

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ToutdoError>;

/// Caller-facing classification of a [`ToutdoError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    NotFound,
    Io,
    CorruptStore,
    Config,
}

impl ToutdoError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NoteNotFound(_) => ErrorKind::NotFound,
            Self::Io(_) => ErrorKind::Io,
            Self::CorruptStore { .. } => ErrorKind::CorruptStore,
            Self::Config(_) => ErrorKind::Config,
        }
    }
}

impl From<confique::Error> for ToutdoError {
    fn from(err: confique::Error) -> Self {
        Self::Config(err.to_string())
    }
}
