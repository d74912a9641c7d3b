use crate::api::NotesApi;
use crate::store::FsBackend;
use std::path::PathBuf;
use tempfile::TempDir;

pub struct TestEnv {
    // Kept so the directory lives until the test is done
    pub _temp_dir: TempDir,
    pub root: PathBuf,
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
        let root = temp_dir.path().to_path_buf();
        Self {
            _temp_dir: temp_dir,
            root,
        }
    }

    pub fn notes_path(&self) -> PathBuf {
        self.root.join("notes.json")
    }

    pub fn backend(&self) -> FsBackend {
        FsBackend::new(self.notes_path())
    }

    /// Opens (or re-opens, simulating a restart) the store in this directory.
    pub fn open(&self) -> NotesApi<FsBackend> {
        NotesApi::with_backend(self.backend()).expect("failed to open notes store")
    }

    pub fn write_raw(&self, content: &str) {
        std::fs::write(self.notes_path(), content).expect("failed to write notes file");
    }
}
