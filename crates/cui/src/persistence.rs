use cropmatch_core::{PersistenceError, SessionRecord, SessionStore};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const SAVE_FILE_NAME: &str = ".cropmatch_user_data.json";

pub fn default_save_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("CROPMATCH_SAVE") {
        return Some(PathBuf::from(path));
    }
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(SAVE_FILE_NAME))
}

/// Session document stored as one JSON file, rewritten in full on each save.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for JsonFileStore {
    fn load(&mut self) -> Result<Option<SessionRecord>, PersistenceError> {
        let body = match fs::read_to_string(&self.path) {
            Ok(body) => body,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(PersistenceError::Read(format!(
                    "{}: {err}",
                    self.path.display()
                )))
            }
        };
        serde_json::from_str(&body)
            .map(Some)
            .map_err(|err| PersistenceError::Corrupt(format!("{}: {err}", self.path.display())))
    }

    fn save(&mut self, record: &SessionRecord) -> Result<(), PersistenceError> {
        let body = serde_json::to_string_pretty(record)
            .map_err(|err| PersistenceError::Write(err.to_string()))?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|err| PersistenceError::Write(err.to_string()))?;
            }
        }
        fs::write(&self.path, body)
            .map_err(|err| PersistenceError::Write(format!("{}: {err}", self.path.display())))
    }
}
