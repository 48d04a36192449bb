//! Persistent key-value storage for the session token.

use crate::SESSION_TOKEN_KEY;
use crate::error::session::SessionError;

use common::{ErrorLocation, SessionToken};

use std::collections::BTreeMap;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};

use log::{debug, info};

const STORAGE_FILE_NAME: &str = "storage.json";
const DATA_DIR_NAME: &str = "crm";

/// Get/set/clear access to the stored session token.
///
/// `clear` on an empty store is a no-op and must not fail.
pub trait SessionStore: Send + Sync {
    fn get(&self) -> Result<Option<SessionToken>, SessionError>;

    fn set(&self, token: &SessionToken) -> Result<(), SessionError>;

    fn clear(&self) -> Result<(), SessionError>;
}

// ============================================
// IN-MEMORY STORE
// ============================================

/// Process-local store. Used by tests and short-lived tools.
#[derive(Default)]
pub struct MemorySessionStore {
    token: RwLock<Option<SessionToken>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: SessionToken) -> Self {
        Self {
            token: RwLock::new(Some(token)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Result<Option<SessionToken>, SessionError> {
        let guard = self.token.read().map_err(|e| SessionError::Poisoned {
            message: e.to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;
        Ok(guard.clone())
    }

    fn set(&self, token: &SessionToken) -> Result<(), SessionError> {
        let mut guard = self.token.write().map_err(|e| SessionError::Poisoned {
            message: e.to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;
        *guard = Some(token.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        let mut guard = self.token.write().map_err(|e| SessionError::Poisoned {
            message: e.to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;
        *guard = None;
        Ok(())
    }
}

// ============================================
// FILE STORE
// ============================================

/// JSON key-value file that outlives the process, like browser local storage.
///
/// Other keys in the file are preserved. Writes go through a temp file and a
/// rename so a crash never leaves a half-written file behind.
pub struct FileSessionStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileSessionStore {
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join(STORAGE_FILE_NAME),
            write_lock: Mutex::new(()),
        }
    }

    /// `{data_dir}/crm`, where `storage.json` lives unless told otherwise.
    pub fn default_dir() -> Result<PathBuf, SessionError> {
        let data_dir = dirs::data_dir().ok_or_else(|| SessionError::DataDirNotFound {
            location: ErrorLocation::from(Location::caller()),
        })?;
        Ok(data_dir.join(DATA_DIR_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, SessionError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let contents = std::fs::read_to_string(&self.path).map_err(|e| SessionError::Read {
            location: ErrorLocation::from(Location::caller()),
            path: self.path.clone(),
            source: e,
        })?;

        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&contents).map_err(|e| SessionError::Corrupt {
            location: ErrorLocation::from(Location::caller()),
            path: self.path.clone(),
            reason: e.to_string(),
        })
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| SessionError::Write {
                location: ErrorLocation::from(Location::caller()),
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let json = serde_json::to_string_pretty(entries).map_err(|e| SessionError::Corrupt {
            location: ErrorLocation::from(Location::caller()),
            path: self.path.clone(),
            reason: e.to_string(),
        })?;

        let temp_path = self.path.with_extension("json.tmp");

        std::fs::write(&temp_path, json).map_err(|e| SessionError::Write {
            location: ErrorLocation::from(Location::caller()),
            path: temp_path.clone(),
            source: e,
        })?;

        std::fs::rename(&temp_path, &self.path).map_err(|e| SessionError::Write {
            location: ErrorLocation::from(Location::caller()),
            path: self.path.clone(),
            source: e,
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, ()>, SessionError> {
        self.write_lock.lock().map_err(|e| SessionError::Poisoned {
            message: e.to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self) -> Result<Option<SessionToken>, SessionError> {
        let entries = self.read_entries()?;
        Ok(entries.get(SESSION_TOKEN_KEY).map(SessionToken::new))
    }

    fn set(&self, token: &SessionToken) -> Result<(), SessionError> {
        let _guard = self.lock()?;

        let mut entries = self.read_entries()?;
        entries.insert(SESSION_TOKEN_KEY.to_string(), token.expose().to_string());
        self.write_entries(&entries)?;

        info!("Session token stored in {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        let _guard = self.lock()?;

        let mut entries = self.read_entries()?;
        if entries.remove(SESSION_TOKEN_KEY).is_none() {
            debug!("No session token to clear in {}", self.path.display());
            return Ok(());
        }

        self.write_entries(&entries)?;
        info!("Session token removed from {}", self.path.display());
        Ok(())
    }
}
