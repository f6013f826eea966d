//! One-time welcome message gate backed by an injected key-value store.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Key under which the dismissal flag is persisted.
pub const WELCOME_DISMISSED_KEY: &str = "guest-app-welcome-dismissed";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("state file I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("state file {path} is not a JSON object of strings: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Minimal string key-value persistence.
pub trait KeyValueStore {
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing storage cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-process store, used in tests and when no state path is configured.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
    writes: RefCell<usize>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `set` calls observed so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        *self.writes.borrow()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        *self.writes.borrow_mut() += 1;
        Ok(())
    }
}

/// A JSON object on disk. Missing files read as empty; parent directories are
/// created on first write.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(StoreError::Io {
                    path: self.path.display().to_string(),
                    source: e,
                })
            }
        };
        serde_json::from_str(&content).map_err(|e| StoreError::Corrupt {
            path: self.path.display().to_string(),
            source: e,
        })
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let io_err = |e| StoreError::Io {
            path: self.path.display().to_string(),
            source: e,
        };

        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let body = serde_json::to_string_pretty(&entries).map_err(|e| StoreError::Corrupt {
            path: self.path.display().to_string(),
            source: e,
        })?;
        std::fs::write(&self.path, body).map_err(io_err)
    }
}

/// Decides whether the welcome message should be shown.
///
/// The flag is read once at construction and written at most once.
pub struct WelcomeGate<S: KeyValueStore> {
    store: S,
    dismissed: bool,
}

impl<S: KeyValueStore> WelcomeGate<S> {
    /// # Errors
    ///
    /// Returns [`StoreError`] if the flag cannot be read.
    pub fn open(store: S) -> Result<Self, StoreError> {
        let dismissed = store.get(WELCOME_DISMISSED_KEY)?.is_some();
        Ok(Self { store, dismissed })
    }

    #[must_use]
    pub fn should_show(&self) -> bool {
        !self.dismissed
    }

    /// Record the dismissal. Later calls are no-ops.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the flag cannot be persisted; the gate stays
    /// open in that case.
    pub fn dismiss(&mut self) -> Result<(), StoreError> {
        if self.dismissed {
            return Ok(());
        }
        self.store.set(WELCOME_DISMISSED_KEY, "true")?;
        self.dismissed = true;
        tracing::debug!(key = WELCOME_DISMISSED_KEY, "welcome message dismissed");
        Ok(())
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }
}
