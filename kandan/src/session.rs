//! Login identity persistence.
//!
//! The board only needs to know who is using it: a single display name,
//! persisted so the user stays logged in across runs. Absence of the
//! stored value means logged out. Defines the [`IdentityStore`] trait
//! plus a file-backed implementation and an in-memory one for tests.

use std::path::PathBuf;

use parking_lot::Mutex;

/// Errors that can occur while reading or writing the stored identity.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The identity file could not be read or written.
    #[error("identity storage failed at {path}: {source}")]
    Storage {
        /// Path that was accessed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Could not determine the user's data directory.
    #[error("could not determine data directory (no HOME or XDG_DATA_HOME)")]
    NoDataDir,

    /// Login was attempted with an empty name.
    #[error("display name cannot be empty")]
    EmptyName,
}

/// Persists the current user identity as a single string value.
pub trait IdentityStore {
    /// Reads the stored identity; `None` means logged out.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the backing storage cannot be read.
    fn load(&self) -> Result<Option<String>, SessionError>;

    /// Stores the identity.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the backing storage cannot be written.
    fn save(&self, user: &str) -> Result<(), SessionError>;

    /// Removes the stored identity.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the backing storage cannot be written.
    fn clear(&self) -> Result<(), SessionError>;
}

/// Stores the identity in a single file under the platform data directory
/// (`<data_dir>/kandan/user`).
#[derive(Debug, Clone)]
pub struct FileIdentityStore {
    path: PathBuf,
}

impl FileIdentityStore {
    /// Creates a store at the default platform path.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoDataDir`] when the platform data directory
    /// cannot be determined.
    pub fn at_default_path() -> Result<Self, SessionError> {
        let dir = dirs::data_dir().ok_or(SessionError::NoDataDir)?;
        Ok(Self::at_path(dir.join("kandan").join("user")))
    }

    /// Creates a store at an explicit path.
    #[must_use]
    pub const fn at_path(path: PathBuf) -> Self {
        Self { path }
    }

    fn io_err(&self, source: std::io::Error) -> SessionError {
        SessionError::Storage {
            path: self.path.clone(),
            source,
        }
    }
}

impl IdentityStore for FileIdentityStore {
    fn load(&self) -> Result<Option<String>, SessionError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let name = contents.trim();
                if name.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(name.to_string()))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_err(e)),
        }
    }

    fn save(&self, user: &str) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| self.io_err(e))?;
        }
        std::fs::write(&self.path, user).map_err(|e| self.io_err(e))
    }

    fn clear(&self) -> Result<(), SessionError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_err(e)),
        }
    }
}

/// In-memory identity store for tests.
#[derive(Debug, Default)]
pub struct MemoryIdentityStore {
    value: Mutex<Option<String>>,
}

impl MemoryIdentityStore {
    /// Creates an empty (logged-out) store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdentityStore for MemoryIdentityStore {
    fn load(&self) -> Result<Option<String>, SessionError> {
        Ok(self.value.lock().clone())
    }

    fn save(&self, user: &str) -> Result<(), SessionError> {
        *self.value.lock() = Some(user.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self.value.lock() = None;
        Ok(())
    }
}

/// The current login session, restored from its store on construction.
pub struct Session<S: IdentityStore> {
    store: S,
    current: Option<String>,
}

impl<S: IdentityStore> Session<S> {
    /// Restores the session from the store.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the store cannot be read.
    pub fn restore(store: S) -> Result<Self, SessionError> {
        let current = store.load()?;
        if let Some(user) = &current {
            tracing::info!(user, "session restored");
        }
        Ok(Self { store, current })
    }

    /// The logged-in user, if any.
    #[must_use]
    pub fn user(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Logs in with the given display name and persists it.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::EmptyName`] for a blank name, or a storage
    /// error if persisting fails.
    pub fn login(&mut self, name: &str) -> Result<(), SessionError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SessionError::EmptyName);
        }
        self.store.save(name)?;
        self.current = Some(name.to_string());
        tracing::info!(user = name, "logged in");
        Ok(())
    }

    /// Logs out and clears the persisted identity.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the store cannot be written.
    pub fn logout(&mut self) -> Result<(), SessionError> {
        self.store.clear()?;
        if self.current.take().is_some() {
            tracing::info!("logged out");
        }
        Ok(())
    }
}
