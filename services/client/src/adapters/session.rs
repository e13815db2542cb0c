//! services/client/src/adapters/session.rs
//!
//! This module contains the session store adapter, which is the concrete
//! implementation of the `SessionStore` port from the `core` crate. It
//! persists the signed-in identity as a single JSON record in a file, the
//! desktop counterpart of a browser's well-known storage key.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

use docutrack_core::domain::{Role, User};
use docutrack_core::ports::SessionStore;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A file-backed session store that implements the `SessionStore` port.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Creates a new `FileSessionStore` persisting to the given path.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

//=========================================================================================
// "Impure" Persisted Record Struct
//=========================================================================================

#[derive(Serialize, Deserialize)]
struct SessionRecord {
    id: i64,
    full_name: String,
    username: String,
    role: String,
}

impl SessionRecord {
    fn from_domain(user: &User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name.clone(),
            username: user.username.clone(),
            role: user.role.to_string(),
        }
    }

    fn to_domain(self) -> Option<User> {
        let role = self.role.parse::<Role>().ok()?;
        Some(User {
            id: self.id,
            full_name: self.full_name,
            username: self.username,
            role,
        })
    }
}

//=========================================================================================
// `SessionStore` Trait Implementation
//=========================================================================================

impl SessionStore for FileSessionStore {
    fn restore(&self) -> Option<User> {
        let raw = fs::read_to_string(&self.path).ok()?;
        let user = serde_json::from_str::<SessionRecord>(&raw)
            .ok()
            .and_then(SessionRecord::to_domain);

        // Malformed persisted state is discarded, not kept around to fail
        // the same way on every startup.
        if user.is_none() {
            warn!("discarding malformed session state at {}", self.path.display());
            let _ = fs::remove_file(&self.path);
        }
        user
    }

    fn commit(&self, user: &User) {
        let record = SessionRecord::from_domain(user);
        let serialized = match serde_json::to_string_pretty(&record) {
            Ok(s) => s,
            Err(e) => {
                warn!("failed to serialize session: {}", e);
                return;
            }
        };
        if let Err(e) = fs::write(&self.path, serialized) {
            warn!("failed to persist session to {}: {}", self.path.display(), e);
        }
    }

    fn clear(&self) {
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("failed to remove session file {}: {}", self.path.display(), e);
            }
        }
    }
}

//=========================================================================================
// Tests
//=========================================================================================
