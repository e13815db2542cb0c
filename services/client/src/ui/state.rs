//! services/client/src/ui/state.rs
//!
//! Defines the application's shared state and the session context.

use std::sync::Arc;

use crate::config::Config;
use docutrack_core::domain::User;
use docutrack_core::ports::{GatewayService, SessionStore};

//=========================================================================================
// AppState (Shared Across All Surfaces)
//=========================================================================================

/// The shared application state, created once at startup and passed to
/// every surface.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<dyn GatewayService>,
    pub sessions: Arc<dyn SessionStore>,
    pub config: Arc<Config>,
}

//=========================================================================================
// SessionContext (One Signed-In Identity)
//=========================================================================================

/// The current authenticated identity, carried explicitly through the
/// surfaces instead of living in a global. Created on login or restored
/// from the session store at startup; torn down on logout.
pub struct SessionContext {
    pub user: User,
}

impl SessionContext {
    /// Restores the persisted identity, if any valid one exists.
    pub fn restore(sessions: &dyn SessionStore) -> Option<Self> {
        sessions.restore().map(|user| Self { user })
    }

    /// Starts a session for a freshly authenticated user and persists it.
    pub fn begin(sessions: &dyn SessionStore, user: User) -> Self {
        sessions.commit(&user);
        Self { user }
    }

    /// Ends the session: tells the service (best-effort) and removes the
    /// persisted identity.
    pub async fn end(self, state: &AppState) {
        state.gateway.end_session().await;
        state.sessions.clear();
    }
}
