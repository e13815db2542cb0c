//! crates/docutrack_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the
//! core to be independent of the concrete HTTP gateway and of how the session
//! is persisted.

use async_trait::async_trait;

use crate::domain::{
    LogEntry, NewLogEntry, NewTransaction, NewUser, Role, Status, TrackingProbe, Transaction,
    TransactionBuckets, User,
};

//=========================================================================================
// Port Error and Result Types
//=========================================================================================

/// The error taxonomy shared by all port operations.
///
/// Every variant surfaces as an immediate, user-visible notification; none is
/// fatal to the application and none is retried automatically.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// The credentials were rejected by the external service.
    #[error("Invalid username or password")]
    AuthenticationFailed,

    /// The request could not be completed: a network failure, a non-success
    /// HTTP outcome, or an application-level failure flag in the payload.
    /// Carries the server-supplied message or a generic fallback.
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The external service refused the submitted fields, e.g. a duplicate
    /// sender + document name, or a duplicate username.
    #[error("Rejected: {0}")]
    ValidationRejected(String),

    /// The candidate tracking number does not exist.
    #[error("Tracking number not found")]
    TrackingNotFound,

    /// The tracking number exists but its transaction is terminal and can no
    /// longer be logged against.
    #[error("Transaction is already {0} and cannot be logged")]
    TrackingTerminal(Status),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The API gateway: one operation per capability of the external DocuTrack
/// service. Every operation is a single request/response round trip with no
/// retry; the gateway owns no business rules.
#[async_trait]
pub trait GatewayService: Send + Sync {
    // --- Accounts ---
    async fn authenticate(&self, username: &str, password: &str) -> PortResult<User>;

    async fn list_users(&self) -> PortResult<Vec<User>>;

    /// Creates an account. Returns the server's confirmation message, or
    /// fails with `ValidationRejected` on a duplicate username.
    async fn create_user(&self, new_user: &NewUser) -> PortResult<String>;

    // --- Transactions ---
    /// Lists the caller's visible transactions partitioned into lifecycle
    /// buckets. Admins see everything; users see what they bound to.
    async fn list_transactions(&self, username: &str, role: Role)
        -> PortResult<TransactionBuckets>;

    /// Creates a transaction. Returns the server-generated tracking number,
    /// or fails with `ValidationRejected` when the sender already has a
    /// transaction with the same document name.
    async fn create_transaction(&self, draft: &NewTransaction) -> PortResult<String>;

    /// Replaces every field of an existing transaction except its tracking
    /// number.
    async fn update_transaction(&self, transaction: &Transaction) -> PortResult<()>;

    // --- Tracking-number binding ---
    async fn check_tracking(&self, tracking_no: &str) -> PortResult<TrackingProbe>;

    /// Attaches an existing transaction to the given user's visibility scope.
    async fn bind_user_to_tracking(&self, username: &str, tracking_no: &str) -> PortResult<()>;

    // --- Log history ---
    async fn append_log(&self, entry: &NewLogEntry) -> PortResult<()>;

    async fn fetch_logs(&self, tracking_no: &str) -> PortResult<Vec<LogEntry>>;

    // --- Session ---
    /// Tells the service the session is over. Best-effort: failures are not
    /// surfaced to the user.
    async fn end_session(&self);
}

/// Holds the current authenticated identity across runs of the client.
/// No network calls; the persisted state is visible to subsequent startups.
pub trait SessionStore: Send + Sync {
    /// Reads the persisted identity. Malformed or unreadable state is
    /// discarded and treated as no session.
    fn restore(&self) -> Option<User>;

    /// Persists the identity; it becomes the current session. Persistence
    /// failures are not surfaced to the user; the session simply will not
    /// survive a restart.
    fn commit(&self, user: &User);

    /// Removes the persisted identity; the session becomes empty.
    fn clear(&self);
}
