pub mod domain;
pub mod lifecycle;
pub mod ports;
pub mod registry;

pub use domain::{
    Department, DocumentType, LogEntry, NewLogEntry, NewTransaction, NewUser, Role, Status,
    TrackingProbe, Transaction, TransactionBuckets, UnknownVariant, User,
};
pub use lifecycle::{
    changed_fields, decide_bind, log_append_allowed, received_log, synthesize_update_log,
    BindDecision,
};
pub use ports::{GatewayService, PortError, PortResult, SessionStore};
pub use registry::{matches_filter, search, RequestSeq, RequestToken, TransactionRegistry};
