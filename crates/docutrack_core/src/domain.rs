//! crates/docutrack_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of the wire format and of any
//! serialization concerns; the service adapters own those.

use std::fmt;
use std::str::FromStr;

/// Raised when a string from the outside world does not name a known
/// enum variant.
#[derive(Debug, thiserror::Error)]
#[error("unrecognized {kind}: '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// The role of an account, which selects the dashboard it sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    User,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::User => write!(f, "user"),
        }
    }
}

impl FromStr for Role {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            _ => Err(UnknownVariant { kind: "role", value: s.to_string() }),
        }
    }
}

/// Represents an authenticated account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub full_name: String,
    pub username: String,
    pub role: Role,
}

/// The lifecycle status of a transaction. `Ongoing` is the initial
/// state; `Completed` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Ongoing,
    Completed,
    Failed,
}

impl Status {
    /// A terminal transaction accepts no further log entries.
    pub fn is_terminal(self) -> bool {
        matches!(self, Status::Completed | Status::Failed)
    }

    /// The single definition of "ongoing" used everywhere a bucket or a
    /// control needs to decide whether a transaction is still live.
    pub fn is_ongoing(self) -> bool {
        !self.is_terminal()
    }
}

impl Default for Status {
    fn default() -> Self {
        Status::Ongoing
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Ongoing => write!(f, "ONGOING"),
            Status::Completed => write!(f, "COMPLETED"),
            Status::Failed => write!(f, "FAILED"),
        }
    }
}

impl FromStr for Status {
    type Err = UnknownVariant;

    // The external service is not consistent about casing, so parsing
    // is case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ONGOING" => Ok(Status::Ongoing),
            "COMPLETED" => Ok(Status::Completed),
            "FAILED" => Ok(Status::Failed),
            _ => Err(UnknownVariant { kind: "status", value: s.to_string() }),
        }
    }
}

/// The kind of incoming document a transaction tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentType {
    CrmsLetter,
    HandcarryLetter,
}

impl DocumentType {
    /// The choices offered by the create/edit forms, in display order.
    pub const ALL: [DocumentType; 2] = [DocumentType::CrmsLetter, DocumentType::HandcarryLetter];
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentType::CrmsLetter => write!(f, "CRMS LETTER"),
            DocumentType::HandcarryLetter => write!(f, "HANDCARRY LETTER"),
        }
    }
}

impl FromStr for DocumentType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "CRMS LETTER" => Ok(DocumentType::CrmsLetter),
            "HANDCARRY LETTER" => Ok(DocumentType::HandcarryLetter),
            _ => Err(UnknownVariant { kind: "document type", value: s.to_string() }),
        }
    }
}

/// The department a document is forwarded to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Department {
    Edm,
    Assd,
    Tpdmd,
    Emd,
    Hcdd,
    Amd,
}

impl Department {
    /// The choices offered by the create/edit forms, in display order.
    pub const ALL: [Department; 6] = [
        Department::Edm,
        Department::Assd,
        Department::Tpdmd,
        Department::Emd,
        Department::Hcdd,
        Department::Amd,
    ];
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Department::Edm => "EDM",
            Department::Assd => "ASSD",
            Department::Tpdmd => "TPDMD",
            Department::Emd => "EMD",
            Department::Hcdd => "HCDD",
            Department::Amd => "AMD",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Department {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "EDM" => Ok(Department::Edm),
            "ASSD" => Ok(Department::Assd),
            "TPDMD" => Ok(Department::Tpdmd),
            "EMD" => Ok(Department::Emd),
            "HCDD" => Ok(Department::Hcdd),
            "AMD" => Ok(Department::Amd),
            _ => Err(UnknownVariant { kind: "department", value: s.to_string() }),
        }
    }
}

/// A routing-slip transaction for one incoming document.
///
/// The tracking number is assigned by the external service on creation
/// and is immutable afterwards; it is the sole join key to the
/// transaction's log history. Date fields carry the externally supplied
/// display strings unchanged; the client never does date arithmetic on
/// them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub tracking_no: String,
    pub date_indorsement: String,
    pub datetime_receive: String,
    pub sender_name: String,
    pub organization: String,
    pub document_type: DocumentType,
    pub scanned_file: String,
    pub document_name: String,
    pub forwarded_to: Option<Department>,
    pub remarks: String,
    pub status: Status,
}

/// The fields submitted to create a transaction. The tracking number is
/// generated server-side and returned from the creation call.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub date_indorsement: String,
    pub datetime_receive: String,
    pub sender_name: String,
    pub organization: String,
    pub document_type: DocumentType,
    pub scanned_file: String,
    pub document_name: String,
    pub forwarded_to: Option<Department>,
    pub remarks: String,
    pub status: Status,
}

/// One entry in a transaction's change history.
///
/// Entries are never mutated or deleted once created. The display
/// sequence number is not part of the entry; it is derived from fetch
/// order when a history is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub date_time_received: String,
    pub received_by: String,
    pub action_taken: String,
    pub remarks: String,
}

/// A log entry about to be appended to a transaction's history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLogEntry {
    pub tracking_no: String,
    pub date_time_received: String,
    pub received_by: String,
    pub action_taken: String,
    pub remarks: String,
}

/// The fields submitted by an admin to create an account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub full_name: String,
    pub username: String,
    pub password: String,
    pub role: Role,
}

/// The three lifecycle buckets returned by a transaction listing.
#[derive(Debug, Clone, Default)]
pub struct TransactionBuckets {
    pub ongoing: Vec<Transaction>,
    pub completed: Vec<Transaction>,
    pub failed: Vec<Transaction>,
}

/// The answer to a tracking-number existence check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackingProbe {
    pub exists: bool,
    pub status: Option<Status>,
}
