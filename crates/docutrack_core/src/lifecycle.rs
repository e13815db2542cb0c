//! crates/docutrack_core/src/lifecycle.rs
//!
//! The transaction lifecycle rules: which actions a transaction admits in
//! each status, how a tracking number is vetted before a user may bind to
//! it, and how the synthetic change log for an admin edit is derived.
//!
//! Everything here is pure. The multi-call orchestration that acts on these
//! decisions lives in the client service.

use chrono::NaiveDateTime;

use crate::domain::{NewLogEntry, Status, TrackingProbe, Transaction};

/// Timestamp format for user-entered and auto-generated "Received" logs.
const LOG_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Timestamp format for the synthetic log appended after an admin edit.
const EDIT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A log-append intent is permitted if and only if the transaction is still
/// ongoing. Callers must reject the intent outright when this is false, not
/// merely hide the control; the service independently refuses such writes.
pub fn log_append_allowed(status: Status) -> bool {
    status.is_ongoing()
}

//=========================================================================================
// Tracking-number binding
//=========================================================================================

/// The verdict on a candidate tracking number, decided from the existence
/// check alone. Anything except `Bindable` aborts the bind protocol before
/// any further network call is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindDecision {
    /// The tracking number does not exist.
    NotFound,
    /// The transaction exists but is terminal.
    Terminal(Status),
    /// The transaction is ongoing and may be bound to the user.
    Bindable,
}

pub fn decide_bind(probe: TrackingProbe) -> BindDecision {
    if !probe.exists {
        return BindDecision::NotFound;
    }
    match probe.status {
        Some(status) if status.is_terminal() => BindDecision::Terminal(status),
        _ => BindDecision::Bindable,
    }
}

/// The automatic log entry appended the moment a user successfully binds a
/// tracking number: action and remarks both "Received", received-by set to
/// the acting user's display name.
pub fn received_log(tracking_no: &str, display_name: &str, now: NaiveDateTime) -> NewLogEntry {
    NewLogEntry {
        tracking_no: tracking_no.to_string(),
        date_time_received: now.format(LOG_TIMESTAMP_FORMAT).to_string(),
        received_by: display_name.to_string(),
        action_taken: "Received".to_string(),
        remarks: "Received".to_string(),
    }
}

//=========================================================================================
// Change-log derivation on edit
//=========================================================================================

fn render_optional<T: std::fmt::Display>(value: &Option<T>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => String::new(),
    }
}

/// Lists every field (excluding the tracking number) whose value differs
/// between the pre-edit and post-edit records, rendered as
/// `name: "old" → "new"`. Comparison is strict value inequality per field.
pub fn changed_fields(before: &Transaction, after: &Transaction) -> Vec<String> {
    let pairs = [
        ("date_indorsement", before.date_indorsement.clone(), after.date_indorsement.clone()),
        ("datetime_receive", before.datetime_receive.clone(), after.datetime_receive.clone()),
        ("sender_name", before.sender_name.clone(), after.sender_name.clone()),
        ("organization", before.organization.clone(), after.organization.clone()),
        (
            "document_type",
            before.document_type.to_string(),
            after.document_type.to_string(),
        ),
        ("scanned_file", before.scanned_file.clone(), after.scanned_file.clone()),
        ("document_name", before.document_name.clone(), after.document_name.clone()),
        (
            "forwarded_to",
            render_optional(&before.forwarded_to),
            render_optional(&after.forwarded_to),
        ),
        ("remarks", before.remarks.clone(), after.remarks.clone()),
        ("status", before.status.to_string(), after.status.to_string()),
    ];

    pairs
        .into_iter()
        .filter(|(_, old, new)| old != new)
        .map(|(name, old, new)| format!("{}: \"{}\" → \"{}\"", name, old, new))
        .collect()
}

/// Builds the synthetic log entry describing an admin edit, or `None` when
/// no field actually changed. Received-by is the acting admin's username,
/// not their display name.
pub fn synthesize_update_log(
    before: &Transaction,
    after: &Transaction,
    admin_username: &str,
    now: NaiveDateTime,
) -> Option<NewLogEntry> {
    let changes = changed_fields(before, after);
    if changes.is_empty() {
        return None;
    }

    Some(NewLogEntry {
        tracking_no: after.tracking_no.clone(),
        date_time_received: now.format(EDIT_TIMESTAMP_FORMAT).to_string(),
        received_by: admin_username.to_string(),
        action_taken: format!("Updated fields — {}", changes.join(", ")),
        remarks: "Transaction updated by admin".to_string(),
    })
}

//=========================================================================================
// Tests
//=========================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Department, DocumentType};
    use chrono::NaiveDate;

    fn sample_transaction() -> Transaction {
        Transaction {
            tracking_no: "TRK-001".to_string(),
            date_indorsement: "2024-03-01".to_string(),
            datetime_receive: "2024-03-01T09:30".to_string(),
            sender_name: "Alice".to_string(),
            organization: "Provincial Office".to_string(),
            document_type: DocumentType::CrmsLetter,
            scanned_file: "https://drive.example/doc".to_string(),
            document_name: "Budget Request".to_string(),
            forwarded_to: Some(Department::Edm),
            remarks: "x".to_string(),
            status: Status::Ongoing,
        }
    }

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 2)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn log_append_only_while_ongoing() {
        assert!(log_append_allowed(Status::Ongoing));
        assert!(!log_append_allowed(Status::Completed));
        assert!(!log_append_allowed(Status::Failed));
    }

    #[test]
    fn bind_rejects_missing_tracking_numbers() {
        let probe = TrackingProbe { exists: false, status: None };
        assert_eq!(decide_bind(probe), BindDecision::NotFound);
    }

    #[test]
    fn bind_rejects_terminal_transactions() {
        for status in [Status::Completed, Status::Failed] {
            let probe = TrackingProbe { exists: true, status: Some(status) };
            assert_eq!(decide_bind(probe), BindDecision::Terminal(status));
        }
    }

    #[test]
    fn bind_allows_ongoing_transactions() {
        let probe = TrackingProbe { exists: true, status: Some(Status::Ongoing) };
        assert_eq!(decide_bind(probe), BindDecision::Bindable);
    }

    #[test]
    fn received_log_is_fully_prefilled() {
        let entry = received_log("TRK-001", "Jane Doe", noon());
        assert_eq!(entry.tracking_no, "TRK-001");
        assert_eq!(entry.action_taken, "Received");
        assert_eq!(entry.remarks, "Received");
        assert_eq!(entry.received_by, "Jane Doe");
        assert_eq!(entry.date_time_received, "2024-03-02T12:00");
    }

    #[test]
    fn diff_lists_only_changed_fields() {
        let before = sample_transaction();
        let mut after = before.clone();
        after.sender_name = "Bob".to_string();

        let changes = changed_fields(&before, &after);
        assert_eq!(changes, vec!["sender_name: \"Alice\" → \"Bob\"".to_string()]);
    }

    #[test]
    fn diff_renders_enum_fields_in_wire_form() {
        let before = sample_transaction();
        let mut after = before.clone();
        after.status = Status::Completed;
        after.forwarded_to = None;

        let changes = changed_fields(&before, &after);
        assert!(changes.contains(&"forwarded_to: \"EDM\" → \"\"".to_string()));
        assert!(changes.contains(&"status: \"ONGOING\" → \"COMPLETED\"".to_string()));
        assert_eq!(changes.len(), 2);
    }

    #[test]
    fn identical_records_synthesize_no_log() {
        let before = sample_transaction();
        let after = before.clone();
        assert!(synthesize_update_log(&before, &after, "admin", noon()).is_none());
    }

    #[test]
    fn edit_log_enumerates_changes() {
        let before = sample_transaction();
        let mut after = before.clone();
        after.sender_name = "Bob".to_string();
        after.remarks = "y".to_string();

        let entry = synthesize_update_log(&before, &after, "admin", noon())
            .expect("a changed record must synthesize a log");
        assert_eq!(
            entry.action_taken,
            "Updated fields — sender_name: \"Alice\" → \"Bob\", remarks: \"x\" → \"y\""
        );
        assert_eq!(entry.remarks, "Transaction updated by admin");
        assert_eq!(entry.received_by, "admin");
        assert_eq!(entry.date_time_received, "2024-03-02 12:00:00");
    }
}
