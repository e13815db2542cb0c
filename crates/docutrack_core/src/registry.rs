//! crates/docutrack_core/src/registry.rs
//!
//! The in-memory transaction registry backing the dashboards: lifecycle
//! buckets for the current visibility scope, text search, a lazily
//! populated log-history cache, and the request sequence guard that keeps
//! overlapping refreshes from racing on shared view state.

use std::collections::HashMap;

use crate::domain::{LogEntry, Transaction, TransactionBuckets};

//=========================================================================================
// Text search
//=========================================================================================

/// Case-insensitive substring match against tracking number, sender name,
/// and document name. An empty term matches everything.
pub fn matches_filter(transaction: &Transaction, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let keyword = term.to_lowercase();
    transaction.tracking_no.to_lowercase().contains(&keyword)
        || transaction.sender_name.to_lowercase().contains(&keyword)
        || transaction.document_name.to_lowercase().contains(&keyword)
}

/// Applies [`matches_filter`] to a list, preserving order.
pub fn search<'a, I>(transactions: I, term: &str) -> Vec<&'a Transaction>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions
        .into_iter()
        .filter(|t| matches_filter(t, term))
        .collect()
}

//=========================================================================================
// The registry
//=========================================================================================

/// The view model for one signed-in identity: the bucketed transaction
/// lists most recently fetched from the service, plus per-tracking-number
/// log histories fetched on first expansion.
#[derive(Debug, Default)]
pub struct TransactionRegistry {
    buckets: TransactionBuckets,
    logs: HashMap<String, Vec<LogEntry>>,
}

impl TransactionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the bucketed lists with a freshly fetched partition.
    /// Cached log histories are kept; they are keyed by tracking number,
    /// which never changes.
    pub fn replace(&mut self, buckets: TransactionBuckets) {
        self.buckets = buckets;
    }

    /// The live transactions. The server's "ongoing" bucket is the data
    /// source, but membership is re-derived here through the one canonical
    /// status predicate so a drifting server-side bucketing cannot leak
    /// terminal rows into the active view.
    pub fn ongoing(&self) -> Vec<&Transaction> {
        self.buckets
            .ongoing
            .iter()
            .filter(|t| t.status.is_ongoing())
            .collect()
    }

    pub fn completed(&self) -> &[Transaction] {
        &self.buckets.completed
    }

    pub fn failed(&self) -> &[Transaction] {
        &self.buckets.failed
    }

    /// The history view: completed then failed, in fetch order.
    pub fn history(&self) -> Vec<&Transaction> {
        self.buckets
            .completed
            .iter()
            .chain(self.buckets.failed.iter())
            .collect()
    }

    /// Looks a transaction up by tracking number across all buckets.
    pub fn find(&self, tracking_no: &str) -> Option<&Transaction> {
        self.buckets
            .ongoing
            .iter()
            .chain(self.buckets.completed.iter())
            .chain(self.buckets.failed.iter())
            .find(|t| t.tracking_no == tracking_no)
    }

    /// The cached log history for a tracking number, if it was fetched.
    pub fn logs(&self, tracking_no: &str) -> Option<&[LogEntry]> {
        self.logs.get(tracking_no).map(Vec::as_slice)
    }

    /// Stores (or overwrites) the log history for a tracking number.
    pub fn store_logs(&mut self, tracking_no: &str, entries: Vec<LogEntry>) {
        self.logs.insert(tracking_no.to_string(), entries);
    }
}

//=========================================================================================
// Request sequencing
//=========================================================================================

/// An opaque token identifying one issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken(u64);

/// Guards a piece of shared view state against overlapping in-flight
/// requests: a response may only be applied when it carries the token of
/// the latest issued request, so a stale response that arrives late is
/// dropped instead of clobbering newer data.
#[derive(Debug, Default)]
pub struct RequestSeq {
    issued: u64,
}

impl RequestSeq {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a token for a request about to be sent. Issuing supersedes
    /// every earlier token.
    pub fn issue(&mut self) -> RequestToken {
        self.issued += 1;
        RequestToken(self.issued)
    }

    /// Whether a response carrying this token may update view state.
    pub fn accepts(&self, token: RequestToken) -> bool {
        token.0 == self.issued
    }
}

//=========================================================================================
// Tests
//=========================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DocumentType, Status};

    fn transaction(tracking_no: &str, sender: &str, document: &str, status: Status) -> Transaction {
        Transaction {
            tracking_no: tracking_no.to_string(),
            date_indorsement: "2024-03-01".to_string(),
            datetime_receive: "2024-03-01T09:30".to_string(),
            sender_name: sender.to_string(),
            organization: String::new(),
            document_type: DocumentType::CrmsLetter,
            scanned_file: String::new(),
            document_name: document.to_string(),
            forwarded_to: None,
            remarks: String::new(),
            status,
        }
    }

    #[test]
    fn filter_matches_any_of_the_three_fields_case_insensitively() {
        let t = transaction("TRK-ABC-1", "Alice", "Budget Request", Status::Ongoing);
        assert!(matches_filter(&t, "abc"));
        assert!(matches_filter(&t, "ALICE"));
        assert!(matches_filter(&t, "budget"));
        assert!(!matches_filter(&t, "zzz"));
    }

    #[test]
    fn empty_filter_returns_the_full_set_unchanged() {
        let list = vec![
            transaction("TRK-1", "Alice", "A", Status::Ongoing),
            transaction("TRK-2", "Bob", "B", Status::Ongoing),
        ];
        let hits = search(&list, "");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].tracking_no, "TRK-1");
        assert_eq!(hits[1].tracking_no, "TRK-2");
    }

    #[test]
    fn ongoing_view_drops_terminal_rows_even_if_the_server_misbuckets() {
        let mut registry = TransactionRegistry::new();
        registry.replace(TransactionBuckets {
            ongoing: vec![
                transaction("TRK-1", "Alice", "A", Status::Ongoing),
                // A terminal row the server left in the wrong bucket.
                transaction("TRK-2", "Bob", "B", Status::Completed),
            ],
            completed: vec![],
            failed: vec![],
        });

        let ongoing = registry.ongoing();
        assert_eq!(ongoing.len(), 1);
        assert_eq!(ongoing[0].tracking_no, "TRK-1");
    }

    #[test]
    fn history_concatenates_completed_then_failed() {
        let mut registry = TransactionRegistry::new();
        registry.replace(TransactionBuckets {
            ongoing: vec![],
            completed: vec![transaction("TRK-C", "Alice", "A", Status::Completed)],
            failed: vec![transaction("TRK-F", "Bob", "B", Status::Failed)],
        });

        let history = registry.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].tracking_no, "TRK-C");
        assert_eq!(history[1].tracking_no, "TRK-F");
    }

    #[test]
    fn log_cache_is_empty_until_stored_and_survives_bucket_refresh() {
        let mut registry = TransactionRegistry::new();
        assert!(registry.logs("TRK-1").is_none());

        registry.store_logs(
            "TRK-1",
            vec![LogEntry {
                date_time_received: "2024-03-01T09:30".to_string(),
                received_by: "Jane".to_string(),
                action_taken: "Received".to_string(),
                remarks: "Received".to_string(),
            }],
        );
        registry.replace(TransactionBuckets::default());

        assert_eq!(registry.logs("TRK-1").map(<[LogEntry]>::len), Some(1));
    }

    #[test]
    fn only_the_latest_issued_token_is_accepted() {
        let mut seq = RequestSeq::new();
        let first = seq.issue();
        let second = seq.issue();

        // The older response arrives after the newer request was issued.
        assert!(!seq.accepts(first));
        assert!(seq.accepts(second));
    }
}
