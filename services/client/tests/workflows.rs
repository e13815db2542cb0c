//! services/client/tests/workflows.rs
//!
//! Exercises the multi-step workflows against an in-memory gateway: the
//! tracking-number binding protocol and the admin edit with its synthetic
//! change log.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use docutrack_core::domain::{
    DocumentType, LogEntry, NewLogEntry, NewTransaction, NewUser, Role, Status, TrackingProbe,
    Transaction, TransactionBuckets, User,
};
use docutrack_core::ports::{GatewayService, PortError, PortResult};

use client_lib::workflows::{bind_tracking, edit_transaction, BindOutcome, EditOutcome};

//=========================================================================================
// In-memory gateway
//=========================================================================================

#[derive(Default)]
struct FakeState {
    transactions: HashMap<String, Transaction>,
    logs: HashMap<String, Vec<LogEntry>>,
    bindings: Vec<(String, String)>,
    bind_calls: usize,
    log_calls: usize,
}

#[derive(Default)]
struct FakeGateway {
    state: Mutex<FakeState>,
}

impl FakeGateway {
    fn with_transaction(transaction: Transaction) -> Self {
        let gateway = Self::default();
        gateway
            .state
            .lock()
            .unwrap()
            .transactions
            .insert(transaction.tracking_no.clone(), transaction);
        gateway
    }

    fn logs_for(&self, tracking_no: &str) -> Vec<LogEntry> {
        self.state
            .lock()
            .unwrap()
            .logs
            .get(tracking_no)
            .cloned()
            .unwrap_or_default()
    }

    fn bind_calls(&self) -> usize {
        self.state.lock().unwrap().bind_calls
    }

    fn bindings(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().bindings.clone()
    }

    fn log_calls(&self) -> usize {
        self.state.lock().unwrap().log_calls
    }
}

#[async_trait]
impl GatewayService for FakeGateway {
    async fn authenticate(&self, _username: &str, _password: &str) -> PortResult<User> {
        Err(PortError::AuthenticationFailed)
    }

    async fn list_users(&self) -> PortResult<Vec<User>> {
        Ok(Vec::new())
    }

    async fn create_user(&self, _new_user: &NewUser) -> PortResult<String> {
        Ok("User created successfully".to_string())
    }

    async fn list_transactions(
        &self,
        _username: &str,
        _role: Role,
    ) -> PortResult<TransactionBuckets> {
        let state = self.state.lock().unwrap();
        let mut buckets = TransactionBuckets::default();
        for t in state.transactions.values() {
            match t.status {
                Status::Ongoing => buckets.ongoing.push(t.clone()),
                Status::Completed => buckets.completed.push(t.clone()),
                Status::Failed => buckets.failed.push(t.clone()),
            }
        }
        Ok(buckets)
    }

    async fn create_transaction(&self, draft: &NewTransaction) -> PortResult<String> {
        let mut state = self.state.lock().unwrap();
        let tracking_no = format!("TRK-{:03}", state.transactions.len() + 1);
        let transaction = Transaction {
            tracking_no: tracking_no.clone(),
            date_indorsement: draft.date_indorsement.clone(),
            datetime_receive: draft.datetime_receive.clone(),
            sender_name: draft.sender_name.clone(),
            organization: draft.organization.clone(),
            document_type: draft.document_type,
            scanned_file: draft.scanned_file.clone(),
            document_name: draft.document_name.clone(),
            forwarded_to: draft.forwarded_to,
            remarks: draft.remarks.clone(),
            status: draft.status,
        };
        state.transactions.insert(tracking_no.clone(), transaction);
        Ok(tracking_no)
    }

    async fn update_transaction(&self, transaction: &Transaction) -> PortResult<()> {
        let mut state = self.state.lock().unwrap();
        if !state.transactions.contains_key(&transaction.tracking_no) {
            return Err(PortError::RequestFailed("no such transaction".to_string()));
        }
        state
            .transactions
            .insert(transaction.tracking_no.clone(), transaction.clone());
        Ok(())
    }

    async fn check_tracking(&self, tracking_no: &str) -> PortResult<TrackingProbe> {
        let state = self.state.lock().unwrap();
        match state.transactions.get(tracking_no) {
            Some(t) => Ok(TrackingProbe {
                exists: true,
                status: Some(t.status),
            }),
            None => Ok(TrackingProbe {
                exists: false,
                status: None,
            }),
        }
    }

    async fn bind_user_to_tracking(&self, username: &str, tracking_no: &str) -> PortResult<()> {
        let mut state = self.state.lock().unwrap();
        state.bind_calls += 1;
        state
            .bindings
            .push((username.to_string(), tracking_no.to_string()));
        Ok(())
    }

    async fn append_log(&self, entry: &NewLogEntry) -> PortResult<()> {
        let mut state = self.state.lock().unwrap();
        state.log_calls += 1;
        if !state.transactions.contains_key(&entry.tracking_no) {
            return Err(PortError::TrackingNotFound);
        }
        state
            .logs
            .entry(entry.tracking_no.clone())
            .or_default()
            .push(LogEntry {
                date_time_received: entry.date_time_received.clone(),
                received_by: entry.received_by.clone(),
                action_taken: entry.action_taken.clone(),
                remarks: entry.remarks.clone(),
            });
        Ok(())
    }

    async fn fetch_logs(&self, tracking_no: &str) -> PortResult<Vec<LogEntry>> {
        Ok(self.logs_for(tracking_no))
    }

    async fn end_session(&self) {}
}

//=========================================================================================
// Fixtures
//=========================================================================================

fn sample_user() -> User {
    User {
        id: 7,
        full_name: "Jane Receiver".to_string(),
        username: "jane".to_string(),
        role: Role::User,
    }
}

fn sample_admin() -> User {
    User {
        id: 1,
        full_name: "Site Admin".to_string(),
        username: "admin".to_string(),
        role: Role::Admin,
    }
}

fn sample_transaction(tracking_no: &str, status: Status) -> Transaction {
    Transaction {
        tracking_no: tracking_no.to_string(),
        date_indorsement: "2024-03-01".to_string(),
        datetime_receive: "2024-03-02T09:30".to_string(),
        sender_name: "Alice".to_string(),
        organization: "Provincial Office".to_string(),
        document_type: DocumentType::CrmsLetter,
        scanned_file: String::new(),
        document_name: "Budget Request".to_string(),
        forwarded_to: None,
        remarks: String::new(),
        status,
    }
}

//=========================================================================================
// Tracking-number binding
//=========================================================================================

#[tokio::test]
async fn bind_unknown_tracking_number_makes_no_further_calls() {
    let gateway = FakeGateway::default();
    let outcome = bind_tracking(&gateway, &sample_user(), "TRK-404")
        .await
        .unwrap();

    assert!(matches!(outcome, BindOutcome::NotFound));
    assert_eq!(gateway.bind_calls(), 0);
    assert_eq!(gateway.log_calls(), 0);
}

#[tokio::test]
async fn bind_terminal_transaction_makes_no_further_calls() {
    let gateway =
        FakeGateway::with_transaction(sample_transaction("TRK-001", Status::Completed));
    let outcome = bind_tracking(&gateway, &sample_user(), "TRK-001")
        .await
        .unwrap();

    assert!(matches!(outcome, BindOutcome::Terminal(Status::Completed)));
    assert_eq!(gateway.bind_calls(), 0);
    assert_eq!(gateway.log_calls(), 0);
}

#[tokio::test]
async fn bind_ongoing_transaction_appends_one_received_log() {
    let gateway = FakeGateway::with_transaction(sample_transaction("TRK-001", Status::Ongoing));
    let user = sample_user();
    let outcome = bind_tracking(&gateway, &user, "TRK-001").await.unwrap();

    assert!(matches!(outcome, BindOutcome::Bound));
    assert_eq!(gateway.bind_calls(), 1);
    assert_eq!(
        gateway.bindings(),
        vec![("jane".to_string(), "TRK-001".to_string())]
    );

    let logs = gateway.logs_for("TRK-001");
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].received_by, "Jane Receiver");
    assert_eq!(logs[0].action_taken, "Received");
    assert_eq!(logs[0].remarks, "Received");
}

//=========================================================================================
// Admin edit
//=========================================================================================

#[tokio::test]
async fn edit_with_changes_appends_the_change_log() {
    let before = sample_transaction("TRK-001", Status::Ongoing);
    let gateway = FakeGateway::with_transaction(before.clone());

    let mut after = before.clone();
    after.sender_name = "Bob".to_string();

    let outcome = edit_transaction(&gateway, &sample_admin(), &before, &after)
        .await
        .unwrap();
    assert!(matches!(outcome, EditOutcome::UpdatedAndLogged));

    let logs = gateway.logs_for("TRK-001");
    assert_eq!(logs.len(), 1);
    assert_eq!(
        logs[0].action_taken,
        "Updated fields — sender_name: \"Alice\" → \"Bob\""
    );
    assert_eq!(logs[0].remarks, "Transaction updated by admin");
    assert_eq!(logs[0].received_by, "admin");
}

#[tokio::test]
async fn edit_without_changes_appends_nothing() {
    let before = sample_transaction("TRK-001", Status::Ongoing);
    let gateway = FakeGateway::with_transaction(before.clone());
    let after = before.clone();

    let outcome = edit_transaction(&gateway, &sample_admin(), &before, &after)
        .await
        .unwrap();
    assert!(matches!(outcome, EditOutcome::UpdatedNoChanges));
    assert_eq!(gateway.log_calls(), 0);
}

//=========================================================================================
// End-to-end lifecycle
//=========================================================================================

#[tokio::test]
async fn completed_transaction_refuses_further_logs() {
    let gateway = FakeGateway::default();
    let admin = sample_admin();

    let draft = NewTransaction {
        date_indorsement: "2024-03-01".to_string(),
        datetime_receive: "2024-03-02T09:30".to_string(),
        sender_name: "Alice".to_string(),
        organization: "Provincial Office".to_string(),
        document_type: DocumentType::CrmsLetter,
        scanned_file: String::new(),
        document_name: "Budget Request".to_string(),
        forwarded_to: None,
        remarks: String::new(),
        status: Status::Ongoing,
    };
    let tracking_no = gateway.create_transaction(&draft).await.unwrap();
    assert_eq!(tracking_no, "TRK-001");
    assert!(gateway.logs_for(&tracking_no).is_empty());

    // A manual entry while ongoing is accepted.
    gateway
        .append_log(&NewLogEntry {
            tracking_no: tracking_no.clone(),
            date_time_received: "2024-03-03T10:00".to_string(),
            received_by: "Jane Receiver".to_string(),
            action_taken: "Forwarded".to_string(),
            remarks: "to records".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(gateway.logs_for(&tracking_no).len(), 1);

    // Close the transaction out.
    let before = gateway
        .list_transactions("admin", Role::Admin)
        .await
        .unwrap()
        .ongoing
        .remove(0);
    let mut after = before.clone();
    after.status = Status::Completed;
    let outcome = edit_transaction(&gateway, &admin, &before, &after)
        .await
        .unwrap();
    assert!(matches!(outcome, EditOutcome::UpdatedAndLogged));
    assert_eq!(gateway.logs_for(&tracking_no).len(), 2);

    // Once completed, the append gate refuses new manual entries and binding
    // the number to another user aborts before any write.
    let completed = gateway
        .list_transactions("admin", Role::Admin)
        .await
        .unwrap()
        .completed
        .remove(0);
    assert!(!docutrack_core::lifecycle::log_append_allowed(completed.status));

    let binds_before = gateway.bind_calls();
    let outcome = bind_tracking(&gateway, &sample_user(), &tracking_no)
        .await
        .unwrap();
    assert!(matches!(outcome, BindOutcome::Terminal(Status::Completed)));
    assert_eq!(gateway.bind_calls(), binds_before);
    assert_eq!(gateway.logs_for(&tracking_no).len(), 2);
}
