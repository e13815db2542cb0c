//! services/client/src/adapters/gateway.rs
//!
//! This module contains the HTTP gateway adapter, which is the concrete
//! implementation of the `GatewayService` port from the `core` crate. It
//! handles all interactions with the external DocuTrack API using `reqwest`.
//!
//! Every operation is a single request/response round trip with no retry.
//! The service signals success with an application-level boolean flag in
//! addition to the HTTP status, and failures carry a human-readable message
//! that is forwarded to the caller when present.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use docutrack_core::domain::{
    LogEntry, NewLogEntry, NewTransaction, NewUser, Role, TrackingProbe, Transaction,
    TransactionBuckets, UnknownVariant, User,
};
use docutrack_core::ports::{GatewayService, PortError, PortResult};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An HTTP gateway that implements the `GatewayService` port.
#[derive(Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGateway {
    /// Creates a new `HttpGateway` against the given API base URL.
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    async fn post_json<B, R>(&self, endpoint: &str, body: &B) -> PortResult<R>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.url(endpoint))
            .json(body)
            .send()
            .await
            .map_err(network_error)?;
        decode(endpoint, response).await
    }

    async fn get_json<R>(&self, endpoint: &str, query: &[(&str, &str)]) -> PortResult<R>
    where
        R: DeserializeOwned,
    {
        let response = self
            .client
            .get(self.url(endpoint))
            .query(query)
            .send()
            .await
            .map_err(network_error)?;
        decode(endpoint, response).await
    }
}

fn network_error(err: reqwest::Error) -> PortError {
    PortError::RequestFailed(err.to_string())
}

fn bad_value(err: UnknownVariant) -> PortError {
    PortError::RequestFailed(err.to_string())
}

/// Decodes a JSON body. The service reports its own failures inside the
/// payload, so the body is decoded regardless of the HTTP status; only a
/// syntactically undecodable response is an error at this level.
async fn decode<R: DeserializeOwned>(endpoint: &str, response: reqwest::Response) -> PortResult<R> {
    let status = response.status();
    response
        .json::<R>()
        .await
        .map_err(|e| PortError::RequestFailed(format!("{} ({}): {}", endpoint, status, e)))
}

/// Picks the server-supplied failure message, falling back to a generic one.
fn failure_reason(message: Option<String>, error: Option<String>, fallback: &str) -> String {
    message
        .or(error)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

//=========================================================================================
// "Impure" Wire Record Structs
//=========================================================================================

#[derive(Deserialize)]
struct UserRecord {
    id: i64,
    full_name: String,
    username: String,
    role: String,
}

impl UserRecord {
    fn to_domain(self) -> PortResult<User> {
        let role = self.role.parse::<Role>().map_err(bad_value)?;
        Ok(User {
            id: self.id,
            full_name: self.full_name,
            username: self.username,
            role,
        })
    }
}

#[derive(Deserialize)]
struct TransactionRecord {
    tracking_no: String,
    #[serde(default)]
    date_indorsement: String,
    #[serde(default)]
    datetime_receive: String,
    #[serde(default)]
    sender_name: String,
    #[serde(default)]
    organization: String,
    document_type: String,
    #[serde(default)]
    scanned_file: String,
    #[serde(default)]
    document_name: String,
    #[serde(default)]
    forwarded_to: String,
    #[serde(default)]
    remarks: String,
    status: String,
}

impl TransactionRecord {
    fn to_domain(self) -> PortResult<Transaction> {
        let document_type = self.document_type.parse().map_err(bad_value)?;
        let forwarded_to = if self.forwarded_to.is_empty() {
            None
        } else {
            Some(self.forwarded_to.parse().map_err(bad_value)?)
        };
        let status = self.status.parse().map_err(bad_value)?;

        Ok(Transaction {
            tracking_no: self.tracking_no,
            date_indorsement: self.date_indorsement,
            datetime_receive: self.datetime_receive,
            sender_name: self.sender_name,
            organization: self.organization,
            document_type,
            scanned_file: self.scanned_file,
            document_name: self.document_name,
            forwarded_to,
            remarks: self.remarks,
            status,
        })
    }
}

fn transactions_to_domain(records: Vec<TransactionRecord>) -> PortResult<Vec<Transaction>> {
    records.into_iter().map(TransactionRecord::to_domain).collect()
}

#[derive(Deserialize)]
struct LogRecord {
    #[serde(default)]
    date_time_received: String,
    #[serde(default)]
    received_by: String,
    #[serde(default)]
    action_taken: String,
    #[serde(default)]
    remarks: String,
}

impl LogRecord {
    fn to_domain(self) -> LogEntry {
        LogEntry {
            date_time_received: self.date_time_received,
            received_by: self.received_by,
            action_taken: self.action_taken,
            remarks: self.remarks,
        }
    }
}

//=========================================================================================
// Request payloads
//=========================================================================================

#[derive(Serialize)]
struct LoginPayload<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct NewUserPayload<'a> {
    full_name: &'a str,
    username: &'a str,
    password: &'a str,
    role: String,
}

#[derive(Serialize)]
struct TransactionPayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    tracking_no: Option<&'a str>,
    date_indorsement: &'a str,
    datetime_receive: &'a str,
    sender_name: &'a str,
    organization: &'a str,
    document_type: String,
    scanned_file: &'a str,
    document_name: &'a str,
    forwarded_to: String,
    remarks: &'a str,
    status: String,
}

impl<'a> TransactionPayload<'a> {
    fn from_draft(draft: &'a NewTransaction) -> Self {
        Self {
            tracking_no: None,
            date_indorsement: &draft.date_indorsement,
            datetime_receive: &draft.datetime_receive,
            sender_name: &draft.sender_name,
            organization: &draft.organization,
            document_type: draft.document_type.to_string(),
            scanned_file: &draft.scanned_file,
            document_name: &draft.document_name,
            forwarded_to: draft.forwarded_to.map(|d| d.to_string()).unwrap_or_default(),
            remarks: &draft.remarks,
            status: draft.status.to_string(),
        }
    }

    fn from_transaction(transaction: &'a Transaction) -> Self {
        Self {
            tracking_no: Some(&transaction.tracking_no),
            date_indorsement: &transaction.date_indorsement,
            datetime_receive: &transaction.datetime_receive,
            sender_name: &transaction.sender_name,
            organization: &transaction.organization,
            document_type: transaction.document_type.to_string(),
            scanned_file: &transaction.scanned_file,
            document_name: &transaction.document_name,
            forwarded_to: transaction
                .forwarded_to
                .map(|d| d.to_string())
                .unwrap_or_default(),
            remarks: &transaction.remarks,
            status: transaction.status.to_string(),
        }
    }
}

#[derive(Serialize)]
struct TrackingPayload<'a> {
    tracking_no: &'a str,
}

#[derive(Serialize)]
struct BindPayload<'a> {
    username: &'a str,
    tracking_no: &'a str,
}

#[derive(Serialize)]
struct LogPayload<'a> {
    tracking_no: &'a str,
    date_time_received: &'a str,
    received_by: &'a str,
    action_taken: &'a str,
    remarks: &'a str,
}

//=========================================================================================
// Response envelopes
//=========================================================================================

#[derive(Deserialize)]
struct LoginResponse {
    #[serde(default)]
    user: Option<UserRecord>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
struct CreateUserResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
struct ListTransactionsResponse {
    success: bool,
    #[serde(default)]
    transactions: Vec<TransactionRecord>,
    #[serde(default)]
    completed: Vec<TransactionRecord>,
    #[serde(default)]
    failed: Vec<TransactionRecord>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Deserialize)]
struct CreateTransactionResponse {
    success: bool,
    #[serde(default)]
    tracking_no: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
struct AckResponse {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
struct CheckTrackingResponse {
    exists: bool,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Deserialize)]
struct LogsResponse {
    success: bool,
    #[serde(default)]
    logs: Vec<LogRecord>,
    #[serde(default)]
    message: Option<String>,
}

//=========================================================================================
// `GatewayService` Trait Implementation
//=========================================================================================

#[async_trait]
impl GatewayService for HttpGateway {
    async fn authenticate(&self, username: &str, password: &str) -> PortResult<User> {
        let payload = LoginPayload { username, password };
        let response: LoginResponse = self.post_json("login", &payload).await?;

        match response.user {
            Some(record) => record.to_domain(),
            None => {
                debug!(error = ?response.error, "login rejected");
                Err(PortError::AuthenticationFailed)
            }
        }
    }

    async fn list_users(&self) -> PortResult<Vec<User>> {
        // A successful response is a bare array of user records.
        let records: Vec<UserRecord> = self.get_json("get_users", &[]).await?;
        records.into_iter().map(UserRecord::to_domain).collect()
    }

    async fn create_user(&self, new_user: &NewUser) -> PortResult<String> {
        let payload = NewUserPayload {
            full_name: &new_user.full_name,
            username: &new_user.username,
            password: &new_user.password,
            role: new_user.role.to_string(),
        };
        let response: CreateUserResponse = self.post_json("create_user", &payload).await?;

        match response.message {
            Some(message) if response.error.is_none() => Ok(message),
            _ => Err(PortError::ValidationRejected(failure_reason(
                None,
                response.error,
                "Failed to create user",
            ))),
        }
    }

    async fn list_transactions(
        &self,
        username: &str,
        role: Role,
    ) -> PortResult<TransactionBuckets> {
        let role = role.to_string();
        let response: ListTransactionsResponse = self
            .get_json(
                "get_transactions",
                &[("role", role.as_str()), ("username", username)],
            )
            .await?;

        if !response.success {
            return Err(PortError::RequestFailed(failure_reason(
                response.message,
                None,
                "Failed to load transactions",
            )));
        }

        Ok(TransactionBuckets {
            ongoing: transactions_to_domain(response.transactions)?,
            completed: transactions_to_domain(response.completed)?,
            failed: transactions_to_domain(response.failed)?,
        })
    }

    async fn create_transaction(&self, draft: &NewTransaction) -> PortResult<String> {
        let payload = TransactionPayload::from_draft(draft);
        let response: CreateTransactionResponse =
            self.post_json("transactions", &payload).await?;

        if response.success {
            return response.tracking_no.ok_or_else(|| {
                PortError::RequestFailed("response is missing the tracking number".to_string())
            });
        }

        let reason = failure_reason(
            response.message,
            response.error,
            "Failed to create transaction",
        );
        // The service reports the duplicate sender + document name case
        // through its message text.
        if reason.contains("Duplicate entry") {
            Err(PortError::ValidationRejected(
                "This sender already has a transaction with the same document name".to_string(),
            ))
        } else {
            Err(PortError::RequestFailed(reason))
        }
    }

    async fn update_transaction(&self, transaction: &Transaction) -> PortResult<()> {
        let payload = TransactionPayload::from_transaction(transaction);
        let response: AckResponse = self.post_json("update_transaction", &payload).await?;

        if response.success {
            Ok(())
        } else {
            Err(PortError::RequestFailed(failure_reason(
                response.message,
                response.error,
                "Failed to update transaction",
            )))
        }
    }

    async fn check_tracking(&self, tracking_no: &str) -> PortResult<TrackingProbe> {
        let payload = TrackingPayload { tracking_no };
        let response: CheckTrackingResponse =
            self.post_json("check_transaction", &payload).await?;

        let status = match response.status {
            Some(s) if !s.is_empty() => Some(s.parse().map_err(bad_value)?),
            _ => None,
        };

        Ok(TrackingProbe {
            exists: response.exists,
            status,
        })
    }

    async fn bind_user_to_tracking(&self, username: &str, tracking_no: &str) -> PortResult<()> {
        let payload = BindPayload {
            username,
            tracking_no,
        };
        let response: AckResponse = self.post_json("save_user_transaction", &payload).await?;

        if response.success {
            Ok(())
        } else {
            Err(PortError::RequestFailed(failure_reason(
                response.message,
                response.error,
                "Failed to save the transaction to your dashboard",
            )))
        }
    }

    async fn append_log(&self, entry: &NewLogEntry) -> PortResult<()> {
        let payload = LogPayload {
            tracking_no: &entry.tracking_no,
            date_time_received: &entry.date_time_received,
            received_by: &entry.received_by,
            action_taken: &entry.action_taken,
            remarks: &entry.remarks,
        };
        let response: AckResponse = self.post_json("add_log", &payload).await?;

        if response.success {
            Ok(())
        } else {
            Err(PortError::RequestFailed(failure_reason(
                response.message,
                response.error,
                "Failed to save log entry",
            )))
        }
    }

    async fn fetch_logs(&self, tracking_no: &str) -> PortResult<Vec<LogEntry>> {
        let response: LogsResponse = self
            .get_json("get_logs", &[("tracking_no", tracking_no)])
            .await?;

        if !response.success {
            return Err(PortError::RequestFailed(failure_reason(
                response.message,
                None,
                "Failed to load logs",
            )));
        }

        Ok(response.logs.into_iter().map(LogRecord::to_domain).collect())
    }

    async fn end_session(&self) {
        // Best-effort: the user is logged out locally no matter what the
        // service says.
        if let Err(e) = self.client.post(self.url("logout")).send().await {
            debug!("logout call failed: {}", e);
        }
    }
}
