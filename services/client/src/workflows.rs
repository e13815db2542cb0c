//! services/client/src/workflows.rs
//!
//! The two intents that take more than one gateway call. Their steps are
//! issued strictly in order, each awaited before the next begins, and there
//! is no rollback; instead, a partial failure is reported to the caller as
//! an explicit outcome rather than left as silent inconsistency.

use chrono::Local;
use tracing::error;

use docutrack_core::domain::{Status, Transaction, User};
use docutrack_core::lifecycle::{decide_bind, received_log, synthesize_update_log, BindDecision};
use docutrack_core::ports::{GatewayService, PortError, PortResult};

//=========================================================================================
// Tracking-number binding (user-initiated)
//=========================================================================================

/// The result of the tracking-number binding protocol.
#[derive(Debug)]
pub enum BindOutcome {
    /// The tracking number does not exist. No bind or log call was issued.
    NotFound,
    /// The transaction is terminal. No bind or log call was issued.
    Terminal(Status),
    /// The transaction was bound and the automatic "Received" log appended.
    Bound,
    /// The transaction was bound, but appending the automatic "Received"
    /// log failed afterwards; the history is missing its initial entry.
    BoundWithoutLog(PortError),
}

/// Verifies a candidate tracking number and, when it is ongoing, binds it to
/// the acting user's view and appends the automatic "Received" log entry.
///
/// The verify step aborting (not found, terminal) issues no further calls.
/// A bind failure is an error; a log failure after a successful bind is the
/// acknowledged inconsistency window and is reported as `BoundWithoutLog`.
pub async fn bind_tracking(
    gateway: &dyn GatewayService,
    user: &User,
    tracking_no: &str,
) -> PortResult<BindOutcome> {
    let probe = gateway.check_tracking(tracking_no).await?;

    match decide_bind(probe) {
        BindDecision::NotFound => return Ok(BindOutcome::NotFound),
        BindDecision::Terminal(status) => return Ok(BindOutcome::Terminal(status)),
        BindDecision::Bindable => {}
    }

    gateway.bind_user_to_tracking(&user.username, tracking_no).await?;

    let entry = received_log(tracking_no, &user.full_name, Local::now().naive_local());
    match gateway.append_log(&entry).await {
        Ok(()) => Ok(BindOutcome::Bound),
        Err(e) => {
            error!("bound {} but the initial log failed: {}", tracking_no, e);
            Ok(BindOutcome::BoundWithoutLog(e))
        }
    }
}

//=========================================================================================
// Admin edit + synthetic change log
//=========================================================================================

/// The result of an admin edit.
#[derive(Debug)]
pub enum EditOutcome {
    /// The update was accepted; no field differed, so no log was appended.
    UpdatedNoChanges,
    /// The update was accepted and the synthetic change log appended.
    UpdatedAndLogged,
    /// The update was accepted but appending the change log failed; the
    /// history is missing the edit entry.
    UpdatedLogFailed(PortError),
}

/// Pushes an edited transaction to the service, then appends one synthetic
/// log entry enumerating every changed field, if any field changed at all.
///
/// An update failure is an error and no log call is issued. A log failure
/// after a successful update is reported as `UpdatedLogFailed`.
pub async fn edit_transaction(
    gateway: &dyn GatewayService,
    admin: &User,
    before: &Transaction,
    after: &Transaction,
) -> PortResult<EditOutcome> {
    gateway.update_transaction(after).await?;

    let entry = synthesize_update_log(before, after, &admin.username, Local::now().naive_local());
    let Some(entry) = entry else {
        return Ok(EditOutcome::UpdatedNoChanges);
    };

    match gateway.append_log(&entry).await {
        Ok(()) => Ok(EditOutcome::UpdatedAndLogged),
        Err(e) => {
            error!(
                "updated {} but the change log failed: {}",
                after.tracking_no, e
            );
            Ok(EditOutcome::UpdatedLogFailed(e))
        }
    }
}
