//! services/client/src/ui/mod.rs
//!
//! The presentation surfaces: a login form and two role-specific dashboards,
//! rendered as an interactive terminal application. Shared prompting,
//! rendering, and the add-log flow live here; the per-role command loops
//! live in `admin` and `user`.

pub mod admin;
pub mod login;
pub mod state;
pub mod user;

pub use state::{AppState, SessionContext};

use std::io::{self, Write};

use chrono::Local;
use tracing::error;

use docutrack_core::domain::{LogEntry, NewLogEntry, Transaction, User};
use docutrack_core::lifecycle::log_append_allowed;
use docutrack_core::ports::{GatewayService, PortError};
use docutrack_core::registry::TransactionRegistry;

use crate::error::AppError;

/// How a dashboard loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardExit {
    /// Tear the session down and return to the login form.
    Logout,
    /// Leave the application; the session stays persisted.
    Quit,
}

//=========================================================================================
// Prompting
//=========================================================================================

pub(crate) fn prompt(label: &str) -> io::Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Prompts with a prefilled value; an empty answer keeps it.
pub(crate) fn prompt_with_default(label: &str, default: &str) -> io::Result<String> {
    let value = prompt(&format!("{} [{}]", label, default))?;
    Ok(if value.is_empty() { default.to_string() } else { value })
}

/// Prompts for one of a fixed list of choices by number; an empty answer
/// picks the default.
pub(crate) fn prompt_choice<T>(label: &str, choices: &[T], default: T) -> io::Result<T>
where
    T: Copy + PartialEq + std::fmt::Display,
{
    loop {
        for (i, choice) in choices.iter().enumerate() {
            let marker = if *choice == default { "*" } else { " " };
            println!("  {}{}) {}", marker, i + 1, choice);
        }
        let answer = prompt(label)?;
        if answer.is_empty() {
            return Ok(default);
        }
        match answer.parse::<usize>() {
            Ok(n) if n >= 1 && n <= choices.len() => return Ok(choices[n - 1]),
            _ => println!("Pick a number between 1 and {}.", choices.len()),
        }
    }
}

//=========================================================================================
// Rendering
//=========================================================================================

pub(crate) fn render_transactions(title: &str, rows: &[&Transaction]) {
    println!("\n{}", title);
    if rows.is_empty() {
        println!("  No records found.");
        return;
    }
    println!(
        "  {:<14} {:<12} {:<17} {:<16} {:<17} {:<22} {:<7} {:<9}",
        "Tracking No", "Endorsed", "Received", "Sender", "Doc Type", "Document Name", "Fwd To", "Status"
    );
    for t in rows {
        let forwarded = t.forwarded_to.map(|d| d.to_string()).unwrap_or_default();
        println!(
            "  {:<14} {:<12} {:<17} {:<16} {:<17} {:<22} {:<7} {:<9}",
            t.tracking_no,
            t.date_indorsement,
            t.datetime_receive,
            t.sender_name,
            t.document_type.to_string(),
            t.document_name,
            forwarded,
            t.status.to_string(),
        );
    }
}

pub(crate) fn render_logs(tracking_no: &str, entries: &[LogEntry]) {
    println!("\nTransaction Logs for {}", tracking_no);
    if entries.is_empty() {
        println!("  No logs yet.");
        return;
    }
    println!(
        "  {:<3} {:<17} {:<16} {:<30} {}",
        "#", "Date & Time", "Received By", "Action Taken", "Remarks"
    );
    // The sequence number is display-only, derived from fetch order.
    for (idx, log) in entries.iter().enumerate() {
        println!(
            "  {:<3} {:<17} {:<16} {:<30} {}",
            idx + 1,
            log.date_time_received,
            log.received_by,
            log.action_taken,
            log.remarks,
        );
    }
}

pub(crate) fn render_users(users: &[User]) {
    println!("\nUser Management");
    if users.is_empty() {
        println!("  No users found.");
        return;
    }
    println!("  {:<5} {:<24} {:<16} {}", "ID", "Full Name", "Username", "Role");
    for u in users {
        println!("  {:<5} {:<24} {:<16} {}", u.id, u.full_name, u.username, u.role);
    }
}

//=========================================================================================
// Shared flows
//=========================================================================================

/// Fetches a transaction's log history into the cache on first expansion and
/// renders it. Subsequent views reuse the cached copy.
pub(crate) async fn show_logs(
    gateway: &dyn GatewayService,
    registry: &mut TransactionRegistry,
    tracking_no: &str,
) {
    if registry.logs(tracking_no).is_none() {
        match gateway.fetch_logs(tracking_no).await {
            Ok(entries) => registry.store_logs(tracking_no, entries),
            Err(e) => {
                error!("failed to fetch logs for {}: {}", tracking_no, e);
                println!("{}", e);
                return;
            }
        }
    }
    if let Some(entries) = registry.logs(tracking_no) {
        render_logs(tracking_no, entries);
    }
}

/// The manual add-log form. Rejects the intent outright when the transaction
/// is terminal; received-by is prefilled from the acting user and read-only.
pub(crate) async fn append_log_flow(
    gateway: &dyn GatewayService,
    registry: &mut TransactionRegistry,
    acting_name: &str,
    tracking_no: &str,
) -> Result<(), AppError> {
    let Some(transaction) = registry.find(tracking_no) else {
        println!("No transaction {} on this dashboard.", tracking_no);
        return Ok(());
    };
    if !log_append_allowed(transaction.status) {
        println!("{}", PortError::TrackingTerminal(transaction.status));
        return Ok(());
    }

    println!("Add Log for {}", tracking_no);
    let action_taken = prompt("Action Taken")?;
    let remarks = prompt("Remarks")?;
    let now = Local::now().naive_local().format("%Y-%m-%dT%H:%M").to_string();
    let date_time_received = prompt_with_default("Date & Time Received", &now)?;
    println!("Received By: {}", acting_name);

    let entry = NewLogEntry {
        tracking_no: tracking_no.to_string(),
        date_time_received,
        received_by: acting_name.to_string(),
        action_taken,
        remarks,
    };

    match gateway.append_log(&entry).await {
        Ok(()) => {
            println!("Log added successfully!");
            // Refresh this one history so the new entry shows immediately.
            if let Ok(entries) = gateway.fetch_logs(tracking_no).await {
                registry.store_logs(tracking_no, entries);
            }
        }
        Err(e) => {
            error!("failed to add log for {}: {}", tracking_no, e);
            println!("{}", e);
        }
    }
    Ok(())
}
