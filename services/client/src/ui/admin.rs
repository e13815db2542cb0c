//! services/client/src/ui/admin.rs
//!
//! The administrator dashboard: every transaction in the system, the
//! completed/failed history, transaction creation and editing with the
//! synthetic change log, manual log entry, and user management.

use std::io;

use chrono::Local;
use tracing::error;

use docutrack_core::domain::{
    Department, DocumentType, NewTransaction, NewUser, Role, Status, Transaction,
};
use docutrack_core::registry::{search, RequestSeq, TransactionRegistry};

use crate::error::AppError;
use crate::ui::state::{AppState, SessionContext};
use crate::ui::{
    append_log_flow, prompt, prompt_choice, prompt_with_default, render_transactions,
    render_users, show_logs, DashboardExit,
};
use crate::workflows::{edit_transaction, EditOutcome};

pub async fn run(state: &AppState, ctx: &SessionContext) -> Result<DashboardExit, AppError> {
    let mut dashboard = AdminDashboard {
        state,
        ctx,
        registry: TransactionRegistry::new(),
        refresh_seq: RequestSeq::new(),
        filter: String::new(),
        history_filter: String::new(),
        history_view: HistoryView::All,
    };
    dashboard.refresh().await;
    dashboard.run_loop().await
}

/// The status filter on the history tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HistoryView {
    All,
    Completed,
    Failed,
}

struct AdminDashboard<'a> {
    state: &'a AppState,
    ctx: &'a SessionContext,
    registry: TransactionRegistry,
    refresh_seq: RequestSeq,
    filter: String,
    history_filter: String,
    history_view: HistoryView,
}

impl AdminDashboard<'_> {
    async fn run_loop(&mut self) -> Result<DashboardExit, AppError> {
        println!("\nWelcome, {}", self.ctx.user.full_name);
        println!("Role: {}", self.ctx.user.role);
        print_help();

        loop {
            let line = prompt("docutrack(admin)")?;
            let (command, argument) = match line.split_once(' ') {
                Some((c, a)) => (c, a.trim()),
                None => (line.as_str(), ""),
            };

            match command {
                "" => {}
                "help" => print_help(),
                "list" => {
                    let rows = search(self.registry.ongoing(), &self.filter);
                    render_transactions("Transactions", &rows);
                }
                "history" => self.render_history(),
                "search" => {
                    self.filter = argument.to_string();
                    let rows = search(self.registry.ongoing(), &self.filter);
                    render_transactions("Transactions", &rows);
                }
                "hsearch" => {
                    self.history_filter = argument.to_string();
                    self.render_history();
                }
                "show" => {
                    match argument {
                        "all" => self.history_view = HistoryView::All,
                        "completed" => self.history_view = HistoryView::Completed,
                        "failed" => self.history_view = HistoryView::Failed,
                        _ => {
                            println!("Usage: show <all|completed|failed>");
                            continue;
                        }
                    }
                    self.render_history();
                }
                "logs" => {
                    if argument.is_empty() {
                        println!("Usage: logs <tracking no>");
                    } else {
                        show_logs(self.state.gateway.as_ref(), &mut self.registry, argument).await;
                    }
                }
                "addlog" => {
                    if argument.is_empty() {
                        println!("Usage: addlog <tracking no>");
                    } else {
                        append_log_flow(
                            self.state.gateway.as_ref(),
                            &mut self.registry,
                            &self.ctx.user.full_name,
                            argument,
                        )
                        .await?;
                    }
                }
                "create" => self.create_transaction().await?,
                "edit" => {
                    if argument.is_empty() {
                        println!("Usage: edit <tracking no>");
                    } else {
                        self.edit_transaction(argument).await?;
                    }
                }
                "users" => self.list_users().await,
                "adduser" => self.add_user().await?,
                "refresh" => self.refresh().await,
                "logout" => return Ok(DashboardExit::Logout),
                "quit" => return Ok(DashboardExit::Quit),
                other => println!("Unknown command '{}'. Type 'help'.", other),
            }
        }
    }

    fn render_history(&self) {
        let rows = match self.history_view {
            HistoryView::All => self.registry.history(),
            HistoryView::Completed => self.registry.completed().iter().collect(),
            HistoryView::Failed => self.registry.failed().iter().collect(),
        };
        let rows = search(rows, &self.history_filter);
        render_transactions("Transaction History", &rows);
    }

    /// Refetches the full transaction partition. Guarded by a request token
    /// so an overlapping refresh cannot apply a stale response.
    async fn refresh(&mut self) {
        let token = self.refresh_seq.issue();
        match self
            .state
            .gateway
            .list_transactions(&self.ctx.user.username, self.ctx.user.role)
            .await
        {
            Ok(buckets) => {
                if self.refresh_seq.accepts(token) {
                    self.registry.replace(buckets);
                }
            }
            Err(e) => {
                error!("failed to load transactions: {}", e);
                println!("{}", e);
            }
        }
    }

    async fn create_transaction(&mut self) -> Result<(), AppError> {
        println!("Create New Transaction");
        let now = Local::now().naive_local();

        let draft = NewTransaction {
            date_indorsement: prompt_required("Date of Endorsement (YYYY-MM-DD)")?,
            datetime_receive: prompt_with_default(
                "Date and Time Received",
                &now.format("%Y-%m-%dT%H:%M").to_string(),
            )?,
            sender_name: prompt_required("Sender Name")?,
            organization: prompt("Office / Organization / Address")?,
            document_type: prompt_choice(
                "Document Type",
                &DocumentType::ALL,
                DocumentType::CrmsLetter,
            )?,
            scanned_file: prompt("Scanned File Link")?,
            document_name: prompt_required("Document Name")?,
            forwarded_to: prompt_department("Forwarded To", None)?,
            remarks: prompt("Remarks")?,
            status: prompt_choice("Status", &[Status::Ongoing, Status::Completed, Status::Failed], Status::Ongoing)?,
        };

        match self.state.gateway.create_transaction(&draft).await {
            Ok(tracking_no) => {
                println!("Transaction created successfully! Tracking No: {}", tracking_no);
                self.refresh().await;
            }
            Err(e) => {
                error!("transaction submit error: {}", e);
                println!("{}", e);
            }
        }
        Ok(())
    }

    async fn edit_transaction(&mut self, tracking_no: &str) -> Result<(), AppError> {
        let Some(before) = self.registry.find(tracking_no).cloned() else {
            println!("No transaction {} in the current lists.", tracking_no);
            return Ok(());
        };

        println!("Edit Transaction {}", before.tracking_no);
        let after = Transaction {
            tracking_no: before.tracking_no.clone(),
            date_indorsement: prompt_with_default("Date of Endorsement", &before.date_indorsement)?,
            datetime_receive: prompt_with_default("Date and Time Received", &before.datetime_receive)?,
            sender_name: prompt_with_default("Sender Name", &before.sender_name)?,
            organization: prompt_with_default("Office / Organization / Address", &before.organization)?,
            document_type: prompt_choice("Document Type", &DocumentType::ALL, before.document_type)?,
            scanned_file: prompt_with_default("Scanned File Link", &before.scanned_file)?,
            document_name: prompt_with_default("Document Name", &before.document_name)?,
            forwarded_to: prompt_department("Forwarded To", before.forwarded_to)?,
            remarks: prompt_with_default("Remarks", &before.remarks)?,
            status: prompt_choice(
                "Status",
                &[Status::Ongoing, Status::Completed, Status::Failed],
                before.status,
            )?,
        };

        match edit_transaction(self.state.gateway.as_ref(), &self.ctx.user, &before, &after).await {
            Ok(EditOutcome::UpdatedNoChanges) => {
                println!("Transaction updated successfully! (no fields changed)");
            }
            Ok(EditOutcome::UpdatedAndLogged) => {
                println!("Transaction updated successfully!");
            }
            Ok(EditOutcome::UpdatedLogFailed(e)) => {
                println!("Transaction updated, but the change log failed: {}", e);
            }
            Err(e) => {
                error!("error updating transaction: {}", e);
                println!("{}", e);
                return Ok(());
            }
        }

        // The edit went through; refresh the lists and this history.
        self.refresh().await;
        if let Ok(entries) = self.state.gateway.fetch_logs(tracking_no).await {
            self.registry.store_logs(tracking_no, entries);
        }
        Ok(())
    }

    async fn list_users(&self) {
        match self.state.gateway.list_users().await {
            Ok(users) => render_users(&users),
            Err(e) => {
                error!("error loading users: {}", e);
                println!("{}", e);
            }
        }
    }

    async fn add_user(&self) -> Result<(), AppError> {
        println!("Add New User");
        let new_user = NewUser {
            full_name: prompt_required("Full Name")?,
            username: prompt_required("Username")?,
            password: prompt_required("Password")?,
            role: prompt_choice("Role", &[Role::User, Role::Admin], Role::User)?,
        };

        match self.state.gateway.create_user(&new_user).await {
            Ok(message) => println!("{}", message),
            Err(e) => {
                error!("failed to create user: {}", e);
                println!("{}", e);
            }
        }
        Ok(())
    }
}

fn prompt_required(label: &str) -> io::Result<String> {
    loop {
        let value = prompt(label)?;
        if !value.is_empty() {
            return Ok(value);
        }
        println!("This field is required.");
    }
}

/// Prompts for one of the known departments, or none.
fn prompt_department(label: &str, default: Option<Department>) -> io::Result<Option<Department>> {
    let default_text = default.map(|d| d.to_string()).unwrap_or_default();
    loop {
        let answer = prompt(&format!(
            "{} (EDM/ASSD/TPDMD/EMD/HCDD/AMD, '-' for none) [{}]",
            label, default_text
        ))?;
        if answer.is_empty() {
            return Ok(default);
        }
        if answer == "-" {
            return Ok(None);
        }
        match answer.parse::<Department>() {
            Ok(department) => return Ok(Some(department)),
            Err(e) => println!("{}", e),
        }
    }
}

fn print_help() {
    println!("Commands:");
    println!("  list              show ongoing transactions");
    println!("  history           show the transaction history");
    println!("  show <bucket>     history bucket: all, completed, failed");
    println!("  search [term]     filter the transactions view (empty clears)");
    println!("  hsearch [term]    filter the history view (empty clears)");
    println!("  logs <no>         show the log history of a transaction");
    println!("  addlog <no>       append a log entry to an ongoing transaction");
    println!("  create            create a new transaction");
    println!("  edit <no>         edit a transaction (changes are logged)");
    println!("  users             list accounts");
    println!("  adduser           create an account");
    println!("  refresh           refetch the transaction lists");
    println!("  logout | quit");
}
