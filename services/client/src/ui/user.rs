//! services/client/src/ui/user.rs
//!
//! The general-user dashboard: the user's bound transactions and their
//! history, tracking-number binding, and manual log entry.

use tracing::error;

use docutrack_core::domain::Status;
use docutrack_core::registry::{search, RequestSeq, TransactionRegistry};

use crate::error::AppError;
use crate::ui::state::{AppState, SessionContext};
use crate::ui::{append_log_flow, prompt, render_transactions, show_logs, DashboardExit};
use crate::workflows::{bind_tracking, BindOutcome};

pub async fn run(state: &AppState, ctx: &SessionContext) -> Result<DashboardExit, AppError> {
    let mut dashboard = UserDashboard {
        state,
        ctx,
        registry: TransactionRegistry::new(),
        refresh_seq: RequestSeq::new(),
        filter: String::new(),
        history_filter: String::new(),
    };
    dashboard.refresh().await;
    dashboard.run_loop().await
}

struct UserDashboard<'a> {
    state: &'a AppState,
    ctx: &'a SessionContext,
    registry: TransactionRegistry,
    refresh_seq: RequestSeq,
    filter: String,
    history_filter: String,
}

impl UserDashboard<'_> {
    async fn run_loop(&mut self) -> Result<DashboardExit, AppError> {
        println!("\nWelcome, {}", self.ctx.user.full_name);
        println!("Logged in as {}", self.ctx.user.role);
        print_help();

        loop {
            let line = prompt("docutrack")?;
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
                "history" => {
                    let rows = search(self.registry.history(), &self.history_filter);
                    render_transactions("Transaction History", &rows);
                }
                "search" => {
                    self.filter = argument.to_string();
                    let rows = search(self.registry.ongoing(), &self.filter);
                    render_transactions("Transactions", &rows);
                }
                "hsearch" => {
                    self.history_filter = argument.to_string();
                    let rows = search(self.registry.history(), &self.history_filter);
                    render_transactions("Transaction History", &rows);
                }
                "logs" => {
                    if argument.is_empty() {
                        println!("Usage: logs <tracking no>");
                    } else {
                        show_logs(self.state.gateway.as_ref(), &mut self.registry, argument).await;
                    }
                }
                "track" => self.track().await?,
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
                "refresh" => self.refresh().await,
                "logout" => return Ok(DashboardExit::Logout),
                "quit" => return Ok(DashboardExit::Quit),
                other => println!("Unknown command '{}'. Type 'help'.", other),
            }
        }
    }

    /// Refetches the user's transaction buckets. Guarded by a request token
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

    /// The tracking-number binding flow: verify, bind, auto-log.
    async fn track(&mut self) -> Result<(), AppError> {
        let tracking_no = prompt("Enter tracking number")?;
        if tracking_no.is_empty() {
            return Ok(());
        }

        match bind_tracking(self.state.gateway.as_ref(), &self.ctx.user, &tracking_no).await {
            Ok(BindOutcome::NotFound) => println!("Tracking number not found."),
            Ok(BindOutcome::Terminal(Status::Completed)) => {
                println!("This transaction is already COMPLETED and cannot be logged.");
            }
            Ok(BindOutcome::Terminal(status)) => {
                println!("This transaction has {} and cannot be logged.", status);
            }
            Ok(BindOutcome::Bound) => {
                println!("Tracking number verified and initial log added!");
                self.refresh().await;
            }
            Ok(BindOutcome::BoundWithoutLog(e)) => {
                println!(
                    "Tracking number saved to your dashboard, but the initial log failed: {}",
                    e
                );
                self.refresh().await;
            }
            Err(e) => {
                error!("error verifying tracking number: {}", e);
                println!("{}", e);
            }
        }
        Ok(())
    }
}

fn print_help() {
    println!("Commands:");
    println!("  list              show your ongoing transactions");
    println!("  history           show your completed and failed transactions");
    println!("  search [term]     filter the transactions view (empty clears)");
    println!("  hsearch [term]    filter the history view (empty clears)");
    println!("  logs <no>         show the log history of a transaction");
    println!("  track             add a tracking number to your dashboard");
    println!("  addlog <no>       append a log entry to an ongoing transaction");
    println!("  refresh           refetch your transactions");
    println!("  logout | quit");
}
