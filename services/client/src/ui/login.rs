//! services/client/src/ui/login.rs
//!
//! The login form: prompts for credentials until the service accepts them
//! or the user gives up.

use tracing::{error, info};

use crate::error::AppError;
use crate::ui::state::{AppState, SessionContext};
use crate::ui::prompt;

/// Runs the login form. Returns `None` when the user quits instead of
/// signing in (an empty username).
pub async fn run(state: &AppState) -> Result<Option<SessionContext>, AppError> {
    println!("\n=== DocuTrack Login ===");
    println!("(press Enter on an empty username to quit)");

    loop {
        let username = prompt("Username")?;
        if username.is_empty() {
            return Ok(None);
        }
        let password = prompt("Password")?;

        match state.gateway.authenticate(&username, &password).await {
            Ok(user) => {
                info!("{} signed in as {}", user.username, user.role);
                println!("Welcome, {}", user.full_name);
                return Ok(Some(SessionContext::begin(state.sessions.as_ref(), user)));
            }
            Err(e) => {
                error!("login failed: {}", e);
                println!("{}", e);
            }
        }
    }
}
