//! services/client/src/bin/client.rs

use client_lib::{
    adapters::{FileSessionStore, HttpGateway},
    config::Config,
    error::AppError,
    ui::{self, AppState, DashboardExit, SessionContext},
};
use docutrack_core::domain::Role;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Connecting to {}", config.api_base_url);

    // --- 2. Initialize Adapters & Shared State ---
    let http = reqwest::Client::new();
    let gateway = Arc::new(HttpGateway::new(http, config.api_base_url.clone()));
    let sessions = Arc::new(FileSessionStore::new(config.session_file.clone()));
    let state = AppState {
        gateway,
        sessions,
        config,
    };

    // --- 3. Run the Login / Dashboard Loop ---
    let mut session = SessionContext::restore(state.sessions.as_ref());
    if let Some(ctx) = &session {
        info!("restored session for {}", ctx.user.username);
        println!("Welcome back, {}", ctx.user.full_name);
    }

    loop {
        let ctx = match session.take() {
            Some(ctx) => ctx,
            None => match ui::login::run(&state).await? {
                Some(ctx) => ctx,
                None => break,
            },
        };

        let exit = match ctx.user.role {
            Role::Admin => ui::admin::run(&state, &ctx).await?,
            Role::User => ui::user::run(&state, &ctx).await?,
        };

        match exit {
            DashboardExit::Logout => {
                ctx.end(&state).await;
                println!("Signed out.");
            }
            // The persisted session survives a plain quit.
            DashboardExit::Quit => break,
        }
    }

    Ok(())
}
