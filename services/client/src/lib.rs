//! services/client/src/lib.rs
//!
//! The document-tracking client service: configuration, the HTTP gateway
//! and session-file adapters, the shared multi-step workflows, and the
//! terminal presentation surfaces.

pub mod adapters;
pub mod config;
pub mod error;
pub mod ui;
pub mod workflows;
