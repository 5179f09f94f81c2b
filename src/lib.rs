//! Library root for `pager-bot`.
//!
//! Pager-bot bridges Discord and PagerDuty. In allow-listed channels it:
//! - Reports who is on call and which incidents are unresolved (`!pd status`)
//! - Triggers a critical alert to start the escalation process (`!pd trigger <message>`)
//! - Explains its usage when mentioned or given an unknown command
//!
//! Chat, incident queries, and alert publishing each sit behind a trait, so the
//! dispatcher can be exercised with test doubles.

#[deny(missing_docs)]
pub mod base;
pub mod interaction;
pub mod runtime;
pub mod service;

use base::{config::Config, types::Void};
use rustls::crypto;
use tracing::info;

/// Public async entry for the binary crate.
///
/// Sets up necessary services and starts the pager-bot runtime:
/// - Initializes the crypto provider
/// - Creates the runtime context with the PagerDuty and chat clients
/// - Starts the chat listener that dispatches commands
pub async fn start(config: Config) -> Void {
    info!("Starting pager-bot ...");

    // Start the crypto provider.
    crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install the default crypto provider."))?;

    // Initialize the runtime.
    let runtime = runtime::Runtime::new(config).await?;

    // Start the runtime.
    runtime.start().await?;

    Ok(())
}
