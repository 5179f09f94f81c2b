//! Service integrations for external APIs and clients.
//!
//! This module contains implementations for the services used by the pager-bot:
//! - Chat services (e.g., Discord)
//! - Incident queries (e.g., the PagerDuty REST API)
//! - Alert publishing (e.g., the PagerDuty Events API)
//!
//! Each service module defines both generic traits and concrete implementations,
//! allowing for extensibility and easy testing.

pub mod alert;
pub mod chat;
pub mod incident;
