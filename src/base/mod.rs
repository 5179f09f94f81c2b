//! Core components, types, and utilities for the pager-bot.
//!
//! This module contains fundamental building blocks used throughout the application:
//! - Configuration handling and environment variables.
//! - The data model shared by the chat and PagerDuty services.
//! - Common error and result types.

pub mod config;
pub mod error;
pub mod types;
