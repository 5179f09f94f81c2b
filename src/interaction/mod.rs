//! Event handling and user interactions for pager-bot.
//!
//! This module turns inbound chat messages into PagerDuty calls and chat replies:
//! - Gating messages by channel and author
//! - Parsing `!pd` commands
//! - Dispatching commands and formatting the replies

pub mod command;
pub mod dispatch;
pub mod gate;
pub mod reply;
