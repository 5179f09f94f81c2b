//! Admission check for inbound messages.

use std::collections::HashSet;

use crate::base::types::ChatMessage;

/// Decides whether the bot may act on a message at all.
#[derive(Debug, Clone)]
pub struct ChannelGate {
    allowed: HashSet<String>,
    bot_user_id: String,
}

impl ChannelGate {
    pub fn new(allowed: HashSet<String>, bot_user_id: impl Into<String>) -> Self {
        Self {
            allowed,
            bot_user_id: bot_user_id.into(),
        }
    }

    /// Admits messages from allow-listed channels that the bot did not author itself.
    pub fn admits(&self, message: &ChatMessage) -> bool {
        self.allowed.contains(&message.channel_id) && message.author_id != self.bot_user_id
    }
}
