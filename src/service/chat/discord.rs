//! Chat service integration for pager-bot.
//!
//! This module provides the Discord implementation of `GenericChatClient`:
//! - Receiving messages over the gateway
//! - Sending replies over the REST API
//!
//! Inbound serenity messages are converted into transport-neutral `ChatMessage`s
//! before they reach the dispatcher.

use std::{num::NonZeroU64, sync::Arc};

use async_trait::async_trait;
use serenity::{
    all::{ChannelId, Context, EventHandler, GatewayIntents, Message, Ready},
    http::Http,
};
use tracing::{error, info, instrument};

use crate::{
    base::{
        config::Config,
        types::{ChatMessage, Res, Void},
    },
    interaction::dispatch::Dispatcher,
    service::{alert::AlertClient, incident::IncidentClient},
};

use super::{ChatClient, GenericChatClient};

// Extra methods on `ChatClient` applied by the discord implementation.

impl ChatClient {
    /// Creates a new Discord chat client.
    pub async fn discord(config: &Config, incidents: IncidentClient, alerts: AlertClient) -> Res<Self> {
        let client = DiscordChatClient::new(config, incidents, alerts).await?;
        Ok(Self { inner: Arc::new(client) })
    }
}

impl From<DiscordChatClient> for ChatClient {
    fn from(client: DiscordChatClient) -> Self {
        Self { inner: Arc::new(client) }
    }
}

// Structs.

/// Gateway event handler; forwards messages to the dispatcher.
struct DiscordHandler {
    dispatcher: Dispatcher,
}

/// Discord client implementation.
#[derive(Clone)]
struct DiscordChatClient {
    pub config: Config,
    pub bot_user_id: String,
    pub http: Arc<Http>,
    pub incidents: IncidentClient,
    pub alerts: AlertClient,
}

impl DiscordChatClient {
    /// Create a new Discord chat client.
    #[instrument(name = "DiscordChatClient::new", skip_all)]
    pub async fn new(config: &Config, incidents: IncidentClient, alerts: AlertClient) -> Res<Self> {
        let http = Arc::new(Http::new(&config.discord_token));

        // Get the bot's user ID.

        let bot_user = http.get_current_user().await?;
        let bot_user_id = bot_user.id.to_string();

        info!("Discord bot user ID: {}", bot_user_id);

        Ok(Self {
            config: config.clone(),
            bot_user_id,
            http,
            incidents,
            alerts,
        })
    }
}

#[async_trait]
impl GenericChatClient for DiscordChatClient {
    fn bot_user_id(&self) -> &str {
        &self.bot_user_id
    }

    async fn start(&self) -> Void {
        let dispatcher = Dispatcher::new(self.config.clone(), ChatClient::from(self.clone()), self.incidents.clone(), self.alerts.clone());

        let intents = GatewayIntents::GUILD_MESSAGES | GatewayIntents::DIRECT_MESSAGES | GatewayIntents::MESSAGE_CONTENT;

        let mut client = serenity::Client::builder(&self.config.discord_token, intents)
            .event_handler(DiscordHandler { dispatcher })
            .await?;

        // Shut the shards down on Ctrl-C.

        let shard_manager = client.shard_manager.clone();
        tokio::spawn(async move {
            if let Err(err) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for Ctrl-C: {}", err);
                return;
            }

            info!("Shutting down ...");
            shard_manager.shutdown_all().await;
        });

        client.start().await?;

        Ok(())
    }

    #[instrument(skip(self, text))]
    async fn send_message(&self, channel_id: &str, text: &str) -> Void {
        let channel_id = ChannelId::from(channel_id.parse::<NonZeroU64>()?);

        channel_id.say(&*self.http, text).await.map_err(|e| anyhow::anyhow!("Failed to send message: {}", e))?;

        Ok(())
    }
}

#[async_trait]
impl EventHandler for DiscordHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!("Connected to Discord as {}.", ready.user.name);
    }

    async fn message(&self, _ctx: Context, msg: Message) {
        self.dispatcher.handle_message(to_chat_message(&msg));
    }
}

/// Convert a serenity message into a transport-neutral one.
fn to_chat_message(msg: &Message) -> ChatMessage {
    ChatMessage {
        channel_id: msg.channel_id.to_string(),
        author_id: msg.author.id.to_string(),
        text: msg.content.clone(),
        mentions: msg.mentions.iter().map(|u| u.id.to_string()).collect(),
    }
}
