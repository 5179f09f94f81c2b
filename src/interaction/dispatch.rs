//! Routing of inbound messages to commands, and of commands to the PagerDuty services.

use std::sync::Arc;

use tracing::{Instrument, debug, error, info, instrument, warn};

use crate::{
    base::{
        config::Config,
        types::{AlertEvent, ChatMessage, Command, Res, Void},
    },
    service::{alert::AlertClient, chat::ChatClient, incident::IncidentClient},
};

use super::{command::parse_command, gate::ChannelGate, reply};

/// Command dispatcher for the application.
///
/// Holds the injected clients and the channel gate. It is trivially cloneable, so
/// every inbound message can be handled on its own task.
#[derive(Clone)]
pub struct Dispatcher {
    config: Config,
    gate: Arc<ChannelGate>,
    chat: ChatClient,
    incidents: IncidentClient,
    alerts: AlertClient,
}

impl Dispatcher {
    pub fn new(config: Config, chat: ChatClient, incidents: IncidentClient, alerts: AlertClient) -> Self {
        let gate = ChannelGate::new(config.allowed_channels(), chat.bot_user_id());

        Self {
            config,
            gate: Arc::new(gate),
            chat,
            incidents,
            alerts,
        }
    }

    /// Handles an inbound message on a new task.
    #[instrument(skip_all)]
    pub fn handle_message(&self, message: ChatMessage) {
        let dispatcher = self.clone();

        tokio::spawn(async move {
            // Process the message.
            let result = dispatcher.process_message(&message).in_current_span().await;

            // Log any errors.
            if let Err(err) = &result {
                error!("Error while handling: {}", err);
            }
        });
    }

    /// Gates, parses and runs a single inbound message.
    #[instrument(skip_all, fields(channel_id = %message.channel_id))]
    pub async fn process_message(&self, message: &ChatMessage) -> Void {
        if !self.gate.admits(message) {
            debug!("Ignoring message outside the allow-list or from the bot itself.");
            return Ok(());
        }

        if message.mentions_user(self.chat.bot_user_id()) {
            return self.run_command(&message.channel_id, Command::Help).await;
        }

        let Some(parsed) = parse_command(&message.text, &self.config.command_prefix) else {
            return Ok(());
        };

        self.run_command(&message.channel_id, parsed.into_command()).await
    }

    /// Runs a command and sends its replies to the channel.
    #[instrument(skip(self))]
    pub async fn run_command(&self, channel_id: &str, command: Command) -> Void {
        match command {
            Command::Help => self.chat.send_message(channel_id, &reply::help(&self.config.command_prefix)).await,
            Command::Status => self.status(channel_id).await,
            Command::Trigger { message } => self.trigger(channel_id, &message).await,
        }
    }

    async fn status(&self, channel_id: &str) -> Void {
        info!("Reporting status ...");

        let text = match self.status_report().await {
            Ok(text) => text,
            Err(err) => {
                warn!("Failed to get status: {:#}", err);
                reply::failure(reply::STATUS_FAILED, &err)
            }
        };

        self.chat.send_message(channel_id, &text).await
    }

    async fn status_report(&self) -> Res<String> {
        let incidents = self.incidents.list_open_incidents(&self.config.pagerduty_service).await?;
        let users = self.incidents.list_on_call(&self.config.pagerduty_schedule).await?;

        Ok(reply::status(&users, &incidents))
    }

    async fn trigger(&self, channel_id: &str, message: &str) -> Void {
        if message.is_empty() {
            return self.chat.send_message(channel_id, reply::TRIGGER_EMPTY).await;
        }

        info!("Triggering alert ...");

        let event = AlertEvent::trigger(&self.config.pagerduty_integration_key, message);

        if let Err(err) = self.alerts.trigger(&event).await {
            warn!("Failed to trigger alert: {:#}", err);
            return self.chat.send_message(channel_id, &reply::failure(reply::TRIGGER_FAILED, &err)).await;
        }

        self.chat.send_message(channel_id, reply::TRIGGER_SUCCEEDED).await?;

        // The on-call lookup is best-effort; the alert is already out.
        let on_call = match self.incidents.list_on_call(&self.config.pagerduty_schedule).await {
            Ok(users) => reply::on_call_line(&users),
            Err(err) => {
                warn!("Failed to get on call users: {:#}", err);
                reply::failure(reply::ON_CALL_FAILED, &err)
            }
        };

        self.chat.send_message(channel_id, &on_call).await?;
        self.chat.send_message(channel_id, &reply::status_hint(&self.config.command_prefix)).await
    }
}
