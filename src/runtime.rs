//! Runtime services and shared state for the pager-bot.

use tracing::instrument;

use crate::{
    base::{
        config::Config,
        types::{Res, Void},
    },
    service::{alert::AlertClient, chat::ChatClient, incident::IncidentClient},
};

/// Runtime service context that can be shared across the application.
///
/// This struct holds the configuration and the PagerDuty and chat clients.
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct Runtime {
    /// The configuration for the application.
    pub config: Config,
    /// The PagerDuty incident query client.
    pub incidents: IncidentClient,
    /// The PagerDuty alert publishing client.
    pub alerts: AlertClient,
    /// The chat client instance.
    pub chat: ChatClient,
}

impl Runtime {
    /// Create a new runtime instance.
    #[instrument(skip_all)]
    pub async fn new(config: Config) -> Res<Self> {
        // Initialize the PagerDuty clients.
        let incidents = IncidentClient::pagerduty(&config);
        let alerts = AlertClient::pagerduty(&config);

        // Initialize the chat client.
        let chat = ChatClient::discord(&config, incidents.clone(), alerts.clone()).await?;

        Ok(Self { config, incidents, alerts, chat })
    }

    pub async fn start(&self) -> Void {
        self.chat.start().await
    }
}
