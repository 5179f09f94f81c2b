//! PagerDuty Events API v2 implementation of the alert client.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument, warn};

use crate::base::{
    config::Config,
    error::ServiceError,
    types::{AlertEvent, Void},
};

use super::{AlertClient, GenericAlertClient};

// Extra methods on `AlertClient` applied by the pagerduty implementation.

impl AlertClient {
    pub fn pagerduty(config: &Config) -> Self {
        let client = PagerDutyAlertClient::new(config);
        Self { inner: Arc::new(client) }
    }
}

// Specific implementations.

/// PagerDuty Events API v2 client implementation.
#[derive(Clone)]
pub struct PagerDutyAlertClient {
    client: reqwest::Client,
    events_url: String,
}

impl PagerDutyAlertClient {
    /// Create a new PagerDuty Events API client.
    #[instrument(name = "PagerDutyAlertClient::new", skip_all)]
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            events_url: config.pagerduty_events_url.clone(),
        }
    }
}

#[async_trait]
impl GenericAlertClient for PagerDutyAlertClient {
    #[instrument(skip_all)]
    async fn trigger(&self, event: &AlertEvent) -> Void {
        debug!(action = ?event.event_action, source = %event.payload.source, "Sending PagerDuty event");

        let response = self.client.post(&self.events_url).json(event).send().await.map_err(ServiceError::publish)?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, %body, "PagerDuty event was rejected");

            return Err(ServiceError::publish(format!("{status}: {body}")).into());
        }

        debug!("PagerDuty event accepted");

        Ok(())
    }
}

// Tests.
