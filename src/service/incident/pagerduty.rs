//! PagerDuty REST API v2 implementation of the incident client.
//!
//! Only the two read endpoints the bot needs are wrapped:
//! - `GET /oncalls` filtered by schedule
//! - `GET /incidents` filtered by service and the unresolved statuses

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{debug, instrument, warn};

use crate::base::{
    config::Config,
    error::ServiceError,
    types::{Incident, OnCallUser, Res},
};

use super::{GenericIncidentClient, IncidentClient};

/// Media type selecting version 2 of the REST API.
const ACCEPT_V2: &str = "application/vnd.pagerduty+json;version=2";

/// Incident statuses that count as unresolved.
const OPEN_STATUSES: [&str; 2] = ["acknowledged", "triggered"];

// Extra methods on `IncidentClient` applied by the pagerduty implementation.

impl IncidentClient {
    pub fn pagerduty(config: &Config) -> Self {
        let client = PagerDutyIncidentClient::new(config);
        Self { inner: Arc::new(client) }
    }
}

// API types.

#[derive(Debug, Deserialize)]
struct OnCallsResponse {
    oncalls: Vec<OnCallEntry>,
}

#[derive(Debug, Deserialize)]
struct OnCallEntry {
    user: UserReference,
}

#[derive(Debug, Deserialize)]
struct UserReference {
    summary: String,
}

#[derive(Debug, Deserialize)]
struct IncidentsResponse {
    incidents: Vec<Incident>,
}

// Specific implementations.

/// PagerDuty REST API client implementation.
#[derive(Clone)]
pub struct PagerDutyIncidentClient {
    client: reqwest::Client,
    api_url: String,
    access_token: String,
}

impl PagerDutyIncidentClient {
    /// Create a new PagerDuty REST API client.
    #[instrument(name = "PagerDutyIncidentClient::new", skip_all)]
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: config.pagerduty_api_url.trim_end_matches('/').to_string(),
            access_token: config.pagerduty_access_token.clone(),
        }
    }

    /// Issue an authenticated GET and decode the JSON body.
    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Res<T> {
        let url = format!("{}/{}", self.api_url, path);

        let response = self
            .client
            .get(&url)
            .header(AUTHORIZATION, format!("Token token={}", self.access_token))
            .header(ACCEPT, ACCEPT_V2)
            .query(query)
            .send()
            .await
            .map_err(ServiceError::adapter)?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, %body, "PagerDuty API request failed");

            return Err(ServiceError::adapter(format!("{status}: {body}")).into());
        }

        Ok(response.json::<T>().await.map_err(ServiceError::adapter)?)
    }
}

#[async_trait]
impl GenericIncidentClient for PagerDutyIncidentClient {
    #[instrument(skip(self))]
    async fn list_on_call(&self, schedule_id: &str) -> Res<Vec<OnCallUser>> {
        let response: OnCallsResponse = self.get("oncalls", &[("schedule_ids[]", schedule_id)]).await?;

        debug!("Received {} on-call entries", response.oncalls.len());

        Ok(response.oncalls.into_iter().map(|oc| oc.user.summary).collect())
    }

    #[instrument(skip(self))]
    async fn list_open_incidents(&self, service_id: &str) -> Res<Vec<Incident>> {
        let mut query = vec![("service_ids[]", service_id)];
        query.extend(OPEN_STATUSES.iter().map(|s| ("statuses[]", *s)));

        let response: IncidentsResponse = self.get("incidents", &query).await?;

        debug!("Received {} open incidents", response.incidents.len());

        Ok(response.incidents)
    }
}

// Tests.

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::{config::ConfigInner, types::IncidentStatus};
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{header, method, path, query_param},
    };

    fn create_test_config(api_url: &str) -> Config {
        Config {
            inner: Arc::new(ConfigInner {
                pagerduty_access_token: "secret".to_string(),
                pagerduty_api_url: api_url.to_string(),
                ..Default::default()
            }),
        }
    }

    #[tokio::test]
    async fn test_list_on_call_preserves_order() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/oncalls"))
            .and(query_param("schedule_ids[]", "PSCHED"))
            .and(header("Authorization", "Token token=secret"))
            .and(header("Accept", ACCEPT_V2))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "oncalls": [
                    { "escalation_level": 1, "user": { "id": "P1", "summary": "Alice" } },
                    { "escalation_level": 2, "user": { "id": "P2", "summary": "Bob" } }
                ],
                "limit": 25,
                "more": false
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = IncidentClient::pagerduty(&create_test_config(&server.uri()));

        let users = client.list_on_call("PSCHED").await.unwrap();

        assert_eq!(users, vec!["Alice".to_string(), "Bob".to_string()]);
    }

    #[tokio::test]
    async fn test_list_open_incidents_filters_server_side() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/incidents"))
            .and(query_param("service_ids[]", "PSVC"))
            .and(query_param("statuses[]", "acknowledged"))
            .and(query_param("statuses[]", "triggered"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "incidents": [
                    {
                        "incident_number": 42,
                        "status": "triggered",
                        "title": "API down",
                        "html_url": "https://x/42"
                    },
                    {
                        "incident_number": 43,
                        "status": "acknowledged",
                        "title": "Disk full",
                        "html_url": "https://x/43"
                    }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = IncidentClient::pagerduty(&create_test_config(&format!("{}/", server.uri())));

        let incidents = client.list_open_incidents("PSVC").await.unwrap();

        assert_eq!(incidents.len(), 2);
        assert_eq!(incidents[0].number, 42);
        assert_eq!(incidents[0].status, IncidentStatus::Triggered);
        assert_eq!(incidents[0].title, "API down");
        assert_eq!(incidents[0].url, "https://x/42");
        assert_eq!(incidents[1].status, IncidentStatus::Acknowledged);
    }

    #[tokio::test]
    async fn test_api_error_is_adapter_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/oncalls"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
            .mount(&server)
            .await;

        let client = IncidentClient::pagerduty(&create_test_config(&server.uri()));

        let err = client.list_on_call("PSCHED").await.unwrap_err();

        assert!(matches!(err.downcast_ref::<ServiceError>(), Some(ServiceError::Adapter(_))));
        assert!(err.to_string().contains("401"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_adapter_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/incidents"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "unexpected": true })))
            .mount(&server)
            .await;

        let client = IncidentClient::pagerduty(&create_test_config(&server.uri()));

        let err = client.list_open_incidents("PSVC").await.unwrap_err();

        assert!(matches!(err.downcast_ref::<ServiceError>(), Some(ServiceError::Adapter(_))));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_adapter_error() {
        // Nothing listens on the discard port.
        let client = IncidentClient::pagerduty(&create_test_config("http://127.0.0.1:9"));

        let err = client.list_on_call("PSCHED").await.unwrap_err();

        assert!(matches!(err.downcast_ref::<ServiceError>(), Some(ServiceError::Adapter(_))));
    }
}
