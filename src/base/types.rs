//! Common types and result handling.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error type used across the application.
pub type Err = anyhow::Error;
/// Result type used across the application.
pub type Res<T> = Result<T, Err>;
/// Result of an operation that returns nothing on success.
pub type Void = Res<()>;

// Chat types.

/// A transport-neutral inbound chat message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatMessage {
    /// The channel the message was posted in.
    pub channel_id: String,
    /// The user who authored the message.
    pub author_id: String,
    /// The raw message text.
    pub text: String,
    /// The user IDs mentioned in the message.
    pub mentions: Vec<String>,
}

impl ChatMessage {
    /// Whether the given user is mentioned in this message.
    pub fn mentions_user(&self, user_id: &str) -> bool {
        self.mentions.iter().any(|m| m == user_id)
    }
}

/// A bot command, ready for dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show the usage text.
    Help,
    /// Report on-call users and unresolved incidents.
    Status,
    /// Raise a critical alert.
    Trigger {
        /// The alert summary, possibly empty.
        message: String,
    },
}

// PagerDuty types.

/// Display name of a user who is currently on call.
pub type OnCallUser = String;

/// Lifecycle status of a PagerDuty incident.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum IncidentStatus {
    /// Open and not yet acknowledged.
    Triggered,
    /// Open and being worked on.
    Acknowledged,
    /// Closed.
    Resolved,
    /// Any status this bot does not know by name.
    Other(String),
}

impl From<String> for IncidentStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "triggered" => Self::Triggered,
            "acknowledged" => Self::Acknowledged,
            "resolved" => Self::Resolved,
            _ => Self::Other(value),
        }
    }
}

impl fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Triggered => f.write_str("triggered"),
            Self::Acknowledged => f.write_str("acknowledged"),
            Self::Resolved => f.write_str("resolved"),
            Self::Other(s) => f.write_str(s),
        }
    }
}

/// A PagerDuty incident.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Incident {
    /// The human-facing incident number.
    #[serde(rename = "incident_number")]
    pub number: u64,
    /// The lifecycle status.
    pub status: IncidentStatus,
    /// The incident title.
    pub title: String,
    /// Link to the incident in the web UI.
    #[serde(rename = "html_url")]
    pub url: String,
}

/// Severity of an alert event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    /// Page immediately.
    Critical,
}

/// Action of an alert event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertAction {
    /// Open a new alert.
    Trigger,
}

/// Payload of an alert event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlertPayload {
    /// How urgent the alert is.
    pub severity: AlertSeverity,
    /// Free text describing the problem.
    pub summary: String,
    /// Where the alert came from.
    pub source: String,
}

/// An alert event, shaped exactly as the Events API v2 body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlertEvent {
    /// Integration key of the target service.
    pub routing_key: String,
    /// What to do with the event.
    pub event_action: AlertAction,
    /// The alert itself.
    pub payload: AlertPayload,
}

impl AlertEvent {
    /// Source tag identifying alerts raised from chat.
    pub const SOURCE: &'static str = "discord";

    /// Build a critical trigger event for the given routing key.
    pub fn trigger(routing_key: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            routing_key: routing_key.into(),
            event_action: AlertAction::Trigger,
            payload: AlertPayload {
                severity: AlertSeverity::Critical,
                summary: summary.into(),
                source: Self::SOURCE.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_alert_event_body_shape() {
        let event = AlertEvent::trigger("R0UT1NG", "disk full on host1");

        let body = serde_json::to_value(&event).unwrap();

        assert_eq!(
            body,
            json!({
                "routing_key": "R0UT1NG",
                "event_action": "trigger",
                "payload": {
                    "severity": "critical",
                    "summary": "disk full on host1",
                    "source": "discord"
                }
            })
        );
    }

    #[test]
    fn test_incident_status_keeps_unknown_values() {
        let incident: Incident = serde_json::from_value(json!({
            "incident_number": 7,
            "status": "investigating",
            "title": "Latency",
            "html_url": "https://x/7",
            "urgency": "high"
        }))
        .unwrap();

        assert_eq!(incident.status, IncidentStatus::Other("investigating".to_string()));
        assert_eq!(incident.status.to_string(), "investigating");
    }

    #[test]
    fn test_mentions_user() {
        let message = ChatMessage {
            mentions: vec!["U1".to_string()],
            ..Default::default()
        };

        assert!(message.mentions_user("U1"));
        assert!(!message.mentions_user("U2"));
    }
}
