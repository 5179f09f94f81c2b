//! Structured errors raised by the PagerDuty services.

use thiserror::Error;

/// Failure of an outbound PagerDuty call.
///
/// Both variants carry the description of the underlying transport or API error,
/// which is what ends up in the chat reply.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A read against the incident-management API could not complete.
    #[error("PagerDuty API request failed: {0}")]
    Adapter(String),
    /// A trigger event could not be delivered to the ingestion endpoint.
    #[error("PagerDuty event publish failed: {0}")]
    Publish(String),
}

impl ServiceError {
    /// Wrap a failure of an incident API read.
    pub fn adapter(err: impl std::fmt::Display) -> Self {
        Self::Adapter(err.to_string())
    }

    /// Wrap a failure to deliver an alert event.
    pub fn publish(err: impl std::fmt::Display) -> Self {
        Self::Publish(err.to_string())
    }
}
