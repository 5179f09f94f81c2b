pub mod pagerduty;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;

use crate::base::types::{AlertEvent, Void};

// Traits.

/// Generic alert publishing trait that clients must implement.
#[async_trait]
pub trait GenericAlertClient: Send + Sync + 'static {
    /// Submit a single event to the ingestion endpoint.
    ///
    /// Success means the endpoint acknowledged the request; nothing more is confirmed.
    async fn trigger(&self, event: &AlertEvent) -> Void;
}

// Structs.

/// Alert client for the application.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct AlertClient {
    inner: Arc<dyn GenericAlertClient>,
}

impl Deref for AlertClient {
    type Target = dyn GenericAlertClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl AlertClient {
    pub fn new(inner: Arc<dyn GenericAlertClient>) -> Self {
        Self { inner }
    }
}
