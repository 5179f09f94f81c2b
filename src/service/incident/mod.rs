pub mod pagerduty;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;

use crate::base::types::{Incident, OnCallUser, Res};

// Traits.

/// Generic incident-management query trait that clients must implement.
///
/// Both operations are read-only. Failures surface as a single adapter error
/// carrying the underlying transport or API error; there is no retry.
#[async_trait]
pub trait GenericIncidentClient: Send + Sync + 'static {
    /// List the users currently on call for a schedule, in the order the backend returns them.
    async fn list_on_call(&self, schedule_id: &str) -> Res<Vec<OnCallUser>>;

    /// List the acknowledged or triggered incidents of a service.
    ///
    /// Filtering happens server-side.
    async fn list_open_incidents(&self, service_id: &str) -> Res<Vec<Incident>>;
}

// Structs.

/// Incident client for the application.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct IncidentClient {
    inner: Arc<dyn GenericIncidentClient>,
}

impl Deref for IncidentClient {
    type Target = dyn GenericIncidentClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl IncidentClient {
    pub fn new(inner: Arc<dyn GenericIncidentClient>) -> Self {
        Self { inner }
    }
}
