//! ==============================================================================
//! remote.rs - backend client
//! ==============================================================================
//!
//! purpose:
//!     the three backend calls, normalized into `Result<_, Error>`.
//!     no retries happen here: the poll loop retries on its next tick and
//!     commands are retried by the user.
//!
//! relationships:
//!     - used by: monitor.rs (through the RemoteState trait)
//!     - decodes: domain.rs wire payloads
//!
//! ==============================================================================

use async_trait::async_trait;
use std::time::Duration;

use crate::domain::{
    ActionLogSnapshot, ActionsPayload, CommandBody, CommandOutcome, CommandReply, CommandRequest,
    SensorPayload, SensorSnapshot,
};
use crate::{Error, Result};

/// Backend operations used by the monitor
#[async_trait]
pub trait RemoteState: Send + Sync {
    /// GET /data
    async fn fetch_sensors(&self) -> Result<SensorSnapshot>;

    /// GET /actions; `Ok(None)` when the reply carries no `actions` field
    async fn fetch_action_log(&self) -> Result<Option<ActionLogSnapshot>>;

    /// POST /devices
    async fn send_command(&self, request: &CommandRequest) -> Result<CommandOutcome>;
}

/// Client for the room backend over HTTP
#[derive(Clone)]
pub struct HttpRemote {
    base_url: String,
    client: reqwest::Client,
}

impl HttpRemote {
    /// Create a client rooted at `base_url` (e.g. `http://host:8080/api`)
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.client.get(self.url(path)).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status(status));
        }
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl RemoteState for HttpRemote {
    async fn fetch_sensors(&self) -> Result<SensorSnapshot> {
        let payload: SensorPayload = self.get_json("data").await?;
        Ok(payload.into())
    }

    async fn fetch_action_log(&self) -> Result<Option<ActionLogSnapshot>> {
        let payload: ActionsPayload = self.get_json("actions").await?;
        Ok(payload.actions.map(ActionLogSnapshot::new))
    }

    async fn send_command(&self, request: &CommandRequest) -> Result<CommandOutcome> {
        let response = self
            .client
            .post(self.url("devices"))
            .json(&CommandBody::from(request))
            .send()
            .await?;
        let status = response.status();
        let body = response.bytes().await?;

        // a failing status with a readable reply still carries the reason
        match serde_json::from_slice::<CommandReply>(&body) {
            Ok(reply) => Ok(reply.into_outcome(status.is_success())),
            Err(_) if !status.is_success() => Err(Error::Status(status)),
            Err(e) => Err(e.into()),
        }
    }
}
