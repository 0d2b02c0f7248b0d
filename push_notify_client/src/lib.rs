//! HTTP client for the push delivery service (Expo-compatible wire
//! format). Delivery is fire-and-forget: callers log failures, they never
//! fail a request over one.

use serde::Serialize;

pub mod error;

use error::{ClientError, map_client_error};

/// A single push message.
#[derive(Debug, Clone, Serialize)]
pub struct PushMessage {
    /// the recipient's push token
    pub to: String,
    /// notification title
    pub title: String,
    /// notification body
    pub body: String,
    /// platform sound hint
    pub sound: String,
    /// opaque payload handed to the app on tap
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl PushMessage {
    /// a default-sound message with no payload
    pub fn new(to: String, title: String, body: String) -> Self {
        PushMessage {
            to,
            title,
            body,
            sound: "default".to_string(),
            data: None,
        }
    }
}

/// Client for the push delivery endpoint.
#[derive(Debug, Clone)]
pub struct PushNotifyClient {
    url: String,
    client: reqwest::Client,
}

impl PushNotifyClient {
    /// create a client posting to `url`
    pub fn new(url: String) -> Self {
        PushNotifyClient {
            url,
            client: reqwest::Client::new(),
        }
    }

    /// Send a single push message.
    #[tracing::instrument(skip(self, message), fields(title = %message.title))]
    pub async fn send_push(&self, message: &PushMessage) -> Result<(), ClientError> {
        let response = self.client.post(&self.url).json(message).send().await;
        map_client_error(response).await?;
        Ok(())
    }
}
