//! Canal de notificaciones push (HTTP)

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use tracing::info;

use crate::config::notification::PushConfig;
use crate::models::route::PurchaseId;
use crate::services::notification_service::{
    ChannelError, Notification, NotificationChannel, NotificationKind,
};

/// Cuerpo JSON que recibe el servidor push
#[derive(Debug, Serialize)]
pub struct PushPayload<'a> {
    pub purchase_id: PurchaseId,
    pub kind: NotificationKind,
    pub description: &'a str,
    pub recipient: &'a str,
}

pub struct PushChannel {
    config: PushConfig,
    http_client: Client,
}

impl PushChannel {
    pub fn new(config: PushConfig) -> Self {
        Self {
            config,
            http_client: Client::new(),
        }
    }
}

#[async_trait]
impl NotificationChannel for PushChannel {
    fn name(&self) -> &'static str {
        "push"
    }

    async fn send(&self, notification: &Notification) -> Result<(), ChannelError> {
        if self.config.api_url.is_empty() || self.config.api_key.is_empty() {
            return Err(ChannelError::IncompleteConfig("push"));
        }

        let payload = PushPayload {
            purchase_id: notification.purchase_id,
            kind: notification.kind,
            description: &notification.description,
            recipient: &notification.recipient,
        };

        let response = self
            .http_client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(ChannelError::UnexpectedStatus(response.status().as_u16()));
        }

        info!(
            purchase_id = notification.purchase_id,
            recipient = %notification.recipient,
            "📱 Push notification sent"
        );
        Ok(())
    }
}
