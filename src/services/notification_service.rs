//! Servicio de notificaciones
//!
//! Reparte cada notificación entre los canales habilitados (email, push).
//! Los fallos de cada canal se registran y se devuelven agregados; quien
//! llama decide si le importan.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};

use crate::config::notification::NotificationConfig;
use crate::models::route::PurchaseId;
use crate::services::email_service::EmailChannel;
use crate::services::push_service::PushChannel;

/// Tipo de notificación sobre una compra
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    PurchaseInRoute,
    PurchaseDelivered,
    PurchaseFailed,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::PurchaseInRoute => "PURCHASE_IN_ROUTE",
            NotificationKind::PurchaseDelivered => "PURCHASE_DELIVERED",
            NotificationKind::PurchaseFailed => "PURCHASE_FAILED",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub purchase_id: PurchaseId,
    pub description: String,
    pub recipient: String,
}

impl Notification {
    pub fn new(
        kind: NotificationKind,
        purchase_id: PurchaseId,
        description: impl Into<String>,
        recipient: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            purchase_id,
            description: description.into(),
            recipient: recipient.into(),
        }
    }
}

/// Error de un canal concreto
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("incomplete {0} configuration")]
    IncompleteConfig(&'static str),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("SMTP error: {0}")]
    Smtp(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected push response status {0}")]
    UnexpectedStatus(u16),
}

#[derive(Debug, Error)]
#[error("{channel} notification failed: {source}")]
pub struct ChannelFailure {
    pub channel: &'static str,
    #[source]
    pub source: ChannelError,
}

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("{} error(s) while sending notifications", .0.len())]
    Aggregate(Vec<ChannelFailure>),
}

/// Canal de entrega de notificaciones
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    fn name(&self) -> &'static str;

    async fn send(&self, notification: &Notification) -> Result<(), ChannelError>;
}

/// Puerto de notificaciones que usa la capa de peticiones
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: Notification) -> Result<(), NotificationError>;
}

#[derive(Clone, Default)]
pub struct NotificationService {
    channels: Vec<Arc<dyn NotificationChannel>>,
}

impl NotificationService {
    pub fn new(channels: Vec<Arc<dyn NotificationChannel>>) -> Self {
        Self { channels }
    }

    /// Crear el servicio con los canales habilitados en la configuración
    pub fn from_config(config: &NotificationConfig) -> Self {
        let mut channels: Vec<Arc<dyn NotificationChannel>> = Vec::new();
        if config.email_enabled {
            channels.push(Arc::new(EmailChannel::new(config.smtp.clone())));
        }
        if config.push_enabled {
            channels.push(Arc::new(PushChannel::new(config.push.clone())));
        }
        info!(channels = channels.len(), "📣 Notification channels configured");
        Self { channels }
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }
}

#[async_trait]
impl Notifier for NotificationService {
    async fn notify(&self, notification: Notification) -> Result<(), NotificationError> {
        let notification_ref = &notification;
        let results = join_all(self.channels.iter().map(|channel| async move {
            (channel.name(), channel.send(notification_ref).await)
        }))
        .await;

        let failures: Vec<ChannelFailure> = results
            .into_iter()
            .filter_map(|(channel, result)| {
                result.err().map(|source| ChannelFailure { channel, source })
            })
            .collect();

        if failures.is_empty() {
            return Ok(());
        }

        for failure in &failures {
            error!(
                purchase_id = notification.purchase_id,
                kind = %notification.kind,
                "❌ {}",
                failure
            );
        }
        Err(NotificationError::Aggregate(failures))
    }
}
