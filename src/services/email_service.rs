//! Canal de notificaciones por email (SMTP)

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::info;

use crate::config::notification::SmtpConfig;
use crate::services::notification_service::{ChannelError, Notification, NotificationChannel};

pub struct EmailChannel {
    config: SmtpConfig,
}

impl EmailChannel {
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }

    fn ensure_complete(&self) -> Result<(), ChannelError> {
        if self.config.host.is_empty() || self.config.username.is_empty() || self.config.password.is_empty() {
            return Err(ChannelError::IncompleteConfig("email"));
        }
        Ok(())
    }

    /// Construir el mensaje sin enviarlo
    pub fn build_message(&self, notification: &Notification) -> Result<Message, ChannelError> {
        let subject = format!("Purchase notification #{}", notification.purchase_id);
        let body = format!(
            "Notification type: {}\nPurchase ID: {}\nDescription: {}\n",
            notification.kind, notification.purchase_id, notification.description
        );

        Message::builder()
            .from(
                self.config
                    .sender
                    .parse()
                    .map_err(|e| ChannelError::InvalidAddress(format!("sender: {e}")))?,
            )
            .to(notification
                .recipient
                .parse()
                .map_err(|e| ChannelError::InvalidAddress(format!("recipient: {e}")))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| ChannelError::Smtp(format!("failed to build email: {e}")))
    }

    fn build_transport(&self) -> Result<SmtpTransport, ChannelError> {
        let credentials = Credentials::new(self.config.username.clone(), self.config.password.clone());
        Ok(SmtpTransport::relay(&self.config.host)
            .map_err(|e| ChannelError::Smtp(format!("SMTP relay error: {e}")))?
            .port(self.config.port)
            .credentials(credentials)
            .build())
    }
}

#[async_trait]
impl NotificationChannel for EmailChannel {
    fn name(&self) -> &'static str {
        "email"
    }

    async fn send(&self, notification: &Notification) -> Result<(), ChannelError> {
        self.ensure_complete()?;

        let email = self.build_message(notification)?;
        let mailer = self.build_transport()?;

        tokio::task::spawn_blocking(move || {
            mailer
                .send(&email)
                .map_err(|e| ChannelError::Smtp(format!("failed to send email: {e}")))
        })
        .await
        .map_err(|e| ChannelError::Smtp(format!("email task failed: {e}")))??;

        info!(
            purchase_id = notification.purchase_id,
            recipient = %notification.recipient,
            "📧 Email notification sent"
        );
        Ok(())
    }
}
