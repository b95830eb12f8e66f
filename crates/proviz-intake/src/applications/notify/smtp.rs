use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

use super::{Delivery, NotificationError, NotificationMessage, Notifier};
use crate::applications::domain::Application;
use crate::config::MailConfig;

/// Sends submission notices through an authenticated SMTP relay, from the relay account
/// to the configured admissions recipient. One attempt per call, no retry.
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
    recipient: Mailbox,
}

impl SmtpNotifier {
    pub fn from_config(config: &MailConfig) -> Result<Self, NotificationError> {
        let sender = parse_mailbox(&config.username)?;
        let recipient = parse_mailbox(&config.recipient)?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            .map_err(|err| NotificationError::Transport(err.to_string()))?
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .timeout(Some(config.timeout))
            .build();

        Ok(Self {
            transport,
            sender,
            recipient,
        })
    }
}

impl std::fmt::Debug for SmtpNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpNotifier")
            .field("sender", &self.sender.to_string())
            .field("recipient", &self.recipient.to_string())
            .finish_non_exhaustive()
    }
}

impl Notifier for SmtpNotifier {
    async fn notify(&self, application: &Application) -> Result<Delivery, NotificationError> {
        let email = compose(
            &self.sender,
            &self.recipient,
            NotificationMessage::for_application(application),
        )?;

        self.transport
            .send(email)
            .await
            .map_err(|err| NotificationError::Transport(err.to_string()))?;

        info!(application_id = %application.id, "application notification sent");
        Ok(Delivery::Sent)
    }
}

fn compose(
    sender: &Mailbox,
    recipient: &Mailbox,
    message: NotificationMessage,
) -> Result<Message, NotificationError> {
    Message::builder()
        .from(sender.clone())
        .to(recipient.clone())
        .subject(message.subject)
        .header(ContentType::TEXT_PLAIN)
        .body(message.body)
        .map_err(|err| NotificationError::Compose(err.to_string()))
}

fn parse_mailbox(address: &str) -> Result<Mailbox, NotificationError> {
    address
        .parse::<Mailbox>()
        .map_err(|err| NotificationError::Address {
            address: address.to_string(),
            reason: err.to_string(),
        })
}
