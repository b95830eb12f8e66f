use std::future::Future;

use tracing::debug;

use super::domain::{Application, ApplicationField};

mod smtp;

pub use smtp::SmtpNotifier;

pub const NOTIFICATION_SUBJECT: &str = "New Application Submitted";

/// Post-commit hook informing the admissions team about a stored application.
///
/// Called at most once per stored record. A failure never undoes the stored record.
pub trait Notifier: Send + Sync {
    fn notify(
        &self,
        application: &Application,
    ) -> impl Future<Output = Result<Delivery, NotificationError>> + Send;
}

/// What a notifier did with a notification it accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Sent,
    /// The notifier is switched off; nothing left the process.
    Skipped,
}

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("invalid mail address '{address}': {reason}")]
    Address { address: String, reason: String },
    #[error("unable to compose notification: {0}")]
    Compose(String),
    #[error("notification transport failed: {0}")]
    Transport(String),
}

/// Subject and plain-text body for a submission notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    pub subject: String,
    pub body: String,
}

impl NotificationMessage {
    pub fn for_application(application: &Application) -> Self {
        let mut body = String::from("A new application has been submitted:\n\n");
        for field in ApplicationField::ALL {
            body.push_str(field.label());
            body.push_str(": ");
            body.push_str(application.field(field));
            body.push('\n');
        }

        Self {
            subject: NOTIFICATION_SUBJECT.to_string(),
            body,
        }
    }
}

/// Notifier used when no mail credentials are configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledNotifier;

impl Notifier for DisabledNotifier {
    async fn notify(&self, application: &Application) -> Result<Delivery, NotificationError> {
        debug!(application_id = %application.id, "mail notifications disabled, skipping");
        Ok(Delivery::Skipped)
    }
}
