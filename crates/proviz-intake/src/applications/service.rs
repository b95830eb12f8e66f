use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, warn};

use super::domain::{Application, ApplicationCandidate};
use super::notify::{Delivery, Notifier};
use super::store::{ApplicationStore, StoreError};
use super::validation::{validate, ValidationError};

/// Composes validation, the application store, and the post-commit notifier.
pub struct IntakeService<S, N> {
    store: Arc<S>,
    notifier: Arc<N>,
}

impl<S, N> IntakeService<S, N>
where
    S: ApplicationStore + 'static,
    N: Notifier + 'static,
{
    pub fn new(store: Arc<S>, notifier: Arc<N>) -> Self {
        Self { store, notifier }
    }

    /// Validate, persist, then attempt exactly one notification.
    ///
    /// Once the store accepts the record the call succeeds; the notification outcome is
    /// only reported on the returned acknowledgement.
    pub async fn submit(
        &self,
        candidate: ApplicationCandidate,
    ) -> Result<SubmissionAck, SubmitError> {
        let application = validate(candidate)?;

        let stored = self.store.create(application).await.map_err(|err| {
            error!(error = %err, "failed to persist application");
            SubmitError::Persistence(err)
        })?;
        info!(application_id = %stored.id, "application stored");

        let notification = match self.notifier.notify(&stored).await {
            Ok(Delivery::Sent) => NotificationStatus::Sent,
            Ok(Delivery::Skipped) => NotificationStatus::Skipped,
            Err(err) => {
                warn!(application_id = %stored.id, error = %err, "application notification failed");
                NotificationStatus::Failed
            }
        };

        Ok(SubmissionAck {
            application: stored,
            notification,
        })
    }

    /// Every stored application, in store order.
    pub async fn list_all(&self) -> Result<Vec<Application>, RetrievalError> {
        self.store.list_all().await.map_err(|err| {
            error!(error = %err, "failed to read applications");
            RetrievalError(err)
        })
    }
}

/// Successful submission. The record is durable regardless of `notification`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionAck {
    pub application: Application,
    pub notification: NotificationStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationStatus {
    Sent,
    Skipped,
    Failed,
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("error saving application: {0}")]
    Persistence(#[source] StoreError),
}

#[derive(Debug, thiserror::Error)]
#[error("error fetching applications: {0}")]
pub struct RetrievalError(#[source] pub StoreError);
