//! Application intake: validation, persistence, listing, and the post-commit notification.

pub mod domain;
pub mod notify;
pub mod router;
pub mod service;
pub mod store;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    Application, ApplicationCandidate, ApplicationField, ApplicationId, NewApplication,
};
pub use notify::{
    Delivery, DisabledNotifier, NotificationError, NotificationMessage, Notifier, SmtpNotifier,
};
pub use router::{application_router, SUBMITTED_MESSAGE};
pub use service::{IntakeService, NotificationStatus, RetrievalError, SubmissionAck, SubmitError};
pub use store::{ApplicationStore, FileApplicationStore, MemoryApplicationStore, StoreError};
pub use validation::{validate, ValidationError};
