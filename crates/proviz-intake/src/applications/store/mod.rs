use std::future::Future;

use super::domain::{Application, NewApplication};

mod file;
mod memory;

pub use file::FileApplicationStore;
pub use memory::MemoryApplicationStore;

/// Durable collection of applications.
///
/// Implementations assign identifiers on `create` and are responsible for their own
/// write safety under concurrent callers; the service adds no locking above them.
pub trait ApplicationStore: Send + Sync {
    fn create(
        &self,
        application: NewApplication,
    ) -> impl Future<Output = Result<Application, StoreError>> + Send;

    /// Every stored application in the store's natural order.
    fn list_all(&self) -> impl Future<Output = Result<Vec<Application>, StoreError>> + Send;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("store io failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("unreadable document on line {line}: {source}")]
    Corrupt {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("unable to encode document: {0}")]
    Encode(#[source] serde_json::Error),
}
