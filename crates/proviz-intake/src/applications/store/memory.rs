use std::sync::{Arc, Mutex};

use super::{ApplicationStore, StoreError};
use crate::applications::domain::{Application, ApplicationId, NewApplication};

/// Process-local store keeping applications in insertion order. Contents are lost on
/// restart.
#[derive(Debug, Default, Clone)]
pub struct MemoryApplicationStore {
    records: Arc<Mutex<Vec<Application>>>,
}

impl MemoryApplicationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ApplicationStore for MemoryApplicationStore {
    async fn create(&self, application: NewApplication) -> Result<Application, StoreError> {
        let record = application.into_application(ApplicationId::generate());
        let mut guard = self
            .records
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))?;
        guard.push(record.clone());
        Ok(record)
    }

    async fn list_all(&self) -> Result<Vec<Application>, StoreError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))?;
        Ok(guard.clone())
    }
}
