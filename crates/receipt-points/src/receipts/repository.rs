use std::collections::HashMap;
use std::sync::RwLock;

use super::domain::{ReceiptId, StoredReceipt};

/// Storage abstraction so the service module can be exercised in isolation.
pub trait ReceiptRepository: Send + Sync {
    fn insert(&self, record: StoredReceipt) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &ReceiptId) -> Result<Option<StoredReceipt>, RepositoryError>;
    fn snapshot(&self) -> Result<HashMap<ReceiptId, StoredReceipt>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Process-lifetime store guarded by a readers-writer lock.
#[derive(Debug, Default)]
pub struct InMemoryReceiptRepository {
    records: RwLock<HashMap<ReceiptId, StoredReceipt>>,
}

impl InMemoryReceiptRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> Result<usize, RepositoryError> {
        let guard = self.records.read().map_err(|_| poisoned())?;
        Ok(guard.len())
    }

    pub fn is_empty(&self) -> Result<bool, RepositoryError> {
        self.len().map(|len| len == 0)
    }
}

impl ReceiptRepository for InMemoryReceiptRepository {
    fn insert(&self, record: StoredReceipt) -> Result<(), RepositoryError> {
        let mut guard = self.records.write().map_err(|_| poisoned())?;
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id, record);
        Ok(())
    }

    fn fetch(&self, id: &ReceiptId) -> Result<Option<StoredReceipt>, RepositoryError> {
        let guard = self.records.read().map_err(|_| poisoned())?;
        Ok(guard.get(id).cloned())
    }

    fn snapshot(&self) -> Result<HashMap<ReceiptId, StoredReceipt>, RepositoryError> {
        let guard = self.records.read().map_err(|_| poisoned())?;
        Ok(guard.clone())
    }
}

fn poisoned() -> RepositoryError {
    RepositoryError::Unavailable("receipt store lock poisoned".to_string())
}
