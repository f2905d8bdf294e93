use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::domain::{ProcessedReceipt, Receipt, ReceiptId, ReceiptSubmission, StoredReceipt};
use super::repository::{ReceiptRepository, RepositoryError};
use super::scoring::{self, PointsBreakdown};
use super::validation::{ReceiptGuard, ReceiptRejection};

/// Service composing the intake guard, scorer, and receipt store.
pub struct ReceiptService<R> {
    guard: ReceiptGuard,
    repository: Arc<R>,
}

impl<R> ReceiptService<R>
where
    R: ReceiptRepository + 'static,
{
    pub fn new(repository: Arc<R>, guard: ReceiptGuard) -> Self {
        Self { guard, repository }
    }

    pub fn guard(&self) -> &ReceiptGuard {
        &self.guard
    }

    /// Validate a raw submission, then score and store it.
    pub fn submit(
        &self,
        submission: ReceiptSubmission,
    ) -> Result<ProcessedReceipt, ReceiptServiceError> {
        let receipt = self
            .guard
            .receipt_from_submission(submission)
            .inspect_err(|rejection| warn!(%rejection, "receipt rejected"))?;
        self.process(receipt)
    }

    /// Score an already validated receipt and store it under a fresh identifier.
    pub fn process(&self, receipt: Receipt) -> Result<ProcessedReceipt, ReceiptServiceError> {
        let points = scoring::score(&receipt);
        let id = ReceiptId::generate();

        self.repository.insert(StoredReceipt {
            id,
            receipt,
            points,
        })?;

        info!(%id, points, "receipt processed");
        Ok(ProcessedReceipt { id, points })
    }

    /// Points for a stored receipt. Malformed identifiers are reported as not found.
    pub fn points(&self, raw_id: &str) -> Result<u64, ReceiptServiceError> {
        let Ok(id) = raw_id.parse::<ReceiptId>() else {
            debug!(raw_id, "lookup with malformed receipt id");
            return Err(ReceiptServiceError::NotFound);
        };

        match self.repository.fetch(&id)? {
            Some(record) => Ok(record.points),
            None => {
                debug!(%id, "lookup for unknown receipt id");
                Err(ReceiptServiceError::NotFound)
            }
        }
    }

    /// Point-in-time copy of every stored receipt.
    pub fn list_all(&self) -> Result<HashMap<ReceiptId, StoredReceipt>, ReceiptServiceError> {
        Ok(self.repository.snapshot()?)
    }

    pub fn breakdown(&self, receipt: &Receipt) -> PointsBreakdown {
        PointsBreakdown::for_receipt(receipt)
    }
}

/// Error raised by the receipt service.
#[derive(Debug, thiserror::Error)]
pub enum ReceiptServiceError {
    #[error("invalid receipt: {0}")]
    Rejected(#[from] ReceiptRejection),
    #[error("receipt not found")]
    NotFound,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
