//! Receipt intake, scoring, and the in-memory points store.
//!
//! Submissions are decoded as raw strings first and converted to a typed [`Receipt`] by the
//! [`ReceiptGuard`]; only validated receipts reach the scorer and the store. Identifiers are
//! random UUIDs and the store is append-only for the life of the process.

pub mod domain;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    InvalidReceiptId, Item, ItemSubmission, PointsView, ProcessedReceipt, Receipt, ReceiptId, ReceiptSubmission,
    StoredReceipt,
};
pub use repository::{InMemoryReceiptRepository, ReceiptRepository, RepositoryError};
pub use router::receipt_router;
pub use scoring::{score, PointsBreakdown};
pub use service::{ReceiptService, ReceiptServiceError};
pub use validation::{
    ParseError, ReceiptGuard, ReceiptRejection, ReconciliationPolicy, ValidationError,
};
