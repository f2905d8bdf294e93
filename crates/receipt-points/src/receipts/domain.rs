use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Raw receipt payload as it arrives over the wire, before any conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptSubmission {
    pub retailer: String,
    pub purchase_date: String,
    pub purchase_time: String,
    pub items: Vec<ItemSubmission>,
    pub total: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSubmission {
    pub short_description: String,
    pub price: String,
}

/// A line item that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub short_description: String,
    pub price: Decimal,
}

/// A validated receipt. Only [`super::ReceiptGuard`] produces these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub retailer: String,
    pub purchased_at: NaiveDateTime,
    pub items: Vec<Item>,
    pub total: Decimal,
}

/// Opaque identifier handed back to callers after a receipt is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReceiptId(pub Uuid);

impl ReceiptId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ReceiptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// Identifier text that is not the canonical hyphenated lowercase form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a receipt identifier")]
pub struct InvalidReceiptId(pub String);

impl FromStr for ReceiptId {
    type Err = InvalidReceiptId;

    // Only the exact text handed out by `Display` names a receipt.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(raw)
            .map(Self)
            .ok()
            .filter(|id| id.to_string() == raw)
            .ok_or_else(|| InvalidReceiptId(raw.to_string()))
    }
}

/// Store entry binding a receipt to the points it earned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredReceipt {
    pub id: ReceiptId,
    pub receipt: Receipt,
    pub points: u64,
}

/// Response body for a successful submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProcessedReceipt {
    pub id: ReceiptId,
    pub points: u64,
}

/// Response body for a points lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PointsView {
    pub points: u64,
}
