use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;

use super::domain::{Item, Receipt, ReceiptSubmission};
use crate::config::ReceiptConfig;

/// Raw field could not be converted to its typed form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("purchaseDate '{0}' must be formatted as YYYY-MM-DD")]
    InvalidDate(String),
    #[error("purchaseTime '{0}' must be formatted as HH:MM (24-hour)")]
    InvalidTime(String),
    #[error("total '{0}' is not a decimal amount")]
    InvalidTotal(String),
    #[error("item {item}: price '{value}' is not a decimal amount")]
    InvalidPrice { item: usize, value: String },
}

/// Typed receipt violates a business rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("retailer name is required")]
    MissingRetailer,
    #[error("at least one item is required")]
    NoItems,
    #[error("item {item}: description is required")]
    MissingDescription { item: usize },
    #[error("item {item}: price must be greater than zero")]
    NonPositivePrice { item: usize },
    #[error("total {total:.2} does not match sum of items {sum:.2}")]
    TotalMismatch { total: Decimal, sum: Decimal },
    #[error("item prices exceed the supported range")]
    AmountOverflow,
}

/// Reason a submission was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReceiptRejection {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Reconciliation dial for declared totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciliationPolicy {
    tolerance: Decimal,
}

impl ReconciliationPolicy {
    pub fn new(tolerance: Decimal) -> Self {
        Self {
            tolerance: tolerance.abs(),
        }
    }

    pub fn tolerance(&self) -> Decimal {
        self.tolerance
    }

    pub fn reconciles(&self, total: Decimal, sum: Decimal) -> bool {
        match total.checked_sub(sum) {
            Some(diff) => diff.abs() <= self.tolerance,
            None => false,
        }
    }
}

impl Default for ReconciliationPolicy {
    fn default() -> Self {
        Self::from(&ReceiptConfig::default())
    }
}

impl From<&ReceiptConfig> for ReconciliationPolicy {
    fn from(config: &ReceiptConfig) -> Self {
        Self::new(config.total_tolerance)
    }
}

/// Converts wire submissions into validated [`Receipt`] values.
#[derive(Debug, Clone, Default)]
pub struct ReceiptGuard {
    policy: ReconciliationPolicy,
}

impl ReceiptGuard {
    pub fn with_policy(policy: ReconciliationPolicy) -> Self {
        Self { policy }
    }

    pub fn from_config(config: &ReceiptConfig) -> Self {
        Self::with_policy(ReconciliationPolicy::from(config))
    }

    pub fn policy(&self) -> &ReconciliationPolicy {
        &self.policy
    }

    pub fn receipt_from_submission(
        &self,
        submission: ReceiptSubmission,
    ) -> Result<Receipt, ReceiptRejection> {
        let date = parse_date(&submission.purchase_date)
            .ok_or_else(|| ParseError::InvalidDate(submission.purchase_date.clone()))?;
        let time = parse_time(&submission.purchase_time)
            .ok_or_else(|| ParseError::InvalidTime(submission.purchase_time.clone()))?;
        let total = parse_amount(&submission.total)
            .ok_or_else(|| ParseError::InvalidTotal(submission.total.clone()))?;

        let mut prices = Vec::with_capacity(submission.items.len());
        for (index, item) in submission.items.iter().enumerate() {
            let price = parse_amount(&item.price).ok_or_else(|| ParseError::InvalidPrice {
                item: index + 1,
                value: item.price.clone(),
            })?;
            prices.push(price);
        }

        if submission.retailer.trim().is_empty() {
            return Err(ValidationError::MissingRetailer.into());
        }
        if submission.items.is_empty() {
            return Err(ValidationError::NoItems.into());
        }

        let mut sum = Decimal::ZERO;
        let mut items = Vec::with_capacity(submission.items.len());
        for (index, (item, price)) in submission.items.into_iter().zip(prices).enumerate() {
            let position = index + 1;
            if item.short_description.trim().is_empty() {
                return Err(ValidationError::MissingDescription { item: position }.into());
            }
            if price <= Decimal::ZERO {
                return Err(ValidationError::NonPositivePrice { item: position }.into());
            }
            sum = sum
                .checked_add(price)
                .ok_or(ValidationError::AmountOverflow)?;
            items.push(Item {
                short_description: item.short_description,
                price,
            });
        }

        if !self.policy.reconciles(total, sum) {
            return Err(ValidationError::TotalMismatch { total, sum }.into());
        }

        Ok(Receipt {
            retailer: submission.retailer,
            purchased_at: date.and_time(time),
            items,
            total,
        })
    }
}

// chrono accepts unpadded, signed and space-prefixed fields, so the layout is checked first.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    if !matches_layout(raw, "dddd-dd-dd") {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

fn parse_time(raw: &str) -> Option<NaiveTime> {
    if !matches_layout(raw, "dd:dd") {
        return None;
    }
    NaiveTime::parse_from_str(raw, "%H:%M").ok()
}

/// `d` in the layout stands for one ASCII digit; every other byte must match exactly.
fn matches_layout(raw: &str, layout: &str) -> bool {
    raw.len() == layout.len()
        && raw
            .bytes()
            .zip(layout.bytes())
            .all(|(found, expected)| match expected {
                b'd' => found.is_ascii_digit(),
                other => found == other,
            })
}

fn parse_amount(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw.trim()).ok()
}
