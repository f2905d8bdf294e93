use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::receipts::domain::{ItemSubmission, Receipt, ReceiptSubmission};
use crate::receipts::repository::InMemoryReceiptRepository;
use crate::receipts::validation::ReceiptGuard;
use crate::receipts::{receipt_router, ReceiptService};

pub(super) fn item(description: &str, price: &str) -> ItemSubmission {
    ItemSubmission {
        short_description: description.to_string(),
        price: price.to_string(),
    }
}

pub(super) fn submission(
    retailer: &str,
    date: &str,
    time: &str,
    items: Vec<ItemSubmission>,
    total: &str,
) -> ReceiptSubmission {
    ReceiptSubmission {
        retailer: retailer.to_string(),
        purchase_date: date.to_string(),
        purchase_time: time.to_string(),
        items,
        total: total.to_string(),
    }
}

pub(super) fn target_submission() -> ReceiptSubmission {
    submission(
        "Target",
        "2022-01-01",
        "13:01",
        vec![
            item("Mountain Dew 12PK", "6.49"),
            item("Emils Cheese Pizza", "12.25"),
            item("Knorr Creamy Chicken", "1.26"),
            item("Doritos Nacho Cheese", "3.35"),
            item("   Klarbrunn 12-PK 12 FL OZ  ", "12.00"),
        ],
        "35.35",
    )
}

pub(super) fn corner_market_submission() -> ReceiptSubmission {
    submission(
        "M&M Corner Market",
        "2022-03-20",
        "14:33",
        vec![
            item("Gatorade", "2.25"),
            item("Gatorade", "2.25"),
            item("Gatorade", "2.25"),
            item("Gatorade", "2.25"),
        ],
        "9.00",
    )
}

pub(super) fn single_item_submission() -> ReceiptSubmission {
    submission(
        "Target",
        "2022-01-01",
        "13:01",
        vec![item("Mountain Dew 12PK", "6.49")],
        "6.49",
    )
}

pub(super) fn guard() -> ReceiptGuard {
    ReceiptGuard::default()
}

pub(super) fn validated(submission: ReceiptSubmission) -> Receipt {
    guard()
        .receipt_from_submission(submission)
        .expect("fixture receipt validates")
}

pub(super) fn build_service() -> (
    ReceiptService<InMemoryReceiptRepository>,
    Arc<InMemoryReceiptRepository>,
) {
    let repository = Arc::new(InMemoryReceiptRepository::new());
    let service = ReceiptService::new(repository.clone(), guard());
    (service, repository)
}

pub(super) fn router_with_service(
    service: ReceiptService<InMemoryReceiptRepository>,
) -> axum::Router {
    receipt_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
