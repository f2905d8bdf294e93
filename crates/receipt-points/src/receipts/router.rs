use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::PathRejection, Path, State},
    http::{header, HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;
use tracing::{error, warn};

use super::domain::{PointsView, ReceiptSubmission};
use super::repository::ReceiptRepository;
use super::service::{ReceiptService, ReceiptServiceError};
use crate::error::AppError;

const JSON_MEDIA_TYPE: &str = "application/json";

/// Router builder exposing receipt intake and points lookup.
pub fn receipt_router<R>(service: Arc<ReceiptService<R>>) -> Router
where
    R: ReceiptRepository + 'static,
{
    Router::new()
        .route(
            "/receipts/process",
            post(process_handler::<R>).fallback(method_not_allowed),
        )
        .route(
            "/receipts/:receipt_id/points",
            get(points_handler::<R>).fallback(method_not_allowed),
        )
        .fallback(unmatched_route)
        .with_state(service)
}

pub(crate) async fn process_handler<R>(
    State(service): State<Arc<ReceiptService<R>>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response
where
    R: ReceiptRepository + 'static,
{
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    if !content_type.contains(JSON_MEDIA_TYPE) {
        return error_body(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "Content-Type must be application/json",
        );
    }

    let submission: ReceiptSubmission = match serde_json::from_slice(&body) {
        Ok(submission) => submission,
        Err(err) => {
            warn!(error = %err, "receipt payload could not be decoded");
            return error_body(StatusCode::BAD_REQUEST, format!("invalid JSON payload: {err}"));
        }
    };

    match service.submit(submission) {
        Ok(processed) => (StatusCode::CREATED, axum::Json(processed)).into_response(),
        Err(err) => service_error(err),
    }
}

pub(crate) async fn points_handler<R>(
    State(service): State<Arc<ReceiptService<R>>>,
    receipt_id: Result<Path<String>, PathRejection>,
) -> Response
where
    R: ReceiptRepository + 'static,
{
    let receipt_id = match receipt_id {
        Ok(Path(receipt_id)) if !receipt_id.trim().is_empty() => receipt_id,
        _ => return invalid_receipt_id(),
    };

    match service.points(&receipt_id) {
        Ok(points) => (StatusCode::OK, axum::Json(PointsView { points })).into_response(),
        Err(err) => service_error(err),
    }
}

pub(crate) async fn method_not_allowed() -> Response {
    error_body(StatusCode::METHOD_NOT_ALLOWED, "method not allowed")
}

// `/receipts//points` never matches the parameterised route, so it lands here. A nested
// segment such as `/receipts/a/b/points` is an identifier that was never issued.
pub(crate) async fn unmatched_route(uri: Uri) -> Response {
    let receipt_id = uri
        .path()
        .strip_prefix("/receipts/")
        .and_then(|rest| rest.strip_suffix("/points"));

    match receipt_id {
        Some(receipt_id) if receipt_id.trim().is_empty() => invalid_receipt_id(),
        Some(_) => service_error(ReceiptServiceError::NotFound),
        None => error_body(StatusCode::NOT_FOUND, "not found"),
    }
}

fn invalid_receipt_id() -> Response {
    error_body(StatusCode::BAD_REQUEST, "invalid receipt ID format")
}

fn service_error(err: ReceiptServiceError) -> Response {
    if let ReceiptServiceError::Repository(source) = &err {
        error!(error = %source, "receipt store failure");
    }
    AppError::from(err).into_response()
}

fn error_body(status: StatusCode, message: impl Into<String>) -> Response {
    let payload = json!({ "error": message.into() });
    (status, axum::Json(payload)).into_response()
}
