use metrics_exporter_prometheus::PrometheusHandle;
use receipt_points::config::ReceiptConfig;
use receipt_points::receipts::{InMemoryReceiptRepository, ReceiptGuard, ReceiptService};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type InMemoryReceiptService = ReceiptService<InMemoryReceiptRepository>;

/// Fresh service backed by an empty process-lifetime store.
pub(crate) fn in_memory_receipt_service(config: &ReceiptConfig) -> Arc<InMemoryReceiptService> {
    let repository = Arc::new(InMemoryReceiptRepository::new());
    Arc::new(ReceiptService::new(
        repository,
        ReceiptGuard::from_config(config),
    ))
}
