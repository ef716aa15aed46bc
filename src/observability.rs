use std::net::SocketAddr;

use crate::engine::CheckoutError;
use crate::session::SaveOutcome;

// ── Backend calls ───────────────────────────────────────────────

/// Counter: reservation service calls. Labels: op, status.
pub const SERVICE_REQUESTS_TOTAL: &str = "checkouts_service_requests_total";

/// Histogram: reservation service call latency in seconds. Labels: op.
pub const SERVICE_REQUEST_DURATION_SECONDS: &str = "checkouts_service_request_duration_seconds";

// ── Session ─────────────────────────────────────────────────────

/// Counter: save requests by how they resolved. Labels: outcome.
pub const SAVE_REQUESTS_TOTAL: &str = "checkouts_save_requests_total";

/// Gauge: checkouts held by the browsing session.
pub const CHECKOUTS_LOADED: &str = "checkouts_loaded";

/// Gauge: checkouts visible after the current filter.
pub const CHECKOUTS_VISIBLE: &str = "checkouts_visible";

/// Install Prometheus metrics exporter on the given port. No-op if port is None.
pub fn init(port: Option<u16>) {
    let Some(port) = port else { return };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    match metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
    {
        Ok(()) => tracing::info!("metrics endpoint: http://0.0.0.0:{port}/metrics"),
        Err(e) => tracing::warn!("metrics exporter not installed: {e}"),
    }
}

/// Map a save result to a short label for metrics.
pub fn save_outcome_label(result: &Result<SaveOutcome, CheckoutError>) -> &'static str {
    match result {
        Ok(SaveOutcome::Unchanged) => "unchanged",
        Ok(SaveOutcome::NoEditor) => "no_editor",
        Ok(SaveOutcome::Created(_)) => "created",
        Ok(SaveOutcome::Updated(_)) => "updated",
        Err(CheckoutError::Validation(_)) => "invalid",
        Err(CheckoutError::Invariant(_)) => "invariant",
        Err(CheckoutError::Backend(_)) => "backend_error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{BackendError, InvariantViolation};
    use crate::model::Checkout;

    #[test]
    fn labels_cover_outcomes() {
        assert_eq!(save_outcome_label(&Ok(SaveOutcome::Unchanged)), "unchanged");
        assert_eq!(save_outcome_label(&Ok(SaveOutcome::Created(Checkout::unsaved()))), "created");
        assert_eq!(
            save_outcome_label(&Err(InvariantViolation::PrimaryOwnerCount(0).into())),
            "invariant"
        );
        assert_eq!(
            save_outcome_label(&Err(BackendError::new("down").into())),
            "backend_error"
        );
    }
}
