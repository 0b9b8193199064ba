use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the global Prometheus recorder. Safe to call once per process.
pub fn init_metrics() -> Result<(), anyhow::Error> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install Prometheus recorder: {}", e))?;

    METRICS_HANDLE
        .set(handle)
        .map_err(|_| anyhow::anyhow!("Metrics recorder already initialized"))
}

pub fn render_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string())
}

#[derive(Debug, Clone, Copy)]
pub enum LoginOutcome {
    Success,
    UnknownUser,
    BadPassword,
}

impl LoginOutcome {
    fn as_str(&self) -> &'static str {
        match self {
            LoginOutcome::Success => "success",
            LoginOutcome::UnknownUser => "unknown_user",
            LoginOutcome::BadPassword => "bad_password",
        }
    }
}

pub fn record_login(outcome: LoginOutcome) {
    counter!("logins_total", "outcome" => outcome.as_str()).increment(1);
}

pub fn record_order_created() {
    counter!("orders_created_total").increment(1);
}

pub fn record_order_cancelled() {
    counter!("orders_cancelled_total").increment(1);
}

pub fn record_validation_failure() {
    counter!("order_validation_failures_total").increment(1);
}
