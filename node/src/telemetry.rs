// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::sync::OnceLock;
use std::time::Duration;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use scorekeeper_kernel::{SubmissionError, SubmissionReceipt};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::errors::NodeError;

static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Installs the log subscriber and the Prometheus recorder. Call once, from `main`.
pub fn init_telemetry() -> Result<(), NodeError> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "scorekeeper_node=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .map_err(|e| NodeError::Telemetry(e.to_string()))?;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| NodeError::Telemetry(e.to_string()))?;
    if PROM_HANDLE.set(handle).is_err() {
        tracing::warn!("Prometheus handle already set. Telemetry re-initialized?");
    }

    metrics::describe_counter!("scorekeeper_scores_submitted_total", "Score submissions recorded in the ledger");
    metrics::describe_counter!("scorekeeper_scores_rejected_total", "Score submissions rejected by validation");
    metrics::describe_counter!("scorekeeper_ledger_failures_total", "Score submissions lost to a ledger write failure");
    metrics::describe_counter!("scorekeeper_leaderboard_updates_total", "Leaderboard update attempts by outcome");
    metrics::describe_histogram!(
        "scorekeeper_leaderboard_build_duration_seconds",
        "Time taken to scan and rank the leaderboard"
    );

    metrics::gauge!("scorekeeper_node_up", 1.0);
    Ok(())
}

pub fn render_metrics() -> String {
    match PROM_HANDLE.get() {
        Some(handle) => handle.render(),
        None => "# metrics not initialized".to_string(),
    }
}

pub fn record_submission(result: &Result<SubmissionReceipt, SubmissionError>) {
    match result {
        Ok(receipt) => {
            metrics::counter!("scorekeeper_scores_submitted_total", 1);
            metrics::counter!(
                "scorekeeper_leaderboard_updates_total",
                1,
                "outcome" => receipt.leaderboard.label()
            );
        }
        Err(SubmissionError::Invalid(_)) => metrics::counter!("scorekeeper_scores_rejected_total", 1),
        Err(SubmissionError::Ledger(_)) => metrics::counter!("scorekeeper_ledger_failures_total", 1),
    }
}

pub fn record_leaderboard_build(elapsed: Duration) {
    metrics::histogram!("scorekeeper_leaderboard_build_duration_seconds", elapsed.as_secs_f64());
}
