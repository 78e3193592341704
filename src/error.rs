use crate::prediction::PredictionStatus;
use std::time::Duration;
use thiserror::Error;

/// Failures along the describe-then-generate path. Every variant is
/// terminal for the request that hit it; nothing is retried.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("{0}")]
    UpstreamShape(String),
    #[error("prediction ended with status: {}{}", .status, .detail.clone().map(|d| format!(": {d}")).unwrap_or_default())]
    UpstreamStatus {
        status: PredictionStatus,
        detail: Option<String>,
    },
    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("prediction still not terminal after {0:?}")]
    PollTimeout(Duration),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
