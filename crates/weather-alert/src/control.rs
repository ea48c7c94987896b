//! Runtime threshold updates over a Zenoh queryable.
//!
//! A query on [`THRESHOLDS_KEY`] with a JSON payload such as
//! `{"condition": "wind_speed", "threshold": 10.0}` registers a threshold.
//! A query without a payload just reads the current thresholds.
//! Every reply is a JSON [`ThresholdReply`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::watch;

use crate::thresholds::{normalize, ThresholdStore};

/// Key expression of the threshold queryable.
pub const THRESHOLDS_KEY: &str = "weather_thresholds";

/// Request body for registering a threshold.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SetThreshold {
    pub condition: String,
    pub threshold: f64,
}

/// Reply sent for every query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ThresholdReply {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub thresholds: BTreeMap<String, f64>,
}

#[derive(Debug, thiserror::Error)]
pub enum ThresholdCommandError {
    #[error("failed to decode request: {0}")]
    Decode(String),
    #[error("invalid threshold for '{0}'")]
    Invalid(String),
}

/// Apply one request to the store.
///
/// Returns the condition that was updated, or `None` for a read-only query.
pub fn apply_request(
    store: &ThresholdStore,
    payload: Option<&[u8]>,
) -> Result<Option<String>, ThresholdCommandError> {
    let payload = match payload {
        Some(bytes) if !bytes.iter().all(u8::is_ascii_whitespace) => bytes,
        _ => return Ok(None),
    };

    let request: SetThreshold = serde_json::from_slice(payload)
        .map_err(|e| ThresholdCommandError::Decode(e.to_string()))?;

    if !store.set(&request.condition, request.threshold) {
        return Err(ThresholdCommandError::Invalid(request.condition));
    }
    Ok(Some(normalize(&request.condition)))
}

/// Apply a request and build the reply for it.
pub fn handle_request(store: &ThresholdStore, payload: Option<&[u8]>) -> ThresholdReply {
    match apply_request(store, payload) {
        Ok(updated) => ThresholdReply {
            success: true,
            message: updated.map(|c| format!("threshold for '{}' updated", c)),
            thresholds: store.snapshot(),
        },
        Err(e) => ThresholdReply {
            success: false,
            message: Some(e.to_string()),
            thresholds: store.snapshot(),
        },
    }
}

/// Serve threshold queries until shutdown.
pub async fn run_threshold_queryable(
    session: Arc<zenoh::Session>,
    store: Arc<ThresholdStore>,
    mut shutdown: watch::Receiver<()>,
) -> anyhow::Result<()> {
    let queryable = session
        .declare_queryable(THRESHOLDS_KEY)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create threshold queryable: {}", e))?;
    log::info!("Threshold queryable: {}", THRESHOLDS_KEY);

    loop {
        tokio::select! {
            _ = shutdown.changed() => {
                log::info!("Threshold queryable shutting down");
                break;
            }
            query = queryable.recv_async() => {
                let query = match query {
                    Ok(query) => query,
                    Err(e) => {
                        log::warn!("Threshold query receive error: {}", e);
                        continue;
                    }
                };

                let payload = query.payload().map(|p| p.to_bytes().to_vec());
                let reply = handle_request(&store, payload.as_deref());
                if !reply.success {
                    log::warn!(
                        "Rejected threshold request: {}",
                        reply.message.as_deref().unwrap_or("unknown error")
                    );
                }

                let bytes = match serde_json::to_vec(&reply) {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        log::error!("Failed to encode threshold reply: {}", e);
                        continue;
                    }
                };
                if let Err(e) = query.reply(query.key_expr(), bytes).await {
                    log::warn!("Failed to reply to threshold query: {}", e);
                }
            }
        }
    }

    Ok(())
}
