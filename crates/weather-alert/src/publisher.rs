//! Pub/sub channels and the Zenoh-backed publisher.

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// Logical destinations for outgoing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Alerts,
    Updates,
}

impl Channel {
    pub const ALL: [Channel; 2] = [Channel::Alerts, Channel::Updates];

    /// Key expression subscribers listen on. Fixed for interoperability.
    pub fn key(&self) -> &'static str {
        match self {
            Channel::Alerts => "weather_alerts",
            Channel::Updates => "weather_updates",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Errors from publishing a message.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("Zenoh error: {0}")]
    Zenoh(String),
}

impl From<zenoh::Error> for PublishError {
    fn from(err: zenoh::Error) -> Self {
        PublishError::Zenoh(err.to_string())
    }
}

/// Best-effort, fire-and-forget message sink.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, channel: Channel, message: &str) -> Result<(), PublishError>;
}

/// Publishes UTF-8 text through one Zenoh session.
///
/// One publisher is declared per channel up front; both are safe to use
/// from the two cycle tasks concurrently, and each `put` is a single
/// framed sample.
pub struct ZenohPublisher {
    alerts: zenoh::pubsub::Publisher<'static>,
    updates: zenoh::pubsub::Publisher<'static>,
}

impl ZenohPublisher {
    pub async fn new(session: &Arc<zenoh::Session>) -> Result<Self, PublishError> {
        let alerts = session.declare_publisher(Channel::Alerts.key()).await?;
        let updates = session.declare_publisher(Channel::Updates.key()).await?;
        log::info!(
            "Publishing on '{}' and '{}'",
            Channel::Alerts,
            Channel::Updates
        );
        Ok(Self { alerts, updates })
    }

    fn publisher(&self, channel: Channel) -> &zenoh::pubsub::Publisher<'static> {
        match channel {
            Channel::Alerts => &self.alerts,
            Channel::Updates => &self.updates,
        }
    }
}

#[async_trait]
impl Publisher for ZenohPublisher {
    async fn publish(&self, channel: Channel, message: &str) -> Result<(), PublishError> {
        self.publisher(channel).put(message.as_bytes()).await?;
        Ok(())
    }
}
