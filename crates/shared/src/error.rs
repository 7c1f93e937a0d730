use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid bridge endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
    #[error("failed to connect to bridge at {endpoint}: {message}")]
    Connect { endpoint: String, message: String },
    #[error("failed to encode message for topic {topic}: {source}")]
    Encode {
        topic: String,
        source: serde_json::Error,
    },
    #[error("bridge connection is closed")]
    Closed,
}

impl TransportError {
    pub fn invalid_endpoint(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidEndpoint {
            endpoint: endpoint.into(),
            reason: reason.into(),
        }
    }
}
