use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::RosMessage;

/// Frames sent from the panel to the rosbridge gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum BridgeRequest {
    Advertise {
        topic: String,
        #[serde(rename = "type")]
        msg_type: String,
    },
    Unadvertise {
        topic: String,
    },
    Publish {
        topic: String,
        msg: Value,
    },
    Subscribe {
        topic: String,
        #[serde(rename = "type")]
        msg_type: String,
    },
    Unsubscribe {
        topic: String,
    },
}

impl BridgeRequest {
    pub fn advertise<M: RosMessage>(topic: impl Into<String>) -> Self {
        Self::Advertise {
            topic: topic.into(),
            msg_type: M::TYPE_NAME.to_string(),
        }
    }

    pub fn subscribe<M: RosMessage>(topic: impl Into<String>) -> Self {
        Self::Subscribe {
            topic: topic.into(),
            msg_type: M::TYPE_NAME.to_string(),
        }
    }

    pub fn op_name(&self) -> &'static str {
        match self {
            Self::Advertise { .. } => "advertise",
            Self::Unadvertise { .. } => "unadvertise",
            Self::Publish { .. } => "publish",
            Self::Subscribe { .. } => "subscribe",
            Self::Unsubscribe { .. } => "unsubscribe",
        }
    }

    pub fn topic(&self) -> &str {
        match self {
            Self::Advertise { topic, .. }
            | Self::Unadvertise { topic }
            | Self::Publish { topic, .. }
            | Self::Subscribe { topic, .. }
            | Self::Unsubscribe { topic } => topic,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusLevel {
    Error,
    Warning,
    Info,
    None,
}

/// Frames received from the rosbridge gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum BridgeEvent {
    Publish {
        topic: String,
        msg: Value,
    },
    Status {
        level: StatusLevel,
        msg: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
    },
}
