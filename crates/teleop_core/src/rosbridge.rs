//! Rosbridge v2 client over a single WebSocket.

use std::{collections::HashMap, sync::Arc, time::Duration};

use futures::{SinkExt, StreamExt};
use serde::Serialize;
use serde_json::Value;
use shared::{
    domain::{RosMessage, VelocityCommand},
    error::TransportError,
    protocol::{BridgeEvent, BridgeRequest, StatusLevel},
};
use tokio::{
    sync::{broadcast, mpsc, RwLock},
    task::JoinHandle,
};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error, info, trace, warn};
use url::Url;

use crate::publisher::CommandPublisher;

const SUBSCRIPTION_BUFFER: usize = 64;
const CLOSE_GRACE: Duration = Duration::from_secs(2);

type Subscriptions = Arc<RwLock<HashMap<String, broadcast::Sender<Value>>>>;

/// Normalizes a configured endpoint into a WebSocket URL.
///
/// `http(s)://` is rewritten to `ws(s)://`; other schemes are rejected.
pub fn bridge_url(endpoint: &str) -> Result<Url, TransportError> {
    let mut url = Url::parse(endpoint.trim())
        .map_err(|err| TransportError::invalid_endpoint(endpoint, err.to_string()))?;
    let scheme = match url.scheme() {
        "ws" | "http" => "ws",
        "wss" | "https" => "wss",
        other => {
            return Err(TransportError::invalid_endpoint(
                endpoint,
                format!("unsupported scheme '{other}'"),
            ))
        }
    };
    if url.host_str().is_none() {
        return Err(TransportError::invalid_endpoint(endpoint, "missing host"));
    }
    url.set_scheme(scheme)
        .map_err(|()| TransportError::invalid_endpoint(endpoint, "cannot switch scheme"))?;
    Ok(url)
}

pub struct RosbridgeClient {
    endpoint: Url,
    outbound: mpsc::UnboundedSender<Message>,
    subscriptions: Subscriptions,
    writer: JoinHandle<()>,
    reader: JoinHandle<()>,
}

impl RosbridgeClient {
    pub async fn connect(endpoint: &str) -> Result<Self, TransportError> {
        let endpoint = bridge_url(endpoint)?;
        let (ws_stream, _) = connect_async(endpoint.as_str()).await.map_err(|err| {
            TransportError::Connect {
                endpoint: endpoint.to_string(),
                message: err.to_string(),
            }
        })?;
        let (mut ws_writer, mut ws_reader) = ws_stream.split();
        info!(endpoint = %endpoint, "connected to bridge");

        let (outbound, mut outbound_rx) = mpsc::unbounded_channel::<Message>();
        let writer = tokio::spawn(async move {
            while let Some(frame) = outbound_rx.recv().await {
                let closing = matches!(frame, Message::Close(_));
                if let Err(err) = ws_writer.send(frame).await {
                    warn!(%err, "bridge write failed; dropping outbound frames");
                    break;
                }
                if closing {
                    break;
                }
            }
        });

        let subscriptions: Subscriptions = Arc::new(RwLock::new(HashMap::new()));
        let inbound = Arc::clone(&subscriptions);
        let reader = tokio::spawn(async move {
            while let Some(msg) = ws_reader.next().await {
                match msg {
                    Ok(Message::Text(text)) => dispatch_inbound(&inbound, &text).await,
                    Ok(Message::Close(_)) => break,
                    Ok(_) => {}
                    Err(err) => {
                        warn!(%err, "bridge receive failed");
                        break;
                    }
                }
            }
            info!("bridge connection closed");
            inbound.write().await.clear();
        });

        Ok(Self {
            endpoint,
            outbound,
            subscriptions,
            writer,
            reader,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Announces `topic` with the schema of `M` and returns a publish handle.
    pub fn advertise<M: RosMessage>(&self, topic: &str) -> Result<TopicPublisher, TransportError> {
        send_request(&self.outbound, &BridgeRequest::advertise::<M>(topic))?;
        info!(topic, msg_type = M::TYPE_NAME, "advertised topic");
        Ok(TopicPublisher {
            topic: Arc::from(topic),
            outbound: self.outbound.clone(),
        })
    }

    /// Subscribes to `topic`; repeated calls share one bridge subscription.
    pub async fn subscribe<M: RosMessage>(
        &self,
        topic: &str,
    ) -> Result<broadcast::Receiver<Value>, TransportError> {
        let mut guard = self.subscriptions.write().await;
        if let Some(sender) = guard.get(topic) {
            return Ok(sender.subscribe());
        }
        send_request(&self.outbound, &BridgeRequest::subscribe::<M>(topic))?;
        let (sender, receiver) = broadcast::channel(SUBSCRIPTION_BUFFER);
        guard.insert(topic.to_string(), sender);
        info!(topic, msg_type = M::TYPE_NAME, "subscribed to topic");
        Ok(receiver)
    }

    pub async fn unsubscribe(&self, topic: &str) -> Result<(), TransportError> {
        if self.subscriptions.write().await.remove(topic).is_none() {
            return Ok(());
        }
        send_request(
            &self.outbound,
            &BridgeRequest::Unsubscribe {
                topic: topic.to_string(),
            },
        )
    }

    /// Sends a close frame and waits briefly for it to be flushed.
    pub async fn close(mut self) {
        if self.outbound.send(Message::Close(None)).is_err() {
            return;
        }
        if tokio::time::timeout(CLOSE_GRACE, &mut self.writer)
            .await
            .is_err()
        {
            warn!(endpoint = %self.endpoint, "timed out flushing bridge close frame");
        }
    }
}

impl Drop for RosbridgeClient {
    fn drop(&mut self) {
        self.writer.abort();
        self.reader.abort();
    }
}

async fn dispatch_inbound(subscriptions: &Subscriptions, text: &str) {
    match serde_json::from_str::<BridgeEvent>(text) {
        Ok(BridgeEvent::Publish { topic, msg }) => {
            let guard = subscriptions.read().await;
            match guard.get(&topic) {
                Some(sender) => {
                    // No live receivers is fine; only the latest sample matters.
                    let _ = sender.send(msg);
                }
                None => debug!(%topic, "dropping message for unsubscribed topic"),
            }
        }
        Ok(BridgeEvent::Status { level, msg, id }) => match level {
            StatusLevel::Error => error!(id = ?id, "bridge status: {msg}"),
            StatusLevel::Warning => warn!(id = ?id, "bridge status: {msg}"),
            StatusLevel::Info | StatusLevel::None => info!(id = ?id, "bridge status: {msg}"),
        },
        Err(err) => warn!(%err, "ignoring malformed bridge frame"),
    }
}

fn send_request(
    outbound: &mpsc::UnboundedSender<Message>,
    request: &BridgeRequest,
) -> Result<(), TransportError> {
    let text = serde_json::to_string(request).map_err(|source| TransportError::Encode {
        topic: request.topic().to_string(),
        source,
    })?;
    outbound
        .send(Message::Text(text))
        .map_err(|_| TransportError::Closed)?;
    trace!(op = request.op_name(), topic = request.topic(), "queued bridge frame");
    Ok(())
}

/// Publish handle for one advertised topic. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct TopicPublisher {
    topic: Arc<str>,
    outbound: mpsc::UnboundedSender<Message>,
}

impl TopicPublisher {
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Enqueues one message without waiting for it to be written.
    pub fn publish<M: Serialize>(&self, msg: &M) -> Result<(), TransportError> {
        let msg = serde_json::to_value(msg).map_err(|source| TransportError::Encode {
            topic: self.topic.to_string(),
            source,
        })?;
        send_request(
            &self.outbound,
            &BridgeRequest::Publish {
                topic: self.topic.to_string(),
                msg,
            },
        )
    }

    pub fn unadvertise(&self) -> Result<(), TransportError> {
        send_request(
            &self.outbound,
            &BridgeRequest::Unadvertise {
                topic: self.topic.to_string(),
            },
        )
    }
}

/// Velocity command sink bound to a `geometry_msgs/Twist` topic.
#[derive(Debug, Clone)]
pub struct CmdVelPublisher {
    inner: TopicPublisher,
}

impl CmdVelPublisher {
    pub fn advertise(client: &RosbridgeClient, topic: &str) -> Result<Self, TransportError> {
        Ok(Self {
            inner: client.advertise::<VelocityCommand>(topic)?,
        })
    }

    pub fn topic(&self) -> &str {
        self.inner.topic()
    }
}

impl CommandPublisher for CmdVelPublisher {
    fn publish(&self, command: VelocityCommand) {
        if let Err(err) = self.inner.publish(&command) {
            warn!(topic = self.inner.topic(), %err, "velocity command dropped");
        }
    }
}

#[cfg(test)]
#[path = "tests/rosbridge_tests.rs"]
mod tests;
