//! Latest robot pose read back from the bus.

use shared::{domain::Pose2D, error::TransportError};
use tokio::{
    sync::{broadcast::error::RecvError, watch},
    task::JoinHandle,
};
use tracing::{debug, trace, warn};

use crate::rosbridge::RosbridgeClient;

pub const DEFAULT_POSE_TOPIC: &str = "/pose";

pub struct PoseMonitor {
    latest: watch::Receiver<Option<Pose2D>>,
    task: JoinHandle<()>,
}

impl PoseMonitor {
    pub async fn spawn(client: &RosbridgeClient, topic: &str) -> Result<Self, TransportError> {
        let mut samples = client.subscribe::<Pose2D>(topic).await?;
        let (tx, latest) = watch::channel(None);
        let topic = topic.to_string();
        let task = tokio::spawn(async move {
            loop {
                match samples.recv().await {
                    Ok(value) => match serde_json::from_value::<Pose2D>(value) {
                        Ok(pose) => {
                            trace!(%topic, x = pose.x, y = pose.y, theta = pose.theta, "pose update");
                            tx.send_replace(Some(pose));
                        }
                        Err(err) => warn!(%topic, %err, "ignoring malformed pose sample"),
                    },
                    Err(RecvError::Lagged(skipped)) => {
                        debug!(%topic, skipped, "pose monitor lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            debug!(%topic, "pose monitor stopped");
        });
        Ok(Self { latest, task })
    }

    pub fn latest(&self) -> Option<Pose2D> {
        *self.latest.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Pose2D>> {
        self.latest.clone()
    }
}

impl Drop for PoseMonitor {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Operator-facing summary; theta is shown in degrees.
pub fn describe(pose: &Pose2D) -> String {
    format!(
        "x: {:.2}, y: {:.2}, theta: {:.2}",
        pose.x,
        pose.y,
        pose.theta.to_degrees()
    )
}

#[cfg(test)]
#[path = "tests/pose_tests.rs"]
mod tests;
