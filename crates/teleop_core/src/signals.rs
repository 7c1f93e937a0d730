use shared::{
    domain::{BoolMessage, ControlSignal},
    error::TransportError,
};
use tracing::info;

use crate::rosbridge::{RosbridgeClient, TopicPublisher};

/// Publishers for the one-shot operator signals.
pub struct SignalPanel {
    start: TopicPublisher,
    reset: TopicPublisher,
    calib: TopicPublisher,
    closed: TopicPublisher,
}

impl SignalPanel {
    /// Advertises `start`, `reset`, `calib` and `closed`, in that order.
    pub fn new(client: &RosbridgeClient) -> Result<Self, TransportError> {
        let advertise = |signal: ControlSignal| client.advertise::<BoolMessage>(signal.topic());
        Ok(Self {
            start: advertise(ControlSignal::Start)?,
            reset: advertise(ControlSignal::Reset)?,
            calib: advertise(ControlSignal::Calib)?,
            closed: advertise(ControlSignal::Closed)?,
        })
    }

    fn publisher(&self, signal: ControlSignal) -> &TopicPublisher {
        match signal {
            ControlSignal::Start => &self.start,
            ControlSignal::Reset => &self.reset,
            ControlSignal::Calib => &self.calib,
            ControlSignal::Closed => &self.closed,
        }
    }

    pub fn send(&self, signal: ControlSignal) -> Result<(), TransportError> {
        let publisher = self.publisher(signal);
        publisher.publish(&BoolMessage { data: true })?;
        info!(topic = publisher.topic(), "published signal");
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/signals_tests.rs"]
mod tests;
