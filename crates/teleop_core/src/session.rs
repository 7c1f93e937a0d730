//! Wires a gesture source to the translator and a command publisher.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use shared::domain::GestureEvent;
use tracing::{debug, info, trace};

use crate::{
    gesture::GestureSource,
    publisher::CommandPublisher,
    speed::{SpeedControl, SpeedControlError},
    translator,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingState {
    Idle,
    Active,
}

/// One operator control session.
///
/// Move notifications publish one command each, end notifications publish
/// exactly one stop command. The speed limit is read through a live handle
/// on every move.
pub struct ControlSession<S: GestureSource> {
    source: S,
    speed: SpeedControl,
    publisher: Arc<dyn CommandPublisher>,
    active: Arc<AtomicBool>,
    attached: bool,
}

impl<S: GestureSource> ControlSession<S> {
    pub fn new(source: S, speed: SpeedControl, publisher: Arc<dyn CommandPublisher>) -> Self {
        let mut session = Self {
            source,
            speed,
            publisher,
            active: Arc::new(AtomicBool::new(false)),
            attached: false,
        };
        session.attach();
        session
    }

    pub fn state(&self) -> TrackingState {
        if self.active.load(Ordering::SeqCst) {
            TrackingState::Active
        } else {
            TrackingState::Idle
        }
    }

    pub fn speed_limit(&self) -> f64 {
        self.speed.current()
    }

    pub fn speed_control(&self) -> &SpeedControl {
        &self.speed
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Applies an operator adjustment, then tears down and re-establishes
    /// gesture tracking. Returns the limit actually applied.
    pub fn set_speed_limit(&mut self, requested: f64) -> Result<f64, SpeedControlError> {
        let applied = self.speed.set(requested)?;
        if self.attached {
            self.source.detach();
            self.attach();
        }
        info!(requested, applied, "speed limit changed");
        Ok(applied)
    }

    /// Detaches all handlers; nothing is published afterwards.
    pub fn shutdown(&mut self) {
        if self.attached {
            self.source.detach();
            self.attached = false;
            debug!("gesture tracking detached");
        }
    }

    fn attach(&mut self) {
        let limit = self.speed.handle();
        let publisher = Arc::clone(&self.publisher);
        let active = Arc::clone(&self.active);
        self.source.on_move(Box::new(move |sample| {
            let Some(event) = GestureEvent::from_sample(sample) else {
                trace!(?sample, "gesture tick without distance skipped");
                return;
            };
            if !active.swap(true, Ordering::SeqCst) {
                debug!("gesture tracking active");
            }
            publisher.publish(translator::on_move(event, limit.get()));
        }));

        let publisher = Arc::clone(&self.publisher);
        let active = Arc::clone(&self.active);
        self.source.on_end(Box::new(move || {
            if active.swap(false, Ordering::SeqCst) {
                debug!("gesture released");
            }
            publisher.publish(translator::on_end());
        }));

        self.attached = true;
    }
}

impl<S: GestureSource> Drop for ControlSession<S> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
