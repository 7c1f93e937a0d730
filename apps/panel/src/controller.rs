//! Applies operator input to the control session.

use std::ops::ControlFlow;

use crossbeam_channel::Receiver;
use teleop_core::{pose, ControlSession, GestureHub, PoseMonitor, SignalPanel};
use tracing::{info, warn};

use crate::input::OperatorInput;

pub struct Panel {
    session: ControlSession<GestureHub>,
    signals: Option<SignalPanel>,
    pose: Option<PoseMonitor>,
}

impl Panel {
    pub fn new(
        session: ControlSession<GestureHub>,
        signals: Option<SignalPanel>,
        pose: Option<PoseMonitor>,
    ) -> Self {
        Self {
            session,
            signals,
            pose,
        }
    }

    pub fn session(&self) -> &ControlSession<GestureHub> {
        &self.session
    }

    pub fn apply(&mut self, input: OperatorInput) -> ControlFlow<()> {
        match input {
            OperatorInput::Move(sample) => self.session.source_mut().emit_move(sample),
            OperatorInput::End => self.session.source_mut().emit_end(),
            OperatorInput::SetLimit(requested) => match self.session.set_speed_limit(requested) {
                Ok(applied) => println!("Max Speed: {applied}"),
                Err(err) => warn!(requested, %err, "speed limit rejected"),
            },
            OperatorInput::Signal(signal) => match &self.signals {
                Some(signals) => {
                    if let Err(err) = signals.send(signal) {
                        warn!(topic = signal.topic(), %err, "failed to send signal");
                    }
                }
                None => info!(topic = signal.topic(), "dry-run signal"),
            },
            OperatorInput::ShowPose => match self.pose.as_ref().and_then(PoseMonitor::latest) {
                Some(latest) => println!("{}", pose::describe(&latest)),
                None => println!("no pose received yet"),
            },
            OperatorInput::Quit => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }

    pub fn shutdown(&mut self) {
        self.session.shutdown();
    }
}

/// Drains operator input until `quit` or until the input side disconnects.
pub fn run(mut panel: Panel, inputs: Receiver<OperatorInput>) {
    info!(
        speed_limit = panel.session().speed_limit(),
        "control session ready"
    );
    for input in inputs.iter() {
        if panel.apply(input).is_break() {
            break;
        }
    }
    panel.shutdown();
    info!("control session closed");
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
