//! Publish capability for velocity commands.

use std::sync::{Arc, Mutex, PoisonError};

use shared::domain::VelocityCommand;
use tracing::info;

/// Fire-and-forget sink for velocity commands.
///
/// Implementations must not block the caller and do not report delivery.
pub trait CommandPublisher: Send + Sync {
    fn publish(&self, command: VelocityCommand);
}

/// Keeps every published command in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingPublisher {
    commands: Arc<Mutex<Vec<VelocityCommand>>>,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> Vec<VelocityCommand> {
        self.commands
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn take(&self) -> Vec<VelocityCommand> {
        std::mem::take(&mut *self.commands.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl CommandPublisher for RecordingPublisher {
    fn publish(&self, command: VelocityCommand) {
        self.commands
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(command);
    }
}

/// Logs commands instead of sending them; used for dry runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingPublisher;

impl CommandPublisher for TracingPublisher {
    fn publish(&self, command: VelocityCommand) {
        info!(
            linear_x = command.linear.x,
            linear_y = command.linear.y,
            stop = command.is_stop(),
            "dry-run velocity command"
        );
    }
}
