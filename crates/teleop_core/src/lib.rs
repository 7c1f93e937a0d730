//! Gesture-driven teleoperation: translation of pointer gestures into
//! velocity commands and their delivery over a rosbridge connection.

pub mod gesture;
pub mod pose;
pub mod publisher;
pub mod rosbridge;
pub mod session;
pub mod signals;
pub mod speed;
pub mod translator;

pub use gesture::{GestureHub, GestureSource};
pub use pose::PoseMonitor;
pub use publisher::{CommandPublisher, RecordingPublisher, TracingPublisher};
pub use rosbridge::{CmdVelPublisher, RosbridgeClient, TopicPublisher};
pub use session::{ControlSession, TrackingState};
pub use signals::SignalPanel;
pub use speed::{SpeedBounds, SpeedControl, SpeedLimitHandle};

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
