//! Gesture to velocity mapping.

use shared::domain::{GestureEvent, VelocityCommand};

/// Reference limit the operator speed limit is normalized against.
///
/// Kept at 5 even though the operator control is bounded to [1, 3], so the
/// highest selectable limit commands 60% of full scale.
pub const BASE_LIMIT: f64 = 5.0;

/// Gain from scaled gesture magnitude to linear velocity.
pub const LINEAR_GAIN: f64 = 0.1;

/// Maps one move event to a planar velocity command.
///
/// Inputs are taken as-is: no clamping of magnitude, angle or limit.
pub fn on_move(event: GestureEvent, limit: f64) -> VelocityCommand {
    let scaled_speed = (limit / BASE_LIMIT) * event.magnitude;
    VelocityCommand::planar(
        LINEAR_GAIN * scaled_speed * event.angle.cos(),
        LINEAR_GAIN * scaled_speed * event.angle.sin(),
    )
}

/// Command sent when the gesture is released.
pub fn on_end() -> VelocityCommand {
    VelocityCommand::STOP
}

#[cfg(test)]
#[path = "tests/translator_tests.rs"]
mod tests;
