use serde::{Deserialize, Serialize};

/// A message schema understood by the robot bus.
pub trait RosMessage: Serialize {
    const TYPE_NAME: &'static str;
}

macro_rules! ros_message {
    ($name:ident, $type_name:literal) => {
        impl RosMessage for $name {
            const TYPE_NAME: &'static str = $type_name;
        }
    };
}

/// Raw sample handed over by a pointer recognizer while a drag is in progress.
///
/// `distance` is absent when the recognizer could not measure a displacement
/// for this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureMove {
    pub distance: Option<f64>,
    pub angle: f64,
}

impl GestureMove {
    pub fn new(distance: f64, angle: f64) -> Self {
        Self {
            distance: Some(distance),
            angle,
        }
    }

    pub fn without_distance(angle: f64) -> Self {
        Self {
            distance: None,
            angle,
        }
    }
}

/// Polar displacement of an active gesture.
///
/// `magnitude` is normalized against the gesture zone radius; `angle` is in
/// radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureEvent {
    pub magnitude: f64,
    pub angle: f64,
}

impl GestureEvent {
    /// Returns `None` for ticks that carry no usable distance (absent, zero or NaN).
    pub fn from_sample(sample: GestureMove) -> Option<Self> {
        let magnitude = sample.distance?;
        if magnitude == 0.0 || magnitude.is_nan() {
            return None;
        }
        Some(Self {
            magnitude,
            angle: sample.angle,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };
}

/// Velocity command in the `geometry_msgs/Twist` layout.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VelocityCommand {
    pub linear: Vector3,
    pub angular: Vector3,
}

impl VelocityCommand {
    pub const STOP: Self = Self {
        linear: Vector3::ZERO,
        angular: Vector3::ZERO,
    };

    pub fn planar(x: f64, y: f64) -> Self {
        Self {
            linear: Vector3 { x, y, z: 0.0 },
            angular: Vector3::ZERO,
        }
    }

    pub fn is_stop(&self) -> bool {
        *self == Self::STOP
    }
}

ros_message!(VelocityCommand, "geometry_msgs/Twist");

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose2D {
    pub x: f64,
    pub y: f64,
    pub theta: f64,
}

ros_message!(Pose2D, "geometry_msgs/Pose2D");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoolMessage {
    pub data: bool,
}

ros_message!(BoolMessage, "std_msgs/Bool");

/// One-shot operator signals, each carried on its own topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlSignal {
    Start,
    Reset,
    Calib,
    Closed,
}

impl ControlSignal {
    pub const ALL: [ControlSignal; 4] = [Self::Start, Self::Reset, Self::Calib, Self::Closed];

    pub fn topic(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Reset => "reset",
            Self::Calib => "calib",
            Self::Closed => "closed",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|signal| signal.topic().eq_ignore_ascii_case(raw.trim()))
    }
}
