//! # Geometry Messages

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use chrono::{serde::ts_milliseconds, DateTime, Utc};
use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Frame every message is expressed in unless told otherwise.
pub const DEFAULT_FRAME_ID: &str = "map";

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Common header attached to stamped messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    /// Name of the frame the message data is expressed in
    pub frame_id: String,

    /// UTC time at which the message was produced
    #[serde(with = "ts_milliseconds")]
    pub stamp: DateTime<Utc>,
}

/// A point in 3D space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// A 3D vector, used for velocities and marker scales.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// An orientation as a (not necessarily normalised) quaternion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

/// Position and orientation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PoseMsg {
    #[serde(default)]
    pub position: Point,

    #[serde(default)]
    pub orientation: Quaternion,
}

/// Linear and angular velocity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TwistMsg {
    /// Linear velocity in meters/second
    #[serde(default)]
    pub linear: Vector3,

    /// Angular velocity in radians/second
    #[serde(default)]
    pub angular: Vector3,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Header {
    /// Create a header in the given frame stamped with the current time.
    pub fn now(frame_id: &str) -> Self {
        Self {
            frame_id: frame_id.into(),
            stamp: Utc::now(),
        }
    }
}

impl Default for Header {
    fn default() -> Self {
        Self {
            frame_id: DEFAULT_FRAME_ID.into(),
            stamp: DateTime::<Utc>::from(std::time::UNIX_EPOCH),
        }
    }
}

impl Point {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl Vector3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl Quaternion {
    /// The identity rotation.
    pub fn identity() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            w: 1.0,
        }
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::identity()
    }
}
