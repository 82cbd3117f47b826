//! # Navigation Messages

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use super::geom::{Header, PoseMsg, TwistMsg};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Vehicle odometry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OdometryMsg {
    #[serde(default)]
    pub header: Header,

    /// Pose of the vehicle in the header frame
    pub pose: PoseMsg,

    /// Velocity of the vehicle
    #[serde(default)]
    pub twist: TwistMsg,
}

/// An ordered list of poses.
///
/// Used both for incoming recorded routes and for the outgoing replayed path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathMsg {
    #[serde(default)]
    pub header: Header,

    pub poses: Vec<PoseMsg>,
}

/// A single waypoint sent to the controller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Waypoint {
    pub pose: PoseMsg,

    /// Target velocity at this waypoint, the linear x component holds the target speed.
    pub twist: TwistMsg,
}

/// The waypoints of a path, in following order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaypointArray {
    pub header: Header,

    pub waypoints: Vec<Waypoint>,
}
