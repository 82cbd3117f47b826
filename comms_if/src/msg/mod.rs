//! # Message Definitions
//!
//! All messages are exchanged as JSON strings. Inputs to the planner are wrapped in a
//! [`ReplayInput`], everything the planner publishes is wrapped in a [`ReplayOutput`].

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

pub mod geom;
pub mod nav;
pub mod viz;

pub use geom::*;
pub use nav::*;
pub use viz::*;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Messages consumed by the replay planner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ReplayInput {
    /// Current odometry of the vehicle
    Odometry(OdometryMsg),

    /// A newly recorded global route, replacing any previous one
    GlobalRoute(PathMsg),

    /// Target speed to attach to the output waypoints, in meters/second
    CruiseSpeed(f64),
}

/// Messages produced by the replay planner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ReplayOutput {
    /// The replayed path as an ordered list of poses
    FinalPath(PathMsg),

    /// The replayed path as waypoints carrying a target speed
    FinalWaypoints(WaypointArray),

    /// Visualisation of the replayed path
    FinalPathMarker(MarkerArray),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl ReplayInput {
    /// Parse an input message from a JSON string.
    pub fn from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json_str)
    }
}

impl ReplayOutput {
    /// Serialize the output message into a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_cruise_speed() {
        match ReplayInput::from_json(r#"{"CruiseSpeed": 3.5}"#) {
            Ok(ReplayInput::CruiseSpeed(s)) => assert_eq!(s, 3.5),
            other => panic!("Expected a cruise speed, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_odometry_without_header() {
        let json = r#"{
            "Odometry": {
                "pose": {
                    "position": {"x": 1.0, "y": 2.0, "z": 0.0},
                    "orientation": {"x": 0.0, "y": 0.0, "z": 0.0, "w": 1.0}
                },
                "twist": {
                    "linear": {"x": 3.0, "y": 4.0, "z": 0.0},
                    "angular": {"x": 0.0, "y": 0.0, "z": 0.0}
                }
            }
        }"#;

        match ReplayInput::from_json(json) {
            Ok(ReplayInput::Odometry(odom)) => {
                assert_eq!(odom.pose.position.x, 1.0);
                assert_eq!(odom.pose.position.y, 2.0);
                assert_eq!(odom.twist.linear.y, 4.0);
                assert_eq!(odom.header.frame_id, "map");
            }
            other => panic!("Expected odometry, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_route() {
        let json = r#"{
            "GlobalRoute": {
                "header": {"frame_id": "map", "stamp": 1000},
                "poses": [
                    {"position": {"x": 0.0, "y": 0.0, "z": 0.0}},
                    {"position": {"x": 1.0, "y": 0.0, "z": 0.0}}
                ]
            }
        }"#;

        match ReplayInput::from_json(json) {
            Ok(ReplayInput::GlobalRoute(path)) => {
                assert_eq!(path.poses.len(), 2);
                assert_eq!(path.poses[1].position.x, 1.0);
                // Missing orientations default to the identity
                assert_eq!(path.poses[0].orientation.w, 1.0);
                assert_eq!(path.header.stamp.timestamp_millis(), 1000);
            }
            other => panic!("Expected a route, got {:?}", other),
        }
    }

    #[test]
    fn test_reject_unknown_input() {
        assert!(ReplayInput::from_json(r#"{"Teleport": {}}"#).is_err());
    }
}
