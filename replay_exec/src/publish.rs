//! # Publishing
//!
//! Renders a replayed path into the messages sent to the vehicle controller and the visualiser.
//! All functions here are pure, the caller provides the header so that every message published
//! in one cycle carries the same stamp.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use crate::{
    loc::quaternion_from_yaw,
    planner::{PathPoint, ReplayedPath},
};
use comms_if::msg::{
    ColorRgba, Header, Marker, MarkerArray, MarkerType, PathMsg, Point, PoseMsg, ReplayOutput,
    TwistMsg, Vector3, Waypoint, WaypointArray,
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Namespace of the line joining the path points
pub const PATH_MARKER_NS: &str = "local_path_marker";

/// Namespace of the speed labels, one per path point
pub const VELOCITY_MARKER_NS: &str = "local_waypoint_velocity";

/// Namespace of the cubes drawn on each path point
pub const POINT_MARKER_NS: &str = "local_point_marker";

/// Height of each marker kind above the path, so they do not hide one another.
const PATH_MARKER_Z_OFFSET_M: f64 = 0.2;
const VELOCITY_MARKER_Z_OFFSET_M: f64 = 0.4;
const POINT_MARKER_Z_OFFSET_M: f64 = 0.6;

const PATH_MARKER_WIDTH_M: f64 = 0.2;
const VELOCITY_MARKER_HEIGHT_M: f64 = 0.4;
const POINT_MARKER_SIZE_M: f64 = 0.2;

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Render all outgoing messages for the given path.
pub fn render(path: &ReplayedPath, cruise_speed_ms: f64, header: &Header) -> Vec<ReplayOutput> {
    vec![
        ReplayOutput::FinalWaypoints(to_waypoint_array(path, cruise_speed_ms, header)),
        ReplayOutput::FinalPath(to_path_msg(path, header)),
        ReplayOutput::FinalPathMarker(to_marker_array(path, cruise_speed_ms, header)),
    ]
}

/// Convert the path into a list of poses oriented along the route heading.
pub fn to_path_msg(path: &ReplayedPath, header: &Header) -> PathMsg {
    PathMsg {
        header: header.clone(),
        poses: path.points.iter().map(pose_msg).collect(),
    }
}

/// Convert the path into waypoints which all carry the cruise speed.
pub fn to_waypoint_array(
    path: &ReplayedPath,
    cruise_speed_ms: f64,
    header: &Header,
) -> WaypointArray {
    WaypointArray {
        header: header.clone(),
        waypoints: path
            .points
            .iter()
            .map(|p| Waypoint {
                pose: pose_msg(p),
                twist: TwistMsg {
                    linear: Vector3::new(cruise_speed_ms, 0.0, 0.0),
                    ..Default::default()
                },
            })
            .collect(),
    }
}

/// Build the visualisation of the path.
///
/// The array holds, in order, a line strip along the path, one text label per point showing the
/// cruise speed in km/h, and a list of cubes marking each point.
pub fn to_marker_array(path: &ReplayedPath, cruise_speed_ms: f64, header: &Header) -> MarkerArray {
    let path_color = ColorRgba::new(0.0, 0.7, 1.0, 1.0);

    let mut markers = Vec::with_capacity(path.len() + 2);

    // Line strip
    let mut line = Marker::new(header.clone(), PATH_MARKER_NS, 0, MarkerType::LineStrip);
    line.scale.x = PATH_MARKER_WIDTH_M;
    line.color = path_color;
    line.frame_locked = true;
    line.points = offset_points(path, PATH_MARKER_Z_OFFSET_M);
    markers.push(line);

    // Speed labels
    let speed_text = format_speed_kmph(cruise_speed_ms);
    for (i, p) in path.points.iter().enumerate() {
        let mut label =
            Marker::new(header.clone(), VELOCITY_MARKER_NS, i as i32, MarkerType::TextViewFacing);
        label.pose.position = Point::new(p.x, p.y, p.z + VELOCITY_MARKER_Z_OFFSET_M);
        label.scale.z = VELOCITY_MARKER_HEIGHT_M;
        label.color = path_color;
        label.frame_locked = true;
        label.text = speed_text.clone();
        markers.push(label);
    }

    // Point cubes
    let mut cubes = Marker::new(header.clone(), POINT_MARKER_NS, 0, MarkerType::CubeList);
    cubes.scale = Vector3::new(POINT_MARKER_SIZE_M, POINT_MARKER_SIZE_M, POINT_MARKER_SIZE_M);
    cubes.color = ColorRgba::new(1.0, 0.0, 0.0, 1.0);
    cubes.frame_locked = true;
    cubes.points = offset_points(path, POINT_MARKER_Z_OFFSET_M);
    markers.push(cubes);

    MarkerArray { markers }
}

/// Convert a speed from meters/second to kilometers/hour.
pub fn mps_to_kmph(speed_ms: f64) -> f64 {
    speed_ms * 3600.0 / 1000.0
}

/// Format a speed given in meters/second as km/h with one decimal place.
pub fn format_speed_kmph(speed_ms: f64) -> String {
    format!("{:.1}", mps_to_kmph(speed_ms))
}

fn pose_msg(point: &PathPoint) -> PoseMsg {
    PoseMsg {
        position: Point::new(point.x, point.y, point.z),
        orientation: quaternion_from_yaw(point.heading),
    }
}

fn offset_points(path: &ReplayedPath, z_offset_m: f64) -> Vec<Point> {
    path.points
        .iter()
        .map(|p| Point::new(p.x, p.y, p.z + z_offset_m))
        .collect()
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
