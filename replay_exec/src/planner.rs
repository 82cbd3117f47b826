//! # Replay Path Planner
//!
//! Extracts the part of the global route lying ahead of the vehicle.
//!
//! Planning is done in two steps:
//!
//! 1. The anchor, the route point nearest to the vehicle, is found by scanning the whole route.
//!    If several points are equally near the one with the lowest index wins, so the same inputs
//!    always pick the same anchor and a route that loops back over itself does not flip between
//!    its two passes.
//! 2. Starting at the anchor the route is walked forwards, in the order it was recorded, until
//!    `path_length` points have been collected or the route runs out.
//!
//! The planner holds no state between calls, the output depends only on the pose and route it is
//! given.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use crate::{
    loc::{Pose, Position2D},
    route::{Route, RoutePoint},
};
use util::maths::{get_ang_dist, lin_map, wrap_pi};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Smallest spacing used when densifying a path, finer spacings are raised to this.
pub const MIN_INTERP_SPACING_M: f64 = 0.01;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Plans replayed paths from a global route.
#[derive(Debug, Clone)]
pub struct ReplayPathPlanner {
    /// Maximum number of points in a replayed path
    path_length: usize,
}

/// A point of a replayed path.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathPoint {
    /// Index in the route of the point this one was copied from
    pub route_index: usize,

    pub x: f64,
    pub y: f64,
    pub z: f64,

    /// Heading in radians, in the range [-pi, pi]
    pub heading: f64,
}

/// The window of the route ahead of the vehicle.
///
/// Points are copies of the route's points in route order, the path stays valid after the
/// route it came from is replaced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplayedPath {
    pub points: Vec<PathPoint>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum PlannerError {
    #[error("The path length must be at least one point")]
    ZeroPathLength,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ReplayPathPlanner {
    /// Create a new planner producing paths of at most `path_length` points.
    pub fn new(path_length: usize) -> Result<Self, PlannerError> {
        if path_length == 0 {
            return Err(PlannerError::ZeroPathLength);
        }

        Ok(Self { path_length })
    }

    /// Maximum number of points in a replayed path.
    pub fn path_length(&self) -> usize {
        self.path_length
    }

    /// Find the index of the route point nearest to the pose.
    ///
    /// Ties go to the lowest index. Returns `None` if the route is empty.
    pub fn find_anchor(&self, pose: &Pose, route: &Route) -> Option<usize> {
        let position = pose.position();

        let mut anchor: Option<(usize, f64)> = None;

        for (index, point) in route.points().iter().enumerate() {
            let dist_m = point.position().dist(&position);

            // Strictly less than, so an equally near later point never replaces an earlier one
            match anchor {
                Some((_, best_dist_m)) if !(dist_m < best_dist_m) => (),
                _ => anchor = Some((index, dist_m)),
            }
        }

        anchor.map(|(index, _)| index)
    }

    /// Get the path to replay from the current pose.
    ///
    /// The path starts at the route point nearest to the pose and follows the route forwards for
    /// at most `path_length` points. An empty route gives an empty path, meaning there is nothing
    /// to drive.
    pub fn get_replayed_path(&self, pose: &Pose, route: &Route) -> ReplayedPath {
        let anchor = match self.find_anchor(pose, route) {
            Some(a) => a,
            None => return ReplayedPath::new_empty(),
        };

        let points = route.points()[anchor..]
            .iter()
            .take(self.path_length)
            .enumerate()
            .map(|(offset, point)| PathPoint::from_route_point(anchor + offset, point))
            .collect();

        ReplayedPath { points }
    }
}

impl PathPoint {
    pub fn from_route_point(route_index: usize, point: &RoutePoint) -> Self {
        Self {
            route_index,
            x: point.x,
            y: point.y,
            z: point.z,
            heading: point.heading,
        }
    }

    pub fn position(&self) -> Position2D {
        Position2D::new(self.x, self.y)
    }
}

impl ReplayedPath {
    pub fn new_empty() -> Self {
        Self { points: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Length of the path along its points in meters.
    pub fn get_length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|seg| seg[0].position().dist(&seg[1].position()))
            .sum()
    }
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Densify a replayed path so that consecutive points are at most `spacing_m` apart.
///
/// Points are inserted by linear interpolation of position along each segment, the heading turns
/// the short way round between the segment's end headings. Points of the input path are kept as
/// they are, inserted points take the route index of the start of their segment.
///
/// If the spacing is not a positive finite number the path is returned unchanged. Spacings below
/// [`MIN_INTERP_SPACING_M`] are raised to it.
pub fn interpolate(path: &ReplayedPath, spacing_m: f64) -> ReplayedPath {
    if !(spacing_m.is_finite() && spacing_m > 0.0) || path.len() < 2 {
        return path.clone();
    }

    let spacing_m = spacing_m.max(MIN_INTERP_SPACING_M);

    let mut points = Vec::with_capacity(path.len());

    for seg in path.points.windows(2) {
        let (start, end) = (&seg[0], &seg[1]);
        points.push(*start);

        let length_m = start.position().dist(&end.position());
        let num_steps = (length_m / spacing_m).ceil() as usize;
        let head_diff_rad = get_ang_dist(start.heading, end.heading);

        for step in 1..num_steps {
            let s = step as f64 / num_steps as f64;

            points.push(PathPoint {
                route_index: start.route_index,
                x: lin_map((0.0, 1.0), (start.x, end.x), s),
                y: lin_map((0.0, 1.0), (start.y, end.y), s),
                z: lin_map((0.0, 1.0), (start.z, end.z), s),
                heading: wrap_pi(start.heading + s * head_diff_rad),
            });
        }
    }

    if let Some(last) = path.points.last() {
        points.push(*last);
    }

    ReplayedPath { points }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
