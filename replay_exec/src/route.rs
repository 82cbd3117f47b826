//! # Route
//!
//! The global route is the recorded reference polyline the vehicle replays. Routes arrive as
//! oversampled streams of poses, so consecutive samples that sit on top of each other are dropped
//! before the route is handed to the planner. A zero length segment has no defined direction and
//! would also give the nearest point search two identical candidates.
//!
//! Routes are never edited in place. A new route is built from scratch on every update and swapped
//! in as a whole, readers hold an [`Arc`] to the route they were given and never see a half built
//! one.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::sync::Arc;

use log::info;
use serde::{Deserialize, Serialize};

use crate::loc::{yaw_from_quaternion, Position2D};
use comms_if::msg::PoseMsg;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Two consecutive samples closer than this in both X and Y are considered the same point.
pub const DEDUP_THRESHOLD_M: f64 = 0.001;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A single sample of the recorded route.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoutePoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,

    /// Heading of the route at this point in radians, in the range [-pi, pi].
    pub heading: f64,
}

/// An ordered, deduplicated sequence of route points.
///
/// The order of the points is the order in which the route is to be followed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Route {
    points: Vec<RoutePoint>,
}

/// Holds the current route.
pub struct RouteStore {
    route: Arc<Route>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl RoutePoint {
    pub fn new(x: f64, y: f64, z: f64, heading: f64) -> Self {
        Self { x, y, z, heading }
    }

    /// Build a route point from a pose, taking the heading from the yaw of its orientation.
    pub fn from_pose_msg(pose: &PoseMsg) -> Self {
        Self {
            x: pose.position.x,
            y: pose.position.y,
            z: pose.position.z,
            heading: yaw_from_quaternion(&pose.orientation),
        }
    }

    pub fn position(&self) -> Position2D {
        Position2D::new(self.x, self.y)
    }

    /// Returns true if `other` lies within the dedup threshold of this point on both axes.
    ///
    /// This is a per axis check, not a distance check. Points offset along one axis only are
    /// kept even if the euclidian distance between them is tiny.
    fn coincides_with(&self, other: &RoutePoint) -> bool {
        (self.x - other.x).abs() < DEDUP_THRESHOLD_M && (self.y - other.y).abs() < DEDUP_THRESHOLD_M
    }
}

impl Route {
    /// Create a route with no points.
    pub fn new_empty() -> Self {
        Self { points: Vec::new() }
    }

    /// Build a route from raw samples, dropping any sample which coincides with the last sample
    /// that was kept.
    ///
    /// The first sample is always kept. An empty input gives an empty route.
    pub fn from_samples<I>(samples: I) -> Self
    where
        I: IntoIterator<Item = RoutePoint>,
    {
        let mut points: Vec<RoutePoint> = Vec::new();

        for sample in samples {
            match points.last() {
                Some(last) if last.coincides_with(&sample) => (),
                _ => points.push(sample),
            }
        }

        Self { points }
    }

    pub fn points(&self) -> &[RoutePoint] {
        &self.points
    }

    pub fn get(&self, index: usize) -> Option<&RoutePoint> {
        self.points.get(index)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl RouteStore {
    /// Create a new store holding an empty route.
    pub fn new() -> Self {
        Self {
            route: Arc::new(Route::new_empty()),
        }
    }

    /// Replace the current route with one built from the given raw samples.
    ///
    /// Returns a snapshot of the new route.
    pub fn rebuild<I>(&mut self, samples: I) -> Arc<Route>
    where
        I: IntoIterator<Item = RoutePoint>,
    {
        let mut num_samples = 0usize;

        let route = Arc::new(Route::from_samples(
            samples.into_iter().inspect(|_| num_samples += 1),
        ));

        info!(
            "Received {} points in the global route, {} valid points kept",
            num_samples,
            route.len()
        );

        self.route = route.clone();
        route
    }

    /// Get a snapshot of the current route.
    ///
    /// The snapshot is unaffected by later rebuilds.
    pub fn snapshot(&self) -> Arc<Route> {
        self.route.clone()
    }

    /// Drop the current route.
    pub fn clear(&mut self) {
        self.route = Arc::new(Route::new_empty());
    }

    pub fn is_empty(&self) -> bool {
        self.route.is_empty()
    }
}

impl Default for RouteStore {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
