//! # Data Store
//!
//! Holds all mutable state of the replay executable. Inputs are applied to the store through the
//! `handle_*` functions from the main loop only, so the planner always sees a consistent pose and
//! route.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::{debug, info};

use crate::{
    loc::Pose,
    planner::{self, ReplayPathPlanner, ReplayedPath},
    route::{RoutePoint, RouteStore},
};
use comms_if::msg::{OdometryMsg, PathMsg, ReplayInput};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Global data store for the executable.
#[derive(Default)]
pub struct DataStore {
    // Cycle management
    /// Number of cycles already executed
    pub num_cycles: u128,

    /// True if the planner is to be run this cycle
    pub is_plan_cycle: bool,

    /// Session elapsed time at the start of the cycle
    pub elapsed_s: f64,

    // Localisation
    /// Latest pose of the vehicle, `None` until the first odometry message
    pub pose: Option<Pose>,

    /// Latest planar speed of the vehicle in meters/second
    pub speed_ms: f64,

    // Route
    pub route_store: RouteStore,

    /// Target speed attached to the output waypoints, in meters/second
    pub cruise_speed_ms: f64,

    // Planning
    /// The most recently planned path, `None` until the first plan
    pub last_path: Option<ReplayedPath>,

    // Monitoring Counters
    /// Number of consecutive cycle overruns
    pub num_consec_cycle_overruns: u64,
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl DataStore {
    /// Create a new data store with the given cruise speed.
    pub fn new(default_cruise_speed_ms: f64) -> Self {
        Self {
            cruise_speed_ms: default_cruise_speed_ms,
            ..Default::default()
        }
    }

    /// Apply any input message to the store.
    pub fn handle(&mut self, input: ReplayInput) {
        match input {
            ReplayInput::Odometry(ref msg) => self.handle_odometry(msg),
            ReplayInput::GlobalRoute(ref msg) => self.handle_route(msg),
            ReplayInput::CruiseSpeed(speed_ms) => self.handle_cruise_speed(speed_ms),
        }
    }

    /// Update the vehicle's pose and speed.
    pub fn handle_odometry(&mut self, msg: &OdometryMsg) {
        let (pose, speed_ms) = Pose::from_odometry(msg);

        self.pose = Some(pose);
        self.speed_ms = speed_ms;
    }

    /// Replace the global route.
    pub fn handle_route(&mut self, msg: &PathMsg) {
        self.route_store
            .rebuild(msg.poses.iter().map(RoutePoint::from_pose_msg));
    }

    /// Set the cruise speed.
    pub fn handle_cruise_speed(&mut self, speed_ms: f64) {
        debug!("Cruise speed set to {} m/s", speed_ms);
        self.cruise_speed_ms = speed_ms;
    }

    /// Perform actions required at the start of a cycle.
    ///
    /// Sets the plan cycle flag if this cycle falls on a planning period boundary. The first
    /// cycle is always a plan cycle.
    pub fn cycle_start(&mut self, cycle_frequency_hz: f64, plan_period_s: f64) {
        let cycles_per_plan = (plan_period_s * cycle_frequency_hz).round().max(1.0) as u128;

        self.is_plan_cycle = self.num_cycles % cycles_per_plan == 0;

        self.elapsed_s = util::session::get_elapsed_seconds();
    }

    /// Perform actions required at the end of a cycle.
    pub fn cycle_end(&mut self) {
        self.num_cycles += 1;
    }

    /// Plan a new path from the current pose and route.
    ///
    /// If no odometry has been received yet the path is planned from the origin. If the route is
    /// empty nothing is planned, the previous path is kept and `false` is returned.
    ///
    /// When `interp_spacing_m` is given the path is densified to that spacing.
    pub fn plan(&mut self, planner: &ReplayPathPlanner, interp_spacing_m: Option<f64>) -> bool {
        let route = self.route_store.snapshot();

        if route.is_empty() {
            return false;
        }

        let pose = self.pose.unwrap_or_default();

        let mut path = planner.get_replayed_path(&pose, &route);

        if let Some(spacing_m) = interp_spacing_m {
            path = planner::interpolate(&path, spacing_m);
        }

        match path.points.first() {
            Some(first) => debug!(
                "Planned {} points starting at route index {} from ({:.2}, {:.2})",
                path.len(),
                first.route_index,
                pose.x,
                pose.y
            ),
            None => info!("Planned an empty path"),
        }

        self.last_path = Some(path);

        true
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::loc::quaternion_from_yaw;
    use comms_if::msg::{Point, PoseMsg, TwistMsg, Vector3};

    fn route_msg(points: &[(f64, f64)]) -> PathMsg {
        PathMsg {
            poses: points
                .iter()
                .map(|&(x, y)| PoseMsg {
                    position: Point::new(x, y, 0.0),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        }
    }

    fn odometry_msg(x: f64, y: f64) -> OdometryMsg {
        OdometryMsg {
            pose: PoseMsg {
                position: Point::new(x, y, 0.0),
                orientation: quaternion_from_yaw(0.25),
            },
            twist: TwistMsg {
                linear: Vector3::new(0.6, 0.8, 0.0),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn line(n: usize) -> Vec<(f64, f64)> {
        (0..n).map(|i| (i as f64, 0.0)).collect()
    }

    #[test]
    fn test_handlers() {
        let mut ds = DataStore::new(5.0);
        assert_eq!(ds.cruise_speed_ms, 5.0);
        assert!(ds.pose.is_none());

        ds.handle(ReplayInput::Odometry(odometry_msg(3.0, 4.0)));
        let pose = ds.pose.unwrap();
        assert_eq!((pose.x, pose.y), (3.0, 4.0));
        assert!((pose.yaw - 0.25).abs() < 1e-9);
        assert!((ds.speed_ms - 1.0).abs() < 1e-9);

        ds.handle(ReplayInput::CruiseSpeed(2.5));
        assert_eq!(ds.cruise_speed_ms, 2.5);

        ds.handle(ReplayInput::GlobalRoute(route_msg(&[
            (0.0, 0.0),
            (0.0, 0.0005),
            (1.0, 0.0),
        ])));
        assert_eq!(ds.route_store.snapshot().len(), 2);

        // A new route replaces the old one entirely
        ds.handle(ReplayInput::GlobalRoute(route_msg(&line(7))));
        assert_eq!(ds.route_store.snapshot().len(), 7);
    }

    #[test]
    fn test_plan_cycles() {
        let mut ds = DataStore::default();
        let mut plan_cycles = Vec::new();

        for _ in 0..200 {
            ds.cycle_start(60.0, 1.0);
            if ds.is_plan_cycle {
                plan_cycles.push(ds.num_cycles);
            }
            ds.cycle_end();
        }

        assert_eq!(plan_cycles, vec![0, 60, 120, 180]);

        // Planning period shorter than a cycle plans every cycle
        let mut ds = DataStore::default();
        for _ in 0..3 {
            ds.cycle_start(10.0, 0.01);
            assert!(ds.is_plan_cycle);
            ds.cycle_end();
        }
    }

    #[test]
    fn test_plan_requires_route() {
        let planner = ReplayPathPlanner::new(10).unwrap();
        let mut ds = DataStore::new(5.0);

        ds.handle_odometry(&odometry_msg(1.0, 0.0));
        assert!(!ds.plan(&planner, None));
        assert!(ds.last_path.is_none());

        ds.handle_route(&route_msg(&line(50)));
        ds.handle_odometry(&odometry_msg(20.4, 0.0));
        assert!(ds.plan(&planner, None));

        let xs: Vec<f64> = ds
            .last_path
            .as_ref()
            .unwrap()
            .points
            .iter()
            .map(|p| p.x)
            .collect();
        assert_eq!(xs, (20..30).map(|x| x as f64).collect::<Vec<_>>());

        // Emptying the route keeps the last path
        ds.handle_route(&route_msg(&[]));
        assert!(!ds.plan(&planner, None));
        assert_eq!(ds.last_path.as_ref().unwrap().len(), 10);
    }

    #[test]
    fn test_plan_without_pose() {
        let planner = ReplayPathPlanner::new(3).unwrap();
        let mut ds = DataStore::new(5.0);

        ds.handle_route(&route_msg(&[(5.0, 0.0), (0.5, 0.0), (-3.0, 0.0), (-4.0, 0.0)]));
        assert!(ds.plan(&planner, None));

        let path = ds.last_path.unwrap();
        assert_eq!(path.points[0].route_index, 1);
        assert_eq!(path.len(), 3);
    }

    #[test]
    fn test_plan_interpolated() {
        let planner = ReplayPathPlanner::new(3).unwrap();
        let mut ds = DataStore::new(5.0);

        ds.handle_route(&route_msg(&line(10)));
        assert!(ds.plan(&planner, Some(0.5)));

        let path = ds.last_path.unwrap();
        assert_eq!(path.len(), 5);
        assert_eq!(path.points[4].x, 2.0);
    }
}
