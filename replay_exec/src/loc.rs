//! # Localisation module
//!
//! The planner only needs a planar pose. Odometry messages carry a full 3D orientation, which is
//! decomposed into roll, pitch and yaw here, keeping only the yaw.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::UnitQuaternion;
use serde::{Deserialize, Serialize};

use comms_if::msg::{OdometryMsg, Quaternion};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A position on the map plane.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Position2D {
    pub x: f64,
    pub y: f64,
}

/// The current pose of the vehicle in the map frame.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Position along the map X axis
    pub x: f64,

    /// Position along the map Y axis
    pub y: f64,

    /// Heading of the vehicle, the angle to the map X axis in radians.
    pub yaw: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Position2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Planar euclidian distance to another position.
    pub fn dist(&self, other: &Position2D) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl Pose {
    pub fn new(x: f64, y: f64, yaw: f64) -> Self {
        Self { x, y, yaw }
    }

    /// Return the position of the pose.
    pub fn position(&self) -> Position2D {
        Position2D::new(self.x, self.y)
    }

    /// Build a pose from an odometry message.
    ///
    /// Returns the pose and the planar speed of the vehicle in meters/second.
    pub fn from_odometry(msg: &OdometryMsg) -> (Self, f64) {
        let pose = Self {
            x: msg.pose.position.x,
            y: msg.pose.position.y,
            yaw: yaw_from_quaternion(&msg.pose.orientation),
        };

        let speed_ms = msg.twist.linear.x.hypot(msg.twist.linear.y);

        (pose, speed_ms)
    }
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Extract the yaw from an orientation quaternion using a roll-pitch-yaw decomposition.
///
/// The quaternion is normalised first. The result is in the range [-pi, pi].
pub fn yaw_from_quaternion(q: &Quaternion) -> f64 {
    UnitQuaternion::from_quaternion(nalgebra::Quaternion::new(q.w, q.x, q.y, q.z))
        .euler_angles()
        .2
}

/// Build the quaternion of a pure rotation about the vertical axis.
pub fn quaternion_from_yaw(yaw: f64) -> Quaternion {
    let coords = UnitQuaternion::from_euler_angles(0.0, 0.0, yaw)
        .into_inner()
        .coords;

    Quaternion {
        x: coords[0],
        y: coords[1],
        z: coords[2],
        w: coords[3],
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use comms_if::msg::{PoseMsg, TwistMsg, Vector3, Point};
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    const EPS: f64 = 1e-9;

    #[test]
    fn test_yaw_from_quaternion() {
        assert!(yaw_from_quaternion(&Quaternion::identity()).abs() < EPS);

        let quarter_turn = Quaternion {
            x: 0.0,
            y: 0.0,
            z: FRAC_PI_4.sin(),
            w: FRAC_PI_4.cos(),
        };
        assert!((yaw_from_quaternion(&quarter_turn) - FRAC_PI_2).abs() < EPS);

        // Non-normalised quaternions describe the same rotation
        let scaled = Quaternion {
            x: 0.0,
            y: 0.0,
            z: 2.0 * FRAC_PI_4.sin(),
            w: 2.0 * FRAC_PI_4.cos(),
        };
        assert!((yaw_from_quaternion(&scaled) - FRAC_PI_2).abs() < EPS);
    }

    #[test]
    fn test_quaternion_from_yaw() {
        for &yaw in [0.0, 0.3, -1.2, FRAC_PI_2, PI - 0.01].iter() {
            let q = quaternion_from_yaw(yaw);
            assert!((yaw_from_quaternion(&q) - yaw).abs() < EPS);
            assert!(q.x.abs() < EPS && q.y.abs() < EPS);
        }
    }

    #[test]
    fn test_pose_from_odometry() {
        let msg = OdometryMsg {
            pose: PoseMsg {
                position: Point::new(4.0, -2.0, 1.0),
                orientation: quaternion_from_yaw(0.5),
            },
            twist: TwistMsg {
                linear: Vector3::new(3.0, 4.0, 10.0),
                ..Default::default()
            },
            ..Default::default()
        };

        let (pose, speed_ms) = Pose::from_odometry(&msg);

        assert_eq!(pose.x, 4.0);
        assert_eq!(pose.y, -2.0);
        assert!((pose.yaw - 0.5).abs() < EPS);

        // Vertical velocity does not count towards the speed
        assert!((speed_ms - 5.0).abs() < EPS);
    }

    #[test]
    fn test_position_dist() {
        let a = Position2D::new(1.0, 1.0);
        let b = Position2D::new(4.0, 5.0);
        assert_eq!(a.dist(&b), 5.0);
        assert_eq!(b.dist(&a), 5.0);
    }
}
