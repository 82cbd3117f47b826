//! # Communications interface crate.
//!
//! Provides the message definitions exchanged between the replay planner and the rest of the
//! vehicle software, along with the network layer used to move them around.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Message definitions for odometry, routes, paths, waypoints and visualisation markers
pub mod msg;

/// Network module
pub mod net;
