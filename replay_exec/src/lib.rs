//! # Replay library.
//!
//! Replays a pre-recorded route to a vehicle controller. The core of the library is the
//! [`route`] store and the [`planner`], which together pick the slice of the recorded route lying
//! just ahead of the vehicle. Everything else in here connects that core to the outside world.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Localisation - the vehicle's pose as seen by the planner
pub mod loc;

/// Route store - holds the deduplicated global route
pub mod route;

/// Replay path planner - extracts the window of the route ahead of the vehicle
pub mod planner;

/// Data store - the mutable state of the executable and its message handlers
pub mod data_store;

/// Publishing - renders replayed paths into outgoing messages
pub mod publish;

/// Ingest client - receives odometry, routes and cruise speeds from the network
pub mod ingest_client;

/// Path server - publishes the replayed path to the network
pub mod path_server;

/// Executable parameters
pub mod params;

/// Loading of recorded routes from disk
pub mod route_file;
