//! Replay path planner executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise all modules
//!     - Main loop, at the publish rate:
//!         - Input acquisition: odometry, global route and cruise speed
//!         - Path planning, once per planning period and only once a route is known
//!         - Publishing of the latest path, waypoints and markers

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{eyre::WrapErr, Report};
use log::{error, info, warn};
use std::thread;
use std::time::{Duration, Instant};

// Internal
use comms_if::net::{zmq, NetParams};
use replay_lib::{
    data_store::DataStore, ingest_client::IngestClient, params::ReplayExecParams,
    path_server::PathServer, planner::ReplayPathPlanner,
};
use util::{
    logger::{logger_init, LevelFilter},
    session::Session,
};

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("replay_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Debug, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Replay Path Planner Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let params: ReplayExecParams =
        util::params::load("replay_exec.toml").wrap_err("Could not load exec params")?;

    let net_params: NetParams =
        util::params::load("net.toml").wrap_err("Could not load net params")?;

    params.validate().wrap_err("Invalid exec params")?;

    info!("Exec parameters loaded: {:#?}", params);

    let cycle_period = Duration::from_secs_f64(params.cycle_period_s());

    // ---- MODULE INIT ----

    let planner =
        ReplayPathPlanner::new(params.path_length).wrap_err("Failed to create the planner")?;

    let mut ds = DataStore::new(params.default_cruise_speed_ms);

    info!("Module initialisation complete");

    // ---- NETWORK INIT ----

    let zmq_ctx = zmq::Context::new();

    let ingest_client =
        IngestClient::new(&zmq_ctx, &net_params).wrap_err("Failed to create the IngestClient")?;

    let mut path_server =
        PathServer::new(&zmq_ctx, &net_params).wrap_err("Failed to create the PathServer")?;

    info!("Network initialisation complete");

    let mut path_server_connected = false;

    // ---- MAIN LOOP ----

    info!("Begining main loop\n");

    loop {
        // Get cycle start time
        let cycle_start_instant = Instant::now();

        ds.cycle_start(params.publish_rate_hz, params.plan_period_s);

        // ---- DATA INPUT ----

        if !ingest_client.is_alive() {
            error!("IngestClient stopped receiving, exiting");
            break;
        }

        for input in ingest_client.drain() {
            ds.handle(input);
        }

        // ---- PLANNING ----

        if ds.is_plan_cycle && ds.plan(&planner, params.interp_spacing_m) && params.save_paths {
            if let Some(ref path) = ds.last_path {
                session.save(format!("paths/path_{:06}.json", ds.num_cycles), path.clone());
            }
        }

        // ---- PUBLISHING ----

        if path_server.connected() != path_server_connected {
            path_server_connected = !path_server_connected;
            match path_server_connected {
                true => info!("PathServer subscriber connected"),
                false => warn!("PathServer subscriber disconnected"),
            }
        }

        if let Some(ref path) = ds.last_path {
            if let Err(e) = path_server.publish(path, ds.cruise_speed_ms, &params.frame_id) {
                warn!("PathServer error: {}", e);
            }
        }

        // ---- CYCLE MANAGEMENT ----

        let cycle_dur = Instant::now() - cycle_start_instant;

        // Get sleep duration
        match cycle_period.checked_sub(cycle_dur) {
            Some(d) => {
                ds.num_consec_cycle_overruns = 0;
                thread::sleep(d);
            }
            None => {
                warn!(
                    "Cycle starting at {:.06} s overran by {:.06} s",
                    ds.elapsed_s,
                    cycle_dur.as_secs_f64() - cycle_period.as_secs_f64()
                );
                ds.num_consec_cycle_overruns += 1;
            }
        }

        ds.cycle_end();
    }

    // ---- SHUTDOWN ----

    drop(ingest_client);
    session.exit();

    info!("End of execution");

    Ok(())
}
