//! # Replay Test
//!
//! This binary allows the replay planner to be run without the network or a vehicle. A recorded
//! route is loaded from a CSV file (or a demo route is generated) and a simulated vehicle drives
//! along the replayed paths at the cruise speed, one planning period per step. Every path is
//! saved into the session directory for later inspection.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::path::PathBuf;

use color_eyre::{
    eyre::{eyre, WrapErr},
    Result,
};
use log::{info, warn};
use structopt::StructOpt;

use comms_if::msg::{Header, OdometryMsg, PathMsg, Point, PoseMsg, TwistMsg, Vector3};
use replay_lib::{
    data_store::DataStore,
    loc::{quaternion_from_yaw, Pose},
    params::ReplayExecParams,
    planner::{ReplayPathPlanner, ReplayedPath},
    publish,
    route::RoutePoint,
    route_file,
};
use util::{
    logger::{logger_init, LevelFilter},
    maths::lin_map,
    session::Session,
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, StructOpt)]
#[structopt(name = "replay_test", about = "Replay a recorded route with a simulated vehicle")]
struct Args {
    /// CSV file holding the recorded route, a demo route is used if not given
    #[structopt(parse(from_os_str))]
    route: Option<PathBuf>,

    /// Number of planning steps to simulate
    #[structopt(short, long, default_value = "60")]
    steps: usize,

    /// Parameter file to use instead of the default parameters
    #[structopt(short, long, parse(from_os_str))]
    params: Option<PathBuf>,
}

// ------------------------------------------------------------------------------------------------
// MAIN
// ------------------------------------------------------------------------------------------------

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::from_args();

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session =
        Session::new("replay_test", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Debug, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Replay Test\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let params: ReplayExecParams = match args.params {
        Some(ref p) => {
            util::params::load_from_path(p).wrap_err("Could not load exec params")?
        }
        None => ReplayExecParams::default(),
    };

    params.validate().wrap_err("Invalid exec params")?;

    info!("Exec parameters: {:#?}", params);

    // ---- LOAD ROUTE ----

    let samples = match args.route {
        Some(ref p) => {
            info!("Loading route from {:?}", p);
            route_file::load_csv(p).wrap_err("Could not load the route")?
        }
        None => {
            info!("No route given, using the demo route");
            demo_route()
        }
    };

    if samples.is_empty() {
        return Err(eyre!("The route contains no samples"));
    }

    route_file::save_csv(session.session_root.join("route.csv"), &samples)
        .wrap_err("Could not save the route into the session")?;

    // ---- MODULE INIT ----

    let planner =
        ReplayPathPlanner::new(params.path_length).wrap_err("Failed to create the planner")?;

    let mut ds = DataStore::new(params.default_cruise_speed_ms);

    // Routes arrive the same way as on the network
    ds.handle_route(&route_msg(&samples, &params.frame_id));

    let start = samples[0];
    let mut pose = Pose::new(start.x, start.y, start.heading);

    // ---- MAIN LOOP ----

    for step in 0..args.steps {
        ds.handle_odometry(&odometry_msg(&pose, ds.cruise_speed_ms));

        if !ds.plan(&planner, params.interp_spacing_m) {
            warn!("Nothing planned at step {}", step);
            break;
        }

        let path = match ds.last_path {
            Some(ref p) => p.clone(),
            None => break,
        };

        let header = Header::now(&params.frame_id);
        let outputs = publish::render(&path, ds.cruise_speed_ms, &header);

        info!(
            "Step {:04}: pose ({:.2}, {:.2}, {:.2}), {} points from route index {}, {:.2} m long",
            step,
            pose.x,
            pose.y,
            pose.yaw,
            path.len(),
            path.points.first().map(|p| p.route_index).unwrap_or(0),
            path.get_length()
        );

        session.save(format!("paths/path_{:04}.json", step), path.clone());
        session.save(format!("outputs/outputs_{:04}.json", step), outputs);

        // Reached the end of the route
        if path.len() < 2 {
            info!("End of route reached");
            break;
        }

        pose = drive_along(&path, ds.cruise_speed_ms * params.plan_period_s);
    }

    // ---- SHUTDOWN ----

    session.exit();

    Ok(())
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Winding route sampled twice per point, as a logger recording a stopped vehicle would.
fn demo_route() -> Vec<RoutePoint> {
    const NUM_POINTS: usize = 400;
    const SPACING_M: f64 = 0.5;
    const AMPLITUDE_M: f64 = 5.0;
    const WAVELENGTH_M: f64 = 50.0;

    let k = 2.0 * std::f64::consts::PI / WAVELENGTH_M;

    (0..NUM_POINTS)
        .flat_map(|i| {
            let x = i as f64 * SPACING_M;
            let y = AMPLITUDE_M * (k * x).sin();
            let heading = (AMPLITUDE_M * k * (k * x).cos()).atan();

            let p = RoutePoint::new(x, y, 0.0, heading);
            vec![p, p]
        })
        .collect()
}

/// Position the vehicle `dist_m` along the path from its first point.
///
/// Stops at the end of the path if it is shorter than the distance.
fn drive_along(path: &ReplayedPath, dist_m: f64) -> Pose {
    let mut remaining_m = dist_m;

    for seg in path.points.windows(2) {
        let (start, end) = (&seg[0], &seg[1]);
        let length_m = start.position().dist(&end.position());

        if remaining_m <= length_m && length_m > 0.0 {
            return Pose::new(
                lin_map((0.0, length_m), (start.x, end.x), remaining_m),
                lin_map((0.0, length_m), (start.y, end.y), remaining_m),
                end.heading,
            );
        }

        remaining_m -= length_m;
    }

    match path.points.last() {
        Some(p) => Pose::new(p.x, p.y, p.heading),
        None => Pose::default(),
    }
}

fn route_msg(samples: &[RoutePoint], frame_id: &str) -> PathMsg {
    PathMsg {
        header: Header::now(frame_id),
        poses: samples
            .iter()
            .map(|s| PoseMsg {
                position: Point::new(s.x, s.y, s.z),
                orientation: quaternion_from_yaw(s.heading),
            })
            .collect(),
    }
}

fn odometry_msg(pose: &Pose, speed_ms: f64) -> OdometryMsg {
    OdometryMsg {
        header: Header::default(),
        pose: PoseMsg {
            position: Point::new(pose.x, pose.y, 0.0),
            orientation: quaternion_from_yaw(pose.yaw),
        },
        twist: TwistMsg {
            linear: Vector3::new(speed_ms * pose.yaw.cos(), speed_ms * pose.yaw.sin(), 0.0),
            ..Default::default()
        },
    }
}
