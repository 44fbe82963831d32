//! Main vehicle controller executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise all modules
//!     - Main loop:
//!         - Input acquisition (scripted raw channels, sample-and-hold)
//!         - Frame processing:
//!             - Control sample derivation
//!             - Mode arbitration
//!             - Waypoint navigation (kinematic pose move)
//!         - Fixed processing:
//!             - Force actuation demands onto the body
//!             - Telemetry recording
//!         - Body integration
//!
//! The executable runs both cadences at a single fixed cycle rate.

// ---------------------------------------------------------------------------
// USE MODULES FROM LIBRARY
// ---------------------------------------------------------------------------

use veh_lib::{
    data_store::DataStore,
    sim_body::{SimBody, SimBodyParams},
    veh_ctrl,
};

mod params;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{
    eyre::{eyre, WrapErr},
    Report,
};
use log::{debug, info, warn};
use std::env;
use std::thread;
use std::time::{Duration, Instant};

// Internal
use params::ExecParams;
use util::{
    archive::Archived,
    logger::{logger_init, LevelFilter},
    raise_error,
    script::{InputScript, PendingSample},
    session::Session,
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Target period of one cycle.
const CYCLE_PERIOD_S: f64 = 0.02;

/// Number of cycles per second
const CYCLE_FREQUENCY_HZ: f64 = 1.0 / CYCLE_PERIOD_S;

/// Limit on the number of consecutive cycle overruns before the run aborts.
const MAX_CYCLE_OVERRUN_LIMIT: u64 = 500;

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("veh_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Trace, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Vehicle Controller Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let exec_params: ExecParams =
        util::params::load("veh_exec.toml").wrap_err("Could not load exec params")?;

    let sim_body_params: SimBodyParams =
        util::params::load("sim_body.toml").wrap_err("Could not load sim body params")?;

    info!("Exec parameters loaded");

    // ---- INITIALISE INPUT SOURCE ----

    // Input comes either from a script given as the single CLI argument, or
    // nowhere at all, in which case the idle timeout will hand the vehicle
    // over to autonomous waypoint mode.
    let mut input_source = InputSource::Idle;

    // Collect all arguments
    let args: Vec<String> = env::args().collect();

    debug!("CLI arguments: {:?}", args);

    if args.len() == 2 {
        info!("Loading input script from \"{}\"", &args[1]);

        let script = InputScript::new(&args[1]).wrap_err("Failed to load input script")?;

        info!(
            "Loaded script lasts {:.02} s and contains {} samples\n",
            script.get_duration(),
            script.get_num_samples()
        );

        input_source = InputSource::Script(script);
    } else if args.len() == 1 {
        info!("No input script provided, the vehicle will idle into autonomous mode\n");
    } else {
        return Err(eyre!(
            "Expected either zero or one argument, found {}",
            args.len() - 1
        ));
    }

    // ---- INITIALISE DATASTORE ----

    info!("Initialising modules...");

    let mut ds = DataStore::default();

    // ---- INITIALISE MODULES ----

    ds.veh_ctrl
        .init(
            veh_ctrl::InitData {
                act_ctrl: "act_ctrl.toml",
                wp_nav: "wp_nav.toml",
                mode_mgr: "mode_mgr.toml",
            },
            &session,
        )
        .wrap_err("Failed to initialise VehCtrl")?;
    info!("VehCtrl init complete");

    // Snapshot the loaded waypoint path into the session for later analysis
    session
        .save_json("waypoint_path.json", ds.veh_ctrl.waypoint_path())
        .wrap_err("Failed to save the waypoint path snapshot")?;

    info!("Module initialisation complete\n");

    // ---- INITIALISE BODY ----

    let mut body = SimBody::new(sim_body_params);

    // ---- MAIN LOOP ----

    info!("Begining main loop\n");

    loop {
        // Get cycle start time
        let cycle_start_instant = Instant::now();

        // Update the cycle flags and the simulation clock
        ds.cycle_start(CYCLE_FREQUENCY_HZ);

        if ds.sim_time_s >= exec_params.run_duration_s {
            info!("Run duration ({} s) reached, stopping", exec_params.run_duration_s);
            break;
        }

        // ---- INPUT ACQUISITION ----

        match input_source {
            InputSource::Idle => (),
            InputSource::Script(ref mut script) => match script.get_pending(ds.sim_time_s) {
                PendingSample::None => (),
                PendingSample::Some(sample) => {
                    ds.raw_channels = Some(sample.into());
                }
                // Channels hold their last values once the script is done
                PendingSample::EndOfScript => (),
            },
        }

        // ---- CONTROL ALGORITHM PROCESSING ----

        ds.veh_ctrl
            .frame_tick(&mut body, ds.raw_channels, ds.sim_time_s, CYCLE_PERIOD_S);

        ds.veh_ctrl.fixed_tick(&mut body, ds.sim_time_s, CYCLE_PERIOD_S);

        // Integrate the accumulated demands
        body.step(CYCLE_PERIOD_S);

        // ---- STATUS REPORTING ----

        if ds.is_1_hz_cycle {
            if let Some(tm) = ds.veh_ctrl.latest_tm() {
                info!(
                    "[{}] pos ({:.2}, {:.2}, {:.2}) m, {:.2} m/s, wp {} dir {}",
                    tm.mode,
                    tm.pos_x_m,
                    tm.pos_y_m,
                    tm.pos_z_m,
                    tm.speed_mps,
                    tm.wp_target_index,
                    tm.wp_direction
                );
            }
        }

        // ---- WRITE ARCHIVES ----

        match ds.veh_ctrl.write() {
            Ok(_) => (),
            Err(e) => warn!("Could not write telemetry archive: {}", e),
        }

        // ---- CYCLE MANAGEMENT ----

        let cycle_dur = Instant::now() - cycle_start_instant;

        // Get sleep duration
        match Duration::from_secs_f64(CYCLE_PERIOD_S).checked_sub(cycle_dur) {
            Some(d) => {
                ds.num_consec_cycle_overruns = 0;
                thread::sleep(d);
            }
            None => {
                warn!(
                    "Cycle overran by {:.06} s",
                    cycle_dur.as_secs_f64() - CYCLE_PERIOD_S
                );
                ds.num_consec_cycle_overruns += 1;

                if ds.num_consec_cycle_overruns > MAX_CYCLE_OVERRUN_LIMIT {
                    raise_error!(
                        "More than {} consecutive cycle overruns!",
                        MAX_CYCLE_OVERRUN_LIMIT
                    );
                }
            }
        }

        // Increment cycle counter
        ds.num_cycles += 1;
    }

    // ---- SHUTDOWN ----

    info!("End of execution");

    Ok(())
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Various sources for the raw input channels incoming to the exec.
enum InputSource {
    /// No input device, all channels read as zero
    Idle,

    /// Channels played back from an input script
    Script(InputScript),
}
