//! Main robot-side executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise all modules
//!     - Main loop:
//!         - System input acquisition:
//!             - Joint angle sensing
//!         - Operator frame processing and handling
//!         - Choreography processing
//!         - Joint control processing
//!         - Actuator execution
//!         - Telemetry return
//!
//! # Modules
//!
//! All modules (e.g. `joint_ctrl`) shall meet the following requirements:
//!     1. Provide a public struct implementing the `util::module::State` trait.
//!
//! Failures degrade rather than halt: a lost operator frame leaves the last
//! commanded state in force, a telemetry failure only drops the health flag,
//! a module processing error is logged and the cycle carries on.

// ---------------------------------------------------------------------------
// USE MODULES FROM LIBRARY
// ---------------------------------------------------------------------------

use bot_lib::{
    data_store::DataStore,
    eqpt::{sim::SimEqpt, Actuator, AngleSensor, JointId},
    op_processor,
    params::BotExecParams,
};
use comms_if::{
    frame::{BotFrame, OpFrame},
    net::{NetParams, SendStatus, TelemLink},
};

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{eyre::WrapErr, Report};
use log::{info, warn};
use serde::Serialize;
use std::thread;
use std::time::{Duration, Instant};

// Internal
use util::{
    logger::{logger_init, LevelFilter},
    module::State,
    session::Session,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Snapshot of the module status reports, saved into the session on exit.
#[derive(Serialize)]
struct ExecReport {
    num_cycles: u128,
    right_joint: bot_lib::joint_ctrl::StatusReport,
    left_joint: bot_lib::joint_ctrl::StatusReport,
    choreo: bot_lib::choreo::StatusReport,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("bot_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Trace, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Biped Robot Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let exec_params: BotExecParams =
        util::params::load("bot_exec.toml").wrap_err("Could not load exec params")?;

    let net_params: NetParams =
        util::params::load("net.toml").wrap_err("Could not load net params")?;

    info!("Exec parameters loaded");

    let cycle_frequency_hz = 1.0 / exec_params.cycle_period_s;

    // ---- INITIALISE DATASTORE ----

    info!("Initialising modules...");

    let mut ds = DataStore::default();

    // ---- INITIALISE MODULES ----

    ds.right_joint
        .init("joint_ctrl.toml", &session)
        .wrap_err("Failed to initialise right JointCtrl")?;
    ds.left_joint
        .init("joint_ctrl.toml", &session)
        .wrap_err("Failed to initialise left JointCtrl")?;
    info!("JointCtrl init complete");

    ds.choreo
        .init((), &session)
        .wrap_err("Failed to initialise Choreo")?;
    info!("Choreo init complete");

    info!("Module initialisation complete\n");

    // ---- INITIALISE NETWORK ----

    info!("Initialising network");

    let mut link: TelemLink<OpFrame> =
        TelemLink::new(&net_params.bot).wrap_err("Failed to initialise the telemetry link")?;

    info!("Network initialisation complete");

    // ---- INITIALISE EQUIPMENT ----

    // Stand-in plant. The target hardware provides its own implementation of
    // the equipment traits over the motor drivers and encoders.
    let mut eqpt = SimEqpt::new();

    // ---- MAIN LOOP ----

    info!("Begining main loop\n");

    loop {
        // Get cycle start time
        let cycle_start_instant = Instant::now();

        // Clear items that need wiping at the start of the cycle
        ds.cycle_start(cycle_frequency_hz);

        // ---- DATA INPUT ----

        eqpt.step(cycle_start_instant);

        ds.right_joint_input.feedback_deg = eqpt.read_angle_deg(JointId::Right);
        ds.right_joint_input.now = cycle_start_instant;
        ds.left_joint_input.feedback_deg = eqpt.read_angle_deg(JointId::Left);
        ds.left_joint_input.now = cycle_start_instant;
        ds.choreo_input.now = cycle_start_instant;

        // ---- OPERATOR FRAME PROCESSING ----

        // A quiet link is not an error, the last commanded state stays in
        // force until a fresher frame arrives
        if let Some(op_frame) = link.latest() {
            op_processor::exec(&mut ds, &op_frame);
        }

        if ds.exit_requested {
            info!("Shutdown requested, stopping");
            break;
        }

        // ---- CHOREOGRAPHY PROCESSING ----

        match ds.choreo.proc(&ds.choreo_input) {
            Ok((o, r)) => {
                ds.choreo_output = o;
                ds.choreo_status_rpt = r;
            }
            Err(e) => warn!("Error during Choreo processing: {}", e),
        };

        // Apply the engine's demands. Fields it left unset retain whatever
        // the joints were last commanded to
        if let Some(k_p) = ds.choreo_output.k_p {
            let (_, k_i, k_d) = ds.right_joint.gains();
            ds.right_joint.set_gains(k_p, k_i, k_d);

            let (_, k_i, k_d) = ds.left_joint.gains();
            ds.left_joint.set_gains(k_p, k_i, k_d);
        }
        if let Some(target) = ds.choreo_output.right_target_deg {
            ds.right_joint.set_target(target);
        }
        if let Some(target) = ds.choreo_output.left_target_deg {
            ds.left_joint.set_target(target);
        }

        // ---- CONTROL ALGORITHM PROCESSING ----

        match ds.right_joint.proc(&ds.right_joint_input) {
            Ok((o, r)) => {
                ds.right_joint_output = o;
                ds.right_joint_status_rpt = r;
            }
            Err(e) => warn!("Error during right JointCtrl processing: {}", e),
        };

        match ds.left_joint.proc(&ds.left_joint_input) {
            Ok((o, r)) => {
                ds.left_joint_output = o;
                ds.left_joint_status_rpt = r;
            }
            Err(e) => warn!("Error during left JointCtrl processing: {}", e),
        };

        eqpt.drive(
            JointId::Right,
            ds.right_joint_output.forward_duty,
            ds.right_joint_output.backward_duty,
        );
        eqpt.drive(
            JointId::Left,
            ds.left_joint_output.forward_duty,
            ds.left_joint_output.backward_duty,
        );

        // ---- TELEMETRY ----

        let (k_p, k_i, k_d) = ds.right_joint.gains();
        let bot_frame = BotFrame {
            k_p,
            k_i,
            k_d,
            right_angle_deg: ds.right_joint.angle_deg(),
            left_angle_deg: ds.left_joint.angle_deg(),
        };

        // Paced drops are part of normal operation, only transmission
        // failures are worth noting and even those just degrade the health
        // flag
        match link.send(&bot_frame) {
            SendStatus::Sent | SendStatus::Paced => (),
            SendStatus::Failed => {
                if ds.link_ok {
                    warn!("Telemetry send failed");
                }
            }
        }
        ds.link_ok = link.healthy();

        if ds.is_1_hz_cycle {
            info!(
                "t = {:.1} s, mode {:?}, move {:?}, right {:.1} deg, left {:.1} deg, link ok: {}",
                ds.elapsed_s,
                ds.op_mode,
                ds.choreo_status_rpt.active_move,
                ds.right_joint.angle_deg(),
                ds.left_joint.angle_deg(),
                ds.link_ok
            );
        }

        // ---- CYCLE MANAGEMENT ----

        let cycle_dur = Instant::now() - cycle_start_instant;

        // Get sleep duration
        match Duration::from_secs_f64(exec_params.cycle_period_s).checked_sub(cycle_dur) {
            Some(d) => thread::sleep(d),
            None => warn!(
                "Cycle overran by {:.06} s",
                cycle_dur.as_secs_f64() - exec_params.cycle_period_s
            ),
        }

        // Increment cycle counter
        ds.num_cycles += 1;
    }

    // ---- SHUTDOWN ----

    session.save_json(
        "exec_report.json",
        &ExecReport {
            num_cycles: ds.num_cycles,
            right_joint: ds.right_joint_status_rpt,
            left_joint: ds.left_joint_status_rpt,
            choreo: ds.choreo_status_rpt,
        },
    );

    info!("End of execution");

    Ok(())
}
