//! Main operator console executable entry point.
//!
//! # Architecture
//!
//! The console is deliberately thin: it samples its peripherals, keeps the
//! live-tuned gains, and streams one operator frame per pacing window to the
//! robot. All control decisions happen on the robot, so a lost frame costs
//! nothing but freshness.
//!
//! One special behaviour runs at boot: for a short window the console adopts
//! the gains the robot reports, so a console restart never stomps on a tuned
//! and running robot.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod periph;
mod tuning;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{eyre::WrapErr, Report};
use log::{info, warn};
use std::thread;
use std::time::{Duration, Instant};

// Internal
use comms_if::{
    frame::{BotFrame, OpFrame},
    net::{NetParams, SendStatus, TelemLink},
};
use params::RemoteExecParams;
use periph::{DisplayData, Peripherals, SimPeriph};
use tuning::GainTuner;
use util::{
    logger::{logger_init, LevelFilter},
    maths::lin_map,
    session::{self, Session},
};

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session =
        Session::new("remote_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Trace, &session).wrap_err("Failed to initialise logging")?;

    info!("Biped Operator Console Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let exec_params: RemoteExecParams =
        util::params::load("remote_exec.toml").wrap_err("Could not load exec params")?;

    let net_params: NetParams =
        util::params::load("net.toml").wrap_err("Could not load net params")?;

    info!("Exec parameters loaded");

    let cycle_frequency_hz = 1.0 / exec_params.cycle_period_s;

    // ---- INITIALISE NETWORK ----

    let mut link: TelemLink<BotFrame> =
        TelemLink::new(&net_params.remote).wrap_err("Failed to initialise the telemetry link")?;

    info!("Network initialisation complete");

    // ---- INITIALISE PERIPHERALS AND TUNER ----

    // Desk stand-in. The target hardware provides its own implementation of
    // the peripheral trait.
    let mut periph = SimPeriph::default();

    let mut tuner = GainTuner::new(
        exec_params.initial_k_p,
        exec_params.initial_k_i,
        exec_params.initial_k_d,
        exec_params.gain_step,
    );

    let gain_sync_window_ms = net_params.remote.gain_sync_window_ms as f64;
    let mut gain_sync_done = false;

    // ---- MAIN LOOP ----

    info!("Begining main loop\n");

    let mut num_cycles: u128 = 0;
    let mut link_ok = false;
    let mut low_power = false;

    loop {
        let cycle_start_instant = Instant::now();

        // ---- PERIPHERAL INPUT ----

        periph.update();

        tuner.update(periph.rotary_pos(), periph.rotary_sw_down());

        // ---- GAIN SYNCHRONISATION ----

        // For a short window after boot the robot's reported gains win over
        // ours, so restarting the console never stomps on a tuned robot. The
        // window closes on time alone, there is no cancellation path
        if session::get_elapsed_seconds() * 1000.0 < gain_sync_window_ms {
            if let Some(bot_frame) = link.latest() {
                tuner.set_gains(bot_frame.k_p, bot_frame.k_i, bot_frame.k_d);

                if !gain_sync_done {
                    info!(
                        "Gains synchronised from the robot: k_p = {:.2}, k_i = {:.2}, k_d = {:.2}",
                        bot_frame.k_p, bot_frame.k_i, bot_frame.k_d
                    );
                    gain_sync_done = true;
                }
            }
        }

        // ---- FRAME BUILD ----

        let sliders = periph.sliders();
        let (k_p, k_i, k_d) = tuner.gains();

        let op_frame = OpFrame {
            axes: periph.axes(),
            sliders,
            rotary_pos: periph.rotary_pos(),
            rotary_sw_down: periph.rotary_sw_down(),
            key: periph.key().map(|k| k as u8).unwrap_or(0),
            battery_percent: periph.battery_percent(),
            k_p,
            k_i,
            k_d,
            right_target_deg: slider_to_target_deg(sliders[2], &exec_params),
            left_target_deg: slider_to_target_deg(sliders[0], &exec_params),
        };

        // ---- TELEMETRY ----

        if periph.low_power() {
            // Radio silenced, the robot carries on with its last commands
            if !low_power {
                info!("Entering low power, radio silenced");
                low_power = true;
            }
            periph.set_link_led(false);
        } else {
            if low_power {
                info!("Leaving low power");
                low_power = false;
            }

            match link.send(&op_frame) {
                SendStatus::Sent | SendStatus::Paced => (),
                SendStatus::Failed => {
                    if link_ok {
                        warn!("Operator frame send failed");
                    }
                }
            }

            link_ok = link.healthy();
            periph.set_link_led(link_ok);
        }

        // ---- DISPLAY ----

        let bot_frame = link.latest().unwrap_or_default();
        periph.set_display(&DisplayData {
            k_p,
            k_i,
            k_d,
            right_angle_deg: bot_frame.right_angle_deg,
            left_angle_deg: bot_frame.left_angle_deg,
            battery_percent: periph.battery_percent(),
            link_ok,
        });

        if num_cycles % (cycle_frequency_hz as u128) == 0 {
            info!(
                "t = {:.1} s, k_p = {:.2}, right {:.1} deg, left {:.1} deg, link ok: {}",
                session::get_elapsed_seconds(),
                k_p,
                bot_frame.right_angle_deg,
                bot_frame.left_angle_deg,
                link_ok
            );
        }

        // ---- CYCLE MANAGEMENT ----

        let cycle_dur = Instant::now() - cycle_start_instant;

        match Duration::from_secs_f64(exec_params.cycle_period_s).checked_sub(cycle_dur) {
            Some(d) => thread::sleep(d),
            None => warn!(
                "Cycle overran by {:.06} s",
                cycle_dur.as_secs_f64() - exec_params.cycle_period_s
            ),
        }

        num_cycles += 1;
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Map a slider reading onto a joint target angle.
///
/// Slider zero commands the backward limit, full scale the forward limit.
fn slider_to_target_deg(slider: i16, params: &RemoteExecParams) -> u16 {
    lin_map(
        (0.0, params.slider_full_scale),
        (params.backward_limit_deg, params.forward_limit_deg),
        slider as f64,
    ) as u16
}
