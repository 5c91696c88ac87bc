//! # Operator frame processor module
//!
//! The operator frame processor turns the latest console frame into module
//! inputs. The operator mode decides which subsystem owns the joint targets
//! and gains on any given cycle, so the choreography engine and the operator
//! never fight over the same field:
//!
//! - `Pose`: keypad keys snap the legs between authored poses, gains come
//!   from the console's live tuning.
//! - `Slider`: the sliders drive the targets directly, gains come from the
//!   console's live tuning.
//! - `Move`: the choreography engine owns targets and gain, console inputs
//!   other than move selection keys are ignored.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info};

// Internal
use crate::choreo::{MoveId, PoseCmd};
use crate::data_store::DataStore;
use comms_if::frame::OpFrame;
use util::maths::lin_map;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Full scale reading of a console slider.
pub const SLIDER_FULL_SCALE: f64 = 17620.0;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Operator mode, selected with the keypad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpMode {
    Pose,
    Slider,
    Move,
}

impl Default for OpMode {
    fn default() -> Self {
        OpMode::Pose
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Process the latest operator frame.
///
/// Mutates the datastore to send commands to different modules. Called with
/// whatever frame the link last delivered: stale frames simply re-command the
/// targets and gains the console already asked for, while key actions fire
/// once per press.
pub fn exec(ds: &mut DataStore, frame: &OpFrame) {
    // The frame reports the key held down when it was built, and the same
    // frame stays latest until a fresher one lands, so a key only counts on
    // the cycle it first appears. Without this a held '7' would restart the
    // walk from zero every cycle
    let held = frame.key_char();
    let key = if held != ds.last_op_key { held } else { None };
    ds.last_op_key = held;

    ds.op_battery_percent = frame.battery_percent;

    // Mode switching and shutdown keys apply in any mode
    match key {
        Some('1') => set_mode(ds, OpMode::Pose),
        Some('2') => set_mode(ds, OpMode::Slider),
        Some('3') => set_mode(ds, OpMode::Move),
        Some('D') => {
            info!("Shutdown commanded from the console");
            ds.exit_requested = true;
            return;
        }
        _ => (),
    }

    match ds.op_mode {
        OpMode::Pose => {
            if let Some(pose) = pose_for_key(key) {
                debug!("Pose commanded: {:?}", pose);

                let (right, left) = crate::choreo::resolve(pose);
                ds.right_joint.set_target(right);
                ds.left_joint.set_target(left);
            }

            apply_op_gains(ds, frame);
        }
        OpMode::Slider => {
            // Left leg on slider 0, right leg on slider 2. Slider low end is
            // the backward limit so pushing a slider up walks the leg forward
            let left_params = ds.left_joint.params.clone();
            ds.left_joint.set_target(slider_to_target(
                frame.sliders[0],
                left_params.backward_limit_deg,
                left_params.forward_limit_deg,
            ));

            let right_params = ds.right_joint.params.clone();
            ds.right_joint.set_target(slider_to_target(
                frame.sliders[2],
                right_params.backward_limit_deg,
                right_params.forward_limit_deg,
            ));

            apply_op_gains(ds, frame);
        }
        OpMode::Move => {
            if let Some(move_id) = move_for_key(key) {
                ds.choreo_input.start_move = Some(move_id);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn set_mode(ds: &mut DataStore, mode: OpMode) {
    if ds.op_mode == mode {
        return;
    }

    info!("Operator mode changed: {:?} -> {:?}", ds.op_mode, mode);
    ds.op_mode = mode;

    match mode {
        // Entering move mode starts from a relaxed state, leaving it stops
        // playback so the engine cannot fight the operator's inputs
        OpMode::Move => ds.choreo_input.start_move = Some(MoveId::Relax),
        _ => ds.choreo.stop(),
    }
}

/// Apply the console's live-tuned gains to both joints.
fn apply_op_gains(ds: &mut DataStore, frame: &OpFrame) {
    ds.right_joint.set_gains(frame.k_p, frame.k_i, frame.k_d);
    ds.left_joint.set_gains(frame.k_p, frame.k_i, frame.k_d);
}

fn slider_to_target(slider: i16, backward_limit_deg: f64, forward_limit_deg: f64) -> f64 {
    lin_map(
        (0.0, SLIDER_FULL_SCALE),
        (backward_limit_deg, forward_limit_deg),
        slider as f64,
    )
}

fn pose_for_key(key: Option<char>) -> Option<PoseCmd> {
    match key? {
        '0' => Some(PoseCmd::Stand),
        '8' => Some(PoseCmd::Bow(45)),
        '*' => Some(PoseCmd::StepLeft(20)),
        '#' => Some(PoseCmd::StepRight(20)),
        '7' => Some(PoseCmd::KickLeft(90)),
        '9' => Some(PoseCmd::KickRight(90)),
        _ => None,
    }
}

fn move_for_key(key: Option<char>) -> Option<MoveId> {
    match key? {
        '4' => Some(MoveId::Relax),
        '5' => Some(MoveId::Stop),
        '6' => Some(MoveId::Stand),
        '7' => Some(MoveId::Walk),
        '9' => Some(MoveId::Jump),
        'B' => Some(MoveId::Flip),
        '8' => Some(MoveId::Pirouette),
        'A' => Some(MoveId::RoutineA),
        '0' => Some(MoveId::RoutineB),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn frame_with_key(key: char) -> OpFrame {
        OpFrame {
            key: key as u8,
            ..OpFrame::default()
        }
    }

    #[test]
    fn test_mode_switching() {
        let mut ds = DataStore::default();
        assert_eq!(ds.op_mode, OpMode::Pose);

        exec(&mut ds, &frame_with_key('2'));
        assert_eq!(ds.op_mode, OpMode::Slider);

        // Entering move mode requests a relaxed start
        exec(&mut ds, &frame_with_key('3'));
        assert_eq!(ds.op_mode, OpMode::Move);
        assert_eq!(ds.choreo_input.start_move, Some(MoveId::Relax));
    }

    #[test]
    fn test_pose_mode_sets_targets() {
        let mut ds = DataStore::default();

        exec(&mut ds, &frame_with_key('#'));

        // StepRight(20)
        assert_eq!(ds.right_joint.target_deg(), 160.0);
        assert_eq!(ds.left_joint.target_deg(), 200.0);
    }

    #[test]
    fn test_slider_mode_maps_targets() {
        let mut ds = DataStore::default();
        exec(&mut ds, &frame_with_key('2'));

        let mut frame = OpFrame::default();
        // Left leg slider at half scale, right leg slider at full scale
        frame.sliders[0] = 8810;
        frame.sliders[2] = 17620;
        exec(&mut ds, &frame);

        assert_eq!(ds.left_joint.target_deg(), 180.0);
        assert_eq!(ds.right_joint.target_deg(), 90.0);
    }

    #[test]
    fn test_move_mode_ignores_op_gains() {
        let mut ds = DataStore::default();
        exec(&mut ds, &frame_with_key('3'));

        let mut frame = OpFrame::default();
        frame.k_p = 9.0;
        exec(&mut ds, &frame);

        // Gains stay at their configured values, choreography owns them now
        let (k_p, _, _) = ds.right_joint.gains();
        assert_eq!(k_p, 1.0);
    }

    #[test]
    fn test_move_keys_request_moves() {
        let mut ds = DataStore::default();
        exec(&mut ds, &frame_with_key('3'));

        exec(&mut ds, &frame_with_key('7'));
        assert_eq!(ds.choreo_input.start_move, Some(MoveId::Walk));
    }

    #[test]
    fn test_held_key_acts_once() {
        let mut ds = DataStore::default();
        exec(&mut ds, &frame_with_key('3'));
        ds.choreo_input = Default::default();

        let frame = frame_with_key('7');
        exec(&mut ds, &frame);
        assert_eq!(ds.choreo_input.start_move, Some(MoveId::Walk));

        // The same frame is still the latest on the next cycle: the press
        // must not repeat, or the walk would restart from zero every cycle
        ds.choreo_input = Default::default();
        exec(&mut ds, &frame);
        assert_eq!(ds.choreo_input.start_move, None);

        // Released and pressed again counts as a fresh press
        exec(&mut ds, &OpFrame::default());
        exec(&mut ds, &frame);
        assert_eq!(ds.choreo_input.start_move, Some(MoveId::Walk));
    }

    #[test]
    fn test_shutdown_key() {
        let mut ds = DataStore::default();

        exec(&mut ds, &frame_with_key('D'));
        assert!(ds.exit_requested);
    }
}
