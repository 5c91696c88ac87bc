//! # Data Store

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use crate::{choreo, joint_ctrl, op_processor::OpMode};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Global data store for the executable.
#[derive(Default)]
pub struct DataStore {
    // Cycle management
    /// Number of cycles already executed
    pub num_cycles: u128,

    /// True if this cycle falls on a 1Hz boundary
    pub is_1_hz_cycle: bool,

    /// Session elapsed time
    pub elapsed_s: f64,

    // Operator interface
    /// Current operator mode, decides who is allowed to write targets and
    /// gains this cycle.
    pub op_mode: OpMode,

    /// True if the last outbound telemetry attempt succeeded.
    pub link_ok: bool,

    /// Console battery level from the last received operator frame.
    pub op_battery_percent: i8,

    /// Key seen in the previous cycle's frame, for press edge detection.
    /// Survives across cycles, unlike the module inputs.
    pub last_op_key: Option<char>,

    /// Set when the operator commands a shutdown.
    pub exit_requested: bool,

    // JointCtrl
    pub right_joint: joint_ctrl::JointCtrl,
    pub right_joint_input: joint_ctrl::InputData,
    pub right_joint_output: joint_ctrl::PwmCommand,
    pub right_joint_status_rpt: joint_ctrl::StatusReport,

    pub left_joint: joint_ctrl::JointCtrl,
    pub left_joint_input: joint_ctrl::InputData,
    pub left_joint_output: joint_ctrl::PwmCommand,
    pub left_joint_status_rpt: joint_ctrl::StatusReport,

    // Choreo
    pub choreo: choreo::Choreo,
    pub choreo_input: choreo::InputData,
    pub choreo_output: choreo::JointDems,
    pub choreo_status_rpt: choreo::StatusReport,
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl DataStore {
    /// Perform actions required at the start of a cycle.
    ///
    /// Clears those items that need clearing at the start of a cycle, and sets
    /// the 1Hz cycle flag.
    pub fn cycle_start(&mut self, cycle_frequency_hz: f64) {
        self.is_1_hz_cycle = self.num_cycles % (cycle_frequency_hz as u128) == 0;

        self.right_joint_input = joint_ctrl::InputData::default();
        self.right_joint_output = joint_ctrl::PwmCommand::default();
        self.right_joint_status_rpt = joint_ctrl::StatusReport::default();

        self.left_joint_input = joint_ctrl::InputData::default();
        self.left_joint_output = joint_ctrl::PwmCommand::default();
        self.left_joint_status_rpt = joint_ctrl::StatusReport::default();

        self.choreo_input = choreo::InputData::default();
        self.choreo_output = choreo::JointDems::default();
        self.choreo_status_rpt = choreo::StatusReport::default();

        self.elapsed_s = util::session::get_elapsed_seconds();
    }
}
