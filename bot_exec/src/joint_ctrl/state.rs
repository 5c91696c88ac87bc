//! Implementations for the JointCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;
use std::time::{Duration, Instant};

// Internal
use super::{within_limits, JointCtrlError, Params, Pid, DUTY_THRESHOLD};
use util::{maths::lin_map, module::State, params, session::Session};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Joint control module state.
///
/// One instance runs per hip joint. Holds the PID controller, the current
/// target and the last commanded duty pair, which is held whenever the PID
/// update is gated by the sample interval.
pub struct JointCtrl {
    pub(crate) params: Params,

    pid: Pid,

    target_deg: f64,

    /// Most recent readable feedback, carried over feedback dropouts.
    last_angle_deg: f64,

    /// Command issued on the last accepted update.
    last_cmd: PwmCommand,
}

/// Input data to Joint Control.
pub struct InputData {
    /// Feedback angle read this cycle, or `None` if the sensor was
    /// unreadable.
    pub feedback_deg: Option<f64>,

    /// Time of this cycle, used for the sample interval gate.
    pub now: Instant,
}

/// Output command from JointCtrl that the actuator must execute.
///
/// One duty is always zero, the pair encodes direction as well as magnitude.
#[derive(Clone, Copy, Serialize, Debug, Default, PartialEq)]
pub struct PwmCommand {
    pub forward_duty: u16,
    pub backward_duty: u16,
}

/// Status report for JointCtrl processing.
#[derive(Clone, Copy, Default, Serialize, Debug)]
pub struct StatusReport {
    /// True if this cycle's update was rejected by the sample interval gate.
    pub gated: bool,

    /// True if no feedback was readable this cycle.
    pub feedback_dropout: bool,

    /// Controller output before duty mapping.
    pub output: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for JointCtrl {
    fn default() -> Self {
        let params = Params::default();
        let pid = Pid::new(
            params.k_p,
            params.k_i,
            params.k_d,
            params.range,
            Duration::from_millis(params.sample_interval_ms),
        );

        Self {
            params,
            pid,
            // Leg straight down
            target_deg: 180.0,
            last_angle_deg: 180.0,
            last_cmd: PwmCommand::default(),
        }
    }
}

impl Default for InputData {
    fn default() -> Self {
        Self {
            feedback_deg: None,
            now: Instant::now(),
        }
    }
}

impl JointCtrl {
    /// Set a new target angle.
    ///
    /// The demand is saturated to the joint's mechanical limits at this, the
    /// single point of use, so no caller can command an angle outside them.
    pub fn set_target(&mut self, target_deg: f64) {
        self.target_deg = within_limits(target_deg, &self.params);
    }

    /// Get the current target angle in degrees.
    pub fn target_deg(&self) -> f64 {
        self.target_deg
    }

    /// Replace the controller gains.
    ///
    /// Takes effect from the next accepted update, the accumulator state is
    /// kept so retuning never kicks the output.
    pub fn set_gains(&mut self, k_p: f64, k_i: f64, k_d: f64) {
        self.pid.set_gains(k_p, k_i, k_d);
    }

    /// Get the current gains as `(k_p, k_i, k_d)`.
    pub fn gains(&self) -> (f64, f64, f64) {
        self.pid.gains()
    }

    /// Get the most recent readable feedback angle in degrees.
    pub fn angle_deg(&self) -> f64 {
        self.last_angle_deg
    }

    /// Map a controller output onto a duty pair, compensating the motor's
    /// dead-band.
    ///
    /// Outputs at or below the drive threshold command no drive at all.
    /// Anything above it is remapped so the weakest commanded drive still
    /// overcomes static friction.
    fn duty_map(&self, output: f64) -> PwmCommand {
        if output.abs() <= DUTY_THRESHOLD {
            return PwmCommand::default();
        }

        let duty = lin_map(
            (0.0, self.params.range),
            (self.params.dead_band, self.params.range),
            output.abs(),
        ) as u16;

        if output > 0.0 {
            PwmCommand {
                forward_duty: duty,
                backward_duty: 0,
            }
        } else {
            PwmCommand {
                forward_duty: 0,
                backward_duty: duty,
            }
        }
    }
}

impl State for JointCtrl {
    type InitData = &'static str;
    type InitError = params::LoadError;

    type InputData = InputData;
    type OutputData = PwmCommand;
    type StatusReport = StatusReport;
    type ProcError = JointCtrlError;

    /// Initialise the JointCtrl module.
    ///
    /// Expected init data is the path to the parameter file
    fn init(&mut self, init_data: Self::InitData, _session: &Session) -> Result<(), Self::InitError> {
        self.params = params::load(init_data)?;

        self.pid = Pid::new(
            self.params.k_p,
            self.params.k_i,
            self.params.k_d,
            self.params.range,
            Duration::from_millis(self.params.sample_interval_ms),
        );

        Ok(())
    }

    /// Perform cyclic processing of Joint Control.
    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> {
        let mut report = StatusReport::default();

        if !self.target_deg.is_finite() {
            return Err(JointCtrlError::NonFiniteTarget(self.target_deg));
        }

        // Feedback dropouts degrade into control on the last known angle
        match input_data.feedback_deg {
            Some(angle) => self.last_angle_deg = angle,
            None => report.feedback_dropout = true,
        }

        let error = self.target_deg - self.last_angle_deg;

        match self.pid.update(error, input_data.now) {
            Some(output) => {
                report.output = output;
                self.last_cmd = self.duty_map(output);
            }
            // Gated update: hold the previous command unchanged
            None => {
                report.gated = true;
            }
        }

        Ok((self.last_cmd, report))
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn input(feedback_deg: f64, now: Instant) -> InputData {
        InputData {
            feedback_deg: Some(feedback_deg),
            now,
        }
    }

    #[test]
    fn test_proportional_step_with_dead_band() {
        let mut jc = JointCtrl::default();
        jc.set_target(200.0);

        // Feedback 180 deg against a 200 deg target with k_p = 1 gives an
        // output of 20, which the dead-band remap turns into a forward duty
        // of 47 out of 255
        let (cmd, rpt) = jc.proc(&input(180.0, Instant::now())).unwrap();

        assert!(!rpt.gated);
        assert_eq!(cmd.forward_duty, 47);
        assert_eq!(cmd.backward_duty, 0);
    }

    #[test]
    fn test_small_output_commands_no_drive() {
        let mut jc = JointCtrl::default();
        jc.set_target(180.5);

        let (cmd, _) = jc.proc(&input(180.0, Instant::now())).unwrap();

        // |output| = 0.5 is inside the drive threshold
        assert_eq!(cmd, PwmCommand::default());
    }

    #[test]
    fn test_negative_output_drives_backward() {
        let mut jc = JointCtrl::default();
        jc.set_target(160.0);

        let (cmd, _) = jc.proc(&input(180.0, Instant::now())).unwrap();

        assert_eq!(cmd.forward_duty, 0);
        assert!(cmd.backward_duty >= 30);
    }

    #[test]
    fn test_gated_cycle_holds_previous_command() {
        let mut jc = JointCtrl::default();
        jc.set_target(200.0);
        let base = Instant::now();

        let (first, rpt) = jc.proc(&input(180.0, base)).unwrap();
        assert!(!rpt.gated);

        // A cycle arriving inside the sample interval is skipped entirely,
        // the previous duty pair stays in force
        let (held, rpt) = jc
            .proc(&input(175.0, base + Duration::from_micros(300)))
            .unwrap();
        assert!(rpt.gated);
        assert_eq!(held, first);
    }

    #[test]
    fn test_feedback_dropout_uses_last_angle() {
        let mut jc = JointCtrl::default();
        jc.set_target(200.0);
        let base = Instant::now();

        jc.proc(&input(180.0, base)).unwrap();

        let dropped = InputData {
            feedback_deg: None,
            now: base + Duration::from_millis(2),
        };
        let (cmd, rpt) = jc.proc(&dropped).unwrap();

        // Same error as last cycle, control carries on
        assert!(rpt.feedback_dropout);
        assert_eq!(cmd.forward_duty, 47);
    }

    #[test]
    fn test_target_saturated_to_limits() {
        let mut jc = JointCtrl::default();

        jc.set_target(10.0);
        assert_eq!(jc.target_deg(), 90.0);

        jc.set_target(350.0);
        assert_eq!(jc.target_deg(), 270.0);
    }
}
