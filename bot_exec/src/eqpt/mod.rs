//! # Equipment boundary
//!
//! Traits abstracting the robot's hardware so that control modules never talk
//! to drivers directly. The real robot implements these over the motor driver
//! PWM channels and the joint angle encoders, [`sim`] provides a stand-in
//! plant for desktop runs and testing.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod sim;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Identifies one of the two hip joints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JointId {
    Right,
    Left,
}

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A drive output for the joint motors.
///
/// One duty is always zero: the pair encodes direction as well as magnitude.
/// Implementations must accept any duty without faulting, values are already
/// limited to the configured range by the controller.
pub trait Actuator {
    fn drive(&mut self, joint: JointId, forward_duty: u16, backward_duty: u16);
}

/// A source of joint angle feedback.
///
/// Returns `None` when the sensor could not be read this cycle. Callers are
/// expected to carry on with their last known value, a feedback dropout never
/// halts control.
pub trait AngleSensor {
    fn read_angle_deg(&mut self, joint: JointId) -> Option<f64>;
}
