//! Parameters for the JointCtrl module

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Joint control parameters.
///
/// The `Default` implementation carries the flight values so that the
/// controller is usable in tests without a parameter file.
#[derive(Debug, Clone, Deserialize)]
pub struct Params {
    /// Initial proportional gain.
    pub k_p: f64,

    /// Initial integral gain.
    pub k_i: f64,

    /// Initial derivative gain.
    pub k_d: f64,

    /// Magnitude limit of the controller output, also the full scale PWM duty.
    pub range: f64,

    /// Minimum duty which actually turns the motor, outputs above the drive
    /// threshold are remapped to start here.
    pub dead_band: f64,

    /// Minimum time between two controller updates.
    ///
    /// Units: milliseconds
    pub sample_interval_ms: u64,

    /// Mechanical limit of the joint in the forward direction.
    ///
    /// Units: degrees
    pub forward_limit_deg: f64,

    /// Mechanical limit of the joint in the backward direction.
    ///
    /// Units: degrees
    pub backward_limit_deg: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            k_p: 1.0,
            k_i: 0.0,
            k_d: 0.0,
            range: 255.0,
            dead_band: 30.0,
            sample_interval_ms: 1,
            forward_limit_deg: 90.0,
            backward_limit_deg: 270.0,
        }
    }
}
