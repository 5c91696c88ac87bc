//! Parameters for the operator console executable

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Operator console parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteExecParams {
    /// Target period of one cycle of the main loop.
    ///
    /// Units: seconds
    pub cycle_period_s: f64,

    /// Gains used before the boot synchronisation window delivers the
    /// robot's actual gains.
    pub initial_k_p: f64,
    pub initial_k_i: f64,
    pub initial_k_d: f64,

    /// Gain change produced by one detent of the rotary encoder.
    pub gain_step: f64,

    /// Full scale reading of a console slider.
    pub slider_full_scale: f64,

    /// Joint angle commanded with a slider at full scale.
    ///
    /// Units: degrees
    pub forward_limit_deg: f64,

    /// Joint angle commanded with a slider at zero.
    ///
    /// Units: degrees
    pub backward_limit_deg: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for RemoteExecParams {
    fn default() -> Self {
        Self {
            cycle_period_s: 0.002,
            initial_k_p: 0.2,
            initial_k_i: 0.0,
            initial_k_d: 0.0,
            gain_step: 0.2,
            slider_full_scale: 17620.0,
            forward_limit_deg: 90.0,
            backward_limit_deg: 270.0,
        }
    }
}
