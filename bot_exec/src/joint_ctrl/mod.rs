//! Joint position control module

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod pid;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use params::*;
pub use pid::*;
pub use state::*;

use util::maths::clamp;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Controller outputs at or below this magnitude command no drive at all.
pub const DUTY_THRESHOLD: f64 = 1.0;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during JointCtrl operation.
#[derive(Debug, thiserror::Error)]
pub enum JointCtrlError {
    #[error("Demanded target angle is not finite: {0}")]
    NonFiniteTarget(f64),
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Saturate a target angle to the mechanical limits of a hip joint.
///
/// Out of range demands are clamped, never rejected, so a bad demand degrades
/// into a held limit rather than halting control.
pub fn within_limits(angle_deg: f64, params: &Params) -> f64 {
    clamp(&angle_deg, &params.forward_limit_deg, &params.backward_limit_deg)
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_within_limits() {
        let params = Params::default();

        // In range demands pass through
        assert_eq!(within_limits(180.0, &params), 180.0);
        assert_eq!(within_limits(90.0, &params), 90.0);
        assert_eq!(within_limits(270.0, &params), 270.0);

        // Out of range demands saturate at the limits
        assert_eq!(within_limits(45.0, &params), 90.0);
        assert_eq!(within_limits(300.0, &params), 270.0);
        assert_eq!(within_limits(-10.0, &params), 90.0);
    }
}
