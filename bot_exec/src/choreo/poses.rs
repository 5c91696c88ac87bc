//! Pose resolution.
//!
//! Poses are expressed as deflections from legs straight down (180 degrees).
//! Forward deflections lower the angle towards the forward limit, backward
//! deflections raise it. Resolution is pure geometry, saturation to the
//! mechanical limits happens in joint control where the targets are applied.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
use super::PoseCmd;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Joint angle with the leg straight down.
///
/// Units: degrees
pub const NEUTRAL_DEG: f64 = 180.0;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Resolve a pose into a `(right, left)` target angle pair in degrees.
pub fn resolve(pose: PoseCmd) -> (f64, f64) {
    match pose {
        PoseCmd::Stand => (NEUTRAL_DEG, NEUTRAL_DEG),
        PoseCmd::Bow(d) => {
            let target = NEUTRAL_DEG - d as f64;
            (target, target)
        }
        PoseCmd::StepRight(d) => (NEUTRAL_DEG - d as f64, NEUTRAL_DEG + d as f64),
        PoseCmd::StepLeft(d) => (NEUTRAL_DEG + d as f64, NEUTRAL_DEG - d as f64),
        PoseCmd::KickRight(d) => (NEUTRAL_DEG - d as f64, NEUTRAL_DEG),
        PoseCmd::KickLeft(d) => (NEUTRAL_DEG, NEUTRAL_DEG - d as f64),
        PoseCmd::Targets {
            right_deg,
            left_deg,
        } => (right_deg, left_deg),
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_resolve_poses() {
        assert_eq!(resolve(PoseCmd::Stand), (180.0, 180.0));
        assert_eq!(resolve(PoseCmd::Bow(45)), (135.0, 135.0));
        assert_eq!(resolve(PoseCmd::Bow(-10)), (190.0, 190.0));
        assert_eq!(resolve(PoseCmd::StepRight(20)), (160.0, 200.0));
        assert_eq!(resolve(PoseCmd::StepLeft(20)), (200.0, 160.0));
        assert_eq!(resolve(PoseCmd::KickRight(90)), (90.0, 180.0));
        assert_eq!(resolve(PoseCmd::KickLeft(90)), (180.0, 90.0));
        assert_eq!(
            resolve(PoseCmd::Targets {
                right_deg: 210.0,
                left_deg: 150.0
            }),
            (210.0, 150.0)
        );
    }
}
