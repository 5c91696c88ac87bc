//! Simulated plant used when running without hardware.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::time::Instant;

// Internal
use super::{Actuator, AngleSensor, JointId};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Joint rate produced by one count of duty.
///
/// Units: degrees/second per duty count
const RATE_DEG_S_PER_DUTY: f64 = 0.5;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// First order plant model of the two hip joints.
///
/// Integrates the commanded duties into joint angles at a fixed rate per duty
/// count. Good enough to close the loop in desktop runs, makes no attempt at
/// modelling inertia or gravity.
pub struct SimEqpt {
    angles_deg: [f64; 2],
    duties: [(u16, u16); 2],
    last_step: Option<Instant>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SimEqpt {
    /// Create a new simulated plant with both legs straight down.
    pub fn new() -> Self {
        Self {
            angles_deg: [180.0, 180.0],
            duties: [(0, 0), (0, 0)],
            last_step: None,
        }
    }

    /// Advance the plant to `now`, integrating the currently commanded duties.
    pub fn step(&mut self, now: Instant) {
        let dt_s = match self.last_step {
            Some(last) => now.duration_since(last).as_secs_f64(),
            None => 0.0,
        };
        self.last_step = Some(now);

        for (angle, (fwd, back)) in self.angles_deg.iter_mut().zip(self.duties.iter()) {
            // Forward drive moves the leg towards the forward limit, which is
            // the low end of the angle range
            let net_duty = *back as f64 - *fwd as f64;
            *angle += net_duty * RATE_DEG_S_PER_DUTY * dt_s;
        }
    }

    fn index(joint: JointId) -> usize {
        match joint {
            JointId::Right => 0,
            JointId::Left => 1,
        }
    }
}

impl Actuator for SimEqpt {
    fn drive(&mut self, joint: JointId, forward_duty: u16, backward_duty: u16) {
        self.duties[Self::index(joint)] = (forward_duty, backward_duty);
    }
}

impl AngleSensor for SimEqpt {
    fn read_angle_deg(&mut self, joint: JointId) -> Option<f64> {
        Some(self.angles_deg[Self::index(joint)])
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_forward_drive_lowers_angle() {
        let mut sim = SimEqpt::new();
        let base = Instant::now();

        sim.step(base);
        sim.drive(JointId::Right, 100, 0);
        sim.step(base + Duration::from_secs(1));

        let right = sim.read_angle_deg(JointId::Right).unwrap();
        let left = sim.read_angle_deg(JointId::Left).unwrap();

        assert!(right < 180.0);
        assert_eq!(left, 180.0);
    }
}
