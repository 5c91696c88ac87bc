//! PID position controller.
//!
//! Written out as an explicit state machine rather than wrapping a library
//! controller: the integral accumulator, previous error and last update time
//! are plain fields which can be inspected in telemetry and in tests.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::time::{Duration, Instant};

// Internal
use util::maths::clamp;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Discrete PID controller.
pub struct Pid {
    k_p: f64,
    k_i: f64,
    k_d: f64,

    /// Accumulated integral of the error.
    ///
    /// Deliberately not reset by a gain change, so live tuning never kicks
    /// the output.
    integral: f64,

    /// Error seen at the previous accepted update.
    prev_error: f64,

    /// Symmetric output limit. Windup is contained by this clamp alone, the
    /// integral accumulator itself is unbounded.
    out_limit: f64,

    /// Minimum time between two accepted updates.
    sample_interval: Duration,

    /// Time of the last accepted update, `None` before the first.
    last_update: Option<Instant>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Pid {
    /// Create a new controller with zeroed accumulator state.
    pub fn new(k_p: f64, k_i: f64, k_d: f64, out_limit: f64, sample_interval: Duration) -> Self {
        Self {
            k_p,
            k_i,
            k_d,
            integral: 0.0,
            prev_error: 0.0,
            out_limit,
            sample_interval,
            last_update: None,
        }
    }

    /// Replace the gains, keeping the accumulator state.
    pub fn set_gains(&mut self, k_p: f64, k_i: f64, k_d: f64) {
        self.k_p = k_p;
        self.k_i = k_i;
        self.k_d = k_d;
    }

    /// Get the current gains as `(k_p, k_i, k_d)`.
    pub fn gains(&self) -> (f64, f64, f64) {
        (self.k_p, self.k_i, self.k_d)
    }

    /// Advance the controller with the current error.
    ///
    /// Returns the new output clamped to the output limit, or `None` if the
    /// call arrived before the sample interval elapsed, in which case no
    /// internal state changes and the caller must hold its previous command.
    pub fn update(&mut self, error: f64, now: Instant) -> Option<f64> {
        let dt_s = match self.last_update {
            Some(last) => {
                let dt = now.duration_since(last);
                if dt < self.sample_interval {
                    return None;
                }
                dt.as_secs_f64()
            }
            // First ever update assumes one nominal interval
            None => self.sample_interval.as_secs_f64(),
        };

        self.integral += error * dt_s;

        let derivative = if dt_s > 0.0 {
            (error - self.prev_error) / dt_s
        } else {
            0.0
        };

        let raw = self.k_p * error + self.k_i * self.integral + self.k_d * derivative;

        self.prev_error = error;
        self.last_update = Some(now);

        Some(clamp(&raw, &-self.out_limit, &self.out_limit))
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn one_ms() -> Duration {
        Duration::from_millis(1)
    }

    #[test]
    fn test_proportional_output() {
        let mut pid = Pid::new(1.0, 0.0, 0.0, 255.0, one_ms());

        let out = pid.update(20.0, Instant::now()).unwrap();
        assert!((out - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_output_clamped_to_limit() {
        let mut pid = Pid::new(10.0, 0.0, 0.0, 255.0, one_ms());
        let base = Instant::now();

        let out = pid.update(1000.0, base).unwrap();
        assert_eq!(out, 255.0);

        let out = pid.update(-1000.0, base + one_ms()).unwrap();
        assert_eq!(out, -255.0);
    }

    #[test]
    fn test_sample_interval_gating() {
        let mut pid = Pid::new(1.0, 1.0, 0.0, 255.0, one_ms());
        let base = Instant::now();

        assert!(pid.update(10.0, base).is_some());

        // Early calls are rejected and must not advance the accumulator
        assert!(pid.update(10.0, base + Duration::from_micros(200)).is_none());
        assert!(pid.update(10.0, base + Duration::from_micros(900)).is_none());

        let integral_before = pid.integral;
        assert!(pid.update(10.0, base + one_ms()).is_some());
        assert!(pid.integral > integral_before);
    }

    #[test]
    fn test_gain_change_keeps_accumulator() {
        let mut pid = Pid::new(1.0, 2.0, 0.0, 255.0, one_ms());
        let base = Instant::now();

        pid.update(10.0, base);
        pid.update(10.0, base + one_ms());

        let integral = pid.integral;
        assert!(integral > 0.0);

        // Live retuning must not kick the output by clearing the accumulator
        pid.set_gains(5.0, 2.0, 0.1);
        assert_eq!(pid.integral, integral);
        assert_eq!(pid.prev_error, 10.0);
    }

    #[test]
    fn test_integral_accumulates() {
        let mut pid = Pid::new(0.0, 1.0, 0.0, 255.0, one_ms());
        let base = Instant::now();

        let first = pid.update(100.0, base).unwrap();
        let second = pid.update(100.0, base + one_ms()).unwrap();
        let third = pid.update(100.0, base + 2 * one_ms()).unwrap();

        // Constant error with pure integral action ramps the output
        assert!(second > first);
        assert!(third > second);
    }
}
