//! Live gain tuning with the rotary encoder.
//!
//! The encoder's switch cycles through the three gains, turning it steps the
//! selected gain up or down one increment per detent. Gains never go
//! negative, a turn below zero pins at zero.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::info;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Which gain the encoder is currently tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GainSel {
    KP,
    KI,
    KD,
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Rotary encoder gain tuner state.
pub struct GainTuner {
    k_p: f64,
    k_i: f64,
    k_d: f64,

    selected: GainSel,

    step: f64,

    /// Encoder position at the previous update, `None` before the first.
    last_pos: Option<i16>,

    /// Switch state at the previous update, for edge detection.
    last_sw_down: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl GainTuner {
    pub fn new(k_p: f64, k_i: f64, k_d: f64, step: f64) -> Self {
        Self {
            k_p,
            k_i,
            k_d,
            selected: GainSel::KP,
            step,
            last_pos: None,
            last_sw_down: false,
        }
    }

    /// Replace all three gains, used when synchronising to the robot's
    /// reported gains at boot.
    pub fn set_gains(&mut self, k_p: f64, k_i: f64, k_d: f64) {
        self.k_p = k_p;
        self.k_i = k_i;
        self.k_d = k_d;
    }

    /// Get the current gains as `(k_p, k_i, k_d)`.
    pub fn gains(&self) -> (f64, f64, f64) {
        (self.k_p, self.k_i, self.k_d)
    }

    pub fn selected(&self) -> GainSel {
        self.selected
    }

    /// Feed the encoder state read this cycle into the tuner.
    pub fn update(&mut self, pos: i16, sw_down: bool) {
        // Pressing the switch moves on to the next gain
        if sw_down && !self.last_sw_down {
            self.selected = match self.selected {
                GainSel::KP => GainSel::KI,
                GainSel::KI => GainSel::KD,
                GainSel::KD => GainSel::KP,
            };
            info!("Tuning {:?}", self.selected);
        }
        self.last_sw_down = sw_down;

        let detents = match self.last_pos {
            Some(last) => (pos as i32) - (last as i32),
            None => 0,
        };
        self.last_pos = Some(pos);

        if detents != 0 {
            let delta = detents as f64 * self.step;

            let gain = match self.selected {
                GainSel::KP => &mut self.k_p,
                GainSel::KI => &mut self.k_i,
                GainSel::KD => &mut self.k_d,
            };

            *gain = (*gain + delta).max(0.0);

            info!(
                "Gains now k_p = {:.2}, k_i = {:.2}, k_d = {:.2}",
                self.k_p, self.k_i, self.k_d
            );
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_detents_step_selected_gain() {
        let mut tuner = GainTuner::new(1.0, 0.0, 0.0, 0.2);

        // First update only establishes the reference position
        tuner.update(10, false);
        tuner.update(12, false);

        let (k_p, _, _) = tuner.gains();
        assert!((k_p - 1.4).abs() < 1e-9);

        tuner.update(11, false);
        let (k_p, _, _) = tuner.gains();
        assert!((k_p - 1.2).abs() < 1e-9);
    }

    #[test]
    fn test_gains_never_negative() {
        let mut tuner = GainTuner::new(0.2, 0.0, 0.0, 0.2);

        tuner.update(0, false);
        tuner.update(-10, false);

        let (k_p, _, _) = tuner.gains();
        assert_eq!(k_p, 0.0);
    }

    #[test]
    fn test_switch_cycles_selection() {
        let mut tuner = GainTuner::new(1.0, 0.0, 0.0, 0.2);
        assert_eq!(tuner.selected(), GainSel::KP);

        // Rising edge moves on, holding does not
        tuner.update(0, true);
        assert_eq!(tuner.selected(), GainSel::KI);
        tuner.update(0, true);
        assert_eq!(tuner.selected(), GainSel::KI);

        tuner.update(0, false);
        tuner.update(0, true);
        assert_eq!(tuner.selected(), GainSel::KD);

        tuner.update(0, false);
        tuner.update(0, true);
        assert_eq!(tuner.selected(), GainSel::KP);
    }

    #[test]
    fn test_sync_replaces_gains() {
        let mut tuner = GainTuner::new(0.2, 0.0, 0.0, 0.2);

        tuner.set_gains(1.5, 0.1, 0.05);
        assert_eq!(tuner.gains(), (1.5, 0.1, 0.05));
    }
}
