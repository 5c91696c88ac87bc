//! Console peripheral boundary.
//!
//! The operator console hardware carries joysticks, sliders, a keypad, a
//! rotary encoder, a battery monitor, a status LED and a small display. This
//! module abstracts all of it behind one trait so the main loop reads the
//! same way on the desk and on the real console.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::debug;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Data shown on the console display.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisplayData {
    pub k_p: f64,
    pub k_i: f64,
    pub k_d: f64,
    pub right_angle_deg: f64,
    pub left_angle_deg: f64,
    pub battery_percent: i8,
    pub link_ok: bool,
}

/// Desk stand-in for the console hardware.
///
/// Inputs sit at their neutral positions, outputs go to the debug log.
#[derive(Default)]
pub struct SimPeriph {
    display: DisplayData,
}

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// The console hardware boundary.
pub trait Peripherals {
    /// Poll the hardware once, called at the top of every cycle.
    fn update(&mut self);

    /// Joystick axis readings: left X, left Y, right X, right Y.
    fn axes(&self) -> [i16; 4];

    /// Slider readings: left leg, left arm, right leg, right arm.
    fn sliders(&self) -> [i16; 4];

    /// The key held down this cycle, if any.
    fn key(&self) -> Option<char>;

    fn rotary_pos(&self) -> i16;

    fn rotary_sw_down(&self) -> bool;

    fn battery_percent(&self) -> i8;

    /// True while the operator holds the console in low power, which silences
    /// the radio.
    fn low_power(&self) -> bool;

    /// Drive the link status LED.
    fn set_link_led(&mut self, ok: bool);

    /// Refresh the console display.
    fn set_display(&mut self, display: &DisplayData);
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Peripherals for SimPeriph {
    fn update(&mut self) {}

    fn axes(&self) -> [i16; 4] {
        [0; 4]
    }

    fn sliders(&self) -> [i16; 4] {
        // Legs straight down sit at half scale
        [8810; 4]
    }

    fn key(&self) -> Option<char> {
        None
    }

    fn rotary_pos(&self) -> i16 {
        0
    }

    fn rotary_sw_down(&self) -> bool {
        false
    }

    fn battery_percent(&self) -> i8 {
        100
    }

    fn low_power(&self) -> bool {
        false
    }

    fn set_link_led(&mut self, ok: bool) {
        debug!("Link LED: {}", ok);
    }

    fn set_display(&mut self, display: &DisplayData) {
        self.display = *display;
    }
}
