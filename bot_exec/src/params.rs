//! Parameters for the executable itself

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Robot executable parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct BotExecParams {
    /// Target period of one cycle of the main loop.
    ///
    /// Units: seconds
    pub cycle_period_s: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for BotExecParams {
    fn default() -> Self {
        Self {
            cycle_period_s: 0.002,
        }
    }
}
