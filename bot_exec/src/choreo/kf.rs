//! Keyframe event types and the demands they produce

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;

// Internal
use super::MoveId;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// One keyframe event inside a move.
#[derive(Debug, Clone, Copy)]
pub struct Keyframe {
    /// Offset from the start of the move at which this event applies.
    ///
    /// Units: milliseconds
    pub offset_ms: u32,

    pub action: KfAction,
}

/// Demands produced by one tick of choreography playback.
///
/// Fields left `None` were not touched by any elapsed event this tick and
/// must retain their previous value downstream, so a move which only poses
/// the legs inherits whatever gain the last move set.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq)]
pub struct JointDems {
    /// Right joint target angle demand.
    ///
    /// Units: degrees
    pub right_target_deg: Option<f64>,

    /// Left joint target angle demand.
    ///
    /// Units: degrees
    pub left_target_deg: Option<f64>,

    /// Proportional gain demand.
    pub k_p: Option<f64>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The action a keyframe event performs when applied.
#[derive(Debug, Clone, Copy)]
pub enum KfAction {
    /// Apply a gain and/or a pose. Either part may be absent, an absent part
    /// leaves the corresponding demand untouched.
    Apply {
        k_p: Option<f64>,
        pose: Option<PoseCmd>,
    },

    /// Abandon the rest of this move and start another, effective within the
    /// same tick.
    Chain(MoveId),
}

/// A named pose, resolved into a target angle pair by [`resolve`].
///
/// [`resolve`]: super::resolve
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub enum PoseCmd {
    /// Both legs straight down.
    Stand,

    /// Both legs forward by the given angle. Negative values lean backward.
    ///
    /// Units: degrees
    Bow(i16),

    /// Right leg forward, left leg backward, by the given angle.
    StepRight(i16),

    /// Left leg forward, right leg backward, by the given angle.
    StepLeft(i16),

    /// Right leg forward by the given angle, left leg straight down.
    KickRight(i16),

    /// Left leg forward by the given angle, right leg straight down.
    KickLeft(i16),

    /// Explicit target angles for both joints.
    ///
    /// Units: degrees
    Targets { right_deg: f64, left_deg: f64 },
}
