//! The authored move library.
//!
//! Each move is a static table of keyframe events. Offsets within a table
//! are in authored order (non-decreasing), which [`Choreo::init`] verifies.
//! Repeating moves end with a `Chain` event back onto themselves, routines
//! chain through several moves.
//!
//! [`Choreo::init`]: super::Choreo

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
use super::{Keyframe, KfAction, PoseCmd};

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

const fn at(offset_ms: u32, k_p: Option<f64>, pose: Option<PoseCmd>) -> Keyframe {
    Keyframe {
        offset_ms,
        action: KfAction::Apply { k_p, pose },
    }
}

const fn chain(offset_ms: u32, next: MoveId) -> Keyframe {
    Keyframe {
        offset_ms,
        action: KfAction::Chain(next),
    }
}

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Hold the current pose firmly without further motion.
const STOP: &[Keyframe] = &[at(0, Some(2.0), None)];

/// Drop the gain so the legs can be moved by hand.
const RELAX: &[Keyframe] = &[at(0, Some(0.0), None)];

/// Come to legs straight down, stiffening gradually to avoid a kick.
const STAND: &[Keyframe] = &[
    at(0, Some(0.6), Some(PoseCmd::Stand)),
    at(300, Some(1.0), None),
    at(600, Some(1.5), None),
    at(1000, Some(2.0), None),
];

/// Continuous walking gait, repeats until another move is started.
const WALK: &[Keyframe] = &[
    at(0, Some(1.4), Some(PoseCmd::StepRight(20))),
    at(800, None, Some(PoseCmd::StepLeft(20))),
    chain(1600, MoveId::Walk),
];

/// Crouch, spring up hard, then recover to standing.
const JUMP: &[Keyframe] = &[
    at(0, Some(1.4), Some(PoseCmd::Stand)),
    at(2000, Some(0.6), Some(PoseCmd::Bow(45))),
    at(3000, Some(4.0), Some(PoseCmd::Bow(-10))),
    at(3800, Some(2.0), Some(PoseCmd::Bow(10))),
    at(6000, Some(0.8), Some(PoseCmd::Stand)),
];

/// Kick over into a roll and recover.
const FLIP: &[Keyframe] = &[
    at(0, Some(1.4), Some(PoseCmd::Stand)),
    at(2000, Some(1.0), Some(PoseCmd::Bow(15))),
    at(3000, Some(2.0), Some(PoseCmd::Stand)),
    at(3300, Some(3.0), Some(PoseCmd::KickRight(90))),
    at(3500, Some(2.0), Some(PoseCmd::StepRight(90))),
    at(4300, Some(1.5), Some(PoseCmd::Bow(20))),
    at(5500, Some(1.5), Some(PoseCmd::Stand)),
];

/// Spin on the spot by scissoring the legs asymmetrically.
const PIROUETTE: &[Keyframe] = &[
    at(0, Some(1.4), Some(PoseCmd::Stand)),
    at(
        2000,
        Some(3.0),
        Some(PoseCmd::Targets {
            right_deg: 200.0,
            left_deg: 170.0,
        }),
    ),
    at(3000, Some(2.0), Some(PoseCmd::KickRight(90))),
    at(3450, Some(2.0), Some(PoseCmd::Bow(10))),
    at(3800, Some(1.8), Some(PoseCmd::Stand)),
];

/// First half of the show routine, chains into the second half.
const ROUTINE_A: &[Keyframe] = &[
    at(0, Some(0.8), Some(PoseCmd::Stand)),
    at(4000, Some(1.2), Some(PoseCmd::Bow(30))),
    at(6500, None, Some(PoseCmd::Stand)),
    at(9000, Some(1.4), Some(PoseCmd::StepRight(20))),
    at(9800, None, Some(PoseCmd::StepLeft(20))),
    at(10600, None, Some(PoseCmd::StepRight(20))),
    at(11400, None, Some(PoseCmd::StepLeft(20))),
    at(12200, None, Some(PoseCmd::Stand)),
    at(15000, Some(2.0), Some(PoseCmd::KickRight(45))),
    at(16500, None, Some(PoseCmd::KickLeft(45))),
    at(18000, None, Some(PoseCmd::Stand)),
    chain(21000, MoveId::RoutineB),
];

/// Second half of the show routine, ends holding a bow.
const ROUTINE_B: &[Keyframe] = &[
    at(0, Some(1.4), Some(PoseCmd::Stand)),
    at(3000, Some(0.6), Some(PoseCmd::Bow(45))),
    at(4000, Some(4.0), Some(PoseCmd::Bow(-10))),
    at(4800, Some(2.0), Some(PoseCmd::Stand)),
    at(9000, Some(3.0), Some(PoseCmd::Targets {
        right_deg: 200.0,
        left_deg: 170.0,
    })),
    at(10000, Some(2.0), Some(PoseCmd::Stand)),
    at(14000, Some(1.0), Some(PoseCmd::Bow(45))),
];

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Identifies a move in the authored library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum MoveId {
    Stop,
    Relax,
    Stand,
    Walk,
    Jump,
    Flip,
    Pirouette,
    RoutineA,
    RoutineB,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl MoveId {
    /// All moves in the library, used for validation at init.
    pub const ALL: [MoveId; 9] = [
        MoveId::Stop,
        MoveId::Relax,
        MoveId::Stand,
        MoveId::Walk,
        MoveId::Jump,
        MoveId::Flip,
        MoveId::Pirouette,
        MoveId::RoutineA,
        MoveId::RoutineB,
    ];

    /// Get the keyframe event table for this move.
    pub fn keyframes(self) -> &'static [Keyframe] {
        match self {
            MoveId::Stop => STOP,
            MoveId::Relax => RELAX,
            MoveId::Stand => STAND,
            MoveId::Walk => WALK,
            MoveId::Jump => JUMP,
            MoveId::Flip => FLIP,
            MoveId::Pirouette => PIROUETTE,
            MoveId::RoutineA => ROUTINE_A,
            MoveId::RoutineB => ROUTINE_B,
        }
    }
}
