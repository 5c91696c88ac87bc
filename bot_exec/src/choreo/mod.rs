//! Choreography module
//!
//! Plays back authored moves, each a list of keyframe events at fixed offsets
//! from the move's start. Playback is scrub based: every tick the engine
//! re-applies all elapsed events in authored order, so a late or skipped tick
//! degrades into coarser motion rather than missed state.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod kf;
mod moves;
mod poses;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use kf::*;
pub use moves::*;
pub use poses::*;
pub use state::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during Choreo operation.
#[derive(Debug, thiserror::Error)]
pub enum ChoreoError {
    #[error("Move {0:?} has no keyframe events")]
    EmptyMove(MoveId),

    #[error("Keyframe offsets of move {0:?} are not in authored order")]
    UnorderedOffsets(MoveId),
}
