//! Implementations for the Choreo state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{info, warn};
use serde::Serialize;
use std::time::Instant;

// Internal
use super::{poses, ChoreoError, JointDems, Keyframe, KfAction, MoveId};
use util::{module::State, session::Session};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Maximum number of chain events followed within one tick. Chains are
/// authored at most a few deep, hitting this limit means a move chains onto
/// itself at offset zero.
const MAX_CHAINS_PER_TICK: usize = 4;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Choreography module state.
#[derive(Default)]
pub struct Choreo {
    sequencer: Sequencer,
}

/// Input data to Choreography.
pub struct InputData {
    /// A move to start this tick, or `None` if playback just continues.
    pub start_move: Option<MoveId>,

    /// Time of this tick.
    pub now: Instant,
}

impl Default for InputData {
    fn default() -> Self {
        Self {
            start_move: None,
            now: Instant::now(),
        }
    }
}

/// Status report for Choreo processing.
#[derive(Clone, Copy, Default, Serialize, Debug)]
pub struct StatusReport {
    /// The move playing at the end of this tick.
    pub active_move: Option<MoveId>,

    /// Playback position within the active move.
    ///
    /// Units: milliseconds
    pub elapsed_ms: u32,

    /// Set if a chain event fired this tick.
    pub chained: Option<MoveId>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Playback position of the engine.
#[derive(Debug, Clone, Copy)]
enum Sequencer {
    /// No move playing, no demands produced.
    Idle,

    /// A move is playing, its start time anchors all keyframe offsets.
    Playing {
        active_move: MoveId,
        start_time: Instant,
    },
}

impl Default for Sequencer {
    fn default() -> Self {
        Sequencer::Idle
    }
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Choreo {
    /// Start playing a move from its beginning.
    ///
    /// Unconditional: restarting the active move rewinds it, there is no
    /// already-playing state to get stuck in.
    pub fn start_move(&mut self, move_id: MoveId, now: Instant) {
        info!("Starting move {:?}", move_id);

        self.sequencer = Sequencer::Playing {
            active_move: move_id,
            start_time: now,
        };
    }

    /// Stop playback without producing further demands.
    ///
    /// The joints keep whatever targets and gains the last applied events
    /// left behind.
    pub fn stop(&mut self) {
        self.sequencer = Sequencer::Idle;
    }

    /// Get the currently playing move, if any.
    pub fn active_move(&self) -> Option<MoveId> {
        match self.sequencer {
            Sequencer::Playing { active_move, .. } => Some(active_move),
            Sequencer::Idle => None,
        }
    }
}

impl State for Choreo {
    type InitData = ();
    type InitError = ChoreoError;

    type InputData = InputData;
    type OutputData = JointDems;
    type StatusReport = StatusReport;
    type ProcError = ChoreoError;

    /// Initialise the Choreo module.
    ///
    /// Validates the authored move library: every move must have at least one
    /// event and its offsets must be in authored order.
    fn init(&mut self, _init_data: Self::InitData, _session: &Session) -> Result<(), Self::InitError> {
        for move_id in MoveId::ALL.iter() {
            let kfs = move_id.keyframes();

            if kfs.is_empty() {
                return Err(ChoreoError::EmptyMove(*move_id));
            }

            if kfs.windows(2).any(|w| w[0].offset_ms > w[1].offset_ms) {
                return Err(ChoreoError::UnorderedOffsets(*move_id));
            }
        }

        Ok(())
    }

    /// Perform cyclic processing of Choreography.
    ///
    /// Scrubs the active move: all events elapsed at this tick are re-applied
    /// in authored order onto a fresh demand set. Re-application is
    /// idempotent, so ticks arriving late or not at all cost smoothness, not
    /// correctness.
    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> {
        let mut report = StatusReport::default();
        let mut dems = JointDems::default();

        if let Some(move_id) = input_data.start_move {
            self.start_move(move_id, input_data.now);
        }

        let mut chains_followed = 0;

        loop {
            let (active_move, start_time) = match self.sequencer {
                Sequencer::Playing {
                    active_move,
                    start_time,
                } => (active_move, start_time),
                Sequencer::Idle => break,
            };

            let elapsed_ms = elapsed_ms(start_time, input_data.now);
            report.elapsed_ms = elapsed_ms;

            match scrub(active_move.keyframes(), elapsed_ms, &mut dems) {
                // Chain events take effect within the same tick: the new
                // move starts now and its already-elapsed (offset zero)
                // events apply on top of the old move's demands
                Some(next) => {
                    chains_followed += 1;
                    if chains_followed > MAX_CHAINS_PER_TICK {
                        warn!(
                            "Chain limit reached in {:?}, not starting {:?}",
                            active_move, next
                        );
                        break;
                    }

                    report.chained = Some(next);
                    self.start_move(next, input_data.now);
                }
                None => break,
            }
        }

        report.active_move = self.active_move();

        Ok((dems, report))
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Playback position in milliseconds, saturating rather than wrapping for
/// moves left holding their final event for a very long time.
fn elapsed_ms(start_time: Instant, now: Instant) -> u32 {
    std::cmp::min(
        now.duration_since(start_time).as_millis(),
        u32::max_value() as u128,
    ) as u32
}

/// Apply all events elapsed at `elapsed_ms` onto `dems` in authored order.
///
/// Later events overwrite the fields of earlier ones, including exact ties in
/// offset. Returns the target of the first elapsed chain event, which ends
/// the scrub.
fn scrub(kfs: &[Keyframe], elapsed_ms: u32, dems: &mut JointDems) -> Option<MoveId> {
    for kf in kfs {
        if kf.offset_ms > elapsed_ms {
            continue;
        }

        match kf.action {
            KfAction::Apply { k_p, pose } => {
                if let Some(k_p) = k_p {
                    dems.k_p = Some(k_p);
                }
                if let Some(pose) = pose {
                    let (right, left) = poses::resolve(pose);
                    dems.right_target_deg = Some(right);
                    dems.left_target_deg = Some(left);
                }
            }
            KfAction::Chain(next) => return Some(next),
        }
    }

    None
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::choreo::PoseCmd;
    use std::time::Duration;

    /// A table with two posing events and a gain-only event between them.
    const TEST_MOVE: &[Keyframe] = &[
        Keyframe {
            offset_ms: 0,
            action: KfAction::Apply {
                k_p: Some(1.0),
                pose: Some(PoseCmd::Stand),
            },
        },
        Keyframe {
            offset_ms: 100,
            action: KfAction::Apply {
                k_p: Some(2.0),
                pose: None,
            },
        },
        Keyframe {
            offset_ms: 200,
            action: KfAction::Apply {
                k_p: None,
                pose: Some(PoseCmd::Bow(45)),
            },
        },
    ];

    fn input(start_move: Option<MoveId>, now: Instant) -> InputData {
        InputData { start_move, now }
    }

    #[test]
    fn test_library_valid() {
        let mut choreo = Choreo::default();
        let session = Session::default();

        assert!(choreo.init((), &session).is_ok());
    }

    #[test]
    fn test_scrub_applies_elapsed_events() {
        let mut dems = JointDems::default();
        assert!(scrub(TEST_MOVE, 150, &mut dems).is_none());

        // Events at 0 and 100 ms have elapsed, the one at 200 ms has not
        assert_eq!(dems.right_target_deg, Some(180.0));
        assert_eq!(dems.left_target_deg, Some(180.0));
        assert_eq!(dems.k_p, Some(2.0));
    }

    #[test]
    fn test_scrub_is_idempotent() {
        let mut once = JointDems::default();
        scrub(TEST_MOVE, 250, &mut once);

        // Re-scrubbing at the same position must land in the same state, no
        // matter how many ticks were skipped on the way there
        let mut many = JointDems::default();
        for _ in 0..10 {
            many = JointDems::default();
            scrub(TEST_MOVE, 250, &mut many);
        }

        assert_eq!(once, many);
        assert_eq!(once.right_target_deg, Some(135.0));
        assert_eq!(once.k_p, Some(2.0));
    }

    #[test]
    fn test_tied_offsets_later_event_wins() {
        const TIED: &[Keyframe] = &[
            Keyframe {
                offset_ms: 100,
                action: KfAction::Apply {
                    k_p: Some(1.0),
                    pose: Some(PoseCmd::Stand),
                },
            },
            Keyframe {
                offset_ms: 100,
                action: KfAction::Apply {
                    k_p: Some(3.0),
                    pose: Some(PoseCmd::Bow(10)),
                },
            },
        ];

        let mut dems = JointDems::default();
        scrub(TIED, 100, &mut dems);

        assert_eq!(dems.k_p, Some(3.0));
        assert_eq!(dems.right_target_deg, Some(170.0));
    }

    #[test]
    fn test_untouched_fields_stay_none() {
        let mut dems = JointDems::default();
        scrub(MoveId::Stop.keyframes(), 1000, &mut dems);

        // Stop only commands a gain, the targets must be left for downstream
        // to carry over
        assert_eq!(dems.k_p, Some(2.0));
        assert_eq!(dems.right_target_deg, None);
        assert_eq!(dems.left_target_deg, None);
    }

    #[test]
    fn test_start_move_rewinds() {
        let mut choreo = Choreo::default();
        let base = Instant::now();

        choreo.start_move(MoveId::Jump, base);

        // Deep into the jump, restart it: only the offset zero events of the
        // fresh run may apply
        let now = base + Duration::from_millis(3500);
        let (dems, rpt) = choreo.proc(&input(Some(MoveId::Jump), now)).unwrap();

        assert_eq!(rpt.elapsed_ms, 0);
        assert_eq!(dems.k_p, Some(1.4));
        assert_eq!(dems.right_target_deg, Some(180.0));
    }

    #[test]
    fn test_chain_effective_same_tick() {
        let mut choreo = Choreo::default();
        let base = Instant::now();

        choreo.start_move(MoveId::Walk, base);

        // Past the walk cycle's chain point: the chain fires and the fresh
        // walk's first step applies within this same tick
        let now = base + Duration::from_millis(1700);
        let (dems, rpt) = choreo.proc(&input(None, now)).unwrap();

        assert_eq!(rpt.chained, Some(MoveId::Walk));
        assert_eq!(rpt.active_move, Some(MoveId::Walk));
        assert_eq!(rpt.elapsed_ms, 0);
        assert_eq!(dems.right_target_deg, Some(160.0));
        assert_eq!(dems.left_target_deg, Some(200.0));
    }

    #[test]
    fn test_idle_produces_no_demands() {
        let mut choreo = Choreo::default();

        let (dems, rpt) = choreo.proc(&input(None, Instant::now())).unwrap();

        assert_eq!(dems, JointDems::default());
        assert_eq!(rpt.active_move, None);
    }
}
