//! # Communications Interface
//!
//! This crate defines the telemetry interface between the robot (`bot_exec`)
//! and the operator console (`remote_exec`):
//!
//! - [`frame`] - the fixed-layout wire frames exchanged over the link
//! - [`net`] - the best-effort datagram link itself, including send pacing
//!   and the thread-safe latest-frame shadow

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

pub mod frame;
pub mod net;
