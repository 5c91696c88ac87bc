//! # Biped Robot Executable Library
//!
//! This library contains the modules making up the robot-side software:
//!
//! - [`joint_ctrl`] - closed loop position control of the hip joints
//! - [`choreo`] - the choreography engine which plays back authored moves
//! - [`eqpt`] - the equipment boundary (motor drivers and angle sensors)
//! - [`op_processor`] - processing of operator console frames
//! - [`data_store`] - the global data store shared by all modules

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod choreo;
pub mod data_store;
pub mod eqpt;
pub mod joint_ctrl;
pub mod op_processor;
pub mod params;
