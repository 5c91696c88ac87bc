//! # Telemetry Wire Frames
//!
//! Fixed-layout binary records exchanged between the operator console and the
//! robot. Field order and widths are fixed per direction and must remain
//! stable across versions sharing a link. There is no checksum or version
//! field, the frame size is the only integrity check available at this layer,
//! so a received datagram of the wrong length is rejected in full.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::Cursor;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Size in bytes of an encoded [`OpFrame`].
pub const OP_FRAME_SIZE: usize = 49;

/// Size in bytes of an encoded [`BotFrame`].
pub const BOT_FRAME_SIZE: usize = 40;

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A fixed-size frame which can be carried over the telemetry link.
pub trait WireFrame: Sized + Clone + Send + 'static {
    /// The exact encoded size of the frame in bytes.
    const SIZE: usize;

    /// Encode the frame into its wire representation.
    fn to_bytes(&self) -> std::io::Result<Vec<u8>>;

    /// Decode a frame from its wire representation.
    ///
    /// Buffers whose length differs from [`Self::SIZE`] are rejected whole,
    /// no partial field update is ever visible to the caller.
    fn from_bytes(buf: &[u8]) -> Result<Self, FrameError>;
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Frame sent from the operator console to the robot.
///
/// Carries the raw operator inputs (joystick axes, sliders, rotary encoder,
/// keypad), the console's battery level, the currently tuned gains and the
/// joint target angles commanded by the console.
#[derive(Debug, Clone, PartialEq)]
pub struct OpFrame {
    /// Operator joystick axis readings: left X, left Y, right X, right Y.
    pub axes: [i16; 4],

    /// Slider readings: left leg, left arm, right leg, right arm.
    pub sliders: [i16; 4],

    /// Rotary encoder position.
    pub rotary_pos: i16,

    /// True if the rotary encoder switch is held down.
    pub rotary_sw_down: bool,

    /// Selected keypad key code, 0 if no key is pressed this cycle.
    pub key: u8,

    /// Console battery percentage, 0-100.
    pub battery_percent: i8,

    /// Proportional gain.
    pub k_p: f64,

    /// Integral gain.
    pub k_i: f64,

    /// Derivative gain.
    pub k_d: f64,

    /// Right joint target angle in degrees, as mapped from the sliders by
    /// the console.
    ///
    /// Echoed for logging only: the robot derives its own targets from the
    /// raw slider fields, so both ends apply the one mapping they own.
    pub right_target_deg: u16,

    /// Left joint target angle in degrees, as mapped from the sliders by
    /// the console.
    ///
    /// Echoed for logging only, see [`OpFrame::right_target_deg`].
    pub left_target_deg: u16,
}

/// Frame sent from the robot back to the operator console.
#[derive(Debug, Clone, PartialEq)]
pub struct BotFrame {
    /// Proportional gain currently in use on the robot.
    pub k_p: f64,

    /// Integral gain currently in use on the robot.
    pub k_i: f64,

    /// Derivative gain currently in use on the robot.
    pub k_d: f64,

    /// Right joint encoder feedback angle in degrees.
    pub right_angle_deg: f64,

    /// Left joint encoder feedback angle in degrees.
    pub left_angle_deg: f64,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("Expected a frame of {expected} bytes but got {actual} bytes")]
    SizeMismatch {
        expected: usize,
        actual: usize
    },

    #[error("Could not read a field out of the frame: {0}")]
    ReadError(std::io::Error),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl OpFrame {
    /// Get the pressed key as a character, or `None` if no key was pressed.
    pub fn key_char(&self) -> Option<char> {
        match self.key {
            0 => None,
            k => Some(k as char)
        }
    }
}

impl Default for OpFrame {
    fn default() -> Self {
        Self {
            axes: [0; 4],
            sliders: [0; 4],
            rotary_pos: 0,
            rotary_sw_down: false,
            key: 0,
            battery_percent: 0,
            k_p: 0.0,
            k_i: 0.0,
            k_d: 0.0,
            // Both legs straight down
            right_target_deg: 180,
            left_target_deg: 180,
        }
    }
}

impl Default for BotFrame {
    fn default() -> Self {
        Self {
            k_p: 0.0,
            k_i: 0.0,
            k_d: 0.0,
            right_angle_deg: 180.0,
            left_angle_deg: 180.0,
        }
    }
}

impl WireFrame for OpFrame {
    const SIZE: usize = OP_FRAME_SIZE;

    fn to_bytes(&self) -> std::io::Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(Self::SIZE);

        for axis in self.axes.iter() {
            buf.write_i16::<LittleEndian>(*axis)?;
        }
        for slider in self.sliders.iter() {
            buf.write_i16::<LittleEndian>(*slider)?;
        }
        buf.write_i16::<LittleEndian>(self.rotary_pos)?;
        buf.write_u8(self.rotary_sw_down as u8)?;
        buf.write_u8(self.key)?;
        buf.write_i8(self.battery_percent)?;
        buf.write_f64::<LittleEndian>(self.k_p)?;
        buf.write_f64::<LittleEndian>(self.k_i)?;
        buf.write_f64::<LittleEndian>(self.k_d)?;
        buf.write_u16::<LittleEndian>(self.right_target_deg)?;
        buf.write_u16::<LittleEndian>(self.left_target_deg)?;

        Ok(buf)
    }

    fn from_bytes(buf: &[u8]) -> Result<Self, FrameError> {
        if buf.len() != Self::SIZE {
            return Err(FrameError::SizeMismatch {
                expected: Self::SIZE,
                actual: buf.len()
            });
        }

        let mut rdr = Cursor::new(buf);
        let mut frame = Self::default();

        for axis in frame.axes.iter_mut() {
            *axis = rdr.read_i16::<LittleEndian>().map_err(FrameError::ReadError)?;
        }
        for slider in frame.sliders.iter_mut() {
            *slider = rdr.read_i16::<LittleEndian>().map_err(FrameError::ReadError)?;
        }
        frame.rotary_pos = rdr.read_i16::<LittleEndian>().map_err(FrameError::ReadError)?;
        frame.rotary_sw_down = rdr.read_u8().map_err(FrameError::ReadError)? != 0;
        frame.key = rdr.read_u8().map_err(FrameError::ReadError)?;
        frame.battery_percent = rdr.read_i8().map_err(FrameError::ReadError)?;
        frame.k_p = rdr.read_f64::<LittleEndian>().map_err(FrameError::ReadError)?;
        frame.k_i = rdr.read_f64::<LittleEndian>().map_err(FrameError::ReadError)?;
        frame.k_d = rdr.read_f64::<LittleEndian>().map_err(FrameError::ReadError)?;
        frame.right_target_deg = rdr.read_u16::<LittleEndian>().map_err(FrameError::ReadError)?;
        frame.left_target_deg = rdr.read_u16::<LittleEndian>().map_err(FrameError::ReadError)?;

        Ok(frame)
    }
}

impl WireFrame for BotFrame {
    const SIZE: usize = BOT_FRAME_SIZE;

    fn to_bytes(&self) -> std::io::Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(Self::SIZE);

        buf.write_f64::<LittleEndian>(self.k_p)?;
        buf.write_f64::<LittleEndian>(self.k_i)?;
        buf.write_f64::<LittleEndian>(self.k_d)?;
        buf.write_f64::<LittleEndian>(self.right_angle_deg)?;
        buf.write_f64::<LittleEndian>(self.left_angle_deg)?;

        Ok(buf)
    }

    fn from_bytes(buf: &[u8]) -> Result<Self, FrameError> {
        if buf.len() != Self::SIZE {
            return Err(FrameError::SizeMismatch {
                expected: Self::SIZE,
                actual: buf.len()
            });
        }

        let mut rdr = Cursor::new(buf);

        Ok(Self {
            k_p: rdr.read_f64::<LittleEndian>().map_err(FrameError::ReadError)?,
            k_i: rdr.read_f64::<LittleEndian>().map_err(FrameError::ReadError)?,
            k_d: rdr.read_f64::<LittleEndian>().map_err(FrameError::ReadError)?,
            right_angle_deg: rdr.read_f64::<LittleEndian>().map_err(FrameError::ReadError)?,
            left_angle_deg: rdr.read_f64::<LittleEndian>().map_err(FrameError::ReadError)?,
        })
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_op_frame_layout() {
        let frame = OpFrame {
            axes: [1, -2, 3, -4],
            sliders: [100, 200, -300, 400],
            rotary_pos: -7,
            rotary_sw_down: true,
            key: b'5',
            battery_percent: 87,
            k_p: 1.4,
            k_i: 0.0,
            k_d: 0.2,
            right_target_deg: 160,
            left_target_deg: 200,
        };

        let bytes = frame.to_bytes().unwrap();
        assert_eq!(bytes.len(), OP_FRAME_SIZE);

        let decoded = OpFrame::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, frame);
        assert_eq!(decoded.key_char(), Some('5'));
    }

    #[test]
    fn test_bot_frame_layout() {
        let frame = BotFrame {
            k_p: 2.0,
            k_i: 0.1,
            k_d: 0.0,
            right_angle_deg: 182.5,
            left_angle_deg: 177.25,
        };

        let bytes = frame.to_bytes().unwrap();
        assert_eq!(bytes.len(), BOT_FRAME_SIZE);

        let decoded = BotFrame::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, frame);
    }

    #[test]
    fn test_short_frame_rejected() {
        let frame = BotFrame::default();
        let bytes = frame.to_bytes().unwrap();

        // A truncated datagram must be rejected whole
        match BotFrame::from_bytes(&bytes[..bytes.len() - 1]) {
            Err(FrameError::SizeMismatch { expected, actual }) => {
                assert_eq!(expected, BOT_FRAME_SIZE);
                assert_eq!(actual, BOT_FRAME_SIZE - 1);
            }
            other => panic!("Expected a size mismatch, got {:?}", other)
        }

        // As must an over-long one
        let mut long = bytes.clone();
        long.push(0);
        assert!(OpFrame::from_bytes(&long).is_err());
    }

    #[test]
    fn test_no_key_is_none() {
        let frame = OpFrame::default();
        assert_eq!(frame.key_char(), None);
    }
}
