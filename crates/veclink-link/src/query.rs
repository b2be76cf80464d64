//! Short fixed-size request/response exchanges: device telemetry, input
//! state, and screen-saver control.
//!
//! Query responses carry their scalar result in the header's size field; the
//! protocol does not self-describe the response length, so each method knows
//! what its reply looks like.

use std::io::{Read, Write};

use bytes::Bytes;
use veclink_frame::{decode_frame, Command, Frame, MAIN};

use crate::error::Result;
use crate::link::DisplayLink;

impl<T: Read + Write> DisplayLink<T> {
    /// Frames rendered per second on the remote side.
    pub fn check_fps(&mut self) -> Result<i32> {
        self.query(Command::CheckFps)
    }

    /// Compute cycles the remote spent in its last frame.
    pub fn check_cycles_in_frame(&mut self) -> Result<i32> {
        self.query(Command::CheckCyclesInFrame)
    }

    /// Absolute rotary-encoder position, 0-255.
    pub fn knob_position(&mut self) -> Result<i32> {
        self.query(Command::GetKnobPosition)
    }

    /// Push-button state.
    pub fn button_pressed(&mut self) -> Result<bool> {
        Ok(self.query(Command::GetButton)? != 0)
    }

    /// Update the screen-saver pixel offsets. All remote drawing is shifted
    /// by these amounts. Expects a header-only ack.
    pub fn set_screen_saver_offsets(&mut self, x: u8, y: u8) -> Result<()> {
        let frame = Frame::new(
            Command::SetScreenSaverOffsets,
            MAIN,
            Bytes::copy_from_slice(&[x, y]),
        );
        self.exchange(&frame)?;
        Ok(())
    }

    /// Read the remote copy of `buffer` back for comparison (debug path).
    ///
    /// Returns the payload bytes the remote actually sent, clamped to what
    /// was received.
    pub fn read_back(&mut self, buffer: i32) -> Result<Bytes> {
        self.write_frame(&Frame::header_only(Command::Readback, buffer))?;
        let len = self.read_response()?;
        let (ack, payload) = {
            let raw = &self.read_buf()[..len];
            decode_frame(raw)?
        };
        self.note_ack(Command::Readback, ack.command);
        Ok(payload)
    }

    /// Zero-payload request, ack of matching code, scalar result from the
    /// ack's size field.
    fn query(&mut self, command: Command) -> Result<i32> {
        let ack = self.exchange(&Frame::header_only(command, MAIN))?;
        Ok(ack.value)
    }
}
