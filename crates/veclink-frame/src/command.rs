use crate::error::{FrameError, Result};

/// Protocol command codes.
///
/// The table is closed: every decode site matches exhaustively, and a code
/// outside this set is a decode error rather than a silently misread frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Begin a buffer transfer; carries the first chunk.
    Start,
    /// Continue a buffer transfer; carries a subsequent chunk.
    Add,
    /// Terminate a buffer transfer; empty payload.
    Done,
    /// Read the remote buffer back for comparison (debug path).
    Readback,
    /// Query the rendered frame rate.
    CheckFps,
    /// Update screen-saver pixel offsets; 2-byte payload (x, y).
    SetScreenSaverOffsets,
    /// Query compute cycles spent in the last frame.
    CheckCyclesInFrame,
    /// Query the rotary-encoder absolute position (0-255).
    GetKnobPosition,
    /// Query the push-button state (0 or 1).
    GetButton,
}

impl Command {
    /// The wire code for this command.
    pub const fn code(self) -> i32 {
        match self {
            Command::Start => 0,
            Command::Add => 1,
            Command::Done => 2,
            Command::Readback => 3,
            Command::CheckFps => 4,
            Command::SetScreenSaverOffsets => 5,
            Command::CheckCyclesInFrame => 6,
            Command::GetKnobPosition => 7,
            Command::GetButton => 8,
        }
    }

    /// Decode a wire code.
    pub fn from_code(code: i32) -> Result<Self> {
        match code {
            0 => Ok(Command::Start),
            1 => Ok(Command::Add),
            2 => Ok(Command::Done),
            3 => Ok(Command::Readback),
            4 => Ok(Command::CheckFps),
            5 => Ok(Command::SetScreenSaverOffsets),
            6 => Ok(Command::CheckCyclesInFrame),
            7 => Ok(Command::GetKnobPosition),
            8 => Ok(Command::GetButton),
            other => Err(FrameError::UnknownCommand(other)),
        }
    }

    /// Human-readable name for diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            Command::Start => "START",
            Command::Add => "ADD",
            Command::Done => "DONE",
            Command::Readback => "READBACK",
            Command::CheckFps => "CHECK_FPS",
            Command::SetScreenSaverOffsets => "SET_SCREEN_SAVER_OFFSETS",
            Command::CheckCyclesInFrame => "CHECK_CYCLES_IN_FRAME",
            Command::GetKnobPosition => "GET_KNOB_POSITION",
            Command::GetButton => "GET_BUTTON",
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Command; 9] = [
        Command::Start,
        Command::Add,
        Command::Done,
        Command::Readback,
        Command::CheckFps,
        Command::SetScreenSaverOffsets,
        Command::CheckCyclesInFrame,
        Command::GetKnobPosition,
        Command::GetButton,
    ];

    #[test]
    fn wire_codes_match_the_protocol_table() {
        let expected = [0, 1, 2, 3, 4, 5, 6, 7, 8];
        for (cmd, code) in ALL.iter().zip(expected) {
            assert_eq!(cmd.code(), code);
        }
    }

    #[test]
    fn codes_round_trip() {
        for cmd in ALL {
            assert_eq!(Command::from_code(cmd.code()).unwrap(), cmd);
        }
    }

    #[test]
    fn unknown_codes_are_rejected() {
        for code in [-1, 9, 100, i32::MAX] {
            assert!(matches!(
                Command::from_code(code),
                Err(FrameError::UnknownCommand(c)) if c == code
            ));
        }
    }
}
