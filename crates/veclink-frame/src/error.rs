/// Errors that can occur during frame encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The command code is not part of the protocol's closed enumeration.
    #[error("unknown command code {0}")]
    UnknownCommand(i32),

    /// The payload exceeds the per-frame ceiling.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// The response is too short to carry a command code.
    #[error("response too short ({len} bytes)")]
    ShortResponse { len: usize },
}

pub type Result<T> = std::result::Result<T, FrameError>;
