use std::time::Duration;

/// Errors that can occur in link operations.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    /// Frame-level error.
    #[error("frame error: {0}")]
    Frame(#[from] veclink_frame::FrameError),

    /// Transport-level error.
    #[error("transport error: {0}")]
    Transport(#[from] veclink_transport::TransportError),

    /// No response frame arrived within the configured ack deadline.
    ///
    /// Only produced under [`AckPolicy::Timeout`](crate::AckPolicy); the
    /// strict policy blocks indefinitely instead.
    #[error("no response from remote within {0:?}")]
    ChannelTimeout(Duration),
}

pub type Result<T> = std::result::Result<T, LinkError>;
