use std::io::{Read, Write};
use std::path::Path;
use std::time::{Duration, Instant};

use bytes::BytesMut;
use tracing::{trace, warn};
use veclink_frame::{decode_ack, encode_frame, Ack, Command, Frame, CHANNEL_MTU, HEADER_LEN};
use veclink_transport::DisplayDevice;

use crate::error::{LinkError, Result};

/// How long to wait for a response frame after a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckPolicy {
    /// Busy-poll with no timeout. The remote is a real-time coprocessor that
    /// answers within a frame period or not at all; an unresponsive remote
    /// blocks the caller indefinitely.
    Strict,
    /// Poll with a bounded deadline, sleeping `poll_interval` between empty
    /// reads, and surface [`LinkError::ChannelTimeout`] when it expires.
    Timeout {
        limit: Duration,
        poll_interval: Duration,
    },
}

impl AckPolicy {
    /// A bounded policy with a 1 ms poll interval.
    pub fn timeout(limit: Duration) -> Self {
        AckPolicy::Timeout {
            limit,
            poll_interval: Duration::from_millis(1),
        }
    }
}

impl Default for AckPolicy {
    fn default() -> Self {
        AckPolicy::Strict
    }
}

/// Configuration for a display link.
#[derive(Debug, Clone, Default)]
pub struct LinkConfig {
    /// Ack wait policy. Default: [`AckPolicy::Strict`].
    pub ack_policy: AckPolicy,
}

/// The half-duplex command link to the display coprocessor.
///
/// Owns the channel and the request/response scratch buffers. Exactly one
/// frame exchange is in flight at any time: a write is always followed by a
/// blocking wait for the ack before the next frame may be written.
pub struct DisplayLink<T> {
    channel: T,
    config: LinkConfig,
    write_buf: BytesMut,
    read_buf: [u8; CHANNEL_MTU],
    ack_mismatches: u64,
}

impl DisplayLink<DisplayDevice> {
    /// Open the device at `path` and wrap it in a link with default
    /// configuration.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(DisplayDevice::open(path)?))
    }

    /// Open the device at `path` with explicit configuration.
    pub fn open_with_config(path: impl AsRef<Path>, config: LinkConfig) -> Result<Self> {
        Ok(Self::with_config(DisplayDevice::open(path)?, config))
    }
}

impl<T: Read + Write> DisplayLink<T> {
    /// Create a link over an already-connected channel.
    pub fn new(channel: T) -> Self {
        Self::with_config(channel, LinkConfig::default())
    }

    /// Create a link with explicit configuration.
    pub fn with_config(channel: T, config: LinkConfig) -> Self {
        Self {
            channel,
            config,
            write_buf: BytesMut::with_capacity(CHANNEL_MTU),
            read_buf: [0u8; CHANNEL_MTU],
            ack_mismatches: 0,
        }
    }

    /// Number of acks received whose command code did not match the request.
    pub fn ack_mismatches(&self) -> u64 {
        self.ack_mismatches
    }

    /// Current link configuration.
    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    /// Borrow the underlying channel.
    pub fn get_ref(&self) -> &T {
        &self.channel
    }

    /// Consume the link and return the inner channel.
    pub fn into_inner(self) -> T {
        self.channel
    }

    /// Write one frame and block for its ack.
    ///
    /// The ack's command code is validated against the request; a mismatch is
    /// counted and logged but the exchange still completes.
    pub fn exchange(&mut self, frame: &Frame) -> Result<Ack> {
        self.write_frame(frame)?;
        self.await_ack(frame.command)
    }

    /// Write one frame to the channel.
    ///
    /// Returns the payload bytes the channel reported written (wire bytes
    /// minus the header, saturating at zero). A write failure is logged and
    /// reported as zero payload bytes rather than an error: the caller
    /// proceeds to the ack wait regardless, which can block forever if the
    /// remote never saw the frame. That risk is inherent to the channel
    /// contract and is bounded only by [`AckPolicy::Timeout`].
    pub(crate) fn write_frame(&mut self, frame: &Frame) -> Result<usize> {
        self.write_buf.clear();
        encode_frame(frame, &mut self.write_buf)?;

        match self.channel.write(&self.write_buf) {
            Ok(n) if n > 0 => {
                trace!(
                    command = %frame.command,
                    buffer = frame.buffer,
                    wire_bytes = n,
                    "frame written"
                );
                Ok(n.saturating_sub(HEADER_LEN))
            }
            Ok(_) => {
                warn!(command = %frame.command, "failed to write to remote device");
                Ok(0)
            }
            Err(err) => {
                warn!(command = %frame.command, error = %err, "failed to write to remote device");
                Ok(0)
            }
        }
    }

    /// Block until a non-empty response frame arrives and validate its
    /// command echo against `expected`.
    pub(crate) fn await_ack(&mut self, expected: Command) -> Result<Ack> {
        let len = self.read_response()?;
        let ack = decode_ack(&self.read_buf[..len])?;
        self.note_ack(expected, ack.command);
        Ok(ack)
    }

    /// Validate a response command echo; mismatches are counted and logged,
    /// never fatal.
    pub(crate) fn note_ack(&mut self, expected: Command, received: Command) {
        if received != expected {
            self.ack_mismatches += 1;
            warn!(
                expected = %expected,
                received = %received,
                "ack command mismatch"
            );
        }
    }

    /// The response scratch buffer; valid up to the length returned by the
    /// preceding [`read_response`](Self::read_response).
    pub(crate) fn read_buf(&self) -> &[u8] {
        &self.read_buf
    }

    /// Read one response frame into the scratch buffer, re-polling until the
    /// channel returns a positive byte count. Empty reads and read errors
    /// alike are re-polled; under [`AckPolicy::Timeout`] the loop is bounded
    /// by the configured deadline.
    pub(crate) fn read_response(&mut self) -> Result<usize> {
        let (deadline, pause) = match self.config.ack_policy {
            AckPolicy::Strict => (None, None),
            AckPolicy::Timeout {
                limit,
                poll_interval,
            } => (Some((Instant::now() + limit, limit)), Some(poll_interval)),
        };

        loop {
            match self.channel.read(&mut self.read_buf) {
                Ok(n) if n > 0 => return Ok(n),
                Ok(_) => {}
                Err(err) => {
                    trace!(error = %err, "response read re-polled");
                }
            }

            if let Some((deadline, limit)) = deadline {
                if Instant::now() >= deadline {
                    return Err(LinkError::ChannelTimeout(limit));
                }
            }
            if let Some(pause) = pause {
                std::thread::sleep(pause);
            }
        }
    }
}

impl<T> std::fmt::Debug for DisplayLink<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DisplayLink")
            .field("config", &self.config)
            .field("ack_mismatches", &self.ack_mismatches)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use veclink_frame::MAIN;

    use super::*;
    use crate::testing::{FailingWriteChannel, ScriptedChannel, SilentChannel};

    #[test]
    fn exchange_pairs_one_write_with_one_ack() {
        let channel = ScriptedChannel::echoing();
        let mut link = DisplayLink::new(channel);

        let ack = link
            .exchange(&Frame::new(Command::Start, MAIN, &b"abc"[..]))
            .unwrap();

        assert_eq!(ack.command, Command::Start);
        assert_eq!(link.ack_mismatches(), 0);

        let channel = link.into_inner();
        assert_eq!(channel.frames().len(), 1);
        assert_eq!(channel.reads(), 1);
    }

    #[test]
    fn ack_mismatch_is_counted_not_raised() {
        let channel = ScriptedChannel::answering_with(Command::Add);
        let mut link = DisplayLink::new(channel);

        let ack = link
            .exchange(&Frame::header_only(Command::Done, MAIN))
            .unwrap();

        assert_eq!(ack.command, Command::Add);
        assert_eq!(link.ack_mismatches(), 1);
    }

    #[test]
    fn unknown_response_code_errors_at_decode() {
        let channel = ScriptedChannel::answering_raw(99i32.to_ne_bytes().to_vec());
        let mut link = DisplayLink::new(channel);

        let err = link
            .exchange(&Frame::header_only(Command::Done, MAIN))
            .unwrap_err();
        assert!(matches!(
            err,
            LinkError::Frame(veclink_frame::FrameError::UnknownCommand(99))
        ));
    }

    #[test]
    fn write_failure_still_awaits_the_ack() {
        // The remote already has a response queued; the failed write is
        // logged and the exchange completes off the queued ack.
        let channel = FailingWriteChannel::with_queued_ack(Command::Start);
        let mut link = DisplayLink::new(channel);

        let ack = link
            .exchange(&Frame::new(Command::Start, MAIN, &b"xyz"[..]))
            .unwrap();
        assert_eq!(ack.command, Command::Start);
    }

    #[test]
    fn timeout_policy_bounds_the_ack_wait() {
        let config = LinkConfig {
            ack_policy: AckPolicy::Timeout {
                limit: Duration::from_millis(20),
                poll_interval: Duration::from_millis(1),
            },
        };
        let mut link = DisplayLink::with_config(SilentChannel::default(), config);

        let err = link
            .exchange(&Frame::header_only(Command::CheckFps, MAIN))
            .unwrap_err();
        assert!(matches!(err, LinkError::ChannelTimeout(_)));
    }

    #[test]
    fn empty_reads_are_repolled_until_data_arrives() {
        let channel = ScriptedChannel::echoing().with_empty_reads(3);
        let mut link = DisplayLink::new(channel);

        let ack = link
            .exchange(&Frame::header_only(Command::GetButton, MAIN))
            .unwrap();
        assert_eq!(ack.command, Command::GetButton);

        // 3 empty polls plus the successful one.
        assert_eq!(link.into_inner().reads(), 4);
    }
}
