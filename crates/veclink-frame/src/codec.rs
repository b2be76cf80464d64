use bytes::{BufMut, Bytes, BytesMut};

use crate::command::Command;
use crate::error::{FrameError, Result};

/// Maximum total frame size the channel carries in one read/write call.
pub const CHANNEL_MTU: usize = 400;

/// Frame header: command (4) + payload size (4) + buffer id (4) = 12 bytes.
pub const HEADER_LEN: usize = 12;

/// Per-frame payload ceiling.
pub const MAX_CHUNK: usize = CHANNEL_MTU - HEADER_LEN;

/// An outbound request frame.
#[derive(Debug, Clone)]
pub struct Frame {
    /// The command this frame carries.
    pub command: Command,
    /// The logical display buffer the frame concerns.
    pub buffer: i32,
    /// The payload. At most [`MAX_CHUNK`] bytes.
    pub payload: Bytes,
}

impl Frame {
    /// Create a new frame.
    pub fn new(command: Command, buffer: i32, payload: impl Into<Bytes>) -> Self {
        Self {
            command,
            buffer,
            payload: payload.into(),
        }
    }

    /// Create a header-only frame (empty payload).
    pub fn header_only(command: Command, buffer: i32) -> Self {
        Self::new(command, buffer, Bytes::new())
    }

    /// The total wire size of this frame (header + payload).
    pub fn wire_size(&self) -> usize {
        HEADER_LEN + self.payload.len()
    }
}

/// A decoded response header.
///
/// Query responses reuse the payload-size field as a scalar result, so the
/// field is exposed as `value` here rather than as a length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ack {
    /// Command code echoed by the remote side.
    pub command: Command,
    /// The payload-size field, carrying the query result for query commands.
    pub value: i32,
    /// The buffer-id field. Zero when the response is shorter than a full header.
    pub buffer: i32,
}

/// Encode a frame into the wire format.
///
/// Wire format: `{i32 command; i32 payload_size; i32 buffer_id; u8[] payload}`,
/// native byte order. Refuses payloads over [`MAX_CHUNK`], so a frame that
/// would exceed the channel MTU is never emitted.
pub fn encode_frame(frame: &Frame, dst: &mut BytesMut) -> Result<()> {
    if frame.payload.len() > MAX_CHUNK {
        return Err(FrameError::PayloadTooLarge {
            size: frame.payload.len(),
            max: MAX_CHUNK,
        });
    }
    dst.reserve(HEADER_LEN + frame.payload.len());
    dst.put_i32_ne(frame.command.code());
    dst.put_i32_ne(frame.payload.len() as i32);
    dst.put_i32_ne(frame.buffer);
    dst.put_slice(&frame.payload);
    Ok(())
}

/// Decode a response header.
///
/// The remote side answers bulk-transfer frames with as little as the 4-byte
/// command echo; query responses carry the full 12-byte header. Fields beyond
/// what was actually received decode as zero.
pub fn decode_ack(src: &[u8]) -> Result<Ack> {
    if src.len() < 4 {
        return Err(FrameError::ShortResponse { len: src.len() });
    }
    let command = Command::from_code(read_i32_ne(src, 0))?;
    let value = if src.len() >= 8 { read_i32_ne(src, 4) } else { 0 };
    let buffer = if src.len() >= HEADER_LEN {
        read_i32_ne(src, 8)
    } else {
        0
    };
    Ok(Ack {
        command,
        value,
        buffer,
    })
}

/// Decode a full response frame (header plus payload).
///
/// The payload-size field is untrusted: the returned payload is clamped to
/// the bytes actually received and to [`MAX_CHUNK`], so a lying remote can
/// never make the decoder read past the receive buffer.
pub fn decode_frame(src: &[u8]) -> Result<(Ack, Bytes)> {
    let ack = decode_ack(src)?;
    if src.len() <= HEADER_LEN {
        return Ok((ack, Bytes::new()));
    }
    let claimed = ack.value.max(0) as usize;
    let available = src.len() - HEADER_LEN;
    let len = claimed.min(available).min(MAX_CHUNK);
    Ok((ack, Bytes::copy_from_slice(&src[HEADER_LEN..HEADER_LEN + len])))
}

fn read_i32_ne(src: &[u8], offset: usize) -> i32 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&src[offset..offset + 4]);
    i32::from_ne_bytes(raw)
}
