//! Bulk transfer of a rendering buffer as a START / ADD* / DONE sequence.
//!
//! The chunker borrows the buffer read-only and decomposes it into frames
//! whose payloads never exceed [`MAX_CHUNK`]: the ceiling comes out of one
//! pure function, so an oversized frame cannot be constructed. Each frame is
//! acknowledged before the next is written.

use std::io::{Read, Write};
use std::time::{Duration, Instant};

use bytes::Bytes;
use tracing::debug;
use veclink_frame::{buffer_name, Command, Frame, MAX_CHUNK};

use crate::error::Result;
use crate::link::DisplayLink;

/// Payload length of the next chunk for `remaining` unsent bytes.
///
/// The only place a data-frame payload size is derived; bounded by
/// [`MAX_CHUNK`] by construction.
#[inline]
pub fn chunk_len(remaining: usize) -> usize {
    remaining.min(MAX_CHUNK)
}

/// The payload sizes a transfer of `total` bytes decomposes into, in
/// emission order, excluding the DONE frame.
///
/// Always yields at least one element: a zero-length buffer still opens with
/// START(size 0).
pub fn chunk_sizes(total: usize) -> ChunkSizes {
    ChunkSizes {
        remaining: total,
        first: true,
    }
}

/// Iterator returned by [`chunk_sizes`].
#[derive(Debug, Clone)]
pub struct ChunkSizes {
    remaining: usize,
    first: bool,
}

impl Iterator for ChunkSizes {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if !self.first && self.remaining == 0 {
            return None;
        }
        self.first = false;
        let len = chunk_len(self.remaining);
        self.remaining -= len;
        Some(len)
    }
}

/// Statistics for one completed buffer transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferStats {
    /// Frames emitted, including START and DONE.
    pub frames: u32,
    /// Payload bytes carried (equals the buffer length).
    pub payload_bytes: usize,
    /// Wall-clock duration of the transfer.
    pub elapsed: Duration,
}

/// Transfer `data` to logical buffer `buffer` on the remote side.
///
/// Emits START with the first chunk, ADD frames while bytes remain, then a
/// header-only DONE, awaiting the matching ack after every frame. Progress
/// advances only by the payload bytes the channel reported written: a short
/// write re-sends from where the channel stopped, and a write reported as
/// zero repeats the same chunk (which stalls permanently if the channel
/// never recovers, bounded only by the link's ack timeout policy).
pub fn send_buffer<T: Read + Write>(
    link: &mut DisplayLink<T>,
    buffer: i32,
    data: &[u8],
) -> Result<TransferStats> {
    let started = Instant::now();
    let total = data.len();
    let mut offset = 0usize;
    let mut frames = 0u32;

    let len = chunk_len(total);
    let first = Frame::new(Command::Start, buffer, Bytes::copy_from_slice(&data[..len]));
    let written = link.write_frame(&first)?;
    link.await_ack(Command::Start)?;
    offset += written.min(len);
    frames += 1;

    while offset < total {
        let len = chunk_len(total - offset);
        let frame = Frame::new(
            Command::Add,
            buffer,
            Bytes::copy_from_slice(&data[offset..offset + len]),
        );
        let written = link.write_frame(&frame)?;
        link.await_ack(Command::Add)?;
        offset += written.min(len);
        frames += 1;
    }

    link.write_frame(&Frame::header_only(Command::Done, buffer))?;
    link.await_ack(Command::Done)?;
    frames += 1;

    let stats = TransferStats {
        frames,
        payload_bytes: total,
        elapsed: started.elapsed(),
    };
    debug!(
        buffer = buffer_name(buffer),
        frames = stats.frames,
        payload_bytes = stats.payload_bytes,
        elapsed_us = stats.elapsed.as_micros() as u64,
        "buffer transfer complete"
    );
    Ok(stats)
}
