//! In-memory channels standing in for the display device.

use std::collections::VecDeque;
use std::io::{Read, Write};

use bytes::BufMut;
use veclink_frame::{Command, HEADER_LEN};

/// A frame the fake remote observed, reassembled from the wire bytes it
/// accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeenFrame {
    pub command: Command,
    pub buffer: i32,
    /// The payload prefix actually accepted by the (possibly short) write.
    pub payload: Vec<u8>,
}

/// Scripted remote: acknowledges every frame written, optionally with a
/// wrong command code or a scalar result, and records everything it saw.
pub struct ScriptedChannel {
    frames: Vec<SeenFrame>,
    pending: VecDeque<Vec<u8>>,
    reads: usize,
    empty_reads_left: usize,
    answer: Answer,
    /// Wire bytes to report for each write, front to back; full writes
    /// once exhausted.
    short_writes: VecDeque<usize>,
}

enum Answer {
    Echo,
    Fixed(Command),
    Raw(Vec<u8>),
    Values(VecDeque<i32>),
}

impl ScriptedChannel {
    /// Acks every frame with its own command code.
    pub fn echoing() -> Self {
        Self::with_answer(Answer::Echo)
    }

    /// Acks every frame with `command`, regardless of what was sent.
    pub fn answering_with(command: Command) -> Self {
        Self::with_answer(Answer::Fixed(command))
    }

    /// Acks every frame with the given raw bytes.
    pub fn answering_raw(bytes: Vec<u8>) -> Self {
        Self::with_answer(Answer::Raw(bytes))
    }

    /// Acks each frame with its own command code and the next scalar
    /// value in the size field.
    pub fn answering_values(values: impl IntoIterator<Item = i32>) -> Self {
        Self::with_answer(Answer::Values(values.into_iter().collect()))
    }

    fn with_answer(answer: Answer) -> Self {
        Self {
            frames: Vec::new(),
            pending: VecDeque::new(),
            reads: 0,
            empty_reads_left: 0,
            answer,
            short_writes: VecDeque::new(),
        }
    }

    /// Return `Ok(0)` for the first `n` reads.
    pub fn with_empty_reads(mut self, n: usize) -> Self {
        self.empty_reads_left = n;
        self
    }

    /// Report the given wire byte counts for the next writes.
    pub fn with_short_writes(mut self, reported: impl IntoIterator<Item = usize>) -> Self {
        self.short_writes = reported.into_iter().collect();
        self
    }

    pub fn frames(&self) -> &[SeenFrame] {
        &self.frames
    }

    pub fn reads(&self) -> usize {
        self.reads
    }

    fn ack_bytes(&mut self, command: Command) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_LEN);
        match &mut self.answer {
            Answer::Echo => out.put_i32_ne(command.code()),
            Answer::Fixed(cmd) => out.put_i32_ne(cmd.code()),
            Answer::Raw(bytes) => return bytes.clone(),
            Answer::Values(values) => {
                out.put_i32_ne(command.code());
                out.put_i32_ne(values.pop_front().unwrap_or(0));
                out.put_i32_ne(0);
            }
        }
        out
    }
}

impl Write for ScriptedChannel {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        assert!(
            self.pending.is_empty(),
            "frame written before the previous ack was consumed"
        );

        let reported = self.short_writes.pop_front().unwrap_or(buf.len());
        assert!(reported <= buf.len());

        let code = i32::from_ne_bytes(buf[0..4].try_into().unwrap());
        let command = Command::from_code(code).expect("host wrote an unknown command");
        let buffer = i32::from_ne_bytes(buf[8..12].try_into().unwrap());
        let accepted_payload = reported.saturating_sub(HEADER_LEN);
        self.frames.push(SeenFrame {
            command,
            buffer,
            payload: buf[HEADER_LEN..HEADER_LEN + accepted_payload.min(buf.len() - HEADER_LEN)]
                .to_vec(),
        });

        let ack = self.ack_bytes(command);
        self.pending.push_back(ack);
        Ok(reported)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl Read for ScriptedChannel {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.reads += 1;
        if self.empty_reads_left > 0 {
            self.empty_reads_left -= 1;
            return Ok(0);
        }
        match self.pending.pop_front() {
            Some(bytes) => {
                let n = bytes.len().min(buf.len());
                buf[..n].copy_from_slice(&bytes[..n]);
                Ok(n)
            }
            None => Ok(0),
        }
    }
}

/// A channel whose writes always fail but which has acks pre-queued.
pub struct FailingWriteChannel {
    pending: VecDeque<Vec<u8>>,
}

impl FailingWriteChannel {
    pub fn with_queued_ack(command: Command) -> Self {
        let mut ack = Vec::with_capacity(4);
        ack.put_i32_ne(command.code());
        Self {
            pending: VecDeque::from([ack]),
        }
    }
}

impl Write for FailingWriteChannel {
    fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
        Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe))
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl Read for FailingWriteChannel {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self.pending.pop_front() {
            Some(bytes) => {
                let n = bytes.len().min(buf.len());
                buf[..n].copy_from_slice(&bytes[..n]);
                Ok(n)
            }
            None => Ok(0),
        }
    }
}

/// A channel that accepts writes but never responds.
#[derive(Default)]
pub struct SilentChannel;

impl Write for SilentChannel {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl Read for SilentChannel {
    fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
        Ok(0)
    }
}
