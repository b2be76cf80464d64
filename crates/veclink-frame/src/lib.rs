//! Command framing for the display coprocessor channel.
//!
//! Every message is framed with a fixed 12-byte header:
//! - A 4-byte command code (closed enumeration, [`Command`])
//! - A 4-byte payload size (doubles as the scalar result in query responses)
//! - A 4-byte logical buffer id
//!
//! All three fields are 32-bit integers in native byte order; both ends of
//! the channel share the same integer layout, and there is no endianness
//! negotiation. This is an interop constraint of the wire format, not
//! something negotiable at this layer.

pub mod buffer;
pub mod codec;
pub mod command;
pub mod error;

pub use buffer::{buffer_name, MAIN};
pub use codec::{
    decode_ack, decode_frame, encode_frame, Ack, Frame, CHANNEL_MTU, HEADER_LEN, MAX_CHUNK,
};
pub use command::Command;
pub use error::{FrameError, Result};
