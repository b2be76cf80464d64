//! Half-duplex request/ack link to the display coprocessor.
//!
//! One logical actor drives the channel: every frame written is followed by
//! exactly one blocking wait for the remote side's acknowledgment before the
//! next operation may begin. On top of that discipline sit the buffer
//! chunker (bulk transfer of rendering buffers), the query dispatcher
//! (telemetry and input-device sampling), and the knob-motion tracker.
//!
//! The link is generic over any `Read + Write` channel, so tests drive it
//! against in-memory fakes while production uses
//! [`DisplayDevice`](veclink_transport::DisplayDevice).

pub mod chunker;
pub mod error;
pub mod knob;
pub mod link;
pub mod query;

#[cfg(test)]
pub(crate) mod testing;

pub use chunker::{chunk_sizes, send_buffer, TransferStats};
pub use error::{LinkError, Result};
pub use knob::KnobTracker;
pub use link::{AckPolicy, DisplayLink, LinkConfig};
