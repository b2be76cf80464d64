//! Byte-channel transport to the display coprocessor.
//!
//! The coprocessor is reachable only through a character device (an rpmsg
//! endpoint on the reference hardware). This crate owns opening that device
//! and exposes it as a plain [`Read`](std::io::Read) + [`Write`](std::io::Write)
//! handle. The framing, acknowledgment, and chunking layers all build on the
//! [`DisplayDevice`] type provided here.

pub mod device;
pub mod error;

pub use device::DisplayDevice;
pub use error::{Result, TransportError};
