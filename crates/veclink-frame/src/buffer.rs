//! Logical display buffer ids.
//!
//! A buffer id selects which host-side renderable surface a frame concerns.
//! The coprocessor double-buffers internally; the host only ever names the
//! logical buffer.

/// The primary display buffer. Always exists.
pub const MAIN: i32 = 0;

/// Returns a human-readable name for a buffer id.
pub fn buffer_name(id: i32) -> &'static str {
    match id {
        MAIN => "MAIN",
        _ => "AUX",
    }
}
