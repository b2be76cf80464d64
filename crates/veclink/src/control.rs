//! Out-of-band control port.
//!
//! A named pipe carries single-character commands from the web frontend:
//! 'a' steps the mode selector clockwise, 'b' counter-clockwise, 'c' is a
//! button press. The port is polled once per loop iteration alongside the
//! input-device queries; it never touches the protocol channel.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::debug;

/// A decoded control command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    StepCw,
    StepCcw,
    ButtonPress,
}

impl ControlEvent {
    /// Decode the single-character wire form.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'a' => Some(ControlEvent::StepCw),
            b'b' => Some(ControlEvent::StepCcw),
            b'c' => Some(ControlEvent::ButtonPress),
            _ => None,
        }
    }
}

/// Non-blocking reader over the control pipe.
pub struct ControlPort {
    file: File,
}

impl ControlPort {
    /// Open the pipe read-only and non-blocking, so an idle port polls as
    /// "no event" instead of stalling the loop.
    pub fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let mut options = std::fs::OpenOptions::new();
        options.read(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.custom_flags(libc::O_NONBLOCK);
        }
        let file = options.open(path)?;
        debug!(?path, "opened control port");
        Ok(Self { file })
    }

    /// Poll for one event. Returns `None` when nothing is pending or the
    /// pending byte is not a recognized command.
    pub fn poll(&mut self) -> Option<ControlEvent> {
        let mut buf = [0u8; 255];
        match self.file.read(&mut buf) {
            Ok(n) if n > 0 => ControlEvent::from_byte(buf[0]),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_characters_decode() {
        assert_eq!(ControlEvent::from_byte(b'a'), Some(ControlEvent::StepCw));
        assert_eq!(ControlEvent::from_byte(b'b'), Some(ControlEvent::StepCcw));
        assert_eq!(
            ControlEvent::from_byte(b'c'),
            Some(ControlEvent::ButtonPress)
        );
        assert_eq!(ControlEvent::from_byte(b'x'), None);
        assert_eq!(ControlEvent::from_byte(b'*'), None);
    }

    #[test]
    fn idle_port_polls_as_no_event() {
        let dir = std::env::temp_dir().join(format!("veclink-ctl-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("ctl");
        std::fs::write(&path, b"").unwrap();

        let mut port = ControlPort::open(&path).unwrap();
        assert_eq!(port.poll(), None);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn queued_command_is_consumed() {
        let dir = std::env::temp_dir().join(format!("veclink-ctl-q-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("ctl");
        std::fs::write(&path, b"a").unwrap();

        let mut port = ControlPort::open(&path).unwrap();
        assert_eq!(port.poll(), Some(ControlEvent::StepCw));
        assert_eq!(port.poll(), None);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
