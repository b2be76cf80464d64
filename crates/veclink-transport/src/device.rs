use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Result, TransportError};

/// The display coprocessor's byte channel.
///
/// Wraps the character device handle. Opened once at startup and held for the
/// process lifetime; the descriptor is released when the value is dropped.
/// Reads and writes move at most one protocol frame per call; the device
/// itself enforces the per-frame size ceiling.
pub struct DisplayDevice {
    file: File,
    path: PathBuf,
}

impl DisplayDevice {
    /// Open the device for blocking read/write.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_inner(path.as_ref(), false)
    }

    /// Open the device with `O_NONBLOCK`, so reads return `WouldBlock`
    /// instead of sleeping when no response frame is pending.
    #[cfg(unix)]
    pub fn open_nonblocking(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_inner(path.as_ref(), true)
    }

    fn open_inner(path: &Path, nonblocking: bool) -> Result<Self> {
        let mut options = OpenOptions::new();
        options.read(true).write(true);

        #[cfg(unix)]
        if nonblocking {
            use std::os::unix::fs::OpenOptionsExt;
            options.custom_flags(libc::O_NONBLOCK);
        }
        #[cfg(not(unix))]
        let _ = nonblocking;

        let file = options.open(path).map_err(|e| TransportError::Open {
            path: path.to_path_buf(),
            source: e,
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::FileTypeExt;
            if let Ok(metadata) = file.metadata() {
                if !metadata.file_type().is_char_device() {
                    debug!(?path, "device path is not a character device");
                }
            }
        }

        info!(?path, nonblocking, "opened display channel");
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    /// The path this device was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Try to clone this handle (creates a new file descriptor).
    pub fn try_clone(&self) -> Result<Self> {
        let file = self.file.try_clone()?;
        Ok(Self {
            file,
            path: self.path.clone(),
        })
    }
}

impl Read for DisplayDevice {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.file.read(buf)
    }
}

impl Write for DisplayDevice {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.file.flush()
    }
}

impl std::fmt::Debug for DisplayDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DisplayDevice")
            .field("path", &self.path)
            .finish()
    }
}
