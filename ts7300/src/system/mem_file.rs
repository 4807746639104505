use std::fs::{File, OpenOptions};
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::{AsRawFd, RawFd};
use std::path::Path;

use crate::error::Result;

/// Well-known path of the physical-memory character device.
pub const DEV_MEM_PATH: &str = "/dev/mem";

/// Handle to the opened physical-memory device.
///
/// Move-only: the descriptor closes when the last owner drops. Mappings
/// hold a shared reference to the handle so the descriptor outlives them.
#[derive(Debug)]
pub struct MemFile {
    file: File,
}

impl MemFile {
    /// Open `path` read/write with `O_SYNC`.
    ///
    /// `O_SYNC` is mandatory for the register space: without it, reads and
    /// writes can go through the cache and return stale or corrupted data.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_SYNC)
            .open(path)?;

        Ok(Self { file })
    }

    pub fn as_raw_fd(&self) -> RawFd {
        self.file.as_raw_fd()
    }
}
