//! Error types shared by the register layer and the board drivers.

use std::io;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the register layer and the board drivers.
///
/// Failures are not recovered locally: construction-time errors (a page
/// that never mapped, an out-of-range port index, a device opened twice)
/// propagate up to the caller unchanged.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A syscall failed (open, mmap, munmap). Carries the OS error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A caller passed a precondition-violating value.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// An operation was attempted while the object forbids it.
    #[error("invalid state: {0}")]
    InvalidState(&'static str),

    /// Hardware did not report ready within the poll budget.
    #[error("timed out: {0}")]
    Timeout(&'static str),

    /// The kernel refused a mapping with `ENOMEM`.
    #[error("not enough memory")]
    NotEnoughMemory,

    /// Fallback for conditions not otherwise classified.
    #[error("unknown error")]
    Unknown,
}

impl Error {
    /// Wrap `errno` from the last failed syscall.
    pub fn last_os_error() -> Self {
        Error::Io(io::Error::last_os_error())
    }

    /// Short category label, used by binaries when reporting failures.
    pub fn category(&self) -> &'static str {
        match self {
            Error::Io(_) => "I/O",
            Error::InvalidArgument(_) => "invalid argument",
            Error::InvalidState(_) => "invalid state",
            Error::Timeout(_) => "timeout",
            Error::NotEnoughMemory => "resource",
            Error::Unknown => "unknown",
        }
    }
}
