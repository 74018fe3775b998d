//! Stream health classification
//!
//! Maps the errno from the last read or open attempt onto a coarse status
//! the caller can act on. See read(2) for the errno semantics.

use nix::errno::Errno;

/// Coarse health of the gamepad stream.
///
/// Ordered so that every failure state compares below [`GamepadStatus::Ok`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum GamepadStatus {
    /// Unclassified failure
    Error = -3,
    /// Transient or persistent I/O fault
    Io = -2,
    /// Bad or invalid file descriptor
    InvalidFile = -1,
    /// Healthy, including "no data queued right now"
    Ok = 0,
}

impl GamepadStatus {
    /// Classify the errno captured from a failed device call.
    ///
    /// `EAGAIN` is the normal idle condition of a non-blocking stream and
    /// classifies as healthy.
    pub fn from_errno(err: Errno) -> Self {
        match err {
            Errno::EBADF | Errno::EINVAL => GamepadStatus::InvalidFile,
            Errno::EIO => GamepadStatus::Io,
            Errno::EAGAIN => GamepadStatus::Ok,
            _ => GamepadStatus::Error,
        }
    }

    /// True for every status below [`GamepadStatus::Ok`].
    pub fn is_error(&self) -> bool {
        *self < GamepadStatus::Ok
    }
}
