//! Device stream ownership
//!
//! Owns the file descriptor for one joystick device node. Every descriptor
//! access runs inside the same mutex, so a background reopen can never
//! recycle the descriptor number out from under a foreground read, and no
//! two live descriptors ever exist for one logical device.

use std::os::fd::RawFd;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use nix::errno::Errno;
use nix::fcntl::{self, OFlag};
use nix::sys::stat::Mode;
use nix::unistd;

use crate::event::EVENT_SIZE;

/// Sentinel for "no descriptor held".
const NO_FD: RawFd = -1;

/// Handle on one device node path and its (possibly absent) descriptor.
pub struct DeviceStream {
    path: Mutex<PathBuf>,
    fd: Mutex<RawFd>,
}

impl DeviceStream {
    /// Create a handle pointing at `path` without opening it.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Mutex::new(path.into()),
            fd: Mutex::new(NO_FD),
        }
    }

    /// Record `path` and open it read-only, non-blocking.
    ///
    /// The new descriptor replaces any previously-held one inside a single
    /// critical section, and the old descriptor is closed there as well. A
    /// failed open still swaps in the sentinel, so the handle never keeps a
    /// half-dead descriptor after an open attempt.
    pub fn open(&self, path: &Path) -> Result<RawFd, Errno> {
        *self.lock_path() = path.to_path_buf();
        self.reopen()
    }

    /// Open whatever path the stream last pointed at.
    pub fn reopen(&self) -> Result<RawFd, Errno> {
        let path = self.path();
        let opened = fcntl::open(&path, OFlag::O_RDONLY | OFlag::O_NONBLOCK, Mode::empty());

        let mut fd = self.lock_fd();
        let old = std::mem::replace(&mut *fd, opened.unwrap_or(NO_FD));
        if old != NO_FD {
            let _ = unistd::close(old);
        }
        if let Ok(new_fd) = opened {
            tracing::debug!("opened {} as fd {}", path.display(), new_fd);
        }
        opened
    }

    /// Read one event record from the current descriptor.
    ///
    /// The descriptor lock is held across the syscall, so a concurrent
    /// open/close cannot interleave with the read. Reading a closed handle
    /// reports `EBADF` like any other stale descriptor.
    pub fn read_event(&self, buf: &mut [u8; EVENT_SIZE]) -> Result<usize, Errno> {
        let fd = self.lock_fd();
        unistd::read(*fd, buf)
    }

    /// Invalidate the descriptor and release the OS resource if one was
    /// held. Closing an already-closed stream is a no-op success.
    pub fn close(&self) -> Result<(), Errno> {
        let mut fd = self.lock_fd();
        let old = std::mem::replace(&mut *fd, NO_FD);
        if old == NO_FD {
            return Ok(());
        }
        unistd::close(old)
    }

    /// Last path used to open this stream.
    pub fn path(&self) -> PathBuf {
        self.lock_path().clone()
    }

    /// Whether a descriptor is currently held.
    pub fn is_open(&self) -> bool {
        *self.lock_fd() != NO_FD
    }

    // A poisoned lock still yields a usable guard; the fd itself stays
    // consistent because no panic can happen while it is held.
    fn lock_fd(&self) -> MutexGuard<'_, RawFd> {
        self.fd.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_path(&self) -> MutexGuard<'_, PathBuf> {
        self.path.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Drop for DeviceStream {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn scratch_device(dir: &TempDir, contents: &[u8]) -> PathBuf {
        let path = dir.path().join("js-scratch");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents).unwrap();
        path
    }

    #[test]
    fn test_open_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = scratch_device(&dir, &[]);

        let stream = DeviceStream::new(&path);
        let fd = stream.open(&path).unwrap();
        assert!(fd >= 0);
        assert!(stream.is_open());
        assert_eq!(stream.path(), path);
    }

    #[test]
    fn test_open_missing_path_reports_enoent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("no-such-node");

        let stream = DeviceStream::new(&path);
        assert_eq!(stream.open(&path), Err(Errno::ENOENT));
        assert!(!stream.is_open());
    }

    #[test]
    fn test_failed_reopen_invalidates_previous_descriptor() {
        let dir = TempDir::new().unwrap();
        let path = scratch_device(&dir, &[0u8; EVENT_SIZE]);

        let stream = DeviceStream::new(&path);
        stream.open(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(stream.reopen(), Err(Errno::ENOENT));
        assert!(!stream.is_open());

        let mut buf = [0u8; EVENT_SIZE];
        assert_eq!(stream.read_event(&mut buf), Err(Errno::EBADF));
    }

    #[test]
    fn test_read_whole_record() {
        let dir = TempDir::new().unwrap();
        let path = scratch_device(&dir, &[1, 2, 3, 4, 5, 6, 7, 8]);

        let stream = DeviceStream::new(&path);
        stream.open(&path).unwrap();

        let mut buf = [0u8; EVENT_SIZE];
        assert_eq!(stream.read_event(&mut buf), Ok(EVENT_SIZE));
        assert_eq!(buf, [1, 2, 3, 4, 5, 6, 7, 8]);

        // drained: a regular file reports end-of-stream as a zero read
        assert_eq!(stream.read_event(&mut buf), Ok(0));
    }

    #[test]
    fn test_close_twice_is_noop_success() {
        let dir = TempDir::new().unwrap();
        let path = scratch_device(&dir, &[]);

        let stream = DeviceStream::new(&path);
        stream.open(&path).unwrap();

        assert_eq!(stream.close(), Ok(()));
        assert_eq!(stream.close(), Ok(()));
        assert!(!stream.is_open());
    }

    #[test]
    fn test_read_without_descriptor_is_ebadf() {
        let stream = DeviceStream::new("/dev/input/js0");
        let mut buf = [0u8; EVENT_SIZE];
        assert_eq!(stream.read_event(&mut buf), Err(Errno::EBADF));
    }

    #[test]
    fn test_open_replaces_path_and_descriptor() {
        let dir = TempDir::new().unwrap();
        let first = scratch_device(&dir, &[0u8; EVENT_SIZE]);
        let second = dir.path().join("js-second");
        std::fs::write(&second, [9u8; EVENT_SIZE]).unwrap();

        let stream = DeviceStream::new(&first);
        stream.open(&first).unwrap();
        stream.open(&second).unwrap();

        assert_eq!(stream.path(), second);
        let mut buf = [0u8; EVENT_SIZE];
        assert_eq!(stream.read_event(&mut buf), Ok(EVENT_SIZE));
        assert_eq!(buf, [9u8; EVENT_SIZE]);
    }
}
