//! Gamepad façade
//!
//! Composes the device stream, decoder state, status classifier and
//! reconnection loop into the public polling API. One foreground caller
//! drives [`Gamepad::refresh`] at its own cadence; at most one background
//! worker retries the device while it is gone.

use std::os::fd::RawFd;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use nix::errno::Errno;

use crate::event::{JsEvent, PadState, EVENT_SIZE};
use crate::reconnect::Reconnector;
use crate::status::GamepadStatus;
use crate::stream::DeviceStream;
use crate::DriverError;

/// Highest index the `/dev/input/jsN` template can express.
const MAX_DEVICE_INDEX: u8 = 9;

pub(crate) fn device_path(index: u8) -> PathBuf {
    PathBuf::from(format!("/dev/input/js{index}"))
}

/// Live view of one joystick device.
///
/// Queries never fail and never block: while the device is gone they keep
/// returning the last-known values with [`Gamepad::has_error`] raised, and
/// the first [`Gamepad::refresh`] after a successful background reopen
/// resumes live updates with no caller action.
pub struct Gamepad {
    stream: Arc<DeviceStream>,
    reconnect: Reconnector,
    state: PadState,
    status: GamepadStatus,
}

impl Gamepad {
    /// Open the device node at `path` and take an initial state snapshot.
    ///
    /// Construction itself cannot fail; an unreachable device shows up in
    /// [`Gamepad::status`] and kicks off background reconnection.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let stream = Arc::new(DeviceStream::new(path.as_ref()));
        let mut pad = Self {
            reconnect: Reconnector::new(Arc::clone(&stream)),
            stream,
            state: PadState::new(),
            status: GamepadStatus::Ok,
        };
        pad.open_stream(path.as_ref());
        pad.refresh();
        pad
    }

    /// Open the `index`-th joystick device node, `/dev/input/jsN`.
    pub fn from_index(index: u8) -> Result<Self, DriverError> {
        if index > MAX_DEVICE_INDEX {
            return Err(DriverError::InvalidIndex(index));
        }
        Ok(Self::from_path(device_path(index)))
    }

    /// Drain pending events into the state snapshot and reclassify the
    /// stream health.
    ///
    /// While a reconnection is in flight this returns immediately, since
    /// there is nothing useful to read from a descriptor known to be broken.
    pub fn refresh(&mut self) {
        if self.reconnect.is_active() {
            return;
        }
        // a worker that finished since the last call is joined here
        self.reconnect.reap();

        let mut buf = [0u8; EVENT_SIZE];
        self.status = loop {
            match self.stream.read_event(&mut buf) {
                Ok(n) if n == EVENT_SIZE => self.state.apply(&JsEvent::decode(&buf)),
                // zero or short read: the stream is drained
                Ok(_) => break GamepadStatus::Ok,
                Err(err) => break GamepadStatus::from_errno(err),
            }
        };

        if self.status.is_error() {
            tracing::warn!(
                "lost {} ({:?}), reconnecting in background",
                self.stream.path().display(),
                self.status
            );
            self.reconnect.start();
        }
    }

    /// Last-seen value of an axis; 0 for any out-of-range index.
    pub fn axis(&self, index: i32) -> i16 {
        self.state.axis(index)
    }

    /// Last-seen value of a button; 0 for any out-of-range index.
    pub fn button(&self, index: i32) -> i16 {
        self.state.button(index)
    }

    /// Status computed by the most recent refresh or open/close attempt.
    pub fn status(&self) -> GamepadStatus {
        self.status
    }

    /// True whenever the current status is below [`GamepadStatus::Ok`].
    pub fn has_error(&self) -> bool {
        self.status.is_error()
    }

    /// Last path used to open the stream.
    pub fn path(&self) -> PathBuf {
        self.stream.path()
    }

    /// Point the stream at a new device node, cancelling any in-flight
    /// reconnection first.
    ///
    /// Returns the new raw descriptor, negative on failure; the failure
    /// itself lands in [`Gamepad::status`].
    pub fn open_stream(&mut self, path: impl AsRef<Path>) -> RawFd {
        self.reconnect.stop();
        match self.stream.open(path.as_ref()) {
            Ok(fd) => {
                self.status = GamepadStatus::Ok;
                fd
            }
            Err(err) => {
                self.status = GamepadStatus::from_errno(err);
                -1
            }
        }
    }

    /// Close the stream, cancelling any in-flight reconnection first.
    ///
    /// A closed stream counts as errored until something is reopened.
    /// Closing twice is a no-op success.
    pub fn close_stream(&mut self) -> Result<(), Errno> {
        self.reconnect.stop();
        let result = self.stream.close();
        self.status = GamepadStatus::InvalidFile;
        result
    }

    /// Whether the background reconnection loop is currently running.
    pub fn is_reconnecting(&self) -> bool {
        self.reconnect.is_active()
    }
}

impl Drop for Gamepad {
    fn drop(&mut self) {
        self.reconnect.stop();
        if let Err(err) = self.stream.close() {
            tracing::error!("failed to close {}: {}", self.stream.path().display(), err);
        }
    }
}
