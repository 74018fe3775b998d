//! Userspace driver for Linux joystick devices
//!
//! Reads the kernel joystick interface (`/dev/input/jsN`), keeps a live
//! snapshot of axis and button state, and reopens the device in the
//! background when it drops out. All device access is non-blocking, so a
//! caller can poll [`Gamepad::refresh`] at its own cadence without ever
//! stalling.
//!
//! # Example
//!
//! ```no_run
//! use joypad_hal::Gamepad;
//!
//! let mut pad = Gamepad::from_path("/dev/input/js0");
//! loop {
//!     pad.refresh();
//!     if pad.button(0) != 0 {
//!         println!("button 0 held, axis 0 at {}", pad.axis(0));
//!     }
//! }
//! ```

pub mod event;
pub mod gamepad;
pub mod reconnect;
pub mod status;
pub mod stream;

pub use event::{EventKind, JsEvent, PadState, AXIS_COUNT, BUTTON_COUNT, EVENT_SIZE};
pub use gamepad::Gamepad;
pub use reconnect::{Reconnector, RETRY_INTERVAL};
pub use status::GamepadStatus;
pub use stream::DeviceStream;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("joystick index {0} out of range, device nodes run js0 through js9")]
    InvalidIndex(u8),
}

/// Driver result type
pub type Result<T> = std::result::Result<T, DriverError>;
