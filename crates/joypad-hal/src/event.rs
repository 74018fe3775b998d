//! Joystick event decoding and state tracking
//!
//! The kernel joystick interface emits fixed 8-byte records, little-endian:
//! a millisecond timestamp (`u32`), the new value (`i16`), an event type tag
//! (`u8`, 1 = button, 2 = axis) and the axis/button number (`u8`). Events are
//! decoded one record at a time and folded into a last-value-wins snapshot.

/// Size in bytes of one wire record.
pub const EVENT_SIZE: usize = 8;

/// Number of tracked axes.
pub const AXIS_COUNT: usize = 6;

/// Number of tracked buttons.
pub const BUTTON_COUNT: usize = 15;

/// What a record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Button,
    Axis,
    /// Any other type tag. Decoded but never applied to state.
    Unknown,
}

impl EventKind {
    fn from_raw(raw: u8) -> Self {
        match raw {
            1 => EventKind::Button,
            2 => EventKind::Axis,
            _ => EventKind::Unknown,
        }
    }
}

/// One decoded joystick event.
#[derive(Debug, Clone, Copy)]
pub struct JsEvent {
    /// Event timestamp in milliseconds
    pub timestamp_ms: u32,
    /// New axis position or button state
    pub value: i16,
    pub kind: EventKind,
    /// Axis or button number
    pub number: u8,
}

impl JsEvent {
    /// Decode exactly one wire record.
    ///
    /// The caller drives the read loop in whole records, so short input
    /// never reaches this point.
    pub fn decode(bytes: &[u8; EVENT_SIZE]) -> Self {
        Self {
            timestamp_ms: u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            value: i16::from_le_bytes([bytes[4], bytes[5]]),
            kind: EventKind::from_raw(bytes[6]),
            number: bytes[7],
        }
    }
}

/// Last-seen value for every axis and button, all zero until an event
/// reports otherwise.
#[derive(Debug, Clone, Default)]
pub struct PadState {
    axes: [i16; AXIS_COUNT],
    buttons: [i16; BUTTON_COUNT],
}

impl PadState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one event into the snapshot.
    ///
    /// Protocol indices are bounded by the device class, so an index at or
    /// beyond capacity is dropped silently rather than treated as an error.
    pub fn apply(&mut self, event: &JsEvent) {
        let slot = event.number as usize;
        match event.kind {
            EventKind::Button if slot < BUTTON_COUNT => self.buttons[slot] = event.value,
            EventKind::Axis if slot < AXIS_COUNT => self.axes[slot] = event.value,
            _ => {}
        }
    }

    /// Last-seen value of an axis; 0 for any out-of-range index.
    pub fn axis(&self, index: i32) -> i16 {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.axes.get(i).copied())
            .unwrap_or(0)
    }

    /// Last-seen value of a button; 0 for any out-of-range index.
    pub fn button(&self, index: i32) -> i16 {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.buttons.get(i).copied())
            .unwrap_or(0)
    }
}
