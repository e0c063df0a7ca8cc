//! Synthetic pointer event model.
//!
//! [`PointerEvent`] is the normalized event record the shim dispatches in
//! place of raw mouse events. Instances are built by [`factory`] and are
//! immutable once constructed; cancellation goes through the shared
//! [`NativeHandle`](crate::host::NativeHandle) capability.

pub mod factory;

use crate::host::{Modifiers, NativeHandle};

pub use factory::{PointerEventInit, create_pointer_event, which_to_buttons};

/// Synthetic event types emitted by the shim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEventType {
    Down,
    Up,
    Move,
    Over,
    Out,
    Enter,
    Leave,
    Cancel,
    GotCapture,
    LostCapture,
}

impl PointerEventType {
    /// Whether events of this type bubble. Enter/leave pairs are delivered
    /// per ancestor and must not bubble on their own.
    pub fn bubbles(&self) -> bool {
        !matches!(self, PointerEventType::Enter | PointerEventType::Leave)
    }

    /// Whether events of this type may be cancelled by listeners.
    pub fn cancelable(&self) -> bool {
        matches!(
            self,
            PointerEventType::Down
                | PointerEventType::Up
                | PointerEventType::Move
                | PointerEventType::Over
                | PointerEventType::Out
        )
    }

    /// Capture lifecycle events have no native default action to forward
    /// cancellation to.
    pub fn is_capture_lifecycle(&self) -> bool {
        matches!(
            self,
            PointerEventType::GotCapture | PointerEventType::LostCapture
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PointerEventType::Down => "pointerdown",
            PointerEventType::Up => "pointerup",
            PointerEventType::Move => "pointermove",
            PointerEventType::Over => "pointerover",
            PointerEventType::Out => "pointerout",
            PointerEventType::Enter => "pointerenter",
            PointerEventType::Leave => "pointerleave",
            PointerEventType::Cancel => "pointercancel",
            PointerEventType::GotCapture => "gotpointercapture",
            PointerEventType::LostCapture => "lostpointercapture",
        }
    }
}

/// Input device class behind a pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerType {
    #[default]
    Mouse,
    Touch,
    Pen,
}

impl PointerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PointerType::Mouse => "mouse",
            PointerType::Touch => "touch",
            PointerType::Pen => "pen",
        }
    }
}

/// A normalized pointer event.
///
/// Carries the pointer-specific fields on top of the standard mouse fields
/// copied from the originating native event. Created per dispatch and not
/// mutated afterwards.
#[derive(Debug, Clone)]
pub struct PointerEvent<N> {
    pub kind: PointerEventType,
    pub pointer_id: i32,
    pub pointer_type: PointerType,
    pub is_primary: bool,
    pub pressure: f32,
    pub tilt_x: i32,
    pub tilt_y: i32,
    pub width: f64,
    pub height: f64,
    pub screen_x: f64,
    pub screen_y: f64,
    pub client_x: f64,
    pub client_y: f64,
    pub button: i16,
    pub buttons: u16,
    pub which: u32,
    pub modifiers: Modifiers,
    pub related_target: Option<N>,
    pub bubbles: bool,
    pub cancelable: bool,
    pub(crate) handle: NativeHandle,
}

impl<N> PointerEvent<N> {
    /// Cancels the default action; forwarded to the originating native
    /// event unless this is a capture lifecycle event.
    pub fn prevent_default(&self) {
        self.handle.prevent_default();
    }

    pub fn stop_propagation(&self) {
        self.handle.stop_propagation();
    }

    pub fn stop_immediate_propagation(&self) {
        self.handle.stop_immediate_propagation();
    }

    pub fn default_prevented(&self) -> bool {
        self.handle.default_prevented()
    }
}
