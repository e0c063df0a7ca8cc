//! Construction of synthetic pointer events from native mouse events.
//!
//! Normalizes the legacy `button`/`buttons`/`which` trio, fills in the
//! pointer-specific fields, and wires cancellation forwarding back to the
//! originating native event.

use super::{PointerEvent, PointerEventType, PointerType};
use crate::host::{NativeHandle, NativeKind, NativeMouseEvent};

/// Derives a `buttons` bit set from a legacy `which` value.
///
/// Mapping: 0 → none, 1 → left (1), 2 → right (4), 3 → middle (2), and
/// higher values map to `2^(which-1)`, saturating to 0 once the bit falls
/// outside the 16-bit `buttons` field.
pub fn which_to_buttons(which: u32) -> u16 {
    match which {
        0 => 0,
        1 => 1,
        2 => 4,
        3 => 2,
        n => 1u16.checked_shl(n - 1).unwrap_or(0),
    }
}

/// Explicit override set for synthetic event construction.
///
/// Every recognized field is enumerated with its default; callers override
/// only what they need. The defaults describe a primary mouse pointer.
#[derive(Debug, Clone)]
pub struct PointerEventInit<N> {
    /// Pointer identifier; the mouse pointer is always 1.
    pub pointer_id: i32,
    pub is_primary: bool,
    pub tilt_x: i32,
    pub tilt_y: i32,
    pub width: f64,
    pub height: f64,
    /// Overrides the derived pressure (`0.5` while any button is down).
    pub pressure: Option<f32>,
    /// Overrides the related target copied from the native event.
    pub related_target: Option<N>,
}

impl<N> Default for PointerEventInit<N> {
    fn default() -> Self {
        Self {
            pointer_id: 1,
            is_primary: true,
            tilt_x: 0,
            tilt_y: 0,
            width: 0.0,
            height: 0.0,
            pressure: None,
            related_target: None,
        }
    }
}

/// Builds a synthetic pointer event from a native mouse event.
///
/// Screen/client coordinates and modifiers are copied verbatim. `buttons`
/// falls back through [`which_to_buttons`] when the engine omitted it, and
/// `button` is forced to 0 for native move/up events, which carry no
/// "this button" semantics. While `capture_held`, the related target is
/// hidden so listeners never observe cross-element transitions.
///
/// Cancelling the returned event forwards to the native event's handle,
/// except for capture lifecycle events, which have no native default action.
pub fn create_pointer_event<N: Copy>(
    kind: PointerEventType,
    pointer_type: PointerType,
    native: &NativeMouseEvent<N>,
    init: PointerEventInit<N>,
    capture_held: bool,
) -> PointerEvent<N> {
    let buttons = native.pressed_buttons();
    let button = match native.kind {
        NativeKind::MouseMove | NativeKind::MouseUp => 0,
        _ => native.button,
    };
    let related_target = if capture_held {
        None
    } else {
        init.related_target.or(native.related_target)
    };
    let handle = if kind.is_capture_lifecycle() {
        NativeHandle::new()
    } else {
        native.handle.clone()
    };

    PointerEvent {
        kind,
        pointer_id: init.pointer_id,
        pointer_type,
        is_primary: init.is_primary,
        pressure: init
            .pressure
            .unwrap_or(if buttons != 0 { 0.5 } else { 0.0 }),
        tilt_x: init.tilt_x,
        tilt_y: init.tilt_y,
        width: init.width,
        height: init.height,
        screen_x: native.screen_x,
        screen_y: native.screen_y,
        client_x: native.client_x,
        client_y: native.client_y,
        button,
        buttons,
        which: (button + 1) as u32,
        modifiers: native.modifiers,
        related_target,
        bubbles: kind.bubbles(),
        cancelable: kind.cancelable(),
        handle,
    }
}
