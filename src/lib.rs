//! Pointer Events compatibility shim.
//!
//! Translates native mouse events delivered by a host document tree into a
//! normalized pointer event stream: button/which normalization, implicit
//! pointer capture, enter/leave ancestor walks, scrollbar-drag absorption
//! and ghost-click disambiguation. The host is abstracted behind the
//! [`host::Dom`] trait; an in-memory implementation backs the tests and the
//! replay binary.

pub mod capture;
pub mod event;
pub mod host;
pub mod script;
pub mod touch_action;
pub mod translate;

pub use capture::{CaptureTracker, PointerError};
pub use event::{PointerEvent, PointerEventInit, PointerEventType, PointerType};
pub use host::{Dom, Modifiers, NativeHandle, NativeKind, NativeMouseEvent, Overflow};
pub use touch_action::{TouchAction, resolve_touch_action};
pub use translate::PointerShim;
