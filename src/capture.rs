//! Implicit pointer capture tracking.
//!
//! One process-wide slot per tracking context: the last observed native
//! event plus the element currently holding capture. Capture can only be
//! taken while a button is down and is released implicitly on mouseup.

use log::debug;
use thiserror::Error;

use crate::event::{PointerEventInit, PointerEventType, PointerType, create_pointer_event};
use crate::host::{Dom, NativeMouseEvent};

/// Errors raised by capture operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PointerError {
    /// A capture operation was attempted before any native pointer
    /// activity was observed.
    #[error("InvalidPointerId: no pointer activity observed yet")]
    InvalidPointerId,
}

/// Tracks the last native event and the element holding pointer capture.
///
/// Refusals (no button down, release by a non-owner) are `Ok(false)`;
/// only operating on a pointer that was never observed is an error.
#[derive(Debug)]
pub struct CaptureTracker<N> {
    last_native: Option<NativeMouseEvent<N>>,
    capture_target: Option<N>,
}

impl<N: Copy + Eq + std::fmt::Debug> Default for CaptureTracker<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: Copy + Eq + std::fmt::Debug> CaptureTracker<N> {
    pub fn new() -> Self {
        Self {
            last_native: None,
            capture_target: None,
        }
    }

    /// Records a handled native event. Called on every translated event.
    pub fn update(&mut self, native: &NativeMouseEvent<N>) {
        self.last_native = Some(native.clone());
    }

    /// Element currently holding capture, if any.
    pub fn capture_target(&self) -> Option<N> {
        self.capture_target
    }

    pub fn has_capture(&self) -> bool {
        self.capture_target.is_some()
    }

    /// Effective dispatch target: the capturing element when capture is
    /// held, the fallback otherwise.
    pub fn identify_target(&self, fallback: Option<N>) -> Option<N> {
        self.capture_target.or(fallback)
    }

    /// Grants capture to `target`.
    ///
    /// Requires that a native event has been observed and that at least one
    /// button is currently pressed; the latter refusal is `Ok(false)`. On
    /// success a `gotpointercapture` event fires at the observed event's
    /// target (not necessarily `target`).
    pub fn set_capture<D>(&mut self, dom: &mut D, target: N) -> Result<bool, PointerError>
    where
        D: Dom<NodeId = N>,
    {
        let native = self
            .last_native
            .clone()
            .ok_or(PointerError::InvalidPointerId)?;
        if native.pressed_buttons() == 0 {
            debug!("capture refused: no button pressed");
            return Ok(false);
        }

        self.capture_target = Some(target);
        debug!("capture granted to {target:?}");
        let event = create_pointer_event(
            PointerEventType::GotCapture,
            PointerType::Mouse,
            &native,
            PointerEventInit::default(),
            false,
        );
        dom.dispatch(native.target, &event);
        Ok(true)
    }

    /// Releases capture at `target`'s request.
    ///
    /// Refused with `Ok(false)` when `target` is not the current holder
    /// (including when no capture is held at all).
    pub fn release_capture<D>(&mut self, dom: &mut D, target: N) -> Result<bool, PointerError>
    where
        D: Dom<NodeId = N>,
    {
        if self.last_native.is_none() {
            return Err(PointerError::InvalidPointerId);
        }
        if self.capture_target != Some(target) {
            debug!("capture release refused: {target:?} is not the holder");
            return Ok(false);
        }
        self.dispatch_lost(dom);
        Ok(true)
    }

    /// Unconditional release on mouseup.
    pub fn release_implicit<D>(&mut self, dom: &mut D) -> Result<bool, PointerError>
    where
        D: Dom<NodeId = N>,
    {
        if self.last_native.is_none() {
            return Err(PointerError::InvalidPointerId);
        }
        self.dispatch_lost(dom);
        Ok(true)
    }

    fn dispatch_lost<D>(&mut self, dom: &mut D)
    where
        D: Dom<NodeId = N>,
    {
        let Some(held) = self.capture_target.take() else {
            return;
        };
        debug!("capture released from {held:?}");
        // last_native is always present here: capture cannot be granted
        // before an event is observed.
        if let Some(native) = self.last_native.as_ref() {
            let event = create_pointer_event(
                PointerEventType::LostCapture,
                PointerType::Mouse,
                native,
                PointerEventInit::default(),
                false,
            );
            dom.dispatch(Some(held), &event);
        }
    }
}
