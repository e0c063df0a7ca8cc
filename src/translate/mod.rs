//! Mouse-to-pointer translation.
//!
//! [`PointerShim`] is the tracking context: it owns the capture tracker and
//! the scrollbar-absorption flag, registers the native listeners, and turns
//! each native mouse event into the corresponding synthetic pointer events.
//! One shim instance per independent tree (e.g. per iframe).

#[cfg(test)]
mod tests;

use log::{debug, warn};

use crate::capture::{CaptureTracker, PointerError};
use crate::event::{
    PointerEvent, PointerEventInit, PointerEventType, PointerType, create_pointer_event,
};
use crate::host::{Dom, NativeKind, NativeMouseEvent};
use crate::touch_action::{TouchAction, resolve_touch_action};

/// Pointer event translation context over one host tree.
pub struct PointerShim<D: Dom> {
    tracker: CaptureTracker<D::NodeId>,
    /// Set while the host owns the mouse stream for a scrollbar drag;
    /// cleared by the next mouseup.
    scrolling: bool,
    root: Option<D::NodeId>,
}

impl<D: Dom> Default for PointerShim<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Dom> PointerShim<D> {
    pub fn new() -> Self {
        Self {
            tracker: CaptureTracker::new(),
            scrolling: false,
            root: None,
        }
    }

    /// Subscribes the shim to native mouse events on `root`.
    ///
    /// The five translated kinds listen in the bubble phase; the click
    /// listener uses the capture phase so ghost clicks are absorbed before
    /// any application listener sees them.
    pub fn register_handlers(&mut self, dom: &mut D, root: D::NodeId) {
        for kind in NativeKind::TRANSLATED {
            dom.add_listener(root, kind, false);
        }
        dom.add_listener(root, NativeKind::Click, true);
        self.root = Some(root);
    }

    /// Removes the subscriptions added by [`PointerShim::register_handlers`].
    pub fn deregister_handlers(&mut self, dom: &mut D) {
        if let Some(root) = self.root.take() {
            for kind in NativeKind::TRANSLATED {
                dom.remove_listener(root, kind, false);
            }
            dom.remove_listener(root, NativeKind::Click, true);
        }
    }

    /// Requests pointer capture for `element`.
    ///
    /// See [`CaptureTracker::set_capture`] for the refusal and error rules.
    pub fn set_pointer_capture(
        &mut self,
        dom: &mut D,
        element: D::NodeId,
    ) -> Result<bool, PointerError> {
        self.tracker.set_capture(dom, element)
    }

    /// Releases pointer capture held by `element`.
    pub fn release_pointer_capture(
        &mut self,
        dom: &mut D,
        element: D::NodeId,
    ) -> Result<bool, PointerError> {
        self.tracker.release_capture(dom, element)
    }

    pub fn capture_target(&self) -> Option<D::NodeId> {
        self.tracker.capture_target()
    }

    pub fn is_scrolling(&self) -> bool {
        self.scrolling
    }

    /// Entry point for native events delivered by the host.
    pub fn handle_native(&mut self, dom: &mut D, event: &NativeMouseEvent<D::NodeId>) {
        match event.kind {
            NativeKind::MouseDown => self.on_mouse_down(dom, event),
            NativeKind::MouseMove => self.on_mouse_move(dom, event),
            NativeKind::MouseUp => self.on_mouse_up(dom, event),
            NativeKind::MouseOver => self.on_mouse_over(dom, event),
            NativeKind::MouseOut => self.on_mouse_out(dom, event),
            NativeKind::Click => {
                self.on_click(dom, event);
            }
        }
    }

    fn synthetic(
        &self,
        kind: PointerEventType,
        native: &NativeMouseEvent<D::NodeId>,
    ) -> PointerEvent<D::NodeId> {
        create_pointer_event(
            kind,
            PointerType::Mouse,
            native,
            PointerEventInit::default(),
            self.tracker.has_capture(),
        )
    }

    fn on_mouse_down(&mut self, dom: &mut D, ev: &NativeMouseEvent<D::NodeId>) {
        self.tracker.update(ev);
        let down = self.synthetic(PointerEventType::Down, ev);
        dom.dispatch(ev.target, &down);

        let on_scrollable = ev
            .target
            .is_some_and(|target| dom.overflow(target).scrollable());
        if on_scrollable {
            // The host is about to hijack the stream for a scrollbar drag;
            // cancel the pointer and absorb events until the next mouseup.
            debug!("mousedown on scrollable element, cancelling pointer stream");
            self.scrolling = true;
            let cancel = self.synthetic(PointerEventType::Cancel, ev);
            dom.dispatch(ev.target, &cancel);
        }
    }

    fn on_mouse_move(&mut self, dom: &mut D, ev: &NativeMouseEvent<D::NodeId>) {
        if self.scrolling {
            return;
        }
        let target = self.tracker.identify_target(ev.target);
        let event = self.synthetic(PointerEventType::Move, ev);
        dom.dispatch(target, &event);
        self.tracker.update(ev);
    }

    fn on_mouse_up(&mut self, dom: &mut D, ev: &NativeMouseEvent<D::NodeId>) {
        if self.scrolling {
            self.scrolling = false;
            return;
        }
        let target = self.tracker.identify_target(ev.target);
        let up = self.synthetic(PointerEventType::Up, ev);
        dom.dispatch(target, &up);

        if self.tracker.has_capture() {
            if let Err(err) = self.tracker.release_implicit(dom) {
                warn!("implicit capture release failed: {err}");
            }
        }
        self.tracker.update(ev);
    }

    fn on_mouse_over(&mut self, dom: &mut D, ev: &NativeMouseEvent<D::NodeId>) {
        // Capture suppresses all boundary events.
        if self.scrolling || self.tracker.has_capture() {
            return;
        }
        let over = self.synthetic(PointerEventType::Over, ev);
        dom.dispatch(ev.target, &over);

        // Enter fires outermost-first, ending at the target itself.
        let chain = boundary_chain(dom, ev.target, ev.related_target);
        for node in chain.iter().rev() {
            let enter = self.synthetic(PointerEventType::Enter, ev);
            dom.dispatch(Some(*node), &enter);
        }
        self.tracker.update(ev);
    }

    fn on_mouse_out(&mut self, dom: &mut D, ev: &NativeMouseEvent<D::NodeId>) {
        if self.scrolling || self.tracker.has_capture() {
            return;
        }
        if ev.related_target.is_some() {
            let out = self.synthetic(PointerEventType::Out, ev);
            dom.dispatch(ev.target, &out);

            // Leave fires leaf-first, up to (excluding) the common ancestor.
            for node in boundary_chain(dom, ev.target, ev.related_target) {
                let leave = self.synthetic(PointerEventType::Leave, ev);
                dom.dispatch(Some(node), &leave);
            }
        }
        self.tracker.update(ev);
    }

    /// Absorbs the browser's ghost click after a touch interaction.
    ///
    /// Suppression applies only when the environment supports touch, the
    /// click came from the host (not from this shim), and the target's
    /// resolved touch-action is not AUTO — in that case an equivalent
    /// pointer-based activation already happened. Returns whether the click
    /// was absorbed.
    fn on_click(&mut self, dom: &mut D, ev: &NativeMouseEvent<D::NodeId>) -> bool {
        if !dom.touch_supported() || ev.synthetic {
            return false;
        }
        let Some(target) = ev.target else {
            return false;
        };
        if resolve_touch_action(dom, target) == TouchAction::AUTO {
            return false;
        }
        debug!("absorbing ghost click at {target:?}");
        ev.handle.prevent_default();
        ev.handle.stop_immediate_propagation();
        true
    }
}

/// Collects the enter/leave dispatch chain.
///
/// Starts at `target` and walks parents, stopping at the related target, at
/// any ancestor of it (the lowest common ancestor and everything above), or
/// at the root. Empty when either side is missing. The returned order is
/// target-to-root; leave dispatch uses it as-is, enter dispatch reversed.
fn boundary_chain<D: Dom>(
    dom: &D,
    target: Option<D::NodeId>,
    related: Option<D::NodeId>,
) -> Vec<D::NodeId> {
    let (Some(target), Some(related)) = (target, related) else {
        return Vec::new();
    };
    let mut chain = Vec::new();
    let mut node = Some(target);
    while let Some(current) = node {
        if current == related || dom.contains(current, related) {
            break;
        }
        chain.push(current);
        node = dom.parent(current);
    }
    chain
}
