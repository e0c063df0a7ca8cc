//! Host environment boundary.
//!
//! The shim never owns a document tree; it drives one through the [`Dom`]
//! trait. A production embedding backs this with real DOM bindings, while
//! tests and the replay binary use the in-memory tree from [`memory`].

pub mod memory;

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::event::PointerEvent;
use crate::event::factory::which_to_buttons;
use crate::touch_action::TouchAction;

/// Host document abstraction the shim operates against.
///
/// Nodes are opaque copyable handles; all structure queries go through the
/// host. Dispatching to a `None` target is a no-op returning `false`, which
/// models the pointer leaving the viewport.
pub trait Dom {
    /// Opaque node handle.
    type NodeId: Copy + Eq + fmt::Debug;

    /// Returns the parent of `node`, or `None` at the tree root.
    fn parent(&self, node: Self::NodeId) -> Option<Self::NodeId>;

    /// Returns true if `ancestor` is a strict DOM-tree ancestor of `node`.
    fn contains(&self, ancestor: Self::NodeId, node: Self::NodeId) -> bool;

    /// Computed `overflow` style of `node` (scrollbar-drag heuristic).
    fn overflow(&self, node: Self::NodeId) -> Overflow;

    /// Touch-action value declared directly on `node` (AUTO when unset).
    fn touch_action(&self, node: Self::NodeId) -> TouchAction;

    /// Whether the environment delivers touch events at all.
    fn touch_supported(&self) -> bool;

    /// Dispatches a synthetic event, returning whether the default action
    /// should proceed. A `None` target returns `false` without error.
    fn dispatch(
        &mut self,
        target: Option<Self::NodeId>,
        event: &PointerEvent<Self::NodeId>,
    ) -> bool;

    /// Subscribes the shim to a native event kind on `target`.
    fn add_listener(&mut self, target: Self::NodeId, kind: NativeKind, use_capture: bool);

    /// Removes a subscription previously added with [`Dom::add_listener`].
    fn remove_listener(&mut self, target: Self::NodeId, kind: NativeKind, use_capture: bool);
}

/// Native mouse event kinds the shim translates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeKind {
    MouseDown,
    MouseMove,
    MouseUp,
    MouseOver,
    MouseOut,
    /// Browser-level click, only inspected for ghost-click absorption.
    Click,
}

impl NativeKind {
    /// Kinds handled with bubble-phase listeners on the registration root.
    pub const TRANSLATED: [NativeKind; 5] = [
        NativeKind::MouseDown,
        NativeKind::MouseMove,
        NativeKind::MouseUp,
        NativeKind::MouseOver,
        NativeKind::MouseOut,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NativeKind::MouseDown => "mousedown",
            NativeKind::MouseMove => "mousemove",
            NativeKind::MouseUp => "mouseup",
            NativeKind::MouseOver => "mouseover",
            NativeKind::MouseOut => "mouseout",
            NativeKind::Click => "click",
        }
    }
}

/// Computed `overflow` style values relevant to the scrollbar heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overflow {
    #[default]
    Visible,
    Hidden,
    Auto,
    Scroll,
}

impl Overflow {
    /// True when a mousedown on the element may turn into a native
    /// scrollbar drag that hijacks subsequent mouse events.
    pub fn scrollable(&self) -> bool {
        matches!(self, Overflow::Auto | Overflow::Scroll)
    }
}

/// Keyboard modifier state carried on a native mouse event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

#[derive(Debug, Default)]
struct HandleFlags {
    default_prevented: Cell<bool>,
    propagation_stopped: Cell<bool>,
    immediate_stopped: Cell<bool>,
}

/// Cancellation capability of a native event.
///
/// Clones share state, so a synthetic event holding a clone of the native
/// handle forwards `prevent_default` and friends back to the native event —
/// cancelling the synthetic event actually suppresses the browser default
/// (e.g. scrolling).
#[derive(Debug, Clone, Default)]
pub struct NativeHandle(Rc<HandleFlags>);

impl NativeHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prevent_default(&self) {
        self.0.default_prevented.set(true);
    }

    pub fn stop_propagation(&self) {
        self.0.propagation_stopped.set(true);
    }

    pub fn stop_immediate_propagation(&self) {
        self.0.propagation_stopped.set(true);
        self.0.immediate_stopped.set(true);
    }

    pub fn default_prevented(&self) -> bool {
        self.0.default_prevented.get()
    }

    pub fn propagation_stopped(&self) -> bool {
        self.0.propagation_stopped.get()
    }

    pub fn immediate_propagation_stopped(&self) -> bool {
        self.0.immediate_stopped.get()
    }
}

/// A native mouse event as delivered by the host.
///
/// Field semantics follow the MouseEvent interface; `buttons` is optional
/// because older engines omit it, in which case it is derived from `which`.
#[derive(Debug, Clone)]
pub struct NativeMouseEvent<N> {
    pub kind: NativeKind,
    /// Element the event fired at; `None` when the pointer left the viewport.
    pub target: Option<N>,
    /// Element the pointer came from / moved to (over/out only).
    pub related_target: Option<N>,
    pub screen_x: f64,
    pub screen_y: f64,
    pub client_x: f64,
    pub client_y: f64,
    /// Button that changed state (down events only carry meaning here).
    pub button: i16,
    /// Currently pressed button set, when the engine supplies it.
    pub buttons: Option<u16>,
    /// Legacy 1-based button indicator.
    pub which: u32,
    pub modifiers: Modifiers,
    /// True when this event was synthesized by the shim itself rather than
    /// produced by the host (used for ghost-click disambiguation).
    pub synthetic: bool,
    pub handle: NativeHandle,
}

impl<N> NativeMouseEvent<N> {
    /// Creates an event with neutral coordinates, no buttons and no
    /// modifiers; callers fill in the fields they care about.
    pub fn new(kind: NativeKind, target: Option<N>) -> Self {
        Self {
            kind,
            target,
            related_target: None,
            screen_x: 0.0,
            screen_y: 0.0,
            client_x: 0.0,
            client_y: 0.0,
            button: 0,
            buttons: None,
            which: 0,
            modifiers: Modifiers::default(),
            synthetic: false,
            handle: NativeHandle::new(),
        }
    }

    /// Effective pressed-button set, deriving from `which` when the engine
    /// did not supply `buttons`.
    pub fn pressed_buttons(&self) -> u16 {
        self.buttons.unwrap_or_else(|| which_to_buttons(self.which))
    }
}
