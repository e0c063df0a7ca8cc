//! In-memory host tree.
//!
//! Backs the replay binary and the test suite. Nodes live in an arena and
//! are addressed by index handles; every synthetic dispatch is recorded in
//! a log instead of running listener callbacks.

use log::trace;

use super::{Dom, NativeKind, Overflow};
use crate::event::{PointerEvent, PointerEventType};
use crate::touch_action::TouchAction;

/// Arena handle of a node in a [`MemoryDom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug)]
struct Node {
    name: String,
    parent: Option<NodeId>,
    overflow: Overflow,
    touch_action: TouchAction,
}

/// One recorded synthetic dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchRecord {
    pub target: NodeId,
    pub kind: PointerEventType,
    pub bubbles: bool,
    pub related_target: Option<NodeId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Listener {
    target: NodeId,
    kind: NativeKind,
    use_capture: bool,
}

/// Host tree holding nodes, listener bookkeeping and the dispatch log.
#[derive(Debug, Default)]
pub struct MemoryDom {
    nodes: Vec<Node>,
    listeners: Vec<Listener>,
    touch_supported: bool,
    log: Vec<DispatchRecord>,
}

impl MemoryDom {
    pub fn new() -> Self {
        Self::default()
    }

    /// A tree whose environment reports touch support (ghost clicks can
    /// occur).
    pub fn with_touch_support() -> Self {
        Self {
            touch_supported: true,
            ..Self::default()
        }
    }

    /// Adds a node under `parent` (or as a root) and returns its handle.
    pub fn create_node(&mut self, name: &str, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            name: name.to_string(),
            parent,
            overflow: Overflow::default(),
            touch_action: TouchAction::AUTO,
        });
        id
    }

    pub fn set_overflow(&mut self, node: NodeId, overflow: Overflow) {
        self.nodes[node.0].overflow = overflow;
    }

    pub fn set_touch_action(&mut self, node: NodeId, action: TouchAction) {
        self.nodes[node.0].touch_action = action;
    }

    pub fn node_name(&self, node: NodeId) -> &str {
        &self.nodes[node.0].name
    }

    /// Looks a node up by name; names are expected to be unique in test
    /// trees and replay scripts.
    pub fn find_node(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|node| node.name == name)
            .map(NodeId)
    }

    pub fn dispatch_log(&self) -> &[DispatchRecord] {
        &self.log
    }

    pub fn take_log(&mut self) -> Vec<DispatchRecord> {
        std::mem::take(&mut self.log)
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn has_listener(&self, target: NodeId, kind: NativeKind, use_capture: bool) -> bool {
        self.listeners.contains(&Listener {
            target,
            kind,
            use_capture,
        })
    }
}

impl Dom for MemoryDom {
    type NodeId = NodeId;

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.parent(node);
        while let Some(candidate) = current {
            if candidate == ancestor {
                return true;
            }
            current = self.parent(candidate);
        }
        false
    }

    fn overflow(&self, node: NodeId) -> Overflow {
        self.nodes[node.0].overflow
    }

    fn touch_action(&self, node: NodeId) -> TouchAction {
        self.nodes[node.0].touch_action
    }

    fn touch_supported(&self) -> bool {
        self.touch_supported
    }

    fn dispatch(&mut self, target: Option<NodeId>, event: &PointerEvent<NodeId>) -> bool {
        let Some(target) = target else {
            // Pointer left the document; nothing to deliver to.
            return false;
        };
        trace!(
            "dispatch {} at {}",
            event.kind.as_str(),
            self.node_name(target)
        );
        self.log.push(DispatchRecord {
            target,
            kind: event.kind,
            bubbles: event.bubbles,
            related_target: event.related_target,
        });
        !event.default_prevented()
    }

    fn add_listener(&mut self, target: NodeId, kind: NativeKind, use_capture: bool) {
        let listener = Listener {
            target,
            kind,
            use_capture,
        };
        if !self.listeners.contains(&listener) {
            self.listeners.push(listener);
        }
    }

    fn remove_listener(&mut self, target: NodeId, kind: NativeKind, use_capture: bool) {
        self.listeners.retain(|existing| {
            *existing
                != Listener {
                    target,
                    kind,
                    use_capture,
                }
        });
    }
}
