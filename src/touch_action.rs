//! Touch-action resolution.
//!
//! Touch-action is a two-bit flag set combined up the ancestor chain: a
//! child declaring `pan-x` under a parent declaring `pan-y` behaves as
//! `none`, because both axes end up claimed.

use bitflags::bitflags;

use crate::host::Dom;

bitflags! {
    /// Declared touch-action value of an element.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct TouchAction: u8 {
        const PAN_X = 0b01;
        const PAN_Y = 0b10;
        const NONE = 0b11;
    }
}

impl TouchAction {
    /// The default: the host handles all gestures itself.
    pub const AUTO: TouchAction = TouchAction::empty();

    /// Parses a declared attribute value.
    ///
    /// Tokens are whitespace-separated and OR-combined; unknown tokens and
    /// `auto` contribute nothing.
    pub fn from_attr(value: &str) -> TouchAction {
        let mut action = TouchAction::AUTO;
        for token in value.split_whitespace() {
            action |= match token {
                "pan-x" => TouchAction::PAN_X,
                "pan-y" => TouchAction::PAN_Y,
                "none" => TouchAction::NONE,
                _ => TouchAction::AUTO,
            };
        }
        action
    }
}

/// Resolves the effective touch-action of `element`.
///
/// Walks from `element` to the tree root, OR-ing in each declared value,
/// and stops early once the accumulated value reaches `NONE` — nothing an
/// outer ancestor declares can relax it again.
pub fn resolve_touch_action<D: Dom>(dom: &D, element: D::NodeId) -> TouchAction {
    let mut action = TouchAction::AUTO;
    let mut node = Some(element);
    while let Some(current) = node {
        action |= dom.touch_action(current);
        if action == TouchAction::NONE {
            break;
        }
        node = dom.parent(current);
    }
    action
}
