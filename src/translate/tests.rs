use super::*;
use crate::host::memory::{MemoryDom, NodeId};
use crate::host::{NativeKind, NativeMouseEvent, Overflow};
use crate::touch_action::TouchAction;

fn down_event(target: NodeId) -> NativeMouseEvent<NodeId> {
    let mut ev = NativeMouseEvent::new(NativeKind::MouseDown, Some(target));
    ev.buttons = Some(1);
    ev.which = 1;
    ev
}

fn move_event(target: NodeId) -> NativeMouseEvent<NodeId> {
    let mut ev = NativeMouseEvent::new(NativeKind::MouseMove, Some(target));
    ev.buttons = Some(1);
    ev
}

fn up_event(target: NodeId) -> NativeMouseEvent<NodeId> {
    let mut ev = NativeMouseEvent::new(NativeKind::MouseUp, Some(target));
    ev.buttons = Some(0);
    ev
}

fn boundary_event(
    kind: NativeKind,
    target: NodeId,
    related: Option<NodeId>,
) -> NativeMouseEvent<NodeId> {
    let mut ev = NativeMouseEvent::new(kind, Some(target));
    ev.related_target = related;
    ev
}

fn kinds(dom: &MemoryDom) -> Vec<PointerEventType> {
    dom.dispatch_log().iter().map(|record| record.kind).collect()
}

fn dispatches(dom: &MemoryDom) -> Vec<(PointerEventType, NodeId)> {
    dom.dispatch_log()
        .iter()
        .map(|record| (record.kind, record.target))
        .collect()
}

#[test]
fn mousedown_dispatches_pointerdown_at_the_native_target() {
    let mut dom = MemoryDom::new();
    let node = dom.create_node("node", None);
    let mut shim = PointerShim::new();

    shim.handle_native(&mut dom, &down_event(node));
    assert_eq!(dispatches(&dom), vec![(PointerEventType::Down, node)]);
}

#[test]
fn scrollable_mousedown_cancels_and_absorbs_until_mouseup() {
    let mut dom = MemoryDom::new();
    let pane = dom.create_node("pane", None);
    dom.set_overflow(pane, Overflow::Scroll);
    let mut shim = PointerShim::new();

    shim.handle_native(&mut dom, &down_event(pane));
    assert_eq!(
        kinds(&dom),
        vec![PointerEventType::Down, PointerEventType::Cancel]
    );
    assert!(shim.is_scrolling());
    dom.clear_log();

    // Moves are absorbed while the host drags the scrollbar.
    shim.handle_native(&mut dom, &move_event(pane));
    assert!(dom.dispatch_log().is_empty());

    // The mouseup only clears the flag; no pointerup is synthesized.
    shim.handle_native(&mut dom, &up_event(pane));
    assert!(dom.dispatch_log().is_empty());
    assert!(!shim.is_scrolling());

    // The next gesture translates normally again.
    shim.handle_native(&mut dom, &move_event(pane));
    assert_eq!(kinds(&dom), vec![PointerEventType::Move]);
}

#[test]
fn overflow_auto_also_triggers_the_scrollbar_heuristic() {
    let mut dom = MemoryDom::new();
    let pane = dom.create_node("pane", None);
    dom.set_overflow(pane, Overflow::Auto);
    let mut shim = PointerShim::new();

    shim.handle_native(&mut dom, &down_event(pane));
    assert_eq!(
        kinds(&dom),
        vec![PointerEventType::Down, PointerEventType::Cancel]
    );
}

#[test]
fn moves_are_redirected_to_the_capturing_element() {
    let mut dom = MemoryDom::new();
    let pressed = dom.create_node("pressed", None);
    let captor = dom.create_node("captor", None);
    let elsewhere = dom.create_node("elsewhere", None);
    let mut shim = PointerShim::new();

    shim.handle_native(&mut dom, &down_event(pressed));
    assert_eq!(shim.set_pointer_capture(&mut dom, captor), Ok(true));
    dom.clear_log();

    shim.handle_native(&mut dom, &move_event(elsewhere));
    assert_eq!(dispatches(&dom), vec![(PointerEventType::Move, captor)]);
}

#[test]
fn capture_suppresses_boundary_events() {
    let mut dom = MemoryDom::new();
    let root = dom.create_node("root", None);
    let a = dom.create_node("a", Some(root));
    let b = dom.create_node("b", Some(root));
    let mut shim = PointerShim::new();

    shim.handle_native(&mut dom, &down_event(a));
    shim.set_pointer_capture(&mut dom, a).unwrap();
    dom.clear_log();

    shim.handle_native(&mut dom, &boundary_event(NativeKind::MouseOut, a, Some(b)));
    shim.handle_native(&mut dom, &boundary_event(NativeKind::MouseOver, b, Some(a)));
    assert!(dom.dispatch_log().is_empty());
}

#[test]
fn mouseup_implicitly_releases_capture() {
    let mut dom = MemoryDom::new();
    let node = dom.create_node("node", None);
    let mut shim = PointerShim::new();

    shim.handle_native(&mut dom, &down_event(node));
    shim.set_pointer_capture(&mut dom, node).unwrap();
    dom.clear_log();

    shim.handle_native(&mut dom, &up_event(node));
    assert_eq!(
        dispatches(&dom),
        vec![
            (PointerEventType::Up, node),
            (PointerEventType::LostCapture, node),
        ]
    );
    assert_eq!(shim.capture_target(), None);
}

#[test]
fn pointerup_goes_to_the_captor_not_the_cursor_position() {
    let mut dom = MemoryDom::new();
    let captor = dom.create_node("captor", None);
    let elsewhere = dom.create_node("elsewhere", None);
    let mut shim = PointerShim::new();

    shim.handle_native(&mut dom, &down_event(captor));
    shim.set_pointer_capture(&mut dom, captor).unwrap();
    dom.clear_log();

    shim.handle_native(&mut dom, &up_event(elsewhere));
    assert_eq!(dom.dispatch_log()[0].target, captor);
}

/// Tree used by the boundary-walk tests:
///
/// ```text
/// root
/// └── lca
///     ├── a1 ── a2 ── a3   (pointer side)
///     └── b                (related side)
/// ```
fn boundary_tree(dom: &mut MemoryDom) -> (NodeId, NodeId, NodeId, NodeId, NodeId) {
    let root = dom.create_node("root", None);
    let lca = dom.create_node("lca", Some(root));
    let a1 = dom.create_node("a1", Some(lca));
    let a2 = dom.create_node("a2", Some(a1));
    let a3 = dom.create_node("a3", Some(a2));
    let b = dom.create_node("b", Some(lca));
    (lca, a1, a2, a3, b)
}

#[test]
fn leave_walk_stops_below_the_common_ancestor_leaf_first() {
    let mut dom = MemoryDom::new();
    let (_lca, a1, a2, a3, b) = boundary_tree(&mut dom);
    let mut shim = PointerShim::new();

    shim.handle_native(&mut dom, &boundary_event(NativeKind::MouseOut, a3, Some(b)));
    assert_eq!(
        dispatches(&dom),
        vec![
            (PointerEventType::Out, a3),
            (PointerEventType::Leave, a3),
            (PointerEventType::Leave, a2),
            (PointerEventType::Leave, a1),
        ]
    );
    // Leave events are delivered per node and must not bubble.
    assert!(dom.dispatch_log()[1..].iter().all(|record| !record.bubbles));
}

#[test]
fn enter_walk_descends_root_first_and_ends_at_the_target() {
    let mut dom = MemoryDom::new();
    let (_lca, a1, a2, a3, b) = boundary_tree(&mut dom);
    let mut shim = PointerShim::new();

    shim.handle_native(&mut dom, &boundary_event(NativeKind::MouseOver, a3, Some(b)));
    assert_eq!(
        dispatches(&dom),
        vec![
            (PointerEventType::Over, a3),
            (PointerEventType::Enter, a1),
            (PointerEventType::Enter, a2),
            (PointerEventType::Enter, a3),
        ]
    );
}

#[test]
fn walk_between_siblings_touches_only_the_target() {
    let mut dom = MemoryDom::new();
    let root = dom.create_node("root", None);
    let left = dom.create_node("left", Some(root));
    let right = dom.create_node("right", Some(root));
    let mut shim = PointerShim::new();

    shim.handle_native(
        &mut dom,
        &boundary_event(NativeKind::MouseOut, left, Some(right)),
    );
    assert_eq!(
        dispatches(&dom),
        vec![
            (PointerEventType::Out, left),
            (PointerEventType::Leave, left),
        ]
    );
}

#[test]
fn mouseout_without_related_target_dispatches_nothing() {
    let mut dom = MemoryDom::new();
    let node = dom.create_node("node", None);
    let mut shim = PointerShim::new();

    shim.handle_native(&mut dom, &boundary_event(NativeKind::MouseOut, node, None));
    assert!(dom.dispatch_log().is_empty());
}

#[test]
fn mouseover_from_outside_the_document_still_fires_pointerover() {
    let mut dom = MemoryDom::new();
    let node = dom.create_node("node", None);
    let mut shim = PointerShim::new();

    shim.handle_native(&mut dom, &boundary_event(NativeKind::MouseOver, node, None));
    // No related target means no enter chain, but the over itself fires.
    assert_eq!(dispatches(&dom), vec![(PointerEventType::Over, node)]);
}

#[test]
fn ghost_click_is_absorbed_on_touch_hosts() {
    let mut dom = MemoryDom::with_touch_support();
    let button = dom.create_node("button", None);
    dom.set_touch_action(button, TouchAction::NONE);
    let mut shim = PointerShim::new();

    let click = NativeMouseEvent::new(NativeKind::Click, Some(button));
    shim.handle_native(&mut dom, &click);
    assert!(click.handle.default_prevented());
    assert!(click.handle.immediate_propagation_stopped());
}

#[test]
fn genuine_clicks_pass_through() {
    // No touch support: nothing to disambiguate.
    let mut dom = MemoryDom::new();
    let button = dom.create_node("button", None);
    dom.set_touch_action(button, TouchAction::NONE);
    let mut shim = PointerShim::new();
    let click = NativeMouseEvent::new(NativeKind::Click, Some(button));
    shim.handle_native(&mut dom, &click);
    assert!(!click.handle.default_prevented());

    // Touch support, but the target resolves to AUTO.
    let mut dom = MemoryDom::with_touch_support();
    let plain = dom.create_node("plain", None);
    let mut shim = PointerShim::new();
    let click = NativeMouseEvent::new(NativeKind::Click, Some(plain));
    shim.handle_native(&mut dom, &click);
    assert!(!click.handle.default_prevented());

    // Clicks synthesized by the shim itself are never re-absorbed.
    let mut dom = MemoryDom::with_touch_support();
    let button = dom.create_node("button", None);
    dom.set_touch_action(button, TouchAction::NONE);
    let mut shim = PointerShim::new();
    let mut click = NativeMouseEvent::new(NativeKind::Click, Some(button));
    click.synthetic = true;
    shim.handle_native(&mut dom, &click);
    assert!(!click.handle.default_prevented());
}

#[test]
fn registration_adds_and_removes_all_listeners() {
    let mut dom = MemoryDom::new();
    let root = dom.create_node("root", None);
    let mut shim = PointerShim::new();

    shim.register_handlers(&mut dom, root);
    assert_eq!(dom.listener_count(), 6);
    assert!(dom.has_listener(root, NativeKind::Click, true));
    assert!(dom.has_listener(root, NativeKind::MouseDown, false));

    shim.deregister_handlers(&mut dom);
    assert_eq!(dom.listener_count(), 0);
}

#[test]
fn related_target_is_hidden_while_capture_is_held() {
    let mut dom = MemoryDom::new();
    let node = dom.create_node("node", None);
    let mut shim = PointerShim::new();

    shim.handle_native(&mut dom, &down_event(node));
    shim.set_pointer_capture(&mut dom, node).unwrap();
    dom.clear_log();

    let mut ev = move_event(node);
    ev.related_target = Some(node);
    shim.handle_native(&mut dom, &ev);
    assert_eq!(dom.dispatch_log()[0].related_target, None);
}
