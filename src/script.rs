//! Gesture replay scripts.
//!
//! A script is a TOML document declaring a node tree and a sequence of
//! native events to push through the shim. The replay binary uses it as a
//! manual-verification harness; integration tests assert on the printed
//! synthetic stream.
//!
//! # Example
//! ```toml
//! [[nodes]]
//! name = "root"
//!
//! [[nodes]]
//! name = "pane"
//! parent = "root"
//! overflow = "scroll"
//! touch_action = "pan-x"
//!
//! [[events]]
//! kind = "mousedown"
//! target = "pane"
//! buttons = 1
//! client = [12.0, 30.0]
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::host::memory::{MemoryDom, NodeId};
use crate::host::{NativeKind, NativeMouseEvent, Overflow};
use crate::touch_action::TouchAction;
use crate::translate::PointerShim;

/// Parsed replay script.
#[derive(Debug, Deserialize)]
pub struct Script {
    /// Whether the simulated environment supports touch events.
    #[serde(default)]
    pub touch_supported: bool,
    #[serde(default)]
    pub nodes: Vec<NodeDecl>,
    #[serde(default)]
    pub events: Vec<EventDecl>,
}

/// One node of the simulated tree. Nodes are declared parents-first and
/// referenced by name.
#[derive(Debug, Deserialize)]
pub struct NodeDecl {
    pub name: String,
    pub parent: Option<String>,
    pub overflow: Option<String>,
    pub touch_action: Option<String>,
}

/// One scripted step: either a native mouse event or a capture request.
#[derive(Debug, Deserialize)]
pub struct EventDecl {
    /// `mousedown`, `mousemove`, `mouseup`, `mouseover`, `mouseout`,
    /// `click`, `setcapture` or `releasecapture`.
    pub kind: String,
    pub target: Option<String>,
    pub related: Option<String>,
    #[serde(default)]
    pub button: i16,
    pub buttons: Option<u16>,
    #[serde(default)]
    pub which: u32,
    #[serde(default)]
    pub screen: [f64; 2],
    #[serde(default)]
    pub client: [f64; 2],
}

impl Script {
    /// Loads and parses a script file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read script file: {}", path.display()))?;
        let script: Script =
            toml::from_str(&text).context("Failed to parse script file as TOML")?;
        if script.nodes.is_empty() {
            bail!("Script declares no nodes");
        }
        Ok(script)
    }

    /// Builds the tree, replays every event through a fresh shim and
    /// returns one printable line per observable outcome.
    pub fn run(&self) -> Result<Vec<String>> {
        let (mut dom, root) = self.build_dom()?;
        let mut shim = PointerShim::new();
        shim.register_handlers(&mut dom, root);

        let mut lines = Vec::new();
        for event in &self.events {
            self.replay_event(&mut dom, &mut shim, event, &mut lines)?;
        }
        shim.deregister_handlers(&mut dom);
        Ok(lines)
    }

    fn build_dom(&self) -> Result<(MemoryDom, NodeId)> {
        let mut dom = if self.touch_supported {
            MemoryDom::with_touch_support()
        } else {
            MemoryDom::new()
        };
        let mut root = None;
        for decl in &self.nodes {
            let parent = match &decl.parent {
                Some(name) => Some(
                    dom.find_node(name)
                        .with_context(|| format!("Unknown parent node: {name}"))?,
                ),
                None => None,
            };
            let id = dom.create_node(&decl.name, parent);
            if let Some(overflow) = &decl.overflow {
                dom.set_overflow(id, parse_overflow(overflow)?);
            }
            if let Some(action) = &decl.touch_action {
                dom.set_touch_action(id, TouchAction::from_attr(action));
            }
            if root.is_none() {
                root = Some(id);
            }
        }
        // load() rejects empty node lists.
        let root = root.context("Script declares no nodes")?;
        Ok((dom, root))
    }

    fn replay_event(
        &self,
        dom: &mut MemoryDom,
        shim: &mut PointerShim<MemoryDom>,
        event: &EventDecl,
        lines: &mut Vec<String>,
    ) -> Result<()> {
        let target = self.lookup(dom, event.target.as_deref())?;

        match event.kind.as_str() {
            "setcapture" => {
                let element = target.context("setcapture requires a target")?;
                let granted = shim.set_pointer_capture(dom, element)?;
                drain_log(dom, lines);
                lines.push(format!(
                    "setcapture {} -> {}",
                    dom.node_name(element),
                    if granted { "granted" } else { "refused" }
                ));
            }
            "releasecapture" => {
                let element = target.context("releasecapture requires a target")?;
                let released = shim.release_pointer_capture(dom, element)?;
                drain_log(dom, lines);
                lines.push(format!(
                    "releasecapture {} -> {}",
                    dom.node_name(element),
                    if released { "released" } else { "refused" }
                ));
            }
            kind => {
                let native = self.native_event(dom, parse_kind(kind)?, target, event)?;
                shim.handle_native(dom, &native);
                drain_log(dom, lines);
                if native.handle.default_prevented() {
                    lines.push(format!("{kind} absorbed"));
                }
            }
        }
        Ok(())
    }

    fn native_event(
        &self,
        dom: &MemoryDom,
        kind: NativeKind,
        target: Option<NodeId>,
        event: &EventDecl,
    ) -> Result<NativeMouseEvent<NodeId>> {
        let mut native = NativeMouseEvent::new(kind, target);
        native.related_target = self.lookup(dom, event.related.as_deref())?;
        native.button = event.button;
        native.buttons = event.buttons;
        native.which = event.which;
        native.screen_x = event.screen[0];
        native.screen_y = event.screen[1];
        native.client_x = event.client[0];
        native.client_y = event.client[1];
        Ok(native)
    }

    fn lookup(&self, dom: &MemoryDom, name: Option<&str>) -> Result<Option<NodeId>> {
        match name {
            Some(name) => Ok(Some(
                dom.find_node(name)
                    .with_context(|| format!("Unknown node: {name}"))?,
            )),
            None => Ok(None),
        }
    }
}

fn drain_log(dom: &mut MemoryDom, lines: &mut Vec<String>) {
    for record in dom.take_log() {
        lines.push(format!(
            "{} @ {}",
            record.kind.as_str(),
            dom.node_name(record.target)
        ));
    }
}

fn parse_kind(kind: &str) -> Result<NativeKind> {
    Ok(match kind {
        "mousedown" => NativeKind::MouseDown,
        "mousemove" => NativeKind::MouseMove,
        "mouseup" => NativeKind::MouseUp,
        "mouseover" => NativeKind::MouseOver,
        "mouseout" => NativeKind::MouseOut,
        "click" => NativeKind::Click,
        other => bail!("Unknown event kind: {other}"),
    })
}

fn parse_overflow(value: &str) -> Result<Overflow> {
    Ok(match value {
        "visible" => Overflow::Visible,
        "hidden" => Overflow::Hidden,
        "auto" => Overflow::Auto,
        "scroll" => Overflow::Scroll,
        other => bail!("Unknown overflow value: {other}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_script_parses_with_defaults() {
        let script: Script = toml::from_str(
            r#"
            [[nodes]]
            name = "root"

            [[events]]
            kind = "mousedown"
            target = "root"
            buttons = 1
            "#,
        )
        .unwrap();
        assert!(!script.touch_supported);
        assert_eq!(script.nodes.len(), 1);
        assert_eq!(script.events[0].client, [0.0, 0.0]);
    }

    #[test]
    fn replay_produces_the_synthetic_stream() {
        let script: Script = toml::from_str(
            r#"
            [[nodes]]
            name = "root"

            [[nodes]]
            name = "pane"
            parent = "root"
            overflow = "scroll"

            [[events]]
            kind = "mousedown"
            target = "pane"
            buttons = 1

            [[events]]
            kind = "mousemove"
            target = "pane"

            [[events]]
            kind = "mouseup"
            target = "pane"
            "#,
        )
        .unwrap();

        let lines = script.run().unwrap();
        assert_eq!(
            lines,
            vec!["pointerdown @ pane", "pointercancel @ pane"],
        );
    }

    #[test]
    fn capture_steps_report_grant_and_release() {
        let script: Script = toml::from_str(
            r#"
            [[nodes]]
            name = "root"

            [[events]]
            kind = "mousedown"
            target = "root"
            buttons = 1

            [[events]]
            kind = "setcapture"
            target = "root"

            [[events]]
            kind = "releasecapture"
            target = "root"
            "#,
        )
        .unwrap();

        let lines = script.run().unwrap();
        assert_eq!(
            lines,
            vec![
                "pointerdown @ root",
                "gotpointercapture @ root",
                "setcapture root -> granted",
                "lostpointercapture @ root",
                "releasecapture root -> released",
            ]
        );
    }

    #[test]
    fn unknown_node_references_are_rejected() {
        let script: Script = toml::from_str(
            r#"
            [[nodes]]
            name = "root"

            [[events]]
            kind = "mousedown"
            target = "ghost"
            "#,
        )
        .unwrap();
        let err = script.run().unwrap_err();
        assert!(err.to_string().contains("Unknown node: ghost"));
    }
}
