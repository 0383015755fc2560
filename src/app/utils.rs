use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use leptos::prelude::*;
use tracker_core::palette::IndexSource;
use wasm_bindgen::JsCast;
use web_sys::{HtmlDocument, HtmlElement, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition};

/// Palette entropy from `Math.random`.
pub struct JsRandom;

impl IndexSource for JsRandom {
    fn next_index(&mut self, bound: usize) -> usize {
        let pick = (js_sys::Math::random() * bound as f64).floor() as usize;
        pick.min(bound.saturating_sub(1))
    }
}

/// Flips to `false` when the owning component is torn down, so async work
/// that finishes late can skip its writes.
#[derive(Clone)]
pub struct MountGuard(Arc<AtomicBool>);

impl MountGuard {
    pub fn new() -> Self {
        let flag = Arc::new(AtomicBool::new(true));
        let on_drop = flag.clone();
        on_cleanup(move || on_drop.store(false, Ordering::Relaxed));
        Self(flag)
    }

    pub fn alive(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

fn html_document() -> Option<HtmlDocument> {
    web_sys::window()?.document()?.dyn_into::<HtmlDocument>().ok()
}

/// Blocks page scrolling behind modal dialogs.
pub fn lock_body_scroll(locked: bool) {
    let body = web_sys::window().and_then(|w| w.document()).and_then(|d| d.body());
    if let Some(body) = body {
        let _ = body.style().set_property("overflow", if locked { "hidden" } else { "" });
    }
}

/// Toggles `bold`, `italic` or `underline` on the current selection.
pub fn exec_format(command: &str) {
    if let Some(doc) = html_document() {
        if let Err(e) = doc.exec_command(command) {
            log::warn!("execCommand({}) failed: {:?}", command, e);
        }
    }
}

pub fn format_active(command: &str) -> bool {
    html_document()
        .and_then(|doc| doc.query_command_state(command).ok())
        .unwrap_or(false)
}

/// True while the focus sits in a text field or an editable surface, where
/// single-key shortcuts must not fire.
pub fn typing_in_field() -> bool {
    let active = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.active_element());
    let Some(el) = active else { return false };
    let tag = el.tag_name().to_lowercase();
    if tag == "input" || tag == "textarea" {
        return true;
    }
    el.dyn_ref::<HtmlElement>().map(|h| h.is_content_editable()).unwrap_or(false)
}

pub fn scroll_into_view(el: &web_sys::Element) {
    let opts = ScrollIntoViewOptions::new();
    opts.set_behavior(ScrollBehavior::Smooth);
    opts.set_block(ScrollLogicalPosition::Nearest);
    el.scroll_into_view_with_scroll_into_view_options(&opts);
}
