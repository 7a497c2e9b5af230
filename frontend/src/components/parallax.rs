use web_sys::{Document, Event, HtmlElement, Window};

use crate::dom::{self, Listener};
use crate::motion::parallax_transform;

pub const HERO_BG_SELECTOR: &str = ".hero__bg-img";
const MOTION_OK_QUERY: &str = "(prefers-reduced-motion: no-preference)";

pub fn motion_allowed(window: &Window) -> bool {
    matches!(window.match_media(MOTION_OK_QUERY), Ok(Some(mql)) if mql.matches())
}

/// Slow zoom and drift on the hero background while the hero is on screen.
pub struct Parallax {
    _scroll: Listener<Event>,
}

impl Parallax {
    pub fn mount(window: &Window, document: &Document) -> Option<Self> {
        let hero = dom::select::<HtmlElement>(document, HERO_BG_SELECTOR)?;
        if !motion_allowed(window) {
            log::debug!("reduced motion requested, parallax off");
            return None;
        }

        let win = window.clone();
        let scroll = dom::listen_passive(window, "scroll", move |_: Event| {
            let scrolled = win.scroll_y().unwrap_or(0.0);
            let height = win
                .inner_height()
                .ok()
                .and_then(|h| h.as_f64())
                .unwrap_or(0.0);
            if let Some(transform) = parallax_transform(scrolled, height) {
                dom::set_style(&hero, "transform", &transform);
            }
        })?;

        Some(Self { _scroll: scroll })
    }
}
