use web_sys::{Document, Element, Event, Window};

use crate::dom::{self, Listener};
use crate::motion::is_scrolled;

pub const NAV_ID: &str = "nav";
pub const SCROLLED_CLASS: &str = "nav--scrolled";

pub struct NavTracker {
    nav: Element,
    _scroll: Option<Listener<Event>>,
}

impl NavTracker {
    pub fn mount(window: &Window, document: &Document) -> Option<Self> {
        let Some(nav) = document.get_element_by_id(NAV_ID) else {
            log::debug!("no #{} element, nav tracker disabled", NAV_ID);
            return None;
        };

        let scroll = {
            let nav = nav.clone();
            let win = window.clone();
            dom::listen_passive(window, "scroll", move |_: Event| {
                sync(&nav, win.scroll_y().unwrap_or(0.0));
            })
        };

        let tracker = Self { nav, _scroll: scroll };
        tracker.sync(window.scroll_y().unwrap_or(0.0));
        Some(tracker)
    }

    pub fn sync(&self, offset: f64) {
        sync(&self.nav, offset);
    }
}

fn sync(nav: &Element, offset: f64) {
    dom::set_class(nav, SCROLLED_CLASS, is_scrolled(offset));
}
