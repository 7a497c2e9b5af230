use web_sys::{Document, Element, HtmlElement, MouseEvent, ScrollBehavior, ScrollToOptions, Window};

use super::nav::NAV_ID;
use crate::dom::{self, Listener};
use crate::motion::anchor_scroll_top;

pub const ANCHOR_SELECTOR: &str = "a[href^=\"#\"]";

/// Id a same-page link points at, or `None` for a bare `#`.
pub fn anchor_target_id(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}

/// Smooth-scrolls same-page links so the section lands just below the nav bar.
pub struct AnchorScroller {
    _links: Vec<Listener<MouseEvent>>,
}

impl AnchorScroller {
    pub fn mount(window: &Window, document: &Document) -> Self {
        let links = dom::query_all(document, ANCHOR_SELECTOR)
            .into_iter()
            .filter_map(|anchor| {
                let window = window.clone();
                let document = document.clone();
                let link = anchor.clone();
                dom::listen(&anchor, "click", move |event: MouseEvent| {
                    on_click(&window, &document, &link, &event);
                })
            })
            .collect::<Vec<_>>();
        log::debug!("{} in-page links wired", links.len());
        Self { _links: links }
    }
}

fn on_click(window: &Window, document: &Document, link: &Element, event: &MouseEvent) {
    let href = link.get_attribute("href").unwrap_or_default();
    let Some(id) = anchor_target_id(&href) else {
        return;
    };
    let Some(target) = document.get_element_by_id(id) else {
        return;
    };
    event.prevent_default();

    // Nav height is read per click since it changes across breakpoints.
    let nav_height = dom::by_id::<HtmlElement>(document, NAV_ID)
        .map(|nav| nav.offset_height() as f64)
        .unwrap_or(0.0);
    let top = anchor_scroll_top(
        target.get_bounding_client_rect().top(),
        window.scroll_y().unwrap_or(0.0),
        nav_height,
    );

    let options = ScrollToOptions::new();
    options.set_top(top);
    options.set_behavior(ScrollBehavior::Smooth);
    window.scroll_to_with_scroll_to_options(&options);
}
