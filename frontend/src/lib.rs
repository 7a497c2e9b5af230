//! Client-side behaviour for the CARRY landing page: reveal-on-scroll, stat
//! counters, nav and mobile menu, anchor scrolling, newsletter signup and the
//! hero parallax. Everything binds to the static markup by id and class name.

use std::cell::RefCell;

use log::info;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsValue;
use web_sys::js_sys::Reflect;
use web_sys::{window, Document, Window};

pub mod config;
pub mod dom;
pub mod motion;
pub mod components {
    pub mod anchor;
    pub mod counter;
    pub mod mobile_menu;
    pub mod nav;
    pub mod parallax;
    pub mod reveal;
    pub mod signup;
    pub mod subscribe;
}

use components::{
    anchor::AnchorScroller,
    counter::CounterAnimator,
    mobile_menu::MobileMenu,
    nav::NavTracker,
    parallax::Parallax,
    reveal::RevealTrigger,
    signup::SignupForm,
};

/// Name of the function published on `window` for screenshot tooling.
pub const SETTLE_HOOK: &str = "carrySettle";

/// Every behaviour attached to the page. Each part is optional so a page
/// without, say, a stats section still gets the rest.
pub struct Page {
    pub reveal: Option<RevealTrigger>,
    pub counters: Option<CounterAnimator>,
    pub nav: Option<NavTracker>,
    pub menu: Option<MobileMenu>,
    pub anchors: AnchorScroller,
    pub signup: Option<SignupForm>,
    pub parallax: Option<Parallax>,
}

impl Page {
    pub fn mount(window: &Window, document: &Document) -> Self {
        Self {
            reveal: RevealTrigger::mount(document),
            counters: CounterAnimator::mount(window, document),
            nav: NavTracker::mount(window, document),
            menu: MobileMenu::mount(document),
            anchors: AnchorScroller::mount(window, document),
            signup: SignupForm::mount(document),
            parallax: Parallax::mount(window, document),
        }
    }

    /// Puts reveals and counters in their finished state without waiting for scroll.
    pub fn settle(&self) {
        if let Some(reveal) = &self.reveal {
            reveal.reveal_all();
        }
        if let Some(counters) = &self.counters {
            counters.complete();
        }
    }
}

thread_local! {
    static PAGE: RefCell<Option<Page>> = RefCell::new(None);
}

pub fn start() {
    let Some(window) = window() else {
        log::warn!("no window, nothing to mount");
        return;
    };
    let Some(document) = window.document() else {
        log::warn!("no document, nothing to mount");
        return;
    };

    let page = Page::mount(&window, &document);
    PAGE.with(|slot| *slot.borrow_mut() = Some(page));
    publish_settle_hook(&window);
    info!("Page behaviour mounted");
}

/// Settles the mounted page, if any.
pub fn settle() {
    PAGE.with(|slot| {
        if let Some(page) = slot.borrow().as_ref() {
            page.settle();
        }
    });
}

fn publish_settle_hook(window: &Window) {
    let hook = Closure::<dyn Fn()>::new(settle).into_js_value();
    if let Err(e) = Reflect::set(window, &JsValue::from_str(SETTLE_HOOK), &hook) {
        log::warn!("could not publish {}: {:?}", SETTLE_HOOK, e);
    }
}
