use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::js_sys::Array;
use web_sys::{Document, Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use crate::dom;

pub const REVEAL_SELECTOR: &str = ".reveal";
pub const VISIBLE_CLASS: &str = "visible";

const REVEAL_THRESHOLD: f64 = 0.15;
const REVEAL_ROOT_MARGIN: &str = "0px 0px -40px 0px";

type EntriesCallback = Closure<dyn FnMut(Array, IntersectionObserver)>;

/// Builds an observer that runs `on_enter` once per target and then stops watching it.
pub(crate) fn one_shot_observer(
    threshold: f64,
    root_margin: Option<&str>,
    mut on_enter: impl FnMut(Element) + 'static,
) -> Result<(IntersectionObserver, EntriesCallback), JsValue> {
    let callback = Closure::wrap(Box::new(move |entries: Array, observer: IntersectionObserver| {
        for entry in entries.iter() {
            let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                continue;
            };
            if entry.is_intersecting() {
                let target = entry.target();
                observer.unobserve(&target);
                on_enter(target);
            }
        }
    }) as Box<dyn FnMut(Array, IntersectionObserver)>);

    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(threshold));
    if let Some(margin) = root_margin {
        options.set_root_margin(margin);
    }
    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;
    Ok((observer, callback))
}

/// Adds `visible` to each `.reveal` element the first time it scrolls into view.
pub struct RevealTrigger {
    elements: Vec<Element>,
    observer: IntersectionObserver,
    _callback: EntriesCallback,
}

impl RevealTrigger {
    pub fn mount(document: &Document) -> Option<Self> {
        let elements = dom::query_all(document, REVEAL_SELECTOR);
        if elements.is_empty() {
            log::debug!("no {} elements, reveal trigger disabled", REVEAL_SELECTOR);
            return None;
        }

        let (observer, callback) = one_shot_observer(
            REVEAL_THRESHOLD,
            Some(REVEAL_ROOT_MARGIN),
            |el| dom::set_class(&el, VISIBLE_CLASS, true),
        )
        .map_err(|e| log::warn!("reveal observer unavailable: {:?}", e))
        .ok()?;

        for el in &elements {
            observer.observe(el);
        }
        log::info!("watching {} reveal elements", elements.len());

        Some(Self { elements, observer, _callback: callback })
    }

    /// Shows every element right away and stops observing.
    pub fn reveal_all(&self) {
        self.observer.disconnect();
        for el in &self.elements {
            dom::set_class(el, VISIBLE_CLASS, true);
        }
    }
}

impl Drop for RevealTrigger {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}
