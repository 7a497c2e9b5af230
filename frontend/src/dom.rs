use std::marker::PhantomData;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{AddEventListenerOptions, Document, Element, Event, EventTarget, HtmlElement};

pub fn by_id<T: JsCast>(document: &Document, id: &str) -> Option<T> {
    document.get_element_by_id(id)?.dyn_into::<T>().ok()
}

/// First match for `selector` anywhere in the document.
pub fn select<T: JsCast>(document: &Document, selector: &str) -> Option<T> {
    document
        .query_selector(selector)
        .ok()
        .flatten()?
        .dyn_into::<T>()
        .ok()
}

pub fn query<T: JsCast>(root: &Element, selector: &str) -> Option<T> {
    root.query_selector(selector)
        .ok()
        .flatten()?
        .dyn_into::<T>()
        .ok()
}

/// Elements matching `selector` in document order. Bad selectors give an empty list.
pub fn query_all(document: &Document, selector: &str) -> Vec<Element> {
    let Ok(list) = document.query_selector_all(selector) else {
        log::warn!("invalid selector {}", selector);
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub fn set_class(el: &Element, class: &str, on: bool) {
    let _ = el.class_list().toggle_with_force(class, on);
}

pub fn has_class(el: &Element, class: &str) -> bool {
    el.class_list().contains(class)
}

pub fn set_style(el: &HtmlElement, property: &str, value: &str) {
    let style = el.style();
    if value.is_empty() {
        let _ = style.remove_property(property);
    } else {
        let _ = style.set_property(property, value);
    }
}

/// A registered DOM event handler. The handler is removed from its target when
/// this value is dropped, so owning the `Listener` is owning the subscription.
pub struct Listener<E> {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
    _event: PhantomData<fn(E)>,
}

impl<E: JsCast + 'static> Listener<E> {
    pub fn new(
        target: &EventTarget,
        event: &'static str,
        handler: impl FnMut(E) + 'static,
    ) -> Result<Self, JsValue> {
        Self::register(target, event, false, handler)
    }

    /// Registers with `{ passive: true }`, for scroll handlers that never cancel.
    pub fn passive(
        target: &EventTarget,
        event: &'static str,
        handler: impl FnMut(E) + 'static,
    ) -> Result<Self, JsValue> {
        Self::register(target, event, true, handler)
    }

    fn register(
        target: &EventTarget,
        event: &'static str,
        passive: bool,
        mut handler: impl FnMut(E) + 'static,
    ) -> Result<Self, JsValue> {
        let callback = Closure::wrap(Box::new(move |ev: Event| match ev.dyn_into::<E>() {
            Ok(ev) => handler(ev),
            Err(_) => log::warn!("dropping {} event of unexpected type", event),
        }) as Box<dyn FnMut(Event)>);

        if passive {
            let options = AddEventListenerOptions::new();
            options.set_passive(true);
            target.add_event_listener_with_callback_and_add_event_listener_options(
                event,
                callback.as_ref().unchecked_ref(),
                &options,
            )?;
        } else {
            target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
        }

        Ok(Self {
            target: target.clone(),
            event,
            callback,
            _event: PhantomData,
        })
    }
}

impl<E> Drop for Listener<E> {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
    }
}

/// Registers `handler` and logs instead of failing when the browser refuses it.
pub fn listen<E: JsCast + 'static>(
    target: &EventTarget,
    event: &'static str,
    handler: impl FnMut(E) + 'static,
) -> Option<Listener<E>> {
    Listener::new(target, event, handler)
        .map_err(|e| log::warn!("could not listen for {}: {:?}", event, e))
        .ok()
}

pub fn listen_passive<E: JsCast + 'static>(
    target: &EventTarget,
    event: &'static str,
    handler: impl FnMut(E) + 'static,
) -> Option<Listener<E>> {
    Listener::passive(target, event, handler)
        .map_err(|e| log::warn!("could not listen for {}: {:?}", event, e))
        .ok()
}
