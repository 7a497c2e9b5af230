use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::js_sys::{Array, Number};
use web_sys::{Document, Element, IntersectionObserver, Window};

use super::reveal::one_shot_observer;
use crate::dom;
use crate::motion::{counter_delay_ms, parse_count, CounterAnimation};

pub const COUNTER_SELECTOR: &str = ".stat__number[data-count]";
pub const STATS_SELECTOR: &str = ".stats";

const STATS_THRESHOLD: f64 = 0.5;
const FALLBACK_LOCALE: &str = "en-US";

struct Counter {
    el: Element,
    target: i64,
}

struct Counters {
    window: Window,
    counters: Vec<Counter>,
    locale: String,
    armed: Cell<bool>,
    // Set by `complete()`; pending staggers and running frame loops stop writing.
    settled: Rc<Cell<bool>>,
}

impl Counters {
    /// Starts every counter once per page; later calls do nothing.
    fn arm(&self) {
        if self.armed.replace(true) {
            return;
        }
        log::debug!("animating {} counters", self.counters.len());
        for (index, counter) in self.counters.iter().enumerate() {
            let window = self.window.clone();
            let el = counter.el.clone();
            let locale = self.locale.clone();
            let anim = CounterAnimation::new(counter.target);
            let settled = self.settled.clone();
            Timeout::new(counter_delay_ms(index), move || {
                if !settled.get() {
                    animate(window, el, anim, locale, settled);
                }
            })
            .forget();
        }
    }

    fn show_targets(&self) {
        for counter in &self.counters {
            counter
                .el
                .set_text_content(Some(&format_count(counter.target, &self.locale)));
        }
    }
}

pub fn format_count(value: i64, locale: &str) -> String {
    Number::from(value as f64).to_locale_string(locale).into()
}

type FrameCallback = Closure<dyn FnMut(f64)>;

fn request_frame(window: &Window, callback: &FrameCallback) -> bool {
    match window.request_animation_frame(callback.as_ref().unchecked_ref()) {
        Ok(_) => true,
        Err(e) => {
            log::warn!("could not schedule counter frame: {:?}", e);
            false
        }
    }
}

/// Drives one counter from zero to its target on animation frames. The first
/// frame's timestamp is the animation origin.
fn animate(
    window: Window,
    el: Element,
    anim: CounterAnimation,
    locale: String,
    settled: Rc<Cell<bool>>,
) {
    let frame: Rc<RefCell<Option<FrameCallback>>> = Rc::new(RefCell::new(None));
    let handle = frame.clone();
    let win = window.clone();
    let mut origin: Option<f64> = None;

    *handle.borrow_mut() = Some(Closure::wrap(Box::new(move |now: f64| {
        let stopped = settled.get();
        let done = stopped || {
            let start = *origin.get_or_insert(now);
            let step = anim.frame(now - start);
            el.set_text_content(Some(&format_count(step.value, &locale)));
            step.done
        };

        let scheduled = !done
            && frame
                .borrow()
                .as_ref()
                .is_some_and(|next| request_frame(&win, next));
        if !scheduled {
            // Can't free a closure from inside its own call.
            if let Some(finished) = frame.borrow_mut().take() {
                Timeout::new(0, move || drop(finished)).forget();
            }
        }
    }) as Box<dyn FnMut(f64)>));

    let started = handle
        .borrow()
        .as_ref()
        .is_some_and(|first| request_frame(&window, first));
    if !started {
        handle.borrow_mut().take();
    }
}

/// Counts the `.stats` numbers up once the section is half on screen.
pub struct CounterAnimator {
    counters: Rc<Counters>,
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(Array, IntersectionObserver)>,
}

impl CounterAnimator {
    pub fn mount(window: &Window, document: &Document) -> Option<Self> {
        let Some(section) = dom::select::<Element>(document, STATS_SELECTOR) else {
            log::debug!("no {} section, counters disabled", STATS_SELECTOR);
            return None;
        };

        let counters = dom::query_all(document, COUNTER_SELECTOR)
            .into_iter()
            .map(|el| {
                let target = parse_count(&el.get_attribute("data-count").unwrap_or_default());
                Counter { el, target }
            })
            .collect::<Vec<_>>();

        let locale = window
            .navigator()
            .language()
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| FALLBACK_LOCALE.to_string());

        let counters = Rc::new(Counters {
            window: window.clone(),
            counters,
            locale,
            armed: Cell::new(false),
            settled: Rc::new(Cell::new(false)),
        });

        let on_visible = counters.clone();
        let (observer, callback) = one_shot_observer(STATS_THRESHOLD, None, move |_| on_visible.arm())
            .map_err(|e| log::warn!("stats observer unavailable: {:?}", e))
            .ok()?;
        observer.observe(&section);

        Some(Self { counters, observer, _callback: callback })
    }

    pub fn is_armed(&self) -> bool {
        self.counters.armed.get()
    }

    /// Jumps every counter to its final value and prevents any later animation.
    pub fn complete(&self) {
        self.counters.armed.set(true);
        self.counters.settled.set(true);
        self.observer.disconnect();
        self.counters.show_targets();
    }
}

impl Drop for CounterAnimator {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}
