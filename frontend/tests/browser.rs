#![cfg(target_arch = "wasm32")]

use std::cell::Cell;
use std::rc::Rc;

use carry::components::anchor::AnchorScroller;
use carry::components::counter::{format_count, CounterAnimator};
use carry::components::mobile_menu::{MobileMenu, ACTIVE_CLASS};
use carry::components::nav::{NavTracker, SCROLLED_CLASS};
use carry::components::parallax::{motion_allowed, Parallax};
use carry::components::reveal::{RevealTrigger, VISIBLE_CLASS};
use carry::components::signup::{
    SignupForm, Submission, BUSY_LABEL, FAILED_LABEL, SUBSCRIBED_LABEL,
};
use carry::components::subscribe::{SignupError, SubscribeOutcome, Subscriber};
use carry::dom;
use carry::Page;
use futures::future::{self, FutureExt, LocalBoxFuture};
use gloo_timers::future::TimeoutFuture;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{
    Document, Element, Event, EventInit, HtmlButtonElement, HtmlElement, HtmlInputElement,
    MouseEvent, MouseEventInit, Window,
};

wasm_bindgen_test_configure!(run_in_browser);

fn window() -> Window {
    web_sys::window().unwrap()
}

fn document() -> Document {
    window().document().unwrap()
}

/// Mounts `html` in a fresh container that is removed again on drop.
struct Fixture(Element);

impl Fixture {
    fn new(html: &str) -> Self {
        let doc = document();
        let root = doc.create_element("div").unwrap();
        root.set_inner_html(html);
        doc.body().unwrap().append_child(&root).unwrap();
        Self(root)
    }

    fn get<T: JsCast>(&self, id: &str) -> T {
        dom::by_id::<T>(&document(), id).unwrap()
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        self.0.remove();
    }
}

/// Waits up to `limit_ms` for `done` to hold, checking every few milliseconds.
async fn wait_for(limit_ms: u32, mut done: impl FnMut() -> bool) -> bool {
    let mut waited = 0;
    while waited < limit_ms {
        if done() {
            return true;
        }
        TimeoutFuture::new(10).await;
        waited += 10;
    }
    done()
}

/// Polls until the scroll position stops moving and returns it.
async fn settled_scroll_y() -> f64 {
    let mut last = f64::NAN;
    for _ in 0..100 {
        TimeoutFuture::new(50).await;
        let now = window().scroll_y().unwrap();
        if now > 0.0 && now == last {
            break;
        }
        last = now;
    }
    last
}

const PINNED_STATS_HTML: &str = r#"
    <div class="stats" id="stats" style="position: fixed; top: 0; left: 0; width: 300px; height: 80px;">
        <span class="stat__number" id="c1" data-count="2400">0</span>
        <span class="stat__number" id="c2" data-count="180">0</span>
    </div>
"#;

fn cancelable_click() -> MouseEvent {
    let init = MouseEventInit::new();
    init.set_bubbles(true);
    init.set_cancelable(true);
    MouseEvent::new_with_mouse_event_init_dict("click", &init).unwrap()
}

fn submit_event() -> Event {
    let init = EventInit::new();
    init.set_cancelable(true);
    Event::new_with_event_init_dict("submit", &init).unwrap()
}

struct Fake {
    calls: Rc<Cell<u32>>,
    reply: Option<SubscribeOutcome>,
}

impl Subscriber for Fake {
    fn subscribe(&self, _email: &str) -> LocalBoxFuture<'static, Result<SubscribeOutcome, SignupError>> {
        self.calls.set(self.calls.get() + 1);
        let result = match self.reply {
            Some(outcome) => Ok(outcome),
            None => Err(SignupError::Network(gloo_net::Error::GlooError("offline".into()))),
        };
        future::ready(result).boxed_local()
    }
}

const FORM_HTML: &str = r#"
    <form id="reserveForm">
        <input class="cta__input" id="email" type="email">
        <button class="cta__btn" id="join" type="submit">Reserve</button>
    </form>
"#;

fn signup_fixture(reply: Option<SubscribeOutcome>) -> (Fixture, SignupForm, Rc<Cell<u32>>) {
    let fixture = Fixture::new(FORM_HTML);
    let calls = Rc::new(Cell::new(0));
    let form: Element = fixture.get("reserveForm");
    let signup = SignupForm::with_subscriber(
        &form,
        Rc::new(Fake { calls: calls.clone(), reply }),
        40,
    )
    .unwrap();
    (fixture, signup, calls)
}

#[wasm_bindgen_test]
fn nav_class_tracks_offset() {
    let fixture = Fixture::new(r#"<nav id="nav"></nav>"#);
    let tracker = NavTracker::mount(&window(), &document()).unwrap();
    let nav: Element = fixture.get("nav");

    for offset in [0.0, 300.0, 61.0] {
        tracker.sync(offset);
    }
    assert!(dom::has_class(&nav, SCROLLED_CLASS));

    tracker.sync(60.0);
    assert!(!dom::has_class(&nav, SCROLLED_CLASS));
}

#[wasm_bindgen_test]
fn missing_elements_disable_features_quietly() {
    let doc = document();
    assert!(NavTracker::mount(&window(), &doc).is_none());
    assert!(MobileMenu::mount(&doc).is_none());
    assert!(SignupForm::mount(&doc).is_none());
    assert!(CounterAnimator::mount(&window(), &doc).is_none());
    assert!(RevealTrigger::mount(&doc).is_none());
}

#[wasm_bindgen_test]
fn menu_flags_move_together() {
    let fixture = Fixture::new(
        r##"<button id="navToggle"></button>
            <div id="mobileMenu"><a id="menuLink" href="#nowhere">Specs</a></div>"##,
    );
    let menu = MobileMenu::mount(&document()).unwrap();
    let toggle: HtmlElement = fixture.get("navToggle");
    let panel: Element = fixture.get("mobileMenu");
    let link: HtmlElement = fixture.get("menuLink");
    let body = document().body().unwrap();
    let overflow = || body.style().get_property_value("overflow").unwrap();

    toggle.click();
    assert!(menu.state().is_open());
    assert!(dom::has_class(&panel, ACTIVE_CLASS));
    assert!(dom::has_class(&toggle, ACTIVE_CLASS));
    assert_eq!(overflow(), "hidden");

    link.click();
    assert!(!menu.state().is_open());
    assert!(!dom::has_class(&panel, ACTIVE_CLASS));
    assert!(!dom::has_class(&toggle, ACTIVE_CLASS));
    assert_eq!(overflow(), "");
}

#[wasm_bindgen_test]
fn anchors_only_take_over_known_targets() {
    let fixture = Fixture::new(
        r##"<nav id="nav" style="height: 64px"></nav>
            <a id="toFeatures" href="#features">Features</a>
            <a id="bare" href="#">Top</a>
            <a id="toMissing" href="#missing">Gone</a>
            <section id="features" style="height: 200px"></section>"##,
    );
    let _anchors = AnchorScroller::mount(&window(), &document());

    let click = |id: &str| {
        let link: Element = fixture.get(id);
        let event = cancelable_click();
        link.dispatch_event(&event).unwrap();
        event.default_prevented()
    };

    assert!(click("toFeatures"));
    assert!(!click("bare"));
    assert!(!click("toMissing"));
}

#[wasm_bindgen_test]
fn reveal_all_marks_every_element() {
    let fixture = Fixture::new(
        r#"<div class="reveal" id="r1"></div><div class="reveal" id="r2"></div>"#,
    );
    let reveal = RevealTrigger::mount(&document()).unwrap();
    reveal.reveal_all();

    for id in ["r1", "r2"] {
        let el: Element = fixture.get(id);
        assert!(dom::has_class(&el, VISIBLE_CLASS));
    }
}

#[wasm_bindgen_test]
fn complete_counters_show_formatted_targets() {
    let fixture = Fixture::new(
        r#"<div class="stats">
            <span class="stat__number" id="c1" data-count="2400">0</span>
            <span class="stat__number" id="c2" data-count="n/a">0</span>
        </div>"#,
    );
    let counters = CounterAnimator::mount(&window(), &document()).unwrap();
    counters.complete();
    assert!(counters.is_armed());

    let locale = window().navigator().language().unwrap_or_else(|| "en-US".into());
    let first: Element = fixture.get("c1");
    let second: Element = fixture.get("c2");
    assert_eq!(first.text_content().unwrap(), format_count(2400, &locale));
    assert_eq!(second.text_content().unwrap(), "0");
}

#[wasm_bindgen_test]
fn page_settle_finishes_reveals_and_counters() {
    let fixture = Fixture::new(
        r#"<div class="reveal" id="r"></div>
           <div class="stats"><span class="stat__number" id="n" data-count="12">0</span></div>"#,
    );
    let page = Page::mount(&window(), &document());
    page.settle();

    let revealed: Element = fixture.get("r");
    let number: Element = fixture.get("n");
    assert!(dom::has_class(&revealed, VISIBLE_CLASS));
    assert_eq!(number.text_content().unwrap(), "12");
}

#[wasm_bindgen_test]
fn blank_email_does_nothing() {
    let (fixture, signup, calls) = signup_fixture(Some(SubscribeOutcome::Subscribed));
    let form: Element = fixture.get("reserveForm");
    let input: HtmlInputElement = fixture.get("email");
    let button: HtmlButtonElement = fixture.get("join");

    input.set_value("   ");
    form.dispatch_event(&submit_event()).unwrap();

    assert_eq!(calls.get(), 0);
    assert!(!input.disabled());
    assert!(!button.disabled());
    assert_eq!(button.text_content().unwrap(), "Reserve");
    assert_eq!(signup.state(), Submission::Idle);
}

#[wasm_bindgen_test]
async fn successful_signup_cycles_back_to_idle() {
    let (fixture, signup, calls) = signup_fixture(Some(SubscribeOutcome::Subscribed));
    let form: Element = fixture.get("reserveForm");
    let input: HtmlInputElement = fixture.get("email");
    let button: HtmlButtonElement = fixture.get("join");

    input.set_value(" sam@example.com ");
    let event = submit_event();
    form.dispatch_event(&event).unwrap();
    assert!(event.default_prevented());
    assert!(input.disabled());
    assert!(button.disabled());
    assert_eq!(button.text_content().unwrap(), BUSY_LABEL);

    // Ignored while the first attempt is in flight.
    form.dispatch_event(&submit_event()).unwrap();

    TimeoutFuture::new(5).await;
    assert_eq!(calls.get(), 1);
    assert_eq!(signup.state(), Submission::Settled(SubscribeOutcome::Subscribed));
    assert_eq!(button.text_content().unwrap(), SUBSCRIBED_LABEL);
    assert_eq!(input.value(), "");

    TimeoutFuture::new(80).await;
    assert_eq!(signup.state(), Submission::Idle);
    assert_eq!(button.text_content().unwrap(), "Reserve");
    assert!(!input.disabled());
    assert!(!button.disabled());
    assert_eq!(button.style().get_property_value("background").unwrap(), "");
}

#[wasm_bindgen_test]
async fn network_error_still_restores_controls() {
    let (fixture, signup, calls) = signup_fixture(None);
    let form: Element = fixture.get("reserveForm");
    let input: HtmlInputElement = fixture.get("email");
    let button: HtmlButtonElement = fixture.get("join");

    input.set_value("sam@example.com");
    form.dispatch_event(&submit_event()).unwrap();

    TimeoutFuture::new(5).await;
    assert_eq!(calls.get(), 1);
    assert_eq!(button.text_content().unwrap(), FAILED_LABEL);
    assert_eq!(input.value(), "sam@example.com");

    TimeoutFuture::new(80).await;
    assert_eq!(signup.state(), Submission::Idle);
    assert!(!input.disabled());
    assert!(!button.disabled());
    assert_eq!(button.text_content().unwrap(), "Reserve");
}

#[wasm_bindgen_test]
async fn revealed_element_is_not_revealed_again() {
    let fixture = Fixture::new(
        r#"<div class="reveal" id="pinned"
                style="position: fixed; top: 0; left: 0; width: 200px; height: 200px;"></div>"#,
    );
    let _reveal = RevealTrigger::mount(&document()).unwrap();
    let el: HtmlElement = fixture.get("pinned");

    assert!(wait_for(1_000, || dom::has_class(&el, VISIBLE_CLASS)).await);

    // Leave and re-enter the viewport with the class cleared.
    dom::set_class(&el, VISIBLE_CLASS, false);
    dom::set_style(&el, "top", "-5000px");
    TimeoutFuture::new(100).await;
    dom::set_style(&el, "top", "0px");
    TimeoutFuture::new(200).await;

    assert!(!dom::has_class(&el, VISIBLE_CLASS));
}

#[wasm_bindgen_test]
async fn visible_stats_count_up_once_to_target() {
    let fixture = Fixture::new(PINNED_STATS_HTML);
    let counters = CounterAnimator::mount(&window(), &document()).unwrap();
    let locale = window().navigator().language().unwrap_or_else(|| "en-US".into());
    let first: Element = fixture.get("c1");
    let second: Element = fixture.get("c2");

    assert!(wait_for(1_000, || counters.is_armed()).await);
    TimeoutFuture::new(1_900).await;
    assert_eq!(first.text_content().unwrap(), format_count(2400, &locale));
    assert_eq!(second.text_content().unwrap(), format_count(180, &locale));

    // Hiding and showing the section again must not restart the count.
    let section: HtmlElement = fixture.get("stats");
    dom::set_style(&section, "display", "none");
    TimeoutFuture::new(100).await;
    dom::set_style(&section, "display", "");
    TimeoutFuture::new(200).await;
    assert_eq!(first.text_content().unwrap(), format_count(2400, &locale));
    assert_eq!(second.text_content().unwrap(), format_count(180, &locale));
}

#[wasm_bindgen_test]
async fn complete_stops_animation_in_flight() {
    let fixture = Fixture::new(PINNED_STATS_HTML);
    let counters = CounterAnimator::mount(&window(), &document()).unwrap();
    let locale = window().navigator().language().unwrap_or_else(|| "en-US".into());
    let first: Element = fixture.get("c1");
    let second: Element = fixture.get("c2");

    // First counter is mid-animation, second is still waiting on its stagger.
    assert!(wait_for(1_000, || counters.is_armed()).await);
    TimeoutFuture::new(30).await;
    counters.complete();

    for _ in 0..5 {
        TimeoutFuture::new(100).await;
        assert_eq!(first.text_content().unwrap(), format_count(2400, &locale));
        assert_eq!(second.text_content().unwrap(), format_count(180, &locale));
    }
}

#[wasm_bindgen_test]
async fn anchor_lands_section_below_nav() {
    let fixture = Fixture::new(
        r##"<nav id="nav" style="position: fixed; top: 0; left: 0; width: 100%; height: 64px;"></nav>
            <a id="toFeatures" href="#features">Features</a>
            <div style="height: 3000px"></div>
            <section id="features" style="height: 400px"></section>
            <div style="height: 3000px"></div>"##,
    );
    window().scroll_to_with_x_and_y(0.0, 0.0);
    let _anchors = AnchorScroller::mount(&window(), &document());
    let link: Element = fixture.get("toFeatures");
    let features: Element = fixture.get("features");
    let nav: HtmlElement = fixture.get("nav");

    link.dispatch_event(&cancelable_click()).unwrap();
    let scrolled = settled_scroll_y().await;
    assert!(scrolled > 0.0);

    let top = features.get_bounding_client_rect().top();
    let nav_height = nav.offset_height() as f64;
    assert!((top - nav_height).abs() <= 1.0, "section top {} vs nav {}", top, nav_height);

    window().scroll_to_with_x_and_y(0.0, 0.0);
}

#[wasm_bindgen_test]
fn parallax_respects_motion_preference() {
    let fixture = Fixture::new(r#"<img class="hero__bg-img" id="heroBg">"#);
    let parallax = Parallax::mount(&window(), &document());
    let hero: HtmlElement = fixture.get("heroBg");

    assert_eq!(parallax.is_some(), motion_allowed(&window()));

    window().dispatch_event(&Event::new("scroll").unwrap()).unwrap();
    let transform = hero.style().get_property_value("transform").unwrap();
    if parallax.is_some() {
        assert!(transform.starts_with("scale("), "{}", transform);
    } else {
        assert_eq!(transform, "");
    }
}

#[wasm_bindgen_test]
fn parallax_needs_hero_image() {
    assert!(Parallax::mount(&window(), &document()).is_none());
}
