use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::future::TimeoutFuture;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, Event, HtmlButtonElement, HtmlInputElement};

use super::subscribe::{self, SubscribeOutcome, Subscriber};
use crate::config::SignupConfig;
use crate::dom::{self, Listener};

pub const FORM_ID: &str = "reserveForm";
pub const INPUT_SELECTOR: &str = ".cta__input";
pub const BUTTON_SELECTOR: &str = ".cta__btn";

pub const BUSY_LABEL: &str = "Joining...";
pub const SUBSCRIBED_LABEL: &str = "You're on the list!";
pub const DUPLICATE_LABEL: &str = "Already signed up!";
pub const FAILED_LABEL: &str = "Something went wrong";
const SUCCESS_TINT: &str = "var(--color-secondary)";

/// Lifecycle of one signup attempt. Submits are only taken from `Idle`, so a
/// second click while a request or the cooldown is pending is dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Submission {
    #[default]
    Idle,
    Submitting,
    Settled(SubscribeOutcome),
}

impl Submission {
    /// Returns the trimmed address when the attempt should go ahead.
    pub fn begin(&mut self, raw_email: &str) -> Option<String> {
        let email = raw_email.trim();
        if email.is_empty() || *self != Submission::Idle {
            return None;
        }
        *self = Submission::Submitting;
        Some(email.to_string())
    }

    pub fn settle(&mut self, outcome: SubscribeOutcome) {
        if *self == Submission::Submitting {
            *self = Submission::Settled(outcome);
        }
    }

    pub fn reset(&mut self) {
        *self = Submission::Idle;
    }
}

pub fn outcome_label(outcome: SubscribeOutcome) -> &'static str {
    match outcome {
        SubscribeOutcome::Subscribed => SUBSCRIBED_LABEL,
        SubscribeOutcome::AlreadySubscribed => DUPLICATE_LABEL,
        SubscribeOutcome::Failed => FAILED_LABEL,
    }
}

struct FormParts {
    input: HtmlInputElement,
    button: HtmlButtonElement,
    state: RefCell<Submission>,
    subscriber: Rc<dyn Subscriber>,
    reset_delay_ms: u32,
}

impl FormParts {
    fn set_busy(&self, busy: bool) {
        self.input.set_disabled(busy);
        self.button.set_disabled(busy);
    }

    fn show_outcome(&self, outcome: SubscribeOutcome) {
        self.button.set_text_content(Some(outcome_label(outcome)));
        if outcome != SubscribeOutcome::Failed {
            dom::set_style(&self.button, "background", SUCCESS_TINT);
            self.input.set_value("");
        }
    }

    fn restore(&self, idle_label: &str) {
        self.button.set_text_content(Some(idle_label));
        dom::set_style(&self.button, "background", "");
        self.set_busy(false);
        self.state.borrow_mut().reset();
    }
}

fn on_submit(parts: &Rc<FormParts>, event: Event) {
    event.prevent_default();

    let Some(email) = parts.state.borrow_mut().begin(&parts.input.value()) else {
        log::debug!("signup submit ignored");
        return;
    };

    let idle_label = parts.button.text_content().unwrap_or_default();
    parts.button.set_text_content(Some(BUSY_LABEL));
    parts.set_busy(true);

    let parts = parts.clone();
    spawn_local(async move {
        let outcome = match parts.subscriber.subscribe(&email).await {
            Ok(outcome) => outcome,
            Err(e) => {
                log::warn!("signup failed: {}", e);
                SubscribeOutcome::Failed
            }
        };
        log::info!("signup finished: {:?}", outcome);
        parts.state.borrow_mut().settle(outcome);
        parts.show_outcome(outcome);

        TimeoutFuture::new(parts.reset_delay_ms).await;
        parts.restore(&idle_label);
    });
}

/// Newsletter signup in the reserve section.
pub struct SignupForm {
    parts: Rc<FormParts>,
    _submit: Option<Listener<Event>>,
}

impl SignupForm {
    pub fn mount(document: &Document) -> Option<Self> {
        let Some(form) = document.get_element_by_id(FORM_ID) else {
            log::debug!("no #{} form, signup disabled", FORM_ID);
            return None;
        };
        let config = SignupConfig::from_form(&form);
        log::info!("signup via {:?}", config.integration);
        Self::with_subscriber(
            &form,
            subscribe::from_integration(&config.integration),
            config.reset_delay_ms,
        )
    }

    pub fn with_subscriber(
        form: &Element,
        subscriber: Rc<dyn Subscriber>,
        reset_delay_ms: u32,
    ) -> Option<Self> {
        let (Some(input), Some(button)) = (
            dom::query::<HtmlInputElement>(form, INPUT_SELECTOR),
            dom::query::<HtmlButtonElement>(form, BUTTON_SELECTOR),
        ) else {
            log::debug!("signup form is missing its input or button");
            return None;
        };

        let parts = Rc::new(FormParts {
            input,
            button,
            state: RefCell::new(Submission::Idle),
            subscriber,
            reset_delay_ms,
        });

        let submit = {
            let parts = parts.clone();
            dom::listen(form, "submit", move |event: Event| on_submit(&parts, event))
        };

        Some(Self { parts, _submit: submit })
    }

    pub fn state(&self) -> Submission {
        *self.parts.state.borrow()
    }
}
