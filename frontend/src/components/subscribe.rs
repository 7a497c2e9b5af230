use std::rc::Rc;

use futures::future::{FutureExt, LocalBoxFuture};
use gloo_net::http::Request;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use web_sys::RequestMode;

use crate::config::Integration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscribeOutcome {
    Subscribed,
    AlreadySubscribed,
    Failed,
}

#[derive(Debug, Error)]
pub enum SignupError {
    #[error("request failed: {0}")]
    Network(#[from] gloo_net::Error),
}

/// A newsletter backend the signup form can post to.
pub trait Subscriber {
    fn subscribe(&self, email: &str) -> LocalBoxFuture<'static, Result<SubscribeOutcome, SignupError>>;
}

pub fn from_integration(integration: &Integration) -> Rc<dyn Subscriber> {
    match integration {
        Integration::Api { endpoint, token } => Rc::new(ButtondownApi {
            endpoint: endpoint.clone(),
            token: token.clone(),
        }),
        Integration::Embed { endpoint } => Rc::new(EmbedForm { endpoint: endpoint.clone() }),
    }
}

#[derive(Serialize)]
struct SubscriberRequest<'a> {
    email_address: &'a str,
}

/// Fields of the subscriber API reply that decide the outcome.
#[derive(Debug, Default, Deserialize)]
pub struct SubscriberReply {
    #[serde(default)]
    pub email_address: Option<String>,
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

fn present(value: &Option<serde_json::Value>) -> bool {
    match value {
        None | Some(serde_json::Value::Null) | Some(serde_json::Value::Bool(false)) => false,
        Some(serde_json::Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

impl SubscriberReply {
    pub fn outcome(&self) -> SubscribeOutcome {
        let has_email = self.email_address.as_deref().is_some_and(|e| !e.is_empty());
        if has_email || present(&self.id) {
            SubscribeOutcome::Subscribed
        } else if present(&self.detail) {
            SubscribeOutcome::AlreadySubscribed
        } else {
            SubscribeOutcome::Failed
        }
    }
}

/// Buttondown subscriber API: JSON body, token auth, readable replies.
pub struct ButtondownApi {
    pub endpoint: String,
    pub token: String,
}

impl Subscriber for ButtondownApi {
    fn subscribe(&self, email: &str) -> LocalBoxFuture<'static, Result<SubscribeOutcome, SignupError>> {
        let request = Request::post(&self.endpoint)
            .header("Authorization", &format!("Token {}", self.token))
            .header("Content-Type", "application/json")
            .json(&SubscriberRequest { email_address: email });

        async move {
            let request = request?;
            let response = request.send().await?;
            log::info!("subscriber api answered {}", response.status());
            // Duplicates come back as an error status with a `detail` body,
            // so the body is read whatever the status.
            match response.json::<SubscriberReply>().await {
                Ok(reply) => Ok(reply.outcome()),
                Err(e) => {
                    log::warn!("unreadable subscriber reply: {}", e);
                    Ok(SubscribeOutcome::Failed)
                }
            }
        }
        .boxed_local()
    }
}

pub fn form_body(email: &str) -> String {
    format!("email={}", urlencoding::encode(email))
}

/// Embedded signup form endpoint. Posted without CORS, so the reply is opaque
/// and a completed request is the only success signal.
pub struct EmbedForm {
    pub endpoint: String,
}

impl Subscriber for EmbedForm {
    fn subscribe(&self, email: &str) -> LocalBoxFuture<'static, Result<SubscribeOutcome, SignupError>> {
        let request = Request::post(&self.endpoint)
            .mode(RequestMode::NoCors)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(form_body(email));

        async move {
            request.send().await?;
            Ok(SubscribeOutcome::Subscribed)
        }
        .boxed_local()
    }
}
