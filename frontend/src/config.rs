use web_sys::Element;

pub const BUTTONDOWN_API_URL: &str = "https://api.buttondown.com/v1/subscribers";

/// Delay before the signup button returns to its idle label.
pub const RESET_DELAY_MS: u32 = 4_000;

#[cfg(debug_assertions)]
pub fn get_embed_url() -> &'static str {
    "http://localhost:8765/subscribe"  // Local stand-in while developing the page
}

#[cfg(not(debug_assertions))]
pub fn get_embed_url() -> &'static str {
    "https://buttondown.com/api/emails/embed-subscribe/carry"
}

/// Token baked in at build time, e.g. `CARRY_BUTTONDOWN_TOKEN=... trunk build --release`.
pub fn get_api_token() -> Option<&'static str> {
    option_env!("CARRY_BUTTONDOWN_TOKEN").filter(|t| !t.is_empty())
}

#[derive(Debug, Clone, PartialEq)]
pub enum Integration {
    /// JSON POST with a bearer-style token; replies tell success and duplicates apart.
    Api { endpoint: String, token: String },
    /// Plain form post in no-cors mode; the reply is opaque.
    Embed { endpoint: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignupConfig {
    pub integration: Integration,
    pub reset_delay_ms: u32,
}

/// Raw `data-*` values found on the signup form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormAttrs {
    pub subscribe: Option<String>,
    pub endpoint: Option<String>,
    pub token: Option<String>,
    pub reset_ms: Option<String>,
}

impl FormAttrs {
    pub fn read(form: &Element) -> Self {
        let attr = |name: &str| {
            form.get_attribute(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        Self {
            subscribe: attr("data-subscribe"),
            endpoint: attr("data-endpoint"),
            token: attr("data-token"),
            reset_ms: attr("data-reset-ms"),
        }
    }
}

impl SignupConfig {
    /// Picks the integration from the form attributes, falling back to build defaults.
    /// An `api` choice without any token degrades to the embed form.
    pub fn resolve(attrs: &FormAttrs, default_token: Option<&str>) -> Self {
        let token = attrs.token.clone().or_else(|| default_token.map(str::to_string));
        let wants_api = match attrs.subscribe.as_deref() {
            Some("embed") => false,
            Some("api") => true,
            Some(other) => {
                log::warn!("unknown data-subscribe value {:?}, using default", other);
                token.is_some()
            }
            None => token.is_some(),
        };

        let integration = match (wants_api, token) {
            (true, Some(token)) => Integration::Api {
                endpoint: attrs.endpoint.clone().unwrap_or_else(|| BUTTONDOWN_API_URL.to_string()),
                token,
            },
            (true, None) => {
                log::warn!("api signup requested without a token, using embed form");
                Integration::Embed { endpoint: get_embed_url().to_string() }
            }
            (false, _) => Integration::Embed {
                endpoint: attrs.endpoint.clone().unwrap_or_else(|| get_embed_url().to_string()),
            },
        };

        let reset_delay_ms = attrs
            .reset_ms
            .as_deref()
            .and_then(|v| v.parse().ok())
            .unwrap_or(RESET_DELAY_MS);

        Self { integration, reset_delay_ms }
    }

    pub fn from_form(form: &Element) -> Self {
        Self::resolve(&FormAttrs::read(form), get_api_token())
    }
}
