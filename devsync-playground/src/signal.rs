//! Inbound completion signal carried in the page URL (`?message=...`).
//!
//! Reading the signal is separate from acting on it: this module only extracts values.
//! Whether a message may touch credentials is decided by the caller.

use percent_encoding::percent_decode_str;
use url::Url;

use crate::error::{PlaygroundError, PlaygroundResult};
use crate::notify::{NotificationKind, NotificationService};

pub const MESSAGE_PARAM: &str = "message";
pub const TOKEN_PARAM: &str = "token";

/// Message text that announces a completed third-party sign-in.
pub const OAUTH_SUCCESS_SENTINEL: &str = "Google OAuth authentication successful";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InboundSignal {
    pub message: Option<String>,
    pub token: Option<String>,
}

impl InboundSignal {
    /// Parse a full URL, a path with query, or a bare query string (`?a=b`).
    pub fn from_url(input: &str) -> PlaygroundResult<Self> {
        let url = parse_page_url(input)?;
        let mut signal = InboundSignal::default();
        for (key, value) in url.query_pairs() {
            if key == MESSAGE_PARAM && signal.message.is_none() {
                signal.message = Some(value.into_owned());
            } else if key == TOKEN_PARAM && signal.token.is_none() {
                signal.token = Some(value.into_owned());
            }
        }
        signal.message = signal
            .message
            .filter(|m| !m.is_empty())
            .map(|m| decode_component(&m));
        signal.token = signal.token.filter(|t| !t.is_empty());
        Ok(signal)
    }

    pub fn is_oauth_success(&self) -> bool {
        self.message.as_deref() == Some(OAUTH_SUCCESS_SENTINEL)
    }

    /// Show the message, if any, as a success notification.
    pub fn announce(&self, notifier: &NotificationService) -> Option<uuid::Uuid> {
        self.message
            .as_ref()
            .map(|m| notifier.notify(m.clone(), NotificationKind::Success))
    }
}

fn parse_page_url(input: &str) -> PlaygroundResult<Url> {
    let invalid = |reason: String| PlaygroundError::InvalidUrl {
        url: input.to_string(),
        reason,
    };
    match Url::parse(input) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let base = Url::parse("http://localhost/").map_err(|e| invalid(e.to_string()))?;
            base.join(input).map_err(|e| invalid(e.to_string()))
        }
        Err(e) => Err(invalid(e.to_string())),
    }
}

/// Second decoding pass over an already form-decoded value. Falls back to the input
/// when the result is not UTF-8.
fn decode_component(value: &str) -> String {
    match percent_decode_str(value).decode_utf8() {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => value.to_string(),
    }
}
