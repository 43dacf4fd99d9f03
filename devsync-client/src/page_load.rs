//! One-shot page-load handling of the inbound `?message=` signal.
//!
//! Display and credential changes are separate steps. The message is always shown as a
//! success notification; whether the OAuth sentinel may log the user in is decided by
//! [`SignalPolicy`].

use devsync_playground::{InboundSignal, NotificationService};
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::validate_token;
use crate::config::SignalPolicy;
use crate::error::ClientResult;
use crate::session::Session;

/// Access token value written by the legacy sentinel path.
pub const LEGACY_ACCESS_FLAG: &str = "true";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageLoadReport {
    pub notification: Option<Uuid>,
    pub logged_in: bool,
    /// The sentinel arrived but credentials were left alone.
    pub login_refused: Option<String>,
}

pub struct PageLoad<'a> {
    pub policy: SignalPolicy,
    /// Signing secret for callback tokens. Without one, verified logins are refused.
    pub jwt_secret: Option<&'a str>,
}

impl PageLoad<'_> {
    /// Inspect `url` once: announce the message, then apply the login policy.
    pub fn handle(
        &self,
        url: &str,
        notifier: &NotificationService,
        session: &mut Session,
    ) -> ClientResult<PageLoadReport> {
        let signal = InboundSignal::from_url(url)?;
        let mut report = PageLoadReport {
            notification: signal.announce(notifier),
            ..Default::default()
        };

        if signal.is_oauth_success() {
            match self.policy {
                SignalPolicy::LegacySentinel => {
                    warn!("legacy sentinel login: setting access flag without verification");
                    session.login(LEGACY_ACCESS_FLAG, None)?;
                }
                SignalPolicy::Verified => match (signal.token.as_deref(), self.jwt_secret) {
                    (None, _) => {
                        warn!("oauth sentinel without token; ignoring");
                        report.login_refused = Some("no token supplied".to_string());
                    }
                    (Some(_), None) => {
                        warn!("oauth callback token not checked: no signing secret");
                        report.login_refused = Some("no signing secret configured".to_string());
                    }
                    (Some(token), Some(secret)) => match validate_token(token, secret) {
                        Ok(claims) => {
                            info!(sub = %claims.sub, "oauth callback verified");
                            session.login(token, None)?;
                        }
                        Err(e) => {
                            warn!("oauth callback token rejected: {}", e);
                            report.login_refused = Some(e.to_string());
                        }
                    },
                },
            }
        }

        report.logged_in = session.is_logged_in();
        Ok(report)
    }
}
