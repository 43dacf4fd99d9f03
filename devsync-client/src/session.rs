//! Process-wide login state.
//!
//! Read once when the session is opened; afterwards only `login`/`logout` change it.
//! External edits to the store are not picked up.

use devsync_playground::NotificationService;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::credentials::{CredentialStore, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
use crate::error::{ClientError, ClientResult};

pub const LOGIN_SUCCESS_MSG: &str = "User login successfully";

/// Body of the backend's `/user/login` reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub msg: String,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

pub struct Session {
    store: Box<dyn CredentialStore>,
    logged_in: bool,
}

impl Session {
    pub fn open(store: impl CredentialStore + 'static) -> ClientResult<Self> {
        let present = |v: Option<String>| v.is_some_and(|s| !s.is_empty());
        let logged_in =
            present(store.get(ACCESS_TOKEN_KEY)?) || present(store.get(REFRESH_TOKEN_KEY)?);
        Ok(Self {
            store: Box::new(store),
            logged_in,
        })
    }

    pub fn is_logged_in(&self) -> bool {
        self.logged_in
    }

    pub fn login(&mut self, access_token: &str, refresh_token: Option<&str>) -> ClientResult<()> {
        self.store.set(ACCESS_TOKEN_KEY, access_token)?;
        if let Some(refresh) = refresh_token {
            self.store.set(REFRESH_TOKEN_KEY, refresh)?;
        }
        self.logged_in = true;
        info!("session logged in");
        Ok(())
    }

    pub fn logout(&mut self) -> ClientResult<()> {
        self.store.remove(ACCESS_TOKEN_KEY)?;
        self.store.remove(REFRESH_TOKEN_KEY)?;
        self.logged_in = false;
        info!("session logged out");
        Ok(())
    }

    pub fn access_token(&self) -> ClientResult<Option<String>> {
        self.store.get(ACCESS_TOKEN_KEY)
    }

    /// Store both tokens if the backend accepted the credentials.
    pub fn apply_login_response(&mut self, response: &LoginResponse) -> ClientResult<()> {
        if response.msg != LOGIN_SUCCESS_MSG {
            return Err(ClientError::LoginRejected(response.msg.clone()));
        }
        let access = response
            .access_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ClientError::LoginRejected("response has no access_token".to_string()))?;
        self.login(access, response.refresh_token.as_deref())
    }

    /// [`apply_login_response`](Self::apply_login_response) with the outcome shown as a
    /// notification: the backend's message either way.
    pub fn complete_login(
        &mut self,
        response: &LoginResponse,
        notifier: &NotificationService,
    ) -> ClientResult<()> {
        match self.apply_login_response(response) {
            Ok(()) => {
                notifier.success(response.msg.clone());
                Ok(())
            }
            Err(e) => {
                let text = match &e {
                    ClientError::LoginRejected(msg) => msg.clone(),
                    other => other.to_string(),
                };
                notifier.error(text);
                Err(e)
            }
        }
    }
}
