use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ClientError, ClientResult};

pub const DEFAULT_JWT_SECRET_ENV: &str = "DEVSYNC_JWT_SECRET";

/// How a page-load `message` may affect credentials.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalPolicy {
    /// The OAuth sentinel logs in only with a valid `token` alongside it.
    #[default]
    Verified,
    /// The sentinel alone sets the access token flag. Insecure; compatibility only.
    LegacySentinel,
}

/// Client configuration, read from YAML. Every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    #[serde(rename = "credentialsPath")]
    pub credentials_path: PathBuf,
    #[serde(rename = "exportDir")]
    pub export_dir: PathBuf,
    #[serde(rename = "signalPolicy")]
    pub signal_policy: SignalPolicy,
    #[serde(rename = "jwtSecretEnv")]
    pub jwt_secret_env: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let base = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            credentials_path: base.join(".devsync").join("session.json"),
            export_dir: PathBuf::from("."),
            signal_policy: SignalPolicy::default(),
            jwt_secret_env: DEFAULT_JWT_SECRET_ENV.to_string(),
        }
    }
}

impl ClientConfig {
    /// Load from `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> ClientResult<Self> {
        match fs::read_to_string(path) {
            Ok(content) => Self::from_yaml(&content).map_err(|e| match e {
                ClientError::Config { message, .. } => ClientError::Config {
                    path: path.display().to_string(),
                    message,
                },
                other => other,
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(ClientError::Config {
                path: path.display().to_string(),
                message: e.to_string(),
            }),
        }
    }

    pub fn from_yaml(content: &str) -> ClientResult<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| ClientError::Config {
            path: "<inline>".to_string(),
            message: e.to_string(),
        })
    }

    /// JWT secret from the configured env var. `None` when unset or empty; callback
    /// tokens cannot be verified then.
    pub fn jwt_secret(&self) -> Option<String> {
        match std::env::var(&self.jwt_secret_env) {
            Ok(secret) if !secret.is_empty() => Some(secret),
            _ => {
                tracing::warn!("{} not set, token logins disabled", self.jwt_secret_env);
                None
            }
        }
    }
}
