//! Service configuration.
//!
//! Configuration can be built in code or read from the environment using the
//! IBM Cloud naming scheme: `<SERVICE>_URL`, `<SERVICE>_APIKEY`,
//! `<SERVICE>_USERNAME`, `<SERVICE>_PASSWORD`, `<SERVICE>_BEARER_TOKEN`,
//! `<SERVICE>_AUTH_TYPE`, `<SERVICE>_AUTH_URL` and `<SERVICE>_DISABLE_SSL`.
//! A credentials file in the same `KEY=value` format is consulted as a
//! fallback: `IBM_CREDENTIALS_FILE` if set, else `./ibm-credentials.env`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::warn;

use crate::auth::{Credentials, APIKEY_USERNAME};
use crate::error::{WatsonError, WatsonResult};

pub const CREDENTIALS_FILE_ENV: &str = "IBM_CREDENTIALS_FILE";
pub const DEFAULT_CREDENTIALS_FILE: &str = "ibm-credentials.env";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Overrides the service's default URL when set.
    pub url: Option<String>,
    pub credentials: Credentials,
    pub disable_ssl_verification: bool,
    pub timeout: Option<Duration>,
    pub default_headers: Vec<(String, String)>,
}

impl ServiceConfig {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            ..Self::default()
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_disable_ssl_verification(mut self, disable: bool) -> Self {
        self.disable_ssl_verification = disable;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// Read configuration for `service_name` from the process environment,
    /// falling back to the credentials file.
    pub fn from_env(service_name: &str) -> WatsonResult<Self> {
        let file = credentials_file_path()
            .map(|path| read_credentials_file(&path))
            .unwrap_or_default();
        Self::from_lookup(service_name, |key| {
            std::env::var(key).ok().or_else(|| file.get(key).cloned())
        })
    }

    /// Read configuration for `service_name` through an arbitrary lookup.
    pub fn from_lookup<F>(service_name: &str, lookup: F) -> WatsonResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let prefix = env_prefix(service_name);
        let get = |suffix: &str| lookup(&format!("{prefix}_{suffix}")).filter(|v| !v.is_empty());

        let auth_type = get("AUTH_TYPE").map(|value| value.to_ascii_lowercase());
        let apikey = get("APIKEY");
        let username = get("USERNAME");
        let password = get("PASSWORD");
        let bearer = get("BEARER_TOKEN");

        let credentials = match auth_type.as_deref() {
            Some("noauth") => Credentials::default(),
            Some("bearertoken") => Credentials {
                bearer_token: bearer,
                ..Credentials::default()
            },
            Some("basic") => Credentials {
                api_key_or_username: username,
                password,
                ..Credentials::default()
            },
            Some("iam") | None => match (apikey, bearer) {
                (Some(key), _) => Credentials::api_key(key),
                (None, Some(token)) if auth_type.is_none() => Credentials::bearer(token),
                _ => match (username, password) {
                    (Some(user), Some(password)) if auth_type.is_none() || user == APIKEY_USERNAME => {
                        Credentials::basic(user, password)
                    }
                    _ => Credentials::default(),
                },
            },
            Some(other) => {
                return Err(WatsonError::Configuration(format!(
                    "unsupported {prefix}_AUTH_TYPE `{other}`"
                )))
            }
        };
        let credentials = Credentials {
            iam_url: get("AUTH_URL"),
            ..credentials
        };

        let disable_ssl_verification = match get("DISABLE_SSL").as_deref() {
            None => false,
            Some(value) => parse_bool(value).ok_or_else(|| {
                WatsonError::Configuration(format!("{prefix}_DISABLE_SSL must be true or false"))
            })?,
        };

        Ok(Self {
            url: get("URL"),
            credentials,
            disable_ssl_verification,
            ..Self::default()
        })
    }
}

/// `visual_recognition` -> `VISUAL_RECOGNITION`.
pub fn env_prefix(service_name: &str) -> String {
    service_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
        .collect()
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

fn credentials_file_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CREDENTIALS_FILE_ENV) {
        return Some(PathBuf::from(path));
    }
    let local = PathBuf::from(DEFAULT_CREDENTIALS_FILE);
    local.is_file().then_some(local)
}

/// Entries of a `KEY=value` credentials file; unreadable files are skipped.
pub fn read_credentials_file(path: &Path) -> HashMap<String, String> {
    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot read credentials file");
            return HashMap::new();
        }
    };
    let mut entries = HashMap::new();
    for item in iter {
        match item {
            Ok((key, value)) => {
                entries.insert(key, value);
            }
            Err(e) => warn!(path = %path.display(), error = %e, "skipping malformed credentials line"),
        }
    }
    entries
}
