//! Credentials and authentication.
//!
//! # Design
//! `Credentials` is what the caller configures; `Authenticator` is what the
//! connector uses on every request. Basic and bearer schemes are static
//! header values. IAM exchanges an API key for an access token: the token
//! request and response are plain `HttpRequest` / `HttpResponse` values, so
//! the exchange runs through whatever `Transport` the connector owns. The
//! cached token is the only mutable state shared between in-flight calls.

use std::fmt;
use std::time::{Duration, Instant};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use parking_lot::Mutex;
use serde::Deserialize;
use tracing::debug;

use crate::error::{WatsonError, WatsonResult};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::Transport;

/// IBM Cloud IAM token endpoint.
pub const DEFAULT_IAM_URL: &str = "https://iam.cloud.ibm.com/identity/token";

/// Username that marks the password as an IAM API key.
pub const APIKEY_USERNAME: &str = "apikey";

const IAM_GRANT_TYPE: &str = "urn:ibm:params:oauth:grant-type:apikey";

/// Tokens are refreshed once they are this close to expiry.
const REFRESH_WINDOW: Duration = Duration::from_secs(300);

/// Lifetime assumed when the IAM response omits `expires_in`.
const DEFAULT_TOKEN_LIFETIME: u64 = 3600;

#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub api_key_or_username: Option<String>,
    pub password: Option<String>,
    pub bearer_token: Option<String>,
    pub iam_url: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key_or_username", &self.api_key_or_username.as_ref().map(|_| "***"))
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "***"))
            .field("iam_url", &self.iam_url)
            .finish()
    }
}

impl Credentials {
    pub fn api_key(key: impl Into<String>) -> Self {
        Self {
            api_key_or_username: Some(key.into()),
            ..Self::default()
        }
    }

    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            api_key_or_username: Some(username.into()),
            password: Some(password.into()),
            ..Self::default()
        }
    }

    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            bearer_token: Some(token.into()),
            ..Self::default()
        }
    }

    pub fn with_iam_url(mut self, url: impl Into<String>) -> Self {
        self.iam_url = Some(url.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        non_empty(&self.api_key_or_username).is_none() && non_empty(&self.bearer_token).is_none()
    }

    /// Reject values pasted with their surrounding braces or quotes.
    pub fn validate(&self) -> WatsonResult<()> {
        let values = [
            ("username or API key", &self.api_key_or_username),
            ("password", &self.password),
            ("bearer token", &self.bearer_token),
        ];
        for (label, value) in values {
            if let Some(value) = value {
                if has_bad_delimiters(value) {
                    return Err(WatsonError::Configuration(format!(
                        "the {label} shouldn't start or end with curly brackets or quotes; \
                         remove any surrounding {{, }}, or \" characters"
                    )));
                }
            }
        }
        Ok(())
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}

fn has_bad_delimiters(value: &str) -> bool {
    let bad = ['{', '}', '"'];
    value.starts_with(bad) || value.ends_with(bad)
}

/// How a connector authenticates its requests.
pub enum Authenticator {
    Basic { username: String, password: String },
    BearerToken(String),
    Iam(IamTokenManager),
}

impl fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Authenticator::Basic { username, .. } => {
                f.debug_struct("Basic").field("username", username).finish()
            }
            Authenticator::BearerToken(_) => f.write_str("BearerToken"),
            Authenticator::Iam(manager) => f.debug_tuple("Iam").field(&manager.url).finish(),
        }
    }
}

impl Authenticator {
    /// Pick a scheme from configured credentials. `None` means nothing usable
    /// is configured; malformed values are an error.
    pub fn from_credentials(credentials: &Credentials) -> WatsonResult<Option<Self>> {
        credentials.validate()?;
        if let Some(token) = non_empty(&credentials.bearer_token) {
            return Ok(Some(Authenticator::BearerToken(token.to_string())));
        }
        let Some(user_or_key) = non_empty(&credentials.api_key_or_username) else {
            return Ok(None);
        };
        let iam_url = credentials
            .iam_url
            .clone()
            .unwrap_or_else(|| DEFAULT_IAM_URL.to_string());
        match non_empty(&credentials.password) {
            Some(password) if user_or_key == APIKEY_USERNAME => {
                Ok(Some(Authenticator::Iam(IamTokenManager::new(password, iam_url))))
            }
            Some(password) => Ok(Some(Authenticator::Basic {
                username: user_or_key.to_string(),
                password: password.to_string(),
            })),
            None => Ok(Some(Authenticator::Iam(IamTokenManager::new(user_or_key, iam_url)))),
        }
    }

    /// Value for the `Authorization` header, fetching an IAM token through
    /// `transport` when the cached one is missing or about to expire.
    pub fn authorization(&self, transport: &dyn Transport) -> WatsonResult<String> {
        match self {
            Authenticator::Basic { username, password } => Ok(format!(
                "Basic {}",
                STANDARD.encode(format!("{username}:{password}"))
            )),
            Authenticator::BearerToken(token) => Ok(format!("Bearer {token}")),
            Authenticator::Iam(manager) => Ok(format!("Bearer {}", manager.token(transport)?)),
        }
    }
}

#[derive(Debug, Clone)]
struct IamToken {
    access_token: String,
    expires_at: Instant,
}

impl IamToken {
    fn needs_refresh(&self) -> bool {
        self.expires_at <= Instant::now() + REFRESH_WINDOW
    }
}

#[derive(Debug, Deserialize)]
struct IamTokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: u64,
}

/// Exchanges an API key for IAM access tokens and caches the result.
pub struct IamTokenManager {
    api_key: String,
    url: String,
    cached: Mutex<Option<IamToken>>,
}

impl IamTokenManager {
    pub fn new(api_key: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            url: url.into(),
            cached: Mutex::new(None),
        }
    }

    pub fn build_token_request(&self) -> HttpRequest {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("grant_type", IAM_GRANT_TYPE)
            .append_pair("apikey", &self.api_key)
            .append_pair("response_type", "cloud_iam")
            .finish();
        HttpRequest {
            method: HttpMethod::Post,
            url: self.url.clone(),
            headers: vec![
                (
                    "Content-Type".to_string(),
                    "application/x-www-form-urlencoded".to_string(),
                ),
                ("Accept".to_string(), "application/json".to_string()),
            ],
            body: Some(body.into_bytes()),
        }
    }

    fn parse_token_response(&self, response: HttpResponse) -> WatsonResult<IamToken> {
        if !response.is_success() {
            return Err(WatsonError::Configuration(format!(
                "IAM token request failed with status {}: {}",
                response.status,
                String::from_utf8_lossy(&response.body)
            )));
        }
        let parsed: IamTokenResponse = serde_json::from_slice(&response.body)
            .map_err(|e| WatsonError::Decode(format!("IAM token response: {e}")))?;
        let lifetime = if parsed.expires_in > 0 {
            parsed.expires_in
        } else {
            DEFAULT_TOKEN_LIFETIME
        };
        debug!(expires_in = lifetime, "IAM token fetched");
        Ok(IamToken {
            access_token: parsed.access_token,
            expires_at: Instant::now() + Duration::from_secs(lifetime),
        })
    }

    /// Current access token, refreshed through `transport` when needed.
    ///
    /// The lock is held across the exchange so concurrent calls wait for one
    /// refresh instead of each starting their own.
    pub fn token(&self, transport: &dyn Transport) -> WatsonResult<String> {
        let mut cached = self.cached.lock();
        if let Some(token) = cached.as_ref().filter(|token| !token.needs_refresh()) {
            return Ok(token.access_token.clone());
        }
        debug!(url = %self.url, "requesting IAM token");
        let response = transport.execute(&self.build_token_request())?;
        let token = self.parse_token_response(response)?;
        let access_token = token.access_token.clone();
        *cached = Some(token);
        Ok(access_token)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct TokenIssuer {
        calls: AtomicUsize,
        expires_in: u64,
    }

    impl Transport for TokenIssuer {
        fn execute(&self, request: &HttpRequest) -> WatsonResult<HttpResponse> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            assert_eq!(request.url, "https://iam.test/identity/token");
            let body = String::from_utf8(request.body.clone().unwrap()).unwrap();
            assert!(body.contains("apikey=my-key"));
            Ok(HttpResponse {
                status: 200,
                headers: Vec::new(),
                body: format!(r#"{{"access_token":"tok-{n}","expires_in":{}}}"#, self.expires_in)
                    .into_bytes(),
            })
        }
    }

    fn issuer(expires_in: u64) -> TokenIssuer {
        TokenIssuer {
            calls: AtomicUsize::new(0),
            expires_in,
        }
    }

    #[test]
    fn basic_header_is_base64() {
        let auth = Authenticator::from_credentials(&Credentials::basic("user", "pass"))
            .unwrap()
            .unwrap();
        assert_eq!(auth.authorization(&issuer(0)).unwrap(), "Basic dXNlcjpwYXNz");
    }

    #[test]
    fn bearer_token_wins_over_api_key() {
        let credentials = Credentials {
            bearer_token: Some("abc".into()),
            ..Credentials::api_key("key")
        };
        let auth = Authenticator::from_credentials(&credentials).unwrap().unwrap();
        assert_eq!(auth.authorization(&issuer(0)).unwrap(), "Bearer abc");
    }

    #[test]
    fn apikey_username_means_iam() {
        let auth = Authenticator::from_credentials(&Credentials::basic("apikey", "secret"))
            .unwrap()
            .unwrap();
        assert!(matches!(auth, Authenticator::Iam(_)));
    }

    #[test]
    fn no_credentials_yields_none() {
        assert!(Authenticator::from_credentials(&Credentials::default())
            .unwrap()
            .is_none());
        assert!(Credentials::default().is_empty());
    }

    #[test]
    fn braces_and_quotes_are_rejected() {
        for bad in ["{key}", "\"key\"", "key}"] {
            let err = Authenticator::from_credentials(&Credentials::api_key(bad)).unwrap_err();
            assert!(matches!(err, WatsonError::Configuration(_)), "{bad}");
        }
    }

    #[test]
    fn iam_token_is_cached_until_near_expiry() {
        let manager = IamTokenManager::new("my-key", "https://iam.test/identity/token");
        let transport = issuer(3600);
        assert_eq!(manager.token(&transport).unwrap(), "tok-1");
        assert_eq!(manager.token(&transport).unwrap(), "tok-1");
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn short_lived_iam_token_is_refreshed() {
        let manager = IamTokenManager::new("my-key", "https://iam.test/identity/token");
        let transport = issuer(60);
        assert_eq!(manager.token(&transport).unwrap(), "tok-1");
        assert_eq!(manager.token(&transport).unwrap(), "tok-2");
    }

    #[test]
    fn failed_token_exchange_is_reported() {
        struct Denied;
        impl Transport for Denied {
            fn execute(&self, _: &HttpRequest) -> WatsonResult<HttpResponse> {
                Ok(HttpResponse {
                    status: 400,
                    headers: Vec::new(),
                    body: br#"{"errorMessage":"Provided API key could not be found"}"#.to_vec(),
                })
            }
        }
        let manager = IamTokenManager::new("nope", DEFAULT_IAM_URL);
        assert!(matches!(manager.token(&Denied), Err(WatsonError::Configuration(_))));
    }

    #[test]
    fn debug_output_hides_secrets() {
        let rendered = format!("{:?}", Credentials::basic("user", "hunter2"));
        assert!(!rendered.contains("hunter2"));
    }
}
