use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use reqwest::Client as ReqwestClient;
use reqwest::Method;
use reqwest::header::{AUTHORIZATION, COOKIE, HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use secrecy::{ExposeSecret as _, SecretString};
use serde_json::Value;
use url::Url;

use crate::account::cookie::{cookie_header, session_cookie};
use crate::account::types::{
    AccountFailure, AccountResponse, AccountSession, AuthResponse, CredentialsBody, Scope,
    TokenRequest,
};
use crate::auth::{Clock, SignedRequest};
use crate::config::{ClientConfig, as_base};
use crate::error::Error;
use crate::types::DeviceId;
use crate::{Result, Timestamp};

const CLIENT_VENDOR_ID: HeaderName = HeaderName::from_static("client-vendor-id");

const STATIC_HEADERS: [(&str, &str); 5] = [
    ("x-reddit-retry", "algo=no-retries"),
    ("x-reddit-compression", "1"),
    ("x-reddit-qos", "down-rate-mbps=3.200"),
    ("x-reddit-media-codecs", "available-codecs="),
    ("content-type", "application/json; charset=UTF-8"),
];

/// Client for `/register`, `/login` and `/access_token`.
///
/// Holds configuration only. Session cookies and tokens are passed in and
/// returned, never stored.
#[derive(Clone, Debug)]
pub struct AccountClient {
    host: Url,
    secret_key: SecretString,
    user_agent: String,
    basic_auth: SecretString,
    clock: Clock,
    client: ReqwestClient,
}

impl AccountClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Self::with_client(config, config.http_client()?)
    }

    /// Creates the client on top of an existing HTTP client, sharing its pool
    /// and proxy settings.
    pub fn with_client(config: &ClientConfig, client: ReqwestClient) -> Result<Self> {
        config.validate()?;

        let basic_auth = format!("Basic {}", STANDARD.encode(format!("{}:", config.client_id)));

        Ok(Self {
            host: as_base(&config.account_host),
            secret_key: config.secret_key.clone(),
            user_agent: config.user_agent.clone(),
            basic_auth: SecretString::from(basic_auth),
            clock: Clock::System,
            client,
        })
    }

    /// Replaces the signing clock. Use [`Clock::Fixed`] to replay a captured request.
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Creates an account and returns its session cookie.
    pub async fn register(
        &self,
        username: &str,
        password: &SecretString,
        device_id: &DeviceId,
    ) -> Result<AccountSession> {
        self.account_request("register", username, password, device_id)
            .await
    }

    /// Logs in to an existing account and returns its session cookie.
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
        device_id: &DeviceId,
    ) -> Result<AccountSession> {
        self.account_request("login", username, password, device_id)
            .await
    }

    /// Trades a session cookie for a bearer token.
    ///
    /// With no cookie (or an empty one) no `cookie` header is sent and the
    /// server issues a guest token.
    pub async fn exchange_token(
        &self,
        cookie: Option<&SecretString>,
        device_id: &DeviceId,
    ) -> Result<AuthResponse> {
        let body = serde_json::to_string(&TokenRequest {
            scopes: &Scope::REQUESTED,
        })?;

        let mut headers = self.base_headers(device_id)?;
        let mut authorization = HeaderValue::from_str(self.basic_auth.expose_secret())?;
        authorization.set_sensitive(true);
        headers.insert(AUTHORIZATION, authorization);

        match cookie.map(|c| c.expose_secret()) {
            Some(cookie) if !cookie.is_empty() => {
                let mut value = HeaderValue::from_str(&cookie_header(cookie))?;
                value.set_sensitive(true);
                headers.insert(COOKIE, value);
            }
            _ => {
                #[cfg(feature = "tracing")]
                tracing::debug!(device_id = %device_id, "requesting guest token");
            }
        }

        let request = self
            .client
            .request(Method::POST, self.endpoint("access_token")?)
            .headers(headers)
            .body(body)
            .build()?;

        let response = crate::execute(&self.client, request).await?;
        let path = response.url().path().to_owned();
        let content: Value = crate::decode(response).await?;

        if let Some(error) = content.get("error").filter(|e| e.is_object()) {
            let failure: AccountFailure = serde_json::from_value(error.clone()).map_err(|e| {
                Error::malformed(format!("unable to decode error from {path}: {e}"))
            })?;
            return Err(failure.into());
        }

        serde_json::from_value(content)
            .map_err(|e| Error::malformed(format!("unable to decode token from {path}: {e}")))
    }

    /// Serializes and signs a register/login body without sending it.
    pub fn signed_request(
        &self,
        username: &str,
        password: &SecretString,
        device_id: &DeviceId,
        timestamp: Timestamp,
    ) -> Result<SignedRequest> {
        let body = serde_json::to_string(&CredentialsBody {
            password: password.expose_secret(),
            username,
        })?;

        Ok(SignedRequest::new(
            &self.secret_key,
            &self.user_agent,
            device_id,
            body,
            timestamp,
        ))
    }

    async fn account_request(
        &self,
        endpoint: &str,
        username: &str,
        password: &SecretString,
        device_id: &DeviceId,
    ) -> Result<AccountSession> {
        let signed = self.signed_request(username, password, device_id, self.clock.now())?;

        let mut headers = self.base_headers(device_id)?;
        headers.extend(signed.headers()?);

        let request = self
            .client
            .request(Method::POST, self.endpoint(endpoint)?)
            .headers(headers)
            .body(signed.body)
            .build()?;

        let response = crate::execute(&self.client, request).await?;
        let response_headers = response.headers().clone();

        let content = crate::decode::<AccountResponse>(response)
            .await?
            .into_success()?;
        let cookie = session_cookie(&response_headers)?;

        #[cfg(feature = "tracing")]
        tracing::info!(
            endpoint,
            user_id = content.user_id.as_deref().unwrap_or_default(),
            "account request succeeded"
        );

        Ok(AccountSession {
            cookie,
            response: content,
        })
    }

    fn base_headers(&self, device_id: &DeviceId) -> Result<HeaderMap> {
        let mut map = HeaderMap::new();

        for (name, value) in STATIC_HEADERS {
            map.insert(
                HeaderName::from_static(name),
                HeaderValue::from_static(value),
            );
        }
        map.insert(USER_AGENT, HeaderValue::from_str(&self.user_agent)?);
        map.insert(CLIENT_VENDOR_ID, HeaderValue::from_str(device_id.as_str())?);

        Ok(map)
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.host.join(path)?)
    }
}
