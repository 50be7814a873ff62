use std::env;

use bon::Builder;
use reqwest::Client as ReqwestClient;
use reqwest::header::HeaderValue;
use secrecy::{ExposeSecret as _, SecretString};
use url::Url;

use crate::Result;
use crate::error::Error;

pub const ACCOUNT_API_HOST: &str = "https://accounts.reddit.com/api/";
pub const GRAPHQL_ENDPOINT: &str = "https://gql-fed.reddit.com/";
pub const OAUTH_HOST: &str = "https://oauth.reddit.com/";

pub const SECRET_KEY_VAR: &str = "REDDIT_SECRET_KEY";
pub const USER_AGENT_VAR: &str = "REDDIT_USER_AGENT";
pub const DEVICE_NAME_VAR: &str = "REDDIT_DEVICE_NAME";
pub const CLIENT_ID_VAR: &str = "REDDIT_CLIENT_ID";
pub const PROXY_VAR: &str = "REDDIT_PROXY";
pub const ACCEPT_INVALID_CERTS_VAR: &str = "REDDIT_DANGER_ACCEPT_INVALID_CERTS";
pub const CREATE_COMMENT_ID_VAR: &str = "REDDIT_GQL_CREATE_COMMENT_ID";

/// Settings shared by every client in a bootstrap run.
///
/// TLS verification is controlled here, per client, and never through process
/// wide state.
#[non_exhaustive]
#[derive(Clone, Debug, Builder)]
pub struct ClientConfig {
    /// Shared secret keying both HMAC signatures.
    #[builder(into)]
    pub secret_key: SecretString,
    #[builder(into)]
    pub user_agent: String,
    #[builder(into)]
    pub device_name: String,
    /// OAuth client id presented as `Basic base64("{client_id}:")` on token exchange.
    #[builder(into)]
    pub client_id: String,
    #[builder(default = static_url(ACCOUNT_API_HOST))]
    pub account_host: Url,
    #[builder(default = static_url(GRAPHQL_ENDPOINT))]
    pub graphql_endpoint: Url,
    #[builder(default = static_url(OAUTH_HOST))]
    pub oauth_host: Url,
    /// Forward proxy applied to every request.
    pub proxy: Option<Url>,
    #[builder(default)]
    pub danger_accept_invalid_certs: bool,
    /// Persisted-query id of the `CreateComment` GraphQL operation.
    #[builder(into)]
    pub create_comment_operation_id: Option<String>,
}

impl ClientConfig {
    /// Reads the configuration from `REDDIT_*` environment variables.
    pub fn from_env() -> Result<Self> {
        let proxy = optional_var(PROXY_VAR)?
            .map(|value| {
                Url::parse(&value)
                    .map_err(|e| Error::validation(format!("invalid {PROXY_VAR} `{value}`: {e}")))
            })
            .transpose()?;
        let danger_accept_invalid_certs = optional_var(ACCEPT_INVALID_CERTS_VAR)?
            .map(|value| parse_bool(ACCEPT_INVALID_CERTS_VAR, &value))
            .transpose()?
            .unwrap_or(false);

        let config = Self::builder()
            .secret_key(required_var(SECRET_KEY_VAR)?)
            .user_agent(required_var(USER_AGENT_VAR)?)
            .device_name(required_var(DEVICE_NAME_VAR)?)
            .client_id(required_var(CLIENT_ID_VAR)?)
            .maybe_proxy(proxy)
            .danger_accept_invalid_certs(danger_accept_invalid_certs)
            .maybe_create_comment_operation_id(optional_var(CREATE_COMMENT_ID_VAR)?)
            .build();

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.secret_key.expose_secret().is_empty() {
            return Err(Error::validation("secret key must not be empty"));
        }
        for (name, value) in [
            ("user agent", &self.user_agent),
            ("device name", &self.device_name),
            ("client id", &self.client_id),
        ] {
            if value.trim().is_empty() {
                return Err(Error::validation(format!("{name} must not be empty")));
            }
            HeaderValue::from_str(value)
                .map_err(|e| Error::validation(format!("{name} is not a valid header: {e}")))?;
        }
        for (name, url) in [
            ("account host", &self.account_host),
            ("graphql endpoint", &self.graphql_endpoint),
            ("oauth host", &self.oauth_host),
        ] {
            if url.cannot_be_a_base() {
                return Err(Error::validation(format!("{name} `{url}` is not a base URL")));
            }
        }
        if self
            .create_comment_operation_id
            .as_deref()
            .is_some_and(|id| id.trim().is_empty())
        {
            return Err(Error::validation(
                "create comment operation id must not be blank",
            ));
        }

        Ok(())
    }

    /// Builds the HTTP client every API client of this run shares.
    pub fn http_client(&self) -> Result<ReqwestClient> {
        let mut builder =
            ReqwestClient::builder().danger_accept_invalid_certs(self.danger_accept_invalid_certs);

        if self.danger_accept_invalid_certs {
            #[cfg(feature = "tracing")]
            tracing::warn!("TLS certificate verification is disabled for this client");
        }

        if let Some(proxy) = &self.proxy {
            #[cfg(feature = "tracing")]
            tracing::debug!(proxy = %proxy.host_str().unwrap_or_default(), "routing through proxy");

            builder = builder.proxy(reqwest::Proxy::all(proxy.as_str())?);
        }

        Ok(builder.build()?)
    }
}

/// Ensures `url` ends with `/` so that `Url::join` appends instead of replacing
/// the last path segment.
pub(crate) fn as_base(url: &Url) -> Url {
    let mut base = url.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base
}

fn static_url(url: &str) -> Url {
    Url::parse(url).expect("static URL constants are valid")
}

fn required_var(name: &str) -> Result<String> {
    optional_var(name)?.ok_or_else(|| Error::validation(format!("{name} is not set")))
}

fn optional_var(name: &str) -> Result<Option<String>> {
    match env::var(name) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => {
            Err(Error::validation(format!("{name} is not valid unicode")))
        }
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(Error::validation(format!(
            "invalid {name} `{other}`; expected true|false"
        ))),
    }
}
