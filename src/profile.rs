//! Profile lookup, the step between token exchange and the first GraphQL call.

use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use reqwest::Method;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use secrecy::{ExposeSecret as _, SecretString};
use serde_json::Value;
use url::Url;

use crate::Result;
use crate::config::{ClientConfig, as_base};
use crate::types::DeviceId;

/// Opaque profile payload.
pub type Profile = Value;

#[async_trait]
pub trait ProfileFetcher: Send + Sync {
    async fn fetch_profile(&self, access_token: &SecretString, device_id: &DeviceId)
    -> Result<Profile>;
}

/// Reads `GET /api/v1/me` from the OAuth host.
#[derive(Clone, Debug)]
pub struct OAuthProfileClient {
    host: Url,
    user_agent: String,
    client: ReqwestClient,
}

impl OAuthProfileClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Self::with_client(config, config.http_client()?)
    }

    pub fn with_client(config: &ClientConfig, client: ReqwestClient) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            host: as_base(&config.oauth_host),
            user_agent: config.user_agent.clone(),
            client,
        })
    }
}

#[async_trait]
impl ProfileFetcher for OAuthProfileClient {
    async fn fetch_profile(
        &self,
        access_token: &SecretString,
        device_id: &DeviceId,
    ) -> Result<Profile> {
        let mut headers = HeaderMap::new();
        let mut authorization =
            HeaderValue::from_str(&format!("Bearer {}", access_token.expose_secret()))?;
        authorization.set_sensitive(true);
        headers.insert(AUTHORIZATION, authorization);
        headers.insert(
            HeaderName::from_static("client-vendor-id"),
            HeaderValue::from_str(device_id.as_str())?,
        );
        headers.insert(USER_AGENT, HeaderValue::from_str(&self.user_agent)?);

        let request = self
            .client
            .request(Method::GET, self.host.join("api/v1/me")?)
            .headers(headers)
            .build()?;

        crate::request::<Profile>(&self.client, request).await
    }
}
