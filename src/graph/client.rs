use reqwest::Client as ReqwestClient;
use reqwest::Method;
use reqwest::header::{
    ACCEPT_LANGUAGE, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, USER_AGENT,
};
use secrecy::{ExposeSecret as _, SecretString};
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::Result;
use crate::config::ClientConfig;
use crate::error::Error;
use crate::graph::types::{CreateCommentVariables, GraphOperation};
use crate::types::{DeviceId, DeviceIdPolicy};

const CLIENT_VENDOR_ID: HeaderName = HeaderName::from_static("client-vendor-id");
const DEVICE_ID: HeaderName = HeaderName::from_static("x-reddit-device-id");
const DEVICE_NAME: HeaderName = HeaderName::from_static("device-name");

const STATIC_HEADERS: [(&str, &str); 3] = [
    ("x-dev-ad-id", ""),
    ("x-reddit-dpr", "2.0"),
    ("x-reddit-width", "720"),
];

#[derive(Clone, Debug)]
pub struct GraphClient {
    endpoint: Url,
    user_agent: String,
    device_name: String,
    create_comment_id: Option<String>,
    client: ReqwestClient,
}

impl GraphClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Self::with_client(config, config.http_client()?)
    }

    pub fn with_client(config: &ClientConfig, client: ReqwestClient) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            endpoint: config.graphql_endpoint.clone(),
            user_agent: config.user_agent.clone(),
            device_name: config.device_name.clone(),
            create_comment_id: config.create_comment_operation_id.clone(),
            client,
        })
    }

    /// Whether a CreateComment operation id is configured.
    #[must_use]
    pub fn supports_create_comment(&self) -> bool {
        self.create_comment_id.is_some()
    }

    /// Posts a markdown comment on `post_id`.
    ///
    /// The decoded response is returned as is; a GraphQL `errors` array is not
    /// turned into an [`Error`].
    pub async fn create_comment(
        &self,
        access_token: &SecretString,
        device: DeviceIdPolicy,
        message: &str,
        post_id: &str,
    ) -> Result<Value> {
        let id = self.create_comment_id.as_deref().ok_or_else(|| {
            Error::validation("no CreateComment operation id configured for the GraphQL client")
        })?;
        let operation = GraphOperation::new(id, CreateCommentVariables::new(message, post_id));

        self.execute(access_token, device, &operation).await
    }

    /// Sends any persisted operation with bearer authentication.
    pub async fn execute<V: Serialize>(
        &self,
        access_token: &SecretString,
        device: DeviceIdPolicy,
        operation: &GraphOperation<V>,
    ) -> Result<Value> {
        let request = self.build_request(access_token, &device.resolve(), operation)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(operation = %operation.id, "executing GraphQL operation");

        crate::request::<Value>(&self.client, request).await
    }

    fn build_request<V: Serialize>(
        &self,
        access_token: &SecretString,
        device_id: &DeviceId,
        operation: &GraphOperation<V>,
    ) -> Result<reqwest::Request> {
        let body = serde_json::to_string(operation)?;

        Ok(self
            .client
            .request(Method::POST, self.endpoint.clone())
            .headers(self.headers(access_token, device_id)?)
            .body(body)
            .build()?)
    }

    fn headers(&self, access_token: &SecretString, device_id: &DeviceId) -> Result<HeaderMap> {
        let mut map = HeaderMap::new();

        let mut authorization =
            HeaderValue::from_str(&format!("Bearer {}", access_token.expose_secret()))?;
        authorization.set_sensitive(true);
        map.insert(AUTHORIZATION, authorization);

        let device_id = HeaderValue::from_str(device_id.as_str())?;
        map.insert(CLIENT_VENDOR_ID, device_id.clone());
        map.insert(DEVICE_ID, device_id);

        map.insert(USER_AGENT, HeaderValue::from_str(&self.user_agent)?);
        map.insert(DEVICE_NAME, HeaderValue::from_str(&self.device_name)?);
        for (name, value) in STATIC_HEADERS {
            map.insert(
                HeaderName::from_static(name),
                HeaderValue::from_static(value),
            );
        }
        map.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en,en;q=0.9"));
        map.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );

        Ok(map)
    }
}
