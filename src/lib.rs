#![cfg_attr(doc, doc = include_str!("../README.md"))]

pub mod account;
pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod graph;
pub mod profile;
pub mod types;

use reqwest::{Client as ReqwestClient, Request, Response};
use serde::de::DeserializeOwned;

use crate::error::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Unix epoch seconds.
pub type Timestamp = i64;

/// Sends `request` and fails with [`error::Kind::Status`] on any non-2xx answer.
///
/// The body of a failed response is read as text and carried in the error;
/// nothing is parsed for business fields before the status check passes.
pub(crate) async fn execute(client: &ReqwestClient, request: Request) -> Result<Response> {
    let method = request.method().clone();
    let path = request.url().path().to_owned();

    #[cfg(feature = "tracing")]
    tracing::debug!(method = %method, path = %path, "sending request");

    let response = client.execute(request).await?;
    let status_code = response.status();

    if !status_code.is_success() {
        let message = failure_body(response.text().await);

        #[cfg(feature = "tracing")]
        tracing::warn!(
            status = %status_code,
            method = %method,
            path = %path,
            message = %message,
            "API request failed"
        );

        return Err(Error::status(status_code, method, path, message));
    }

    Ok(response)
}

/// Text carried by a [`error::Kind::Status`] error. A body that cannot be read
/// still leaves a trace of why in the message.
fn failure_body<E: std::fmt::Display>(body: std::result::Result<String, E>) -> String {
    body.unwrap_or_else(|e| format!("<unreadable body: {e}>"))
}

/// Reads the body of an already status-checked response as JSON.
pub(crate) async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let path = response.url().path().to_owned();
    let body = response.text().await?;

    from_json(&path, &body)
}

pub(crate) async fn request<T: DeserializeOwned>(
    client: &ReqwestClient,
    request: Request,
) -> Result<T> {
    let response = execute(client, request).await?;
    decode(response).await
}

#[cfg(feature = "tracing")]
pub(crate) fn from_json<T: DeserializeOwned>(path: &str, body: &str) -> Result<T> {
    let deserializer = &mut serde_json::Deserializer::from_str(body);
    serde_path_to_error::deserialize(deserializer).map_err(|e| {
        tracing::error!(path, field = %e.path(), "unable to decode response: {}", e.inner());
        Error::malformed(format!(
            "unable to decode response from {path} at `{}`: {}",
            e.path(),
            e.inner()
        ))
    })
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn from_json<T: DeserializeOwned>(path: &str, body: &str) -> Result<T> {
    serde_json::from_str(body)
        .map_err(|e| Error::malformed(format!("unable to decode response from {path}: {e}")))
}
