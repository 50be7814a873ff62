//! HMAC request signing for the account API.
//!
//! Every `/register` and `/login` call carries two headers. `/access_token` is
//! authenticated with Basic auth and is not signed.
//!
//! | Header | HMAC-SHA256 message |
//! |---|---|
//! | `x-hmac-signed-body` | `Epoch:{ts}\|Body:{body}` |
//! | `x-hmac-signed-result` | `Epoch:{ts}\|User-Agent:{ua}\|Client-Vendor-ID:{device}` |
//!
//! Both are rendered as `1:android:2:{ts}:{hex}` and must share one timestamp,
//! which is why [`SignedRequest`] reads the clock exactly once.

use chrono::Utc;
use hmac::{Hmac, Mac as _};
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::{ExposeSecret as _, SecretString};
use sha2::Sha256;

use crate::types::DeviceId;
use crate::{Result, Timestamp};

pub const SIGNED_BODY: &str = "x-hmac-signed-body";
pub const SIGNED_RESULT: &str = "x-hmac-signed-result";

const SIGNATURE_PREFIX: &str = "1:android:2";

type HmacSha256 = Hmac<Sha256>;

/// Source of the signing timestamp.
///
/// `System` reads the local unix clock; `Fixed` pins every request to one
/// value and exists for replaying captured requests and for tests.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Clock {
    #[default]
    System,
    Fixed(Timestamp),
}

impl Clock {
    #[must_use]
    pub fn now(self) -> Timestamp {
        match self {
            Clock::System => Utc::now().timestamp(),
            Clock::Fixed(timestamp) => timestamp,
        }
    }
}

/// Signs `message` and renders it as `1:android:2:{timestamp}:{hex}`.
#[must_use]
pub fn sign(secret: &SecretString, timestamp: Timestamp, message: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.expose_secret().as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(message.as_bytes());
    let digest = hex::encode(mac.finalize().into_bytes());

    format!("{SIGNATURE_PREFIX}:{timestamp}:{digest}")
}

#[must_use]
pub fn signed_body(secret: &SecretString, timestamp: Timestamp, body: &str) -> String {
    sign(secret, timestamp, &format!("Epoch:{timestamp}|Body:{body}"))
}

#[must_use]
pub fn signed_result(
    secret: &SecretString,
    timestamp: Timestamp,
    user_agent: &str,
    device_id: &DeviceId,
) -> String {
    sign(
        secret,
        timestamp,
        &format!("Epoch:{timestamp}|User-Agent:{user_agent}|Client-Vendor-ID:{device_id}"),
    )
}

/// A serialized body together with both signatures, bound to one timestamp.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedRequest {
    pub timestamp: Timestamp,
    pub body: String,
    pub signed_body: String,
    pub signed_result: String,
}

impl SignedRequest {
    #[must_use]
    pub fn new(
        secret: &SecretString,
        user_agent: &str,
        device_id: &DeviceId,
        body: String,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            signed_body: signed_body(secret, timestamp, &body),
            signed_result: signed_result(secret, timestamp, user_agent, device_id),
            timestamp,
            body,
        }
    }

    pub fn headers(&self) -> Result<HeaderMap> {
        let mut map = HeaderMap::new();

        map.insert(SIGNED_BODY, HeaderValue::from_str(&self.signed_body)?);
        map.insert(SIGNED_RESULT, HeaderValue::from_str(&self.signed_result)?);

        Ok(map)
    }
}
