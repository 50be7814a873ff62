use std::collections::BTreeSet;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::Timestamp;
use crate::error::Error;

/// OAuth scope requested from `/access_token`.
#[non_exhaustive]
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
)]
pub enum Scope {
    #[serde(rename = "*")]
    #[strum(serialize = "*")]
    All,
    #[serde(rename = "email")]
    #[strum(serialize = "email")]
    Email,
    #[serde(rename = "pii")]
    #[strum(serialize = "pii")]
    Pii,
    /// A scope granted by the server that this crate does not model.
    #[serde(other, skip_serializing)]
    Unknown,
}

impl Scope {
    /// The scopes every token exchange asks for.
    pub const REQUESTED: [Scope; 3] = [Scope::All, Scope::Email, Scope::Pii];
}

#[derive(Debug, Serialize)]
pub(crate) struct CredentialsBody<'a> {
    pub password: &'a str,
    pub username: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct TokenRequest<'a> {
    pub scopes: &'a [Scope],
}

#[non_exhaustive]
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct AccountFailure {
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub explanation: String,
}

impl From<AccountFailure> for Error {
    fn from(failure: AccountFailure) -> Self {
        Error::account(failure.reason, failure.explanation)
    }
}

/// Body of a `/register` or `/login` answer.
#[non_exhaustive]
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub success: bool,
    /// Cookie echoed in the body. Not reliable; use [`AccountSession::cookie`].
    pub cookie: Option<SecretString>,
    pub modhash: Option<String>,
    pub user_id: Option<String>,
    pub error: Option<AccountFailure>,
}

impl AccountResponse {
    /// Turns `success: false` into a [`crate::error::Kind::Account`] error.
    pub(crate) fn into_success(self) -> crate::Result<Self> {
        if self.success {
            return Ok(self);
        }

        Err(self.error.unwrap_or_default().into())
    }
}

/// A successful register/login: the decoded session cookie taken from
/// `set-cookie` and the parsed body.
#[non_exhaustive]
#[derive(Clone, Debug)]
pub struct AccountSession {
    pub cookie: SecretString,
    pub response: AccountResponse,
}

/// Bearer token granted by `/access_token`.
#[non_exhaustive]
#[derive(Clone, Debug, Deserialize)]
pub struct AuthResponse {
    pub access_token: SecretString,
    /// Epoch seconds at which the token stops being accepted.
    pub expiry_ts: Timestamp,
    /// Seconds left at the time of issue.
    pub expires_in: i64,
    #[serde(default)]
    pub scope: BTreeSet<Scope>,
    #[serde(default)]
    pub token_type: String,
}
