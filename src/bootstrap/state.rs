use bon::Builder;
use secrecy::SecretString;
use serde_json::Value;
use strum_macros::Display;

use crate::account::{AccountResponse, AuthResponse};
use crate::profile::Profile;
use crate::types::DeviceId;

#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum BootstrapState {
    Start,
    DeviceCreated,
    Registered,
    TokenExchanged,
    ProfileFetched,
    CommentPosted,
    Done,
    Failed,
}

/// Credential held by a run. Each variant is produced by exactly one step and
/// consumed by the next.
#[non_exhaustive]
#[derive(Clone, Debug, Default)]
pub enum Credential {
    #[default]
    Anonymous,
    /// Decoded `reddit_session` cookie.
    Registered(SecretString),
    /// Bearer access token.
    Authorized(SecretString),
}

impl Credential {
    #[must_use]
    pub fn cookie(&self) -> Option<&SecretString> {
        match self {
            Credential::Registered(cookie) => Some(cookie),
            _ => None,
        }
    }

    #[must_use]
    pub fn access_token(&self) -> Option<&SecretString> {
        match self {
            Credential::Authorized(token) => Some(token),
            _ => None,
        }
    }
}

/// How the run obtains its session cookie.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Entry {
    #[default]
    Register,
    Login,
}

#[non_exhaustive]
#[derive(Clone, Debug, Builder)]
pub struct CommentPlan {
    #[builder(into)]
    pub post_id: String,
    #[builder(into)]
    pub message: String,
}

/// Inputs of a full run.
#[non_exhaustive]
#[derive(Clone, Debug, Builder)]
pub struct BootstrapPlan {
    #[builder(into)]
    pub username: String,
    #[builder(into)]
    pub password: SecretString,
    #[builder(default)]
    pub entry: Entry,
    pub comment: Option<CommentPlan>,
}

/// Everything a completed run produced.
#[non_exhaustive]
#[derive(Clone, Debug)]
pub struct BootstrapReport {
    pub device_id: DeviceId,
    pub account: AccountResponse,
    pub cookie: SecretString,
    pub auth: AuthResponse,
    pub profile: Profile,
    pub comment: Option<Value>,
    pub state: BootstrapState,
}
