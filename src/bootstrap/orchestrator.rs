use secrecy::SecretString;
use serde_json::Value;

use crate::Result;
use crate::account::{AccountClient, AccountResponse, AccountSession, AuthResponse};
use crate::bootstrap::state::{BootstrapPlan, BootstrapReport, BootstrapState, Credential, Entry};
use crate::config::ClientConfig;
use crate::error::Error;
use crate::graph::GraphClient;
use crate::profile::{OAuthProfileClient, Profile, ProfileFetcher};
use crate::types::{DeviceId, DeviceIdPolicy};

/// Drives a single bootstrap run.
///
/// The orchestrator owns the run's device id and credential; the clients it
/// calls only ever borrow them.
#[derive(Debug)]
pub struct BootstrapOrchestrator<P = OAuthProfileClient> {
    accounts: AccountClient,
    graph: GraphClient,
    profiles: P,
    state: BootstrapState,
    device_id: Option<DeviceId>,
    credential: Credential,
}

impl BootstrapOrchestrator<OAuthProfileClient> {
    /// Builds all clients on one shared HTTP client.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = config.http_client()?;

        Ok(Self::from_parts(
            AccountClient::with_client(config, client.clone())?,
            GraphClient::with_client(config, client.clone())?,
            OAuthProfileClient::with_client(config, client)?,
        ))
    }
}

impl<P: ProfileFetcher> BootstrapOrchestrator<P> {
    pub fn from_parts(accounts: AccountClient, graph: GraphClient, profiles: P) -> Self {
        Self {
            accounts,
            graph,
            profiles,
            state: BootstrapState::Start,
            device_id: None,
            credential: Credential::Anonymous,
        }
    }

    #[must_use]
    pub fn state(&self) -> BootstrapState {
        self.state
    }

    #[must_use]
    pub fn device_id(&self) -> Option<&DeviceId> {
        self.device_id.as_ref()
    }

    #[must_use]
    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Runs every step in order, stopping at the first failure.
    ///
    /// A plan the clients cannot carry out is refused before any request is
    /// sent, leaving the run in [`BootstrapState::Start`].
    pub async fn run(&mut self, plan: &BootstrapPlan) -> Result<BootstrapReport> {
        self.check_plan(plan)?;

        let device_id = self.create_device()?.clone();

        let account = match plan.entry {
            Entry::Register => self.register(&plan.username, &plan.password).await?,
            Entry::Login => self.login(&plan.username, &plan.password).await?,
        };
        let cookie = self
            .credential
            .cookie()
            .cloned()
            .ok_or_else(|| Error::validation("run has no session cookie after sign-in"))?;

        let auth = self.exchange_token().await?;
        let profile = self.fetch_profile().await?;

        let comment = match &plan.comment {
            Some(comment) => Some(self.post_comment(&comment.post_id, &comment.message).await?),
            None => None,
        };

        self.finish()?;

        Ok(BootstrapReport {
            device_id,
            account,
            cookie,
            auth,
            profile,
            comment,
            state: self.state,
        })
    }

    pub fn create_device(&mut self) -> Result<&DeviceId> {
        self.expect_state(&[BootstrapState::Start], "create a device")?;

        let device_id = DeviceId::generate();

        #[cfg(feature = "tracing")]
        tracing::info!(device_id = %device_id, "created device identity");

        self.transition(BootstrapState::DeviceCreated);
        Ok(self.device_id.insert(device_id))
    }

    pub async fn register(
        &mut self,
        username: &str,
        password: &SecretString,
    ) -> Result<AccountResponse> {
        self.expect_state(&[BootstrapState::DeviceCreated], "register")?;

        let result = self
            .accounts
            .register(username, password, self.require_device()?)
            .await;
        self.complete_sign_in(result)
    }

    pub async fn login(&mut self, username: &str, password: &SecretString) -> Result<AccountResponse> {
        self.expect_state(&[BootstrapState::DeviceCreated], "log in")?;

        let result = self
            .accounts
            .login(username, password, self.require_device()?)
            .await;
        self.complete_sign_in(result)
    }

    pub async fn exchange_token(&mut self) -> Result<AuthResponse> {
        self.expect_state(&[BootstrapState::Registered], "exchange a token")?;

        let cookie = self
            .credential
            .cookie()
            .ok_or_else(|| Error::validation("no session cookie to exchange"))?;
        let result = self
            .accounts
            .exchange_token(Some(cookie), self.require_device()?)
            .await;

        let auth = self.settle(result)?;
        self.credential = Credential::Authorized(auth.access_token.clone());
        self.transition(BootstrapState::TokenExchanged);

        Ok(auth)
    }

    pub async fn fetch_profile(&mut self) -> Result<Profile> {
        self.expect_state(&[BootstrapState::TokenExchanged], "fetch the profile")?;

        let result = self
            .profiles
            .fetch_profile(self.require_token()?, self.require_device()?)
            .await;

        let profile = self.settle(result)?;
        self.transition(BootstrapState::ProfileFetched);

        Ok(profile)
    }

    /// Posts a comment with the run's own device id.
    pub async fn post_comment(&mut self, post_id: &str, message: &str) -> Result<Value> {
        self.expect_state(&[BootstrapState::ProfileFetched], "post a comment")?;

        let device = DeviceIdPolicy::Explicit(self.require_device()?.clone());
        let result = self
            .graph
            .create_comment(self.require_token()?, device, message, post_id)
            .await;

        let response = self.settle(result)?;
        self.transition(BootstrapState::CommentPosted);

        Ok(response)
    }

    pub fn finish(&mut self) -> Result<()> {
        self.expect_state(
            &[BootstrapState::ProfileFetched, BootstrapState::CommentPosted],
            "finish",
        )?;
        self.transition(BootstrapState::Done);

        Ok(())
    }

    fn check_plan(&self, plan: &BootstrapPlan) -> Result<()> {
        if plan.comment.is_some() && !self.graph.supports_create_comment() {
            return Err(Error::validation(
                "plan posts a comment but no CreateComment operation id is configured",
            ));
        }

        Ok(())
    }

    fn complete_sign_in(&mut self, result: Result<AccountSession>) -> Result<AccountResponse> {
        let session = self.settle(result)?;
        self.credential = Credential::Registered(session.cookie);
        self.transition(BootstrapState::Registered);

        Ok(session.response)
    }

    /// Marks the run as failed when `result` is an error.
    fn settle<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(_err) = &result {
            #[cfg(feature = "tracing")]
            tracing::error!(state = %self.state, error = %_err, "bootstrap step failed");

            self.state = BootstrapState::Failed;
        }
        result
    }

    fn expect_state(&self, allowed: &[BootstrapState], action: &str) -> Result<()> {
        if allowed.contains(&self.state) {
            return Ok(());
        }

        Err(Error::validation(format!(
            "cannot {action} while the run is in state {}",
            self.state
        )))
    }

    fn require_device(&self) -> Result<&DeviceId> {
        self.device_id
            .as_ref()
            .ok_or_else(|| Error::validation("run has no device id"))
    }

    fn require_token(&self) -> Result<&SecretString> {
        self.credential
            .access_token()
            .ok_or_else(|| Error::validation("run has no access token"))
    }

    fn transition(&mut self, next: BootstrapState) {
        #[cfg(feature = "tracing")]
        tracing::info!(from = %self.state, to = %next, "bootstrap transition");

        self.state = next;
    }
}
