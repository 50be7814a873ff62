//! Runs one bootstrap against the live services.
//!
//! Reads `REDDIT_*` client settings plus `BOOTSTRAP_USERNAME` and
//! `BOOTSTRAP_PASSWORD` from the environment (a `.env` file is honoured).
//! Set `BOOTSTRAP_LOGIN=1` to log in instead of registering, and
//! `BOOTSTRAP_POST_ID` / `BOOTSTRAP_MESSAGE` to post a comment at the end.
//!
//! ```sh
//! RUST_LOG=info cargo run --example bootstrap --features tracing
//! ```

use std::env;

use reddit_bootstrap::bootstrap::{BootstrapOrchestrator, BootstrapPlan, CommentPlan, Entry};
use reddit_bootstrap::config::ClientConfig;
use secrecy::SecretString;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = ClientConfig::from_env()?;
    let mut orchestrator = BootstrapOrchestrator::new(&config)?;

    let entry = match env::var("BOOTSTRAP_LOGIN").as_deref() {
        Ok("1" | "true") => Entry::Login,
        _ => Entry::Register,
    };
    let comment = match (env::var("BOOTSTRAP_POST_ID"), env::var("BOOTSTRAP_MESSAGE")) {
        (Ok(post_id), Ok(message)) => Some(
            CommentPlan::builder()
                .post_id(post_id)
                .message(message)
                .build(),
        ),
        _ => None,
    };

    let plan = BootstrapPlan::builder()
        .username(env::var("BOOTSTRAP_USERNAME")?)
        .password(SecretString::from(env::var("BOOTSTRAP_PASSWORD")?))
        .entry(entry)
        .maybe_comment(comment)
        .build();

    let report = orchestrator.run(&plan).await?;

    info!(
        device_id = %report.device_id,
        user_id = report.account.user_id.as_deref().unwrap_or_default(),
        expires_in = report.auth.expires_in,
        scopes = ?report.auth.scope,
        "bootstrap finished"
    );
    info!(profile = %report.profile, "profile");
    if let Some(comment) = &report.comment {
        info!(response = %comment, "comment");
    }

    Ok(())
}
