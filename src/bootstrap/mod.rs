//! One bootstrap run, from a fresh device id to an authorized GraphQL call.
//!
//! ```text
//! Start -> DeviceCreated -> Registered -> TokenExchanged -> ProfileFetched
//!       -> (CommentPosted) -> Done
//! ```
//!
//! Steps are strictly sequential. The first failing step moves the run to
//! `Failed` and every later step is refused.

mod orchestrator;
mod state;

pub use orchestrator::BootstrapOrchestrator;
pub use state::{BootstrapPlan, BootstrapReport, BootstrapState, CommentPlan, Credential, Entry};
