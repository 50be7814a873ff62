//! Bearer-authenticated GraphQL client.
//!
//! Operations are persisted queries: the request carries only the registered
//! operation `id` and its `variables`. Responses are returned as raw JSON;
//! callers inspect `data` / `errors` themselves.

mod client;
mod types;

pub use client::GraphClient;
pub use types::{CommentContent, CreateCommentInput, CreateCommentVariables, GraphOperation};
