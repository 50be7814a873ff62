//! Signed client for the account API.
//!
//! Covers the three calls that turn a device id into a bearer token:
//! - `POST /register` and `POST /login`, which answer with a `reddit_session` cookie
//! - `POST /access_token`, which trades that cookie (or nothing, for a guest) for a token

mod client;
mod cookie;
mod types;

pub use client::AccountClient;
pub use cookie::{SESSION_COOKIE, parse_session_cookie, session_cookie};
pub use types::{AccountFailure, AccountResponse, AccountSession, AuthResponse, Scope};
