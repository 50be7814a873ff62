#![allow(dead_code, reason = "each test binary uses a different subset")]

use httpmock::MockServer;
use reddit_bootstrap::Timestamp;
use reddit_bootstrap::config::ClientConfig;
use url::Url;

pub const SECRET: &str = "8c7abaa5f905f70400c81bf3a1a101e75f7210104b1991f0cd5240aa80c4d99d";
pub const USER_AGENT: &str = "Reddit/Version 2024.10.0/Build 1/Android 13";
pub const DEVICE_NAME: &str = "Pixel 7";
pub const CLIENT_ID: &str = "ohXpoqrZYub1kg";
pub const BASIC_AUTH: &str = "Basic b2hYcG9xclpZdWIxa2c6";
pub const TIMESTAMP: Timestamp = 1_700_000_000;
pub const OPERATION_ID: &str = "5a8b2f63c9e1";

/// `set-cookie` value as sent by the account API, and its decoded form.
pub const SET_COOKIE: &str =
    "reddit_session=1234567%2C2024-10-19T10%3A00%3A00%2C0a1b2c3d; Domain=reddit.com; Max-Age=63071999; Path=/; secure; HttpOnly";
pub const SESSION: &str = "1234567,2024-10-19T10:00:00,0a1b2c3d";
pub const SESSION_HEADER: &str = "reddit_session=1234567%2C2024-10-19T10%3A00%3A00%2C0a1b2c3d";

pub fn config(server: &MockServer) -> ClientConfig {
    let base = Url::parse(&server.base_url()).expect("mock server url");

    ClientConfig::builder()
        .secret_key(SECRET.to_owned())
        .user_agent(USER_AGENT)
        .device_name(DEVICE_NAME)
        .client_id(CLIENT_ID)
        .account_host(base.clone())
        .graphql_endpoint(base.join("gql").expect("gql url"))
        .oauth_host(base)
        .create_comment_operation_id(OPERATION_ID)
        .build()
}
