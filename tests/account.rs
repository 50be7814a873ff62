mod common;

use httpmock::prelude::*;
use reddit_bootstrap::account::{AccountClient, Scope};
use reddit_bootstrap::auth::{Clock, SIGNED_BODY, SIGNED_RESULT, signed_body, signed_result};
use reddit_bootstrap::error::{Account, Kind, Status};
use reddit_bootstrap::types::DeviceId;
use secrecy::{ExposeSecret as _, SecretString};
use serde_json::json;

use crate::common::{
    BASIC_AUTH, SECRET, SESSION, SESSION_HEADER, SET_COOKIE, TIMESTAMP, USER_AGENT,
};

const USERNAME: &str = "alice_test01";
const BODY: &str = r#"{"password":"Sup3r$ecret!","username":"alice_test01"}"#;

fn password() -> SecretString {
    SecretString::from("Sup3r$ecret!".to_owned())
}

fn client(server: &MockServer) -> anyhow::Result<AccountClient> {
    Ok(AccountClient::new(&common::config(server))?.with_clock(Clock::Fixed(TIMESTAMP)))
}

fn token_body() -> serde_json::Value {
    json!({
        "access_token": "eyJhbGciOiJSUzI1NiJ9.token",
        "expiry_ts": 1_700_086_400,
        "expires_in": 86_400,
        "scope": ["*", "email", "pii"],
        "token_type": "bearer",
    })
}

mod register {
    use super::*;

    #[tokio::test]
    async fn should_sign_and_return_decoded_cookie() -> anyhow::Result<()> {
        let server = MockServer::start_async().await;
        let client = client(&server)?;
        let device = DeviceId::generate();
        let secret = SecretString::from(SECRET.to_owned());

        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/register")
                    .header("client-vendor-id", device.as_str())
                    .header("user-agent", USER_AGENT)
                    .header("x-reddit-retry", "algo=no-retries")
                    .header("content-type", "application/json; charset=UTF-8")
                    .header(SIGNED_BODY, signed_body(&secret, TIMESTAMP, BODY))
                    .header(
                        SIGNED_RESULT,
                        signed_result(&secret, TIMESTAMP, USER_AGENT, &device),
                    )
                    .body(BODY);
                then.status(200)
                    .header("set-cookie", SET_COOKIE)
                    .json_body(json!({
                        "success": true,
                        "cookie": "stale-body-cookie",
                        "modhash": "",
                        "userId": "t2_abc",
                    }));
            })
            .await;

        let session = client.register(USERNAME, &password(), &device).await?;

        mock.assert_async().await;
        assert_eq!(session.cookie.expose_secret(), SESSION);
        assert!(session.response.success, "success flag lost");
        assert_eq!(session.response.user_id.as_deref(), Some("t2_abc"));
        Ok(())
    }

    #[tokio::test]
    async fn failure_should_expose_reason_and_explanation() -> anyhow::Result<()> {
        let server = MockServer::start_async().await;
        let client = client(&server)?;

        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/register");
                then.status(200).json_body(json!({
                    "success": false,
                    "error": { "reason": "BAD_PASSWORD", "explanation": "too short" },
                }));
            })
            .await;

        let err = client
            .register(USERNAME, &password(), &DeviceId::generate())
            .await
            .expect_err("business failure must be an error");

        mock.assert_async().await;
        assert_eq!(err.kind(), Kind::Account);
        let account = err.downcast_ref::<Account>().expect("account error");
        assert_eq!(account.reason, "BAD_PASSWORD");
        assert_eq!(account.explanation, "too short");
        Ok(())
    }

    #[tokio::test]
    async fn non_2xx_should_be_status_error_even_with_business_body() -> anyhow::Result<()> {
        let server = MockServer::start_async().await;
        let client = client(&server)?;
        let body = r#"{"success":false,"error":{"reason":"RATELIMIT","explanation":"slow down"}}"#;

        server
            .mock_async(|when, then| {
                when.method(POST).path("/register");
                then.status(429).body(body);
            })
            .await;

        let err = client
            .register(USERNAME, &password(), &DeviceId::generate())
            .await
            .expect_err("429 must fail");

        assert_eq!(err.kind(), Kind::Status);
        let status = err.downcast_ref::<Status>().expect("status error");
        assert_eq!(status.status_code.as_u16(), 429);
        assert_eq!(status.path, "/register");
        assert_eq!(status.message, body);
        Ok(())
    }

    #[tokio::test]
    async fn missing_set_cookie_should_be_malformed() -> anyhow::Result<()> {
        let server = MockServer::start_async().await;
        let client = client(&server)?;

        server
            .mock_async(|when, then| {
                when.method(POST).path("/register");
                then.status(200)
                    .header("set-cookie", "loid=0000000000; Path=/")
                    .json_body(json!({ "success": true, "userId": "t2_abc" }));
            })
            .await;

        let err = client
            .register(USERNAME, &password(), &DeviceId::generate())
            .await
            .expect_err("no session cookie");

        assert_eq!(err.kind(), Kind::MalformedResponse);
        Ok(())
    }

    #[tokio::test]
    async fn unparseable_body_should_be_malformed() -> anyhow::Result<()> {
        let server = MockServer::start_async().await;
        let client = client(&server)?;

        server
            .mock_async(|when, then| {
                when.method(POST).path("/register");
                then.status(200)
                    .header("set-cookie", SET_COOKIE)
                    .body("<html>maintenance</html>");
            })
            .await;

        let err = client
            .register(USERNAME, &password(), &DeviceId::generate())
            .await
            .expect_err("html body");

        assert_eq!(err.kind(), Kind::MalformedResponse);
        Ok(())
    }
}

mod login {
    use super::*;

    #[tokio::test]
    async fn should_hit_login_endpoint_with_same_contract() -> anyhow::Result<()> {
        let server = MockServer::start_async().await;
        let client = client(&server)?;
        let device = DeviceId::generate();

        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/login")
                    .header("client-vendor-id", device.as_str())
                    .header_exists(SIGNED_BODY)
                    .header_exists(SIGNED_RESULT)
                    .body(BODY);
                then.status(200)
                    .header("set-cookie", SET_COOKIE)
                    .json_body(json!({ "success": true, "modhash": "m", "userId": "t2_abc" }));
            })
            .await;

        let session = client.login(USERNAME, &password(), &device).await?;

        mock.assert_async().await;
        assert_eq!(session.cookie.expose_secret(), SESSION);
        assert_eq!(session.response.modhash.as_deref(), Some("m"));
        Ok(())
    }
}

mod exchange_token {
    use super::*;

    #[tokio::test]
    async fn should_send_encoded_session_cookie() -> anyhow::Result<()> {
        let server = MockServer::start_async().await;
        let client = client(&server)?;
        let device = DeviceId::generate();
        let cookie = SecretString::from(SESSION.to_owned());

        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/access_token")
                    .header("authorization", BASIC_AUTH)
                    .header("cookie", SESSION_HEADER)
                    .header("client-vendor-id", device.as_str())
                    .header_missing("x-hmac-signed-body")
                    .header_missing("x-hmac-signed-result")
                    .json_body(json!({ "scopes": ["*", "email", "pii"] }));
                then.status(200).json_body(token_body());
            })
            .await;

        let auth = client.exchange_token(Some(&cookie), &device).await?;

        mock.assert_async().await;
        assert_eq!(auth.access_token.expose_secret(), "eyJhbGciOiJSUzI1NiJ9.token");
        assert_eq!(auth.expiry_ts, 1_700_086_400);
        assert_eq!(auth.expires_in, 86_400);
        assert_eq!(auth.token_type, "bearer");
        assert_eq!(
            auth.scope.iter().copied().collect::<Vec<_>>(),
            vec![Scope::All, Scope::Email, Scope::Pii]
        );
        Ok(())
    }

    #[tokio::test]
    async fn no_cookie_should_request_guest_token_with_all_scopes() -> anyhow::Result<()> {
        let server = MockServer::start_async().await;
        let client = client(&server)?;
        let device = DeviceId::generate();

        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/access_token")
                    .header("authorization", BASIC_AUTH)
                    .header_missing("cookie")
                    .json_body(json!({ "scopes": ["*", "email", "pii"] }));
                then.status(200).json_body(token_body());
            })
            .await;

        client.exchange_token(None, &device).await?;

        mock.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn empty_cookie_should_behave_like_no_cookie() -> anyhow::Result<()> {
        let server = MockServer::start_async().await;
        let client = client(&server)?;
        let empty = SecretString::from(String::new());

        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/access_token")
                    .header_missing("cookie");
                then.status(200).json_body(token_body());
            })
            .await;

        client
            .exchange_token(Some(&empty), &DeviceId::generate())
            .await?;

        mock.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn non_2xx_should_be_status_error() -> anyhow::Result<()> {
        let server = MockServer::start_async().await;
        let client = client(&server)?;

        server
            .mock_async(|when, then| {
                when.method(POST).path("/access_token");
                then.status(401).body("unauthorized");
            })
            .await;

        let err = client
            .exchange_token(None, &DeviceId::generate())
            .await
            .expect_err("401 must fail");

        assert_eq!(err.kind(), Kind::Status);
        assert_eq!(
            err.downcast_ref::<Status>().expect("status").message,
            "unauthorized"
        );
        Ok(())
    }

    #[tokio::test]
    async fn error_body_should_be_account_error() -> anyhow::Result<()> {
        let server = MockServer::start_async().await;
        let client = client(&server)?;

        server
            .mock_async(|when, then| {
                when.method(POST).path("/access_token");
                then.status(200).json_body(json!({
                    "error": { "reason": "INVALID_SESSION", "explanation": "session expired" },
                }));
            })
            .await;

        let err = client
            .exchange_token(None, &DeviceId::generate())
            .await
            .expect_err("error body");

        assert_eq!(err.kind(), Kind::Account);
        assert_eq!(
            err.downcast_ref::<Account>().expect("account").reason,
            "INVALID_SESSION"
        );
        Ok(())
    }
}
