use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use reqwest::header::{HeaderMap, SET_COOKIE};
use secrecy::SecretString;

use crate::Result;
use crate::error::Error;

pub const SESSION_COOKIE: &str = "reddit_session";

/// Characters left alone by JavaScript's `encodeURIComponent`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Extracts and percent-decodes the `reddit_session` value from a single
/// `set-cookie` header. Attributes after the first `;` are ignored.
///
/// Returns `Ok(None)` when the header sets some other cookie.
pub fn parse_session_cookie(header: &str) -> Result<Option<String>> {
    let pair = header.split(';').next().unwrap_or_default().trim();
    let Some((name, value)) = pair.split_once('=') else {
        return Ok(None);
    };
    if name.trim() != SESSION_COOKIE {
        return Ok(None);
    }

    let decoded = percent_decode_str(value.trim())
        .decode_utf8()
        .map_err(|e| Error::malformed(format!("{SESSION_COOKIE} cookie is not UTF-8: {e}")))?;
    if decoded.is_empty() {
        return Err(Error::malformed(format!("{SESSION_COOKIE} cookie is empty")));
    }

    Ok(Some(decoded.into_owned()))
}

/// Finds the session cookie among all `set-cookie` headers of a response.
pub fn session_cookie(headers: &HeaderMap) -> Result<SecretString> {
    for value in headers.get_all(SET_COOKIE) {
        let Ok(value) = value.to_str() else {
            continue;
        };
        if let Some(cookie) = parse_session_cookie(value)? {
            return Ok(SecretString::from(cookie));
        }
    }

    Err(Error::malformed(format!(
        "response did not set a `{SESSION_COOKIE}` cookie"
    )))
}

/// Renders the `cookie` request header for a session value.
pub(crate) fn cookie_header(cookie: &str) -> String {
    format!("{SESSION_COOKIE}={}", utf8_percent_encode(cookie, COMPONENT))
}
