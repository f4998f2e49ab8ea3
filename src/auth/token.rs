//! Bearer credential parsing and shape checks.

use axum::http::{header::AUTHORIZATION, HeaderMap};

use crate::error::AccessError;

pub const BEARER_SCHEME: &str = "Bearer";

/// Credential carried by the `Authorization` header.
#[derive(Debug, PartialEq, Eq)]
pub enum Credential<'a> {
    Absent,
    Bearer(&'a str),
}

/// Split the `Authorization` header into scheme and token.
///
/// An empty header counts as absent. Anything other than exactly
/// `Bearer <token>` separated by one space is rejected.
pub fn parse_authorization(headers: &HeaderMap) -> Result<Credential<'_>, AccessError> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Ok(Credential::Absent);
    };

    let value = value.to_str().map_err(|_| AccessError::InvalidCredential)?;
    if value.is_empty() {
        return Ok(Credential::Absent);
    }

    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(BEARER_SCHEME), Some(token), None) => Ok(Credential::Bearer(token)),
        _ => Err(AccessError::InvalidCredential),
    }
}

/// Non-empty and exactly `expected_len` bytes long.
pub fn is_valid_token_shape(token: &str, expected_len: usize) -> bool {
    !token.is_empty() && token.len() == expected_len
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_absent_header() {
        assert_eq!(parse_authorization(&HeaderMap::new()), Ok(Credential::Absent));
        assert_eq!(parse_authorization(&headers("")), Ok(Credential::Absent));
    }

    #[test]
    fn test_bearer_token() {
        assert_eq!(
            parse_authorization(&headers("Bearer abc")),
            Ok(Credential::Bearer("abc"))
        );
    }

    #[test]
    fn test_malformed_headers() {
        for raw in [
            "Bearer",
            "Basic dXNlcjpwYXNz",
            "bearer abc",
            "Bearer abc def",
            "Bearer  abc",
            "abc",
        ] {
            assert_eq!(
                parse_authorization(&headers(raw)),
                Err(AccessError::InvalidCredential),
                "{:?} should be rejected",
                raw
            );
        }
    }

    #[test]
    fn test_bearer_with_empty_token_parses_but_fails_shape() {
        let headers = headers("Bearer ");
        let credential = parse_authorization(&headers).unwrap();
        assert_eq!(credential, Credential::Bearer(""));
        assert!(!is_valid_token_shape("", 26));
    }

    #[test]
    fn test_token_shape() {
        assert!(is_valid_token_shape("Y3QMGX3PJ3WLRL2YRTQGQ6KRHU", 26));
        assert!(!is_valid_token_shape("Y3QMGX3PJ3WLRL2YRTQGQ6KRH", 26));
        assert!(!is_valid_token_shape("Y3QMGX3PJ3WLRL2YRTQGQ6KRHUX", 26));
    }
}
