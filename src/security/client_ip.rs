//! Effective client address resolution.
//!
//! # Design Decisions
//! - The right-most valid `X-Forwarded-For` hop wins, the one our own proxy appended
//! - Otherwise `X-Real-IP` when it holds a valid address
//! - Headers are ignored entirely unless forwarded headers are trusted
//! - Falls back to the socket peer address

use std::net::{IpAddr, SocketAddr};

use axum::{
    extract::ConnectInfo,
    http::{HeaderMap, Request},
};

pub const X_REAL_IP: &str = "x-real-ip";
pub const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Identity used to key rate limit state for this request.
pub fn client_identity<B>(request: &Request<B>, trust_forwarded: bool) -> String {
    if trust_forwarded {
        if let Some(ip) = forwarded_ip(request.headers()) {
            return ip.to_string();
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn forwarded_ip(headers: &HeaderMap) -> Option<IpAddr> {
    let forwarded: Option<IpAddr> = headers
        .get(X_FORWARDED_FOR)
        .and_then(|v| v.to_str().ok())
        .and_then(|raw| raw.rsplit(',').find_map(|hop| hop.trim().parse().ok()));

    forwarded.or_else(|| {
        headers
            .get(X_REAL_IP)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request(headers: &[(&str, &str)], peer: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let mut req = builder.body(Body::empty()).unwrap();
        if let Some(peer) = peer {
            req.extensions_mut()
                .insert(ConnectInfo(peer.parse::<SocketAddr>().unwrap()));
        }
        req
    }

    #[test]
    fn test_peer_address_without_headers() {
        let req = request(&[], Some("192.0.2.10:51234"));
        assert_eq!(client_identity(&req, true), "192.0.2.10");
    }

    #[test]
    fn test_rightmost_forwarded_hop() {
        let req = request(
            &[(X_FORWARDED_FOR, "198.51.100.1, 203.0.113.9, garbage")],
            Some("10.0.0.2:80"),
        );
        assert_eq!(client_identity(&req, true), "203.0.113.9");
    }

    #[test]
    fn test_forwarded_for_preferred_over_real_ip() {
        let req = request(
            &[(X_REAL_IP, "198.51.100.77"), (X_FORWARDED_FOR, "203.0.113.9")],
            Some("10.0.0.2:80"),
        );
        assert_eq!(client_identity(&req, true), "203.0.113.9");
    }

    #[test]
    fn test_real_ip_when_forwarded_for_unusable() {
        let req = request(
            &[(X_FORWARDED_FOR, "garbage, unknown"), (X_REAL_IP, "203.0.113.50")],
            Some("10.0.0.2:80"),
        );
        assert_eq!(client_identity(&req, true), "203.0.113.50");

        let req = request(&[(X_REAL_IP, "203.0.113.50")], Some("10.0.0.2:80"));
        assert_eq!(client_identity(&req, true), "203.0.113.50");
    }

    #[test]
    fn test_invalid_headers_fall_through_to_peer() {
        let req = request(
            &[(X_REAL_IP, "not-an-ip"), (X_FORWARDED_FOR, "nope")],
            Some("10.0.0.2:80"),
        );
        assert_eq!(client_identity(&req, true), "10.0.0.2");
    }

    #[test]
    fn test_headers_ignored_when_untrusted() {
        let req = request(&[(X_REAL_IP, "203.0.113.50")], Some("10.0.0.2:80"));
        assert_eq!(client_identity(&req, false), "10.0.0.2");
    }

    #[test]
    fn test_unknown_without_any_source() {
        let req = request(&[], None);
        assert_eq!(client_identity(&req, true), "unknown");
    }
}
