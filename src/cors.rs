//! Origin policy shared by the CORS layer and the realtime upgrade.
//!
//! One predicate decides whether a browser origin may talk to the
//! server. Production uses an exact allow-list; development accepts
//! loopback and private-network hosts so phones and tablets on the
//! workshop LAN can reach a dev machine.

use std::net::{IpAddr, Ipv6Addr};
use std::sync::Arc;
use std::time::Duration;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Which origins are accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OriginPolicy {
    /// Only these exact origins (scheme, host and port).
    AllowList(Vec<String>),
    /// `localhost`, loopback and RFC 1918 private addresses on any port.
    LocalNetwork,
}

impl OriginPolicy {
    /// Returns `true` if `origin` may access the API and realtime channel.
    #[must_use]
    pub fn allows(&self, origin: &str) -> bool {
        let origin = origin.trim().trim_end_matches('/');
        match self {
            Self::AllowList(list) => list
                .iter()
                .any(|allowed| allowed.trim_end_matches('/') == origin),
            Self::LocalNetwork => origin_host(origin).is_some_and(is_local_host),
        }
    }

    /// Builds the HTTP CORS layer enforcing this policy.
    #[must_use]
    pub fn cors_layer(self: Arc<Self>) -> CorsLayer {
        let predicate = AllowOrigin::predicate(move |origin: &HeaderValue, _parts| {
            origin.to_str().is_ok_and(|o| self.allows(o))
        });
        CorsLayer::new()
            .allow_origin(predicate)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([CONTENT_TYPE, AUTHORIZATION])
            .allow_credentials(true)
            .max_age(Duration::from_secs(3600))
    }
}

/// Extracts the host part of `scheme://host[:port]`.
fn origin_host(origin: &str) -> Option<&str> {
    let (_, rest) = origin.split_once("://")?;
    let authority = rest.split('/').next().unwrap_or(rest);
    if let Some(v6) = authority.strip_prefix('[') {
        return v6.split_once(']').map(|(host, _)| host);
    }
    let host = authority
        .rsplit_once(':')
        .map_or(authority, |(host, _port)| host);
    (!host.is_empty()).then_some(host)
}

fn is_local_host(host: &str) -> bool {
    if host.eq_ignore_ascii_case("localhost") {
        return true;
    }
    match host.parse::<IpAddr>() {
        Ok(IpAddr::V4(v4)) => v4.is_loopback() || v4.is_private(),
        Ok(IpAddr::V6(v6)) => v6 == Ipv6Addr::LOCALHOST,
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_network_accepts_lan_hosts() {
        let policy = OriginPolicy::LocalNetwork;
        for origin in [
            "http://localhost:5173",
            "http://127.0.0.1:5000",
            "http://192.168.0.14:5173",
            "http://10.1.2.3",
            "http://172.16.0.1:3000",
            "http://172.31.255.254",
            "http://[::1]:5173",
        ] {
            assert!(policy.allows(origin), "{origin} should be allowed");
        }
    }

    #[test]
    fn local_network_rejects_public_hosts() {
        let policy = OriginPolicy::LocalNetwork;
        for origin in [
            "https://example.com",
            "http://172.32.0.1",
            "http://8.8.8.8",
            "http://evil.com/?localhost",
            "http://192.168.0.1.evil.com",
            "null",
            "",
        ] {
            assert!(!policy.allows(origin), "{origin} should be rejected");
        }
    }

    #[test]
    fn allow_list_is_exact() {
        let policy = OriginPolicy::AllowList(vec!["https://os.example.com/".to_string()]);
        assert!(policy.allows("https://os.example.com"));
        assert!(!policy.allows("http://os.example.com"));
        assert!(!policy.allows("https://os.example.com:8443"));
        assert!(!policy.allows("http://localhost:5173"));
    }

    #[test]
    fn empty_allow_list_rejects_everything() {
        let policy = OriginPolicy::AllowList(Vec::new());
        assert!(!policy.allows("http://localhost:5173"));
    }

    #[test]
    fn host_extraction() {
        assert_eq!(origin_host("http://a.b:80"), Some("a.b"));
        assert_eq!(origin_host("http://a.b"), Some("a.b"));
        assert_eq!(origin_host("http://[::1]:80"), Some("::1"));
        assert_eq!(origin_host("a.b"), None);
    }
}
