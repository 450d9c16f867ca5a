use std::net::{IpAddr, SocketAddr};

use axum::http::HeaderMap;

/// Identity used when nothing identifies the caller.
pub const ANONYMOUS: &str = "anonymous";

/// Key a caller is rate limited by: the client IP as reported by a proxy,
/// else the socket peer address.
pub fn client_identity(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    client_ip(headers, peer)
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| ANONYMOUS.to_string())
}

fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> Option<IpAddr> {
    // The first X-Forwarded-For entry is the original client.
    if let Some(forwarded) = headers.get("X-Forwarded-For").and_then(|v| v.to_str().ok()) {
        if let Some(Ok(ip)) = forwarded.split(',').next().map(|first| first.trim().parse::<IpAddr>()) {
            return Some(ip);
        }
    }

    if let Some(real_ip) = headers.get("X-Real-IP").and_then(|v| v.to_str().ok()) {
        if let Ok(ip) = real_ip.trim().parse::<IpAddr>() {
            return Some(ip);
        }
    }

    peer.map(|addr| addr.ip())
}
