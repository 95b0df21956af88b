//! IP address helpers

use std::net::{IpAddr, Ipv4Addr, UdpSocket};

use tracing::debug;

/// True for an IPv4 or IPv6 literal
pub fn is_ip(addr: &str) -> bool {
    addr.parse::<IpAddr>().is_ok()
}

/// Local IPv4 address the OS would route outbound traffic from.
///
/// Connecting a UDP socket sends nothing; it only asks the OS to pick a
/// route. Falls back to `127.0.0.1`.
pub fn detect_local_private_ip() -> String {
    route_source_addr()
        .unwrap_or(Ipv4Addr::LOCALHOST)
        .to_string()
}

fn route_source_addr() -> Option<Ipv4Addr> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).ok()?;
    if let Err(e) = socket.connect((Ipv4Addr::new(8, 8, 8, 8), 80)) {
        debug!(error = %e, "no outbound route, using loopback");
        return None;
    }
    match socket.local_addr().ok()?.ip() {
        IpAddr::V4(ip) if !ip.is_unspecified() => Some(ip),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_ip() {
        assert!(is_ip("127.0.0.1"));
        assert!(is_ip("10.1.2.3"));
        assert!(is_ip("::1"));
        assert!(is_ip("fe80::1"));
        assert!(!is_ip("256.0.0.1"));
        assert!(!is_ip("example.com"));
        assert!(!is_ip(""));
    }

    #[test]
    fn test_detect_local_private_ip_is_v4() {
        let ip = detect_local_private_ip();
        assert!(ip.parse::<Ipv4Addr>().is_ok(), "{ip}");
    }
}
