use crate::iputil::is_ip;

/// Registrable-looking domain: the last two labels of `host`.
///
/// IP hosts (with or without port) and hosts of two labels or fewer are
/// returned unchanged.
pub fn top_domain(host: &str) -> &str {
    let addr = host.split(':').next().unwrap_or(host);
    if is_ip(addr) {
        return host;
    }

    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() <= 2 {
        return host;
    }
    let keep = labels[labels.len() - 2].len() + 1 + labels[labels.len() - 1].len();
    &host[host.len() - keep..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_domain() {
        assert_eq!(top_domain("www.example.com"), "example.com");
        assert_eq!(top_domain("a.b.example.com"), "example.com");
        assert_eq!(top_domain("example.com"), "example.com");
        assert_eq!(top_domain("localhost"), "localhost");
        assert_eq!(top_domain("127.0.0.1"), "127.0.0.1");
        assert_eq!(top_domain("10.0.0.1:8080"), "10.0.0.1:8080");
        assert_eq!(top_domain("api.example.com:8443"), "example.com:8443");
    }
}
