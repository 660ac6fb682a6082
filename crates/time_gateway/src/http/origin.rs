//! Origin allow-list matching.
//!
//! Entry forms, checked in order for each entry:
//!
//! | entry              | compared against                     |
//! |--------------------|--------------------------------------|
//! | `*`                | anything                             |
//! | `https://host:port`| origin `host[:port]`                 |
//! | `*.example.com`    | `example.com` and any subdomain      |
//! | `host:port`        | origin `host:port`                   |
//! | `host`             | origin hostname, port ignored        |

use url::Url;

use crate::config::security::{UNIVERSAL_ORIGIN, host_with_port};

/// Returns true when `origin` matches an entry of `allow_list`.
/// An origin that does not parse as an absolute URL with a host never matches.
pub fn is_origin_allowed(origin: &str, allow_list: &[String]) -> bool {
    let Ok(url) = Url::parse(origin) else {
        return false;
    };
    let Some(hostname) = url.host_str().filter(|h| !h.is_empty()) else {
        return false;
    };
    let Some(host) = host_with_port(&url) else {
        return false;
    };

    allow_list
        .iter()
        .any(|entry| entry_matches(entry.trim(), hostname, &host))
}

fn entry_matches(entry: &str, hostname: &str, host: &str) -> bool {
    if entry == UNIVERSAL_ORIGIN {
        return true;
    }
    if entry.contains("://") {
        return Url::parse(entry)
            .ok()
            .and_then(|url| host_with_port(&url))
            .is_some_and(|allowed| allowed.eq_ignore_ascii_case(host));
    }
    if let Some(base) = entry.strip_prefix("*.") {
        let base = base.to_ascii_lowercase();
        return hostname == base || hostname.ends_with(&format!(".{}", base));
    }
    if entry.contains(':') {
        return entry.eq_ignore_ascii_case(host);
    }
    entry.eq_ignore_ascii_case(hostname)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(entries: &[&str]) -> Vec<String> {
        entries.iter().map(|e| e.to_string()).collect()
    }

    #[test]
    fn test_exact_hostname() {
        let allow = list(&["example.com"]);
        assert!(is_origin_allowed("https://example.com", &allow));
        assert!(is_origin_allowed("https://example.com:8443", &allow));
        assert!(!is_origin_allowed("https://evil.com", &allow));
        assert!(!is_origin_allowed("https://example.com.evil.com", &allow));
    }

    #[test]
    fn test_wildcard_subdomain() {
        let allow = list(&["*.example.com"]);
        assert!(is_origin_allowed("https://api.example.com", &allow));
        assert!(is_origin_allowed("https://a.b.example.com", &allow));
        assert!(is_origin_allowed("https://example.com", &allow));
        assert!(!is_origin_allowed("https://notexample.com", &allow));
        assert!(!is_origin_allowed("https://example.com.evil.org", &allow));
    }

    #[test]
    fn test_host_and_port() {
        let allow = list(&["localhost:3000"]);
        assert!(is_origin_allowed("http://localhost:3000", &allow));
        assert!(!is_origin_allowed("http://localhost:4000", &allow));
        assert!(!is_origin_allowed("http://localhost", &allow));
    }

    #[test]
    fn test_full_url_entry() {
        let allow = list(&["https://app.example.com:8443"]);
        assert!(is_origin_allowed("https://app.example.com:8443", &allow));
        assert!(!is_origin_allowed("https://app.example.com", &allow));
    }

    #[test]
    fn test_universal_wildcard() {
        let allow = list(&["*"]);
        assert!(is_origin_allowed("https://anything.test", &allow));
        assert!(!is_origin_allowed("not a url", &allow));
    }

    #[test]
    fn test_malformed_origins_fail_closed() {
        let allow = list(&["example.com", "*"]);
        for origin in ["", "null", "example.com", "://example.com", "file:///etc/passwd"] {
            assert!(!is_origin_allowed(origin, &allow), "{origin} should be denied");
        }
    }

    #[test]
    fn test_hostnames_compare_case_insensitively() {
        let allow = list(&["App.Example.COM"]);
        assert!(is_origin_allowed("https://APP.example.com", &allow));
    }

    #[test]
    fn test_empty_allow_list_denies() {
        assert!(!is_origin_allowed("https://example.com", &[]));
    }
}
