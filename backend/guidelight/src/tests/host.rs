// Unit tests for local host detection and scheme selection

use crate::config::host::{SCHEME_HTTP, SCHEME_HTTPS, detect_scheme, is_local_host};

/// **VALUE**: Development servers are reached over plain HTTP.
///
/// **BUG THIS CATCHES**: Would catch the port not being stripped before the
/// comparison, which would send `localhost:8000` over TLS.
#[test]
fn given_local_hosts_when_checked_then_detected_as_local() {
    assert!(is_local_host("localhost"));
    assert!(is_local_host("localhost:8000"));
    assert!(is_local_host("LOCALHOST"));
    assert!(is_local_host("endeavor.local"));
    assert!(is_local_host("endeavor.local:9000"));
    assert!(is_local_host("127.0.0.1"));
    assert!(is_local_host("127.0.0.1:8080"));
    assert!(is_local_host("[::1]:8080"));
    assert!(is_local_host("admin:pw@localhost:8000"));
}

#[test]
fn given_remote_hosts_when_checked_then_not_local() {
    assert!(!is_local_host("example.com"));
    assert!(!is_local_host("guidelight.dev:443"));
    assert!(!is_local_host("10.0.0.1"));
    assert!(!is_local_host("localhost.example.com"));
    assert!(!is_local_host(""));
}

#[test]
fn given_host_when_scheme_detected_then_http_only_for_local() {
    assert_eq!(detect_scheme("localhost:8000"), SCHEME_HTTP);
    assert_eq!(detect_scheme("example.com"), SCHEME_HTTPS);
}
