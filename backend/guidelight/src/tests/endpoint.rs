// Unit tests for the URL splitter and path joining helpers

use crate::endpoint::{join_path, split_url};

// ============================================
// split_url
// ============================================

/// **VALUE**: Every component lands in its own field.
///
/// **BUG THIS CATCHES**: Would catch the query or fragment being left glued to
/// the path, which breaks query merging in `resolve`.
#[test]
fn given_full_url_when_split_then_all_components_are_separated() {
    // GIVEN: A URL using every generic-syntax component
    let input = "https://user@example.com:8443/a/b;v=1?x=1&y=2#top";

    // WHEN: Splitting it
    let url = split_url(input);

    // THEN: Each component is extracted verbatim
    assert_eq!(url.scheme(), "https");
    assert_eq!(url.netloc(), "user@example.com:8443");
    assert_eq!(url.path(), "/a/b");
    assert_eq!(url.params(), "v=1");
    assert_eq!(url.query(), "x=1&y=2");
    assert_eq!(url.fragment(), "top");
}

#[test]
fn given_scheme_in_upper_case_when_split_then_scheme_is_lowercased() {
    let url = split_url("HTTPS://example.com");

    assert_eq!(url.scheme(), "https");
    assert_eq!(url.netloc(), "example.com");
}

/// **VALUE**: Hosts typed without `//` stay in the path.
///
/// **WHY THIS MATTERS**: Host detection falls back to the first path segment
/// for values like `example.com/api`.
#[test]
fn given_url_without_authority_when_split_then_host_is_first_path_segment() {
    let url = split_url("example.com/api/v1");

    assert_eq!(url.scheme(), "");
    assert_eq!(url.netloc(), "");
    assert_eq!(url.path(), "example.com/api/v1");
    assert_eq!(url.host(), "example.com");
}

#[test]
fn given_params_before_last_slash_when_split_then_they_stay_in_path() {
    let url = split_url("http://h/a;x/b");

    assert_eq!(url.path(), "/a;x/b");
    assert_eq!(url.params(), "");
}

#[test]
fn given_digits_before_colon_when_split_then_no_scheme_is_detected() {
    // "8000" is not a valid scheme token
    let url = split_url("8000:abc");

    assert_eq!(url.scheme(), "");
    assert_eq!(url.path(), "8000:abc");
}

/// **VALUE**: `host:port` typed without a scheme is not split at the colon.
///
/// **BUG THIS CATCHES**: Would catch `localhost:9000` being read as scheme
/// `localhost` with path `9000`, which reports `9000` as the host.
#[test]
fn given_host_and_port_without_scheme_when_split_then_host_keeps_port() {
    let url = split_url("localhost:9000/api");

    assert_eq!(url.scheme(), "");
    assert_eq!(url.path(), "localhost:9000/api");
    assert_eq!(url.host(), "localhost:9000");
    assert_eq!(url.to_string(), "localhost:9000/api");
}

#[test]
fn given_scheme_without_slashes_when_split_then_host_is_first_path_segment() {
    let url = split_url("https:example.com/v1");

    assert_eq!(url.scheme(), "https");
    assert_eq!(url.netloc(), "");
    assert_eq!(url.path(), "example.com/v1");
    assert_eq!(url.host(), "example.com");
}

// ============================================
// join_path
// ============================================

/// **VALUE**: POSIX join semantics for endpoint segments.
///
/// **BUG THIS CATCHES**: Would catch double slashes (`/v1//agents`) or a
/// missing separator (`/v1agents`) when composing endpoints.
#[test]
fn given_relative_segments_when_joined_then_single_slash_separates_them() {
    assert_eq!(join_path("", &["v1", "agents"]), "v1/agents");
    assert_eq!(join_path("/v1", &["agents"]), "/v1/agents");
    assert_eq!(join_path("/v1/", &["agents"]), "/v1/agents");
}

#[test]
fn given_absolute_segment_when_joined_then_prior_components_are_discarded() {
    assert_eq!(join_path("/v1", &["/", "v2", "agents"]), "/v2/agents");
    assert_eq!(join_path("/base", &["v1", "/v1/authrequired"]), "/v1/authrequired");
}

#[test]
fn given_no_segments_when_joined_then_base_is_unchanged() {
    let segments: [&str; 0] = [];

    assert_eq!(join_path("/v1", &segments), "/v1");
}
