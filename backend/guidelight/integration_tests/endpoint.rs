// Integration tests for URL parsing, endpoint composition and header parsing

use guidelight::{QueryParams, Url, parse_content_type, parse_host};

/// **VALUE**: Parsing then printing gives back the original string.
///
/// **BUG THIS CATCHES**: Would catch normalisation creeping in (a trailing
/// slash on `http://example.com`, a dropped default port) which changes the
/// base URL endpoints are joined onto.
#[test]
fn given_common_urls_when_parsed_and_printed_then_round_trip() {
    let urls = [
        "http://example.com",
        "https://example.com/path/to/resource?query=param#fragment",
        "ftp://ftp.example.com/resource",
        "http://example.com:8080",
        "http://localhost",
        "http://localhost:9000/path",
        "http://example.local",
    ];

    for input in urls {
        let parsed = Url::parse(input).expect("valid URL");
        assert_eq!(parsed.to_string(), input);
    }
}

#[test]
fn given_str_when_parsed_via_from_str_then_matches_parse() {
    let parsed: Url = "https://example.com/a?b=c".parse().expect("valid URL");

    assert_eq!(parsed, Url::parse("https://example.com/a?b=c").expect("valid URL"));
}

#[test]
fn given_bad_port_when_parsed_then_returns_parse_error() {
    let result = Url::parse("http://example.com:notaport");

    assert!(result.is_err());
}

/// **VALUE**: Endpoint composition follows POSIX join and query override rules.
///
/// **WHY THIS MATTERS**: Every API call goes through `resolve`; a wrong join
/// sends requests to the wrong path.
#[test]
fn given_base_urls_when_resolved_then_endpoints_match_expected() {
    let cases: [(&str, &[&str], Option<QueryParams>, &str); 6] = [
        (
            "https://guidelight.dev",
            &["v1", "agents"],
            None,
            "https://guidelight.dev/v1/agents",
        ),
        (
            "https://guidelight.dev/v1",
            &["agents"],
            None,
            "https://guidelight.dev/v1/agents",
        ),
        (
            "https://guidelight.dev/v1",
            &["/", "v2", "agents"],
            None,
            "https://guidelight.dev/v2/agents",
        ),
        (
            "https://guidelight.dev?ordering=created",
            &["v1", "agents"],
            None,
            "https://guidelight.dev/v1/agents?ordering=created",
        ),
        (
            "https://guidelight.dev?ordering=created",
            &["v1", "agents"],
            Some(QueryParams::from([("ordering", "modified")])),
            "https://guidelight.dev/v1/agents?ordering=modified",
        ),
        (
            "https://guidelight.dev?ordering=created",
            &["v1", "agents"],
            Some(QueryParams::from([("include", "archives")])),
            "https://guidelight.dev/v1/agents?ordering=created&include=archives",
        ),
    ];

    for (base, segments, query, expected) in cases {
        let base = Url::parse(base).expect("valid URL");

        let resolved = base.resolve(segments, query.as_ref());

        assert_eq!(resolved.to_string(), expected);
    }
}

#[test]
fn given_base_when_resolved_then_original_is_unchanged() {
    let base = Url::parse("https://guidelight.dev/v1?a=1").expect("valid URL");

    let _ = base.resolve(&["agents"], Some(&QueryParams::from([("a", "2")])));

    assert_eq!(base.to_string(), "https://guidelight.dev/v1?a=1");
}

#[test]
fn given_query_override_when_resolved_then_key_keeps_its_position() {
    let base = Url::parse("https://h.example?a=1&b=2&c=3").expect("valid URL");

    let resolved = base.resolve(&["x"], Some(&QueryParams::from([("b", "9"), ("d", "4")])));

    assert_eq!(resolved.query(), "a=1&b=9&c=3&d=4");
}

#[test]
fn given_multi_valued_query_when_parsed_then_values_are_grouped() {
    let url = Url::parse("https://h.example/p?tag=a&tag=b&empty=&q=hello+world").expect("valid URL");

    let query = url.parse_query();

    assert_eq!(query.get("tag"), Some(&["a".to_string(), "b".to_string()][..]));
    assert_eq!(query.first("q"), Some("hello world"));
    assert!(!query.contains_key("empty"));
    assert_eq!(query.keys().collect::<Vec<_>>(), vec!["tag", "q"]);
}

#[test]
fn given_values_with_spaces_when_encoded_then_form_encoding_is_used() {
    let mut query = QueryParams::new();
    query.insert("search", "a b&c");
    query.append("tag", "x");
    query.append("tag", "y");

    assert_eq!(query.encode(), "search=a+b%26c&tag=x&tag=y");
}

#[test]
fn given_url_without_query_when_parsed_then_query_is_empty() {
    let url = Url::parse("https://h.example/p").expect("valid URL");

    assert!(url.parse_query().is_empty());
}

#[test]
fn given_url_when_scheme_replaced_then_copy_has_new_scheme() {
    let url = Url::parse("http://h.example/p").expect("valid URL");

    let secure = url.with_scheme("https");

    assert_eq!(secure.to_string(), "https://h.example/p");
    assert_eq!(url.scheme(), "http");
}

#[test]
fn given_urls_when_host_parsed_then_authority_is_returned() {
    let cases = [
        ("http://example.com", "example.com"),
        ("https://example.com/path", "example.com"),
        ("ftp://ftp.example.com/resource", "ftp.example.com"),
        ("http://example.com:8080", "example.com:8080"),
        ("http://localhost", "localhost"),
        ("http://localhost:9000/path", "localhost:9000"),
        ("http://example.local", "example.local"),
        ("example.com/path", "example.com"),
        ("localhost:9000", "localhost:9000"),
        ("https:example.com/v1", "example.com"),
        ("http:localhost:9000/path", "localhost:9000"),
    ];

    for (input, expected) in cases {
        assert_eq!(parse_host(input), expected, "host of {input}");
    }
}

#[test]
fn given_content_types_when_parsed_then_type_and_params_are_split() {
    let (mime, params) = parse_content_type("text/html; charset=UTF-8");
    assert_eq!(mime, "text/html");
    assert_eq!(params, vec![("charset".to_string(), "UTF-8".to_string())]);

    let (mime, params) = parse_content_type("application/json");
    assert_eq!(mime, "application/json");
    assert!(params.is_empty());
}

/// **VALUE**: Header quirks are normalised the way MIME parsing does.
///
/// **BUG THIS CATCHES**: Would catch a quoted `boundary` keeping its quotes, or
/// a repeated parameter appearing twice.
#[test]
fn given_quoted_and_repeated_params_when_parsed_then_normalised() {
    let (mime, params) = parse_content_type(
        r#"Multipart/Form-Data; Boundary="a;b"; charset=utf-8; CHARSET=latin-1"#,
    );

    assert_eq!(mime, "multipart/form-data");
    assert_eq!(
        params,
        vec![
            ("boundary".to_string(), "a;b".to_string()),
            ("charset".to_string(), "latin-1".to_string()),
        ]
    );
}

#[test]
fn given_blank_header_when_parsed_then_defaults_to_text_plain() {
    let (mime, params) = parse_content_type("");

    assert_eq!(mime, "text/plain");
    assert!(params.is_empty());
}
