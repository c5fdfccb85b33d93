use crate::args::{Cli, Command, parse_key_value};

use clap::Parser;
use serde_json::json;

/// **VALUE**: Repeated `--query` flags keep their order and duplicates.
///
/// **BUG THIS CATCHES**: Would catch query pairs being collected into a map
/// that drops repeated keys like `tag=a&tag=b`.
#[test]
fn given_repeated_query_flags_when_parsed_then_pairs_are_kept_in_order() {
    // GIVEN/WHEN: A get with three query flags
    let cli = Cli::try_parse_from([
        "guidelight",
        "--url",
        "localhost:8000",
        "get",
        "projects",
        "42",
        "-q",
        "tag=a",
        "--query",
        "tag=b",
        "--query",
        "search=red team",
    ])
    .expect("valid arguments");

    // THEN: Segments and pairs are preserved
    let Command::Get(endpoint) = cli.command else {
        panic!("expected get subcommand");
    };
    assert_eq!(endpoint.segments, vec!["projects", "42"]);
    let query = endpoint.query_params().expect("query present");
    assert_eq!(query.encode(), "tag=a&tag=b&search=red+team");
}

#[test]
fn given_post_with_data_when_parsed_then_body_is_json() {
    let cli = Cli::try_parse_from([
        "guidelight",
        "post",
        "agents",
        "--data",
        r#"{"name": "scout"}"#,
    ])
    .expect("valid arguments");

    let Command::Post(request) = cli.command else {
        panic!("expected post subcommand");
    };
    assert_eq!(request.data, json!({"name": "scout"}));
    assert!(request.endpoint.query_params().is_none());
}

#[test]
fn given_put_without_data_when_parsed_then_body_defaults_to_empty_object() {
    let cli = Cli::try_parse_from(["guidelight", "put", "agents", "1"]).expect("valid arguments");

    let Command::Put(request) = cli.command else {
        panic!("expected put subcommand");
    };
    assert_eq!(request.data, json!({}));
}

#[test]
fn given_invalid_json_when_parsed_then_clap_rejects_it() {
    let result = Cli::try_parse_from(["guidelight", "post", "agents", "--data", "{nope"]);

    assert!(result.is_err());
}

#[test]
fn given_pair_without_equals_when_parsed_then_error() {
    assert!(parse_key_value("novalue").is_err());
    assert!(parse_key_value("=value").is_err());
    assert_eq!(
        parse_key_value("a=b=c"),
        Ok(("a".to_string(), "b=c".to_string()))
    );
}

#[test]
fn given_global_flags_when_converted_then_options_carry_them() {
    let cli = Cli::try_parse_from([
        "guidelight",
        "auth",
        "--url",
        "https://endeavor.example.com",
        "--client-id",
        "id",
        "--client-secret",
        "secret",
        "--timeout",
        "2.5",
    ])
    .expect("valid arguments");

    let options = cli.global.client_options().expect("valid options");

    assert_eq!(options.url.as_deref(), Some("https://endeavor.example.com"));
    assert_eq!(options.client_id.as_deref(), Some("id"));
    assert!(!options.needs_environment());
    assert!(options.timeout.is_some());
}

#[test]
fn given_zero_timeout_when_converted_then_argument_error() {
    let cli = Cli::try_parse_from(["guidelight", "auth", "--url", "h.example", "--timeout", "0"])
        .expect("clap accepts the number");

    let err = cli.global.client_options().unwrap_err();

    assert_eq!(err.exit_code(), 2);
}
