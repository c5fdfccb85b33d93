use crate::commands::render;

use guidelight::Payload;

use serde_json::json;

/// **VALUE**: JSON is pretty-printed and newline-terminated for terminals.
#[test]
fn given_json_payload_when_rendered_then_pretty_printed() {
    let mut out = Vec::new();

    render(&Payload::Json(json!({"id": 1})), &mut out).expect("render");

    assert_eq!(String::from_utf8(out).expect("utf8"), "{\n  \"id\": 1\n}\n");
}

/// **BUG THIS CATCHES**: Would catch binary downloads being mangled by a
/// lossy UTF-8 conversion or an appended newline.
#[test]
fn given_bytes_payload_when_rendered_then_written_verbatim() {
    let mut out = Vec::new();
    let bytes = vec![0xff, 0x00, b'a'];

    render(&Payload::Bytes(bytes.clone()), &mut out).expect("render");

    assert_eq!(out, bytes);
}

#[test]
fn given_empty_payload_when_rendered_then_nothing_written() {
    let mut out = Vec::new();

    render(&Payload::Empty, &mut out).expect("render");

    assert!(out.is_empty());
}
