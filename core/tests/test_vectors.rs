//! Verify the request builder and response parser against JSON test vectors
//! stored in `test-vectors/`.
//!
//! Render vectors pin the exact wire text, which is possible because headers
//! are rendered sorted by name. Parse vectors feed raw peer bytes through the
//! same reader the client uses.

use std::collections::BTreeMap;
use std::io::Cursor;

use native_http::{request, response, Body, ClientState, Method, NetworkKind, RequestIntent};
use serde_json::Value;

fn string_map(value: &Value) -> BTreeMap<String, String> {
    value
        .as_object()
        .unwrap()
        .iter()
        .map(|(k, v)| (k.clone(), v.as_str().unwrap().to_string()))
        .collect()
}

fn parse_body(value: &Value) -> Body {
    match value["kind"].as_str().unwrap() {
        "empty" => Body::Empty,
        "raw" => Body::from(value["value"].as_str().unwrap()),
        "json" => Body::from(value["value"].clone()),
        other => panic!("unknown body kind: {other}"),
    }
}

// ---------------------------------------------------------------------------
// Render
// ---------------------------------------------------------------------------

#[test]
fn render_test_vectors() {
    let raw = include_str!("../../test-vectors/render.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let network: NetworkKind = serde_json::from_value(case["network"].clone()).unwrap();
        let method: Method = serde_json::from_value(case["method"].clone()).unwrap();

        let mut state = ClientState::new(network, case["address"].as_str().unwrap());
        state.headers = string_map(&case["headers"]);
        state.cookies = string_map(&case["cookies"]);
        let intent = RequestIntent::new(method, case["route"].as_str().unwrap(), parse_body(&case["body"]));

        let text = request::build(&state, &state.target(), &intent);
        assert_eq!(text, case["expected"].as_str().unwrap(), "{name}: wire text");

        let rendered_again = request::build(&state, &state.target(), &intent);
        assert_eq!(rendered_again, text, "{name}: rendering is repeatable");
    }
}

// ---------------------------------------------------------------------------
// Parse
// ---------------------------------------------------------------------------

#[test]
fn parse_test_vectors() {
    let raw = include_str!("../../test-vectors/parse.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let stream = Cursor::new(case["raw"].as_str().unwrap().as_bytes().to_vec());
        let expected = &case["expected"];

        let parsed = response::read(stream, "vector").unwrap();
        assert_eq!(
            u64::from(parsed.status_code),
            expected["status_code"].as_u64().unwrap(),
            "{name}: status"
        );
        assert_eq!(parsed.content_type, expected["content_type"].as_str().unwrap(), "{name}: content type");
        assert_eq!(
            parsed.content_length,
            expected["content_length"].as_u64().unwrap(),
            "{name}: content length"
        );
        assert_eq!(parsed.text().unwrap(), expected["body"].as_str().unwrap(), "{name}: body");
        assert_eq!(parsed.headers, string_map(&expected["headers"]), "{name}: headers");
        assert_eq!(parsed.cookies, string_map(&expected["cookies"]), "{name}: cookies");
    }
}

// ---------------------------------------------------------------------------
// Round trip
// ---------------------------------------------------------------------------

#[test]
fn rendered_body_survives_an_echo() {
    let state = ClientState::tcp("example.com");
    let intent = RequestIntent::new(Method::Post, "/echo", Body::from(serde_json::json!({"a": 1})));
    let text = request::build(&state, &state.target(), &intent);
    let (_, payload) = text.split_once("\r\n\r\n").unwrap();

    let echo = format!(
        "HTTP/1.1 200 OK\r\nContent-Length: {}\r\n\r\n{payload}",
        payload.len()
    );
    let parsed = response::read(Cursor::new(echo.into_bytes()), "echo").unwrap();
    assert_eq!(parsed.body, b"{\"a\":1}");
    assert_eq!(parsed.content_length, 7);
}
