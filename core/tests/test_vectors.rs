//! Verify stringification and request building against JSON test vectors
//! stored in `test-vectors/`.
//!
//! Bodies are compared as raw strings here on purpose: the encoders sort keys,
//! so the exact bytes are part of the contract.

use unirest_core::{stringify, Body, HttpMethod, RequestSpec, Value};

// ---------------------------------------------------------------------------
// Stringify
// ---------------------------------------------------------------------------

#[test]
fn stringify_test_vectors() {
    let raw = include_str!("../../test-vectors/stringify.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input = Value::from(case["input"].clone());
        let default = case["default"].as_str().unwrap();
        let expected = case["expected"].as_str().unwrap();

        assert_eq!(stringify(&input, default), expected, "{name}");
    }
}

// ---------------------------------------------------------------------------
// Build
// ---------------------------------------------------------------------------

#[test]
fn build_test_vectors() {
    let raw = include_str!("../../test-vectors/build.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let method = HttpMethod::from_name(case["method"].as_str().unwrap());
        let url = case["url"].as_str().unwrap();
        let headers = case["headers"]
            .as_object()
            .unwrap()
            .iter()
            .map(|(k, v)| (k.clone(), Value::from(v.clone())));
        let username = case.get("username").and_then(|v| v.as_str()).unwrap_or("");
        let password = case.get("password").and_then(|v| v.as_str()).unwrap_or("");

        let spec = RequestSpec::new(method, url)
            .headers(headers)
            .body(Body::classify(Value::from(case["body"].clone())))
            .basic_auth(username, password);
        let req = spec.build().unwrap();

        let expected = &case["expected_request"];
        assert_eq!(
            req.method,
            HttpMethod::from_name(expected["method"].as_str().unwrap()),
            "{name}: method"
        );
        assert_eq!(req.url, url, "{name}: url");

        let expected_headers: Vec<(String, String)> = expected["headers"]
            .as_array()
            .unwrap()
            .iter()
            .map(|h| {
                let arr = h.as_array().unwrap();
                (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
            })
            .collect();
        assert_eq!(req.headers, expected_headers, "{name}: headers");

        let body = req.body.as_deref().map(|b| std::str::from_utf8(b).unwrap());
        assert_eq!(body, expected["body"].as_str(), "{name}: body");
    }
}
