use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Echo};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

// --- echo ---

#[tokio::test]
async fn echo_reports_method_headers_and_body() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri("/echo")
                .header(http::header::CONTENT_TYPE, "application/json; charset=utf-8")
                .header("x-a", "1")
                .body(r#"{"a":1}"#.to_string())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let echo: Echo = body_json(resp).await;
    assert_eq!(echo.method, "PATCH");
    assert_eq!(echo.headers["x-a"], vec!["1".to_string()]);
    assert_eq!(echo.body, r#"{"a":1}"#);
    assert!(echo.form.is_none());
}

#[tokio::test]
async fn echo_decodes_form_bodies() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/echo")
                .header(http::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body("name=a+b&count=0".to_string())
                .unwrap(),
        )
        .await
        .unwrap();

    let echo: Echo = body_json(resp).await;
    let form = echo.form.unwrap();
    assert_eq!(form["name"], "a b");
    assert_eq!(form["count"], "0");
}

#[tokio::test]
async fn echo_accepts_delete_without_body() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/echo")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    let echo: Echo = body_json(resp).await;
    assert_eq!(echo.method, "DELETE");
    assert!(echo.body.is_empty());
}

// --- status ---

#[tokio::test]
async fn status_returns_requested_code() {
    let resp = app()
        .oneshot(Request::builder().uri("/status/503").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(&body_bytes(resp).await[..], b"status 503");
}

#[tokio::test]
async fn status_rejects_non_numeric_code() {
    let resp = app()
        .oneshot(Request::builder().uri("/status/abc").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- repeated ---

#[tokio::test]
async fn repeated_sends_header_twice() {
    let resp = app()
        .oneshot(Request::builder().uri("/repeated").body(String::new()).unwrap())
        .await
        .unwrap();

    let values: Vec<_> = resp.headers().get_all("x-multi").iter().collect();
    assert_eq!(values, vec!["a", "b"]);
    assert_eq!(&body_bytes(resp).await[..], b"hello");
}
