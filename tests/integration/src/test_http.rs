//! Health, CORS and routing integration tests.

#[cfg(test)]
mod tests {
    use crate::{endpoint, http_client};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_report_running() {
        let client = http_client();
        for path in ["/health", "/_health"] {
            let resp = client
                .get(endpoint(path, &[]))
                .send()
                .await
                .expect("health request");
            assert_eq!(resp.status(), 200);
            let json: serde_json::Value = resp.json().await.expect("health json");
            assert_eq!(json["status"], "running");
        }
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_answer_cors_preflight() {
        let resp = http_client()
            .request(
                reqwest::Method::OPTIONS,
                endpoint("/rename-document", &[]),
            )
            .header("Origin", "https://app.example.com")
            .header("Access-Control-Request-Method", "PATCH")
            .send()
            .await
            .expect("preflight");
        assert!(resp.status().is_success());
        let methods = resp
            .headers()
            .get("access-control-allow-methods")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        assert!(methods.contains("PATCH"));
        assert!(resp.headers().contains_key("access-control-allow-origin"));
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_tag_responses_with_request_id() {
        let resp = http_client()
            .get(endpoint("/list-documents", &[("prefix", "none/")]))
            .send()
            .await
            .expect("list");
        assert!(resp.headers().contains_key("x-request-id"));
        assert!(resp.headers().contains_key("access-control-allow-origin"));
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_return_404_for_unknown_path() {
        let resp = http_client()
            .get(endpoint("/upload-everything", &[]))
            .send()
            .await
            .expect("request");
        assert_eq!(resp.status(), 404);
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_return_405_for_wrong_method() {
        let resp = http_client()
            .get(endpoint("/initiate-multipart-upload", &[]))
            .send()
            .await
            .expect("request");
        assert_eq!(resp.status(), 405);
        let allow = resp
            .headers()
            .get("allow")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_owned();
        assert!(allow.contains("POST"));
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_malformed_json_as_plain_text() {
        let resp = http_client()
            .post(endpoint("/initiate-multipart-upload", &[]))
            .header("content-type", "application/json")
            .body("{oops")
            .send()
            .await
            .expect("request");
        assert_eq!(resp.status(), 400);
        let body = resp.text().await.expect("body");
        assert!(body.starts_with("Invalid request payload"));
    }
}
