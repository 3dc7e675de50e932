//! Dispatcher wired to the real Gemini client, with a mock upstream

#[cfg(test)]
mod tests {
    use crate::common::fixtures::{TEST_API_KEY, png_bytes};
    use crate::common::{TEST_USER, test_config, token_for};
    use looks_gateway::{ItemInput, ItemOutcome, LookDispatcher};
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PATH: &str = "/v1beta/models/gemini-2.5-flash-image:generateContent";

    async fn dispatcher(server: &MockServer) -> LookDispatcher {
        let mut config = test_config();
        config.gateway.gemini.base_url = format!("{}/v1beta", server.uri());
        LookDispatcher::from_config(&config).unwrap()
    }

    #[tokio::test]
    async fn test_batch_against_mock_gemini() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(PATH))
            .and(header("x-goog-api-key", TEST_API_KEY))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{ "content": { "parts": [
                    { "text": "Here is the restyled look" },
                    { "inlineData": { "mimeType": "image/png", "data": "aW1n" } }
                ]}}]
            })))
            .expect(3)
            .mount(&server)
            .await;

        let token = token_for(TEST_USER);
        let items = (0..3)
            .map(|_| ItemInput::new(png_bytes(), "image/png"))
            .collect();
        let outcome = dispatcher(&server)
            .await
            .submit_batch(Some(&token), items, Some("XL"))
            .await
            .unwrap();

        assert_eq!(outcome.success_count(), 3);
        for item in outcome.outcomes() {
            assert_eq!(item.image().unwrap().bytes, b"img".to_vec());
        }
    }

    #[tokio::test]
    async fn test_rate_limit_hint_from_retry_info() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(PATH))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "error": {
                    "code": 429,
                    "message": "Resource has been exhausted",
                    "status": "RESOURCE_EXHAUSTED",
                    "details": [{
                        "@type": "type.googleapis.com/google.rpc.RetryInfo",
                        "retryDelay": "36.4s"
                    }]
                }
            })))
            .mount(&server)
            .await;

        let token = token_for(TEST_USER);
        let outcome = dispatcher(&server)
            .await
            .submit_batch(
                Some(&token),
                vec![ItemInput::new(png_bytes(), "image/png")],
                Some("M"),
            )
            .await
            .unwrap();

        assert!(matches!(
            outcome.outcomes()[0],
            ItemOutcome::RateLimited {
                retry_after_secs: 37,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_upstream_error_status_is_kept() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(PATH))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": { "code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT" }
            })))
            .mount(&server)
            .await;

        let token = token_for(TEST_USER);
        let outcome = dispatcher(&server)
            .await
            .submit_batch(
                Some(&token),
                vec![ItemInput::new(png_bytes(), "image/png")],
                Some("XS"),
            )
            .await
            .unwrap();

        assert!(matches!(
            outcome.outcomes()[0],
            ItemOutcome::UpstreamError { status: 400, .. }
        ));
        assert_eq!(outcome.success_count(), 0);
    }
}
