//! Dispatcher integration tests
//!
//! Batch-level rejections, credential lookup and per-item outcomes through
//! [`LookDispatcher`].

#[cfg(test)]
mod tests {
    use crate::common::fixtures::{
        TEST_API_KEY, USER_WITHOUT_KEY, bmp_bytes, expired_token_for, png_bytes,
    };
    use crate::common::{ScriptedUpstream, TEST_JWT_SECRET, TEST_USER, test_config, token_for};
    use async_trait::async_trait;
    use looks_gateway::auth::{
        CredentialResolver, JwtIdentityProvider, SecretStore, StaticSecretStore,
    };
    use looks_gateway::config::AuthConfig;
    use looks_gateway::{
        BatchScheduler, BatchState, Credential, GatewayError, Identity, ItemInput, ItemOutcome,
        LookDispatcher, SchedulerConfig, TransformSpec, TransformationClient, build_instruction,
    };
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{Duration, Instant};
    use tokio_test::{assert_err, assert_ok};

    /// Counts lookups so tests can prove the store was never consulted
    struct CountingStore {
        inner: StaticSecretStore,
        lookups: AtomicUsize,
    }

    #[async_trait]
    impl SecretStore for CountingStore {
        async fn lookup(&self, identity: &Identity) -> looks_gateway::Result<Option<Credential>> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            self.inner.lookup(identity).await
        }
    }

    struct Harness {
        dispatcher: LookDispatcher,
        upstream: Arc<ScriptedUpstream>,
        store: Arc<CountingStore>,
    }

    fn harness(scheduler: SchedulerConfig) -> Harness {
        let upstream = Arc::new(ScriptedUpstream::new());
        let store = Arc::new(CountingStore {
            inner: StaticSecretStore::default().with_key(TEST_USER, TEST_API_KEY),
            lookups: AtomicUsize::new(0),
        });
        let identity = Arc::new(JwtIdentityProvider::new(&AuthConfig {
            jwt_secret: TEST_JWT_SECRET.to_string(),
            ..AuthConfig::default()
        }));
        let client = TransformationClient::new(upstream.clone(), 10);
        let dispatcher = LookDispatcher::new(
            identity,
            CredentialResolver::new(store.clone()),
            BatchScheduler::new(client, scheduler),
            6,
        );
        Harness {
            dispatcher,
            upstream,
            store,
        }
    }

    fn fast() -> SchedulerConfig {
        SchedulerConfig::default().with_group_delay(Duration::from_millis(20))
    }

    fn marker(byte: u8) -> ItemInput {
        ItemInput::new(vec![byte, 1, 2, 3], "image/jpeg")
    }

    #[tokio::test]
    async fn test_empty_batch_rejected_before_lookup() {
        let h = harness(fast());
        let token = token_for(TEST_USER);

        let err = h
            .dispatcher
            .submit_batch(Some(&token), vec![], Some("XL"))
            .await
            .unwrap_err();

        assert!(matches!(err, GatewayError::Validation(_)));
        assert_eq!(h.store.lookups.load(Ordering::SeqCst), 0);
        assert_eq!(h.upstream.call_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        let h = harness(fast());

        for bearer in [None, Some(""), Some("   "), Some("not-a-jwt")] {
            let err = h
                .dispatcher
                .submit_batch(bearer, vec![marker(b'S')], Some("XL"))
                .await
                .unwrap_err();
            assert!(matches!(err, GatewayError::Unauthorized(_)), "{:?}", bearer);
        }
        assert_eq!(h.store.lookups.load(Ordering::SeqCst), 0);
        assert_eq!(h.upstream.call_count(), 0);
    }

    #[tokio::test]
    async fn test_expired_token_is_unauthorized() {
        let h = harness(fast());
        let token = expired_token_for(TEST_USER);

        let err = h
            .dispatcher
            .submit_batch(Some(&token), vec![marker(b'S')], Some("XL"))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_unauthorized_wins_over_invalid_batch() {
        let h = harness(fast());

        let err = h
            .dispatcher
            .submit_batch(None, vec![], None)
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_too_many_items_rejected() {
        let h = harness(fast());
        let token = token_for(TEST_USER);
        let items = (0..7).map(|_| marker(b'S')).collect();

        let err = h
            .dispatcher
            .submit_batch(Some(&token), items, Some("XL"))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Validation(_)));
        assert_eq!(h.store.lookups.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_spec_rejected() {
        let h = harness(fast());
        let token = token_for(TEST_USER);

        for spec in [None, Some(""), Some("  ")] {
            let err = h
                .dispatcher
                .submit_batch(Some(&token), vec![marker(b'S')], spec)
                .await
                .unwrap_err();
            assert!(matches!(err, GatewayError::Validation(_)), "{:?}", spec);
        }
        assert_eq!(h.upstream.call_count(), 0);
    }

    #[tokio::test]
    async fn test_user_without_key_is_not_configured() {
        let h = harness(fast());
        let token = token_for(USER_WITHOUT_KEY);

        let err = h
            .dispatcher
            .submit_batch(Some(&token), vec![marker(b'S')], Some("XL"))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::NotConfigured(_)));
        assert_eq!(h.store.lookups.load(Ordering::SeqCst), 1);
        assert_eq!(h.upstream.call_count(), 0);
    }

    #[tokio::test]
    async fn test_batch_success_end_to_end() {
        let h = harness(fast());
        let token = token_for(TEST_USER);
        let items = vec![
            ItemInput::new(png_bytes(), "image/png"),
            marker(b'S'),
            ItemInput::new(bmp_bytes(), ""),
        ];

        let outcome = h
            .dispatcher
            .submit_batch(Some(&token), items, Some("XL"))
            .await
            .unwrap();

        assert_eq!(outcome.state(), BatchState::Completed);
        assert_eq!(outcome.len(), 3);
        assert_eq!(outcome.success_count(), 3);
        for (index, item) in outcome.outcomes().iter().enumerate() {
            assert_eq!(item.position(), index);
            assert!(item.is_success());
        }

        // One lookup for the whole batch, one upstream call per item
        assert_eq!(h.store.lookups.load(Ordering::SeqCst), 1);
        let calls = h.upstream.calls();
        assert_eq!(calls.len(), 3);
        let instruction = build_instruction(&TransformSpec::ExtraLarge);
        for call in &calls {
            assert_eq!(call.api_key, TEST_API_KEY);
            assert_eq!(call.instruction, instruction);
        }
        // The BMP was normalized before leaving the gateway
        assert!(calls.iter().all(|c| c.media_type != "image/bmp"));
        assert_eq!(
            calls.iter().filter(|c| c.media_type == "image/png").count(),
            2
        );
    }

    #[tokio::test]
    async fn test_rate_limited_item_is_isolated() {
        let h = harness(fast());
        let token = token_for(TEST_USER);

        let outcome = h
            .dispatcher
            .submit_batch(
                Some(&token),
                vec![marker(b'S'), marker(b'R'), marker(b'S')],
                Some("XL"),
            )
            .await
            .unwrap();

        assert_eq!(outcome.success_count(), 2);
        assert_eq!(outcome.failure_count(), 1);
        assert!(outcome.outcomes()[0].is_success());
        assert!(matches!(
            outcome.outcomes()[1],
            ItemOutcome::RateLimited {
                position: 1,
                retry_after_secs: 10,
                ..
            }
        ));
        assert!(outcome.outcomes()[2].is_success());
        assert_eq!(h.upstream.call_count(), 3);
    }

    #[tokio::test]
    async fn test_every_failure_kind_in_one_batch() {
        let h = harness(fast().with_item_timeout(Duration::from_millis(200)));
        let token = token_for(TEST_USER);

        let outcome = h
            .dispatcher
            .submit_batch(
                Some(&token),
                vec![
                    marker(b'F'),
                    marker(b'M'),
                    marker(b'H'),
                    marker(b'R'),
                    ItemInput::new(Vec::<u8>::new(), "image/png"),
                    marker(b'S'),
                ],
                Some("M"),
            )
            .await
            .unwrap();

        let kinds: Vec<&str> = outcome.outcomes().iter().map(ItemOutcome::kind).collect();
        assert_eq!(
            kinds,
            vec![
                "upstream_error",
                "malformed_response",
                "timeout",
                "rate_limited",
                "malformed_response",
                "success",
            ]
        );
        assert_eq!(outcome.success_count(), 1);
        // The empty item never reached the upstream
        assert_eq!(h.upstream.call_count(), 5);
    }

    #[tokio::test]
    async fn test_groups_are_paced() {
        let delay = Duration::from_millis(150);
        let h = harness(SchedulerConfig::default().with_group_delay(delay));
        let token = token_for(TEST_USER);
        let items = (0..5).map(|_| marker(b'S')).collect();

        let started = Instant::now();
        let outcome = h
            .dispatcher
            .submit_batch(Some(&token), items, Some("xs"))
            .await
            .unwrap();

        // Five items in groups of two: three groups, two pauses
        assert_eq!(outcome.success_count(), 5);
        assert!(started.elapsed() >= delay * 2);
    }

    #[tokio::test]
    async fn test_from_config_wires_static_store() {
        let config = test_config();
        let upstream = Arc::new(ScriptedUpstream::new());
        let dispatcher = assert_ok!(LookDispatcher::with_transformer(&config, upstream.clone()));
        assert_eq!(dispatcher.max_items(), 6);
        assert_eq!(dispatcher.scheduler().config().concurrency, 2);

        let token = token_for(TEST_USER);
        let outcome = assert_ok!(
            dispatcher
                .submit_batch(Some(&token), vec![marker(b'S')], Some("plus-size"))
                .await
        );
        assert_eq!(outcome.success_count(), 1);
        assert_eq!(upstream.calls()[0].api_key, TEST_API_KEY);
    }

    #[tokio::test]
    async fn test_forward_uses_callers_key() {
        let h = harness(fast());
        let token = token_for(TEST_USER);

        let answer = h
            .dispatcher
            .forward(Some(&token), serde_json::json!({ "contents": [] }))
            .await
            .unwrap();
        assert_eq!(answer["keyLength"], TEST_API_KEY.len());

        let err = h
            .dispatcher
            .forward(Some(&token), serde_json::json!({ "fail": true }))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Upstream { status: 403, .. }));

        let err = assert_err!(h.dispatcher.forward(None, serde_json::json!({})).await);
        assert!(matches!(err, GatewayError::Unauthorized(_)));
        assert_eq!(h.upstream.forward_count(), 2);
    }
}
