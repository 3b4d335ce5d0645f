//! Property-Based Tests for the cache policy
//!
//! Uses proptest to check the namespace and caching laws over generated
//! namespaces, paths, methods and statuses.

use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;

use axum::http::Method;
use url::Url;

use crate::cache::{CacheStorage, MemoryCacheStorage};
use crate::config::Config;
use crate::proxy::testing::{settle, StubNetwork};
use crate::proxy::{CacheProxy, FetchOutcome, ProxyRequest};

// == Test Configuration ==
const ORIGIN: &str = "http://localhost:8080/";
const VERSION: &str = "scorekeeper-v1";

fn config(manifest: Vec<String>) -> Config {
    Config {
        cache_version: VERSION.to_string(),
        shell_manifest: manifest,
        upstream_origin: ORIGIN.to_string(),
        ..Config::default()
    }
}

fn proxy(storage: Arc<MemoryCacheStorage>, network: Arc<StubNetwork>) -> CacheProxy {
    CacheProxy::from_config(&config(vec!["./".to_string()]), storage, network).unwrap()
}

// == Strategies ==
/// Namespace identifiers other than the current version
fn stale_names_strategy() -> impl Strategy<Value = HashSet<String>> {
    prop::collection::hash_set("[a-z]{1,8}-v[0-9]{1,2}", 0..8)
        .prop_map(|names| names.into_iter().filter(|n| n != VERSION).collect())
}

/// Relative resource paths
fn path_strategy() -> impl Strategy<Value = String> {
    "[a-z]{1,10}(\\.(js|css|png|json))?".prop_map(|p| format!("./{}", p))
}

fn non_get_method_strategy() -> impl Strategy<Value = Method> {
    prop_oneof![
        Just(Method::POST),
        Just(Method::PUT),
        Just(Method::DELETE),
        Just(Method::PATCH),
        Just(Method::HEAD),
        Just(Method::OPTIONS),
    ]
}

fn status_strategy() -> impl Strategy<Value = u16> {
    prop_oneof![Just(200u16), Just(201), Just(204), Just(301), Just(404), Just(500)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // After pruning, only the current namespace remains, whatever else existed.
    #[test]
    fn prop_prune_leaves_only_current(stale in stale_names_strategy()) {
        tokio_test::block_on(async {
            let storage = Arc::new(MemoryCacheStorage::new());
            storage.open(VERSION).await.unwrap();
            for name in &stale {
                storage.open(name).await.unwrap();
            }

            let proxy = proxy(storage.clone(), Arc::new(StubNetwork::new()));
            let pruned = proxy.activate_and_prune().await.unwrap();

            assert_eq!(pruned, stale.len());
            assert_eq!(storage.keys().await.unwrap(), vec![VERSION.to_string()]);
        });
    }

    // Non-GET requests are handed back untouched: no lookup, no fetch, no write.
    #[test]
    fn prop_non_get_never_touches_cache(method in non_get_method_strategy(), path in path_strategy()) {
        tokio_test::block_on(async {
            let storage = Arc::new(MemoryCacheStorage::new());
            let network = Arc::new(StubNetwork::new());
            let url = Url::parse(ORIGIN).unwrap().join(&path).unwrap();
            network.serve(url.as_str(), 200, "body");

            let proxy = proxy(storage.clone(), network.clone());
            let outcome = proxy.handle_fetch(ProxyRequest::new(method.clone(), url)).await;
            settle().await;

            assert!(matches!(outcome, FetchOutcome::Passthrough(ref r) if *r.method() == method));
            assert_eq!(network.calls(), 0);
            assert!(storage.keys().await.unwrap().is_empty());
            assert_eq!(proxy.stats().hits + proxy.stats().misses, 0);
        });
    }

    // A miss adds exactly one entry for same-origin 200s and none otherwise.
    #[test]
    fn prop_opportunistic_caching(
        path in path_strategy(),
        status in status_strategy(),
        same_origin in any::<bool>(),
    ) {
        tokio_test::block_on(async {
            let storage = Arc::new(MemoryCacheStorage::new());
            let network = Arc::new(StubNetwork::new());
            let base = if same_origin { ORIGIN } else { "https://cdn.example.com/" };
            let url = Url::parse(base).unwrap().join(&path).unwrap();
            network.serve(url.as_str(), status, "body");

            let proxy = proxy(storage.clone(), network.clone());
            let outcome = proxy.handle_fetch(ProxyRequest::get(url)).await;
            settle().await;

            let expected = usize::from(status == 200 && same_origin);
            assert!(matches!(outcome, FetchOutcome::Respond(ref r) if r.status() == status));
            assert_eq!(storage.entries(VERSION).await.unwrap().len(), expected);
        });
    }

    // A manifest of N distinct resources yields exactly N entries.
    #[test]
    fn prop_initialize_stores_every_entry(paths in prop::collection::hash_set(path_strategy(), 1..10)) {
        tokio_test::block_on(async {
            let storage = Arc::new(MemoryCacheStorage::new());
            let network = Arc::new(StubNetwork::new());
            let origin = Url::parse(ORIGIN).unwrap();
            for path in &paths {
                network.serve(origin.join(path).unwrap().as_str(), 200, "shell");
            }

            let manifest: Vec<String> = paths.iter().cloned().collect();
            let proxy = proxy(storage.clone(), network.clone());
            proxy.initialize(&manifest).await.unwrap();

            assert_eq!(storage.entries(VERSION).await.unwrap().len(), paths.len());
            assert_eq!(network.calls(), paths.len());
        });
    }
}
