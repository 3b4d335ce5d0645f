//! Opportunistic re-caching
//!
//! Detached writes of network responses into the current namespace.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::cache::{CacheStorage, FetchStats, RequestKey};
use crate::proxy::ProxyResponse;

/// Spawns a task that stores `response` under `key`.
///
/// The fetch that produced the response does not wait for this task, and a
/// failed write is only logged. The handle is returned for callers that
/// want to observe completion; dropping it detaches the task.
pub fn spawn_cache_put(
    storage: Arc<dyn CacheStorage>,
    namespace: String,
    key: RequestKey,
    response: ProxyResponse,
    stats: Arc<FetchStats>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let label = key.to_string();

        match storage.put(&namespace, key, response).await {
            Ok(()) => {
                stats.record_recache();
                debug!("Re-cached {} in {}", label, namespace);
            }
            Err(e) => {
                warn!("Re-caching {} failed: {}", label, e);
            }
        }
    })
}
