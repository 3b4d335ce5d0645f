//! Hook interface the host binds its events to.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::proxy::{ProxyRequest, ProxyResponse};

// == Fetch Outcome ==
/// What the fetch hook decided for an intercepted request.
#[derive(Debug)]
pub enum FetchOutcome {
    /// Not handled; the host performs its default fetch with the request.
    Passthrough(ProxyRequest),
    /// Answer with this response.
    Respond(ProxyResponse),
    /// Handled, but nothing usable could be produced. Surfaces as a failed load.
    NoResponse,
}

// == Worker Hooks ==
/// Event hooks of a worker instance.
///
/// The host awaits every returned future before considering the event
/// finished; work the hook spawns separately is not awaited.
#[async_trait]
pub trait WorkerHooks: Send + Sync {
    /// `install` lifecycle event.
    async fn on_install(&self) -> Result<()>;

    /// `activate` lifecycle event.
    async fn on_activate(&self) -> Result<()>;

    /// An intercepted outbound request.
    async fn on_fetch(&self, request: ProxyRequest) -> FetchOutcome;

    /// A structured message posted by a client.
    async fn on_message(&self, message: &Value) -> Result<()>;
}
