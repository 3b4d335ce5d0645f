//! Client control messages
//!
//! Clients post arbitrary JSON to the worker; only objects whose `type`
//! names a known command are acted on.

use serde_json::Value;

/// Message type that wipes every cache namespace.
pub const CLEAR_ALL_CACHES: &str = "CLEAR_ALL_CACHES";

/// Commands recognised on the control channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    /// Delete every namespace, current one included
    ClearAllCaches,
}

impl ControlCommand {
    /// Extracts a command from a client message.
    ///
    /// Returns None for non-objects, missing or non-string `type` fields,
    /// and unknown types.
    pub fn from_message(message: &Value) -> Option<Self> {
        match message.get("type").and_then(Value::as_str) {
            Some(CLEAR_ALL_CACHES) => Some(Self::ClearAllCaches),
            _ => None,
        }
    }
}
