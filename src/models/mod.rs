//! Request and Response models for the proxy
//!
//! Control-channel messages and the DTOs of the proxy's own endpoints.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{ControlCommand, CLEAR_ALL_CACHES};
pub use responses::{ErrorResponse, HealthResponse, StatusResponse};
