//! Background Tasks Module
//!
//! Work the proxy spawns without tying it to an event's completion.
//!
//! # Tasks
//! - Re-cache: stores a successful network response after it was served

mod recache;

pub use recache::spawn_cache_put;
