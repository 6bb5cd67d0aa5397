//! Utility modules
//!
//! Shared helpers for HTTP clients and platform paths.

pub mod http;
pub mod system;

pub use http::{create_fetch_client, create_probe_client};
pub use system::get_cache_dir;
