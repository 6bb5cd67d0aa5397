//! Commands module
//!
//! Tauri command handlers organized by responsibility.

pub mod backgrounds;
pub mod covers;
pub mod games;
mod state;
pub mod system;

// Re-export state for use in the shell setup
pub use state::AppState;
