//! Application state shared by command handlers

use std::sync::Arc;

use crate::arcade::Arcade;

pub struct AppState {
    pub arcade: Arc<Arcade>,
}

impl AppState {
    pub fn new(arcade: Arc<Arcade>) -> Self {
        Self { arcade }
    }
}
