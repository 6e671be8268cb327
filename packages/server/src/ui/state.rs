//! Shared application state.

use std::sync::Arc;

use crate::usecase::SessionCoordinator;

/// Shared application state
pub struct AppState {
    /// SessionCoordinator（全ての接続イベントの窓口）
    pub coordinator: Arc<SessionCoordinator>,
}
