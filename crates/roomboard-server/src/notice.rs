//! Runtime notice board.
//!
//! A single message shown on every panel. It lives in memory only and resets
//! to the configured default on restart.

use tokio::sync::RwLock;
use tracing::info;

/// Guarded single-value store for the notice text.
#[derive(Debug)]
pub struct NoticeStore {
    notice: RwLock<String>,
}

impl NoticeStore {
    /// Creates a store holding `initial`.
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            notice: RwLock::new(initial.into()),
        }
    }

    /// Returns the current notice.
    pub async fn get(&self) -> String {
        self.notice.read().await.clone()
    }

    /// Replaces the notice and returns the stored value.
    pub async fn set(&self, notice: impl Into<String>) -> String {
        let mut guard = self.notice.write().await;
        *guard = notice.into();
        info!(len = guard.len(), "notice updated");
        guard.clone()
    }
}
