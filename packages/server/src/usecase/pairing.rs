//! Ordering between pairing announcements and peer-left notifications.

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

/// Held while a pairing is announced (`joined_chat` / `chat_started`) and while
/// a departure is announced (`user_left`).
///
/// Only sessions that reached `Paired` under this lock have been told about
/// their peer, so a remaining occupant that is not `Paired` never receives
/// `user_left`.
#[derive(Clone, Default)]
pub struct PairingLock(Arc<Mutex<()>>);

impl PairingLock {
    pub async fn acquire(&self) -> MutexGuard<'_, ()> {
        self.0.lock().await
    }
}
