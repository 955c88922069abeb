use dashmap::DashMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;
use uuid::Uuid;

/// Bookkeeping of live realtime connections.
///
/// Each entry owns the cancel handle of that connection's ticker. Entries are only
/// removed by dropping the [`ConnectionGuard`] handed out by [`register`](Self::register);
/// [`close_all`](Self::close_all) cancels them in place.
#[derive(Clone)]
pub struct ConnectionRegistry {
    active: Arc<DashMap<Uuid, CancellationToken>>,
    shutdown: CancellationToken,
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            active: Arc::new(DashMap::new()),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn register(&self) -> ConnectionGuard {
        let id = Uuid::new_v4();
        let cancel = CancellationToken::new();
        self.active.insert(id, cancel.clone());
        // Checked after the insert so a concurrent close_all either sees the entry or is seen here.
        if self.shutdown.is_cancelled() {
            cancel.cancel();
        }
        info!(connection_id = %id, active = self.active.len(), "Client connected");

        ConnectionGuard {
            id,
            cancel,
            active: Arc::clone(&self.active),
        }
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Cancels every current and future connection. Used on shutdown.
    pub fn close_all(&self) {
        info!(active = self.active.len(), "Closing all realtime connections");
        self.shutdown.cancel();
        for entry in self.active.iter() {
            entry.value().cancel();
        }
    }
}

/// Per-connection resource record. Dropping it stops the ticker and deregisters.
pub struct ConnectionGuard {
    id: Uuid,
    cancel: CancellationToken,
    active: Arc<DashMap<Uuid, CancellationToken>>,
}

impl ConnectionGuard {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn token(&self) -> &CancellationToken {
        &self.cancel
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.active.remove(&self.id);
        info!(connection_id = %self.id, active = self.active.len(), "Client disconnected");
    }
}
