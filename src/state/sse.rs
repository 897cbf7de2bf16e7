use tokio::sync::{Mutex, broadcast};
use uuid::Uuid;

use crate::dto::sse::ServerEvent;

/// Display and admin broadcast channels.
pub struct SseState {
    public: SseHub,
    admin: AdminChannel,
}

impl SseState {
    /// Build both hubs with their channel capacities.
    pub fn new(public_capacity: usize, admin_capacity: usize) -> Self {
        Self {
            public: SseHub::new(public_capacity),
            admin: AdminChannel {
                hub: SseHub::new(admin_capacity),
                token: Mutex::new(None),
            },
        }
    }

    /// Hub feeding the display screens.
    pub fn public(&self) -> &SseHub {
        &self.public
    }

    /// Hub and token of the single admin console.
    pub fn admin(&self) -> &AdminChannel {
        &self.admin
    }
}

/// Admin hub plus the token held by the one connected admin stream.
pub struct AdminChannel {
    hub: SseHub,
    token: Mutex<Option<String>>,
}

impl AdminChannel {
    /// Hub for admin-only events.
    pub fn hub(&self) -> &SseHub {
        &self.hub
    }

    /// Issue a fresh token, or `None` when another admin stream holds one.
    pub async fn claim_token(&self) -> Option<String> {
        let mut guard = self.token.lock().await;
        if guard.is_some() {
            return None;
        }
        let token = Uuid::new_v4().simple().to_string();
        *guard = Some(token.clone());
        Some(token)
    }

    /// Drop the current token so the next admin stream gets a new one.
    pub async fn release_token(&self) {
        self.token.lock().await.take();
    }

    /// Whether `provided` is the token currently held. `None` when no admin stream is open.
    pub async fn check_token(&self, provided: &str) -> Option<bool> {
        let guard = self.token.lock().await;
        guard.as_deref().map(|token| token == provided)
    }
}

/// Broadcast fan-out to every subscriber of one SSE stream.
pub struct SseHub {
    sender: broadcast::Sender<ServerEvent>,
}

impl SseHub {
    /// Hub backed by a broadcast channel of `capacity` events.
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity);
        Self { sender }
    }

    /// New subscriber receiving events sent from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.sender.subscribe()
    }

    /// Send to all subscribers; having none is fine.
    pub fn broadcast(&self, event: ServerEvent) {
        let _ = self.sender.send(event);
    }
}
