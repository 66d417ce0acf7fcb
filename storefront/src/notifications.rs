use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use entities::enums::NotificationKind;
use entities::models::{Notification, NotificationId};
use interface::notifications::Notifier;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub message: String,
    expires_at: Option<Instant>,
}

impl Toast {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.map(|at| at <= now).unwrap_or(false)
    }
}

/// In-memory toast list shown at the top of every page.
#[derive(Default)]
pub struct ToastCenter {
    next_id: AtomicU64,
    toasts: RwLock<Vec<Toast>>,
}

impl ToastCenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toasts that are still visible, oldest first. Expired ones are dropped.
    pub async fn active(&self) -> Vec<Toast> {
        let now = Instant::now();
        let mut toasts = self.toasts.write().await;
        toasts.retain(|t| !t.is_expired(now));
        toasts.clone()
    }

    pub async fn clear(&self) {
        self.toasts.write().await.clear();
    }
}

#[async_trait]
impl Notifier for ToastCenter {
    async fn show(&self, notification: Notification) -> NotificationId {
        let id = NotificationId(self.next_id.fetch_add(1, Ordering::Relaxed));
        debug!("Showing {:?} notification {:?}", notification.kind, id);

        self.toasts.write().await.push(Toast {
            id,
            kind: notification.kind,
            message: notification.message,
            expires_at: notification.duration.map(|d| Instant::now() + d),
        });
        id
    }

    async fn dismiss(&self, id: NotificationId) {
        self.toasts.write().await.retain(|t| t.id != id);
    }
}
