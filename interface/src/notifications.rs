use async_trait::async_trait;
use entities::models::{Notification, NotificationId};
use mockall::automock;

#[automock]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn show(&self, notification: Notification) -> NotificationId;
    async fn dismiss(&self, id: NotificationId);
}
