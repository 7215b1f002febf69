use serde::Serialize;
use uuid::Uuid;

use crate::models::Notification;

pub mod get;
pub mod update;

pub use get::get_notifications;
pub use update::mark_notification_read;

#[derive(Serialize, Debug)]
pub struct NotificationResponse{
    pub notification_id: Uuid,
    pub message: String,
    pub read: bool,
    pub created_at: String
}

impl From<Notification> for NotificationResponse {
    fn from(n: Notification) -> Self {
        NotificationResponse{
            notification_id: n.notification_id,
            message: n.message,
            read: n.read,
            created_at: n.created_at.to_rfc3339()
        }
    }
}
