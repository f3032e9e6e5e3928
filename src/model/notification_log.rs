use chrono::{DateTime, Utc};

use uuid::Uuid;

/// Outcome of a single notification attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "notification_status", rename_all = "lowercase")]
pub enum NotificationStatus {
    Success,
    Failed,
}

/// Append-only record of one notification attempt for one subscription.
/// Audit history only; eligibility decisions never read it, they go through
/// `last_notification_sent` on the subscription itself.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct NotificationLog {
    pub id: Uuid,
    pub subscription_id: Uuid,
    pub sent_at: DateTime<Utc>,
    pub status: NotificationStatus,
    pub error_message: Option<String>,
}
