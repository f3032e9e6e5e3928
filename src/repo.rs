mod notification_logs;
mod subscriptions;

pub use notification_logs::NotificationLogRepo;
pub use subscriptions::SubscriptionRepo;
