mod notification_log;
mod subscription;

pub use notification_log::{NotificationLog, NotificationStatus};
pub use subscription::{NewSubscription, Subscription, SubscriptionUpdate};
