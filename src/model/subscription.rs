use chrono::{DateTime, Duration, Utc};

use uuid::Uuid;

use crate::domain::{EmailAddress, ServiceName};

/// New Subscription request
#[derive(Debug)]
pub struct NewSubscription {
    /// Owning user
    pub user_id: Uuid,
    /// Owner contact, captured at creation time
    pub email: EmailAddress,
    pub name: ServiceName,
    pub start_date: DateTime<Utc>,
    pub duration_days: i32,
}

/// Owner-editable subset of a subscription
#[derive(Debug)]
pub struct SubscriptionUpdate {
    pub name: ServiceName,
    pub start_date: DateTime<Utc>,
    pub duration_days: i32,
    pub notification_enabled: bool,
}

/// Stored Subscription record
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Subscription {
    /// ID of the subscription
    pub id: Uuid,
    pub user_id: Uuid,
    /// User supplied data
    pub email: String,
    pub name: String,
    pub start_date: DateTime<Utc>,
    pub duration_days: i32,
    /// Derived from `start_date` and `duration_days`, recomputed on every
    /// create/update. Never written directly by callers.
    pub end_date: DateTime<Utc>,
    pub notification_enabled: bool,
    /// `None` until the first reminder goes out
    pub last_notification_sent: Option<DateTime<Utc>>,
    /// Creation and update timestamps
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Subscription {
    /// The single place the derived expiration date is computed
    pub fn end_date_for(start_date: DateTime<Utc>, duration_days: i32) -> DateTime<Utc> {
        start_date + Duration::days(duration_days as i64)
    }

    /// Whole days until expiration, truncated. Negative once expired.
    pub fn days_until_expiration(&self, now: DateTime<Utc>) -> i64 {
        (self.end_date - now).num_days()
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.end_date
    }

    /// Eligibility decision for an expiration reminder.
    ///
    /// The caller injects `now` so a whole batch is judged against a single
    /// timestamp and tests can pin the clock. Rules, in order:
    /// notifications enabled, not yet expired, within `days_before` days of
    /// the end date, and no reminder already sent on the same UTC calendar
    /// day.
    pub fn should_notify(&self, days_before: u32, now: DateTime<Utc>) -> bool {
        if !self.notification_enabled {
            return false;
        }

        if self.is_expired(now) {
            return false;
        }

        let days_left = self.days_until_expiration(now);
        if days_left > days_before as i64 || days_left < 0 {
            return false;
        }

        // At most one reminder per subscription per calendar day
        if let Some(last_sent) = self.last_notification_sent {
            if last_sent.date_naive() == now.date_naive() {
                return false;
            }
        }

        true
    }
}
