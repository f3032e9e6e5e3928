use chrono::{DateTime, Duration, Utc};

use uuid::Uuid;

use sqlx::PgExecutor;

use crate::model::{NewSubscription, Subscription, SubscriptionUpdate};

/// Repository for interfacing with the subscriptions table.
///
/// `end_date` is derived state: `insert` and `update` recompute it from
/// `start_date` and `duration_days` in the same statement that writes those
/// fields, so it can never drift.
pub struct SubscriptionRepo;

impl SubscriptionRepo {
    /// Candidate window for expiration reminders: subscriptions ending
    /// between `as_of` and `as_of + days_before` days.
    ///
    /// This is the coarse, index-friendly pre-filter; the per-item decision
    /// (including the once-per-day check) is re-verified in process by
    /// `Subscription::should_notify`.
    pub fn expiry_window(
        as_of: DateTime<Utc>,
        days_before: u32,
    ) -> (DateTime<Utc>, DateTime<Utc>) {
        (as_of, as_of + Duration::days(days_before as i64))
    }

    #[tracing::instrument(name = "Insert subscription", skip(executor))]
    pub async fn insert<'con>(
        executor: impl PgExecutor<'con>,
        new_subscription: &NewSubscription,
    ) -> sqlx::Result<Subscription> {
        let end_date =
            Subscription::end_date_for(new_subscription.start_date, new_subscription.duration_days);

        sqlx::query_as::<_, Subscription>(
            "insert into subscriptions \
                (user_id, email, name, start_date, duration_days, end_date) \
             values ($1, $2, $3, $4, $5, $6) \
             returning *",
        )
        .bind(new_subscription.user_id)
        .bind(new_subscription.email.as_ref())
        .bind(new_subscription.name.as_ref())
        .bind(new_subscription.start_date)
        .bind(new_subscription.duration_days)
        .bind(end_date)
        .fetch_one(executor)
        .await
    }

    #[tracing::instrument(name = "Update subscription", skip(executor))]
    pub async fn update<'con>(
        executor: impl PgExecutor<'con>,
        id: Uuid,
        update: &SubscriptionUpdate,
    ) -> sqlx::Result<Subscription> {
        let end_date = Subscription::end_date_for(update.start_date, update.duration_days);

        sqlx::query_as::<_, Subscription>(
            "update subscriptions \
             set name=$2, start_date=$3, duration_days=$4, end_date=$5, \
                 notification_enabled=$6, updated_at=now() \
             where id=$1 \
             returning *",
        )
        .bind(id)
        .bind(update.name.as_ref())
        .bind(update.start_date)
        .bind(update.duration_days)
        .bind(end_date)
        .bind(update.notification_enabled)
        .fetch_one(executor)
        .await
    }

    #[tracing::instrument(name = "Toggle subscription notifications", skip(executor))]
    pub async fn set_notification_enabled<'con>(
        executor: impl PgExecutor<'con>,
        id: Uuid,
        enabled: bool,
    ) -> sqlx::Result<Subscription> {
        sqlx::query_as::<_, Subscription>(
            "update subscriptions set notification_enabled=$2, updated_at=now() \
             where id=$1 returning *",
        )
        .bind(id)
        .bind(enabled)
        .fetch_one(executor)
        .await
    }

    #[tracing::instrument(name = "Fetch subscription by id", skip(executor))]
    pub async fn fetch_by_id<'con>(
        executor: impl PgExecutor<'con>,
        id: Uuid,
    ) -> sqlx::Result<Option<Subscription>> {
        sqlx::query_as::<_, Subscription>("select * from subscriptions where id=$1")
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    #[tracing::instrument(name = "Fetch subscriptions for user", skip(executor))]
    pub async fn fetch_by_user<'con>(
        executor: impl PgExecutor<'con>,
        user_id: Uuid,
    ) -> sqlx::Result<Vec<Subscription>> {
        sqlx::query_as::<_, Subscription>(
            "select * from subscriptions where user_id=$1 order by end_date asc",
        )
        .bind(user_id)
        .fetch_all(executor)
        .await
    }

    #[tracing::instrument(name = "Delete subscription", skip(executor))]
    pub async fn delete<'con>(executor: impl PgExecutor<'con>, id: Uuid) -> sqlx::Result<()> {
        sqlx::query("delete from subscriptions where id=$1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(())
    }

    /// Fetch reminder candidates: enabled subscriptions ending within the
    /// expiry window.
    #[tracing::instrument(name = "Fetch expiring subscriptions", skip(executor))]
    pub async fn fetch_expiring<'con>(
        executor: impl PgExecutor<'con>,
        as_of: DateTime<Utc>,
        days_before: u32,
    ) -> sqlx::Result<Vec<Subscription>> {
        let (window_start, window_end) = Self::expiry_window(as_of, days_before);

        sqlx::query_as::<_, Subscription>(
            "select * from subscriptions \
             where notification_enabled = true \
               and end_date >= $1 and end_date <= $2 \
             order by end_date asc",
        )
        .bind(window_start)
        .bind(window_end)
        .fetch_all(executor)
        .await
    }

    /// The only subscription field the notification pipeline ever writes.
    #[tracing::instrument(name = "Stamp last notification sent", skip(executor))]
    pub async fn update_last_notification_sent<'con>(
        executor: impl PgExecutor<'con>,
        id: Uuid,
        sent_at: DateTime<Utc>,
    ) -> sqlx::Result<()> {
        sqlx::query("update subscriptions set last_notification_sent=$2 where id=$1")
            .bind(id)
            .bind(sent_at)
            .execute(executor)
            .await?;
        Ok(())
    }
}
