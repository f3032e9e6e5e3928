use chrono::{DateTime, Utc};

use uuid::Uuid;

use sqlx::PgExecutor;

use crate::model::{NotificationLog, NotificationStatus};

/// Repository for the append-only notification attempt log.
///
/// Rows are written once and never updated or deleted.
pub struct NotificationLogRepo;

impl NotificationLogRepo {
    #[tracing::instrument(name = "Append notification log entry", skip(executor))]
    pub async fn append<'con>(
        executor: impl PgExecutor<'con>,
        subscription_id: Uuid,
        sent_at: DateTime<Utc>,
        status: NotificationStatus,
        error_message: Option<&str>,
    ) -> sqlx::Result<()> {
        sqlx::query(
            "insert into notification_logs (subscription_id, sent_at, status, error_message) \
             values ($1, $2, $3, $4)",
        )
        .bind(subscription_id)
        .bind(sent_at)
        .bind(status)
        .bind(error_message)
        .execute(executor)
        .await?;
        Ok(())
    }

    #[tracing::instrument(name = "Fetch notification history", skip(executor))]
    pub async fn fetch_by_subscription<'con>(
        executor: impl PgExecutor<'con>,
        subscription_id: Uuid,
    ) -> sqlx::Result<Vec<NotificationLog>> {
        sqlx::query_as::<_, NotificationLog>(
            "select * from notification_logs where subscription_id=$1 order by sent_at desc",
        )
        .bind(subscription_id)
        .fetch_all(executor)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::TimeZone;
    use sqlx::PgPool;

    use crate::model::NewSubscription;
    use crate::repo::SubscriptionRepo;

    #[sqlx::test]
    async fn append_keeps_every_attempt(pool: PgPool) {
        let sub = SubscriptionRepo::insert(
            &pool,
            &NewSubscription {
                user_id: Uuid::new_v4(),
                email: "owner@test.com".parse().unwrap(),
                name: "Test Service".parse().unwrap(),
                start_date: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
                duration_days: 30,
            },
        )
        .await
        .unwrap();

        let first = Utc.with_ymd_and_hms(2024, 1, 27, 9, 0, 0).unwrap();
        let second = Utc.with_ymd_and_hms(2024, 1, 28, 9, 0, 0).unwrap();

        NotificationLogRepo::append(
            &pool,
            sub.id,
            first,
            NotificationStatus::Failed,
            Some("connection refused"),
        )
        .await
        .expect("Failed to append log entry");
        NotificationLogRepo::append(&pool, sub.id, second, NotificationStatus::Success, None)
            .await
            .expect("Failed to append log entry");

        let history = NotificationLogRepo::fetch_by_subscription(&pool, sub.id)
            .await
            .expect("Failed to fetch history");

        assert_eq!(2, history.len());
        // Most recent first
        assert_eq!(NotificationStatus::Success, history[0].status);
        assert_eq!(NotificationStatus::Failed, history[1].status);
        assert_eq!(
            Some("connection refused".to_string()),
            history[1].error_message
        );
    }
}
