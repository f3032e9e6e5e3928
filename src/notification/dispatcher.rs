use anyhow::Context;

use chrono::{DateTime, Utc};

use sqlx::PgPool;

use crate::client::EmailClient;
use crate::domain::EmailAddress;
use crate::error;
use crate::model::{NotificationStatus, Subscription};
use crate::notification::expiration_warning;
use crate::repo::{NotificationLogRepo, SubscriptionRepo};

/// Aggregated outcome of one dispatch run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub sent: usize,
    pub failed: usize,
}

/// Drives one expiration-reminder batch: fetch candidates, re-check
/// eligibility per item, deliver, and record every attempt.
///
/// A failed fetch aborts the run; once candidates are in hand, per-item
/// failures are logged and counted but never stop the batch.
#[derive(Debug)]
pub struct NotificationDispatcher {
    pool: PgPool,
    email_client: EmailClient,
}

impl NotificationDispatcher {
    pub fn new(pool: PgPool, email_client: EmailClient) -> Self {
        Self { pool, email_client }
    }

    #[tracing::instrument(name = "Notification run", skip(self))]
    pub async fn run(&self, days_before: u32) -> anyhow::Result<RunSummary> {
        self.run_at(days_before, Utc::now()).await
    }

    /// `now` is captured once for the whole batch: every candidate is judged
    /// against the same timestamp, and tests can pin the clock.
    pub async fn run_at(&self, days_before: u32, now: DateTime<Utc>) -> anyhow::Result<RunSummary> {
        let candidates = SubscriptionRepo::fetch_expiring(&self.pool, now, days_before)
            .await
            .context("Failed to fetch expiring subscriptions")?;

        tracing::info!(
            "Found {} candidate subscription(s) expiring within {} days",
            candidates.len(),
            days_before
        );

        let mut summary = RunSummary::default();

        for subscription in candidates {
            if !subscription.should_notify(days_before, now) {
                continue;
            }

            match self.dispatch(&subscription, now).await {
                Ok(()) => {
                    tracing::info!(
                        subscription_id = %subscription.id,
                        recipient = %subscription.email,
                        "Reminder sent",
                    );
                    summary.sent += 1;
                }
                Err(error) => {
                    tracing::error!(
                        error.cause_chain = ?error,
                        subscription_id = %subscription.id,
                        "Failed to send reminder",
                    );
                    summary.failed += 1;
                }
            }
        }

        tracing::info!(
            sent = summary.sent,
            failed = summary.failed,
            "Notification run complete",
        );

        Ok(summary)
    }

    /// Deliver one reminder and record the attempt.
    ///
    /// On success the outcome row is appended and the subscription is stamped
    /// with `now`; failures of that bookkeeping are only logged, since the
    /// message is already out and escalating could trigger a duplicate send.
    /// On delivery failure the subscription is left unstamped so a later run
    /// the same day may retry.
    async fn dispatch(&self, subscription: &Subscription, now: DateTime<Utc>) -> error::Result<()> {
        let attempt = self.deliver(subscription, now).await;

        match attempt {
            Ok(()) => {
                let logged = NotificationLogRepo::append(
                    &self.pool,
                    subscription.id,
                    now,
                    NotificationStatus::Success,
                    None,
                )
                .await;
                if let Err(error) = logged {
                    tracing::warn!(
                        error.cause_chain = ?error,
                        subscription_id = %subscription.id,
                        "Failed to append success log entry",
                    );
                }

                let stamped =
                    SubscriptionRepo::update_last_notification_sent(&self.pool, subscription.id, now)
                        .await;
                if let Err(error) = stamped {
                    tracing::warn!(
                        error.cause_chain = ?error,
                        subscription_id = %subscription.id,
                        "Failed to update last notification timestamp",
                    );
                }

                Ok(())
            }
            Err(error) => {
                let detail = error.to_string();
                let logged = NotificationLogRepo::append(
                    &self.pool,
                    subscription.id,
                    now,
                    NotificationStatus::Failed,
                    Some(&detail),
                )
                .await;
                if let Err(log_error) = logged {
                    tracing::warn!(
                        error.cause_chain = ?log_error,
                        subscription_id = %subscription.id,
                        "Failed to append failure log entry",
                    );
                }

                Err(error)
            }
        }
    }

    async fn deliver(&self, subscription: &Subscription, now: DateTime<Utc>) -> error::Result<()> {
        // A stored address that no longer parses counts as a delivery failure
        let recipient: EmailAddress = subscription.email.parse()?;

        let days_left = subscription.days_until_expiration(now);
        let email = expiration_warning(&subscription.name, days_left, subscription.end_date);

        self.email_client.send(&recipient, &email).await
    }
}
