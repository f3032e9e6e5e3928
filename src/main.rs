use std::env;

use anyhow::Context;

use sqlx::PgPool;

use renewguard::client::EmailClient;
use renewguard::notification::NotificationDispatcher;
use renewguard::scheduler::Scheduler;
use renewguard::settings::Settings;
use renewguard::telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_filter = env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let subscriber = telemetry::create_subscriber(env_filter, std::io::stdout);
    telemetry::set_subscriber(subscriber)?;

    let settings = Settings::load().context("Failed to load settings")?;

    let pool = PgPool::connect_with(settings.database.with_db())
        .await
        .context("Failed to connect to database")?;

    let email_client = EmailClient::new(
        settings.email.sender(),
        settings.email.api_timeout(),
        settings.email.api_base_url(),
        settings.email.api_auth_token(),
    )?;

    let dispatcher = NotificationDispatcher::new(pool, email_client);
    let scheduler = Scheduler::new(dispatcher, settings.scheduler)?;

    // Operational entry point: perform a single notification run and exit
    if env::args().any(|arg| arg == "--run-now") {
        let summary = scheduler.run_now().await?;
        tracing::info!(
            sent = summary.sent,
            failed = summary.failed,
            "Manual notification run complete",
        );
        return Ok(());
    }

    scheduler.run().await
}
