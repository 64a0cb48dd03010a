use anyhow::Result;
use clap::Parser;
use sqlx::PgPool;
use speakmate::constants::{NOTIFICATION_CHECKER_INTERVAL_SECS, NOTIFICATION_RETRY_WINDOW_HOURS};
use speakmate::db::{self, DatabaseConfig, get_db_pool};
use speakmate::services::notifier::{self, NotificationOutcome};
use speakmate::services::onesignal::OneSignalService;
use speakmate::utils::{Config, init_logging};
use std::time::Duration;
use tokio::time;
use tracing::{error, info, warn};

/// Out-of-band reconciliation for failed push deliveries. The dispatcher
/// never retries synchronously; this worker re-drives pairs whose latest
/// attempt failed once the receiver has devices registered.
#[derive(Debug, Parser)]
#[command(name = "notification-checker")]
#[command(about = "Retry failed speaking push notifications out of band")]
struct Args {
    /// Seconds between scan passes
    #[arg(long, default_value_t = NOTIFICATION_CHECKER_INTERVAL_SECS)]
    interval_secs: u64,

    /// How many hours of notification log history to consider
    #[arg(long, default_value_t = NOTIFICATION_RETRY_WINDOW_HOURS)]
    window_hours: i64,

    /// Run a single pass and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let args = Args::parse();

    info!("🔔 Starting Speakmate Notification Checker...");

    let config = Config::from_env()?;
    let db_config = DatabaseConfig::from_env()?;
    let pool = get_db_pool(&db_config).await?;
    let push = OneSignalService::new(&config.push, &config.app_url);

    let mut interval = time::interval(Duration::from_secs(args.interval_secs.max(1)));

    loop {
        interval.tick().await;

        if let Err(err) = run_pass(&pool, &push, args.window_hours).await {
            error!("❌ Notification checker pass failed: {err:#}");
        }

        if args.once {
            break;
        }
    }

    Ok(())
}

async fn run_pass(pool: &PgPool, push: &OneSignalService, window_hours: i64) -> Result<()> {
    let pairs = db::notifications::recent_failed_pairs(pool, window_hours).await?;

    if pairs.is_empty() {
        info!("📊 No failed notifications to retry");
        return Ok(());
    }

    info!("🔍 Found {} pair(s) with a failed last delivery", pairs.len());

    for (sender_id, receiver_id) in pairs {
        // Only worth retrying once the receiver actually has devices.
        let player_ids = db::notifications::player_ids_for(pool, receiver_id).await?;
        if player_ids.is_empty() {
            continue;
        }

        match notifier::notify_connection_request(pool, push, sender_id, receiver_id).await {
            NotificationOutcome::Sent { devices } => {
                info!("✅ Redelivered {} -> {} to {} device(s)", sender_id, receiver_id, devices);
            }
            NotificationOutcome::NoDevices => {}
            NotificationOutcome::Failed { error } => {
                warn!("⚠️ Retry {} -> {} failed again: {}", sender_id, receiver_id, error);
            }
        }
    }

    Ok(())
}
