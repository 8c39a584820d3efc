//! DetailDesk client - demo entry point.
//!
//! Loads the schedule for the weeks around today through the full service
//! stack and prints the merged view. Points at a live backend when
//! `DETAILDESK_API_URL` is set, otherwise serves seeded in-memory data.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use detaildesk_client::application::services::ScheduleService;
use detaildesk_client::infrastructure::{HttpScheduleApi, InMemoryScheduleApi};
use detaildesk_client::ports::outbound::ScheduleApiPort;
use detaildesk_domain::DateRange;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "detaildesk_client=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let api: Arc<dyn ScheduleApiPort> = match std::env::var("DETAILDESK_API_URL") {
        Ok(url) => {
            tracing::info!(%url, "using HTTP schedule API");
            Arc::new(HttpScheduleApi::new(&url))
        }
        Err(_) => {
            tracing::info!("DETAILDESK_API_URL not set, using in-memory demo data");
            Arc::new(InMemoryScheduleApi::with_demo_data())
        }
    };

    let service = ScheduleService::new(api);

    let today = Utc::now().date_naive();
    let range = DateRange::from_dates(today - Duration::days(7), today + Duration::days(7))?;

    let snapshot = service.load(range, false).await;
    if snapshot.is_degraded() {
        for failure in &snapshot.source_errors {
            tracing::warn!(source = %failure.source, error = %failure.error, "source degraded");
        }
    }

    println!(
        "{} appointments for {}:",
        snapshot.appointments.len(),
        range.range_key()
    );
    for appointment in &snapshot.appointments {
        println!(
            "  {}  {:<11} {}{}",
            appointment.start.format("%Y-%m-%d %H:%M"),
            appointment.status.to_string(),
            appointment.title,
            if appointment.is_protocol { " [protocol]" } else { "" }
        );
    }

    let stats = service.load_stats(range, false).await;
    println!(
        "totals: {} scheduled, {} of them protocol-derived",
        stats.total, stats.protocol_count
    );

    Ok(())
}
