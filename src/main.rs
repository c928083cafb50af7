use std::sync::Arc;

use anyhow::Context;
use chrono::NaiveDate;
use tracing_subscriber::EnvFilter;

use washbook::config::AppConfig;
use washbook::seed;
use washbook::services::bookings::{BookingService, CreateBookingRequest, UpdateStatusRequest};
use washbook::storage::{InMemoryStorage, Storage};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();
    let storage: Arc<dyn Storage> = Arc::new(InMemoryStorage::new());

    seed::seed_demo_data(storage.as_ref()).await?;

    let bookings = BookingService::new(Arc::clone(&storage), config);

    let wash_box = storage
        .get_box_by_number(1, 1)
        .await?
        .context("box 1/1 missing after seed")?;
    let body_wash = storage
        .get_service_by_name("Body wash")
        .await?
        .context("Body wash service missing after seed")?;
    let drying = storage
        .get_service_by_name("Body wash + drying")
        .await?
        .context("drying service missing after seed")?;

    let day = NaiveDate::from_ymd_opt(2026, 9, 1).context("bad demo date")?;
    let ten = day.and_hms_opt(10, 0, 0).context("bad demo time")?;
    let half_past_ten = day.and_hms_opt(10, 30, 0).context("bad demo time")?;
    let eleven = day.and_hms_opt(11, 0, 0).context("bad demo time")?;

    let first = bookings
        .create(
            CreateBookingRequest {
                client_name: "Ivan Petrov".to_string(),
                client_phone: "+79990001122".to_string(),
                is_regular_client: true,
                service_ids: vec![body_wash.id.clone(), drying.id.clone()],
                box_id: Some(wash_box.id.clone()),
                washer_id: None,
                scheduled_time: Some(ten),
                duration_minutes: Some(60),
                notes: Some("sedan".to_string()),
            },
            None,
        )
        .await?;
    tracing::info!(
        booking_id = %first.id,
        base = %first.base_price,
        discount = %first.discount_amount,
        total = %first.final_price,
        "booking created for a regular client"
    );

    // Same box 30 minutes in, must be turned away.
    let overlapping = bookings
        .create(
            CreateBookingRequest {
                client_name: "Anna Smirnova".to_string(),
                client_phone: "+79990003344".to_string(),
                is_regular_client: false,
                service_ids: vec![body_wash.id.clone()],
                box_id: Some(wash_box.id.clone()),
                washer_id: None,
                scheduled_time: Some(half_past_ten),
                duration_minutes: Some(60),
                notes: None,
            },
            None,
        )
        .await;
    match overlapping {
        Ok(b) => tracing::warn!(booking_id = %b.id, "overlapping booking was accepted"),
        Err(e) => tracing::info!(reason = %e, "overlapping booking rejected"),
    }

    // Back to back is fine: the slot is half-open.
    let second = bookings
        .create(
            CreateBookingRequest {
                client_name: "Anna Smirnova".to_string(),
                client_phone: "+79990003344".to_string(),
                is_regular_client: false,
                service_ids: vec![body_wash.id.clone()],
                box_id: Some(wash_box.id.clone()),
                washer_id: None,
                scheduled_time: Some(eleven),
                duration_minutes: Some(60),
                notes: None,
            },
            None,
        )
        .await?;
    tracing::info!(
        booking_id = %second.id,
        total = %second.final_price,
        "back-to-back booking created"
    );

    let estimate = bookings.quote(&[drying.id.clone()], true).await?;
    tracing::info!(
        quote = %serde_json::to_string(&estimate)?,
        "quote for a regular client"
    );

    let started = bookings
        .update_status(UpdateStatusRequest {
            booking_id: first.id.clone(),
            new_status: "in_progress".to_string(),
        })
        .await?;
    tracing::info!(booking_id = %started.id, status = started.status.as_str(), "work started");

    let schedule = bookings.day_schedule(day).await?;
    tracing::info!(count = schedule.len(), date = %day, "schedule for the day");
    for booking in &schedule {
        if let Some(window) = booking.window() {
            tracing::info!(
                booking_id = %booking.id,
                from = %window.start.format("%H:%M"),
                to = %window.end.format("%H:%M"),
                status = booking.status.as_str(),
                total = %booking.final_price,
                "scheduled booking"
            );
        }
    }

    Ok(())
}
