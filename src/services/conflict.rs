use chrono::NaiveDateTime;
use serde::Serialize;

use crate::errors::Result;
use crate::models::{ResourceKind, TimeWindow};
use crate::storage::Storage;

#[derive(Debug, Clone, Serialize)]
pub struct Conflict {
    pub resource: ResourceKind,
    pub resource_label: String,
    pub booking_id: String,
    pub starts_at: NaiveDateTime,
    pub ends_at: NaiveDateTime,
}

impl std::fmt::Display for Conflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} is already booked at this time (booking #{}, {} - {})",
            self.resource_label,
            self.booking_id,
            self.starts_at.format("%d.%m.%Y %H:%M"),
            self.ends_at.format("%H:%M"),
        )
    }
}

pub async fn find_conflict(
    storage: &dyn Storage,
    resource: ResourceKind,
    resource_id: &str,
    resource_label: &str,
    window: TimeWindow,
    exclude_booking_id: Option<&str>,
) -> Result<Option<Conflict>> {
    let mut candidates = match resource {
        ResourceKind::Box => storage.get_active_bookings_for_box(resource_id).await?,
        ResourceKind::Washer => storage.get_active_bookings_for_washer(resource_id).await?,
    };
    // Earliest start wins, id breaks ties, so the reported conflict is stable
    // no matter how the backend orders its results.
    candidates.sort_by(|a, b| (a.scheduled_time, &a.id).cmp(&(b.scheduled_time, &b.id)));

    for booking in &candidates {
        if exclude_booking_id == Some(booking.id.as_str()) {
            continue;
        }
        // Drafts have no scheduled time and occupy nothing.
        let existing = match booking.window() {
            Some(w) => w,
            None => continue,
        };
        if existing.overlaps(&window) {
            tracing::debug!(
                resource = resource.as_str(),
                booking_id = %booking.id,
                "schedule conflict"
            );
            return Ok(Some(Conflict {
                resource,
                resource_label: resource_label.to_string(),
                booking_id: booking.id.clone(),
                starts_at: existing.start,
                ends_at: existing.end,
            }));
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Booking, BookingStatus};
    use crate::storage::InMemoryStorage;
    use rust_decimal::Decimal;

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    fn make_booking(
        id: &str,
        box_id: Option<&str>,
        washer_id: Option<&str>,
        scheduled: Option<&str>,
        duration_minutes: i32,
        status: BookingStatus,
    ) -> Booking {
        let now = chrono::Utc::now().naive_utc();
        Booking {
            id: id.to_string(),
            client_id: "client-1".to_string(),
            service_ids: vec![],
            box_id: box_id.map(str::to_string),
            washer_id: washer_id.map(str::to_string),
            scheduled_time: scheduled.map(dt),
            duration_minutes,
            status,
            base_price: Decimal::ZERO,
            discount_amount: Decimal::ZERO,
            final_price: Decimal::ZERO,
            created_by: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    async fn storage_with(bookings: Vec<Booking>) -> InMemoryStorage {
        let storage = InMemoryStorage::new();
        for b in &bookings {
            storage.save_booking(b).await.unwrap();
        }
        storage
    }

    fn window(start: &str, duration_minutes: i32) -> TimeWindow {
        TimeWindow::new(dt(start), duration_minutes)
    }

    #[tokio::test]
    async fn test_overlap_detected() {
        let storage = storage_with(vec![make_booking(
            "b1",
            Some("box-1"),
            None,
            Some("2026-08-20 10:00"),
            60,
            BookingStatus::Pending,
        )])
        .await;

        let conflict = find_conflict(
            &storage,
            ResourceKind::Box,
            "box-1",
            "Box 1, place 1",
            window("2026-08-20 10:30", 60),
            None,
        )
        .await
        .unwrap();

        let conflict = conflict.expect("overlap expected");
        assert_eq!(conflict.booking_id, "b1");
        assert_eq!(conflict.starts_at, dt("2026-08-20 10:00"));
        assert_eq!(conflict.ends_at, dt("2026-08-20 11:00"));
    }

    #[tokio::test]
    async fn test_adjacent_windows_do_not_conflict() {
        let storage = storage_with(vec![make_booking(
            "b1",
            Some("box-1"),
            None,
            Some("2026-08-20 10:00"),
            60,
            BookingStatus::Pending,
        )])
        .await;

        // 11:00 starts exactly when the existing booking ends
        let after = find_conflict(
            &storage,
            ResourceKind::Box,
            "box-1",
            "Box 1, place 1",
            window("2026-08-20 11:00", 60),
            None,
        )
        .await
        .unwrap();
        assert!(after.is_none());

        // 09:00-10:00 ends exactly when the existing booking starts
        let before = find_conflict(
            &storage,
            ResourceKind::Box,
            "box-1",
            "Box 1, place 1",
            window("2026-08-20 09:00", 60),
            None,
        )
        .await
        .unwrap();
        assert!(before.is_none());
    }

    #[tokio::test]
    async fn test_terminal_statuses_do_not_block() {
        let storage = storage_with(vec![
            make_booking(
                "b1",
                Some("box-1"),
                None,
                Some("2026-08-20 10:00"),
                60,
                BookingStatus::Completed,
            ),
            make_booking(
                "b2",
                Some("box-1"),
                None,
                Some("2026-08-20 10:00"),
                60,
                BookingStatus::Cancelled,
            ),
        ])
        .await;

        let conflict = find_conflict(
            &storage,
            ResourceKind::Box,
            "box-1",
            "Box 1, place 1",
            window("2026-08-20 10:00", 60),
            None,
        )
        .await
        .unwrap();
        assert!(conflict.is_none());
    }

    #[tokio::test]
    async fn test_excludes_own_booking_id() {
        let storage = storage_with(vec![make_booking(
            "b1",
            Some("box-1"),
            None,
            Some("2026-08-20 10:00"),
            60,
            BookingStatus::Pending,
        )])
        .await;

        let conflict = find_conflict(
            &storage,
            ResourceKind::Box,
            "box-1",
            "Box 1, place 1",
            window("2026-08-20 10:00", 90),
            Some("b1"),
        )
        .await
        .unwrap();
        assert!(conflict.is_none());
    }

    #[tokio::test]
    async fn test_draft_candidates_are_skipped() {
        let storage = storage_with(vec![make_booking(
            "b1",
            Some("box-1"),
            None,
            None,
            60,
            BookingStatus::Pending,
        )])
        .await;

        let conflict = find_conflict(
            &storage,
            ResourceKind::Box,
            "box-1",
            "Box 1, place 1",
            window("2026-08-20 10:00", 60),
            None,
        )
        .await
        .unwrap();
        assert!(conflict.is_none());
    }

    #[tokio::test]
    async fn test_earliest_overlap_reported_first() {
        // Inserted out of order on purpose
        let storage = storage_with(vec![
            make_booking(
                "late",
                Some("box-1"),
                None,
                Some("2026-08-20 11:00"),
                60,
                BookingStatus::Pending,
            ),
            make_booking(
                "early",
                Some("box-1"),
                None,
                Some("2026-08-20 10:00"),
                60,
                BookingStatus::Pending,
            ),
        ])
        .await;

        let conflict = find_conflict(
            &storage,
            ResourceKind::Box,
            "box-1",
            "Box 1, place 1",
            window("2026-08-20 10:30", 120),
            None,
        )
        .await
        .unwrap()
        .expect("overlap expected");
        assert_eq!(conflict.booking_id, "early");
    }

    #[tokio::test]
    async fn test_equal_start_ties_break_by_id() {
        let storage = storage_with(vec![
            make_booking(
                "b2",
                Some("box-1"),
                None,
                Some("2026-08-20 10:00"),
                30,
                BookingStatus::Pending,
            ),
            make_booking(
                "b1",
                Some("box-1"),
                None,
                Some("2026-08-20 10:00"),
                60,
                BookingStatus::Pending,
            ),
        ])
        .await;

        let conflict = find_conflict(
            &storage,
            ResourceKind::Box,
            "box-1",
            "Box 1, place 1",
            window("2026-08-20 10:00", 60),
            None,
        )
        .await
        .unwrap()
        .expect("overlap expected");
        assert_eq!(conflict.booking_id, "b1");
    }

    #[tokio::test]
    async fn test_washer_axis_is_independent() {
        let storage = storage_with(vec![make_booking(
            "b1",
            Some("box-1"),
            Some("washer-1"),
            Some("2026-08-20 10:00"),
            60,
            BookingStatus::Pending,
        )])
        .await;

        // Same time on a different washer is fine
        let conflict = find_conflict(
            &storage,
            ResourceKind::Washer,
            "washer-2",
            "Washer Boris",
            window("2026-08-20 10:00", 60),
            None,
        )
        .await
        .unwrap();
        assert!(conflict.is_none());

        // Same washer at the same time is not
        let conflict = find_conflict(
            &storage,
            ResourceKind::Washer,
            "washer-1",
            "Washer Anna",
            window("2026-08-20 10:00", 60),
            None,
        )
        .await
        .unwrap();
        assert!(conflict.is_some());
    }

    #[test]
    fn test_conflict_message_format() {
        let conflict = Conflict {
            resource: ResourceKind::Box,
            resource_label: "Box 1, place 2".to_string(),
            booking_id: "abc123".to_string(),
            starts_at: dt("2026-08-20 10:00"),
            ends_at: dt("2026-08-20 11:30"),
        };
        assert_eq!(
            conflict.to_string(),
            "Box 1, place 2 is already booked at this time (booking #abc123, 20.08.2026 10:00 - 11:30)"
        );
    }
}
