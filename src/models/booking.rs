use chrono::{Duration, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub client_id: String,
    pub service_ids: Vec<String>,
    pub box_id: Option<String>,
    pub washer_id: Option<String>,
    pub scheduled_time: Option<NaiveDateTime>,
    pub duration_minutes: i32,
    pub status: BookingStatus,
    pub base_price: Decimal,
    pub discount_amount: Decimal,
    pub final_price: Decimal,
    pub created_by: Option<String>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Booking {
    pub fn end_time(&self) -> Option<NaiveDateTime> {
        self.scheduled_time
            .map(|start| start + Duration::minutes(self.duration_minutes as i64))
    }

    pub fn window(&self) -> Option<TimeWindow> {
        self.scheduled_time.map(|start| TimeWindow {
            start,
            end: start + Duration::minutes(self.duration_minutes as i64),
        })
    }

    pub fn is_active(&self) -> bool {
        matches!(self.status, BookingStatus::Pending | BookingStatus::InProgress)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::InProgress => "in_progress",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(BookingStatus::Pending),
            "in_progress" => Some(BookingStatus::InProgress),
            "completed" => Some(BookingStatus::Completed),
            "cancelled" => Some(BookingStatus::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeWindow {
    pub fn new(start: NaiveDateTime, duration_minutes: i32) -> Self {
        Self {
            start,
            end: start + Duration::minutes(duration_minutes as i64),
        }
    }

    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        // Half-open [start, end): touching windows do not overlap.
        self.start < other.end && other.start < self.end
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Box,
    Washer,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Box => "box",
            ResourceKind::Washer => "washer",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    fn window(start: &str, duration_minutes: i32) -> TimeWindow {
        TimeWindow::new(dt(start), duration_minutes)
    }

    #[test]
    fn test_overlap_inside() {
        let a = window("2026-08-20 10:00", 60);
        let b = window("2026-08-20 10:30", 60);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_overlap_containment() {
        let outer = window("2026-08-20 10:00", 120);
        let inner = window("2026-08-20 10:30", 30);
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn test_touching_windows_do_not_overlap() {
        let first = window("2026-08-20 10:00", 60);
        let second = window("2026-08-20 11:00", 60);
        assert!(!first.overlaps(&second));
        assert!(!second.overlaps(&first));
    }

    #[test]
    fn test_disjoint_windows_do_not_overlap() {
        let morning = window("2026-08-20 09:00", 30);
        let evening = window("2026-08-20 18:00", 30);
        assert!(!morning.overlaps(&evening));
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            BookingStatus::Pending,
            BookingStatus::InProgress,
            BookingStatus::Completed,
            BookingStatus::Cancelled,
        ] {
            assert_eq!(BookingStatus::from_str(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        assert_eq!(BookingStatus::from_str("confirmed"), None);
        assert_eq!(BookingStatus::from_str("PENDING"), None);
        assert_eq!(BookingStatus::from_str(""), None);
    }
}
