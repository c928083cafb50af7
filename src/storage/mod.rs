pub mod memory;

use std::any::Any;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::Result;
use crate::models::{Booking, Client, Service, WashBox, Washer};

pub use memory::InMemoryStorage;

// Held across a conflict scan and the save that follows it. While a guard
// is alive no other scheduling write may start, so the scan stays valid.
pub struct ScheduleGuard {
    _held: Box<dyn Any + Send>,
}

impl ScheduleGuard {
    pub fn hold(token: impl Any + Send) -> Self {
        Self { _held: Box::new(token) }
    }
}

#[async_trait]
pub trait Storage: Send + Sync {
    async fn lock_schedule(&self) -> ScheduleGuard;

    // ── Bookings ──

    async fn save_booking(&self, booking: &Booking) -> Result<()>;
    async fn get_booking(&self, id: &str) -> Result<Option<Booking>>;
    async fn get_active_bookings_for_box(&self, box_id: &str) -> Result<Vec<Booking>>;
    async fn get_active_bookings_for_washer(&self, washer_id: &str) -> Result<Vec<Booking>>;
    async fn get_bookings_for_day(&self, day: NaiveDate) -> Result<Vec<Booking>>;

    // ── Clients ──

    async fn get_client(&self, id: &str) -> Result<Option<Client>>;
    async fn get_client_by_phone(&self, phone: &str) -> Result<Option<Client>>;
    async fn save_client(&self, client: &Client) -> Result<()>;

    // ── Services ──

    async fn get_service(&self, id: &str) -> Result<Option<Service>>;
    async fn get_service_by_name(&self, name: &str) -> Result<Option<Service>>;
    async fn list_active_services(&self) -> Result<Vec<Service>>;
    async fn save_service(&self, service: &Service) -> Result<()>;

    // ── Boxes ──

    async fn get_box(&self, id: &str) -> Result<Option<WashBox>>;
    async fn get_box_by_number(&self, box_number: i32, place_number: i32)
        -> Result<Option<WashBox>>;
    async fn save_box(&self, wash_box: &WashBox) -> Result<()>;
    async fn delete_box(&self, id: &str) -> Result<()>;

    // ── Washers ──

    async fn get_washer(&self, id: &str) -> Result<Option<Washer>>;
    async fn save_washer(&self, washer: &Washer) -> Result<()>;
    async fn delete_washer(&self, id: &str) -> Result<()>;
}
