use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::{Mutex, RwLock};

use crate::errors::{AppError, Result};
use crate::models::{Booking, Client, Service, WashBox, Washer};
use crate::storage::{ScheduleGuard, Storage};

#[derive(Default)]
struct Inner {
    bookings: HashMap<String, Booking>,
    clients: HashMap<String, Client>,
    services: HashMap<String, Service>,
    boxes: HashMap<String, WashBox>,
    washers: HashMap<String, Washer>,
}

pub struct InMemoryStorage {
    inner: RwLock<Inner>,
    schedule_lock: Arc<Mutex<()>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            schedule_lock: Arc::new(Mutex::new(())),
        }
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn lock_schedule(&self) -> ScheduleGuard {
        ScheduleGuard::hold(Arc::clone(&self.schedule_lock).lock_owned().await)
    }

    // ── Bookings ──

    async fn save_booking(&self, booking: &Booking) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.bookings.insert(booking.id.clone(), booking.clone());
        Ok(())
    }

    async fn get_booking(&self, id: &str) -> Result<Option<Booking>> {
        let inner = self.inner.read().await;
        Ok(inner.bookings.get(id).cloned())
    }

    async fn get_active_bookings_for_box(&self, box_id: &str) -> Result<Vec<Booking>> {
        let inner = self.inner.read().await;
        Ok(inner
            .bookings
            .values()
            .filter(|b| b.box_id.as_deref() == Some(box_id) && b.is_active())
            .cloned()
            .collect())
    }

    async fn get_active_bookings_for_washer(&self, washer_id: &str) -> Result<Vec<Booking>> {
        let inner = self.inner.read().await;
        Ok(inner
            .bookings
            .values()
            .filter(|b| b.washer_id.as_deref() == Some(washer_id) && b.is_active())
            .cloned()
            .collect())
    }

    async fn get_bookings_for_day(&self, day: NaiveDate) -> Result<Vec<Booking>> {
        let inner = self.inner.read().await;
        let mut bookings: Vec<Booking> = inner
            .bookings
            .values()
            .filter(|b| b.scheduled_time.map(|t| t.date()) == Some(day))
            .cloned()
            .collect();
        bookings.sort_by(|a, b| (a.scheduled_time, &a.id).cmp(&(b.scheduled_time, &b.id)));
        Ok(bookings)
    }

    // ── Clients ──

    async fn get_client(&self, id: &str) -> Result<Option<Client>> {
        let inner = self.inner.read().await;
        Ok(inner.clients.get(id).cloned())
    }

    async fn get_client_by_phone(&self, phone: &str) -> Result<Option<Client>> {
        let inner = self.inner.read().await;
        Ok(inner.clients.values().find(|c| c.phone == phone).cloned())
    }

    async fn save_client(&self, client: &Client) -> Result<()> {
        if !(0..=100).contains(&client.discount_percent) {
            return Err(AppError::validation(
                "discount_percent",
                format!("must be between 0 and 100, got {}", client.discount_percent),
            ));
        }
        let mut inner = self.inner.write().await;
        let taken = inner
            .clients
            .values()
            .any(|c| c.phone == client.phone && c.id != client.id);
        if taken {
            return Err(AppError::Integrity(format!(
                "client phone {} is already registered",
                client.phone
            )));
        }
        inner.clients.insert(client.id.clone(), client.clone());
        Ok(())
    }

    // ── Services ──

    async fn get_service(&self, id: &str) -> Result<Option<Service>> {
        let inner = self.inner.read().await;
        Ok(inner.services.get(id).cloned())
    }

    async fn get_service_by_name(&self, name: &str) -> Result<Option<Service>> {
        let inner = self.inner.read().await;
        Ok(inner.services.values().find(|s| s.name == name).cloned())
    }

    async fn list_active_services(&self) -> Result<Vec<Service>> {
        let inner = self.inner.read().await;
        let mut services: Vec<Service> = inner
            .services
            .values()
            .filter(|s| s.is_active)
            .cloned()
            .collect();
        services.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(services)
    }

    async fn save_service(&self, service: &Service) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.services.insert(service.id.clone(), service.clone());
        Ok(())
    }

    // ── Boxes ──

    async fn get_box(&self, id: &str) -> Result<Option<WashBox>> {
        let inner = self.inner.read().await;
        Ok(inner.boxes.get(id).cloned())
    }

    async fn get_box_by_number(
        &self,
        box_number: i32,
        place_number: i32,
    ) -> Result<Option<WashBox>> {
        let inner = self.inner.read().await;
        Ok(inner
            .boxes
            .values()
            .find(|b| b.box_number == box_number && b.place_number == place_number)
            .cloned())
    }

    async fn save_box(&self, wash_box: &WashBox) -> Result<()> {
        let mut inner = self.inner.write().await;
        let taken = inner.boxes.values().any(|b| {
            b.box_number == wash_box.box_number
                && b.place_number == wash_box.place_number
                && b.id != wash_box.id
        });
        if taken {
            return Err(AppError::Integrity(format!(
                "{} already exists",
                wash_box.label()
            )));
        }
        inner.boxes.insert(wash_box.id.clone(), wash_box.clone());
        Ok(())
    }

    async fn delete_box(&self, id: &str) -> Result<()> {
        let mut inner = self.inner.write().await;
        if !inner.boxes.contains_key(id) {
            return Err(AppError::not_found("box", id));
        }
        // PROTECT: bookings in any status keep the box alive.
        let referenced = inner.bookings.values().any(|b| b.box_id.as_deref() == Some(id));
        if referenced {
            return Err(AppError::Integrity(format!(
                "box {id} is still referenced by bookings"
            )));
        }
        inner.boxes.remove(id);
        Ok(())
    }

    // ── Washers ──

    async fn get_washer(&self, id: &str) -> Result<Option<Washer>> {
        let inner = self.inner.read().await;
        Ok(inner.washers.get(id).cloned())
    }

    async fn save_washer(&self, washer: &Washer) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.washers.insert(washer.id.clone(), washer.clone());
        Ok(())
    }

    async fn delete_washer(&self, id: &str) -> Result<()> {
        let mut inner = self.inner.write().await;
        if !inner.washers.contains_key(id) {
            return Err(AppError::not_found("washer", id));
        }
        let referenced = inner
            .bookings
            .values()
            .any(|b| b.washer_id.as_deref() == Some(id));
        if referenced {
            return Err(AppError::Integrity(format!(
                "washer {id} is still referenced by bookings"
            )));
        }
        inner.washers.remove(id);
        Ok(())
    }
}
