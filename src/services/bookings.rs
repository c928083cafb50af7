use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::errors::{AppError, Result};
use crate::models::{
    Booking, BookingStatus, Client, ResourceKind, Service, TimeWindow, WashBox, Washer,
};
use crate::services::conflict::find_conflict;
use crate::services::pricing::{self, PriceBreakdown};
use crate::storage::Storage;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    pub client_name: String,
    pub client_phone: String,
    pub is_regular_client: bool,
    pub service_ids: Vec<String>,
    pub box_id: Option<String>,
    pub washer_id: Option<String>,
    pub scheduled_time: Option<NaiveDateTime>,
    pub duration_minutes: Option<i32>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub booking_id: String,
    pub new_status: String,
}

pub struct BookingService {
    storage: Arc<dyn Storage>,
    config: AppConfig,
}

impl BookingService {
    pub fn new(storage: Arc<dyn Storage>, config: AppConfig) -> Self {
        Self { storage, config }
    }

    pub async fn create(
        &self,
        req: CreateBookingRequest,
        created_by: Option<String>,
    ) -> Result<Booking> {
        let duration = self.validate_request(&req)?;
        let services = self.load_services(&req.service_ids).await?;
        let wash_box = match &req.box_id {
            Some(id) => Some(self.load_box(id).await?),
            None => None,
        };
        let washer = match &req.washer_id {
            Some(id) => Some(self.load_washer(id).await?),
            None => None,
        };

        // Guard held until the booking is saved, so the scan below cannot
        // race another writer into a double booking.
        let _guard = self.storage.lock_schedule().await;

        self.check_conflicts(
            req.scheduled_time,
            duration,
            wash_box.as_ref(),
            washer.as_ref(),
            None,
        )
        .await?;

        let client = self.upsert_client(&req).await?;
        let breakdown = pricing::calculate_price(&services, &client);

        let now = Utc::now().naive_utc();
        let booking = Booking {
            id: Uuid::new_v4().to_string(),
            client_id: client.id.clone(),
            service_ids: services.iter().map(|s| s.id.clone()).collect(),
            box_id: wash_box.as_ref().map(|b| b.id.clone()),
            washer_id: washer.as_ref().map(|w| w.id.clone()),
            scheduled_time: req.scheduled_time,
            duration_minutes: duration,
            status: BookingStatus::Pending,
            base_price: breakdown.base_price,
            discount_amount: breakdown.discount_amount,
            final_price: breakdown.final_price,
            created_by,
            notes: req.notes.clone(),
            created_at: now,
            updated_at: now,
        };
        self.storage.save_booking(&booking).await?;

        tracing::info!(
            booking_id = %booking.id,
            client_phone = %client.phone,
            final_price = %booking.final_price,
            "booking created"
        );
        Ok(booking)
    }

    pub async fn update(&self, booking_id: &str, req: CreateBookingRequest) -> Result<Booking> {
        let mut booking = self.get(booking_id).await?;
        let duration = self.validate_request(&req)?;
        let services = self.load_services(&req.service_ids).await?;
        let wash_box = match &req.box_id {
            Some(id) => Some(self.load_box(id).await?),
            None => None,
        };
        let washer = match &req.washer_id {
            Some(id) => Some(self.load_washer(id).await?),
            None => None,
        };

        let _guard = self.storage.lock_schedule().await;

        self.check_conflicts(
            req.scheduled_time,
            duration,
            wash_box.as_ref(),
            washer.as_ref(),
            Some(booking_id),
        )
        .await?;

        let client = self.upsert_client(&req).await?;
        let breakdown = pricing::calculate_price(&services, &client);

        booking.client_id = client.id.clone();
        booking.service_ids = services.iter().map(|s| s.id.clone()).collect();
        booking.box_id = wash_box.as_ref().map(|b| b.id.clone());
        booking.washer_id = washer.as_ref().map(|w| w.id.clone());
        booking.scheduled_time = req.scheduled_time;
        booking.duration_minutes = duration;
        // Status moves only through update_status.
        booking.base_price = breakdown.base_price;
        booking.discount_amount = breakdown.discount_amount;
        booking.final_price = breakdown.final_price;
        booking.notes = req.notes.clone();
        booking.updated_at = Utc::now().naive_utc();
        self.storage.save_booking(&booking).await?;

        tracing::info!(
            booking_id = %booking.id,
            final_price = %booking.final_price,
            "booking updated"
        );
        Ok(booking)
    }

    pub async fn update_status(&self, req: UpdateStatusRequest) -> Result<Booking> {
        let mut booking = self.get(&req.booking_id).await?;
        let new_status = BookingStatus::from_str(&req.new_status)
            .ok_or_else(|| AppError::InvalidStatus(req.new_status.clone()))?;

        let old_status = booking.status;
        booking.status = new_status;
        booking.updated_at = Utc::now().naive_utc();
        self.storage.save_booking(&booking).await?;

        tracing::info!(
            booking_id = %booking.id,
            from = old_status.as_str(),
            to = new_status.as_str(),
            "booking status changed"
        );
        Ok(booking)
    }

    pub async fn get(&self, id: &str) -> Result<Booking> {
        self.storage
            .get_booking(id)
            .await?
            .ok_or_else(|| AppError::not_found("booking", id))
    }

    pub async fn quote(&self, service_ids: &[String], is_regular: bool) -> Result<PriceBreakdown> {
        // Unknown and inactive ids are dropped, not rejected.
        let mut seen: Vec<&String> = Vec::new();
        let mut services = Vec::new();
        for id in service_ids {
            if seen.contains(&id) {
                continue;
            }
            seen.push(id);
            if let Some(service) = self.storage.get_service(id).await? {
                if service.is_active {
                    services.push(service);
                }
            }
        }
        Ok(pricing::quote(
            &services,
            is_regular,
            self.config.regular_discount_percent,
        ))
    }

    pub async fn price_list(&self) -> Result<Vec<Service>> {
        self.storage.list_active_services().await
    }

    pub async fn day_schedule(&self, day: NaiveDate) -> Result<Vec<Booking>> {
        self.storage.get_bookings_for_day(day).await
    }

    fn validate_request(&self, req: &CreateBookingRequest) -> Result<i32> {
        if req.client_name.trim().is_empty() {
            return Err(AppError::validation("client_name", "must not be empty"));
        }
        if req.client_phone.trim().is_empty() {
            return Err(AppError::validation("client_phone", "must not be empty"));
        }
        let duration = req
            .duration_minutes
            .unwrap_or(self.config.default_duration_minutes);
        if !(1..=480).contains(&duration) {
            return Err(AppError::validation(
                "duration_minutes",
                format!("must be between 1 and 480, got {duration}"),
            ));
        }
        Ok(duration)
    }

    async fn load_services(&self, ids: &[String]) -> Result<Vec<Service>> {
        if ids.is_empty() {
            return Err(AppError::validation(
                "service_ids",
                "at least one service is required",
            ));
        }
        let mut seen: Vec<&String> = Vec::new();
        let mut services = Vec::new();
        for id in ids {
            if seen.contains(&id) {
                continue;
            }
            seen.push(id);
            let service = self
                .storage
                .get_service(id)
                .await?
                .ok_or_else(|| AppError::not_found("service", id))?;
            if !service.is_active {
                return Err(AppError::validation(
                    "service_ids",
                    format!("service {} is not active", service.name),
                ));
            }
            services.push(service);
        }
        Ok(services)
    }

    async fn load_box(&self, id: &str) -> Result<WashBox> {
        let wash_box = self
            .storage
            .get_box(id)
            .await?
            .ok_or_else(|| AppError::not_found("box", id))?;
        if !wash_box.is_active {
            return Err(AppError::validation(
                "box_id",
                format!("{} is not active", wash_box.label()),
            ));
        }
        Ok(wash_box)
    }

    async fn load_washer(&self, id: &str) -> Result<Washer> {
        let washer = self
            .storage
            .get_washer(id)
            .await?
            .ok_or_else(|| AppError::not_found("washer", id))?;
        if !washer.is_active {
            return Err(AppError::validation(
                "washer_id",
                format!("washer {} is not active", washer.name),
            ));
        }
        Ok(washer)
    }

    async fn check_conflicts(
        &self,
        scheduled_time: Option<NaiveDateTime>,
        duration_minutes: i32,
        wash_box: Option<&WashBox>,
        washer: Option<&Washer>,
        exclude_booking_id: Option<&str>,
    ) -> Result<()> {
        // Drafts carry no time and are never conflict-checked.
        let start = match scheduled_time {
            Some(t) => t,
            None => return Ok(()),
        };
        let window = TimeWindow::new(start, duration_minutes);

        if let Some(b) = wash_box {
            if let Some(conflict) = find_conflict(
                self.storage.as_ref(),
                ResourceKind::Box,
                &b.id,
                &b.label(),
                window,
                exclude_booking_id,
            )
            .await?
            {
                return Err(AppError::Conflict(conflict));
            }
        }
        if let Some(w) = washer {
            if let Some(conflict) = find_conflict(
                self.storage.as_ref(),
                ResourceKind::Washer,
                &w.id,
                &format!("Washer {}", w.name),
                window,
                exclude_booking_id,
            )
            .await?
            {
                return Err(AppError::Conflict(conflict));
            }
        }
        Ok(())
    }

    async fn upsert_client(&self, req: &CreateBookingRequest) -> Result<Client> {
        let discount_percent = if req.is_regular_client {
            self.config.regular_discount_percent
        } else {
            0
        };

        let client = match self.storage.get_client_by_phone(&req.client_phone).await? {
            Some(mut existing) => {
                existing.name = req.client_name.clone();
                existing.is_regular = req.is_regular_client;
                existing.discount_percent = discount_percent;
                existing
            }
            None => {
                tracing::info!(phone = %req.client_phone, "new client registered");
                Client {
                    id: Uuid::new_v4().to_string(),
                    name: req.client_name.clone(),
                    phone: req.client_phone.clone(),
                    is_regular: req.is_regular_client,
                    discount_percent,
                    notes: None,
                    created_at: Utc::now().naive_utc(),
                }
            }
        };
        self.storage.save_client(&client).await?;
        Ok(client)
    }
}
