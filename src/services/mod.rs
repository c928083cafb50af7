pub mod bookings;
pub mod conflict;
pub mod pricing;

pub use bookings::{BookingService, CreateBookingRequest, UpdateStatusRequest};
pub use conflict::Conflict;
pub use pricing::PriceBreakdown;
