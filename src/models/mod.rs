pub mod booking;
pub mod client;
pub mod service;
pub mod wash_box;
pub mod washer;

pub use booking::{Booking, BookingStatus, ResourceKind, TimeWindow};
pub use client::Client;
pub use service::Service;
pub use wash_box::WashBox;
pub use washer::Washer;
