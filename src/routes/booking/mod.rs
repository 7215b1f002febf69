use serde::Serialize;
use uuid::Uuid;

use crate::models::Booking;

pub mod delete;
pub mod get;
pub mod post;
pub mod update;

pub use delete::cancel_booking;
pub use get::{get_my_bookings, get_restaurant_bookings};
pub use post::post_booking;
pub use update::confirm_booking;

// Struct to represent a booking in responses
#[derive(Serialize, Debug)]
pub struct BookingResponse{
    pub booking_id: Uuid,
    pub user_id: Uuid,
    pub restaurant_id: Uuid,
    pub table_id: i32,
    pub date: String,
    pub time: String,
    pub party_size: i32,
    pub status: String,
    pub note: Option<String>,
    pub created_at: String
}

impl From<Booking> for BookingResponse {
    fn from(b: Booking) -> Self {
        BookingResponse{
            booking_id: b.booking_id,
            user_id: b.user_id,
            restaurant_id: b.restaurant_id,
            table_id: b.table_id,
            date: b.date.format("%Y-%m-%d").to_string(),
            time: b.time.format("%H:%M").to_string(),
            party_size: b.party_size,
            status: b.status,
            note: b.note,
            created_at: b.created_at.to_rfc3339()
        }
    }
}
