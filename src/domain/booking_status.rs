use serde::{Deserialize, Serialize};

// Reservation lifecycle: PENDING -> CONFIRMED, PENDING -> CANCELLED,
// CONFIRMED -> CANCELLED. CANCELLED is terminal.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum BookingStatus{
    #[serde(rename = "PENDING")]
    Pending,
    #[serde(rename = "CONFIRMED")]
    Confirmed,
    #[serde(rename = "CANCELLED")]
    Cancelled,
}

impl BookingStatus {
    pub fn parse(status: &str) -> Result<BookingStatus, String>{
        match status {
            "PENDING" => Ok(BookingStatus::Pending),
            "CONFIRMED" => Ok(BookingStatus::Confirmed),
            "CANCELLED" => Ok(BookingStatus::Cancelled),
            other => Err(format!("{} is not a valid booking status", other))
        }
    }

    pub fn as_str(&self) -> &'static str{
        match self {
            BookingStatus::Pending => "PENDING",
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn can_transition_to(&self, next: BookingStatus) -> bool{
        matches!(
            (self, next),
            (BookingStatus::Pending, BookingStatus::Confirmed)
                | (BookingStatus::Pending, BookingStatus::Cancelled)
                | (BookingStatus::Confirmed, BookingStatus::Cancelled)
        )
    }

    // A booking still holds its table in these states
    pub fn is_active(&self) -> bool{
        !matches!(self, BookingStatus::Cancelled)
    }
}
