use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use super::SeatSet;

/// Confirmed reservation. Never updated once written.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub user_id: String,
    pub show_id: String,
    pub seats: Vec<String>,
    pub total: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewBooking {
    pub user_id: String,
    pub show_id: String,
    pub seats: SeatSet,
    pub total: f64,
}

impl NewBooking {
    /// Materializes the record with a fresh id and the current timestamp.
    pub fn into_booking(self) -> Booking {
        Booking {
            id: Uuid::new_v4(),
            user_id: self.user_id,
            show_id: self.show_id,
            seats: self.seats.to_vec(),
            total: self.total,
            created_at: Utc::now(),
        }
    }
}
