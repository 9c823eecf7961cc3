use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    error::StoreError,
    models::{NewBooking, SeatSet},
    store::BookingStore,
};

/// Writes the audit record of a successful claim.
///
/// A failure here does not release the seats: the show's booked set is the
/// source of truth for availability, the booking row is informational.
#[derive(Clone)]
pub struct BookingRecorder {
    store: Arc<dyn BookingStore>,
}

impl BookingRecorder {
    pub fn new(store: Arc<dyn BookingStore>) -> Self {
        Self { store }
    }

    pub async fn record(
        &self,
        show_id: &str,
        user_id: &str,
        seats: &SeatSet,
        total: f64,
    ) -> Result<Uuid, StoreError> {
        let booking = NewBooking {
            user_id: user_id.to_string(),
            show_id: show_id.to_string(),
            seats: seats.clone(),
            total,
        };

        match self.store.create(booking).await {
            Ok(id) => {
                info!(
                    "Booking {} recorded: show={} user={} seats={} total={}",
                    id,
                    show_id,
                    user_id,
                    seats.len(),
                    total
                );
                Ok(id)
            }
            Err(e) => {
                error!(
                    "Failed to record booking for show {} (seats {:?} stay claimed): {:?}",
                    show_id,
                    seats.to_vec(),
                    e
                );
                Err(e)
            }
        }
    }
}
