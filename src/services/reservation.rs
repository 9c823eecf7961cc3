//! Reservation core: normalize, claim atomically, price, record, notify.
//!
//! There is no in-process locking here. Two requests for overlapping seats on
//! the same show are serialized by the store's conditional update; the loser
//! gets `None` back and is reported as a conflict.

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

use super::{notifier::Notifier, pricing, recorder::BookingRecorder, seats::normalize_seats};
use crate::{
    error::{ReservationError, StoreError},
    store::ShowStore,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub booking_id: Uuid,
    pub total: f64,
}

#[derive(Clone)]
pub struct ReservationService {
    shows: Arc<dyn ShowStore>,
    recorder: BookingRecorder,
    notifier: Notifier,
    store_timeout: Duration,
}

impl ReservationService {
    pub fn new(
        shows: Arc<dyn ShowStore>,
        recorder: BookingRecorder,
        notifier: Notifier,
        store_timeout: Duration,
    ) -> Self {
        Self {
            shows,
            recorder,
            notifier,
            store_timeout,
        }
    }

    pub async fn reserve<S: AsRef<str>>(
        &self,
        show_id: &str,
        raw_seats: &[S],
        user_id: &str,
    ) -> Result<Reservation, ReservationError> {
        let show_id = show_id.trim();
        if show_id.is_empty() {
            return Err(ReservationError::InvalidInput("showId is required".to_string()));
        }
        let seats = normalize_seats(raw_seats)?;

        // A timed-out claim may still have landed; it is never retried here.
        let claimed = tokio::time::timeout(self.store_timeout, self.shows.claim_seats(show_id, &seats))
            .await
            .map_err(|_| StoreError::Timeout(self.store_timeout))??;

        let Some(show) = claimed else {
            info!(
                "Seat claim rejected: show={} seats={:?} (taken or unknown show)",
                show_id,
                seats.to_vec()
            );
            return Err(ReservationError::Conflict { seats });
        };

        // Observers must see the claim even if recording the booking fails below.
        self.notifier
            .spawn(show.id.clone(), seats.clone(), show.booked_seats_vec());

        let total = pricing::price_for_show(&show, &seats);
        let booking_id = self.recorder.record(&show.id, user_id, &seats, total).await?;

        Ok(Reservation { booking_id, total })
    }
}
