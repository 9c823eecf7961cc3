//! In-process stores for tests and infrastructure-free local runs.

use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{BookingStore, SeatLocks, ShowStore};
use crate::{
    error::{LockError, ReservationError, StoreError},
    models::{Booking, NewBooking, SeatSet, Show},
};

#[derive(Clone, Default)]
pub struct MemoryShowStore {
    shows: Arc<RwLock<HashMap<String, Show>>>,
}

impl MemoryShowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a show. Booked seats are normalized on the way in.
    pub async fn insert(&self, show: Show) -> Result<(), ReservationError> {
        let show = show.normalized()?;
        self.shows.write().await.insert(show.id.clone(), show);
        Ok(())
    }
}

#[async_trait]
impl ShowStore for MemoryShowStore {
    async fn claim_seats(&self, show_id: &str, seats: &SeatSet) -> Result<Option<Show>, StoreError> {
        // Write lock is held across check and insert.
        let mut shows = self.shows.write().await;
        let Some(show) = shows.get_mut(show_id) else {
            return Ok(None);
        };
        if !seats.is_disjoint(&show.booked_seats) {
            return Ok(None);
        }
        show.booked_seats.extend(seats.iter().cloned());
        Ok(Some(show.clone()))
    }

    async fn find_by_id(&self, show_id: &str) -> Result<Option<Show>, StoreError> {
        Ok(self.shows.read().await.get(show_id).cloned())
    }
}

#[derive(Clone, Default)]
pub struct MemoryBookingStore {
    // Порядок вставки = порядок создания
    bookings: Arc<RwLock<Vec<Booking>>>,
}

impl MemoryBookingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.bookings.read().await.len()
    }
}

#[async_trait]
impl BookingStore for MemoryBookingStore {
    async fn create(&self, booking: NewBooking) -> Result<Uuid, StoreError> {
        let booking = booking.into_booking();
        let id = booking.id;
        self.bookings.write().await.push(booking);
        Ok(id)
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Vec<Booking>, StoreError> {
        let bookings = self.bookings.read().await;
        Ok(bookings
            .iter()
            .rev()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_all(&self) -> Result<Vec<Booking>, StoreError> {
        Ok(self.bookings.read().await.iter().rev().cloned().collect())
    }
}

/// Soft holds keyed by show id.
#[derive(Clone, Default)]
pub struct MemorySeatLocks {
    held: Arc<RwLock<HashMap<String, BTreeSet<String>>>>,
}

impl MemorySeatLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn hold(&self, show_id: &str, seat: &str) {
        self.held
            .write()
            .await
            .entry(show_id.to_string())
            .or_default()
            .insert(seat.to_string());
    }

    pub async fn held(&self, show_id: &str) -> BTreeSet<String> {
        self.held.read().await.get(show_id).cloned().unwrap_or_default()
    }
}

#[async_trait]
impl SeatLocks for MemorySeatLocks {
    async fn clear_locks(&self, show_id: &str, seats: &SeatSet) -> Result<(), LockError> {
        let mut held = self.held.write().await;
        if let Some(show_holds) = held.get_mut(show_id) {
            show_holds.retain(|seat| !seats.contains(seat));
            if show_holds.is_empty() {
                held.remove(show_id);
            }
        }
        Ok(())
    }
}
