//! Persistence collaborators of the reservation core.
//!
//! Availability correctness lives entirely in [`ShowStore::claim_seats`]: the
//! check that no requested seat is booked and the insertion of the seats must
//! be one indivisible operation at the store level.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::{LockError, StoreError},
    models::{Booking, NewBooking, SeatSet, Show},
};

#[async_trait]
pub trait ShowStore: Send + Sync {
    /// Atomically adds `seats` to the show's booked set if none of them is
    /// booked yet, returning the updated show. `None` means either the show
    /// does not exist or at least one seat was taken.
    async fn claim_seats(&self, show_id: &str, seats: &SeatSet) -> Result<Option<Show>, StoreError>;

    async fn find_by_id(&self, show_id: &str) -> Result<Option<Show>, StoreError>;
}

#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn create(&self, booking: NewBooking) -> Result<Uuid, StoreError>;

    /// Newest first.
    async fn find_by_user(&self, user_id: &str) -> Result<Vec<Booking>, StoreError>;

    /// Newest first.
    async fn find_all(&self) -> Result<Vec<Booking>, StoreError>;
}

/// Releases soft holds placed on seats before they were booked.
#[async_trait]
pub trait SeatLocks: Send + Sync {
    async fn clear_locks(&self, show_id: &str, seats: &SeatSet) -> Result<(), LockError>;
}
