use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{BookingStore, ShowStore};
use crate::{
    error::StoreError,
    models::{show::ShowRow, Booking, NewBooking, SeatSet, Show},
};

// Один UPDATE: блокировка строки + повторная проверка условия под READ COMMITTED,
// поэтому два пересекающихся запроса не могут оба пройти.
const CLAIM_SEATS_SQL: &str = r#"
    UPDATE shows
    SET booked_seats = booked_seats || $2::text[]
    WHERE id = $1
      AND NOT (booked_seats && $2::text[])
    RETURNING id, title, price, pricing, booked_seats
"#;

#[derive(Clone)]
pub struct PgShowStore {
    pool: PgPool,
}

impl PgShowStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShowStore for PgShowStore {
    async fn claim_seats(&self, show_id: &str, seats: &SeatSet) -> Result<Option<Show>, StoreError> {
        let row = sqlx::query_as::<_, ShowRow>(CLAIM_SEATS_SQL)
            .bind(show_id)
            .bind(seats.to_vec())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Show::from))
    }

    async fn find_by_id(&self, show_id: &str) -> Result<Option<Show>, StoreError> {
        let row = sqlx::query_as::<_, ShowRow>(
            "SELECT id, title, price, pricing, booked_seats FROM shows WHERE id = $1",
        )
        .bind(show_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Show::from))
    }
}

#[derive(Clone)]
pub struct PgBookingStore {
    pool: PgPool,
}

impl PgBookingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingStore for PgBookingStore {
    async fn create(&self, booking: NewBooking) -> Result<Uuid, StoreError> {
        let booking = booking.into_booking();
        let id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO bookings (id, user_id, show_id, seats, total, created_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id",
        )
        .bind(booking.id)
        .bind(&booking.user_id)
        .bind(&booking.show_id)
        .bind(&booking.seats)
        .bind(booking.total)
        .bind(booking.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Vec<Booking>, StoreError> {
        let bookings = sqlx::query_as::<_, Booking>(
            "SELECT id, user_id, show_id, seats, total, created_at
             FROM bookings
             WHERE user_id = $1
             ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(bookings)
    }

    async fn find_all(&self) -> Result<Vec<Booking>, StoreError> {
        let bookings = sqlx::query_as::<_, Booking>(
            "SELECT id, user_id, show_id, seats, total, created_at
             FROM bookings
             ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(bookings)
    }
}
