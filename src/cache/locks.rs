use async_trait::async_trait;
use tracing::debug;

use super::{lock_key, SeatLockCache};
use crate::{error::LockError, models::SeatSet, store::SeatLocks};

#[async_trait]
impl SeatLocks for SeatLockCache {
    async fn clear_locks(&self, show_id: &str, seats: &SeatSet) -> Result<(), LockError> {
        if seats.is_empty() {
            return Ok(());
        }

        // Удаляем все блокировки одним pipeline
        let mut pipe = redis::pipe();
        for seat in seats {
            pipe.del(lock_key(show_id, seat)).ignore();
        }

        let mut conn = self.redis.conn.clone();
        pipe.query_async::<()>(&mut conn).await?;

        debug!("Cleared {} seat lock(s) for show {}", seats.len(), show_id);
        Ok(())
    }
}
