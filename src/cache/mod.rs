//! Мягкие блокировки мест в Redis.
//!
//! A hold is a plain key `show:{show_id}:seat:{seat}:lock` whose value is the
//! holder's user id and whose TTL bounds the hold. Placing and expiring holds
//! happens outside this crate; here they are only released once the seats are
//! actually booked.

use crate::redis_client::RedisClient;

pub mod locks;

#[derive(Clone)]
pub struct SeatLockCache {
    redis: RedisClient,
}

impl SeatLockCache {
    pub fn new(redis: RedisClient) -> Self {
        Self { redis }
    }
}

pub fn lock_key(show_id: &str, seat: &str) -> String {
    format!("show:{}:seat:{}:lock", show_id, seat)
}
