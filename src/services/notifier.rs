//! Рассылка обновлений после успешного бронирования.
//!
//! Runs on its own task once the claim is durable: releases soft holds on the
//! claimed seats, then pushes the full booked set and a `locks_changed` signal
//! to everyone watching the show. Both steps are attempted even if the other
//! fails; failures are logged and go nowhere else.

use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::{
    channels::{ShowEvent, ShowPublisher},
    error::NotificationError,
    models::SeatSet,
    store::SeatLocks,
};

#[derive(Clone)]
pub struct Notifier {
    locks: Arc<dyn SeatLocks>,
    publisher: Arc<dyn ShowPublisher>,
}

impl Notifier {
    pub fn new(locks: Arc<dyn SeatLocks>, publisher: Arc<dyn ShowPublisher>) -> Self {
        Self { locks, publisher }
    }

    /// Fire-and-forget. The handle is only useful to tests that want to wait.
    pub fn spawn(&self, show_id: String, claimed: SeatSet, booked_seats: Vec<String>) -> JoinHandle<()> {
        let notifier = self.clone();
        tokio::spawn(async move {
            let failures = notifier.notify(&show_id, &claimed, booked_seats).await;
            for failure in &failures {
                warn!("Show {} notification step failed: {}", show_id, failure);
            }
            if failures.is_empty() {
                debug!("Show {} observers notified", show_id);
            }
        })
    }

    /// Returns every step that failed; empty means fully delivered.
    pub async fn notify(
        &self,
        show_id: &str,
        claimed: &SeatSet,
        booked_seats: Vec<String>,
    ) -> Vec<NotificationError> {
        let mut failures = Vec::new();

        if let Err(e) = self.locks.clear_locks(show_id, claimed).await {
            failures.push(NotificationError::from(e));
        }

        let events = [
            ShowEvent::seat_state(show_id, booked_seats),
            ShowEvent::locks_changed(show_id),
        ];
        for event in events {
            if let Err(e) = self.publisher.publish(show_id, event).await {
                failures.push(NotificationError::from(e));
            }
        }

        failures
    }
}
