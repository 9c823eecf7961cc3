//! Per-show publish/subscribe channels.
//!
//! Every show id maps to its own `broadcast` channel. Subscribers (WebSocket
//! connections) create the channel on demand and drop it again through
//! [`ShowChannels::unsubscribe`] when the last of them leaves; publishing to a
//! show nobody watches is a no-op. Snapshots always carry the full booked set, so a
//! subscriber that lags or sees events out of order only needs the latest one.

use async_trait::async_trait;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

use crate::error::PublishError;

/// Broadcast channel capacity per show.
const CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ShowEvent {
    /// Full availability state of a show.
    #[serde(rename_all = "camelCase")]
    SeatState {
        show_id: String,
        booked_seats: Vec<String>,
        /// seat -> holder user id
        locks: BTreeMap<String, String>,
    },
    /// Soft holds changed; clients should refresh their lock view.
    #[serde(rename_all = "camelCase")]
    LocksChanged { show_id: String },
}

impl ShowEvent {
    pub fn seat_state(show_id: impl Into<String>, booked_seats: Vec<String>) -> Self {
        ShowEvent::SeatState {
            show_id: show_id.into(),
            booked_seats,
            locks: BTreeMap::new(),
        }
    }

    pub fn locks_changed(show_id: impl Into<String>) -> Self {
        ShowEvent::LocksChanged {
            show_id: show_id.into(),
        }
    }
}

#[async_trait]
pub trait ShowPublisher: Send + Sync {
    async fn publish(&self, show_id: &str, event: ShowEvent) -> Result<(), PublishError>;
}

type ChannelsMap = Arc<RwLock<HashMap<String, broadcast::Sender<ShowEvent>>>>;

#[derive(Clone, Default)]
pub struct ShowChannels {
    channels: ChannelsMap,
}

impl ShowChannels {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn subscribe(&self, show_id: &str) -> broadcast::Receiver<ShowEvent> {
        if let Some(sender) = self.channels.read().await.get(show_id) {
            return sender.subscribe();
        }

        let mut channels = self.channels.write().await;
        channels
            .entry(show_id.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }

    /// Drops `receiver` and removes the show's channel once nobody listens.
    pub async fn unsubscribe(&self, show_id: &str, receiver: broadcast::Receiver<ShowEvent>) {
        drop(receiver);
        let mut channels = self.channels.write().await;
        if channels
            .get(show_id)
            .is_some_and(|sender| sender.receiver_count() == 0)
        {
            channels.remove(show_id);
        }
    }

    pub async fn subscriber_count(&self, show_id: &str) -> usize {
        self.channels
            .read()
            .await
            .get(show_id)
            .map(|sender| sender.receiver_count())
            .unwrap_or(0)
    }
}

#[async_trait]
impl ShowPublisher for ShowChannels {
    async fn publish(&self, show_id: &str, event: ShowEvent) -> Result<(), PublishError> {
        let delivered = match self.channels.read().await.get(show_id) {
            // send fails only when there are no receivers left
            Some(sender) => sender.send(event).is_ok(),
            None => return Ok(()),
        };

        if !delivered {
            let mut channels = self.channels.write().await;
            if channels
                .get(show_id)
                .is_some_and(|sender| sender.receiver_count() == 0)
            {
                channels.remove(show_id);
                tracing::debug!("Dropped idle channel for show {}", show_id);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_events_for_their_show_only() {
        let channels = ShowChannels::new();
        let mut rx_a = channels.subscribe("a").await;
        let mut rx_b = channels.subscribe("b").await;

        channels
            .publish("a", ShowEvent::seat_state("a", vec!["A1".into()]))
            .await
            .unwrap();

        assert_eq!(
            rx_a.recv().await.unwrap(),
            ShowEvent::seat_state("a", vec!["A1".into()])
        );
        assert!(rx_b.try_recv().is_err());
    }

    #[tokio::test]
    async fn publishing_without_subscribers_succeeds_and_prunes() {
        let channels = ShowChannels::new();
        let rx = channels.subscribe("a").await;
        drop(rx);

        channels
            .publish("a", ShowEvent::locks_changed("a"))
            .await
            .unwrap();
        channels
            .publish("never-watched", ShowEvent::locks_changed("never-watched"))
            .await
            .unwrap();

        assert_eq!(channels.subscriber_count("a").await, 0);
        assert!(channels.channels.read().await.is_empty());
    }

    #[tokio::test]
    async fn unsubscribing_last_watcher_removes_the_channel() {
        let channels = ShowChannels::new();
        for i in 0..100 {
            let show_id = format!("ghost-{}", i);
            let rx = channels.subscribe(&show_id).await;
            channels.unsubscribe(&show_id, rx).await;
        }
        assert!(channels.channels.read().await.is_empty());

        let first = channels.subscribe("a").await;
        let mut second = channels.subscribe("a").await;
        channels.unsubscribe("a", first).await;
        assert_eq!(channels.subscriber_count("a").await, 1);

        channels
            .publish("a", ShowEvent::locks_changed("a"))
            .await
            .unwrap();
        assert_eq!(second.recv().await.unwrap(), ShowEvent::locks_changed("a"));

        channels.unsubscribe("a", second).await;
        assert!(channels.channels.read().await.is_empty());
    }

    #[test]
    fn events_serialize_with_event_tag() {
        let json = serde_json::to_value(ShowEvent::seat_state("s1", vec!["B2".into()])).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "event": "seat_state",
                "showId": "s1",
                "bookedSeats": ["B2"],
                "locks": {}
            })
        );

        let json = serde_json::to_value(ShowEvent::locks_changed("s1")).unwrap();
        assert_eq!(json, serde_json::json!({"event": "locks_changed", "showId": "s1"}));
    }
}
