//! Seat availability: one-shot snapshot and a live WebSocket feed per show.
//!
//! The socket sends the current snapshot right after connecting, then forwards
//! every event published on the show's channel as JSON. If the client falls
//! behind the channel buffer it gets a fresh snapshot instead of the missed
//! events, since each snapshot is the complete state.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        Path, State, WebSocketUpgrade,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use futures::{SinkExt, Stream, StreamExt};
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, info, warn};

use crate::{channels::ShowEvent, store::ShowStore, AppState};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/shows/{id}/seats", get(get_seat_state))
        .route("/shows/{id}/ws", get(show_updates))
}

// GET /api/shows/{id}/seats
async fn get_seat_state(
    State(state): State<Arc<AppState>>,
    Path(show_id): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    match current_snapshot(state.shows.as_ref(), &show_id).await {
        Ok(Some(snapshot)) => Ok((StatusCode::OK, Json(snapshot))),
        Ok(None) => Err((StatusCode::NOT_FOUND, "Show not found".to_string())),
        Err(message) => Err((StatusCode::INTERNAL_SERVER_ERROR, message)),
    }
}

// GET /api/shows/{id}/ws
async fn show_updates(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path(show_id): Path<String>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state, show_id))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, show_id: String) {
    let (mut sender, mut receiver) = socket.split();

    // Неизвестное шоу: закрываем сокет, канал не создаём
    match state.shows.find_by_id(&show_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            let _ = sender.send(Message::Close(None)).await;
            return;
        }
        Err(e) => {
            warn!("Show {} lookup failed: {:?}", show_id, e);
            let _ = sender.send(Message::Close(None)).await;
            return;
        }
    }

    // Подписываемся до чтения снимка, чтобы не потерять обновления между ними
    let mut updates = state.channels.subscribe(&show_id).await;
    info!("Show {} watcher connected", show_id);

    stream_show(
        &mut sender,
        &mut receiver,
        &mut updates,
        state.shows.as_ref(),
        &show_id,
    )
    .await;

    state.channels.unsubscribe(&show_id, updates).await;
    info!("Show {} watcher disconnected", show_id);
}

/// Sends the current snapshot, then forwards channel events until either side
/// goes away. A lagging watcher gets a fresh snapshot instead of the missed events.
async fn stream_show<Tx, Rx, E>(
    sender: &mut Tx,
    receiver: &mut Rx,
    updates: &mut broadcast::Receiver<ShowEvent>,
    shows: &dyn ShowStore,
    show_id: &str,
) where
    Tx: SinkExt<Message> + Unpin,
    Rx: Stream<Item = Result<Message, E>> + Unpin,
    E: std::fmt::Display,
{
    match current_snapshot(shows, show_id).await {
        Ok(Some(snapshot)) => {
            if send_event(sender, &snapshot).await.is_err() {
                return;
            }
        }
        Ok(None) => {
            let _ = sender.send(Message::Close(None)).await;
            return;
        }
        Err(message) => warn!("Show {} initial snapshot failed: {}", show_id, message),
    }

    loop {
        tokio::select! {
            update = updates.recv() => {
                let event = match update {
                    Ok(event) => event,
                    Err(RecvError::Lagged(skipped)) => {
                        debug!("Show {} watcher lagged by {} events, resyncing", show_id, skipped);
                        match current_snapshot(shows, show_id).await {
                            Ok(Some(snapshot)) => snapshot,
                            _ => continue,
                        }
                    }
                    Err(RecvError::Closed) => break,
                };
                if send_event(sender, &event).await.is_err() {
                    break;
                }
            }
            incoming = receiver.next() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        debug!("Show {} watcher socket error: {}", show_id, e);
                        break;
                    }
                }
            }
        }
    }
}

async fn send_event<S>(sender: &mut S, event: &ShowEvent) -> Result<(), ()>
where
    S: SinkExt<Message> + Unpin,
{
    let text = serde_json::to_string(event).map_err(|e| {
        warn!("Failed to encode show event: {}", e);
    })?;
    sender.send(Message::Text(text.into())).await.map_err(|_| ())
}

async fn current_snapshot(shows: &dyn ShowStore, show_id: &str) -> Result<Option<ShowEvent>, String> {
    let show = shows.find_by_id(show_id).await.map_err(|e| {
        tracing::error!("snapshot store error for show {}: {:?}", show_id, e);
        "Failed to load show".to_string()
    })?;
    Ok(show.map(|show| ShowEvent::seat_state(show.id.clone(), show.booked_seats_vec())))
}
