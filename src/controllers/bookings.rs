use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use validator::Validate;

use crate::{
    error::ReservationError,
    middleware::AuthUser,
    models::{Booking, Show},
    AppState,
};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/bookings", get(get_user_bookings).post(create_booking))
        .route("/admin/bookings", get(get_all_bookings))
}

/* ---------- RESERVE ---------- */

// POST /api/bookings
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct CreateBookingRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "showId is required"))]
    show_id: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "seats must contain at least one seat"))]
    seats: Vec<String>,
}

async fn create_booking(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    payload: Result<Json<CreateBookingRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ReservationError> {
    let Json(req) = payload.map_err(|e| ReservationError::InvalidInput(e.body_text()))?;
    req.validate()
        .map_err(|e| ReservationError::InvalidInput(e.to_string()))?;

    let reservation = state
        .reservations
        .reserve(&req.show_id, &req.seats, &user.user_id)
        .await?;

    Ok((StatusCode::CREATED, Json(reservation)))
}

/* ---------- LISTINGS ---------- */

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ShowSummary {
    id: String,
    title: String,
    price: Option<f64>,
}

#[derive(Debug, Serialize)]
struct BookingView {
    #[serde(flatten)]
    booking: Booking,
    show: Option<ShowSummary>,
}

// GET /api/bookings
async fn get_user_bookings(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let bookings = state.bookings.find_by_user(&user.user_id).await.map_err(|e| {
        tracing::error!("get_user_bookings store error: {:?}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Failed to load bookings".to_string())
    })?;

    let views = populate_shows(&state, bookings).await?;
    Ok((StatusCode::OK, Json(views)))
}

// GET /api/admin/bookings
async fn get_all_bookings(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if !user.is_admin {
        return Err((StatusCode::FORBIDDEN, "Admin role required".to_string()));
    }

    let bookings = state.bookings.find_all().await.map_err(|e| {
        tracing::error!("get_all_bookings store error: {:?}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Failed to load bookings".to_string())
    })?;

    let views = populate_shows(&state, bookings).await?;
    Ok((StatusCode::OK, Json(views)))
}

/// Attaches a summary of each referenced show, loading every show once.
async fn populate_shows(
    state: &AppState,
    bookings: Vec<Booking>,
) -> Result<Vec<BookingView>, (StatusCode, String)> {
    let mut shows: HashMap<String, Option<Show>> = HashMap::new();
    for booking in &bookings {
        if shows.contains_key(&booking.show_id) {
            continue;
        }
        let show = state.shows.find_by_id(&booking.show_id).await.map_err(|e| {
            tracing::error!("populate_shows store error for {}: {:?}", booking.show_id, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to load shows".to_string())
        })?;
        shows.insert(booking.show_id.clone(), show);
    }

    Ok(bookings
        .into_iter()
        .map(|booking| {
            let show = shows.get(&booking.show_id).cloned().flatten().map(|s| ShowSummary {
                id: s.id,
                title: s.title,
                price: s.price,
            });
            BookingView { booking, show }
        })
        .collect())
}
