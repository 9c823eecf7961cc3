pub mod cache;
pub mod channels;
pub mod config;
pub mod controllers;
pub mod database;
pub mod error;
pub mod middleware;
pub mod models;
pub mod redis_client;
pub mod services;
pub mod store;

use anyhow::Context;
use axum::{routing::get, Router};
use std::sync::Arc;
use tracing::info;

use channels::ShowChannels;
use config::{Config, StorageBackend};
use models::Show;
use services::{notifier::Notifier, recorder::BookingRecorder, reservation::ReservationService};
use store::{
    memory::{MemoryBookingStore, MemorySeatLocks, MemoryShowStore},
    postgres::{PgBookingStore, PgShowStore},
    BookingStore, SeatLocks, ShowStore,
};

// Shared state для всего приложения
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub shows: Arc<dyn ShowStore>,
    pub bookings: Arc<dyn BookingStore>,
    pub channels: ShowChannels,
    pub reservations: ReservationService,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Arc<Self>> {
        match config.storage {
            StorageBackend::Postgres => {
                let db_url = config
                    .database
                    .url
                    .clone()
                    .context("DATABASE_URL is required for postgres storage")?;
                let redis_url = config
                    .redis
                    .url
                    .clone()
                    .context("REDIS_URL is required for postgres storage")?;

                let db = database::Database::connect(&config.database, &db_url)
                    .await
                    .context("failed to connect to database")?;
                db.run_migrations().await.context("failed to run migrations")?;

                let redis = redis_client::RedisClient::connect(&redis_url)
                    .await
                    .context("failed to connect to redis")?;
                info!("Redis connected");

                Ok(Self::from_parts(
                    config,
                    Arc::new(PgShowStore::new(db.pool.clone())),
                    Arc::new(PgBookingStore::new(db.pool)),
                    Arc::new(cache::SeatLockCache::new(redis)),
                    ShowChannels::new(),
                ))
            }
            StorageBackend::Memory => {
                let shows = MemoryShowStore::new();
                if let Some(path) = &config.reservation.memory_seed {
                    let raw = tokio::fs::read_to_string(path)
                        .await
                        .with_context(|| format!("failed to read seed file {}", path))?;
                    let seed: Vec<Show> = serde_json::from_str(&raw)
                        .with_context(|| format!("seed file {} is not a list of shows", path))?;
                    info!("Seeding {} show(s) from {}", seed.len(), path);
                    for show in seed {
                        let id = show.id.clone();
                        shows
                            .insert(show)
                            .await
                            .with_context(|| format!("seed show {} has invalid booked seats", id))?;
                    }
                }

                Ok(Self::from_parts(
                    config,
                    Arc::new(shows),
                    Arc::new(MemoryBookingStore::new()),
                    Arc::new(MemorySeatLocks::new()),
                    ShowChannels::new(),
                ))
            }
        }
    }

    /// Wires the reservation pipeline around already-built collaborators.
    pub fn from_parts(
        config: Config,
        shows: Arc<dyn ShowStore>,
        bookings: Arc<dyn BookingStore>,
        locks: Arc<dyn SeatLocks>,
        channels: ShowChannels,
    ) -> Arc<Self> {
        let notifier = Notifier::new(locks, Arc::new(channels.clone()));
        let reservations = ReservationService::new(
            shows.clone(),
            BookingRecorder::new(bookings.clone()),
            notifier,
            config.reservation.store_timeout(),
        );

        Arc::new(Self {
            config,
            shows,
            bookings,
            channels,
            reservations,
        })
    }
}

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .nest("/api", controllers::routes())
        .with_state(state)
}
