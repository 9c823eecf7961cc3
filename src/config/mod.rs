use anyhow::{bail, Context};
use std::env;
use std::str::FromStr;
use std::time::Duration;

// Главная структура конфигурации - контейнер для всех настроек
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub storage: StorageBackend,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub reservation: ReservationConfig,
}

// Настройки приложения
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub rust_log: String,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Where shows and bookings live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// Postgres for shows/bookings, Redis for soft holds.
    Postgres,
    /// Everything in process; state is lost on restart.
    Memory,
}

// Настройки базы данных
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub pool_size: u32,
    pub acquire_timeout_secs: u64,
}

// Настройки Redis
#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub url: Option<String>,
}

// Настройки бронирования
#[derive(Debug, Clone)]
pub struct ReservationConfig {
    /// Upper bound on waiting for the atomic seat claim.
    pub store_timeout_ms: u64,
    /// JSON file with shows to preload into the in-memory store.
    pub memory_seed: Option<String>,
}

impl ReservationConfig {
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            app: AppConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
                environment: "development".to_string(),
                rust_log: "show_booking=debug,tower_http=debug".to_string(),
                log_format: LogFormat::Pretty,
            },
            storage: StorageBackend::Memory,
            database: DatabaseConfig {
                url: None,
                pool_size: 20,
                acquire_timeout_secs: 5,
            },
            redis: RedisConfig { url: None },
            reservation: ReservationConfig {
                store_timeout_ms: 5000,
                memory_seed: None,
            },
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Config::default();

        let storage = match env::var("STORAGE_BACKEND") {
            Ok(raw) => parse_storage(&raw)?,
            Err(_) => defaults.storage,
        };

        let log_format = match env_or("LOG_FORMAT", "pretty".to_string())?.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        let config = Config {
            app: AppConfig {
                host: env_or("HOST", defaults.app.host)?,
                port: env_or("PORT", defaults.app.port)?,
                environment: env_or("ENVIRONMENT", defaults.app.environment)?,
                rust_log: env_or("RUST_LOG", defaults.app.rust_log)?,
                log_format,
            },
            storage,
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").ok(),
                pool_size: env_or("DB_POOL_SIZE", defaults.database.pool_size)?,
                acquire_timeout_secs: env_or(
                    "DB_ACQUIRE_TIMEOUT_SECS",
                    defaults.database.acquire_timeout_secs,
                )?,
            },
            redis: RedisConfig {
                url: env::var("REDIS_URL").ok(),
            },
            reservation: ReservationConfig {
                store_timeout_ms: env_or("STORE_TIMEOUT_MS", defaults.reservation.store_timeout_ms)?,
                memory_seed: env::var("MEMORY_SEED").ok(),
            },
        };

        if config.storage == StorageBackend::Postgres {
            if config.database.url.is_none() {
                bail!("DATABASE_URL must be set when STORAGE_BACKEND=postgres");
            }
            if config.redis.url.is_none() {
                bail!("REDIS_URL must be set when STORAGE_BACKEND=postgres");
            }
        }

        Ok(config)
    }
}

fn parse_storage(raw: &str) -> anyhow::Result<StorageBackend> {
    match raw.trim().to_lowercase().as_str() {
        "postgres" => Ok(StorageBackend::Postgres),
        "memory" => Ok(StorageBackend::Memory),
        other => bail!("STORAGE_BACKEND must be postgres or memory, got {}", other),
    }
}

fn env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {:?}", key, raw)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_run_in_memory() {
        let config = Config::default();
        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(config.reservation.store_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn storage_backend_parsing() {
        assert_eq!(parse_storage(" Postgres ").unwrap(), StorageBackend::Postgres);
        assert_eq!(parse_storage("memory").unwrap(), StorageBackend::Memory);
        assert!(parse_storage("sqlite").is_err());
    }

    #[test]
    fn env_or_reports_bad_numbers() {
        env::set_var("SHOW_BOOKING_TEST_PORT", "eighty");
        let err = env_or::<u16>("SHOW_BOOKING_TEST_PORT", 80).unwrap_err();
        assert!(err.to_string().contains("SHOW_BOOKING_TEST_PORT"));
        env::remove_var("SHOW_BOOKING_TEST_PORT");

        assert_eq!(env_or::<u16>("SHOW_BOOKING_TEST_UNSET", 80).unwrap(), 80);
    }
}
