use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Sqlite,
};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

use crate::models::{event::SEED_EVENTS, Booking, Event};

/// Row store holding the `events` and `bookings` tables.
#[derive(Clone)]
pub struct Database {
    pub pool: Pool<Sqlite>,
}

impl Database {
    pub async fn new(database_url: &str, pool_size: u32) -> Result<Self, sqlx::Error> {
        // Booking.event_id is a declared reference only, so enforcement stays off.
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(false);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size.max(1))
            .acquire_timeout(Duration::from_secs(5))
            .connect_with(options)
            .await?;

        Ok(Database { pool })
    }

    /// Private in-memory store. Pinned to one connection that never expires, since every
    /// SQLite `:memory:` connection is its own database.
    pub async fn in_memory() -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(false);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Ok(Database { pool })
    }

    /// Creates `events` and `bookings` if they do not exist yet.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        let schema = sqlx::migrate!("./src/migrations");
        schema.run(&self.pool).await?;
        info!(migrations = schema.iter().count(), "Row store schema ready");
        Ok(())
    }

    /// Inserts the fixed seed events unless they are already present.
    pub async fn seed_events(&self) -> Result<(), sqlx::Error> {
        for (name, date) in SEED_EVENTS {
            let inserted = sqlx::query("INSERT OR IGNORE INTO events (name, date) VALUES (?, ?)")
                .bind(name)
                .bind(date)
                .execute(&self.pool)
                .await?
                .rows_affected();
            if inserted > 0 {
                info!("Seeded event {} on {}", name, date);
            }
        }
        Ok(())
    }

    /// Creates the schema and seed rows. Safe to call on every start.
    pub async fn initialize(&self) -> anyhow::Result<()> {
        self.run_migrations().await?;
        self.seed_events().await?;
        Ok(())
    }

    pub async fn list_events(&self) -> Result<Vec<Event>, sqlx::Error> {
        sqlx::query_as::<_, Event>("SELECT id, name, date FROM events ORDER BY id")
            .fetch_all(&self.pool)
            .await
    }

    pub async fn insert_booking(&self, event_id: i64, user_name: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "INSERT INTO bookings (event_id, user_name)
             VALUES (?, ?)
             RETURNING id"
        )
        .bind(event_id)
        .bind(user_name)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn bookings_for_event(&self, event_id: i64) -> Result<Vec<Booking>, sqlx::Error> {
        sqlx::query_as::<_, Booking>(
            "SELECT id, event_id, user_name FROM bookings WHERE event_id = ? ORDER BY id"
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await
    }
}
