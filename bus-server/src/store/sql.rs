//! SQL-backed route store.
//!
//! Uses an sqlx `AnyPool` so the same queries run against MySQL in
//! production and SQLite locally. Table identifiers come only from
//! [`State::table_name`]; every value goes through a bound parameter.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::any::{AnyPoolOptions, AnyRow};
use sqlx::pool::PoolConnection;
use sqlx::{Any, AnyPool, Row};
use tracing::{debug, info};

use crate::domain::{BusType, Offering, Rating, RouteName, State};

use super::error::StoreError;
use super::{RouteStore, StoreSession};

/// Table holding one row per offering.
const OFFERING_TABLE: &str = "project_info";

/// Escape character used in LIKE patterns.
const LIKE_ESCAPE: char = '!';

/// Default maximum pooled connections.
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Configuration for the SQL store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// sqlx connection URL, e.g. `mysql://root:pw@localhost/redbus_travel`
    pub url: String,
    /// Maximum pooled connections
    pub max_connections: u32,
    /// How long to wait for a connection before reporting the store unavailable
    pub acquire_timeout: Duration,
}

impl StoreConfig {
    /// Create a config for the given URL with default pool settings.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout: Duration::from_secs(5),
        }
    }

    /// Set maximum pooled connections.
    pub fn with_max_connections(mut self, n: u32) -> Self {
        self.max_connections = n;
        self
    }

    /// Set the acquire timeout.
    pub fn with_acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }
}

/// Route store backed by a relational database.
#[derive(Debug, Clone)]
pub struct SqlRouteStore {
    pool: AnyPool,
}

impl SqlRouteStore {
    /// Create a store with a lazily connecting pool.
    ///
    /// No connection is opened here; an unreachable database surfaces as
    /// [`StoreError::Unavailable`] when a session is requested.
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        sqlx::any::install_default_drivers();

        let pool = AnyPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect_lazy(&config.url)
            .map_err(StoreError::Unavailable)?;

        info!(
            max_connections = config.max_connections,
            "configured SQL route store"
        );
        Ok(Self { pool })
    }

    /// The underlying pool.
    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }
}

#[async_trait]
impl RouteStore for SqlRouteStore {
    async fn session(&self) -> Result<Box<dyn StoreSession>, StoreError> {
        let conn = self.pool.acquire().await.map_err(StoreError::Unavailable)?;
        Ok(Box::new(SqlSession { conn }))
    }
}

/// One acquired connection; returned to the pool on drop.
struct SqlSession {
    conn: PoolConnection<Any>,
}

#[async_trait]
impl StoreSession for SqlSession {
    async fn route_names(
        &mut self,
        state: State,
        prefix: &str,
    ) -> Result<Vec<RouteName>, StoreError> {
        let table = state.table_name();
        let sql = format!(
            "SELECT DISTINCT route_name FROM {table} \
             WHERE route_name LIKE ? ESCAPE '{LIKE_ESCAPE}' \
             ORDER BY route_name ASC"
        );
        let pattern = format!("{}%", escape_like(prefix));

        let rows = sqlx::query(&sql)
            .bind(pattern)
            .fetch_all(&mut *self.conn)
            .await
            .map_err(|e| classify(e, table))?;

        debug!(table, prefix, rows = rows.len(), "fetched route names");

        rows.iter()
            .map(|row| {
                row.try_get::<String, _>("route_name")
                    .map(RouteName::new)
                    .map_err(|e| StoreError::InvalidRow {
                        table,
                        message: e.to_string(),
                    })
            })
            .collect()
    }

    async fn offerings(&mut self, route: &RouteName) -> Result<Vec<Offering>, StoreError> {
        let sql = format!(
            "SELECT route_name, bus_name, bus_type, departing_time, duration, \
             reaching_time, ratings, price, seats_available \
             FROM {OFFERING_TABLE} WHERE route_name = ?"
        );

        let rows = sqlx::query(&sql)
            .bind(route.as_str().to_string())
            .fetch_all(&mut *self.conn)
            .await
            .map_err(|e| classify(e, OFFERING_TABLE))?;

        debug!(route = route.as_str(), rows = rows.len(), "fetched offerings");

        rows.iter().map(offering_from_row).collect()
    }
}

/// Escape LIKE metacharacters so `prefix` only ever matches literally.
fn escape_like(prefix: &str) -> String {
    let mut escaped = String::with_capacity(prefix.len());
    for c in prefix.chars() {
        if c == '%' || c == '_' || c == LIKE_ESCAPE {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

/// Map an sqlx error onto the store taxonomy.
fn classify(err: sqlx::Error, table: &str) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if is_missing_table(db.as_ref()) => StoreError::MissingTable {
            table: table.to_string(),
        },
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => StoreError::Unavailable(err),
        _ => StoreError::Query(err),
    }
}

/// MySQL reports SQLSTATE 42S02 (error 1146); SQLite only has a message.
fn is_missing_table(db: &dyn sqlx::error::DatabaseError) -> bool {
    let code_matches = db
        .code()
        .is_some_and(|code| code == "42S02" || code == "1146");
    let message = db.message();
    code_matches || message.contains("no such table") || message.contains("doesn't exist")
}

fn offering_from_row(row: &AnyRow) -> Result<Offering, StoreError> {
    let invalid = |message: String| StoreError::InvalidRow {
        table: OFFERING_TABLE,
        message,
    };
    let column = |e: sqlx::Error| invalid(e.to_string());

    let route_name: String = row.try_get("route_name").map_err(column)?;
    let bus_name: Option<String> = row.try_get("bus_name").map_err(column)?;
    let bus_type: String = row.try_get("bus_type").map_err(column)?;
    let rating: f64 = row.try_get("ratings").map_err(column)?;
    let price: f64 = row.try_get("price").map_err(column)?;
    let seats: i64 = row.try_get("seats_available").map_err(column)?;

    let seats_available = u32::try_from(seats)
        .map_err(|_| invalid(format!("seats_available out of range: {seats}")))?;

    Ok(Offering {
        route_name: RouteName::new(route_name),
        bus_name: bus_name.unwrap_or_default(),
        bus_type: BusType::new(bus_type).map_err(|e| invalid(e.to_string()))?,
        rating: Rating::new(rating).map_err(|e| invalid(e.to_string()))?,
        price,
        seats_available,
        departing_time: row.try_get("departing_time").map_err(column)?,
        duration: row.try_get("duration").map_err(column)?,
        reaching_time: row.try_get("reaching_time").map_err(column)?,
    })
}
