//! Registered database connections.
//!
//! Clients register a connection string once and refer to it afterwards by
//! its `conn_id`. Each registration owns a connection pool; every request
//! acquires its own pooled connection.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use sqlx::Postgres;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::ServerConfig;
use crate::error::{AppError, Result};

/// A registered connection string and its pool.
pub struct RegisteredConnection {
    pub id: String,
    pub created_at: Instant,
    last_activity: AtomicU64,
    pool: PgPool,
}

impl RegisteredConnection {
    fn new(id: String, pool: PgPool) -> Self {
        Self {
            id,
            created_at: Instant::now(),
            last_activity: AtomicU64::new(Self::now_timestamp()),
            pool,
        }
    }

    fn now_timestamp() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }

    pub fn touch(&self) {
        self.last_activity.store(Self::now_timestamp(), Ordering::SeqCst);
    }

    pub fn is_expired(&self, timeout: Duration) -> bool {
        let last = self.last_activity.load(Ordering::SeqCst);
        Self::now_timestamp().saturating_sub(last) > timeout.as_secs()
    }

    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }

    /// Acquire a pooled connection for one request.
    pub async fn acquire(&self) -> Result<PoolConnection<Postgres>> {
        self.pool
            .acquire()
            .await
            .map_err(|e| AppError::ConnectionFailed(e.to_string()))
    }
}

/// Derive the `conn_id` of a connection string.
///
/// The id is a name-based UUID, so registering the same string twice yields
/// the same id and reuses the existing pool.
pub fn connection_id(connection_string: &str) -> String {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, connection_string.as_bytes()).to_string()
}

/// Registry of connection pools keyed by `conn_id`.
///
/// `slots` counts registered connections plus registrations still
/// connecting, and never exceeds `max_connections`.
pub struct ConnectionRegistry {
    connections: DashMap<String, Arc<RegisteredConnection>>,
    slots: AtomicUsize,
    config: ServerConfig,
}

impl ConnectionRegistry {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            connections: DashMap::new(),
            slots: AtomicUsize::new(0),
            config,
        }
    }

    /// Register a connection string, connecting a new pool when needed.
    pub async fn register(&self, connection_string: &str) -> Result<String> {
        let id = connection_id(connection_string);
        if let Some(existing) = self.connections.get(&id) {
            existing.touch();
            debug!(conn_id = %id, "reusing registered connection");
            return Ok(id);
        }

        self.reserve_slot()?;
        let (pool, host, database) = match self.connect(connection_string).await {
            Ok(connected) => connected,
            Err(e) => {
                self.release_slot();
                return Err(e);
            }
        };

        // A concurrent registration of the same string may have won the race
        // while this pool was connecting.
        let connection = Arc::new(RegisteredConnection::new(id.clone(), pool));
        let duplicate = match self.connections.entry(id.clone()) {
            Entry::Occupied(_) => Some(connection),
            Entry::Vacant(entry) => {
                entry.insert(connection);
                None
            }
        };
        if let Some(duplicate) = duplicate {
            self.release_slot();
            duplicate.pool.close().await;
        } else {
            info!(conn_id = %id, host = %host, database = ?database, "registered connection");
        }

        Ok(id)
    }

    async fn connect(&self, connection_string: &str) -> Result<(PgPool, String, Option<String>)> {
        let options: PgConnectOptions = connection_string
            .parse()
            .map_err(|e| AppError::InvalidRequest(format!("invalid connection string: {}", e)))?;
        let host = options.get_host().to_string();
        let database = options.get_database().map(str::to_string);

        let pool = PgPoolOptions::new()
            .max_connections(self.config.pool_max_connections)
            .acquire_timeout(self.config.pool_acquire_timeout)
            .idle_timeout(self.config.pool_idle_timeout)
            .connect_with(options)
            .await
            .map_err(|e| AppError::ConnectionFailed(e.to_string()))?;
        Ok((pool, host, database))
    }

    fn reserve_slot(&self) -> Result<()> {
        let max = self.config.max_connections;
        self.slots
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                (n < max).then_some(n + 1)
            })
            .map(|_| ())
            .map_err(|_| AppError::TooManyConnections(max))
    }

    fn release_slot(&self) {
        self.slots.fetch_sub(1, Ordering::SeqCst);
    }

    /// Look up a registered connection, updating its last activity time.
    pub fn get(&self, id: &str) -> Result<Arc<RegisteredConnection>> {
        self.connections
            .get(id)
            .map(|entry| {
                let connection = entry.clone();
                connection.touch();
                connection
            })
            .ok_or_else(|| AppError::ConnectionNotFound(id.to_string()))
    }

    /// Close and forget a registered connection.
    pub async fn disconnect(&self, id: &str) -> Result<()> {
        let (_, connection) = self
            .connections
            .remove(id)
            .ok_or_else(|| AppError::ConnectionNotFound(id.to_string()))?;
        self.release_slot();
        connection.pool.close().await;
        info!(conn_id = %id, age_secs = connection.age().as_secs(), "closed connection");
        Ok(())
    }

    /// Number of registered connections.
    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// Close connections idle for longer than the configured timeout.
    pub async fn cleanup_expired(&self) -> usize {
        let timeout = self.config.connection_timeout;
        let expired: Vec<String> = self
            .connections
            .iter()
            .filter(|entry| entry.value().is_expired(timeout))
            .map(|entry| entry.key().clone())
            .collect();

        let mut closed = 0;
        for id in expired {
            if let Some((_, connection)) = self.connections.remove(&id) {
                self.release_slot();
                connection.pool.close().await;
                closed += 1;
            }
        }
        closed
    }

    /// Close every registered connection.
    pub async fn close_all(&self) {
        let ids: Vec<String> = self.connections.iter().map(|e| e.key().clone()).collect();
        for id in ids {
            if let Some((_, connection)) = self.connections.remove(&id) {
                self.release_slot();
                connection.pool.close().await;
            }
        }
    }
}

/// Background task to periodically close idle registered connections.
pub async fn cleanup_task(registry: Arc<ConnectionRegistry>, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    loop {
        ticker.tick().await;
        let closed = registry.cleanup_expired().await;
        if closed > 0 {
            info!("Closed {} idle connections", closed);
        }
    }
}
