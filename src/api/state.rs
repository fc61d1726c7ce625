//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::mail::Mailer;
use crate::media::Uploader;
use crate::store::Store;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Users, teams, results and payments
    pub store: Arc<Store>,
    /// Payment screenshot uploads
    pub uploader: Uploader,
    /// Notification emails
    pub mailer: Mailer,
    pub config: Arc<Config>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(store: Arc<Store>, uploader: Uploader, mailer: Mailer, config: Config) -> Self {
        Self {
            store,
            uploader,
            mailer,
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Wire every component from configuration
    pub fn from_config(config: Config) -> crate::store::StoreResult<Self> {
        let store = Arc::new(Store::open(&config.database.path)?);
        let uploader = Uploader::from_config(&config.media);
        let mailer = Mailer::from_config(&config.smtp);
        Ok(Self::new(store, uploader, mailer, config))
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Socket address string the server binds to
    pub fn addr(&self) -> String {
        format!("{}:{}", self.config.server.host, self.config.server.port)
    }
}
