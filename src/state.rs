use std::sync::Arc;
use std::time::Duration;

use crate::{
    config::Config,
    database::DbPool,
    error::{Error, Result},
    services::{
        chatbot::{DialogueEngine, PgDailyRecordStore},
        google_calendar::GoogleCalendarClient,
        nutrition::ApiNinjasClient,
    },
};

/// Application state shared across all HTTP handlers
///
/// Holds the configuration, the database pool and the outbound API clients.
/// Everything is behind `Arc` so cloning per request is cheap.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Database connection pool for accessing the database
    pub pool: DbPool,
    /// API Ninjas client for nutrition and calories-burned lookups
    pub nutrition: Arc<ApiNinjasClient>,
    pub calendar: Arc<GoogleCalendarClient>,
    /// Scripted chat assistant
    pub dialogue: Arc<DialogueEngine>,
}

impl AppState {
    /// Create a new AppState instance
    ///
    /// # Arguments
    /// * `config` - Loaded application configuration
    /// * `pool` - Database connection pool
    pub fn new(config: Config, pool: DbPool) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.nutrition.timeout_seconds))
            .build()
            .map_err(|e| Error::Internal(format!("Failed to build HTTP client: {}", e)))?;

        let nutrition = Arc::new(ApiNinjasClient::new(&config.nutrition, http.clone()));
        let calendar = Arc::new(GoogleCalendarClient::new(&config.google_calendar, http));
        let dialogue = Arc::new(DialogueEngine::new(
            nutrition.clone(),
            Arc::new(PgDailyRecordStore::new(pool.clone())),
        ));

        Ok(Self {
            config: Arc::new(config),
            pool,
            nutrition,
            calendar,
            dialogue,
        })
    }
}
