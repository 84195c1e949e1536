use std::path::PathBuf;
use std::sync::Arc;

use crate::cache::{CacheStore, DbCacheStore, TtlCache};
use crate::clock::{Clock, SystemClock};
use crate::config::ProfileDefaults;
use crate::error::{AppError, Result};
use crate::registry::SourceSet;
use crate::services::AppServices;
use sources::{HttpSettings, SourceEndpoints};
use stats_core::DEFAULT_CACHE_TTL_MS;
use stats_db::Db;

/// Paths and settings needed to run the local aggregator.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub cache_ttl_ms: i64,
    pub endpoints: SourceEndpoints,
    pub http: HttpSettings,
    pub profile: ProfileDefaults,
}

impl AppConfig {
    pub fn new(db_path: PathBuf) -> Self {
        Self {
            db_path,
            cache_ttl_ms: DEFAULT_CACHE_TTL_MS,
            endpoints: SourceEndpoints::default(),
            http: HttpSettings::default(),
            profile: ProfileDefaults::default(),
        }
    }
}

/// Application state shared by frontend backends (HTTP, CLI).
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub services: AppServices,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self> {
        let sources = SourceSet::from_endpoints(&config.endpoints, &config.http)?;
        let store = Arc::new(DbCacheStore::new(config.db_path.clone()));
        Ok(Self::with_parts(config, sources, store, Arc::new(SystemClock)))
    }

    /// Builds the state around explicit adapters, store and clock.
    pub fn with_parts(
        config: AppConfig,
        sources: SourceSet,
        store: Arc<dyn CacheStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let cache = TtlCache::new(store, clock, config.cache_ttl_ms);
        let services = AppServices::new(&config, sources, cache);
        Self { config, services }
    }

    pub fn setup_db(&self) -> Result<()> {
        setup_db(&self.config.db_path)
    }

    pub fn initialize(&self) -> Result<()> {
        self.setup_db()
            .map_err(|err| AppError::Message(format!("initialize db: {}", err)))
    }

    pub fn open_db(&self) -> Result<Db> {
        Ok(Db::open(&self.config.db_path)?)
    }
}

pub fn setup_db(path: &std::path::Path) -> Result<()> {
    let mut db = Db::open(path)?;
    db.migrate()?;
    Ok(())
}
