mod cache;
mod contributions;
mod dashboard;
mod gfg;
mod settings;

use std::sync::Arc;

use crate::app::AppConfig;
use crate::cache::TtlCache;
use crate::error::Result;
use crate::registry::SourceSet;
use stats_db::Db;

pub use cache::CacheService;
pub use contributions::{ContributionsReport, ContributionsService};
pub use dashboard::DashboardService;
pub use gfg::GfgCountService;
pub use settings::{SettingsService, SettingsSnapshot, SettingsUpdate};

type SharedConfig = Arc<AppConfig>;
type SharedSources = Arc<SourceSet>;

/// Service registry for app-level operations.
#[derive(Clone)]
pub struct AppServices {
    pub dashboard: DashboardService,
    pub contributions: ContributionsService,
    pub gfg: GfgCountService,
    pub cache: CacheService,
    pub settings: SettingsService,
}

impl AppServices {
    pub fn new(config: &AppConfig, sources: SourceSet, cache: TtlCache) -> Self {
        let shared = Arc::new(config.clone());
        let sources = Arc::new(sources);
        Self {
            dashboard: DashboardService::new(shared.clone(), sources.clone(), cache.clone()),
            contributions: ContributionsService::new(shared.clone(), sources.clone(), cache),
            gfg: GfgCountService::new(sources),
            cache: CacheService::new(shared.clone()),
            settings: SettingsService::new(shared),
        }
    }
}

fn open_db(config: &SharedConfig) -> Result<Db> {
    Ok(Db::open(&config.db_path)?)
}
