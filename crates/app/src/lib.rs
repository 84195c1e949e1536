pub mod app;
pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod registry;
pub mod services;
pub mod startup;

pub use app::{AppConfig, AppState};
pub use cache::{CacheEntry, CacheStore, DbCacheStore, TtlCache};
pub use clock::{Clock, SystemClock};
pub use config::{ProfileDefaults, ProfileParams};
pub use error::{ApiError, AppError, Result};
pub use registry::SourceSet;
pub use services::{AppServices, ContributionsReport, SettingsSnapshot, SettingsUpdate};
pub use startup::{AppPaths, ensure_app_data_dir};
