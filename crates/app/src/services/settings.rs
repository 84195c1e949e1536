use stats_core::Profile;
use stats_db::{Db, SettingKey};
use tracing::warn;

use crate::error::{AppError, Result};
use crate::services::{SharedConfig, open_db};

/// Effective settings: DB values layered over config defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsSnapshot {
    pub profile: Profile,
    pub extra_solved: u64,
    pub contest_rating: Option<f64>,
    pub db_path: String,
}

#[derive(Debug, Clone, Default)]
pub struct SettingsUpdate {
    pub leetcode: Option<String>,
    pub github: Option<String>,
    pub gfg: Option<String>,
    pub extra_solved: Option<u64>,
    pub contest_rating: Option<f64>,
    pub clear_contest_rating: bool,
}

#[derive(Clone)]
pub struct SettingsService {
    config: SharedConfig,
}

impl SettingsService {
    pub(super) fn new(config: SharedConfig) -> Self {
        Self { config }
    }

    pub fn get(&self) -> Result<SettingsSnapshot> {
        load_snapshot(&self.config)
    }

    pub fn update(&self, update: &SettingsUpdate) -> Result<SettingsSnapshot> {
        if let Some(rating) = update.contest_rating {
            if !rating.is_finite() || rating < 0.0 {
                return Err(AppError::InvalidInput(
                    "contest_rating must be a non-negative number".to_string(),
                ));
            }
        }
        let db = open_db(&self.config)?;
        let usernames = [
            (SettingKey::LeetcodeUsername, &update.leetcode),
            (SettingKey::GithubUsername, &update.github),
            (SettingKey::GfgUsername, &update.gfg),
        ];
        for (key, value) in usernames {
            match value.as_deref().map(str::trim) {
                Some("") => db.clear_setting(key)?,
                Some(name) => db.set_setting(key, name)?,
                None => {}
            }
        }
        if let Some(extra) = update.extra_solved {
            db.set_extra_solved(extra)?;
        }
        if update.clear_contest_rating {
            db.set_contest_rating(None)?;
        } else if update.contest_rating.is_some() {
            db.set_contest_rating(update.contest_rating)?;
        }
        snapshot_from_db(&self.config, &db)
    }
}

pub(super) fn load_snapshot(config: &SharedConfig) -> Result<SettingsSnapshot> {
    let db = open_db(config)?;
    snapshot_from_db(config, &db)
}

/// Like [`load_snapshot`], but an unavailable store yields the config defaults.
pub(super) fn load_snapshot_or_defaults(config: &SharedConfig) -> SettingsSnapshot {
    load_snapshot(config).unwrap_or_else(|err| {
        warn!(%err, "settings unavailable, using config defaults");
        defaults_snapshot(config)
    })
}

fn defaults_snapshot(config: &SharedConfig) -> SettingsSnapshot {
    let defaults = &config.profile;
    SettingsSnapshot {
        profile: Profile {
            leetcode: defaults.leetcode.clone(),
            github: defaults.github.clone(),
            gfg: defaults.gfg.clone(),
        },
        extra_solved: defaults.extra_solved,
        contest_rating: defaults.contest_rating,
        db_path: config.db_path.to_string_lossy().to_string(),
    }
}

fn snapshot_from_db(config: &SharedConfig, db: &Db) -> Result<SettingsSnapshot> {
    let defaults = &config.profile;
    let username = |key: SettingKey, fallback: &str| -> Result<String> {
        Ok(db
            .get_setting(key)?
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string()))
    };
    let profile = Profile {
        leetcode: username(SettingKey::LeetcodeUsername, &defaults.leetcode)?,
        github: username(SettingKey::GithubUsername, &defaults.github)?,
        gfg: username(SettingKey::GfgUsername, &defaults.gfg)?,
    };
    Ok(SettingsSnapshot {
        profile,
        extra_solved: db.get_extra_solved()?.unwrap_or(defaults.extra_solved),
        contest_rating: db.get_contest_rating()?.or(defaults.contest_rating),
        db_path: config.db_path.to_string_lossy().to_string(),
    })
}
