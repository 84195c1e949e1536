use rusqlite::params;

use crate::Db;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    LeetcodeUsername,
    GithubUsername,
    GfgUsername,
    ExtraSolved,
    ContestRating,
}

impl SettingKey {
    pub fn as_str(self) -> &'static str {
        match self {
            SettingKey::LeetcodeUsername => "leetcode_username",
            SettingKey::GithubUsername => "github_username",
            SettingKey::GfgUsername => "gfg_username",
            SettingKey::ExtraSolved => "extra_solved",
            SettingKey::ContestRating => "contest_rating",
        }
    }
}

impl Db {
    pub fn get_setting(&self, key: SettingKey) -> Result<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM app_setting WHERE key = ?1")?;
        let mut rows = stmt.query([key.as_str()])?;
        if let Some(row) = rows.next()? {
            Ok(Some(row.get::<_, String>(0)?))
        } else {
            Ok(None)
        }
    }

    pub fn set_setting(&self, key: SettingKey, value: &str) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO app_setting (key, value)
            VALUES (?1, ?2)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            "#,
            params![key.as_str(), value],
        )?;
        Ok(())
    }

    pub fn clear_setting(&self, key: SettingKey) -> Result<()> {
        self.conn.execute(
            "DELETE FROM app_setting WHERE key = ?1",
            params![key.as_str()],
        )?;
        Ok(())
    }

    pub fn get_extra_solved(&self) -> Result<Option<u64>> {
        Ok(self
            .get_setting(SettingKey::ExtraSolved)?
            .and_then(|value| value.parse::<u64>().ok()))
    }

    pub fn set_extra_solved(&self, value: u64) -> Result<()> {
        self.set_setting(SettingKey::ExtraSolved, &value.to_string())
    }

    pub fn get_contest_rating(&self) -> Result<Option<f64>> {
        Ok(self
            .get_setting(SettingKey::ContestRating)?
            .and_then(|value| value.parse::<f64>().ok())
            .filter(|value| value.is_finite()))
    }

    pub fn set_contest_rating(&self, value: Option<f64>) -> Result<()> {
        match value {
            Some(rating) => self.set_setting(SettingKey::ContestRating, &rating.to_string()),
            None => self.clear_setting(SettingKey::ContestRating),
        }
    }
}
