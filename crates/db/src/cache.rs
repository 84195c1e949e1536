use chrono::{SecondsFormat, Utc};
use rusqlite::{OptionalExtension, params};
use stats_core::CacheEntryInfo;

use crate::Db;
use crate::error::Result;

impl Db {
    pub fn cache_get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM cache_entry WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    pub fn cache_put(&self, key: &str, source: &str, value: &str) -> Result<()> {
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        self.conn.execute(
            r#"
            INSERT INTO cache_entry (key, source, value, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(key) DO UPDATE SET
              source = excluded.source,
              value = excluded.value,
              updated_at = excluded.updated_at
            "#,
            params![key, source, value, now],
        )?;
        Ok(())
    }

    pub fn cache_delete(&self, key: &str) -> Result<usize> {
        Ok(self
            .conn
            .execute("DELETE FROM cache_entry WHERE key = ?1", params![key])?)
    }

    /// Removes every entry, or only the entries of one source prefix.
    pub fn cache_clear(&self, source: Option<&str>) -> Result<usize> {
        let removed = match source {
            Some(source) => self
                .conn
                .execute("DELETE FROM cache_entry WHERE source = ?1", params![source])?,
            None => self.conn.execute("DELETE FROM cache_entry", [])?,
        };
        Ok(removed)
    }

    pub fn cache_entries(&self) -> Result<Vec<CacheEntryInfo>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT key, source, updated_at, length(value)
            FROM cache_entry
            ORDER BY key ASC
            "#,
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(CacheEntryInfo {
                key: row.get(0)?,
                source: row.get(1)?,
                updated_at: row.get(2)?,
                bytes: row.get::<_, i64>(3)?.max(0) as u64,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }
}
