//! Video view events.
//!
//! Raw append-only rows; the entitlement quota works from the distinct set
//! per calendar month.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rusqlite::params;
use uuid::Uuid;

use crate::database::{column_uuid, Database};
use crate::error::Result;
use crate::models::VideoView;

impl Database {
    /// Append a view event.
    pub fn record_video_view(&self, view: &VideoView) -> Result<()> {
        self.conn().execute(
            "INSERT INTO video_views (user_id, video_id, viewed_at)
             VALUES (?1, ?2, ?3)",
            params![
                view.user_id.to_string(),
                view.video_id.to_string(),
                view.viewed_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Distinct videos the user viewed at or after `since`.
    pub fn distinct_viewed_videos(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<HashSet<Uuid>> {
        let mut stmt = self.conn().prepare(
            "SELECT DISTINCT video_id FROM video_views
             WHERE user_id = ?1 AND viewed_at >= ?2",
        )?;

        let rows = stmt.query_map(params![user_id.to_string(), since.to_rfc3339()], |row| {
            let id: String = row.get(0)?;
            column_uuid(0, &id)
        })?;

        let mut ids = HashSet::new();
        for row in rows {
            ids.insert(row?);
        }
        Ok(ids)
    }
}
