//! CRUD operations for [`VideoLesson`] records.

use rusqlite::params;
use uuid::Uuid;

use crate::database::{column_timestamp, column_uuid, Database};
use crate::error::{Result, StoreError};
use crate::models::VideoLesson;

impl Database {
    // ------------------------------------------------------------------
    // Create / Update
    // ------------------------------------------------------------------

    /// Insert a new video lesson.
    pub fn insert_video(&self, video: &VideoLesson) -> Result<()> {
        self.conn().execute(
            "INSERT INTO video_lessons (id, title, thumbnail, duration, description, \
             short_description, category, video_url, is_premium, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                video.id.to_string(),
                video.title,
                video.thumbnail,
                video.duration,
                video.description,
                video.short_description,
                video.category,
                video.video_url,
                video.is_premium,
                video.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Overwrite an existing video lesson's content fields.
    pub fn update_video(&self, video: &VideoLesson) -> Result<()> {
        let affected = self.conn().execute(
            "UPDATE video_lessons SET title = ?2, thumbnail = ?3, duration = ?4, \
             description = ?5, short_description = ?6, category = ?7, video_url = ?8, \
             is_premium = ?9 WHERE id = ?1",
            params![
                video.id.to_string(),
                video.title,
                video.thumbnail,
                video.duration,
                video.description,
                video.short_description,
                video.category,
                video.video_url,
                video.is_premium,
            ],
        )?;
        if affected == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    /// Fetch a single video lesson by UUID.
    pub fn get_video(&self, id: Uuid) -> Result<VideoLesson> {
        self.conn()
            .query_row(
                "SELECT id, title, thumbnail, duration, description, short_description, \
                 category, video_url, is_premium, created_at
                 FROM video_lessons
                 WHERE id = ?1",
                params![id.to_string()],
                row_to_video,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
                other => StoreError::Sqlite(other),
            })
    }

    /// List all video lessons, newest first.
    pub fn list_videos(&self) -> Result<Vec<VideoLesson>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, title, thumbnail, duration, description, short_description, \
             category, video_url, is_premium, created_at
             FROM video_lessons
             ORDER BY created_at DESC",
        )?;

        let rows = stmt.query_map([], row_to_video)?;

        let mut videos = Vec::new();
        for row in rows {
            videos.push(row?);
        }
        Ok(videos)
    }

    /// Total number of video lessons (admin dashboard).
    pub fn count_videos(&self) -> Result<u32> {
        let count = self
            .conn()
            .query_row("SELECT COUNT(*) FROM video_lessons", [], |row| row.get(0))?;
        Ok(count)
    }

    // ------------------------------------------------------------------
    // Delete
    // ------------------------------------------------------------------

    /// Delete a video lesson by UUID.  Returns `true` if a row was deleted.
    pub fn delete_video(&self, id: Uuid) -> Result<bool> {
        let affected = self.conn().execute(
            "DELETE FROM video_lessons WHERE id = ?1",
            params![id.to_string()],
        )?;
        Ok(affected > 0)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Map a `rusqlite::Row` to a [`VideoLesson`].
fn row_to_video(row: &rusqlite::Row<'_>) -> rusqlite::Result<VideoLesson> {
    let id_str: String = row.get(0)?;
    let created_str: String = row.get(9)?;

    Ok(VideoLesson {
        id: column_uuid(0, &id_str)?,
        title: row.get(1)?,
        thumbnail: row.get(2)?,
        duration: row.get(3)?,
        description: row.get(4)?,
        short_description: row.get(5)?,
        category: row.get(6)?,
        video_url: row.get(7)?,
        is_premium: row.get(8)?,
        created_at: column_timestamp(9, &created_str)?,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::profiles::tests::test_db;
    use chrono::Utc;

    pub(crate) fn sample_video(title: &str, is_premium: bool) -> VideoLesson {
        VideoLesson {
            id: Uuid::new_v4(),
            title: title.to_string(),
            thumbnail: "https://cdn.example.com/thumb.jpg".to_string(),
            duration: "12:30".to_string(),
            description: "Knife skills from the ground up.".to_string(),
            short_description: Some("Knife basics".to_string()),
            category: Some("technique".to_string()),
            video_url: "https://cdn.example.com/lesson.mp4".to_string(),
            is_premium,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn insert_get_round_trip() {
        let (_dir, db) = test_db();
        let video = sample_video("Knife skills", true);
        db.insert_video(&video).unwrap();

        let stored = db.get_video(video.id).unwrap();
        assert_eq!(stored.title, "Knife skills");
        assert!(stored.is_premium);
        assert_eq!(stored.category.as_deref(), Some("technique"));
    }

    #[test]
    fn update_toggles_premium_flag() {
        let (_dir, db) = test_db();
        let mut video = sample_video("Knife skills", false);
        db.insert_video(&video).unwrap();

        video.is_premium = true;
        db.update_video(&video).unwrap();

        assert!(db.get_video(video.id).unwrap().is_premium);
    }

    #[test]
    fn list_is_newest_first() {
        let (_dir, db) = test_db();
        let mut older = sample_video("Old lesson", false);
        older.created_at = Utc::now() - chrono::Duration::hours(1);
        let newer = sample_video("New lesson", false);

        db.insert_video(&older).unwrap();
        db.insert_video(&newer).unwrap();

        let listed = db.list_videos().unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, newer.id);
    }

    #[test]
    fn delete_video_by_id() {
        let (_dir, db) = test_db();
        let video = sample_video("Knife skills", false);
        db.insert_video(&video).unwrap();

        assert!(db.delete_video(video.id).unwrap());
        assert!(matches!(db.get_video(video.id), Err(StoreError::NotFound)));
    }
}
