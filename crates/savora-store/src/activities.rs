//! Append-only activity history.

use rusqlite::params;
use uuid::Uuid;

use crate::database::{column_enum, column_opt_uuid, column_timestamp, column_uuid, Database};
use crate::error::Result;
use crate::models::{Activity, ActivityKind};

impl Database {
    /// Append an activity row.
    pub fn insert_activity(&self, activity: &Activity) -> Result<()> {
        self.conn().execute(
            "INSERT INTO user_activities (id, user_id, kind, title, item_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                activity.id.to_string(),
                activity.user_id.to_string(),
                activity.kind.as_str(),
                activity.title,
                activity.item_id.map(|i| i.to_string()),
                activity.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// The user's most recent activities, newest first.
    pub fn recent_activities(&self, user_id: Uuid, limit: u32) -> Result<Vec<Activity>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, user_id, kind, title, item_id, created_at
             FROM user_activities
             WHERE user_id = ?1
             ORDER BY created_at DESC
             LIMIT ?2",
        )?;

        let rows = stmt.query_map(params![user_id.to_string(), limit], row_to_activity)?;

        let mut activities = Vec::new();
        for row in rows {
            activities.push(row?);
        }
        Ok(activities)
    }

    /// Wipe the user's history.  Returns the number of rows removed.
    pub fn clear_activities(&self, user_id: Uuid) -> Result<usize> {
        let affected = self.conn().execute(
            "DELETE FROM user_activities WHERE user_id = ?1",
            params![user_id.to_string()],
        )?;
        Ok(affected)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Map a `rusqlite::Row` to an [`Activity`].
fn row_to_activity(row: &rusqlite::Row<'_>) -> rusqlite::Result<Activity> {
    let id_str: String = row.get(0)?;
    let user_str: String = row.get(1)?;
    let kind_str: String = row.get(2)?;
    let item_str: Option<String> = row.get(4)?;
    let created_str: String = row.get(5)?;

    Ok(Activity {
        id: column_uuid(0, &id_str)?,
        user_id: column_uuid(1, &user_str)?,
        kind: column_enum::<ActivityKind>(2, &kind_str)?,
        title: row.get(3)?,
        item_id: column_opt_uuid(4, item_str)?,
        created_at: column_timestamp(5, &created_str)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::tests::{seed_profile, test_db};
    use chrono::{Duration, Utc};

    fn activity(user_id: Uuid, kind: ActivityKind, title: &str, age_mins: i64) -> Activity {
        Activity {
            id: Uuid::new_v4(),
            user_id,
            kind,
            title: title.to_string(),
            item_id: None,
            created_at: Utc::now() - Duration::minutes(age_mins),
        }
    }

    #[test]
    fn insert_and_list_newest_first() {
        let (_dir, db) = test_db();
        let user = seed_profile(&db, "user@example.com");

        db.insert_activity(&activity(user.id, ActivityKind::Login, "Signed in", 10))
            .unwrap();
        db.insert_activity(&activity(user.id, ActivityKind::ViewRecipe, "Watched: Soup", 0))
            .unwrap();

        let recent = db.recent_activities(user.id, 20).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].kind, ActivityKind::ViewRecipe);
        assert_eq!(recent[1].kind, ActivityKind::Login);
    }

    #[test]
    fn limit_caps_history() {
        let (_dir, db) = test_db();
        let user = seed_profile(&db, "user@example.com");

        for i in 0..25 {
            db.insert_activity(&activity(user.id, ActivityKind::Login, "Signed in", i))
                .unwrap();
        }

        assert_eq!(db.recent_activities(user.id, 20).unwrap().len(), 20);
    }

    #[test]
    fn clear_removes_only_that_user() {
        let (_dir, db) = test_db();
        let alice = seed_profile(&db, "alice@example.com");
        let bob = seed_profile(&db, "bob@example.com");

        db.insert_activity(&activity(alice.id, ActivityKind::Login, "Signed in", 0))
            .unwrap();
        db.insert_activity(&activity(bob.id, ActivityKind::Login, "Signed in", 0))
            .unwrap();

        assert_eq!(db.clear_activities(alice.id).unwrap(), 1);
        assert!(db.recent_activities(alice.id, 20).unwrap().is_empty());
        assert_eq!(db.recent_activities(bob.id, 20).unwrap().len(), 1);
    }
}
