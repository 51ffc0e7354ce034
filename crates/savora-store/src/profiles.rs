//! CRUD operations for [`Profile`] records.

use chrono::{DateTime, Utc};
use rusqlite::params;
use uuid::Uuid;

use savora_shared::types::Plan;

use crate::database::{column_enum, column_opt_timestamp, column_timestamp, column_uuid, Database};
use crate::error::{Result, StoreError};
use crate::models::{Profile, ProfileUpdate};

const PROFILE_COLUMNS: &str = "id, email, name, plan, is_admin, trial_expires_at, avatar_url, \
     goal, weight, target_weight, start_weight, dark_mode, streak, \
     last_streak_update, last_login, created_at";

impl Database {
    // ------------------------------------------------------------------
    // Create
    // ------------------------------------------------------------------

    /// Insert a freshly provisioned profile.
    pub fn create_profile(&self, profile: &Profile) -> Result<()> {
        self.conn().execute(
            "INSERT INTO profiles (id, email, name, plan, is_admin, trial_expires_at, \
             avatar_url, goal, weight, target_weight, start_weight, dark_mode, streak, \
             last_streak_update, last_login, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
            params![
                profile.id.to_string(),
                profile.email,
                profile.name,
                profile.plan.as_str(),
                profile.is_admin,
                profile.trial_expires_at.map(|t| t.to_rfc3339()),
                profile.avatar_url,
                profile.goal,
                profile.weight,
                profile.target_weight,
                profile.start_weight,
                profile.dark_mode,
                profile.streak,
                profile.last_streak_update.map(|t| t.to_rfc3339()),
                profile.last_login.map(|t| t.to_rfc3339()),
                profile.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    /// Fetch a single profile by UUID.
    pub fn get_profile(&self, id: Uuid) -> Result<Profile> {
        self.conn()
            .query_row(
                &format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = ?1"),
                params![id.to_string()],
                row_to_profile,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
                other => StoreError::Sqlite(other),
            })
    }

    /// Fetch a profile by email address, if one exists.
    pub fn get_profile_by_email(&self, email: &str) -> Result<Option<Profile>> {
        match self.conn().query_row(
            &format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE email = ?1"),
            params![email],
            row_to_profile,
        ) {
            Ok(profile) => Ok(Some(profile)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(other) => Err(StoreError::Sqlite(other)),
        }
    }

    /// List every profile id (notification fan-out).
    pub fn list_profile_ids(&self) -> Result<Vec<Uuid>> {
        let mut stmt = self.conn().prepare("SELECT id FROM profiles")?;
        let rows = stmt.query_map([], |row| {
            let id: String = row.get(0)?;
            column_uuid(0, &id)
        })?;

        let mut ids = Vec::new();
        for row in rows {
            ids.push(row?);
        }
        Ok(ids)
    }

    /// Total number of profiles (admin dashboard).
    pub fn count_profiles(&self) -> Result<u32> {
        let count =
            self.conn()
                .query_row("SELECT COUNT(*) FROM profiles", [], |row| row.get(0))?;
        Ok(count)
    }

    // ------------------------------------------------------------------
    // Update
    // ------------------------------------------------------------------

    /// Apply a partial update and return the stored profile.
    pub fn update_profile(&self, id: Uuid, update: &ProfileUpdate) -> Result<Profile> {
        let mut profile = self.get_profile(id)?;

        if let Some(ref name) = update.name {
            profile.name = name.clone();
        }
        if let Some(ref goal) = update.goal {
            profile.goal = Some(goal.clone());
        }
        if let Some(weight) = update.weight {
            profile.weight = Some(weight);
        }
        if let Some(target_weight) = update.target_weight {
            profile.target_weight = Some(target_weight);
        }
        if let Some(start_weight) = update.start_weight {
            profile.start_weight = Some(start_weight);
        }
        if let Some(dark_mode) = update.dark_mode {
            profile.dark_mode = dark_mode;
        }
        if let Some(ref avatar_url) = update.avatar_url {
            profile.avatar_url = Some(avatar_url.clone());
        }

        self.conn().execute(
            "UPDATE profiles SET name = ?2, goal = ?3, weight = ?4, target_weight = ?5, \
             start_weight = ?6, dark_mode = ?7, avatar_url = ?8 WHERE id = ?1",
            params![
                id.to_string(),
                profile.name,
                profile.goal,
                profile.weight,
                profile.target_weight,
                profile.start_weight,
                profile.dark_mode,
                profile.avatar_url,
            ],
        )?;

        Ok(profile)
    }

    /// Persist a new stored plan.
    pub fn set_plan(&self, id: Uuid, plan: Plan) -> Result<()> {
        self.conn().execute(
            "UPDATE profiles SET plan = ?2 WHERE id = ?1",
            params![id.to_string(), plan.as_str()],
        )?;
        Ok(())
    }

    /// Backfill the trial expiry for a legacy free-trial row.
    pub fn set_trial_expires_at(&self, id: Uuid, expires_at: DateTime<Utc>) -> Result<()> {
        self.conn().execute(
            "UPDATE profiles SET trial_expires_at = ?2 WHERE id = ?1",
            params![id.to_string(), expires_at.to_rfc3339()],
        )?;
        Ok(())
    }

    /// Persist recomputed streak values.
    pub fn set_streak(&self, id: Uuid, streak: u32, last_update: DateTime<Utc>) -> Result<()> {
        self.conn().execute(
            "UPDATE profiles SET streak = ?2, last_streak_update = ?3 WHERE id = ?1",
            params![id.to_string(), streak, last_update.to_rfc3339()],
        )?;
        Ok(())
    }

    /// Record a sign-in time.
    pub fn touch_last_login(&self, id: Uuid, now: DateTime<Utc>) -> Result<()> {
        self.conn().execute(
            "UPDATE profiles SET last_login = ?2 WHERE id = ?1",
            params![id.to_string(), now.to_rfc3339()],
        )?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Delete
    // ------------------------------------------------------------------

    /// Delete a profile (cascades to favorites, activities, notifications,
    /// chat and view events).  Returns `true` if a row was deleted.
    pub fn delete_profile(&self, id: Uuid) -> Result<bool> {
        let affected = self
            .conn()
            .execute("DELETE FROM profiles WHERE id = ?1", params![id.to_string()])?;
        Ok(affected > 0)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Map a `rusqlite::Row` to a [`Profile`].
fn row_to_profile(row: &rusqlite::Row<'_>) -> rusqlite::Result<Profile> {
    let id_str: String = row.get(0)?;
    let plan_str: String = row.get(3)?;
    let trial_str: Option<String> = row.get(5)?;
    let streak_str: Option<String> = row.get(13)?;
    let login_str: Option<String> = row.get(14)?;
    let created_str: String = row.get(15)?;

    Ok(Profile {
        id: column_uuid(0, &id_str)?,
        email: row.get(1)?,
        name: row.get(2)?,
        plan: column_enum::<Plan>(3, &plan_str)?,
        is_admin: row.get(4)?,
        trial_expires_at: column_opt_timestamp(5, trial_str)?,
        avatar_url: row.get(6)?,
        goal: row.get(7)?,
        weight: row.get(8)?,
        target_weight: row.get(9)?,
        start_weight: row.get(10)?,
        dark_mode: row.get(11)?,
        streak: row.get(12)?,
        last_streak_update: column_opt_timestamp(13, streak_str)?,
        last_login: column_opt_timestamp(14, login_str)?,
        created_at: column_timestamp(15, &created_str)?,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::Duration;

    /// Open a throwaway database for store tests.
    pub(crate) fn test_db() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open_at(&dir.path().join("test.db")).unwrap();
        (dir, db)
    }

    /// Insert a minimal free-trial profile and return it.
    pub(crate) fn seed_profile(db: &Database, email: &str) -> Profile {
        let profile = Profile {
            id: Uuid::new_v4(),
            email: email.to_string(),
            name: "Test User".to_string(),
            plan: Plan::FreeTrial,
            is_admin: false,
            trial_expires_at: Some(Utc::now() + Duration::hours(24)),
            avatar_url: None,
            goal: None,
            weight: None,
            target_weight: None,
            start_weight: None,
            dark_mode: false,
            streak: 0,
            last_streak_update: None,
            last_login: None,
            created_at: Utc::now(),
        };
        db.create_profile(&profile).unwrap();
        profile
    }

    #[test]
    fn create_and_get_round_trip() {
        let (_dir, db) = test_db();
        let profile = seed_profile(&db, "user@example.com");

        let stored = db.get_profile(profile.id).unwrap();
        assert_eq!(stored.email, "user@example.com");
        assert_eq!(stored.plan, Plan::FreeTrial);
        assert!(stored.trial_expires_at.is_some());
    }

    #[test]
    fn get_missing_profile_is_not_found() {
        let (_dir, db) = test_db();
        assert!(matches!(
            db.get_profile(Uuid::new_v4()),
            Err(StoreError::NotFound)
        ));
    }

    #[test]
    fn lookup_by_email() {
        let (_dir, db) = test_db();
        let profile = seed_profile(&db, "findme@example.com");

        let found = db.get_profile_by_email("findme@example.com").unwrap();
        assert_eq!(found.map(|p| p.id), Some(profile.id));
        assert!(db.get_profile_by_email("nobody@example.com").unwrap().is_none());
    }

    #[test]
    fn partial_update_leaves_other_fields() {
        let (_dir, db) = test_db();
        let profile = seed_profile(&db, "user@example.com");

        let updated = db
            .update_profile(
                profile.id,
                &ProfileUpdate {
                    goal: Some("muscle".to_string()),
                    dark_mode: Some(true),
                    ..ProfileUpdate::default()
                },
            )
            .unwrap();

        assert_eq!(updated.goal.as_deref(), Some("muscle"));
        assert!(updated.dark_mode);
        assert_eq!(updated.name, "Test User");
        assert_eq!(updated.email, "user@example.com");
    }

    #[test]
    fn streak_persistence() {
        let (_dir, db) = test_db();
        let profile = seed_profile(&db, "user@example.com");
        let now = Utc::now();

        db.set_streak(profile.id, 4, now).unwrap();

        let stored = db.get_profile(profile.id).unwrap();
        assert_eq!(stored.streak, 4);
        assert_eq!(
            stored.last_streak_update.map(|t| t.timestamp()),
            Some(now.timestamp())
        );
    }

    #[test]
    fn list_ids_and_count() {
        let (_dir, db) = test_db();
        let a = seed_profile(&db, "a@example.com");
        let b = seed_profile(&db, "b@example.com");

        let ids = db.list_profile_ids().unwrap();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&a.id) && ids.contains(&b.id));
        assert_eq!(db.count_profiles().unwrap(), 2);
    }
}
