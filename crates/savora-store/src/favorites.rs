//! Favorite toggling and lookup.

use chrono::{DateTime, Utc};
use rusqlite::params;
use uuid::Uuid;

use crate::database::{column_uuid, Database};
use crate::error::Result;
use crate::models::{Favorite, ItemKind};

/// Result of [`Database::toggle_favorite`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoriteToggle {
    /// `true` when the call added the pairing, `false` when it removed it.
    pub added: bool,
    /// The user's favorite item ids after the toggle.
    pub favorites: Vec<Uuid>,
}

impl Database {
    /// Toggle the `(user, item)` favorite pairing.
    ///
    /// Evaluated against stored state at call time: if the pairing exists it
    /// is deleted, otherwise inserted.  Two consecutive calls return to the
    /// original state.
    pub fn toggle_favorite(
        &self,
        user_id: Uuid,
        item_id: Uuid,
        kind: ItemKind,
        now: DateTime<Utc>,
    ) -> Result<FavoriteToggle> {
        let removed = self.conn().execute(
            "DELETE FROM favorites WHERE user_id = ?1 AND item_id = ?2",
            params![user_id.to_string(), item_id.to_string()],
        )?;

        let added = removed == 0;
        if added {
            let favorite = Favorite {
                user_id,
                item_id,
                kind,
                created_at: now,
            };
            self.conn().execute(
                "INSERT INTO favorites (user_id, item_id, kind, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    favorite.user_id.to_string(),
                    favorite.item_id.to_string(),
                    favorite.kind.as_str(),
                    favorite.created_at.to_rfc3339(),
                ],
            )?;
        }

        Ok(FavoriteToggle {
            added,
            favorites: self.favorite_item_ids(user_id)?,
        })
    }

    /// The user's favorite item ids, newest first.
    pub fn favorite_item_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>> {
        let mut stmt = self.conn().prepare(
            "SELECT item_id FROM favorites WHERE user_id = ?1 ORDER BY created_at DESC",
        )?;

        let rows = stmt.query_map(params![user_id.to_string()], |row| {
            let id: String = row.get(0)?;
            column_uuid(0, &id)
        })?;

        let mut ids = Vec::new();
        for row in rows {
            ids.push(row?);
        }
        Ok(ids)
    }
}
