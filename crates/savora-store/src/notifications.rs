//! Notification persistence and read-marking.

use rusqlite::params;
use uuid::Uuid;

use crate::database::{column_enum, column_opt_uuid, column_timestamp, column_uuid, Database};
use crate::error::Result;
use crate::models::{Notification, NotificationKind};

impl Database {
    /// Insert a notification addressed to one user.
    pub fn insert_notification(&self, notification: &Notification) -> Result<()> {
        self.conn().execute(
            "INSERT INTO notifications (id, user_id, kind, title, content, sender_id, \
             link, is_read, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                notification.id.to_string(),
                notification.user_id.to_string(),
                notification.kind.as_str(),
                notification.title,
                notification.content,
                notification.sender_id.map(|s| s.to_string()),
                notification.link,
                notification.is_read,
                notification.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// The user's notifications, newest first.
    pub fn notifications_for_user(&self, user_id: Uuid) -> Result<Vec<Notification>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, user_id, kind, title, content, sender_id, link, is_read, created_at
             FROM notifications
             WHERE user_id = ?1
             ORDER BY created_at DESC",
        )?;

        let rows = stmt.query_map(params![user_id.to_string()], row_to_notification)?;

        let mut notifications = Vec::new();
        for row in rows {
            notifications.push(row?);
        }
        Ok(notifications)
    }

    /// Mark one notification read.  Returns `true` if a row was updated.
    pub fn mark_notification_read(&self, id: Uuid) -> Result<bool> {
        let affected = self.conn().execute(
            "UPDATE notifications SET is_read = 1 WHERE id = ?1",
            params![id.to_string()],
        )?;
        Ok(affected > 0)
    }

    /// Mark the user's unread notifications read, optionally only those of
    /// one kind.  Returns the number of rows updated.
    pub fn mark_notifications_read(
        &self,
        user_id: Uuid,
        kind: Option<NotificationKind>,
    ) -> Result<usize> {
        let affected = match kind {
            Some(kind) => self.conn().execute(
                "UPDATE notifications SET is_read = 1
                 WHERE user_id = ?1 AND kind = ?2 AND is_read = 0",
                params![user_id.to_string(), kind.as_str()],
            )?,
            None => self.conn().execute(
                "UPDATE notifications SET is_read = 1 WHERE user_id = ?1 AND is_read = 0",
                params![user_id.to_string()],
            )?,
        };
        Ok(affected)
    }

    /// Number of unread notifications for the badge counter.
    pub fn unread_notification_count(&self, user_id: Uuid) -> Result<u32> {
        let count = self.conn().query_row(
            "SELECT COUNT(*) FROM notifications WHERE user_id = ?1 AND is_read = 0",
            params![user_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Map a `rusqlite::Row` to a [`Notification`].
fn row_to_notification(row: &rusqlite::Row<'_>) -> rusqlite::Result<Notification> {
    let id_str: String = row.get(0)?;
    let user_str: String = row.get(1)?;
    let kind_str: String = row.get(2)?;
    let sender_str: Option<String> = row.get(5)?;
    let created_str: String = row.get(8)?;

    Ok(Notification {
        id: column_uuid(0, &id_str)?,
        user_id: column_uuid(1, &user_str)?,
        kind: column_enum::<NotificationKind>(2, &kind_str)?,
        title: row.get(3)?,
        content: row.get(4)?,
        sender_id: column_opt_uuid(5, sender_str)?,
        link: row.get(6)?,
        is_read: row.get(7)?,
        created_at: column_timestamp(8, &created_str)?,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::profiles::tests::{seed_profile, test_db};
    use chrono::Utc;

    pub(crate) fn notification(user_id: Uuid, kind: NotificationKind) -> Notification {
        Notification {
            id: Uuid::new_v4(),
            user_id,
            kind,
            title: "New lesson: Knife skills".to_string(),
            content: "Check out the new lesson in technique!".to_string(),
            sender_id: None,
            link: Some("videos?id=abc".to_string()),
            is_read: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn insert_list_round_trip() {
        let (_dir, db) = test_db();
        let user = seed_profile(&db, "user@example.com");

        db.insert_notification(&notification(user.id, NotificationKind::Video))
            .unwrap();

        let listed = db.notifications_for_user(user.id).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].kind, NotificationKind::Video);
        assert!(!listed[0].is_read);
    }

    #[test]
    fn mark_single_read() {
        let (_dir, db) = test_db();
        let user = seed_profile(&db, "user@example.com");
        let n = notification(user.id, NotificationKind::System);
        db.insert_notification(&n).unwrap();

        assert!(db.mark_notification_read(n.id).unwrap());
        assert_eq!(db.unread_notification_count(user.id).unwrap(), 0);
    }

    #[test]
    fn mark_read_filtered_by_kind() {
        let (_dir, db) = test_db();
        let user = seed_profile(&db, "user@example.com");
        db.insert_notification(&notification(user.id, NotificationKind::Message))
            .unwrap();
        db.insert_notification(&notification(user.id, NotificationKind::Video))
            .unwrap();

        let updated = db
            .mark_notifications_read(user.id, Some(NotificationKind::Message))
            .unwrap();
        assert_eq!(updated, 1);
        assert_eq!(db.unread_notification_count(user.id).unwrap(), 1);

        let updated = db.mark_notifications_read(user.id, None).unwrap();
        assert_eq!(updated, 1);
        assert_eq!(db.unread_notification_count(user.id).unwrap(), 0);
    }
}
