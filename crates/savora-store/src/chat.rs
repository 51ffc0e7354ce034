//! Support-chat persistence.
//!
//! Each user owns a single thread shared with the support staff; the admin
//! dashboard works from per-thread summaries.

use std::str::FromStr;

use rusqlite::params;
use uuid::Uuid;

use savora_shared::types::Plan;

use crate::database::{column_timestamp, column_uuid, Database};
use crate::error::Result;
use crate::models::{ChatMessage, ChatSession};

impl Database {
    /// Append a chat message to the owner's thread.
    pub fn insert_chat_message(&self, message: &ChatMessage) -> Result<()> {
        self.conn().execute(
            "INSERT INTO chat_messages (id, user_id, sender_id, text, is_admin, is_read, \
             created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                message.id.to_string(),
                message.user_id.to_string(),
                message.sender_id.to_string(),
                message.text,
                message.is_admin,
                message.is_read,
                message.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// The full thread for one user, oldest first.
    pub fn chat_messages_for_user(&self, user_id: Uuid) -> Result<Vec<ChatMessage>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, user_id, sender_id, text, is_admin, is_read, created_at
             FROM chat_messages
             WHERE user_id = ?1
             ORDER BY created_at ASC",
        )?;

        let rows = stmt.query_map(params![user_id.to_string()], row_to_chat_message)?;

        let mut messages = Vec::new();
        for row in rows {
            messages.push(row?);
        }
        Ok(messages)
    }

    /// Mark the counterpart's messages in a thread as read.
    ///
    /// `from_admin` selects which side's messages are marked: the user marks
    /// staff messages read and vice versa.  Returns the number of rows updated.
    pub fn mark_chat_read(&self, user_id: Uuid, from_admin: bool) -> Result<usize> {
        let affected = self.conn().execute(
            "UPDATE chat_messages SET is_read = 1
             WHERE user_id = ?1 AND is_admin = ?2 AND is_read = 0",
            params![user_id.to_string(), from_admin],
        )?;
        Ok(affected)
    }

    /// One summary per thread, most recently active first.
    ///
    /// Premium subscribers are flagged for priority support; the unread count
    /// covers user messages the staff has not read yet.
    pub fn chat_sessions(&self) -> Result<Vec<ChatSession>> {
        let mut stmt = self.conn().prepare(
            "SELECT m.id, m.user_id, m.sender_id, m.text, m.is_admin, m.is_read, \
             m.created_at, p.name, p.avatar_url, p.plan
             FROM chat_messages m
             JOIN profiles p ON p.id = m.user_id
             ORDER BY m.created_at DESC",
        )?;

        let rows = stmt.query_map([], |row| {
            let message = row_to_chat_message(row)?;
            let name: String = row.get(7)?;
            let avatar: Option<String> = row.get(8)?;
            let plan: String = row.get(9)?;
            Ok((message, name, avatar, plan))
        })?;

        let mut sessions: Vec<ChatSession> = Vec::new();
        for row in rows {
            let (message, name, avatar, plan) = row?;

            if let Some(session) = sessions.iter_mut().find(|s| s.user_id == message.user_id) {
                if !message.is_admin && !message.is_read {
                    session.unread_count += 1;
                }
                continue;
            }

            let priority = Plan::from_str(&plan).map(|p| p == Plan::Premium).unwrap_or(false);
            let unread = if !message.is_admin && !message.is_read { 1 } else { 0 };
            sessions.push(ChatSession {
                user_id: message.user_id,
                user_name: name,
                user_avatar: avatar,
                last_message: message,
                unread_count: unread,
                priority,
            });
        }
        Ok(sessions)
    }

    /// Unread user messages across all threads (support badge counter).
    pub fn pending_support_count(&self) -> Result<u32> {
        let count = self.conn().query_row(
            "SELECT COUNT(*) FROM chat_messages WHERE is_admin = 0 AND is_read = 0",
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Map a `rusqlite::Row` to a [`ChatMessage`].
fn row_to_chat_message(row: &rusqlite::Row<'_>) -> rusqlite::Result<ChatMessage> {
    let id_str: String = row.get(0)?;
    let user_str: String = row.get(1)?;
    let sender_str: String = row.get(2)?;
    let created_str: String = row.get(6)?;

    Ok(ChatMessage {
        id: column_uuid(0, &id_str)?,
        user_id: column_uuid(1, &user_str)?,
        sender_id: column_uuid(2, &sender_str)?,
        text: row.get(3)?,
        is_admin: row.get(4)?,
        is_read: row.get(5)?,
        created_at: column_timestamp(6, &created_str)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::tests::{seed_profile, test_db};
    use chrono::{Duration, Utc};

    fn message(user_id: Uuid, sender_id: Uuid, is_admin: bool, age_mins: i64) -> ChatMessage {
        ChatMessage {
            id: Uuid::new_v4(),
            user_id,
            sender_id,
            text: "Hello there".to_string(),
            is_admin,
            is_read: false,
            created_at: Utc::now() - Duration::minutes(age_mins),
        }
    }

    #[test]
    fn thread_is_oldest_first() {
        let (_dir, db) = test_db();
        let user = seed_profile(&db, "user@example.com");

        db.insert_chat_message(&message(user.id, user.id, false, 10))
            .unwrap();
        db.insert_chat_message(&message(user.id, user.id, false, 0))
            .unwrap();

        let thread = db.chat_messages_for_user(user.id).unwrap();
        assert_eq!(thread.len(), 2);
        assert!(thread[0].created_at <= thread[1].created_at);
    }

    #[test]
    fn mark_read_targets_one_side() {
        let (_dir, db) = test_db();
        let user = seed_profile(&db, "user@example.com");
        let admin = seed_profile(&db, "admin@example.com");

        db.insert_chat_message(&message(user.id, user.id, false, 5))
            .unwrap();
        db.insert_chat_message(&message(user.id, admin.id, true, 1))
            .unwrap();

        // Support reads the user's messages.
        assert_eq!(db.mark_chat_read(user.id, false).unwrap(), 1);

        let thread = db.chat_messages_for_user(user.id).unwrap();
        let user_msg = thread.iter().find(|m| !m.is_admin).unwrap();
        let admin_msg = thread.iter().find(|m| m.is_admin).unwrap();
        assert!(user_msg.is_read);
        assert!(!admin_msg.is_read);
    }

    #[test]
    fn sessions_summarize_threads() {
        let (_dir, db) = test_db();
        let premium = seed_profile(&db, "premium@example.com");
        db.set_plan(premium.id, Plan::Premium).unwrap();
        let trial = seed_profile(&db, "trial@example.com");

        db.insert_chat_message(&message(premium.id, premium.id, false, 10))
            .unwrap();
        db.insert_chat_message(&message(premium.id, premium.id, false, 5))
            .unwrap();
        db.insert_chat_message(&message(trial.id, trial.id, false, 1))
            .unwrap();

        let sessions = db.chat_sessions().unwrap();
        assert_eq!(sessions.len(), 2);

        // Most recently active thread first.
        assert_eq!(sessions[0].user_id, trial.id);
        assert!(!sessions[0].priority);

        let premium_session = sessions.iter().find(|s| s.user_id == premium.id).unwrap();
        assert!(premium_session.priority);
        assert_eq!(premium_session.unread_count, 2);

        assert_eq!(db.pending_support_count().unwrap(), 3);
    }
}
