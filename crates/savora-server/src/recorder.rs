//! Activity and notification recording.
//!
//! Everything here is a side effect of some primary user action, so failures
//! are logged and swallowed: a lost history row or notification must never
//! block a login or stop a video from opening.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use savora_shared::streak;
use savora_store::{Activity, ActivityKind, Database, Notification, NotificationKind, Profile};

/// Appends history rows and fans out notifications.
#[derive(Clone)]
pub struct Recorder {
    db: Arc<Mutex<Database>>,
}

impl Recorder {
    pub fn new(db: Arc<Mutex<Database>>) -> Self {
        Self { db }
    }

    /// Append one history row.  Fire-and-forget.
    pub async fn record(
        &self,
        user_id: Uuid,
        kind: ActivityKind,
        title: impl Into<String>,
        item_id: Option<Uuid>,
    ) {
        let activity = Activity {
            id: Uuid::new_v4(),
            user_id,
            kind,
            title: title.into(),
            item_id,
            created_at: Utc::now(),
        };

        let db = self.db.lock().await;
        if let Err(e) = db.insert_activity(&activity) {
            warn!(
                user = %user_id,
                kind = kind.as_str(),
                error = %e,
                "failed to record activity"
            );
        }
    }

    /// Record a content view and refresh the daily streak.
    ///
    /// The streak write is skipped when it was already updated today, so
    /// repeated views within a day stay idempotent.
    pub async fn record_content_view(
        &self,
        profile: &Profile,
        kind: ActivityKind,
        title: impl Into<String>,
        item_id: Uuid,
    ) {
        self.record(profile.id, kind, title, Some(item_id)).await;

        if let Some(update) =
            streak::update_streak(profile.streak, profile.last_streak_update, Utc::now())
        {
            let db = self.db.lock().await;
            match db.set_streak(profile.id, update.streak, update.last_streak_update) {
                Ok(()) => {
                    debug!(user = %profile.id, streak = update.streak, "streak updated")
                }
                Err(e) => {
                    warn!(user = %profile.id, error = %e, "failed to persist streak")
                }
            }
        }
    }

    /// Fan out one notification per known user.
    ///
    /// Best-effort: a failed insert is logged and the loop continues, and a
    /// failed fan-out never rolls back the publish that triggered it.
    pub async fn broadcast(&self, kind: NotificationKind, title: &str, content: &str, link: &str) {
        let db = self.db.lock().await;

        let user_ids = match db.list_profile_ids() {
            Ok(ids) => ids,
            Err(e) => {
                warn!(error = %e, "failed to list users for broadcast");
                return;
            }
        };

        let mut inserted = 0usize;
        for user_id in user_ids {
            let notification = Notification {
                id: Uuid::new_v4(),
                user_id,
                kind,
                title: title.to_string(),
                content: content.to_string(),
                sender_id: None,
                link: Some(link.to_string()),
                is_read: false,
                created_at: Utc::now(),
            };
            match db.insert_notification(&notification) {
                Ok(()) => inserted += 1,
                Err(e) => {
                    warn!(user = %user_id, error = %e, "failed to insert broadcast notification")
                }
            }
        }

        info!(kind = kind.as_str(), inserted, title, "broadcast sent");
    }

    /// Notify a single user (support-chat counterpart).
    pub async fn notify_direct(
        &self,
        recipient: Uuid,
        kind: NotificationKind,
        title: &str,
        content: &str,
        sender_id: Option<Uuid>,
        link: Option<String>,
    ) {
        let notification = Notification {
            id: Uuid::new_v4(),
            user_id: recipient,
            kind,
            title: title.to_string(),
            content: content.to_string(),
            sender_id,
            link,
            is_read: false,
            created_at: Utc::now(),
        };

        let db = self.db.lock().await;
        if let Err(e) = db.insert_notification(&notification) {
            warn!(recipient = %recipient, error = %e, "failed to insert notification");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use savora_shared::types::Plan;

    fn open_recorder() -> (tempfile::TempDir, Arc<Mutex<Database>>, Recorder) {
        let dir = tempfile::tempdir().unwrap();
        let db = Arc::new(Mutex::new(
            Database::open_at(&dir.path().join("test.db")).unwrap(),
        ));
        let recorder = Recorder::new(db.clone());
        (dir, db, recorder)
    }

    async fn seed(db: &Arc<Mutex<Database>>, email: &str) -> Profile {
        let profile = Profile {
            id: Uuid::new_v4(),
            email: email.to_string(),
            name: "Test User".to_string(),
            plan: Plan::FreeTrial,
            is_admin: false,
            trial_expires_at: None,
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
        db.lock().await.create_profile(&profile).unwrap();
        profile
    }

    #[tokio::test]
    async fn record_appends_history() {
        let (_dir, db, recorder) = open_recorder();
        let user = seed(&db, "user@example.com").await;

        recorder
            .record(user.id, ActivityKind::Login, "Signed in", None)
            .await;

        let history = db.lock().await.recent_activities(user.id, 20).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].kind, ActivityKind::Login);
    }

    #[tokio::test]
    async fn content_view_starts_and_keeps_streak() {
        let (_dir, db, recorder) = open_recorder();
        let user = seed(&db, "user@example.com").await;
        let video = Uuid::new_v4();

        recorder
            .record_content_view(&user, ActivityKind::ViewVideo, "Viewed: Knife skills", video)
            .await;

        let after_first = db.lock().await.get_profile(user.id).unwrap();
        assert_eq!(after_first.streak, 1);
        let stamp = after_first.last_streak_update.expect("streak stamped");

        // Same calendar day: the second view records history but not streak.
        recorder
            .record_content_view(
                &after_first,
                ActivityKind::ViewVideo,
                "Viewed: Knife skills",
                video,
            )
            .await;

        let after_second = db.lock().await.get_profile(user.id).unwrap();
        assert_eq!(after_second.streak, 1);
        assert_eq!(after_second.last_streak_update, Some(stamp));
        assert_eq!(
            db.lock().await.recent_activities(user.id, 20).unwrap().len(),
            2
        );
    }

    #[tokio::test]
    async fn consecutive_day_view_increments_streak() {
        let (_dir, db, recorder) = open_recorder();
        let user = seed(&db, "user@example.com").await;

        {
            let guard = db.lock().await;
            guard
                .set_streak(user.id, 3, Utc::now() - Duration::days(1))
                .unwrap();
        }
        let yesterday = db.lock().await.get_profile(user.id).unwrap();

        recorder
            .record_content_view(
                &yesterday,
                ActivityKind::ViewRecipe,
                "Viewed: Soup",
                Uuid::new_v4(),
            )
            .await;

        assert_eq!(db.lock().await.get_profile(user.id).unwrap().streak, 4);
    }

    #[tokio::test]
    async fn broadcast_reaches_every_profile() {
        let (_dir, db, recorder) = open_recorder();
        let alice = seed(&db, "alice@example.com").await;
        let bob = seed(&db, "bob@example.com").await;

        recorder
            .broadcast(
                NotificationKind::Video,
                "New lesson: Knife skills",
                "Check out the new lesson!",
                "videos?id=abc",
            )
            .await;

        let guard = db.lock().await;
        for user in [alice.id, bob.id] {
            let notifications = guard.notifications_for_user(user).unwrap();
            assert_eq!(notifications.len(), 1);
            assert_eq!(notifications[0].kind, NotificationKind::Video);
            assert_eq!(notifications[0].link.as_deref(), Some("videos?id=abc"));
        }
    }

    #[tokio::test]
    async fn direct_notification_targets_one_user() {
        let (_dir, db, recorder) = open_recorder();
        let alice = seed(&db, "alice@example.com").await;
        let bob = seed(&db, "bob@example.com").await;

        recorder
            .notify_direct(
                alice.id,
                NotificationKind::Message,
                "New message from support",
                "Hello!",
                Some(bob.id),
                Some("/chat".to_string()),
            )
            .await;

        let guard = db.lock().await;
        assert_eq!(guard.notifications_for_user(alice.id).unwrap().len(), 1);
        assert!(guard.notifications_for_user(bob.id).unwrap().is_empty());
    }
}
