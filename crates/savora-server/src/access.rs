//! Access-policy service.
//!
//! Wires the pure entitlement engine to stored state: resolves the caller's
//! effective plan (configured overrides, admin promotion, trial backfill) and
//! fetches the monthly viewed-video set only when the quota actually applies.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

use savora_shared::constants::ESSENTIAL_MONTHLY_VIDEO_LIMIT;
use savora_shared::entitlement::{self, Screening};
use savora_shared::overrides::PlanOverrides;
use savora_shared::types::{AccessRequest, Decision, Plan};
use savora_store::{Database, Profile, StoreError};

use crate::error::ServerError;

/// Decides whether a user may perform a request, and why not if denied.
#[derive(Clone)]
pub struct AccessPolicy {
    db: Arc<Mutex<Database>>,
    overrides: PlanOverrides,
    trial_hours: i64,
}

impl AccessPolicy {
    pub fn new(db: Arc<Mutex<Database>>, overrides: PlanOverrides, trial_hours: i64) -> Self {
        Self {
            db,
            overrides,
            trial_hours,
        }
    }

    /// Load a profile and apply effective-plan resolution.
    ///
    /// Promotion (override, admin) is applied to the returned value only and
    /// never written back; the stored plan stays authoritative.  The one
    /// write is the trial-expiry backfill for legacy free-trial rows that
    /// predate the expiry column.
    pub async fn resolve_profile(&self, user_id: Uuid) -> Result<Profile, ServerError> {
        let db = self.db.lock().await;

        let mut profile = db.get_profile(user_id).map_err(|e| match e {
            StoreError::NotFound => ServerError::ProfileNotFound(user_id),
            other => ServerError::Store(other),
        })?;

        if let Some(plan) = self.overrides.plan_for(&profile.email) {
            // Pinned accounts never lapse.
            debug!(user = %profile.id, plan = %plan, "plan override applied");
            profile.plan = plan;
            profile.trial_expires_at = None;
        } else if profile.plan == Plan::FreeTrial && profile.trial_expires_at.is_none() {
            let expires_at = Utc::now() + Duration::hours(self.trial_hours);
            db.set_trial_expires_at(profile.id, expires_at)?;
            profile.trial_expires_at = Some(expires_at);
        }

        if profile.is_admin {
            profile.plan = Plan::Premium;
        }

        Ok(profile)
    }

    /// Full access check for a user id.
    pub async fn check(
        &self,
        user_id: Uuid,
        request: &AccessRequest,
    ) -> Result<Decision, ServerError> {
        let profile = self.resolve_profile(user_id).await?;
        Ok(self.check_for(&profile, request).await)
    }

    /// Full access check for an already-resolved profile.
    pub async fn check_for(&self, profile: &Profile, request: &AccessRequest) -> Decision {
        let now = Utc::now();
        match entitlement::screen(&profile.plan_state(), request, now) {
            Screening::Decided(decision) => decision,
            Screening::NeedsQuota { video_id } => {
                let viewed = self.viewed_this_month(profile.id, now).await;
                entitlement::quota_decision(video_id, &viewed, ESSENTIAL_MONTHLY_VIDEO_LIMIT)
            }
        }
    }

    /// The month's distinct viewed-video set.
    ///
    /// A failed query degrades to an empty set so a transient read error can
    /// never turn into a spurious denial; the error is logged.
    async fn viewed_this_month(&self, user_id: Uuid, now: DateTime<Utc>) -> HashSet<Uuid> {
        let since = entitlement::start_of_month(now);
        let db = self.db.lock().await;
        match db.distinct_viewed_videos(user_id, since) {
            Ok(viewed) => viewed,
            Err(e) => {
                warn!(
                    user = %user_id,
                    error = %e,
                    "viewed-video query failed; treating as no views"
                );
                HashSet::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use savora_shared::types::{DenialReason, Section};

    fn open_policy(overrides: &str) -> (tempfile::TempDir, Arc<Mutex<Database>>, AccessPolicy) {
        let dir = tempfile::tempdir().unwrap();
        let db = Arc::new(Mutex::new(
            Database::open_at(&dir.path().join("test.db")).unwrap(),
        ));
        let policy = AccessPolicy::new(db.clone(), overrides.parse().unwrap(), 24);
        (dir, db, policy)
    }

    async fn seed(db: &Arc<Mutex<Database>>, email: &str, plan: Plan, is_admin: bool) -> Profile {
        let profile = Profile {
            id: Uuid::new_v4(),
            email: email.to_string(),
            name: "Test User".to_string(),
            plan,
            is_admin,
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
    async fn trial_backfill_happens_once() {
        let (_dir, db, policy) = open_policy("");
        let profile = seed(&db, "user@example.com", Plan::FreeTrial, false).await;

        let first = policy.resolve_profile(profile.id).await.unwrap();
        let expiry = first.trial_expires_at.expect("expiry backfilled");

        let second = policy.resolve_profile(profile.id).await.unwrap();
        assert_eq!(second.trial_expires_at, Some(expiry));
    }

    #[tokio::test]
    async fn override_pins_plan_and_clears_expiry() {
        let (_dir, db, policy) = open_policy("pinned@example.com=premium");
        let profile = seed(&db, "pinned@example.com", Plan::FreeTrial, false).await;

        let resolved = policy.resolve_profile(profile.id).await.unwrap();
        assert_eq!(resolved.plan, Plan::Premium);
        assert_eq!(resolved.trial_expires_at, None);

        // The stored row is untouched.
        let stored = db.lock().await.get_profile(profile.id).unwrap();
        assert_eq!(stored.plan, Plan::FreeTrial);
    }

    #[tokio::test]
    async fn admin_resolves_to_premium() {
        let (_dir, db, policy) = open_policy("");
        let profile = seed(&db, "admin@example.com", Plan::Essential, true).await;

        let resolved = policy.resolve_profile(profile.id).await.unwrap();
        assert!(resolved.is_admin);
        assert_eq!(resolved.plan, Plan::Premium);
    }

    #[tokio::test]
    async fn essential_quota_counts_stored_views() {
        let (_dir, db, policy) = open_policy("");
        let profile = seed(&db, "essential@example.com", Plan::Essential, false).await;
        let target = Uuid::new_v4();
        let now = Utc::now();

        {
            let guard = db.lock().await;
            for _ in 0..5 {
                guard
                    .record_video_view(&savora_store::VideoView {
                        user_id: profile.id,
                        video_id: Uuid::new_v4(),
                        viewed_at: now,
                    })
                    .unwrap();
            }
        }

        let request = AccessRequest::OpenVideo {
            video_id: target,
            is_premium: false,
        };
        let decision = policy.check(profile.id, &request).await.unwrap();
        assert!(!decision.allowed);
        assert_eq!(decision.reason, Some(DenialReason::LimitReached));
    }

    #[tokio::test]
    async fn last_months_views_do_not_count() {
        let (_dir, db, policy) = open_policy("");
        let profile = seed(&db, "essential@example.com", Plan::Essential, false).await;
        let now = Utc::now();
        let last_month = entitlement::start_of_month(now) - Duration::seconds(1);

        {
            let guard = db.lock().await;
            for _ in 0..5 {
                guard
                    .record_video_view(&savora_store::VideoView {
                        user_id: profile.id,
                        video_id: Uuid::new_v4(),
                        viewed_at: last_month,
                    })
                    .unwrap();
            }
        }

        let request = AccessRequest::OpenVideo {
            video_id: Uuid::new_v4(),
            is_premium: false,
        };
        let decision = policy.check(profile.id, &request).await.unwrap();
        assert!(decision.allowed);
    }

    #[tokio::test]
    async fn section_check_never_touches_the_quota() {
        let (_dir, db, policy) = open_policy("");
        let profile = seed(&db, "essential@example.com", Plan::Essential, false).await;

        let request = AccessRequest::Section {
            section: Section::Videos,
        };
        let decision = policy.check(profile.id, &request).await.unwrap();
        assert!(decision.allowed);
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let (_dir, _db, policy) = open_policy("");
        let missing = Uuid::new_v4();
        assert!(matches!(
            policy.resolve_profile(missing).await,
            Err(ServerError::ProfileNotFound(id)) if id == missing
        ));
    }
}
